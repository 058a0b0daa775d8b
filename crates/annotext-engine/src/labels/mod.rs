pub mod color;
pub mod relationship;
pub mod tree;

pub use color::{COLOR_PALETTE, ColorOption, contrast_color, is_valid_hex_color, parse_hex_color};
pub use relationship::{
    LabelRelationship, RelationshipError, check_new_relationship, incoming, outgoing,
};
pub use tree::{
    FlatLabel, LabelNode, LabelTreeError, build_label_tree, check_new_label, check_removable,
    check_rename, check_reparent, flatten_label_tree, search_labels,
};
