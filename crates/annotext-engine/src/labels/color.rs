use regex::Regex;
use std::sync::OnceLock;

/// A named entry of the default label palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOption {
    pub name: &'static str,
    pub hex: &'static str,
}

pub const COLOR_PALETTE: [ColorOption; 10] = [
    ColorOption { name: "Red", hex: "#FF6B6B" },
    ColorOption { name: "Teal", hex: "#4ECDC4" },
    ColorOption { name: "Blue", hex: "#45B7D1" },
    ColorOption { name: "Green", hex: "#96CEB4" },
    ColorOption { name: "Yellow", hex: "#FECA57" },
    ColorOption { name: "Orange", hex: "#FF9F43" },
    ColorOption { name: "Purple", hex: "#6C5CE7" },
    ColorOption { name: "Light Purple", hex: "#A29BFE" },
    ColorOption { name: "Pink", hex: "#FD79A8" },
    ColorOption { name: "Coral", hex: "#E17055" },
];

pub const BLACK: &str = "#000000";
pub const WHITE: &str = "#FFFFFF";

fn hex_color_regex() -> &'static Regex {
    static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR_REGEX.get_or_init(|| {
        Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("Invalid hex colour regex")
    })
}

/// `#RGB` or `#RRGGBB`, case-insensitive.
pub fn is_valid_hex_color(color: &str) -> bool {
    hex_color_regex().is_match(color)
}

/// Parses a hex colour into RGB components; short forms are expanded.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    if !is_valid_hex_color(color) {
        return None;
    }
    let hex = &color[1..];
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    if hex.len() == 3 {
        let expand = |c: &str| channel(&c.repeat(2));
        Some((expand(&hex[0..1])?, expand(&hex[1..2])?, expand(&hex[2..3])?))
    } else {
        Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?))
    }
}

/// Text colour that stays readable on a `background` label colour.
///
/// Unparseable colours are treated as dark and get white text.
pub fn contrast_color(background: &str) -> &'static str {
    let Some((r, g, b)) = parse_hex_color(background) else {
        return WHITE;
    };
    let luminance = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
    if luminance > 0.5 { BLACK } else { WHITE }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#FF6B6B", true)]
    #[case("#ff6b6b", true)]
    #[case("#abc", true)]
    #[case("FF6B6B", false)]
    #[case("#FF6B6", false)]
    #[case("#GGGGGG", false)]
    #[case("", false)]
    fn validates_hex(#[case] color: &str, #[case] valid: bool) {
        assert_eq!(is_valid_hex_color(color), valid);
    }

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(parse_hex_color("#FF6B6B"), Some((255, 107, 107)));
        assert_eq!(parse_hex_color("#0f8"), Some((0, 255, 136)));
        assert_eq!(parse_hex_color("red"), None);
    }

    #[rstest]
    #[case("#FFFFFF", BLACK)]
    #[case("#FECA57", BLACK)]
    #[case("#000000", WHITE)]
    #[case("#6C5CE7", WHITE)]
    #[case("not a colour", WHITE)]
    fn picks_readable_text(#[case] background: &str, #[case] expected: &str) {
        assert_eq!(contrast_color(background), expected);
    }

    #[test]
    fn palette_is_valid() {
        assert!(COLOR_PALETTE.iter().all(|c| is_valid_hex_color(c.hex)));
    }
}
