use crate::highlight::Run;
use crate::labels::{contrast_color, is_valid_hex_color};

/// Fallback background for annotated runs whose colour is not a hex value
const FALLBACK_COLOR: &str = "#FECA57";

/// Renders runs as inline HTML.
///
/// Plain runs become escaped text. Annotated runs become `<mark>` elements
/// carrying the span id in `data-span-id`, coloured with the label colour and
/// a readable text colour.
pub fn render_html(runs: &[Run<'_>]) -> String {
    let mut html = String::new();
    for run in runs {
        match (run.span_id, run.color) {
            (Some(span_id), color) => {
                let background = color
                    .filter(|c| is_valid_hex_color(c))
                    .unwrap_or(FALLBACK_COLOR);
                html.push_str(&format!(
                    r#"<mark data-span-id="{}" style="background-color:{};color:{}">{}</mark>"#,
                    html_escape::encode_double_quoted_attribute(span_id),
                    background,
                    contrast_color(background),
                    html_escape::encode_text(run.text),
                ));
            }
            (None, _) => html.push_str(&html_escape::encode_text(run.text)),
        }
    }
    html
}

/// Wraps rendered runs in a minimal standalone page.
pub fn render_html_page(title: &str, runs: &[Run<'_>]) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<pre style=\"white-space:pre-wrap\">{}</pre>\n</body>\n</html>\n",
        html_escape::encode_text(title),
        render_html(runs)
    )
}
