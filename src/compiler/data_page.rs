//! `data-page` attribute rewriting.
//!
//! Navigation components mark entries with the page they belong to:
//!
//! ```html
//! <li data-page="about"><a href="@pages/about/index.html">About</a></li>
//! ```
//!
//! When the entry's page is the one being built it gains the `active`
//! class. The authoring-only attribute is always stripped.

use super::pattern;

const ATTR: &str = "data-page";
const ACTIVE: &str = "active";

/// Rewrite every start tag carrying `data-page` for the current `page_id`.
///
/// An empty `page_id` never matches.
pub fn rewrite_data_page(html: &str, page_id: &str) -> String {
    if !html.contains(ATTR) {
        return html.to_owned();
    }
    pattern::map_start_tags(html, |tag| rewrite_tag(tag, page_id))
}

fn rewrite_tag(tag: &str, page_id: &str) -> String {
    let Some(attr) = pattern::find_attribute(tag, ATTR) else {
        return tag.to_owned();
    };
    let is_active = !page_id.is_empty() && attr.value == page_id;

    let mut stripped = String::with_capacity(tag.len());
    stripped.push_str(&tag[..attr.range.start]);
    stripped.push_str(&tag[attr.range.end..]);

    if !is_active {
        return stripped;
    }

    match pattern::find_attribute(&stripped, "class") {
        Some(class) if class.value.split_whitespace().any(|c| c == ACTIVE) => stripped,
        Some(class) => {
            let joined = if class.value.trim().is_empty() {
                ACTIVE.to_owned()
            } else {
                format!("{} {ACTIVE}", class.value)
            };
            let mut out = String::with_capacity(stripped.len() + ACTIVE.len() + 3);
            out.push_str(&stripped[..class.value_range.start]);
            // Unquoted values gain quotes so the added space stays inside the value.
            let quoted = !is_quote(stripped[..class.value_range.start].chars().last());
            if quoted {
                out.push('"');
            }
            out.push_str(&joined);
            if quoted {
                out.push('"');
            }
            out.push_str(&stripped[class.value_range.end..]);
            out
        }
        None => {
            let at = attr.range.start;
            format!(
                "{} class=\"{ACTIVE}\"{}",
                &stripped[..at],
                &stripped[at..]
            )
        }
    }
}

fn is_quote(c: Option<char>) -> bool {
    matches!(c, Some('"' | '\''))
}
