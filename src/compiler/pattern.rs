//! Text patterns used by the composition pipeline.
//!
//! HTML is handled as semi-structured text, not as a tree. Every regex the
//! pipeline depends on lives here behind a named operation, so callers never
//! touch a pattern directly.
//!
//! | Operation              | Matches                                   |
//! |------------------------|-------------------------------------------|
//! | `find_directives`      | `<!-- include="@target" -->`              |
//! | `replace_sentinel`     | the `@content` directive                  |
//! | `extract_region`       | inner text of `<head>` / `<body>`         |
//! | `insert_before_close`  | position right before `</head>`/`</body>` |
//! | `has_open_tag` / `has_close_tag` | tag presence, case-insensitive  |
//! | `map_start_tags`       | every HTML start tag                      |
//! | `find_attribute`       | one attribute inside a start tag          |
//! | `map_virtual_refs`     | `@assets/...`, `@pages/...`, ...          |

use regex::{Captures, NoExpand, Regex, bytes};
use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

/// Target of the directive marking the body insertion point of the base template.
pub const CONTENT_SENTINEL: &str = "@content";

static RE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<!--\s*include\s*=\s*"(@[^"]+)"\s*-->"#).unwrap());

static RE_SENTINEL: LazyLock<Regex> = LazyLock::new(|| {
    let sentinel = regex::escape(CONTENT_SENTINEL);
    Regex::new(&format!(r#"<!--\s*include\s*=\s*"{sentinel}"\s*-->"#)).unwrap()
});

static RE_HEAD_REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head(?:\s[^>]*)?>(.*?)</head\s*>").unwrap());

static RE_BODY_REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body(?:\s[^>]*)?>(.*?)</body\s*>").unwrap());

static RE_HEAD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head(?:\s[^>]*)?>").unwrap());

static RE_HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head\s*>").unwrap());

static RE_BODY_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body(?:\s[^>]*)?>").unwrap());

static RE_BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</body\s*>").unwrap());

/// Quoted attribute values may contain `>`.
static RE_START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[a-zA-Z][a-zA-Z0-9-]*(?:\s(?:"[^"]*"|'[^']*'|[^<>"'])*)?>"#).unwrap()
});

static RE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .unwrap()
});

/// Byte-level so non-UTF-8 output files can still be rewritten.
static RE_VIRTUAL_REF: LazyLock<bytes::Regex> = LazyLock::new(|| {
    bytes::Regex::new(r#"@(assets|posts|styles|scripts|pages)/((?-u:[^\s"'()<>`])*)"#).unwrap()
});

/// Structural region of an HTML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Head,
    Body,
}

impl Region {
    fn region_re(self) -> &'static Regex {
        match self {
            Self::Head => &RE_HEAD_REGION,
            Self::Body => &RE_BODY_REGION,
        }
    }

    fn open_re(self) -> &'static Regex {
        match self {
            Self::Head => &RE_HEAD_OPEN,
            Self::Body => &RE_BODY_OPEN,
        }
    }

    fn close_re(self) -> &'static Regex {
        match self {
            Self::Head => &RE_HEAD_CLOSE,
            Self::Body => &RE_BODY_CLOSE,
        }
    }
}

/// An include directive found in a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Byte range of the whole comment.
    pub range: Range<usize>,
    /// Target including the leading `@`, e.g. `@components/nav`.
    pub target: &'a str,
}

/// An attribute found inside a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Byte range of the attribute including its leading whitespace.
    pub range: Range<usize>,
    /// Byte range of the unquoted value.
    pub value_range: Range<usize>,
    pub value: &'a str,
}

/// Find every include directive, in document order.
pub fn find_directives(text: &str) -> impl Iterator<Item = Directive<'_>> {
    RE_DIRECTIVE.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let target = caps.get(1)?;
        Some(Directive {
            range: whole.range(),
            target: target.as_str(),
        })
    })
}

/// Check whether the text carries the `@content` sentinel.
pub fn has_sentinel(text: &str) -> bool {
    RE_SENTINEL.is_match(text)
}

/// Replace the first `@content` sentinel with `replacement`, taken literally.
///
/// Returns `None` when no sentinel exists.
pub fn replace_sentinel(text: &str, replacement: &str) -> Option<String> {
    has_sentinel(text).then(|| RE_SENTINEL.replacen(text, 1, NoExpand(replacement)).into_owned())
}

/// Inner text of the first `<head>`/`<body>` region (case-insensitive, non-greedy).
pub fn extract_region(text: &str, region: Region) -> Option<&str> {
    region
        .region_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn has_open_tag(text: &str, region: Region) -> bool {
    region.open_re().is_match(text)
}

pub fn has_close_tag(text: &str, region: Region) -> bool {
    region.close_re().is_match(text)
}

/// Insert `insertion` immediately before the closing tag of `region`.
///
/// `</head>` is located by its first occurrence, `</body>` by its last.
/// Returns `None` when the closing tag is missing.
pub fn insert_before_close(text: &str, region: Region, insertion: &str) -> Option<String> {
    let close = match region {
        Region::Head => region.close_re().find(text)?,
        Region::Body => region.close_re().find_iter(text).last()?,
    };
    let at = close.start();
    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..at]);
    out.push_str(insertion);
    out.push_str(&text[at..]);
    Some(out)
}

/// Rewrite every HTML start tag with `f`, leaving all other text untouched.
pub fn map_start_tags(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    RE_START_TAG
        .replace_all(text, |caps: &Captures| f(&caps[0]))
        .into_owned()
}

/// Locate attribute `name` (case-insensitive) inside a single start tag.
pub fn find_attribute<'a>(tag: &'a str, name: &str) -> Option<Attribute<'a>> {
    RE_ATTRIBUTE.captures_iter(tag).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return None;
        }
        let whole = caps.get(0)?;
        let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
        Some(Attribute {
            range: whole.range(),
            value_range: value.range(),
            value: value.as_str(),
        })
    })
}

/// Rewrite every virtual reference with `f(namespace, suffix)`.
///
/// The suffix runs up to the next whitespace, quote, parenthesis, angle
/// bracket or backtick, so references inside attributes, `url(...)` and JS
/// string literals are all found.
///
/// Works on raw bytes; a suffix that is not valid UTF-8 is passed lossily.
pub fn map_virtual_refs(text: &[u8], mut f: impl FnMut(&str, &str) -> String) -> Cow<'_, [u8]> {
    RE_VIRTUAL_REF.replace_all(text, |caps: &bytes::Captures| {
        f(
            &String::from_utf8_lossy(&caps[1]),
            &String::from_utf8_lossy(&caps[2]),
        )
    })
}
