//! Best-effort head/body balance checks on a composed document.

use super::error::StructuralWarning;
use super::pattern::{Region, has_close_tag, has_open_tag};

/// Collect structural warnings for `html`. Never fails.
pub fn validate_structure(html: &str) -> Vec<StructuralWarning> {
    let mut warnings = Vec::new();

    let head_open = has_open_tag(html, Region::Head);
    if head_open && !has_close_tag(html, Region::Head) {
        warnings.push(StructuralWarning::UnclosedHead);
    }
    if has_open_tag(html, Region::Body) && !has_close_tag(html, Region::Body) {
        warnings.push(StructuralWarning::UnclosedBody);
    }
    if !head_open {
        warnings.push(StructuralWarning::MissingHead);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_document() {
        let html = "<html><HEAD></HEAD><body class=\"x\"></body></html>";
        assert!(validate_structure(html).is_empty());
    }

    #[test]
    fn test_unclosed_tags() {
        let html = "<head><title>x</title><body><p>";
        assert_eq!(
            validate_structure(html),
            vec![StructuralWarning::UnclosedHead, StructuralWarning::UnclosedBody]
        );
    }

    #[test]
    fn test_missing_head() {
        let html = "<header></header><body></body>";
        assert_eq!(validate_structure(html), vec![StructuralWarning::MissingHead]);
    }
}
