//! Composition error and warning types.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors: the file being composed is not written.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("circular include detected: component `{0}` includes itself")]
    CircularInclude(String),

    #[error("failed to read component `{name}` from `{}`", .path.display())]
    ComponentRead {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read base template `{}`", .0.display())]
    BaseTemplateRead(PathBuf, #[source] std::io::Error),

    #[error("base template `{}` has no `@content` placeholder", .0.display())]
    MissingPlaceholder(PathBuf),
}

/// Non-fatal structural diagnostics, logged and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralWarning {
    #[error("unclosed <head> tag detected")]
    UnclosedHead,

    #[error("unclosed <body> tag detected")]
    UnclosedBody,

    #[error("missing <head> tag")]
    MissingHead,

    #[error("fragment has no <body> region, body merge skipped")]
    MissingBodyRegion,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_compose_error_display() {
        let err = ComposeError::CircularInclude("nav".into());
        assert!(format!("{err}").contains("`nav`"));

        let err = ComposeError::ComponentRead {
            name: "footer".into(),
            path: PathBuf::from("components/footer.html"),
            source: Error::new(ErrorKind::NotFound, "file not found"),
        };
        let display = format!("{err}");
        assert!(display.contains("`footer`"));
        assert!(display.contains("components/footer.html"));

        let err = ComposeError::MissingPlaceholder(PathBuf::from("base.html"));
        assert!(format!("{err}").contains("base.html"));
    }
}
