//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating `velcro.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid config file")]
    Toml(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_keeps_source() {
        let err = ConfigError::Io(
            PathBuf::from("velcro.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert!(format!("{err}").contains("velcro.toml"));
        assert_eq!(err.source().unwrap().to_string(), "file not found");
    }

    #[test]
    fn test_validation_display() {
        let err = ConfigError::Validation("[output_dir] must not be empty".into());
        assert_eq!(
            format!("{err}"),
            "config validation error: [output_dir] must not be empty"
        );
    }
}
