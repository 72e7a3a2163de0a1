//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

use std::path::PathBuf;

pub fn base_html() -> PathBuf {
    "src/base.html".into()
}

pub fn output_dir() -> PathBuf {
    "dist".into()
}

pub fn draft_prefix() -> String {
    "_".into()
}

// ============================================================================
// [dirs] Section Defaults
// ============================================================================

pub mod dirs {
    use std::path::PathBuf;

    pub fn pages() -> PathBuf {
        "src/pages".into()
    }

    pub fn posts() -> PathBuf {
        "src/posts".into()
    }

    pub fn assets() -> PathBuf {
        "src/assets".into()
    }

    pub fn styles() -> PathBuf {
        "src/styles".into()
    }

    pub fn scripts() -> PathBuf {
        "src/scripts".into()
    }

    pub fn components() -> PathBuf {
        "src/components".into()
    }
}
