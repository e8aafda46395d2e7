//! Error types shared across VGSync crates.

use std::path::PathBuf;

/// Top-level error type for VGSync operations.
#[derive(Debug, thiserror::Error)]
pub enum VgsyncError {
    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Editing error: {message}")]
    Edit { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using VgsyncError.
pub type VgsyncResult<T> = Result<T, VgsyncError>;

impl VgsyncError {
    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn edit(msg: impl Into<String>) -> Self {
        Self::Edit {
            message: msg.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors_format_messages() {
        let err = VgsyncError::edit("interval too small");
        assert_eq!(err.to_string(), "Editing error: interval too small");

        let err = VgsyncError::export("nothing to export");
        assert_eq!(err.to_string(), "Export error: nothing to export");
    }

    #[test]
    fn test_io_error_converts() {
        fn open_missing() -> VgsyncResult<String> {
            Ok(std::fs::read_to_string("/definitely/not/here/vgsync.json")?)
        }
        assert!(matches!(open_missing(), Err(VgsyncError::Io(_))));
    }
}
