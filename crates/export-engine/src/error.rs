use std::path::PathBuf;

use vgsync_common::error::VgsyncError;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No videos in playlist")]
    NoSources,

    #[error("All time ranges are cut! Nothing to export.")]
    NothingToExport,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize export job: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ExportError> for VgsyncError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Io { source, .. } => VgsyncError::Io(source),
            other => VgsyncError::export(other.to_string()),
        }
    }
}

pub(crate) fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf, ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&path, contents).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
