use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-file failures raised while building a model graph.
///
/// None of these abort a scan: the graph builder logs them and moves on to
/// the next candidate file.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("read {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no namespace/class declaration in {path}")]
    ClassPatternNotFound { path: PathBuf },
}

impl ScanError {
    pub fn path(&self) -> &Path {
        match self {
            ScanError::FileUnreadable { path, .. } => path,
            ScanError::ClassPatternNotFound { path } => path,
        }
    }
}
