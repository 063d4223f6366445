use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Source PDF not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to load '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Nothing to merge")]
    NoSources,
}

impl ComposerError {
    /// The file the failure concerns, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ComposerError::NotFound(path)
            | ComposerError::Load { path, .. }
            | ComposerError::Write { path, .. } => Some(path),
            ComposerError::Pdf(_) | ComposerError::NoSources => None,
        }
    }
}
