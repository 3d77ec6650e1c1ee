use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Faults that abort the pre-build step.
///
/// A missing `sys.lua` is not one of them; see [`crate::stager::StageOutcome`].
#[derive(Debug, Error)]
pub enum StageError {
    /// Neither a command-line argument nor `PROJECT_DIR` named a project root.
    #[error("project directory not set: pass it as an argument or set PROJECT_DIR")]
    MissingProjectDir,

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("failed to update metadata of {}: {source}", .path.display())]
    Metadata { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", .path.display())]
    ReadAsset { path: PathBuf, source: io::Error },

    /// Writing a status line to the console failed.
    #[error("failed to write status output: {0}")]
    Report(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, StageError>;
