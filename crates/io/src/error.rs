use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum IoError {
    /// Source workbook or a named sheet is missing or unreadable.
    Load { path: PathBuf, message: String },
    /// Destination could not be written.
    Export { path: PathBuf, message: String },
}

impl IoError {
    pub fn load(path: &Path, message: impl Into<String>) -> Self {
        Self::Load { path: path.to_path_buf(), message: message.into() }
    }

    pub fn export(path: &Path, message: impl Into<String>) -> Self {
        Self::Export { path: path.to_path_buf(), message: message.into() }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Load { path, .. } | Self::Export { path, .. } => path,
        }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, message } => {
                write!(f, "cannot load {}: {message}", path.display())
            }
            Self::Export { path, message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for IoError {}
