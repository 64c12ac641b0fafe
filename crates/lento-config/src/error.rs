//! Errors for settings and preset files.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading a settings or preset file.
    Read,
    /// Writing a settings or preset file.
    Write,
    /// Creating the directory that holds a settings file.
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOp::Read => "read",
            FileOp::Write => "write",
            FileOp::CreateDir => "create directory",
        })
    }
}

/// Anything that can go wrong loading, saving or applying settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem failure.
    #[error("cannot {op} '{}': {source}", path.display())]
    Io {
        /// What was being attempted.
        op: FileOp,
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML, or a field of the wrong type.
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML.
    #[error("cannot serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No factory preset by this name.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    /// Values outside their ranges.
    #[error("invalid settings: {0}")]
    Invalid(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    fn io(op: FileOp, path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file operation behind an I/O failure.
    pub fn file_op(&self) -> Option<FileOp> {
        match self {
            ConfigError::Io { op, .. } => Some(*op),
            _ => None,
        }
    }
}

/// Read a whole text file.
pub(crate) fn read_text(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::io(FileOp::Read, path, e))
}

/// Write a text file, creating missing parent directories first.
pub(crate) fn write_text(path: &Path, text: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::io(FileOp::CreateDir, parent, e))?;
    }
    std::fs::write(path, text).map_err(|e| ConfigError::io(FileOp::Write, path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use std::error::Error;

    #[test]
    fn missing_file_names_op_and_path() {
        let path = Path::new("/nonexistent/lento/settings.toml");
        let err = read_text(path).unwrap_err();
        assert_eq!(err.file_op(), Some(FileOp::Read));
        assert!(err.source().is_some());
        let msg = err.to_string();
        assert!(msg.starts_with("cannot read '/nonexistent/lento/settings.toml'"), "{msg}");
    }

    #[test]
    fn op_display() {
        assert_eq!(FileOp::CreateDir.to_string(), "create directory");
        assert_eq!(FileOp::Write.to_string(), "write");
    }

    #[test]
    fn non_io_errors_have_no_op() {
        let err = ConfigError::UnknownPreset("lofi".to_string());
        assert_eq!(err.file_op(), None);
        assert_eq!(err.to_string(), "unknown preset 'lofi'");
    }

    #[test]
    fn conversions() {
        let err: ConfigError = ValidationError::NotFinite {
            field: "speed".to_string(),
        }
        .into();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("speed"));

        let parse = toml::from_str::<toml::Table>("speed = ").unwrap_err();
        let err: ConfigError = parse.into();
        assert!(err.to_string().starts_with("invalid TOML"));
    }
}
