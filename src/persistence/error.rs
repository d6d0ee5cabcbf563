//! Persistence error types.
//!
//! Only the I/O edge can fail; the simulation itself has no error paths.

use std::fmt;
use std::path::PathBuf;

/// Errors raised while loading or saving the leaderboard.
#[derive(Debug)]
pub enum PersistError {
    /// Reading, writing or renaming the file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file exists but is not a valid leaderboard document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The in-memory leaderboard could not be encoded.
    Serialize(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io { path, source } => {
                write!(f, "leaderboard I/O failed for '{}': {}", path.display(), source)
            }
            PersistError::Parse { path, source } => {
                write!(f, "leaderboard file '{}' is malformed: {}", path.display(), source)
            }
            PersistError::Serialize(source) => {
                write!(f, "failed to encode leaderboard: {}", source)
            }
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io { source, .. } => Some(source),
            PersistError::Parse { source, .. } => Some(source),
            PersistError::Serialize(source) => Some(source),
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(source: serde_json::Error) -> Self {
        PersistError::Serialize(source)
    }
}

/// Convenience alias: a `Result` using `PersistError` as the error type.
pub type PersistResult<T> = Result<T, PersistError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_names_path() {
        let err = PersistError::Io {
            path: PathBuf::from("scores.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("scores.json"));
        assert!(message.contains("denied"));
        assert!(err.source().is_some());
    }
}
