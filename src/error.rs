//! Global error handling for evbgen
//!
//! Every failure is annotated with the path and phase it belongs to and
//! propagated to the caller unchanged; nothing is recovered internally.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A directory listing or entry stat that failed while reading a tree
#[derive(Error, Debug)]
#[error("'{}': {source}", path.display())]
pub struct FilesystemError {
    /// Path that could not be listed or inspected
    pub path: PathBuf,
    /// Underlying OS error
    #[source]
    pub source: io::Error,
}

impl FilesystemError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Global error type for evbgen operations
#[derive(Error, Debug)]
pub enum EvbError {
    /// Template file missing or unreadable
    #[error("Failed to load template. Template path: '{}'. {source}", path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Template file is not valid UTF-16LE text
    #[error("Failed to load template. Template path: '{}'. {reason}", path.display())]
    TemplateDecode { path: PathBuf, reason: String },

    /// Directory tree could not be read
    #[error("Failed to read the directory tree of: '{}'. {source}", root.display())]
    TreeRead {
        root: PathBuf,
        #[source]
        source: FilesystemError,
    },

    /// Project file could not be written
    #[error("Failed to write project file: '{}'. {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File system errors outside of the phases above
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for evbgen operations
pub type Result<T> = std::result::Result<T, EvbError>;

/// Creates an EvbError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::EvbError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Lets the CLI keep an io::Result signature
impl From<EvbError> for io::Error {
    fn from(err: EvbError) -> Self {
        io::Error::new(io::ErrorKind::Other, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_read_message_names_root_and_nested_path() {
        let err = EvbError::TreeRead {
            root: PathBuf::from("/data/pack"),
            source: FilesystemError::new(
                "/data/pack/locked",
                io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            ),
        };
        let message = err.to_string();
        assert!(message.contains("Failed to read the directory tree of: '/data/pack'"));
        assert!(message.contains("/data/pack/locked"));
    }

    #[test]
    fn test_config_macro() {
        fn check(flag: bool) -> Result<()> {
            ensure!(flag, Config, "flag was {}", flag);
            Ok(())
        }
        assert!(check(true).is_ok());
        let err = check(false).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: flag was false");
    }
}
