// SiteLog - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps its cause so the
// full chain can be rendered into an Error record.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for the fatal startup paths of the `sitelog`
/// binary. Errors inside the logger itself never escape; they become Error
/// records on the sink.
#[derive(Debug)]
pub enum SiteLogError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Values could not be read from standard input.
    Input(io::Error),
}

impl fmt::Display for SiteLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Input(e) => write!(f, "Failed to read stdin: {e}"),
        }
    }
}

impl std::error::Error for SiteLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Input(e) => Some(e),
        }
    }
}

impl From<io::Error> for SiteLogError {
    fn from(e: io::Error) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised while building or loading the logger configuration.
///
/// These are fatal: logging to files cannot proceed until corrected.
#[derive(Debug)]
pub enum ConfigError {
    /// The configured log directory does not exist.
    DirectoryNotFound { path: PathBuf },

    /// The configured log directory exists but is not a directory.
    NotADirectory { path: PathBuf },

    /// File logging was enabled without naming a directory.
    MissingDirectory,

    /// The config file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The config file is not valid TOML for the expected shape.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryNotFound { path } => {
                write!(f, "Log directory '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => write!(
                f,
                "Log directory '{}' is not a directory; re-create it as one",
                path.display()
            ),
            Self::MissingDirectory => write!(
                f,
                "File logging is enabled but no log directory is configured. \
                 Set [file] directory in config."
            ),
            Self::Io { path, source } => {
                write!(f, "Could not read config '{}': {source}", path.display())
            }
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse config '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for SiteLogError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Resolve errors
// ---------------------------------------------------------------------------

/// Errors raised when a caller cannot be located on a captured stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The frame offset points past the end of the captured stack. This
    /// means the facility's own frame count no longer matches the runtime.
    StackTooShallow { skip: usize, depth: usize },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackTooShallow { skip, depth } => write!(
                f,
                "Frame index {skip} is out of range for a stack of depth {depth}"
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

// ---------------------------------------------------------------------------
// File log errors
// ---------------------------------------------------------------------------

/// Errors raised while persisting a line to the hourly log file.
#[derive(Debug)]
pub enum FileLogError {
    /// The bucket file did not exist and could not be created.
    Create { path: PathBuf, source: io::Error },

    /// The line could not be appended to the bucket file.
    Append { path: PathBuf, source: io::Error },
}

impl FileLogError {
    /// Path of the file involved in the failure.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Create { path, .. } | Self::Append { path, .. } => path,
        }
    }
}

impl fmt::Display for FileLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { path, source } => {
                write!(f, "Failed to create log file '{}': {source}", path.display())
            }
            Self::Append { path, source } => {
                write!(f, "Failed to append to log file '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FileLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Create { source, .. } | Self::Append { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display_names_path() {
        let err = ConfigError::DirectoryNotFound {
            path: PathBuf::from("/no/such/dir"),
        };
        assert!(err.to_string().contains("/no/such/dir"));
    }

    #[test]
    fn test_file_log_error_preserves_source() {
        let err = FileLogError::Append {
            path: PathBuf::from("a.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.path(), &PathBuf::from("a.log"));
        let inner = err.source();
        assert!(inner.is_some());
        assert!(inner.unwrap().to_string().contains("denied"));
    }

    #[test]
    fn test_site_log_error_wraps_config_chain() {
        let config = ConfigError::Io {
            path: PathBuf::from("config.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let top: SiteLogError = config.into();
        assert!(top.to_string().starts_with("Configuration error: "));
        let root = top.source().and_then(|e| e.source());
        assert!(root.is_some_and(|e| e.to_string() == "denied"));
    }

    #[test]
    fn test_site_log_error_from_stdin_failure() {
        let top: SiteLogError = io::Error::new(io::ErrorKind::InvalidData, "not utf-8").into();
        assert!(matches!(top, SiteLogError::Input(_)));
        assert_eq!(top.to_string(), "Failed to read stdin: not utf-8");
    }

    #[test]
    fn test_resolve_error_display() {
        let err = ResolveError::StackTooShallow { skip: 7, depth: 3 };
        assert_eq!(
            err.to_string(),
            "Frame index 7 is out of range for a stack of depth 3"
        );
    }
}
