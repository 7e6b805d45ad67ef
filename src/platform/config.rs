// SiteLog - platform/config.rs
//
// Logger configuration, platform data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for SiteLog data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/sitelog/ or %APPDATA%\SiteLog\)
    pub config_dir: PathBuf,

    /// Default directory for persisted log files.
    pub log_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let log_dir = proj_dirs.data_dir().join(constants::LOG_DIR_NAME);

            tracing::debug!(
                config = %config_dir.display(),
                logs = %log_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                log_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                log_dir: fallback.join(constants::LOG_DIR_NAME),
            }
        }
    }
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Where persisted log files go.
///
/// Only constructible through [`FileLogConfig::new`], which checks that the
/// directory exists and is a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogConfig {
    directory: PathBuf,
    prefix: String,
}

impl FileLogConfig {
    /// Validate `directory` eagerly; it is never re-checked at write time.
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let directory = directory.into();
        if !directory.exists() {
            return Err(ConfigError::DirectoryNotFound { path: directory });
        }
        if !directory.is_dir() {
            return Err(ConfigError::NotADirectory { path: directory });
        }
        Ok(Self {
            directory,
            prefix: prefix.into(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Everything a logger reads on each call. Set once before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// When false every log call returns before doing any work.
    pub enabled: bool,

    /// Tag attached to every sink record.
    pub tag: String,

    /// File persistence; `None` disables it.
    pub file_log: Option<FileLogConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tag: constants::DEFAULT_TAG.to_string(),
            file_log: None,
        }
    }
}

impl LoggerConfig {
    pub fn new(enabled: bool, tag: impl Into<String>) -> Self {
        Self {
            enabled,
            tag: tag.into(),
            file_log: None,
        }
    }

    /// Enable file persistence into an already validated directory.
    pub fn with_file_log(mut self, file_log: FileLogConfig) -> Self {
        self.file_log = Some(file_log);
        self
    }

    /// Validate `directory` and enable file persistence with `prefix`.
    pub fn with_log_dir(
        self,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(self.with_file_log(FileLogConfig::new(directory, prefix)?))
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[file]` section.
    pub file: FileSection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Whether log calls produce output at all.
    pub enabled: Option<bool>,
    /// Tag attached to every record.
    pub tag: Option<String>,
    /// Diagnostics level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// `[file]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FileSection {
    /// Persist records to hourly files.
    pub enabled: Option<bool>,
    /// Existing directory receiving the files.
    pub directory: Option<PathBuf>,
    /// File-name prefix.
    pub prefix: Option<String>,
}

/// Result of loading config.toml: the logger configuration plus the
/// diagnostics level, which is consumed before any logger exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedConfig {
    pub logger: LoggerConfig,
    pub log_level: Option<String>,
}

/// Load and validate a config file.
///
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a
/// warning. Recoverable problems with individual values produce warnings and
/// fall back to defaults. An enabled `[file]` section whose directory is
/// missing or invalid is fatal: file logging cannot proceed until corrected.
pub fn load_config(config_path: &Path) -> Result<(LoadedConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file found; using defaults");
        return Ok((LoadedConfig::default(), warnings));
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(source) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return Ok((LoadedConfig::default(), warnings));
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return Ok((LoadedConfig::default(), warnings));
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config file");

    let mut loaded = LoadedConfig::default();

    // -- Logging: enabled --
    if let Some(enabled) = raw.logging.enabled {
        loaded.logger.enabled = enabled;
    }

    // -- Logging: tag --
    if let Some(tag) = raw.logging.tag {
        if tag.trim().is_empty() {
            warnings.push(format!(
                "[logging] tag is empty. Using default (\"{}\").",
                constants::DEFAULT_TAG
            ));
        } else {
            loaded.logger.tag = tag;
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            loaded.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- File --
    let file_enabled = raw
        .file
        .enabled
        .unwrap_or(raw.file.directory.is_some());
    if file_enabled {
        let directory = raw.file.directory.ok_or(ConfigError::MissingDirectory)?;
        let prefix = raw
            .file
            .prefix
            .unwrap_or_else(|| constants::DEFAULT_FILE_PREFIX.to_string());
        loaded.logger.file_log = Some(FileLogConfig::new(directory, prefix)?);
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    Ok((loaded, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_file_log_config_requires_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            FileLogConfig::new(&missing, "p_"),
            Err(ConfigError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_file_log_config_rejects_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            FileLogConfig::new(&file, "p_"),
            Err(ConfigError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (loaded, warnings) = load_config(&dir.path().join("config.toml")).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(loaded.logger, LoggerConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir(&logs).unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            format!(
                "[logging]\nenabled = false\ntag = \"App\"\nlevel = \"debug\"\n\n\
                 [file]\ndirectory = {:?}\nprefix = \"app_\"\n",
                logs.display().to_string()
            ),
        )
        .unwrap();

        let (loaded, warnings) = load_config(&path).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
        assert!(!loaded.logger.enabled);
        assert_eq!(loaded.logger.tag, "App");
        assert_eq!(loaded.log_level.as_deref(), Some("debug"));
        let file_log = loaded.logger.file_log.unwrap();
        assert_eq!(file_log.directory(), logs.as_path());
        assert_eq!(file_log.prefix(), "app_");
    }

    #[test]
    fn test_invalid_toml_warns_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[logging\nenabled = ").unwrap();
        let (loaded, warnings) = load_config(&path).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(loaded, LoadedConfig::default());
    }

    #[test]
    fn test_empty_tag_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[logging]\ntag = \"  \"\n").unwrap();
        let (loaded, warnings) = load_config(&path).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(loaded.logger.tag, constants::DEFAULT_TAG);
    }

    #[test]
    fn test_file_enabled_without_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[file]\nenabled = true\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::MissingDirectory)
        ));
    }

    #[test]
    fn test_file_directory_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[file]\ndirectory = \"/definitely/not/here/sitelog\"\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::DirectoryNotFound { .. })
        ));
    }
}
