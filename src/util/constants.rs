// SiteLog - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SiteLog";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "SiteLog";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Root path segment of this crate's symbols. Frames whose function path
/// starts with this belong to the facility and are skipped when walking a
/// captured stack.
pub const CRATE_PATH: &str = env!("CARGO_CRATE_NAME");

// =============================================================================
// Message formatting
// =============================================================================

/// Body used when a log call carries no arguments.
pub const DEFAULT_MESSAGE: &str = "execute";

/// Text rendered for an absent (null) argument.
pub const NULL_TEXT: &str = "null";

/// Label used for each entry of a multi-argument body: `argument[i]=...`.
pub const ARGUMENT_LABEL: &str = "argument";

/// Indentation width (spaces) for pretty-printed JSON payloads.
pub const JSON_INDENT: usize = 4;

/// Source-file suffix appended to the owning module name to form the
/// display class name of a caller.
pub const SOURCE_SUFFIX: &str = ".rs";

/// Marker separating a module path from the type that owns a method.
pub const NESTED_TYPE_MARKER: char = '$';

/// Method name rendered when a frame carries no usable function name.
pub const UNKNOWN_METHOD: &str = "<unknown>";

/// Platform line terminator used between header and JSON payloads and at
/// the end of every persisted log line.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";

/// Platform line terminator used between header and JSON payloads and at
/// the end of every persisted log line.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

// =============================================================================
// Sink limits
// =============================================================================

/// Maximum number of characters forwarded to the sink in a single call.
/// Longer messages are split into consecutive windows of this size.
pub const MAX_CHUNK_CHARS: usize = 4000;

// =============================================================================
// Defaults
// =============================================================================

/// Tag attached to every sink record unless configured otherwise.
pub const DEFAULT_TAG: &str = "SiteLog";

/// File-name prefix for persisted log files unless configured otherwise.
pub const DEFAULT_FILE_PREFIX: &str = "SiteLog_";

/// Suffix of every persisted log file.
pub const LOG_FILE_SUFFIX: &str = ".log";

/// chrono format of the hourly time bucket embedded in log file names.
pub const BUCKET_FORMAT: &str = "%Y-%m-%d_%H";

/// chrono format of the time prefix written at the start of each file line.
pub const LINE_TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Default subdirectory (under the platform data dir) for persisted logs.
pub const LOG_DIR_NAME: &str = "logs";

/// Config file name looked up by the binary when `--config` is omitted.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Diagnostics
// =============================================================================

/// Default `tracing` level for the facility's own diagnostics.
pub const DEFAULT_LOG_LEVEL: &str = "info";
