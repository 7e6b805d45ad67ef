// SiteLog - app/global.rs
//
// The process-wide logger used by the logging macros.
//
// Lifecycle:
//   - Before `init`, the macros use a default logger (enabled, default tag,
//     probed sink, no file persistence).
//   - `init` installs a configured logger; call it once at startup.
//   - `shutdown` uninstalls it; later calls fall back to the default.
// Re-configuring while other threads are logging is not supported: the
// swap itself is safe, but calls in flight finish on the old logger.

use crate::app::logger::Logger;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

static LOGGER: RwLock<Option<Arc<Logger>>> = RwLock::new(None);

/// Install `logger` as the process-wide logger, returning the previous one.
pub fn init(logger: Logger) -> Option<Arc<Logger>> {
    let logger = Arc::new(logger);
    tracing::debug!(config = ?logger.config(), "Installing process-wide logger");
    LOGGER
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(logger)
}

/// Remove the process-wide logger, returning it.
pub fn shutdown() -> Option<Arc<Logger>> {
    LOGGER.write().unwrap_or_else(PoisonError::into_inner).take()
}

/// Whether a logger has been installed with [`init`].
pub fn is_initialized() -> bool {
    LOGGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// The installed logger, or the default one.
pub fn get() -> Arc<Logger> {
    if let Some(logger) = LOGGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Arc::clone(logger);
    }
    default_logger()
}

/// Run `f` against the current process-wide logger.
pub fn with<R>(f: impl FnOnce(&Logger) -> R) -> R {
    let logger = get();
    f(&logger)
}

fn default_logger() -> Arc<Logger> {
    static DEFAULT: OnceLock<Arc<Logger>> = OnceLock::new();
    Arc::clone(DEFAULT.get_or_init(|| Arc::new(Logger::default())))
}
