// SiteLog - lib.rs
//
// Library entry point. Call-site attributing logger: every record is
// prefixed with `[ (file:line)#method ] `, long records are split to fit the
// sink, and records can be persisted to hourly rotating files.
//
// Typical use:
//
//     let config = sitelog::LoggerConfig::new(true, "MyApp");
//     sitelog::global::init(sitelog::Logger::new(config));
//     sitelog::i!("connected", peer);
//     sitelog::log_json!(payload);

pub mod app;
pub mod core;
pub mod platform;
pub mod util;

// `crate::` keeps `core` pointing at our module rather than the core crate.
pub use crate::app::global;
pub use crate::app::logger::Logger;
pub use crate::core::caller::CallerInfo;
pub use crate::core::format::stack_trace_string;
pub use crate::core::model::{debug, display, CallSite, LogValue, Null, Severity};
pub use crate::platform::config::{FileLogConfig, LoggerConfig};
pub use crate::platform::sink::{MemorySink, Sink, StdoutSink, TracingSink};
pub use crate::util::error::{ConfigError, SiteLogError};

/// Capture the [`CallSite`] of the macro invocation.
#[macro_export]
macro_rules! callsite {
    () => {
        $crate::core::model::CallSite {
            file: ::std::file!(),
            line: ::std::line!(),
            module_path: ::std::module_path!(),
            function: {
                fn __sitelog_probe() {}
                $crate::core::model::function_path(__sitelog_probe)
            },
        }
    };
}

/// Log through an explicit logger: `log_to!(logger, Severity::Info, a, b)`.
///
/// `logger` may be a `Logger`, a reference to one, or an `Arc<Logger>`.
#[macro_export]
macro_rules! log_to {
    ($logger:expr, $severity:expr $(, $arg:expr)* $(,)?) => {
        $crate::app::logger::Logger::log(
            &$logger,
            $severity,
            &$crate::callsite!(),
            &[$(&$arg as &dyn $crate::core::model::LogValue),*],
        )
    };
}

/// Log at Verbose through the process-wide logger.
#[macro_export]
macro_rules! v {
    ($($arg:expr),* $(,)?) => {
        $crate::app::global::with(|__logger| {
            $crate::log_to!(__logger, $crate::core::model::Severity::Verbose $(, $arg)*)
        })
    };
}

/// Log at Debug through the process-wide logger.
#[macro_export]
macro_rules! d {
    ($($arg:expr),* $(,)?) => {
        $crate::app::global::with(|__logger| {
            $crate::log_to!(__logger, $crate::core::model::Severity::Debug $(, $arg)*)
        })
    };
}

/// Log at Info through the process-wide logger.
#[macro_export]
macro_rules! i {
    ($($arg:expr),* $(,)?) => {
        $crate::app::global::with(|__logger| {
            $crate::log_to!(__logger, $crate::core::model::Severity::Info $(, $arg)*)
        })
    };
}

/// Log at Warn through the process-wide logger.
#[macro_export]
macro_rules! w {
    ($($arg:expr),* $(,)?) => {
        $crate::app::global::with(|__logger| {
            $crate::log_to!(__logger, $crate::core::model::Severity::Warn $(, $arg)*)
        })
    };
}

/// Log at Error through the process-wide logger.
#[macro_export]
macro_rules! e {
    ($($arg:expr),* $(,)?) => {
        $crate::app::global::with(|__logger| {
            $crate::log_to!(__logger, $crate::core::model::Severity::Error $(, $arg)*)
        })
    };
}

/// Log at Assert through the process-wide logger.
#[macro_export]
macro_rules! a {
    ($($arg:expr),* $(,)?) => {
        $crate::app::global::with(|__logger| {
            $crate::log_to!(__logger, $crate::core::model::Severity::Assert $(, $arg)*)
        })
    };
}

/// Pretty-print a JSON document (any `Serialize` value, or pre-formatted
/// text) at Debug through the process-wide logger.
#[macro_export]
macro_rules! log_json {
    ($payload:expr $(,)?) => {
        $crate::app::global::with(|__logger| __logger.json(&$crate::callsite!(), &$payload))
    };
}

/// Dump the current stack at Debug through the process-wide logger.
#[macro_export]
macro_rules! log_trace {
    () => {
        $crate::app::global::with(|__logger| __logger.trace(&$crate::callsite!()))
    };
}
