// SiteLog - app/logger.rs
//
// The logger facade. Resolves the caller, renders the body, forwards the
// result to the sink in bounded chunks and, when configured, appends it to
// the hourly log file.
//
// Every entry point checks the enabled flag before doing any work. Failures
// inside the facility (JSON rendering, file I/O, caller resolution) are
// reported as Error records on the sink and never reach the caller.

use crate::core::caller::{self, CallerInfo, StackFrame};
use crate::core::chunk;
use crate::core::format;
use crate::core::model::{CallSite, LogValue, Severity};
use crate::platform::clock::{Clock, SystemClock};
use crate::platform::config::LoggerConfig;
use crate::platform::file_log::FileLogWriter;
use crate::platform::sink::{self, Sink};
use crate::util::constants;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// A configured logger. Cheap to share behind an `Arc`; all methods take
/// `&self` and run entirely on the calling thread.
pub struct Logger {
    config: LoggerConfig,
    sink: Arc<dyn Sink>,
    clock: Arc<dyn Clock>,
    file_writer: Option<FileLogWriter>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl Logger {
    /// Build a logger writing to the sink picked by [`sink::probe_sink`].
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_sink(config, sink::probe_sink())
    }

    /// Build a logger writing to `sink`.
    pub fn with_sink(config: LoggerConfig, sink: Arc<dyn Sink>) -> Self {
        let file_writer = config.file_log.clone().map(FileLogWriter::new);
        Self {
            config,
            sink,
            clock: Arc::new(SystemClock),
            file_writer,
        }
    }

    /// Replace the wall clock used for file bucketing and line timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn tag(&self) -> &str {
        &self.config.tag
    }

    // =========================================================================
    // Call-site entry points
    // =========================================================================

    /// Log `args` at `severity`, attributed to `site`.
    pub fn log(&self, severity: Severity, site: &CallSite, args: &[&dyn LogValue]) {
        if !self.config.enabled {
            return;
        }
        let header = CallerInfo::from(site).header();
        let body = format::format_values(args);
        self.dispatch(severity, &header, &body);
    }

    /// Pretty-print `payload` as JSON. Always logged at Debug.
    ///
    /// If the payload cannot be represented as JSON, only an Error record
    /// describing the failure is written.
    pub fn json<T: Serialize + ?Sized>(&self, site: &CallSite, payload: &T) {
        if !self.config.enabled {
            return;
        }
        let header = CallerInfo::from(site).header();
        match format::format_json(payload) {
            Ok(json) => self.emit(Severity::Debug, &format::compose_json(&header, &json)),
            Err(e) => {
                tracing::warn!(error = %e, "JSON payload could not be rendered");
                self.emit(Severity::Error, &format::stack_trace_string(&e));
            }
        }
    }

    /// Log pre-formatted JSON text verbatim at Debug.
    pub fn json_str(&self, site: &CallSite, text: &str) {
        if !self.config.enabled {
            return;
        }
        let header = CallerInfo::from(site).header();
        self.emit(
            Severity::Debug,
            &format::compose_json(&header, &format::format_json_str(text)),
        );
    }

    /// Dump the current stack at Debug, without the facility's own frames.
    pub fn trace(&self, site: &CallSite) {
        if !self.config.enabled {
            return;
        }
        let header = CallerInfo::from(site).header();
        let body = format::format_trace(&caller::capture_stack());
        self.emit(Severity::Debug, &format!("{header}{body}"));
    }

    // =========================================================================
    // Tracked entry points
    //
    // For callers that cannot use the macros. File and line come from
    // `#[track_caller]`; the method name comes from a captured backtrace,
    // which makes these considerably slower than `log`.
    // =========================================================================

    #[track_caller]
    pub fn v(&self, args: &[&dyn LogValue]) {
        self.log_tracked(Severity::Verbose, Location::caller(), args);
    }

    #[track_caller]
    pub fn d(&self, args: &[&dyn LogValue]) {
        self.log_tracked(Severity::Debug, Location::caller(), args);
    }

    #[track_caller]
    pub fn i(&self, args: &[&dyn LogValue]) {
        self.log_tracked(Severity::Info, Location::caller(), args);
    }

    #[track_caller]
    pub fn w(&self, args: &[&dyn LogValue]) {
        self.log_tracked(Severity::Warn, Location::caller(), args);
    }

    #[track_caller]
    pub fn e(&self, args: &[&dyn LogValue]) {
        self.log_tracked(Severity::Error, Location::caller(), args);
    }

    #[track_caller]
    pub fn a(&self, args: &[&dyn LogValue]) {
        self.log_tracked(Severity::Assert, Location::caller(), args);
    }

    fn log_tracked(&self, severity: Severity, location: &Location<'_>, args: &[&dyn LogValue]) {
        if !self.config.enabled {
            return;
        }
        let header = self.tracked_header(location);
        let body = format::format_values(args);
        self.dispatch(severity, &header, &body);
    }

    fn tracked_header(&self, location: &Location<'_>) -> String {
        let frames = caller::capture_stack();
        let skip = caller::facility_depth(&frames);
        let function = match caller::resolve_frame(&frames, skip) {
            Ok(frame) => frame.function.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Caller frame not found on captured stack");
                self.report("caller resolution failed :", &e);
                String::new()
            }
        };
        CallerInfo::from_frame(&StackFrame {
            file: location.file().to_string(),
            module_path: String::new(),
            function,
            line: i64::from(location.line()),
        })
        .header()
    }

    // =========================================================================
    // Output
    // =========================================================================

    fn dispatch(&self, severity: Severity, header: &str, body: &str) {
        if let Some(writer) = &self.file_writer {
            self.persist(writer, header, body);
        }
        self.emit(severity, &format!("{header}{body}"));
    }

    fn persist(&self, writer: &FileLogWriter, header: &str, body: &str) {
        let now = self.clock.now();
        let handle = writer.handle_at(&now);

        match writer.ensure_file(&handle) {
            Ok(true) => self.emit(
                Severity::Info,
                &format!("create log file local:{}", handle.path.display()),
            ),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = %e, "Log file creation failed");
                self.report("log create file failed :", &e);
            }
        }

        if let Err(e) = writer.write_at(&handle, &now, header, body) {
            tracing::warn!(path = %e.path().display(), error = %e, "Log file append failed");
            self.report("log printFile failed :", &e);
        }
    }

    fn report<E: Error + 'static>(&self, context: &str, err: &E) {
        self.emit(
            Severity::Error,
            &format!(
                "{context}{}{}",
                constants::LINE_SEPARATOR,
                format::stack_trace_string(err)
            ),
        );
    }

    fn emit(&self, severity: Severity, message: &str) {
        chunk::write_chunked(message, constants::MAX_CHUNK_CHARS, |part| {
            self.sink.write(severity, &self.config.tag, part)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::clock::FixedClock;
    use crate::platform::sink::MemorySink;
    use chrono::{Duration, NaiveDate};

    fn memory_logger(config: LoggerConfig) -> (Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Logger::with_sink(config, sink.clone()), sink)
    }

    #[test]
    fn test_log_header_and_body() {
        let (logger, sink) = memory_logger(LoggerConfig::new(true, "T"));
        let site = crate::callsite!();
        logger.log(Severity::Info, &site, &[&"hello"]);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Info);
        assert_eq!(records[0].tag, "T");
        assert_eq!(
            records[0].message,
            format!("[ (logger.rs:{})#test_log_header_and_body ] hello", site.line)
        );
    }

    #[test]
    fn test_disabled_logger_is_silent() {
        let (logger, sink) = memory_logger(LoggerConfig::new(false, "T"));
        let site = crate::callsite!();
        logger.log(Severity::Error, &site, &[&"x"]);
        logger.json(&site, &serde_json::json!({"a": 1}));
        logger.json_str(&site, "{}");
        logger.trace(&site);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_json_always_debug() {
        let (logger, sink) = memory_logger(LoggerConfig::default());
        let site = crate::callsite!();
        logger.json(&site, &serde_json::json!({"a": 1}));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Debug);
        assert!(records[0]
            .message
            .ends_with(&format!("{}{{\n    \"a\": 1\n}}", constants::LINE_SEPARATOR)));
    }

    #[test]
    fn test_json_failure_reports_error_only() {
        let (logger, sink) = memory_logger(LoggerConfig::default());
        let mut bad = std::collections::BTreeMap::new();
        bad.insert(vec![1u8], 1);
        logger.json(&crate::callsite!(), &bad);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Error);
        assert!(records[0].message.contains("serde_json"));
    }

    #[test]
    fn test_long_message_is_chunked() {
        let (logger, sink) = memory_logger(LoggerConfig::default());
        let long = "z".repeat(9_000);
        logger.log(Severity::Warn, &crate::callsite!(), &[&long]);

        let records = sink.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.severity == Severity::Warn));
        let joined: String = records.iter().map(|r| r.message.as_str()).collect();
        assert!(joined.ends_with(&long));
    }

    #[test]
    fn test_file_persistence_rotates_by_hour() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig::new(true, "T")
            .with_log_dir(dir.path(), "unit_")
            .unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(13, 15, 0)
            .unwrap();
        let clock = Arc::new(FixedClock::new(start));
        let (logger, sink) = memory_logger(config);
        let logger = logger.with_clock(clock.clone());

        logger.log(Severity::Info, &crate::callsite!(), &[&"first"]);
        clock.advance(Duration::minutes(10));
        logger.log(Severity::Info, &crate::callsite!(), &[&"second"]);
        clock.advance(Duration::hours(1));
        logger.log(Severity::Info, &crate::callsite!(), &[&"third"]);

        let first_file = dir.path().join("unit_2024-02-29_13.log");
        let second_file = dir.path().join("unit_2024-02-29_14.log");
        let content = std::fs::read_to_string(&first_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("13:15:00.000 [ (logger.rs:"));
        assert!(lines[0].ends_with("] first"));
        assert!(lines[1].ends_with("] second"));
        assert!(std::fs::read_to_string(&second_file)
            .unwrap()
            .ends_with(&format!("] third{}", constants::LINE_SEPARATOR)));

        let created = sink
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("create log file local:"))
            .count();
        assert_eq!(created, 2);
    }
}
