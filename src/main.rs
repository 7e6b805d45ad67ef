// SiteLog - main.rs
//
// Command-line front end. Handles:
// 1. CLI argument parsing
// 2. Config file loading and validation
// 3. Diagnostics initialisation (debug mode support)
// 4. Logging the given values, JSON documents, stdin lines or a stack dump

use clap::Parser;
use sitelog::platform::config::{self, FileLogConfig, PlatformPaths};
use sitelog::platform::sink::{self, Sink, StdoutSink};
use sitelog::util::constants;
use sitelog::{LogValue, Logger, Severity, SiteLogError};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

/// SiteLog - log values with call-site attribution.
///
/// Values are written to the console (or the tracing subscriber) and,
/// with --save, appended to hourly rotating files.
#[derive(Parser, Debug)]
#[command(name = "sitelog", version, about)]
struct Cli {
    /// Values to log. Several values are enumerated as arguments.
    values: Vec<String>,

    /// Severity: verbose, debug, info, warn, error, assert (or v/d/i/w/e/a).
    #[arg(short = 's', long = "severity", default_value = "info")]
    severity: Severity,

    /// Tag attached to every record (overrides config).
    #[arg(short = 't', long = "tag")]
    tag: Option<String>,

    /// Treat each value as a JSON document and pretty-print it.
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Read values from stdin, one record per line.
    #[arg(long = "stdin")]
    stdin: bool,

    /// Dump the current stack trace.
    #[arg(long = "trace")]
    trace: bool,

    /// Persist records to hourly log files.
    #[arg(long = "save")]
    save: bool,

    /// Existing directory for log files (implies --save).
    #[arg(long = "dir")]
    dir: Option<PathBuf>,

    /// Log file name prefix.
    #[arg(long = "prefix")]
    prefix: Option<String>,

    /// Config file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write records to stdout even when a tracing subscriber is installed.
    #[arg(long = "stdout")]
    stdout: bool,

    /// Enable debug diagnostics (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        tracing::error!(error = %e, "SiteLog failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Configure the process-wide logger from `cli` and log the requested
/// records. Invalid file logging configuration and unreadable stdin are
/// fatal.
fn run(cli: &Cli) -> Result<(), SiteLogError> {
    let platform_paths = PlatformPaths::resolve();
    let config_path = cli.config.clone().unwrap_or_else(|| {
        platform_paths
            .config_dir
            .join(constants::CONFIG_FILE_NAME)
    });

    let (loaded, warnings) = config::load_config(&config_path)?;

    sitelog::util::logging::init(cli.debug, loaded.log_level.as_deref());
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let mut logger_config = loaded.logger;
    if let Some(tag) = cli.tag.clone() {
        logger_config.tag = tag;
    }

    if cli.save || cli.dir.is_some() {
        let file_log = file_log_config(cli, logger_config.file_log.as_ref(), &platform_paths)?;
        logger_config.file_log = Some(file_log);
    }

    let sink: Arc<dyn Sink> = if cli.stdout {
        Arc::new(StdoutSink)
    } else {
        sink::probe_sink()
    };

    tracing::debug!(
        version = constants::APP_VERSION,
        tag = %logger_config.tag,
        file_log = logger_config.file_log.is_some(),
        "SiteLog starting"
    );
    sitelog::global::init(Logger::with_sink(logger_config, sink));

    if cli.trace {
        sitelog::log_trace!();
    }

    let values = if cli.stdin {
        read_stdin_lines()?
    } else {
        cli.values.clone()
    };

    if cli.json {
        for value in &values {
            log_json_value(value);
        }
    } else if cli.stdin {
        for value in &values {
            sitelog::log_to!(sitelog::global::get(), cli.severity, value);
        }
    } else if !cli.trace || !values.is_empty() {
        let args: Vec<&dyn LogValue> = values.iter().map(|v| v as &dyn LogValue).collect();
        sitelog::global::with(|logger| logger.log(cli.severity, &sitelog::callsite!(), &args));
    }

    sitelog::global::shutdown();
    Ok(())
}

/// Resolve the directory and prefix for --save / --dir.
///
/// Precedence: --dir > config [file] directory > platform log directory.
/// Only the platform default is created on demand; explicit directories
/// must already exist.
fn file_log_config(
    cli: &Cli,
    configured: Option<&FileLogConfig>,
    paths: &PlatformPaths,
) -> Result<FileLogConfig, sitelog::ConfigError> {
    let prefix = cli
        .prefix
        .clone()
        .or_else(|| configured.map(|c| c.prefix().to_string()))
        .unwrap_or_else(|| constants::DEFAULT_FILE_PREFIX.to_string());

    if let Some(dir) = &cli.dir {
        return FileLogConfig::new(dir, prefix);
    }
    if let Some(configured) = configured {
        return FileLogConfig::new(configured.directory(), prefix);
    }

    if let Err(e) = std::fs::create_dir_all(&paths.log_dir) {
        tracing::warn!(
            path = %paths.log_dir.display(),
            error = %e,
            "Could not create default log directory"
        );
    }
    FileLogConfig::new(&paths.log_dir, prefix)
}

fn log_json_value(value: &str) {
    match serde_json::from_str::<serde_json::Value>(value) {
        Ok(doc) => sitelog::log_json!(doc),
        Err(e) => {
            tracing::debug!(error = %e, "Value is not valid JSON; logging it verbatim");
            sitelog::global::with(|logger| logger.json_str(&sitelog::callsite!(), value));
        }
    }
}

fn read_stdin_lines() -> std::io::Result<Vec<String>> {
    std::io::stdin().lock().lines().collect()
}
