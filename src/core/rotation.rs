// SiteLog - core/rotation.rs
//
// Hourly log file naming. Every write re-derives its file from the current
// time, so calls within the same hour land in the same file without any
// cached handle.

use crate::util::constants;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// The file a persisted line goes to, resolved for one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileHandle {
    pub directory: PathBuf,
    pub prefix: String,
    /// Hour bucket, `yyyy-MM-dd_HH`.
    pub bucket_key: String,
    /// `directory/<prefix><bucket_key>.log`
    pub path: PathBuf,
}

impl LogFileHandle {
    /// Resolve the file for a write at local time `at`.
    pub fn resolve(directory: &Path, prefix: &str, at: &NaiveDateTime) -> Self {
        let bucket_key = bucket_key(at);
        let path = directory.join(format!(
            "{prefix}{bucket_key}{}",
            constants::LOG_FILE_SUFFIX
        ));
        Self {
            directory: directory.to_path_buf(),
            prefix: prefix.to_string(),
            bucket_key,
            path,
        }
    }
}

/// Hour-granularity bucket key for `at`.
pub fn bucket_key(at: &NaiveDateTime) -> String {
    at.format(constants::BUCKET_FORMAT).to_string()
}

/// One persisted line: `HH:mm:ss.SSS <header><body>` plus the line terminator.
pub fn format_line(at: &NaiveDateTime, header: &str, body: &str) -> String {
    format!(
        "{} {header}{body}{}",
        at.format(constants::LINE_TIME_FORMAT),
        constants::LINE_SEPARATOR
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn test_bucket_key_hour_granularity() {
        assert_eq!(bucket_key(&at(9, 0, 0, 0)), "2024-03-05_09");
        assert_eq!(bucket_key(&at(9, 59, 59, 999)), "2024-03-05_09");
        assert_eq!(bucket_key(&at(10, 0, 0, 0)), "2024-03-05_10");
    }

    #[test]
    fn test_handle_path() {
        let handle = LogFileHandle::resolve(Path::new("/var/log/app"), "App_", &at(23, 1, 2, 3));
        assert_eq!(handle.bucket_key, "2024-03-05_23");
        assert_eq!(
            handle.path,
            Path::new("/var/log/app").join("App_2024-03-05_23.log")
        );
    }

    #[test]
    fn test_same_hour_same_path() {
        let dir = Path::new("logs");
        let a = LogFileHandle::resolve(dir, "p_", &at(14, 0, 1, 0));
        let b = LogFileHandle::resolve(dir, "p_", &at(14, 59, 0, 0));
        let c = LogFileHandle::resolve(dir, "p_", &at(15, 0, 0, 0));
        assert_eq!(a.path, b.path);
        assert_ne!(a.path, c.path);
    }

    #[test]
    fn test_format_line() {
        let line = format_line(&at(8, 5, 3, 42), "[ (a.rs:1)#f ] ", "hello");
        assert_eq!(
            line,
            format!("08:05:03.042 [ (a.rs:1)#f ] hello{}", constants::LINE_SEPARATOR)
        );
    }
}
