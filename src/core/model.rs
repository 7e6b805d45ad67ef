// SiteLog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

// =============================================================================
// Severity
// =============================================================================

/// Severity of a log record, ordered from least to most severe.
///
/// There is no level filtering: every enabled call reaches the sink. The
/// severity only selects the sink channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    /// A condition that should never happen.
    Assert,
}

impl Severity {
    /// Returns all variants, least severe first.
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Verbose,
            Severity::Debug,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
            Severity::Assert,
        ]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Verbose => "Verbose",
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Warn => "Warn",
            Severity::Error => "Error",
            Severity::Assert => "Assert",
        }
    }

    /// One-letter label used as the line prefix on console sinks.
    pub fn short_label(&self) -> &'static str {
        match self {
            Severity::Verbose => "V",
            Severity::Debug => "D",
            Severity::Info => "I",
            Severity::Warn => "W",
            Severity::Error => "E",
            Severity::Assert => "A",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no known severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeverityError(pub String);

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a severity. Valid values: verbose, debug, info, warn, error, assert \
             (or v, d, i, w, e, a)",
            self.0
        )
    }
}

impl std::error::Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Case-insensitive; accepts the full label or the one-letter form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Severity::all()
            .iter()
            .copied()
            .find(|sev| {
                lower == sev.label().to_lowercase() || lower == sev.short_label().to_lowercase()
            })
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}

// =============================================================================
// Call site
// =============================================================================

/// Source location of a log call, captured at the call expression by the
/// `callsite!` macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Source file as reported by `file!()`.
    pub file: &'static str,

    /// Line of the call as reported by `line!()`.
    pub line: u32,

    /// Module containing the call as reported by `module_path!()`.
    pub module_path: &'static str,

    /// Fully-qualified path of the enclosing function, including any
    /// `{{closure}}` segments.
    pub function: &'static str,
}

/// Name of the probe function the `callsite!` macro declares inside the
/// caller's function body.
#[doc(hidden)]
pub const PROBE_FN: &str = "__sitelog_probe";

/// Path of the function that declares `probe`, derived from the probe's
/// type name.
#[doc(hidden)]
pub fn function_path<F>(_probe: F) -> &'static str {
    let name = std::any::type_name::<F>();
    name.strip_suffix(PROBE_FN)
        .and_then(|s| s.strip_suffix("::"))
        .unwrap_or(name)
}

// =============================================================================
// Argument values
// =============================================================================

/// A value that can appear as a log argument.
///
/// `render` returns `None` for an absent value, which is written as `null`.
pub trait LogValue {
    fn render(&self) -> Option<String>;
}

macro_rules! impl_log_value_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl LogValue for $ty {
                fn render(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_log_value_via_display!(
    str, String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64,
);

impl LogValue for fmt::Arguments<'_> {
    fn render(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl LogValue for Cow<'_, str> {
    fn render(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl LogValue for Path {
    fn render(&self) -> Option<String> {
        Some(self.display().to_string())
    }
}

impl LogValue for PathBuf {
    fn render(&self) -> Option<String> {
        Some(self.display().to_string())
    }
}

/// JSON `null` renders as the null sentinel and strings render unquoted.
impl LogValue for serde_json::Value {
    fn render(&self) -> Option<String> {
        match self {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl<T: LogValue> LogValue for Option<T> {
    fn render(&self) -> Option<String> {
        self.as_ref().and_then(LogValue::render)
    }
}

impl<T: LogValue + ?Sized> LogValue for &T {
    fn render(&self) -> Option<String> {
        (**self).render()
    }
}

impl<T: LogValue + ?Sized> LogValue for &mut T {
    fn render(&self) -> Option<String> {
        (**self).render()
    }
}

impl<T: LogValue + ?Sized> LogValue for Box<T> {
    fn render(&self) -> Option<String> {
        (**self).render()
    }
}

impl<T: LogValue + ?Sized> LogValue for Rc<T> {
    fn render(&self) -> Option<String> {
        (**self).render()
    }
}

impl<T: LogValue + ?Sized> LogValue for Arc<T> {
    fn render(&self) -> Option<String> {
        (**self).render()
    }
}

/// The explicit null argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl LogValue for Null {
    fn render(&self) -> Option<String> {
        None
    }
}

/// Adapter logging any `Display` type; see [`display`].
#[derive(Debug, Clone, Copy)]
pub struct DisplayValue<T>(pub T);

impl<T: fmt::Display> LogValue for DisplayValue<T> {
    fn render(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// Adapter logging any `Debug` type; see [`debug`].
#[derive(Debug, Clone, Copy)]
pub struct DebugValue<T>(pub T);

impl<T: fmt::Debug> LogValue for DebugValue<T> {
    fn render(&self) -> Option<String> {
        Some(format!("{:?}", self.0))
    }
}

/// Log `value` through its `Display` implementation.
pub fn display<T: fmt::Display>(value: T) -> DisplayValue<T> {
    DisplayValue(value)
}

/// Log `value` through its `Debug` implementation.
pub fn debug<T: fmt::Debug>(value: T) -> DebugValue<T> {
    DebugValue(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parses_label_and_letter() {
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("W".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!(" Assert ".parse::<Severity>().unwrap(), Severity::Assert);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Verbose < Severity::Debug);
        assert!(Severity::Error < Severity::Assert);
    }

    #[test]
    fn test_option_none_renders_null() {
        let missing: Option<String> = None;
        assert_eq!(missing.render(), None);
        assert_eq!(Some(42).render(), Some("42".to_string()));
        assert_eq!(Null.render(), None);
    }

    #[test]
    fn test_json_value_render() {
        assert_eq!(serde_json::Value::Null.render(), None);
        assert_eq!(
            serde_json::json!("text").render(),
            Some("text".to_string())
        );
        assert_eq!(
            serde_json::json!({"a": 1}).render(),
            Some(r#"{"a":1}"#.to_string())
        );
    }

    #[test]
    fn test_adapters() {
        #[derive(Debug)]
        struct Point {
            x: i32,
        }
        assert_eq!(debug(Point { x: 3 }).render(), Some("Point { x: 3 }".to_string()));
        assert_eq!(display(std::net::Ipv4Addr::LOCALHOST).render(), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_function_path_strips_probe() {
        fn __sitelog_probe() {}
        let path = function_path(__sitelog_probe);
        assert!(path.ends_with("test_function_path_strips_probe"), "{path}");
    }
}
