// SiteLog - core/format.rs
//
// Body rendering: argument lists, JSON documents, error chains and
// filtered stack dumps. Pure string building, no I/O.

use crate::core::caller::{file_name_of, StackFrame};
use crate::core::model::LogValue;
use crate::util::constants;
use serde::Serialize;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::Write as _;
use std::io;

/// Render the arguments of a log call into its body.
///
/// - no arguments: `execute`
/// - one argument: its text, or `null`
/// - several: a leading newline, then one `\targument[i]=value` line per
///   argument, without a trailing newline
pub fn format_values(args: &[&dyn LogValue]) -> String {
    match args {
        [] => constants::DEFAULT_MESSAGE.to_string(),
        [single] => render_or_null(*single),
        many => {
            let mut body = String::from("\n");
            for (i, arg) in many.iter().enumerate() {
                if i > 0 {
                    body.push('\n');
                }
                // Writing into a String cannot fail.
                let _ = write!(
                    body,
                    "\t{}[{i}]={}",
                    constants::ARGUMENT_LABEL,
                    render_or_null(*arg)
                );
            }
            body
        }
    }
}

fn render_or_null(value: &dyn LogValue) -> String {
    value
        .render()
        .unwrap_or_else(|| constants::NULL_TEXT.to_string())
}

/// Render a JSON payload.
///
/// Objects and arrays are pretty-printed with a four-space indent; a string
/// payload is assumed to be pre-formatted and passes through verbatim;
/// other scalars use their compact form. Fails when `payload` cannot be
/// represented as JSON (e.g. a map with non-string keys).
///
/// Containers are serialized straight from `payload`, so struct fields keep
/// their declared order.
pub fn format_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    match serde_json::to_value(payload)? {
        serde_json::Value::Object(_) | serde_json::Value::Array(_) => pretty_json(payload),
        serde_json::Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

/// Pre-formatted JSON text is logged as-is.
pub fn format_json_str(text: &str) -> String {
    text.to_string()
}

fn pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let indent = " ".repeat(constants::JSON_INDENT);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// Join a caller header and a rendered JSON document.
pub fn compose_json(header: &str, json: &str) -> String {
    format!("{header}{}{json}", constants::LINE_SEPARATOR)
}

/// Render an error and its `source()` chain as text.
///
/// Returns an empty string when any error in the chain is an I/O error of
/// kind `HostUnreachable`: unreachable-network failures are expected and
/// their traces are noise. Name lookup failures carry no dedicated kind
/// and are rendered like any other error. Otherwise the first line names the error type
/// and message, followed by one `Caused by:` line per source and the
/// captured backtrace when `RUST_BACKTRACE` enables one.
pub fn stack_trace_string<E: Error + 'static>(err: &E) -> String {
    let mut current: Option<&(dyn Error + 'static)> = Some(err);
    while let Some(e) = current {
        if is_host_unreachable(e) {
            return String::new();
        }
        current = e.source();
    }

    let mut out = format!("{}: {err}", std::any::type_name::<E>());
    let mut cause = err.source();
    while let Some(e) = cause {
        let _ = write!(out, "{}Caused by: {e}", constants::LINE_SEPARATOR);
        cause = e.source();
    }

    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        out.push_str(constants::LINE_SEPARATOR);
        out.push_str(&backtrace.to_string());
    }
    out
}

fn is_host_unreachable(err: &(dyn Error + 'static)) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::HostUnreachable)
}

/// Render a captured stack for a trace dump, dropping the facility's own
/// frames and the capture machinery.
///
/// The body starts with a newline and holds one `at symbol (file:line)`
/// line per remaining frame.
pub fn format_trace(frames: &[StackFrame]) -> String {
    let mut body = String::from("\n");
    for frame in frames.iter().filter(|f| !f.is_facility()) {
        if frame.file.is_empty() {
            let _ = writeln!(body, "at {}", frame.function);
        } else {
            let _ = writeln!(
                body,
                "at {} ({}:{})",
                frame.function,
                file_name_of(&frame.file),
                frame.line.max(0)
            );
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fmt;

    #[test]
    fn test_no_arguments_is_default_message() {
        assert_eq!(format_values(&[]), "execute");
    }

    #[test]
    fn test_single_null_argument() {
        let missing: Option<&str> = None;
        assert_eq!(format_values(&[&missing]), "null");
        assert_eq!(format_values(&[&"hello"]), "hello");
    }

    #[test]
    fn test_multiple_arguments_enumerated() {
        let missing: Option<i32> = None;
        let body = format_values(&[&"A", &2, &missing]);
        assert_eq!(body, "\n\targument[0]=A\n\targument[1]=2\n\targument[2]=null");
    }

    #[test]
    fn test_json_object_four_space_indent() {
        let pretty = format_json(&serde_json::json!({"a": {"b": 1}})).unwrap();
        assert_eq!(pretty, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
    }

    #[derive(Serialize)]
    struct Reading {
        zeta: u32,
        alpha: &'static str,
        mid: Vec<u8>,
    }

    #[test]
    fn test_json_struct_keeps_field_order() {
        let reading = Reading {
            zeta: 1,
            alpha: "a",
            mid: vec![2],
        };
        let pretty = format_json(&reading).unwrap();
        assert_eq!(
            pretty,
            "{\n    \"zeta\": 1,\n    \"alpha\": \"a\",\n    \"mid\": [\n        2\n    ]\n}"
        );
    }

    #[test]
    fn test_json_array_pretty() {
        let pretty = format_json(&vec![1, 2]).unwrap();
        assert_eq!(pretty, "[\n    1,\n    2\n]");
    }

    #[test]
    fn test_json_string_passes_verbatim() {
        assert_eq!(format_json("{ already: formatted }").unwrap(), "{ already: formatted }");
        assert_eq!(format_json_str("[1,2]"), "[1,2]");
    }

    #[test]
    fn test_json_non_string_keys_fail() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple key");
        assert!(format_json(&map).is_err());
    }

    #[test]
    fn test_compose_json_uses_line_separator() {
        let composed = compose_json("[ (a.rs:1)#f ] ", "{}");
        assert_eq!(composed, format!("[ (a.rs:1)#f ] {}{{}}", constants::LINE_SEPARATOR));
    }

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("request failed")
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_host_unreachable_in_chain_is_suppressed() {
        let err = Wrapped(io::Error::new(io::ErrorKind::HostUnreachable, "no route"));
        assert_eq!(stack_trace_string(&err), "");
    }

    #[test]
    fn test_name_lookup_failure_still_rendered() {
        let err = Wrapped(io::Error::new(
            io::ErrorKind::Other,
            "failed to lookup address information",
        ));
        assert!(stack_trace_string(&err).contains("Caused by: failed to lookup address information"));
    }

    #[test]
    fn test_stack_trace_names_type_and_causes() {
        let err = Wrapped(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let text = stack_trace_string(&err);
        assert!(text.contains("Wrapped"), "{text}");
        assert!(text.contains("request failed"));
        assert!(text.contains("Caused by: denied"));
    }

    #[test]
    fn test_format_trace_drops_facility_frames() {
        let frames = vec![
            StackFrame {
                file: "./src/app/logger.rs".to_string(),
                module_path: String::new(),
                function: "sitelog::app::logger::Logger::trace".to_string(),
                line: 10,
            },
            StackFrame {
                file: "./src/main.rs".to_string(),
                module_path: String::new(),
                function: "demo::main".to_string(),
                line: 5,
            },
            StackFrame {
                file: String::new(),
                module_path: String::new(),
                function: "__libc_start_main".to_string(),
                line: -1,
            },
        ];
        assert_eq!(
            format_trace(&frames),
            "\nat demo::main (main.rs:5)\nat __libc_start_main\n"
        );
    }
}
