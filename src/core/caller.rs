// SiteLog - core/caller.rs
//
// Caller attribution. Turns a call-site token or a frame of a captured
// backtrace into the `[ (file:line)#method ] ` header that prefixes every
// record.
//
// Two sources of frames:
//   - `CallSite` tokens captured by the macros at the call expression
//     (exact, no stack walk).
//   - `std::backtrace` captures for `#[track_caller]` entry points and
//     trace dumps. The offset of the caller's frame is detected at runtime
//     by counting the facility's own leading frames.

use crate::core::model::CallSite;
use crate::util::constants;
use crate::util::error::ResolveError;
use regex::Regex;
use std::backtrace::Backtrace;
use std::fmt;
use std::sync::OnceLock;

/// Modules of this crate whose frames are never reported as the caller.
const FACILITY_MODULES: &[&str] = &["app", "core", "platform", "util"];

/// Symbol prefixes of backtrace capture machinery.
const CAPTURE_PREFIXES: &[&str] = &["std::backtrace", "std::backtrace_rs", "backtrace::"];

// =============================================================================
// Frames
// =============================================================================

/// One frame of a call stack, as far as it is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Source file path; empty when unknown.
    pub file: String,

    /// Module containing the function; empty when it has to be inferred
    /// from the function path.
    pub module_path: String,

    /// Fully-qualified function path or demangled symbol.
    pub function: String,

    /// Source line; negative when unknown.
    pub line: i64,
}

impl From<&CallSite> for StackFrame {
    fn from(site: &CallSite) -> Self {
        Self {
            file: site.file.to_string(),
            module_path: site.module_path.to_string(),
            function: site.function.to_string(),
            line: i64::from(site.line),
        }
    }
}

impl StackFrame {
    /// Whether this frame belongs to the facility or to backtrace capture.
    pub fn is_facility(&self) -> bool {
        is_facility_symbol(&self.function)
    }
}

// =============================================================================
// Caller info
// =============================================================================

/// Display-ready identity of the code that issued a log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerInfo {
    /// Last component of the source file path (e.g. `client.rs`).
    pub file_name: String,

    /// Last component of the owner path plus `.rs` (e.g. `net$Client.rs`).
    pub class_name: String,

    /// `$Type` when the call came from a method of a type rather than a
    /// free function of the file's module.
    pub inner_suffix: Option<String>,

    pub method_name: String,

    pub line_number: u32,
}

impl CallerInfo {
    /// Derive the caller identity from a single frame.
    pub fn from_frame(frame: &StackFrame) -> Self {
        let file_name = file_name_of(&frame.file).to_string();
        let (owner, method_name) = owner_and_method(&frame.module_path, &frame.function);

        let short_owner = owner.rsplit("::").next().unwrap_or(&owner);
        let class_name = format!("{short_owner}{}", constants::SOURCE_SUFFIX);

        let inner_suffix = if file_name != class_name {
            owner
                .find(constants::NESTED_TYPE_MARKER)
                .map(|idx| owner[idx..].to_string())
        } else {
            None
        };

        // Frames without line information report a negative line.
        let line_number = u32::try_from(frame.line.max(0)).unwrap_or(u32::MAX);

        Self {
            file_name,
            class_name,
            inner_suffix,
            method_name,
            line_number,
        }
    }

    /// The caller header, including its trailing separator space.
    pub fn header(&self) -> String {
        self.to_string()
    }
}

impl From<&CallSite> for CallerInfo {
    fn from(site: &CallSite) -> Self {
        Self::from_frame(&StackFrame::from(site))
    }
}

impl fmt::Display for CallerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ ({}:{}){}#{} ] ",
            self.file_name,
            self.line_number,
            self.inner_suffix.as_deref().unwrap_or(""),
            self.method_name
        )
    }
}

// =============================================================================
// Resolution against a captured stack
// =============================================================================

/// Return the frame at `skip`, failing loudly if the stack is shallower.
pub fn resolve_frame(frames: &[StackFrame], skip: usize) -> Result<&StackFrame, ResolveError> {
    frames.get(skip).ok_or(ResolveError::StackTooShallow {
        skip,
        depth: frames.len(),
    })
}

/// Caller identity of the frame at `skip`.
pub fn resolve(frames: &[StackFrame], skip: usize) -> Result<CallerInfo, ResolveError> {
    resolve_frame(frames, skip).map(CallerInfo::from_frame)
}

/// Number of leading frames owned by the facility or by capture machinery.
///
/// This is the runtime-detected skip count: the frame at this index is the
/// first one outside the facility.
pub fn facility_depth(frames: &[StackFrame]) -> usize {
    frames.iter().take_while(|f| f.is_facility()).count()
}

/// Capture and parse the current thread's stack.
pub fn capture_stack() -> Vec<StackFrame> {
    parse_backtrace(&Backtrace::force_capture().to_string())
}

/// Parse the display form of a `std::backtrace::Backtrace`:
///
/// ```text
///    4: app::net::Client::connect
///              at ./src/net.rs:42:9
/// ```
///
/// Frames without an `at` line keep an empty file and line `-1`.
pub fn parse_backtrace(text: &str) -> Vec<StackFrame> {
    static PATTERNS: OnceLock<(Regex, Regex)> = OnceLock::new();
    let (frame_re, at_re) = PATTERNS.get_or_init(|| {
        // Patterns are covered by the unit tests below.
        (
            Regex::new(r"^\s*\d+:\s+(.+?)\s*$").expect("parse_backtrace: invalid frame regex"),
            Regex::new(r"^\s*at\s+(.+?):(\d+)(?::\d+)?\s*$")
                .expect("parse_backtrace: invalid location regex"),
        )
    });

    let mut frames: Vec<StackFrame> = Vec::new();
    for line in text.lines() {
        if let Some(caps) = frame_re.captures(line) {
            frames.push(StackFrame {
                file: String::new(),
                module_path: String::new(),
                function: caps[1].to_string(),
                line: -1,
            });
        } else if let Some(caps) = at_re.captures(line) {
            if let Some(last) = frames.last_mut() {
                if last.file.is_empty() {
                    last.file = caps[1].to_string();
                    last.line = caps[2].parse().unwrap_or(-1);
                }
            }
        }
    }
    frames
}

/// Whether `symbol` names a function of the facility or of backtrace capture.
pub fn is_facility_symbol(symbol: &str) -> bool {
    let symbol = symbol.trim_start_matches('<');
    if CAPTURE_PREFIXES.iter().any(|p| symbol.starts_with(p)) {
        return true;
    }
    let Some(rest) = symbol
        .strip_prefix(constants::CRATE_PATH)
        .and_then(|s| s.strip_prefix("::"))
    else {
        return false;
    };
    FACILITY_MODULES.iter().any(|m| {
        rest.strip_prefix(m)
            .is_some_and(|tail| tail.starts_with("::"))
    })
}

// =============================================================================
// Path helpers
// =============================================================================

/// Last component of a `/` or `\` separated path.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Split `path` on `::`, ignoring separators nested inside generic
/// argument lists.
fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            // `->` inside fn-pointer generics
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}

fn strip_generics(segment: &str) -> &str {
    segment.split('<').next().unwrap_or(segment)
}

fn is_type_segment(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_uppercase)
}

/// Legacy-mangling hash suffix such as `h3f2a9c0d1e4b5a6c`.
fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Split a function path into its qualified owner and method name.
///
/// The owner is the module path, followed by `$Type` when the function is
/// associated with a type. `module_path` may be empty, in which case the
/// module is inferred from the leading lower-case segments.
fn owner_and_method(module_path: &str, function: &str) -> (String, String) {
    let mut segments: Vec<&str> = split_path(function)
        .into_iter()
        .filter(|s| !s.is_empty() && !s.starts_with("{{") && !is_symbol_hash(s))
        .collect();

    let method = segments
        .pop()
        .map(strip_generics)
        .filter(|m| !m.is_empty())
        .unwrap_or(constants::UNKNOWN_METHOD)
        .to_string();

    // `<mod::Type as Trait>` is replaced by the segments of its self type.
    let mut expanded: Vec<&str> = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            Some(qualified) => {
                let self_ty = qualified.split(" as ").next().unwrap_or(qualified);
                let self_ty = self_ty.trim_start_matches('&').trim_start_matches("mut ");
                expanded.extend(split_path(self_ty));
            }
            None => expanded.push(segment),
        }
    }

    let module = if module_path.is_empty() {
        expanded
            .iter()
            .take_while(|s| !is_type_segment(s))
            .map(|s| strip_generics(s))
            .collect::<Vec<_>>()
            .join("::")
    } else {
        module_path.to_string()
    };

    let owner_type = expanded
        .iter()
        .rev()
        .map(|s| strip_generics(s))
        .find(|s| is_type_segment(s));

    let owner = match owner_type {
        Some(ty) => format!("{module}{}{ty}", constants::NESTED_TYPE_MARKER),
        None => module,
    };
    (owner, method)
}
