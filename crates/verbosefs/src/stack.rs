//! Call stack capture and frame filtering
//!
//! Frames come from `std::backtrace::Backtrace`, parsed out of its rendered
//! form. Filtering is by path identity: every symbol is reduced to a plain
//! `crate::module::Type::function` path (generic arguments, `<T as Trait>`
//! qualification, closure markers and hashes removed) and compared segment by
//! segment against rules built from `module_path!()`, so renaming a module
//! moves its rule with it.

use std::backtrace::Backtrace;
use std::fmt;

/// One frame of a captured call stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Demangled symbol as rendered by the backtrace
    pub symbol: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl StackFrame {
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            file: None,
            line: None,
        }
    }

    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: Option<u32>) -> Self {
        self.file = Some(file.into());
        self.line = line;
        self
    }

    /// Capture the calling thread's stack, innermost frame first.
    ///
    /// Best effort: on platforms without backtrace support the result is empty.
    #[must_use]
    pub fn capture() -> Vec<StackFrame> {
        parse_backtrace(&Backtrace::force_capture().to_string())
    }

    /// Plain path of the function this frame executes
    #[must_use]
    pub fn path(&self) -> String {
        symbol_path(&self.symbol)
    }

    fn set_location(&mut self, location: &str) {
        let mut parts = location.rsplitn(3, ':');
        let (col, line, file) = (parts.next(), parts.next(), parts.next());
        match (file, line.and_then(|l| l.parse().ok()), col) {
            (Some(file), Some(line), Some(_)) => {
                self.file = Some(file.to_string());
                self.line = Some(line);
            }
            _ => {
                // "file:line" without a column
                match location.rsplit_once(':') {
                    Some((file, line)) if line.parse::<u32>().is_ok() => {
                        self.file = Some(file.to_string());
                        self.line = line.parse().ok();
                    }
                    _ => self.file = Some(location.to_string()),
                }
            }
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}({}:{})", self.symbol, file, line),
            (Some(file), None) => write!(f, "{}({})", self.symbol, file),
            _ => f.write_str(&self.symbol),
        }
    }
}

/// Parse the `Display` output of `std::backtrace::Backtrace`.
///
/// Frame lines look like `  12: symbol`, inlined symbols sharing a frame are
/// indented without an index, and `at file:line:col` lines attach to the
/// symbol above them.
#[must_use]
pub fn parse_backtrace(rendered: &str) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = Vec::new();

    for line in rendered.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("note:") {
            continue;
        }

        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.set_location(location.trim());
            }
            continue;
        }

        if let Some((index, symbol)) = trimmed.split_once(": ")
            && !index.is_empty()
            && index.bytes().all(|b| b.is_ascii_digit())
        {
            frames.push(StackFrame::new(symbol.trim()));
            continue;
        }

        // Inlined symbol continuing the previous frame
        if line.starts_with(char::is_whitespace) && !frames.is_empty() {
            frames.push(StackFrame::new(trimmed));
        }
    }

    frames
}

/// Reduce a demangled symbol to a `::`-separated path without generics.
///
/// `<verbosefs::verbose::VerboseFs<P> as verbosefs::provider::FileSystemProvider>::delete`
/// becomes `verbosefs::verbose::VerboseFs::delete`.
#[must_use]
pub fn symbol_path(symbol: &str) -> String {
    let symbol = symbol.trim();

    let joined = match symbol.strip_prefix('<') {
        Some(inner) => {
            let close = matching_close(inner).unwrap_or(inner.len());
            let qualified = &inner[..close];
            let rest = inner.get(close + 1..).unwrap_or("");
            let self_type = qualified.split(" as ").next().unwrap_or(qualified);
            let self_type = self_type
                .trim_start_matches('&')
                .trim_start_matches("mut ")
                .trim_start_matches("dyn ");
            format!("{self_type}{rest}")
        }
        None => symbol.to_string(),
    };

    strip_generics(&joined)
        .split("::")
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{') && !is_hash(segment))
        .collect::<Vec<_>>()
        .join("::")
}

fn matching_close(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if depth == 0 => return Some(i),
            '>' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn strip_generics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

// Legacy-mangling hash suffix, e.g. `h3f2a9c0d1e4b5a67`
fn is_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// A component whose frames are hidden from audit records.
///
/// `component` is a module path; `member` narrows the rule to one item
/// (a type or function) directly inside that module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRule {
    component: &'static str,
    member: Option<&'static str>,
}

impl FrameRule {
    #[must_use]
    pub const fn component(component: &'static str) -> Self {
        Self {
            component,
            member: None,
        }
    }

    #[must_use]
    pub const fn member(component: &'static str, member: &'static str) -> Self {
        Self {
            component,
            member: Some(member),
        }
    }

    /// True when `path` lies inside this rule's component (and member)
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix(self.component) else {
            return false;
        };
        let rest = match rest.strip_prefix("::") {
            Some(rest) => rest,
            None if rest.is_empty() => "",
            None => return false,
        };
        match self.member {
            None => true,
            Some(member) => rest.split("::").next() == Some(member),
        }
    }
}

/// The capture machinery: std's backtrace support and this module
pub const CAPTURE_RULES: [FrameRule; 3] = [
    FrameRule::component("std::backtrace"),
    FrameRule::component("std::backtrace_rs"),
    FrameRule::component(module_path!()),
];

/// Set of rules applied to captured stacks
#[derive(Debug, Clone)]
pub struct FrameFilter {
    rules: Vec<FrameRule>,
}

impl FrameFilter {
    #[must_use]
    pub fn new(rules: Vec<FrameRule>) -> Self {
        Self { rules }
    }

    /// Hides the capture machinery, the info stream and the `VerboseFs` decorator
    #[must_use]
    pub fn audit() -> Self {
        let mut rules = CAPTURE_RULES.to_vec();
        rules.push(crate::info_stream::FRAME_RULE);
        rules.push(crate::verbose::FRAME_RULE);
        Self { rules }
    }

    #[must_use]
    pub fn excludes(&self, frame: &StackFrame) -> bool {
        let path = frame.path();
        self.rules.iter().any(|rule| rule.matches(&path))
    }

    /// Drop excluded frames, preserving order
    #[must_use]
    pub fn apply(&self, frames: Vec<StackFrame>) -> Vec<StackFrame> {
        frames.into_iter().filter(|f| !self.excludes(f)).collect()
    }
}

impl Default for FrameFilter {
    fn default() -> Self {
        Self::audit()
    }
}
