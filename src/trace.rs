//! Call-site capture appended to accessor diagnostics.

use std::backtrace::Backtrace;
use std::panic::Location;

/// Number of frames kept when capturing a backtrace.
pub const DEFAULT_TRACE_FRAMES: usize = 7;

/// How the accessor records where a failed lookup came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TraceCapture {
    /// `file:line:column` of the code that called the accessor.
    #[default]
    Caller,
    /// A forced backtrace, truncated to the given number of frames.
    Backtrace { frames: usize },
    /// A fixed, caller-supplied context tag (e.g. an operation name).
    Context(String),
    Disabled,
}

impl TraceCapture {
    /// Render the trace for the caller location the accessor was invoked from.
    pub fn capture(&self, caller: &Location<'_>) -> String {
        match self {
            TraceCapture::Caller => format!("{}:{}:{}", caller.file(), caller.line(), caller.column()),
            TraceCapture::Backtrace { frames } => {
                truncate_frames(&Backtrace::force_capture().to_string(), *frames)
            }
            TraceCapture::Context(tag) => tag.clone(),
            TraceCapture::Disabled => "<unavailable>".to_string(),
        }
    }
}

/// Keep the first `max` frames of a rendered backtrace.
///
/// Frame headers look like `   3: symbol`; the `at file:line` lines that
/// follow a header belong to that frame.
pub fn truncate_frames(rendered: &str, max: usize) -> String {
    let mut frames = 0;
    let mut kept = Vec::new();

    for line in rendered.lines() {
        if is_frame_header(line) {
            if frames == max {
                break;
            }
            frames += 1;
        }
        kept.push(line);
    }

    kept.join("\n")
}

fn is_frame_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    match trimmed.split_once(':') {
        Some((index, _)) => !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = "   0: first\n             at src/a.rs:1:1\n   1: second\n   2: third\n             at src/c.rs:3:3\n   3: fourth";

    #[test]
    fn test_truncate_frames_keeps_location_lines() {
        let out = truncate_frames(RENDERED, 2);
        assert_eq!(out, "   0: first\n             at src/a.rs:1:1\n   1: second");
    }

    #[test]
    fn test_truncate_frames_more_than_available() {
        assert_eq!(truncate_frames(RENDERED, 10), RENDERED);
        assert_eq!(truncate_frames(RENDERED, 0), "");
    }

    #[test]
    fn test_capture_caller() {
        let location = Location::caller();
        let trace = TraceCapture::Caller.capture(location);
        assert!(trace.starts_with(file!()));
    }

    #[test]
    fn test_capture_context_and_disabled() {
        let location = Location::caller();
        assert_eq!(
            TraceCapture::Context("sync.conversation".to_string()).capture(location),
            "sync.conversation"
        );
        assert_eq!(TraceCapture::Disabled.capture(location), "<unavailable>");
    }

    #[test]
    fn test_capture_backtrace_is_bounded() {
        let location = Location::caller();
        let trace = TraceCapture::Backtrace { frames: 3 }.capture(location);
        let headers = trace.lines().filter(|l| is_frame_header(l)).count();
        assert!(headers <= 3);
    }
}
