//! Runtime error reporting
//!
//! A runtime error is reported once, at the point it is raised, while the
//! frame stack still describes where execution was. The report is the
//! message followed by one line per active frame, innermost first and ending
//! with the top-level script.

use std::fmt::Write as _;
use std::io::Write as _;

use core_types::{RuntimeError, RuntimeErrorKind, StackFrame};
use tracing::{error, warn};

use crate::vm::{InterpretError, VM};

/// Render `error` as the text written to the error sink
///
/// # Examples
///
/// ```
/// use core_types::{RuntimeError, RuntimeErrorKind, StackFrame};
/// use interpreter::render_report;
///
/// let error = RuntimeError::new(RuntimeErrorKind::UndefinedVariable, "Undefined variable 'x'.")
///     .with_stack(vec![StackFrame::new(Some("f".into()), 2), StackFrame::new(None, 5)]);
///
/// assert_eq!(
///     render_report(&error),
///     "Undefined variable 'x'.\n[line 2] in f()\n[line 5] in script\n"
/// );
/// ```
pub fn render_report(error: &RuntimeError) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "{}", error.message);
    for frame in &error.stack {
        let _ = writeln!(report, "{}", frame);
    }
    report
}

impl VM {
    /// Build a runtime error with the current trace and report it.
    ///
    /// The stacks are left for the caller to reset once the error has
    /// propagated out of the dispatch loop.
    pub(crate) fn runtime_error(
        &mut self,
        kind: RuntimeErrorKind,
        message: impl Into<String>,
    ) -> InterpretError {
        let error = RuntimeError::new(kind, message).with_stack(self.capture_trace());
        error!(
            %kind,
            message = %error.message,
            depth = error.stack.len(),
            in_script = error.stack.first().map_or(true, StackFrame::is_script),
            "runtime error"
        );
        if self.config.report_to_stderr {
            if let Err(err) = self.err.write_all(render_report(&error).as_bytes()) {
                warn!(%err, "error report output failed");
            }
        }
        InterpretError::Runtime(error)
    }

    /// One trace entry per active frame, innermost first
    fn capture_trace(&self) -> Vec<StackFrame> {
        self.frames
            .iter()
            .rev()
            .map(|frame| {
                let chunk = &self.heap.function(frame.function).chunk;
                let line = chunk.line_at(frame.current_offset()).unwrap_or(0);
                let name = self.heap.function_name(frame.function).map(str::to_owned);
                StackFrame::new(name, line)
            })
            .collect()
    }
}
