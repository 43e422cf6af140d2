/// Errors surfaced to callers of the protocol entry points.
///
/// Only message-level failures are represented here. Render-time problems
/// (missing components, unknown kinds, unbound paths) never become errors;
/// they are recovered locally and reported as
/// [`Diagnostic`](crate::render::Diagnostic)s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport line or event payload was not valid JSON.
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    /// One or more lines of a newline-delimited batch failed to parse.
    ///
    /// Each entry pairs the 1-based line number with its parse error. The
    /// remaining lines of the batch were still applied.
    #[error("{} malformed line(s) in batch (first at line {})", .lines.len(), first_line(.lines))]
    MalformedBatch {
        /// Line numbers and parse errors, in input order.
        lines: Vec<(usize, serde_json::Error)>,
    },

    /// Reading from a stream source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn first_line(lines: &[(usize, serde_json::Error)]) -> usize {
    lines.first().map(|(line, _)| *line).unwrap_or(0)
}
