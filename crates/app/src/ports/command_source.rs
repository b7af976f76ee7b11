//! Command source port — operator input, one line at a time.

use std::future::Future;

use ddd_domain::error::DddError;

/// A line-oriented source of operator input (usually the terminal).
pub trait CommandSource {
    /// Wait for the next line.
    ///
    /// Returns `Ok(None)` once the input stream is closed. The returned line
    /// has its trailing newline removed but is otherwise untouched.
    fn next_line(&mut self) -> impl Future<Output = Result<Option<String>, DddError>> + Send;
}
