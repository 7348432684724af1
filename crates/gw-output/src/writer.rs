//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, PassRow, StatusRow, TransitionRow};

/// A durable destination for the event stream.
///
/// Driven by [`OutputSink`][crate::OutputSink], which stores errors because
/// sink callbacks have no return value.
pub trait OutputWriter {
    fn write_transition(&mut self, row: &TransitionRow) -> OutputResult<()>;

    fn write_status(&mut self, row: &StatusRow) -> OutputResult<()>;

    fn write_pass(&mut self, row: &PassRow) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
