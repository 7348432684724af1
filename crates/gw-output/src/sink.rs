//! `OutputSink<W>` — bridges `EventSink` to an `OutputWriter`.

use log::warn;

use gw_core::{EntityId, Timestamp};
use gw_monitor::{EntityStatus, EventSink, PassSummary, TransitionEvent};

use crate::row::{PassRow, StatusRow, TransitionRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// An [`EventSink`] that writes every event to an [`OutputWriter`] backend.
///
/// Errors from the writer are stored because sink methods have no return
/// value.  Only the first is kept; later writes are still attempted.  Call
/// [`finish`][Self::finish] when the run is over to flush and surface it.
pub struct OutputSink<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Returns the first stored write error if there was
    /// one, otherwise the flush result.
    pub fn finish(&mut self) -> OutputResult<()> {
        let flushed = self.writer.finish();
        match self.last_error.take() {
            Some(e) => Err(e),
            None => flushed,
        }
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> EventSink for OutputSink<W> {
    fn on_transition(&mut self, event: &TransitionEvent) {
        let result = self.writer.write_transition(&TransitionRow::from(event));
        self.store_err(result);
    }

    fn on_status_change(&mut self, entity: &EntityId, status: EntityStatus, at: Timestamp) {
        let row = StatusRow { entity_id: entity.to_string(), status, at_ms: at.as_millis() };
        let result = self.writer.write_status(&row);
        self.store_err(result);
    }

    fn on_pass_end(&mut self, summary: &PassSummary) {
        let result = self.writer.write_pass(&PassRow::from(summary));
        self.store_err(result);
    }
}
