//! `gw-output` — consumers of the monitor's event stream.
//!
//! Everything here implements [`gw_monitor::EventSink`]:
//!
//! | Type              | Keeps                                                     |
//! |-------------------|-----------------------------------------------------------|
//! | [`ActivityFeed`]  | newest 50 alerts and newest 100 activities, in memory     |
//! | [`OutputSink`]    | every event, via an [`OutputWriter`] backend              |
//! | [`FanOut`]        | nothing; forwards to two sinks                            |
//!
//! The only backend is [`CsvEventWriter`], which creates `transitions.csv`,
//! `statuses.csv` and `passes.csv`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gw_output::{ActivityFeed, CsvEventWriter, FanOut, OutputSink};
//!
//! let feed = ActivityFeed::new(sim.monitor.regions().names());
//! let csv = OutputSink::new(CsvEventWriter::new(Path::new("./output"))?);
//! let mut sink = FanOut(feed, csv);
//! sim.run(&mut sink)?;
//! sink.1.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod fanout;
pub mod feed;
pub mod format;
pub mod row;
pub mod sink;
pub mod writer;


pub use csv::CsvEventWriter;
pub use error::{OutputError, OutputResult};
pub use fanout::FanOut;
pub use feed::{
    ACTIVITY_CAPACITY, ALERT_CAPACITY, Activity, ActivityFeed, ActivityKind, Alert, AlertKind,
    UNKNOWN_REGION,
};
pub use format::format_duration;
pub use row::{PassRow, StatusRow, TransitionRow};
pub use sink::OutputSink;
pub use writer::OutputWriter;
