use std::time::Duration;

use gw_core::{EntityId, GeoError};
use gw_region::RegionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// A location fix with out-of-range or non-finite coordinates.  The
    /// entity keeps its last good location and no events are emitted.
    #[error("invalid location for entity {entity}: {source}")]
    InvalidLocation {
        entity: EntityId,
        #[source]
        source: GeoError,
    },

    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),

    #[error(transparent)]
    Region(#[from] RegionError),

    /// An evaluation pass took longer than the configured budget.  The tick
    /// period is too short for the number of entities; not retryable.  The
    /// pass itself completed: `events` were delivered before this was raised.
    #[error("evaluation pass over {entities} entities took {elapsed:?}, budget is {budget:?}")]
    EvaluationOverrun {
        elapsed:  Duration,
        budget:   Duration,
        entities: usize,
        events:   usize,
    },
}

pub type MonitorResult<T> = Result<T, MonitorError>;
