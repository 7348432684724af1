use gw_monitor::MonitorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

pub type SimResult<T> = Result<T, SimError>;
