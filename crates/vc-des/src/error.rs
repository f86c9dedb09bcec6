use thiserror::Error;
use vc_core::SimTime;

#[derive(Debug, Error)]
pub enum DesError {
    #[error("cannot schedule an event {0} seconds in the past")]
    NegativeDelay(f64),

    #[error("cannot schedule at {requested} when the clock is already at {now}")]
    TimeReversal {
        now:       SimTime,
        requested: SimTime,
    },

    #[error("resource pool `{0}` needs a capacity of at least 1")]
    ZeroCapacity(&'static str),

    #[error("grant issued by pool `{issued_by}` released into pool `{released_to}`")]
    ForeignGrant {
        issued_by:   &'static str,
        released_to: &'static str,
    },
}

pub type DesResult<T> = Result<T, DesError>;
