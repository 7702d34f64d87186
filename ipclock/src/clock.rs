use std::convert::Infallible;

use crate::timestamp::Timestamp;

/// Source of "now".
pub trait Clock {
    type Error;

    fn now(&self) -> Result<Timestamp, Self::Error>;
}

/// A clock pinned to one timestamp, for callers that need determinism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock {
    pub fixed_time: Timestamp,
}

impl FixedClock {
    pub fn new(fixed_time: Timestamp) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    type Error = Infallible;

    fn now(&self) -> Result<Timestamp, Infallible> {
        Ok(self.fixed_time.clone())
    }
}
