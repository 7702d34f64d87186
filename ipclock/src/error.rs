use thiserror::Error;

/// Failure of a single [`crate::IpClock::now`] call.
///
/// Every variant renders as `Failed to retrieve time from API: <cause>` and
/// exposes the cause through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum IpClockError {
    #[error("Failed to retrieve time from API: {0}")]
    Transport(#[source] TransportError),
    #[error("Failed to retrieve time from API: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Failed to retrieve time from API: {0}")]
    InvalidResponse(#[source] InvalidResponse),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("{0}")]
    Ureq(#[source] Box<ureq::Error>),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wraps an arbitrary error raised by a caller-supplied transport.
    pub fn other<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Other(error.into())
    }
}

impl From<ureq::Error> for TransportError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, _) => Self::Status(code),
            e => Self::Ureq(Box::new(e)),
        }
    }
}

/// The response body decoded fine but does not describe a point in time.
#[derive(Debug, Error)]
pub enum InvalidResponse {
    #[error("Invalid response from Time API: missing `{0}` field")]
    MissingField(&'static str),
    #[error("Invalid response from Time API: `{0}` field is not a string")]
    NotAString(&'static str),
    #[error("Invalid response from Time API: cannot parse datetime `{value}`: {source}")]
    DateTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Invalid response from Time API: unknown timezone `{0}`")]
    Timezone(String),
    #[error("Invalid response from Time API: local time `{datetime}` does not exist in `{timezone}`")]
    LocalTime { datetime: String, timezone: String },
    #[error("Invalid response from Time API: {0}")]
    Other(String),
}
