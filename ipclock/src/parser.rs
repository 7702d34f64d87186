use crate::{error::InvalidResponse, timestamp::Timestamp};

/// A decoded JSON object as returned by a time API.
pub type RawResponse = serde_json::Map<String, serde_json::Value>;

/// Turns a provider's decoded response into a [`Timestamp`].
///
/// All provider-specific knowledge (field names, formats) lives here; the
/// clock only fetches and decodes.
pub trait ResponseParser: Send + Sync {
    fn parse(&self, data: &RawResponse) -> Result<Timestamp, InvalidResponse>;
}

/// Parser for worldtimeapi.org (`datetime` + `timezone`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponseParser;

impl ResponseParser for DefaultResponseParser {
    fn parse(&self, data: &RawResponse) -> Result<Timestamp, InvalidResponse> {
        let datetime = string_field(data, "datetime")?;
        let timezone = string_field(data, "timezone")?;
        Timestamp::parse(datetime, timezone)
    }
}

/// Parser for timeapi.io (`dateTime` + `timeZone`).
///
/// timeapi.io reports wall-clock time without an offset, so `dateTime` is
/// read as local time in `timeZone`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeApiIoParser;

impl ResponseParser for TimeApiIoParser {
    fn parse(&self, data: &RawResponse) -> Result<Timestamp, InvalidResponse> {
        let datetime = string_field(data, "dateTime")?;
        let timezone = string_field(data, "timeZone")?;
        Timestamp::parse(datetime, timezone)
    }
}

/// Looks up a required string field.
pub fn string_field<'a>(
    data: &'a RawResponse,
    name: &'static str,
) -> Result<&'a str, InvalidResponse> {
    match data.get(name) {
        None | Some(serde_json::Value::Null) => Err(InvalidResponse::MissingField(name)),
        Some(value) => value.as_str().ok_or(InvalidResponse::NotAString(name)),
    }
}
