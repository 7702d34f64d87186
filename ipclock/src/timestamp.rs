use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::InvalidResponse;

/// An instant paired with the timezone it is displayed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    local: DateTime<FixedOffset>,
    timezone: String,
}

/// A timezone as reported by a time API: an IANA name or a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Zone {
    /// Accepts IANA names (`Europe/Paris`, `UTC`), `Z`, and offset tokens
    /// such as `+02:00`, `-0500` or `+03`.
    pub fn parse(name: &str) -> Result<Self, InvalidResponse> {
        let name = name.trim();
        if name == "Z" {
            return Ok(Zone::Fixed(Utc.fix()));
        }
        if let Ok(tz) = name.parse::<Tz>() {
            return Ok(Zone::Named(tz));
        }
        parse_offset(name)
            .map(Zone::Fixed)
            .ok_or_else(|| InvalidResponse::Timezone(name.to_string()))
    }

    fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            Zone::Named(tz) => instant.with_timezone(tz).offset().fix(),
            Zone::Fixed(offset) => *offset,
        }
    }

    fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            Zone::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }
}

fn parse_offset(token: &str) -> Option<FixedOffset> {
    let (sign, rest) = match token.as_bytes().first()? {
        b'+' => (1, &token[1..]),
        b'-' => (-1, &token[1..]),
        _ => return None,
    };
    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }
    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return None,
    };
    let hours = hours.parse::<i32>().ok()?;
    let minutes = minutes.parse::<i32>().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// `%#z` takes `+02`, `+0200` and `+02:00`
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Timestamp {
    /// Re-expresses `instant` in `timezone`. The absolute instant is kept,
    /// only the display offset changes.
    pub fn in_zone<Z: TimeZone>(
        instant: DateTime<Z>,
        timezone: &str,
    ) -> Result<Self, InvalidResponse> {
        let zone = Zone::parse(timezone)?;
        let utc = instant.with_timezone(&Utc);
        let offset = zone.offset_at(&utc);
        Ok(Self {
            local: utc.with_timezone(&offset),
            timezone: timezone.trim().to_string(),
        })
    }

    /// Parses an ISO-8601 `datetime` and re-expresses it in `timezone`.
    ///
    /// A `datetime` without offset is read as wall-clock time in `timezone`.
    pub fn parse(datetime: &str, timezone: &str) -> Result<Self, InvalidResponse> {
        let datetime = datetime.trim();
        let parsed = DateTime::parse_from_rfc3339(datetime).or_else(|rfc3339_err| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(datetime, fmt).ok())
                .ok_or(rfc3339_err)
        });
        match parsed {
            Ok(instant) => Self::in_zone(instant, timezone),
            Err(rfc3339_err) => {
                let naive = NAIVE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(datetime, fmt).ok())
                    .ok_or_else(|| InvalidResponse::DateTime {
                        value: datetime.to_string(),
                        source: rfc3339_err,
                    })?;
                let zone = Zone::parse(timezone)?;
                let local = zone
                    .localize(&naive)
                    .ok_or_else(|| InvalidResponse::LocalTime {
                        datetime: datetime.to_string(),
                        timezone: timezone.to_string(),
                    })?;
                Self::in_zone(local, timezone)
            }
        }
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.local.with_timezone(&Utc)
    }

    pub fn local(&self) -> DateTime<FixedOffset> {
        self.local
    }

    pub fn offset(&self) -> FixedOffset {
        *self.local.offset()
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn to_rfc3339(&self) -> String {
        self.local.to_rfc3339()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.local.to_rfc3339(), self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utc() {
        let ts = Timestamp::parse("2023-10-27T10:00:00Z", "UTC").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-10-27T10:00:00+00:00");
        assert_eq!(ts.timezone(), "UTC");
    }

    #[test]
    fn test_reexpress_keeps_instant() {
        let ts = Timestamp::parse("2023-10-27T10:00:00Z", "America/New_York").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-10-27T06:00:00-04:00");
        assert_eq!(
            ts.instant(),
            Utc.with_ymd_and_hms(2023, 10, 27, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_worldtimeapi_shape() {
        let ts = Timestamp::parse("2024-01-15T18:30:12.345678+09:00", "Asia/Tokyo").unwrap();
        assert_eq!(ts.offset(), FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(ts.instant().to_rfc3339(), "2024-01-15T09:30:12.345678+00:00");
    }

    #[test]
    fn test_fixed_offset_zone() {
        let ts = Timestamp::parse("2023-10-27T10:00:00Z", "+05:30").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-10-27T15:30:00+05:30");
        let ts = Timestamp::parse("2023-10-27T10:00:00Z", "-0500").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-10-27T05:00:00-05:00");
        let ts = Timestamp::parse("2023-10-27T10:00:00Z", "Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-10-27T10:00:00+00:00");
    }

    #[test]
    fn test_iso_offsets_without_colon() {
        let ts = Timestamp::parse("2023-10-27T12:00:00+0200", "UTC").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-10-27T10:00:00+00:00");
        let ts = Timestamp::parse("2023-10-27T12:00:00+02", "UTC").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-10-27T10:00:00+00:00");
        let ts = Timestamp::parse("2023-10-27 12:00:00.25-0330", "UTC").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-10-27T15:30:00.250+00:00");
    }

    #[test]
    fn test_malformed_offset_zone() {
        for token in ["+0:2:00", "+05:3:0", "+5", "+05:", "+053", "+05:60", "+1\u{e9}2"] {
            assert!(
                matches!(
                    Timestamp::parse("2023-10-27T10:00:00Z", token),
                    Err(InvalidResponse::Timezone(_))
                ),
                "{} was accepted",
                token
            );
        }
    }

    #[test]
    fn test_naive_datetime_is_local_to_zone() {
        let ts = Timestamp::parse("2023-10-27T12:00:00.1234567", "Europe/Berlin").unwrap();
        assert_eq!(
            ts.instant(),
            Utc.with_ymd_and_hms(2023, 10, 27, 10, 0, 0).unwrap()
                + chrono::Duration::nanoseconds(123_456_700)
        );
    }

    #[test]
    fn test_unknown_timezone() {
        let err = Timestamp::parse("2023-10-27T10:00:00Z", "Mars/Olympus").unwrap_err();
        assert!(matches!(err, InvalidResponse::Timezone(ref tz) if tz == "Mars/Olympus"));
    }

    #[test]
    fn test_garbage_datetime() {
        let err = Timestamp::parse("not a date", "UTC").unwrap_err();
        assert!(matches!(err, InvalidResponse::DateTime { .. }));
    }

    #[test]
    fn test_nonexistent_local_time() {
        // spring-forward gap in New York
        let err = Timestamp::parse("2024-03-10T02:30:00", "America/New_York").unwrap_err();
        assert!(matches!(err, InvalidResponse::LocalTime { .. }));
    }

    #[test]
    fn test_display() {
        let ts = Timestamp::parse("2023-10-27T10:00:00Z", "UTC").unwrap();
        assert_eq!(ts.to_string(), "2023-10-27T10:00:00+00:00 [UTC]");
    }
}
