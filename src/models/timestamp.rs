//! Timestamp encoding shared by the storage backends.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::constants::LEGACY_TIMESTAMP_FORMAT;

#[must_use]
pub fn encode(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Parses an RFC 3339 timestamp, falling back to the legacy local-time format.
pub fn decode(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, LEGACY_TIMESTAMP_FORMAT)
        .with_context(|| format!("Unrecognised timestamp: {raw}"))?;

    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("Timestamp does not exist in local time: {raw}"))?;

    Ok(local.with_timezone(&Utc))
}

pub fn decode_optional(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => decode(raw).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_roundtrip() {
        let now = Utc::now();
        assert_eq!(decode(&encode(&now)).unwrap(), now);
    }

    #[test]
    fn test_legacy_format_accepted() {
        let ts = decode("2024-05-01 10:30:00").unwrap();
        let back = ts.with_timezone(&Local).format(LEGACY_TIMESTAMP_FORMAT).to_string();
        assert_eq!(back, "2024-05-01 10:30:00");
    }

    #[test]
    fn test_optional() {
        assert_eq!(decode_optional(None).unwrap(), None);
        assert_eq!(decode_optional(Some("")).unwrap(), None);
        assert!(decode_optional(Some("yesterday")).is_err());
    }
}
