//! Video and course durations.
//!
//! Durations are stored and rendered as unpadded `H:M:S` strings
//! (`"1:30:10"`, `"0:4:30"`). Hours are unbounded; minutes and seconds are
//! always normalised into `0..60`.
//!
//! Two entry points produce durations:
//! - [`VideoDuration::from_iso8601`] parses the ISO-8601 token published in a
//!   video page's metadata (`PT1H30M10S`), falling back to [`VideoDuration::ZERO`].
//! - [`total`] sums a sequence of durations with base-60 carry.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// `P[nD]T[nH][nM][n[.f]S]`. Fractions are only accepted on seconds.
static ISO8601_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:[.,]\d+)?S)?)?$")
        .expect("valid regex")
});

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// A normalised `hours:minutes:seconds` duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VideoDuration {
    hours: u64,
    minutes: u64,
    seconds: u64,
}

impl VideoDuration {
    /// The sentinel used whenever a real duration cannot be determined.
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Build a duration from a total number of seconds.
    pub fn from_secs(total: u64) -> Self {
        Self {
            hours: total / SECS_PER_HOUR,
            minutes: (total % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total % SECS_PER_MINUTE,
        }
    }

    /// Build a duration from components, carrying overflow upwards.
    pub fn from_hms(hours: u64, minutes: u64, seconds: u64) -> Self {
        let minutes = minutes + seconds / 60;
        Self {
            hours: hours + minutes / 60,
            minutes: minutes % 60,
            seconds: seconds % 60,
        }
    }

    /// Parse an ISO-8601 duration token such as `PT1H30M10S`.
    ///
    /// Never fails: empty, malformed, or overflowing input yields
    /// [`VideoDuration::ZERO`].
    pub fn from_iso8601(raw: &str) -> Self {
        parse_iso8601(raw.trim()).unwrap_or(Self::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

fn parse_iso8601(raw: &str) -> Option<VideoDuration> {
    let caps = ISO8601_RE.captures(raw)?;

    // `P` and `PT` alone match the pattern but carry no value.
    if (1..=4).all(|i| caps.get(i).is_none()) {
        return None;
    }

    let component = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let total = component(1)?
        .checked_mul(SECS_PER_DAY)?
        .checked_add(component(2)?.checked_mul(SECS_PER_HOUR)?)?
        .checked_add(component(3)?.checked_mul(SECS_PER_MINUTE)?)?
        .checked_add(component(4)?)?;

    Some(VideoDuration::from_secs(total))
}

/// Sum durations using base-60 carry from seconds into minutes into hours.
///
/// Every entry is applied exactly once; an empty sequence yields
/// [`VideoDuration::ZERO`].
pub fn total<'a, I>(durations: I) -> VideoDuration
where
    I: IntoIterator<Item = &'a VideoDuration>,
{
    let (mut hours, mut minutes, mut seconds) = (0u64, 0u64, 0u64);
    for d in durations {
        seconds += d.seconds;
        minutes += d.minutes + seconds / 60;
        hours += d.hours + minutes / 60;
        seconds %= 60;
        minutes %= 60;
    }
    VideoDuration {
        hours,
        minutes,
        seconds,
    }
}

impl fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

impl FromStr for VideoDuration {
    type Err = CoreError;

    /// Parse a stored `H:M:S` value. Zero-padded components are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("Invalid duration '{s}', expected H:M:S"));

        let mut parts = s.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let hours: u64 = h.trim().parse().map_err(|_| invalid())?;
        let minutes: u64 = m.trim().parse().map_err(|_| invalid())?;
        let seconds: u64 = sec.trim().parse().map_err(|_| invalid())?;

        if minutes >= 60 || seconds >= 60 {
            return Err(CoreError::Validation(format!(
                "Invalid duration '{s}': minutes and seconds must be below 60"
            )));
        }

        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }
}

impl TryFrom<String> for VideoDuration {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for VideoDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VideoDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> VideoDuration {
        s.parse().unwrap()
    }

    // -- from_iso8601 --------------------------------------------------------

    #[test]
    fn iso_full_token() {
        assert_eq!(VideoDuration::from_iso8601("PT1H30M10S").to_string(), "1:30:10");
    }

    #[test]
    fn iso_minutes_and_seconds_unpadded() {
        assert_eq!(VideoDuration::from_iso8601("PT4M30S").to_string(), "0:4:30");
    }

    #[test]
    fn iso_seconds_only() {
        assert_eq!(VideoDuration::from_iso8601("PT45S").to_string(), "0:0:45");
    }

    #[test]
    fn iso_normalises_overflowing_minutes() {
        assert_eq!(VideoDuration::from_iso8601("PT90M").to_string(), "1:30:0");
    }

    #[test]
    fn iso_days_count_as_hours() {
        assert_eq!(VideoDuration::from_iso8601("P1DT2H").to_string(), "26:0:0");
    }

    #[test]
    fn iso_fractional_seconds_truncated() {
        assert_eq!(VideoDuration::from_iso8601("PT10.75S").to_string(), "0:0:10");
    }

    #[test]
    fn iso_surrounding_whitespace_ignored() {
        assert_eq!(VideoDuration::from_iso8601("  PT2M  ").to_string(), "0:2:0");
    }

    #[test]
    fn iso_empty_is_sentinel() {
        assert_eq!(VideoDuration::from_iso8601("").to_string(), "0:0:0");
    }

    #[test]
    fn iso_bare_designators_are_sentinel() {
        assert!(VideoDuration::from_iso8601("P").is_zero());
        assert!(VideoDuration::from_iso8601("PT").is_zero());
    }

    #[test]
    fn iso_malformed_is_sentinel() {
        assert!(VideoDuration::from_iso8601("1:30:10").is_zero());
        assert!(VideoDuration::from_iso8601("PT1H30X").is_zero());
        assert!(VideoDuration::from_iso8601("-PT5M").is_zero());
        assert!(VideoDuration::from_iso8601("PTxS").is_zero());
    }

    #[test]
    fn iso_overflow_is_sentinel() {
        assert!(VideoDuration::from_iso8601("PT99999999999999999999H").is_zero());
    }

    // -- total ---------------------------------------------------------------

    #[test]
    fn total_of_empty_is_zero() {
        assert_eq!(total(&Vec::<VideoDuration>::new()).to_string(), "0:0:0");
    }

    #[test]
    fn total_carries_seconds_and_minutes() {
        let items = [d("0:45:30"), d("0:30:40")];
        assert_eq!(total(&items).to_string(), "1:16:10");
    }

    #[test]
    fn total_is_order_independent() {
        let a = [d("2:59:59"), d("0:0:1"), d("0:59:30"), d("1:0:45")];
        let b = [a[2], a[0], a[3], a[1]];
        assert_eq!(total(&a), total(&b));
        assert_eq!(total(&a).to_string(), "5:0:15");
    }

    #[test]
    fn total_hours_are_unbounded() {
        let items = vec![d("40:0:0"); 5];
        assert_eq!(total(&items).to_string(), "200:0:0");
    }

    #[test]
    fn total_single_entry_is_identity() {
        let items = [d("3:7:9")];
        assert_eq!(total(&items), items[0]);
    }

    // -- FromStr / serde -----------------------------------------------------

    #[test]
    fn parse_accepts_padded_components() {
        assert_eq!(d("0:04:30").to_string(), "0:4:30");
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        assert!("1:30".parse::<VideoDuration>().is_err());
        assert!("1:30:10:5".parse::<VideoDuration>().is_err());
        assert!("".parse::<VideoDuration>().is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_components() {
        assert!("0:60:0".parse::<VideoDuration>().is_err());
        assert!("0:0:60".parse::<VideoDuration>().is_err());
    }

    #[test]
    fn from_hms_carries() {
        assert_eq!(VideoDuration::from_hms(0, 59, 61).to_string(), "1:0:1");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&d("1:2:3")).unwrap();
        assert_eq!(json, "\"1:2:3\"");
    }

    #[test]
    fn deserialize_rejects_malformed() {
        assert!(serde_json::from_str::<VideoDuration>("\"abc\"").is_err());
    }
}
