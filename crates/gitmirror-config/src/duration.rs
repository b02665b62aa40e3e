// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Human-readable durations.
//!
//! Intervals are written the way the `-t` flag has always accepted them:
//! a sequence of decimal numbers each followed by a unit, e.g. `300s`,
//! `10m`, `1h30m`, `1.5h`, `250ms`. Valid units are `ns`, `us` (or `µs`),
//! `ms`, `s`, `m` and `h`. A bare `0` is accepted; any other number needs a
//! unit. Negative durations are rejected.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

const NANOS_PER_UNIT: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
];

/// Parse a duration string such as `"1h30m"`.
pub fn parse_duration(input: &str) -> ConfigResult<Duration> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ConfigError::invalid_duration(input, "empty duration"));
    }
    if text.starts_with('-') {
        return Err(ConfigError::invalid_duration(input, "duration must not be negative"));
    }
    let text = text.strip_prefix('+').unwrap_or(text);
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos: u128 = 0;
    let mut rest = text;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(ConfigError::invalid_duration(input, "expected a number"));
        }
        let (number, after_number) = rest.split_at(number_len);

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        if unit_len == 0 {
            return Err(ConfigError::invalid_duration(input, format!("missing unit after '{}'", number)));
        }
        let (unit, after_unit) = after_number.split_at(unit_len);

        let unit_nanos = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, nanos)| *nanos)
            .ok_or_else(|| ConfigError::invalid_duration(input, format!("unknown unit '{}'", unit)))?;

        total_nanos = total_nanos
            .checked_add(component_nanos(input, number, unit_nanos)?)
            .ok_or_else(|| ConfigError::invalid_duration(input, "duration overflows"))?;
        rest = after_unit;
    }

    let secs = u64::try_from(total_nanos / 1_000_000_000)
        .map_err(|_| ConfigError::invalid_duration(input, "duration overflows"))?;
    // Remainder of a division by 1e9 always fits in u32.
    let nanos = (total_nanos % 1_000_000_000) as u32;
    Ok(Duration::new(secs, nanos))
}

fn component_nanos(input: &str, number: &str, unit_nanos: u128) -> ConfigResult<u128> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (number, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(ConfigError::invalid_duration(input, "expected a number"));
    }
    if fraction.contains('.') {
        return Err(ConfigError::invalid_duration(input, format!("malformed number '{}'", number)));
    }

    let whole_value: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| ConfigError::invalid_duration(input, format!("malformed number '{}'", number)))?
    };
    let mut nanos = whole_value
        .checked_mul(unit_nanos)
        .ok_or_else(|| ConfigError::invalid_duration(input, "duration overflows"))?;

    // Fractional digits beyond nanosecond resolution are truncated.
    let mut scale = unit_nanos;
    for digit in fraction.chars() {
        scale /= 10;
        if scale == 0 {
            break;
        }
        let value = u128::from(digit.to_digit(10).unwrap_or(0));
        nanos += value * scale;
    }
    Ok(nanos)
}

/// Render a duration in the shortest unit that represents it exactly.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if duration.subsec_nanos() == 0 {
        if secs == 0 {
            return "0s".to_string();
        }
        if secs % 3_600 == 0 {
            return format!("{}h", secs / 3_600);
        }
        if secs % 60 == 0 {
            return format!("{}m", secs / 60);
        }
        return format!("{}s", secs);
    }
    if duration.subsec_nanos() % 1_000_000 == 0 {
        return format!("{}ms", duration.as_millis());
    }
    format!("{}ns", duration.as_nanos())
}

/// Serde adapter: accepts a duration string or an integer number of seconds.
pub mod serde_duration {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match RawDuration::deserialize(deserializer)? {
            RawDuration::Seconds(secs) => Ok(Duration::from_secs(secs)),
            RawDuration::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simple_units() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7_200));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("7us").unwrap(), Duration::from_micros(7));
        assert_eq!(parse_duration("9ns").unwrap(), Duration::from_nanos(9));
    }

    #[test]
    fn test_compound_and_fractional() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("1m0.5s").unwrap(), Duration::from_millis(60_500));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_without_unit() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_rejections() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("-5s").is_err());
        assert!(parse_duration("5 minutes").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("1.2.3s").is_err());
    }

    #[test]
    fn test_format_picks_largest_exact_unit() {
        assert_eq!(format_duration(Duration::from_secs(300)), "5m");
        assert_eq!(format_duration(Duration::from_secs(7_200)), "2h");
        assert_eq!(format_duration(Duration::from_secs(90)), "90s");
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1500ms");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    proptest! {
        #[test]
        fn prop_format_then_parse_is_identity(secs in 0u64..10_000_000, millis in 0u32..1_000) {
            let duration = Duration::from_secs(secs) + Duration::from_millis(u64::from(millis));
            prop_assert_eq!(parse_duration(&format_duration(duration)).unwrap(), duration);
        }
    }
}
