//! Clock arithmetic over zero-padded `"HH:MM"` strings.
//!
//! Times carry no date and no timezone. Every result wraps into a single day,
//! so `23:50` plus thirty minutes is `00:20`.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

/// Minutes in one day; every formatted time wraps modulo this value.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid clock time '{0}': expected HH:MM")]
    Malformed(String),
    #[error("invalid clock time '{0}': hour must be 00-23 and minute 00-59")]
    OutOfRange(String),
}

/// Parse a strict `"HH:MM"` string into a chrono time.
///
/// Single-digit hours such as `"9:05"` are rejected: the lifecycle code
/// orders start times as strings, which only works when both fields are
/// zero-padded.
pub fn parse(time: &str) -> Result<NaiveTime, FormatError> {
    let bytes = time.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit);
    if !well_formed {
        return Err(FormatError::Malformed(time.to_string()));
    }

    NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| FormatError::OutOfRange(time.to_string()))
}

/// Convert a clock time to minutes since midnight.
pub fn time_to_minutes(time: &str) -> Result<i64, FormatError> {
    let parsed = parse(time)?;
    Ok(i64::from(parsed.hour()) * 60 + i64::from(parsed.minute()))
}

/// Format a minute count as `"HH:MM"`, wrapping whole days away.
pub fn minutes_to_time(minutes: i64) -> String {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Shift a clock time by `minutes`, which may be negative.
///
/// The delta is reduced to a single day first, so any `i64` is accepted.
pub fn add_minutes(time: &str, minutes: i64) -> Result<String, FormatError> {
    Ok(minutes_to_time(
        time_to_minutes(time)? + minutes.rem_euclid(MINUTES_PER_DAY),
    ))
}

#[cfg(test)]
mod clock_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("09:00", 30, "09:30")]
    #[case("09:45", 45, "10:30")]
    #[case("23:50", 30, "00:20")]
    #[case("00:10", -20, "23:50")]
    #[case("12:00", 0, "12:00")]
    #[case("12:00", MINUTES_PER_DAY, "12:00")]
    #[case("00:00", -3 * MINUTES_PER_DAY - 1, "23:59")]
    #[case("00:01", i64::MAX, "18:08")]
    #[case("00:01", i64::MIN, "05:53")]
    #[case("23:59", i64::MAX - 1, "18:05")]
    fn it_should_add_minutes_with_wraparound(
        #[case] time: &str,
        #[case] minutes: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(add_minutes(time, minutes).unwrap(), expected);
    }

    #[rstest]
    #[case("00:00", 0)]
    #[case("09:15", 555)]
    #[case("23:59", 1439)]
    fn it_should_convert_time_to_minutes(#[case] time: &str, #[case] expected: i64) {
        assert_eq!(time_to_minutes(time).unwrap(), expected);
    }

    #[rstest]
    #[case(0, "00:00")]
    #[case(615, "10:15")]
    #[case(1440, "00:00")]
    #[case(1500, "01:00")]
    #[case(-30, "23:30")]
    fn it_should_format_minutes_as_time(#[case] minutes: i64, #[case] expected: &str) {
        assert_eq!(minutes_to_time(minutes), expected);
    }

    #[rstest]
    #[case("")]
    #[case("9:05")]
    #[case("09:5")]
    #[case("0905")]
    #[case("09-05")]
    #[case("ab:cd")]
    #[case("09:05:00")]
    #[case(" 9:05")]
    fn it_should_reject_malformed_times(#[case] time: &str) {
        assert_eq!(
            time_to_minutes(time),
            Err(FormatError::Malformed(time.to_string()))
        );
    }

    #[rstest]
    #[case("24:00")]
    #[case("12:60")]
    #[case("99:99")]
    fn it_should_reject_out_of_range_times(#[case] time: &str) {
        assert_eq!(
            add_minutes(time, 15),
            Err(FormatError::OutOfRange(time.to_string()))
        );
    }

    #[rstest]
    fn it_should_match_the_modular_formula_for_every_minute_of_the_day() {
        for start in (0..MINUTES_PER_DAY).step_by(7) {
            let time = minutes_to_time(start);
            for delta in [-2881, -1440, -61, -1, 0, 1, 59, 725, 1440, 4000] {
                let shifted = add_minutes(&time, delta).unwrap();
                let expected = ((start + delta) % MINUTES_PER_DAY + MINUTES_PER_DAY) % MINUTES_PER_DAY;
                assert_eq!(time_to_minutes(&shifted).unwrap(), expected);
                assert_eq!(add_minutes(&shifted, -delta).unwrap(), time);
            }
        }
    }

    #[rstest]
    #[case(i64::MAX)]
    #[case(i64::MIN + 1)]
    #[case(-9_000_000_000_000)]
    fn it_should_invert_extreme_shifts(#[case] delta: i64) {
        for time in ["00:00", "09:30", "23:59"] {
            let shifted = add_minutes(time, delta).unwrap();
            assert_eq!(add_minutes(&shifted, -delta).unwrap(), time);
        }
    }
}
