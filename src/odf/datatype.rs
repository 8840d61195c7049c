//! ODF data type conversions (Boolean, Date, DateTime, Duration).
//!
//! Each codec pairs a native value with one fixed textual form:
//!
//! | type | form |
//! |---|---|
//! | [`Boolean`] | `true` / `false` |
//! | [`Date`] | `YYYY-MM-DD` |
//! | [`DateTimeOdf`] | `YYYY-MM-DDTHH:MM:SS` |
//! | [`DurationOdf`] | `PT<HH>H<MM>M<SS>S` |
//!
//! Decoding anything else fails with [`Error::Format`].

use super::types::CellValue;
use crate::common::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Date pattern
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-time pattern
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ============================================================================
// BOOLEAN CONVERSION
// ============================================================================

/// Boolean data type conversion utilities
///
/// Converts between ODF boolean format ("true"/"false") and Rust bool.
pub struct Boolean;

impl Boolean {
    /// Decode ODF boolean string to Rust bool
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::odf::datatype::Boolean;
    ///
    /// assert_eq!(Boolean::decode("true").unwrap(), true);
    /// assert_eq!(Boolean::decode("false").unwrap(), false);
    /// assert!(Boolean::decode("True").is_err());
    /// ```
    pub fn decode(data: &str) -> Result<bool> {
        match data {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::Format(format!(
                "boolean \"{data}\" is invalid, expected \"true\" or \"false\""
            ))),
        }
    }

    /// Encode Rust bool to ODF boolean string
    #[inline]
    pub fn encode(value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    /// Encode a cell value that must be a boolean.
    ///
    /// Truthy values of other kinds (numbers, non-empty strings) are not
    /// booleans and fail with [`Error::TypeMismatch`].
    pub fn encode_value(value: &CellValue) -> Result<&'static str> {
        match value {
            CellValue::Boolean(b) => Ok(Self::encode(*b)),
            other => Err(Error::TypeMismatch(format!(
                "{} is not a boolean",
                other.kind_name()
            ))),
        }
    }
}

// ============================================================================
// DATE CONVERSION
// ============================================================================

/// Date data type conversion utilities
///
/// Converts between ODF date format ("YYYY-MM-DD") and chrono::NaiveDate.
pub struct Date;

impl Date {
    /// Decode ODF date string to chrono::NaiveDate
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::odf::datatype::Date;
    /// use chrono::NaiveDate;
    ///
    /// let date = Date::decode("2024-01-31").unwrap();
    /// assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    /// assert!(Date::decode("2024-1-31").is_err());
    /// ```
    pub fn decode(data: &str) -> Result<NaiveDate> {
        let date = NaiveDate::parse_from_str(data, DATE_FORMAT)
            .map_err(|e| Error::Format(format!("date \"{data}\" is not YYYY-MM-DD: {e}")))?;
        // chrono accepts unpadded fields; the fixed pattern does not
        if Self::encode(&date) != data {
            return Err(Error::Format(format!("date \"{data}\" is not YYYY-MM-DD")));
        }
        Ok(date)
    }

    /// Encode chrono::NaiveDate to ODF date string
    #[inline]
    pub fn encode(value: &NaiveDate) -> String {
        value.format(DATE_FORMAT).to_string()
    }
}

// ============================================================================
// DATETIME CONVERSION
// ============================================================================

/// DateTime data type conversion utilities
///
/// Converts between ODF datetime format ("YYYY-MM-DDTHH:MM:SS") and
/// chrono::NaiveDateTime. Sub-second precision is not represented.
pub struct DateTimeOdf;

impl DateTimeOdf {
    /// Decode ODF datetime string to chrono::NaiveDateTime
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::odf::datatype::DateTimeOdf;
    /// use chrono::{NaiveDate, Timelike};
    ///
    /// let dt = DateTimeOdf::decode("2024-01-31T15:30:05").unwrap();
    /// assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    /// assert_eq!(dt.second(), 5);
    /// assert!(DateTimeOdf::decode("2024-01-31 15:30:05").is_err());
    /// ```
    pub fn decode(data: &str) -> Result<NaiveDateTime> {
        let value = NaiveDateTime::parse_from_str(data, DATETIME_FORMAT).map_err(|e| {
            Error::Format(format!("date-time \"{data}\" is not YYYY-MM-DDTHH:MM:SS: {e}"))
        })?;
        if Self::encode(&value) != data {
            return Err(Error::Format(format!(
                "date-time \"{data}\" is not YYYY-MM-DDTHH:MM:SS"
            )));
        }
        Ok(value)
    }

    /// Encode chrono::NaiveDateTime to ODF datetime string
    #[inline]
    pub fn encode(value: &NaiveDateTime) -> String {
        value.format(DATETIME_FORMAT).to_string()
    }
}

// ============================================================================
// DURATION CONVERSION
// ============================================================================

/// Duration data type conversion utilities
///
/// Converts between the ODF duration form `PT<HH>H<MM>M<SS>S` and
/// chrono::TimeDelta. Days are folded into hours; there is no day field.
pub struct DurationOdf;

impl DurationOdf {
    /// Decode ODF duration string to chrono::TimeDelta
    ///
    /// Digits accumulate until a unit letter commits them: `H` to hours,
    /// `M` to minutes, `S` to seconds (which ends the scan).
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::odf::datatype::DurationOdf;
    /// use chrono::TimeDelta;
    ///
    /// let dur = DurationOdf::decode("PT01H30M00S").unwrap();
    /// assert_eq!(dur, TimeDelta::minutes(90));
    /// assert!(DurationOdf::decode("PT1H30M").is_err()); // no seconds terminator
    /// assert!(DurationOdf::decode("P1D").is_err());
    /// ```
    pub fn decode(data: &str) -> Result<TimeDelta> {
        if !data.starts_with("PT") {
            return Err(Error::Format(format!(
                "duration \"{data}\" does not start with \"PT\""
            )));
        }

        let commit = |buffer: &str| -> Result<i64> {
            buffer
                .parse::<i64>()
                .map_err(|_| Error::Format(format!("duration \"{data}\" has an empty or invalid field")))
        };

        let mut hours = 0i64;
        let mut minutes = 0i64;
        let mut seconds = None;
        let mut buffer = String::new();

        for c in data.chars() {
            match c {
                '0'..='9' => buffer.push(c),
                'H' => {
                    hours = commit(&buffer)?;
                    buffer.clear();
                },
                'M' => {
                    minutes = commit(&buffer)?;
                    buffer.clear();
                },
                'S' => {
                    seconds = Some(commit(&buffer)?);
                    break;
                },
                _ => {},
            }
        }

        let seconds = seconds.ok_or_else(|| {
            Error::Format(format!("duration \"{data}\" is missing its \"S\" terminator"))
        })?;

        hours
            .checked_mul(3600)
            .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(seconds))
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| Error::Format(format!("duration \"{data}\" is out of range")))
    }

    /// Encode chrono::TimeDelta to ODF duration string
    ///
    /// Fields are zero-padded to two digits; hours may grow past two.
    /// Negative durations have no textual form and are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::odf::datatype::DurationOdf;
    /// use chrono::TimeDelta;
    ///
    /// assert_eq!(DurationOdf::encode(&TimeDelta::minutes(90)).unwrap(), "PT01H30M00S");
    /// assert_eq!(DurationOdf::encode(&TimeDelta::days(5)).unwrap(), "PT120H00M00S");
    /// assert!(DurationOdf::encode(&TimeDelta::minutes(-5)).is_err());
    /// ```
    pub fn encode(value: &TimeDelta) -> Result<String> {
        let total_seconds = value.num_seconds();
        if total_seconds < 0 {
            return Err(Error::InvalidArgument(format!(
                "negative duration {total_seconds}s cannot be encoded"
            )));
        }

        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        Ok(format!("PT{hours:02}H{minutes:02}M{seconds:02}S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boolean_decode() {
        assert!(Boolean::decode("true").unwrap());
        assert!(!Boolean::decode("false").unwrap());
        assert!(matches!(Boolean::decode("invalid"), Err(Error::Format(_))));
        assert!(Boolean::decode("TRUE").is_err());
        assert!(Boolean::decode("1").is_err());
    }

    #[test]
    fn test_boolean_encode_value() {
        assert_eq!(Boolean::encode_value(&CellValue::Boolean(true)).unwrap(), "true");
        assert!(matches!(
            Boolean::encode_value(&CellValue::Integer(1)),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            Boolean::encode_value(&CellValue::String("true".into())),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_date() {
        let date = NaiveDate::from_ymd_opt(2009, 6, 4).unwrap();
        assert_eq!(Date::encode(&date), "2009-06-04");
        assert_eq!(Date::decode("2009-06-04").unwrap(), date);
        assert!(matches!(Date::decode("2009-13-01"), Err(Error::Format(_))));
        assert!(Date::decode("2009-06-04T00:00:00").is_err());
        assert!(Date::decode("").is_err());
    }

    #[test]
    fn test_datetime() {
        let dt = NaiveDate::from_ymd_opt(2009, 6, 4)
            .unwrap()
            .and_hms_opt(13, 28, 44)
            .unwrap();
        assert_eq!(DateTimeOdf::encode(&dt), "2009-06-04T13:28:44");
        assert_eq!(DateTimeOdf::decode("2009-06-04T13:28:44").unwrap(), dt);
        assert!(DateTimeOdf::decode("2009-06-04").is_err());
        assert!(DateTimeOdf::decode("2009-06-04T13:28:44Z").is_err());
    }

    #[test]
    fn test_duration_decode() {
        assert_eq!(DurationOdf::decode("PT00H00M00S").unwrap(), TimeDelta::zero());
        assert_eq!(
            DurationOdf::decode("PT123H04M05S").unwrap(),
            TimeDelta::hours(123) + TimeDelta::minutes(4) + TimeDelta::seconds(5)
        );
        // Fields may be omitted, only the terminator is mandatory
        assert_eq!(DurationOdf::decode("PT7S").unwrap(), TimeDelta::seconds(7));
        // The scan stops at S
        assert_eq!(DurationOdf::decode("PT1SXYZ").unwrap(), TimeDelta::seconds(1));

        assert!(matches!(DurationOdf::decode("1H2M3S"), Err(Error::Format(_))));
        assert!(matches!(DurationOdf::decode("PT1H2M"), Err(Error::Format(_))));
        assert!(matches!(DurationOdf::decode("PTS"), Err(Error::Format(_))));
    }

    #[test]
    fn test_duration_encode() {
        assert_eq!(DurationOdf::encode(&TimeDelta::zero()).unwrap(), "PT00H00M00S");
        let dur = TimeDelta::days(1) + TimeDelta::hours(2) + TimeDelta::minutes(30);
        assert_eq!(DurationOdf::encode(&dur).unwrap(), "PT26H30M00S");
        assert!(matches!(
            DurationOdf::encode(&TimeDelta::seconds(-1)),
            Err(Error::InvalidArgument(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_date_round_trip(y in 1i32..=9999, m in 1u32..=12, d in 1u32..=28) {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            prop_assert_eq!(Date::decode(&Date::encode(&date)).unwrap(), date);
        }

        #[test]
        fn prop_datetime_round_trip(
            y in 1i32..=9999, m in 1u32..=12, d in 1u32..=28,
            hh in 0u32..24, mm in 0u32..60, ss in 0u32..60,
        ) {
            let dt = NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(hh, mm, ss).unwrap();
            prop_assert_eq!(DateTimeOdf::decode(&DateTimeOdf::encode(&dt)).unwrap(), dt);
        }

        #[test]
        fn prop_duration_round_trip(secs in 0i64..=10_000_000_000i64) {
            let dur = TimeDelta::seconds(secs);
            let text = DurationOdf::encode(&dur).unwrap();
            prop_assert_eq!(DurationOdf::decode(&text).unwrap(), dur);
        }

        #[test]
        fn prop_boolean_round_trip(b in any::<bool>()) {
            prop_assert_eq!(Boolean::decode(Boolean::encode(b)).unwrap(), b);
        }
    }
}
