//! Conversion of 24-hour `HH:MM` input into the 12-hour display form stored
//! on appointments.

use chrono::NaiveTime;

use crate::error::{DatebookError, DatebookResult};

/// Convert `HH:MM` (24-hour) into `H:MM AM/PM`.
///
/// Midnight becomes `12:MM AM` and noon `12:MM PM`; the hour is never
/// zero-padded in the output.
pub fn format_time_12h(time24: &str) -> DatebookResult<String> {
    let invalid = || DatebookError::Validation(format!("'{time24}' is not an HH:MM time"));

    let (hours, minutes) = time24.trim().split_once(':').ok_or_else(invalid)?;
    if hours.is_empty() || minutes.len() != 2 {
        return Err(invalid());
    }

    let time = NaiveTime::parse_from_str(&format!("{hours}:{minutes}"), "%H:%M")
        .map_err(|_| invalid())?;

    Ok(time.format("%-I:%M %p").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_reference_times() {
        assert_eq!(format_time_12h("00:30").unwrap(), "12:30 AM");
        assert_eq!(format_time_12h("13:15").unwrap(), "1:15 PM");
        assert_eq!(format_time_12h("12:00").unwrap(), "12:00 PM");
        assert_eq!(format_time_12h("09:05").unwrap(), "9:05 AM");
    }

    #[test]
    fn covers_hour_boundaries() {
        assert_eq!(format_time_12h("01:00").unwrap(), "1:00 AM");
        assert_eq!(format_time_12h("11:59").unwrap(), "11:59 AM");
        assert_eq!(format_time_12h("23:59").unwrap(), "11:59 PM");
        assert_eq!(format_time_12h("9:05").unwrap(), "9:05 AM");
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "12", "24:00", "12:60", "ab:cd", "12:5", ":30", "12:00 PM"] {
            assert!(
                matches!(format_time_12h(bad), Err(DatebookError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
