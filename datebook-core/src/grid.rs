//! Month grid generation.
//!
//! A month view is always six full weeks starting on Sunday: the tail of
//! the previous month, every day of the month itself, then the start of the
//! following month until 42 cells are filled.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::date::{DAYS_IN_WEEK, DateKey, YearMonth};

pub const GRID_WEEKS: usize = 6;
pub const GRID_CELLS: usize = GRID_WEEKS * DAYS_IN_WEEK as usize;

/// One day cell of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    /// Day of its own month, 1..=31.
    pub day: u32,
    pub in_current_month: bool,
    /// Only set for days of the displayed month.
    pub date: Option<DateKey>,
    pub has_appointment: bool,
    pub is_today: bool,
}

impl CalendarCell {
    fn padding(day: u32) -> Self {
        CalendarCell {
            day,
            in_current_month: false,
            date: None,
            has_appointment: false,
            is_today: false,
        }
    }
}

/// Build the 42-cell grid for `month`.
///
/// `appointment_dates` marks which days get `has_appointment`; only keys
/// inside `month` can match. The result is built fresh on every call.
pub fn compute(
    month: YearMonth,
    today: DateKey,
    appointment_dates: &BTreeSet<DateKey>,
) -> Vec<CalendarCell> {
    let mut cells = Vec::with_capacity(GRID_CELLS);

    let leading = month.first_weekday();
    // Before the first representable month the padding is a December
    let previous_len = month
        .checked_navigate(-1)
        .map_or(31, |previous| previous.days_in_month());
    cells.extend((previous_len - leading + 1..=previous_len).map(CalendarCell::padding));

    cells.extend((1..=month.days_in_month()).filter_map(|day| {
        let date = month.day(day)?;
        Some(CalendarCell {
            day,
            in_current_month: true,
            date: Some(date),
            has_appointment: appointment_dates.contains(&date),
            is_today: date == today,
        })
    }));

    let trailing = GRID_CELLS - cells.len();
    cells.extend((1..=trailing as u32).map(CalendarCell::padding));

    cells
}

/// Split a grid into its weeks, Sunday first.
pub fn weeks(cells: &[CalendarCell]) -> impl Iterator<Item = &[CalendarCell]> {
    cells.chunks(DAYS_IN_WEEK as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month0: u32) -> YearMonth {
        YearMonth::new(year, month0).unwrap()
    }

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn far_away_today() -> DateKey {
        DateKey::new(1970, 1, 1).unwrap()
    }

    #[test]
    fn every_month_has_42_cells() {
        let none = BTreeSet::new();
        for year in [1900, 1999, 2000, 2015, 2024, 2025, 2026, 2100] {
            for month0 in 0..12 {
                let cells = compute(ym(year, month0), far_away_today(), &none);
                assert_eq!(cells.len(), GRID_CELLS, "{year}-{month0}");
                assert_eq!(weeks(&cells).count(), GRID_WEEKS);
            }
        }
    }

    #[test]
    fn extreme_years_still_fill_the_grid() {
        let none = BTreeSet::new();
        for month in [ym(i32::MIN, 0), ym(i32::MAX, 11), ym(-1, 1)] {
            let cells = compute(month, far_away_today(), &none);
            assert_eq!(cells.len(), GRID_CELLS);
            let leading = month.first_weekday() as usize;
            assert_eq!(cells[leading].day, 1);
            assert!(cells[leading].in_current_month);
        }
    }

    #[test]
    fn current_month_cells_match_days_in_month() {
        let none = BTreeSet::new();
        for (year, month0, expected) in [(2024, 1, 29), (2025, 1, 28), (2000, 1, 29), (1900, 1, 28), (2025, 3, 30), (2025, 11, 31)] {
            let cells = compute(ym(year, month0), far_away_today(), &none);
            let in_month = cells.iter().filter(|c| c.in_current_month).count();
            assert_eq!(in_month, expected, "{year}-{month0}");
        }
    }

    #[test]
    fn leading_cells_match_first_weekday() {
        let none = BTreeSet::new();
        for month0 in 0..12 {
            let month = ym(2025, month0);
            let cells = compute(month, far_away_today(), &none);
            let leading = cells.iter().take_while(|c| !c.in_current_month).count();
            assert_eq!(leading as u32, month.first_weekday());
            assert!(leading < 7);
        }
    }

    #[test]
    fn april_2025_layout() {
        let cells = compute(ym(2025, 3), far_away_today(), &BTreeSet::new());

        // April 1st 2025 is a Tuesday: March 30 and 31 lead
        let leading: Vec<u32> = cells.iter().take(2).map(|c| c.day).collect();
        assert_eq!(leading, vec![30, 31]);
        assert!(cells[2].in_current_month);
        assert_eq!(cells[2].day, 1);
        assert_eq!(cells[2].date, Some(key("2025-04-01")));

        // 2 + 30 = 32 cells, then May 1..=10
        let trailing: Vec<u32> = cells[32..].iter().map(|c| c.day).collect();
        assert_eq!(trailing, (1..=10).collect::<Vec<_>>());
        assert!(cells[32..].iter().all(|c| !c.in_current_month && c.date.is_none()));
    }

    #[test]
    fn january_leads_with_december() {
        // January 1st 2025 is a Wednesday
        let cells = compute(ym(2025, 0), far_away_today(), &BTreeSet::new());
        let leading: Vec<u32> = cells.iter().take_while(|c| !c.in_current_month).map(|c| c.day).collect();
        assert_eq!(leading, vec![29, 30, 31]);
    }

    #[test]
    fn march_after_leap_february() {
        // March 1st 2024 is a Friday; leading days come from a 29-day February
        let cells = compute(ym(2024, 2), far_away_today(), &BTreeSet::new());
        let leading: Vec<u32> = cells.iter().take_while(|c| !c.in_current_month).map(|c| c.day).collect();
        assert_eq!(leading, vec![25, 26, 27, 28, 29]);
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_cells() {
        // February 2026 starts on a Sunday and has exactly four weeks
        let cells = compute(ym(2026, 1), far_away_today(), &BTreeSet::new());
        assert!(cells[0].in_current_month);
        assert_eq!(cells[0].day, 1);
        assert_eq!(cells.iter().filter(|c| !c.in_current_month).count(), 14);
    }

    #[test]
    fn marks_appointments_and_today() {
        let dates: BTreeSet<DateKey> = [key("2025-04-05"), key("2025-04-20"), key("2025-05-01")].into();
        let today = key("2025-04-20");
        let cells = compute(ym(2025, 3), today, &dates);

        let marked: Vec<u32> = cells.iter().filter(|c| c.has_appointment).map(|c| c.day).collect();
        assert_eq!(marked, vec![5, 20]);

        let todays: Vec<&CalendarCell> = cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].date, Some(today));
    }

    #[test]
    fn today_outside_month_marks_nothing() {
        // May 1st shows as a trailing cell of April but is never "today" there
        let cells = compute(ym(2025, 3), key("2025-05-01"), &BTreeSet::new());
        assert!(cells.iter().all(|c| !c.is_today));
    }
}
