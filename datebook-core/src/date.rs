//! Calendar arithmetic: month navigation, month lengths, weekdays and the
//! canonical `YYYY-MM-DD` date key.
//!
//! Months are carried 0-based (`month0`, 0 = January) inside [`YearMonth`],
//! the same way `chrono::Datelike::month0` counts them. Date keys use the
//! 1-based month of their text form.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DatebookError, DatebookResult};

pub const MONTHS_IN_YEAR: u32 = 12;
pub const DAYS_IN_WEEK: u32 = 7;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Offsets for Sakamoto's day-of-week method, indexed by 0-based month.
const WEEKDAY_OFFSETS: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

/// Gregorian leap year rule, applied proleptically.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Day of the week for a date, 0 = Sunday through 6 = Saturday.
///
/// Pure integer arithmetic so that every `i32` year works; chrono's
/// `NaiveDate` stops at roughly ±262,000 years.
fn weekday_from_sunday(year: i32, month0: u32, day: u32) -> u32 {
    let mut y = i64::from(year);
    if month0 < 2 {
        y -= 1;
    }
    let w = y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        + WEEKDAY_OFFSETS[month0 as usize]
        + i64::from(day);
    // rem_euclid(7) is always in 0..7
    w.rem_euclid(7) as u32
}

/// A calendar month of a specific year.
///
/// The month is always normalized into `0..=11`; there is no way to build
/// a `YearMonth` outside that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month0: u32,
}

impl YearMonth {
    /// Build from a 0-based month. Returns `None` if `month0 > 11`.
    pub const fn new(year: i32, month0: u32) -> Option<Self> {
        if month0 < MONTHS_IN_YEAR {
            Some(YearMonth { year, month0 })
        } else {
            None
        }
    }

    /// Build from a 1-based month, as used on the wire and in date keys.
    pub fn from_month(year: i32, month: u32) -> Option<Self> {
        month.checked_sub(1).and_then(|month0| Self::new(year, month0))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    /// Move by `delta` months in either direction, carrying into the year.
    ///
    /// `navigate(-1)` from January lands on December of the previous year,
    /// `navigate(12)` keeps the month and adds one to the year.
    ///
    /// # Panics
    ///
    /// Panics if the resulting year does not fit in an `i32`; see
    /// [`checked_navigate`](Self::checked_navigate).
    pub fn navigate(self, delta: i64) -> Self {
        self.checked_navigate(delta)
            .expect("month navigation overflowed the year range")
    }

    /// Like [`navigate`](Self::navigate), but `None` when the year would
    /// leave the `i32` range.
    pub fn checked_navigate(self, delta: i64) -> Option<Self> {
        let months = i64::from(MONTHS_IN_YEAR);
        let total = (i64::from(self.year) * months + i64::from(self.month0)).checked_add(delta)?;
        let year = i32::try_from(total.div_euclid(months)).ok()?;
        // rem_euclid(12) is always in 0..12
        let month0 = total.rem_euclid(months) as u32;
        Some(YearMonth { year, month0 })
    }

    pub fn previous(self) -> Self {
        self.navigate(-1)
    }

    pub fn next(self) -> Self {
        self.navigate(1)
    }

    pub fn days_in_month(&self) -> u32 {
        if self.month0 == 1 && is_leap_year(self.year) {
            29
        } else {
            MONTH_LENGTHS[self.month0 as usize]
        }
    }

    /// Weekday of the 1st of this month, 0 = Sunday through 6 = Saturday.
    pub fn first_weekday(&self) -> u32 {
        weekday_from_sunday(self.year, self.month0, 1)
    }

    /// Key of a day within this month, or `None` if the day does not exist.
    pub fn day(&self, day: u32) -> Option<DateKey> {
        DateKey::new(self.year, self.month(), day)
    }

    pub fn contains(&self, key: &DateKey) -> bool {
        key.year == self.year && key.month == self.month()
    }

    /// The `YYYY-MM` text form used in configuration and on the command line.
    pub fn to_key(&self) -> String {
        format!("{}-{:02}", YearText(self.year), self.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

impl FromStr for YearMonth {
    type Err = DatebookError;

    /// Parse `YYYY-MM` with a 1-based month.
    fn from_str(s: &str) -> DatebookResult<Self> {
        let invalid = || DatebookError::Validation(format!("'{s}' is not a YYYY-MM month"));
        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::from_month(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = DatebookError;

    fn try_from(value: String) -> DatebookResult<Self> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_key()
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month0: date.month0(),
        }
    }
}

/// Canonical date key: a calendar date whose text form is `YYYY-MM-DD`.
///
/// Ordering follows the calendar, so keys can bound range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey {
    year: i32,
    month: u32,
    day: u32,
}

impl DateKey {
    /// Build from a 1-based month. Returns `None` for dates that do not exist.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        let month_len = YearMonth::from_month(year, month)?.days_in_month();
        (1..=month_len)
            .contains(&day)
            .then_some(DateKey { year, month, day })
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        DateKey {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month0: self.month - 1,
        }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{:02}", YearText(self.year), self.month, self.day)
    }
}

impl FromStr for DateKey {
    type Err = DatebookError;

    /// Only the zero-padded `YYYY-MM-DD` form is accepted. Years past
    /// 9999 (or before year 0) take as many digits as they need, so every
    /// key reads back from its `Display` form.
    fn from_str(s: &str) -> DatebookResult<Self> {
        let invalid = || DatebookError::Validation(format!("'{s}' is not a YYYY-MM-DD date"));

        let (rest, day) = s.rsplit_once('-').ok_or_else(invalid)?;
        let (year, month) = rest.rsplit_once('-').ok_or_else(invalid)?;

        let year = parse_year(year).ok_or_else(invalid)?;
        let month = parse_two_digits(month).ok_or_else(invalid)?;
        let day = parse_two_digits(day).ok_or_else(invalid)?;
        DateKey::new(year, month, day).ok_or_else(invalid)
    }
}

/// At least four digits, no leading zero beyond that, optional `-` for
/// years before 0.
fn parse_year(text: &str) -> Option<i32> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text),
    };
    let canonical = digits.len() == 4 || (digits.len() > 4 && !digits.starts_with('0'));
    if !canonical || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let magnitude: i64 = digits.parse().ok()?;
    if negative && magnitude == 0 {
        return None;
    }
    i32::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn parse_two_digits(text: &str) -> Option<u32> {
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Year written with at least four digits; the sign sits outside the
/// padding, so -1 is `-0001`.
struct YearText(i32);

impl fmt::Display for YearText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{:04}", self.0.unsigned_abs())
        } else {
            write!(f, "{:04}", self.0)
        }
    }
}

impl TryFrom<String> for DateKey {
    type Error = DatebookError;

    fn try_from(value: String) -> DatebookResult<Self> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.to_string()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey::from_naive(date)
    }
}
