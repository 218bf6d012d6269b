#![forbid(unsafe_code)]

//! Date values.
//!
//! [`DateValue`] is an immutable point in time with minute-level components
//! that the pickers care about. Every mutator returns a new value; month and
//! year arithmetic clamp the day to the length of the target month, so
//! stepping from 31 January by one month lands on the last day of February.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::{
    Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike,
};

/// Format used to cache the raw value of a committed date on its input.
pub const RAW_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Formats accepted by [`DateValue::from_str`], most specific first.
const ISO_DATETIME_FORMATS: [&str; 3] = [RAW_FORMAT, "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors produced while parsing or formatting dates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("empty date input")]
    Empty,

    #[error("cannot parse {input:?} with format {format:?}")]
    Parse { input: String, format: String },

    #[error("invalid format string: {format:?}")]
    InvalidFormat { format: String },

    #[error("date out of range: {year:04}-{month:02}-{day:02}")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

/// Calendar unit used by [`DateValue::increment`] and [`DateValue::decrement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Year,
    Month,
    Day,
}

/// Number of days in `month` (1-12) of `year`.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// An immutable point in time with year through second components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct DateValue(NaiveDateTime);

impl DateValue {
    /// Midnight on the given calendar day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        Self::from_ymd_hm(year, month, day, 0, 0)
    }

    /// The given calendar day at `hour:minute`.
    pub fn from_ymd_hm(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    ) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .map(Self)
            .ok_or(DateError::OutOfRange { year, month, day })
    }

    /// The current local time.
    #[must_use]
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    #[must_use]
    pub const fn from_naive(inner: NaiveDateTime) -> Self {
        Self(inner)
    }

    #[must_use]
    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of the year, 1-12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month, 1-31.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    #[must_use]
    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// Day of the week, Sunday = 0 through Saturday = 6.
    #[must_use]
    pub fn weekday(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// ISO 8601 week number.
    #[must_use]
    pub fn iso_week(&self) -> u32 {
        self.0.iso_week().week()
    }

    /// Calendar date without the time of day.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// `year * 100 + month`, the key used for month-granularity comparisons.
    #[must_use]
    pub fn year_month(&self) -> i64 {
        i64::from(self.year()) * 100 + i64::from(self.month())
    }

    /// Same calendar day at midnight.
    #[must_use]
    pub fn clear_time(&self) -> Self {
        Self(self.0.date().and_time(NaiveTime::MIN))
    }

    /// Same calendar day at `hour:minute:00`. Out-of-range components are
    /// clamped to 23 and 59.
    #[must_use]
    pub fn with_time(&self, hour: u32, minute: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0).unwrap_or(NaiveTime::MIN);
        Self(self.0.date().and_time(time))
    }

    /// Replace the year, clamping the day (29 February becomes the 28th).
    #[must_use]
    pub fn with_year(&self, year: i32) -> Self {
        self.with_ymd_clamped(year, self.month(), self.day())
    }

    /// Replace the month (1-12), clamping the day.
    #[must_use]
    pub fn with_month(&self, month: u32) -> Self {
        self.with_ymd_clamped(self.year(), month.clamp(1, 12), self.day())
    }

    /// Replace year and month together, clamping the day once.
    #[must_use]
    pub fn with_year_month(&self, year: i32, month: u32) -> Self {
        self.with_ymd_clamped(year, month.clamp(1, 12), self.day())
    }

    /// Replace the day of the month, clamping to the month length.
    #[must_use]
    pub fn with_day(&self, day: u32) -> Self {
        self.with_ymd_clamped(self.year(), self.month(), day)
    }

    fn with_ymd_clamped(&self, year: i32, month: u32, day: u32) -> Self {
        let day = day.clamp(1, days_in_month(year, month));
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|date| Self(date.and_time(self.0.time())))
            .unwrap_or(*self)
    }

    /// Move forward by `amount` units. Results outside chrono's range leave
    /// the value unchanged.
    #[must_use]
    pub fn increment(&self, unit: Unit, amount: u32) -> Self {
        let moved = match unit {
            Unit::Year => self.0.checked_add_months(Months::new(amount.saturating_mul(12))),
            Unit::Month => self.0.checked_add_months(Months::new(amount)),
            Unit::Day => self.0.checked_add_signed(Duration::days(i64::from(amount))),
        };
        moved.map_or(*self, Self)
    }

    /// Move backward by `amount` units.
    #[must_use]
    pub fn decrement(&self, unit: Unit, amount: u32) -> Self {
        let moved = match unit {
            Unit::Year => self.0.checked_sub_months(Months::new(amount.saturating_mul(12))),
            Unit::Month => self.0.checked_sub_months(Months::new(amount)),
            Unit::Day => self.0.checked_sub_signed(Duration::days(i64::from(amount))),
        };
        moved.map_or(*self, Self)
    }

    /// Step back to the closest `weekday` (Sunday = 0) on or before this day.
    #[must_use]
    pub fn rewind_to_weekday(&self, weekday: u32) -> Self {
        let back = (self.weekday() + 7 - weekday % 7) % 7;
        self.decrement(Unit::Day, back)
    }

    /// Same calendar day, ignoring the time of day.
    #[must_use]
    pub fn same_day(&self, other: &Self) -> bool {
        self.date() == other.date()
    }

    /// Render with a strftime-style format string.
    pub fn format(&self, format: &str) -> Result<String, DateError> {
        let mut out = String::new();
        write!(out, "{}", self.0.format(format)).map_err(|_| DateError::InvalidFormat {
            format: format.to_string(),
        })?;
        Ok(out)
    }

    /// Parse `input` with `format`, filling missing parts from `base`.
    ///
    /// A format with only date fields yields midnight; a format with only
    /// time fields yields that time on `base`'s day.
    pub fn parse_with_base(input: &str, format: &str, base: Self) -> Result<Self, DateError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DateError::Empty);
        }
        if let Ok(value) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(Self(value));
        }
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(Self(date.and_time(NaiveTime::MIN)));
        }
        if let Ok(time) = NaiveTime::parse_from_str(input, format) {
            return Ok(Self(base.date().and_time(time)));
        }
        Err(DateError::Parse {
            input: input.to_string(),
            format: format.to_string(),
        })
    }

    /// Parse `input` with `format`, using today for missing date parts.
    pub fn parse(input: &str, format: &str) -> Result<Self, DateError> {
        Self::parse_with_base(input, format, Self::now())
    }

    /// Short English month name (`"Jan"`).
    #[must_use]
    pub fn month_abbr(&self) -> &'static str {
        &self.month_name()[..3]
    }

    /// Full English month name (`"January"`).
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
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
        NAMES[(self.month() as usize).saturating_sub(1) % 12]
    }
}

/// Short English weekday name for Sunday = 0 through Saturday = 6.
#[must_use]
pub fn weekday_abbr(weekday: u32) -> &'static str {
    const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    NAMES[(weekday % 7) as usize]
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(RAW_FORMAT))
    }
}

impl FromStr for DateValue {
    type Err = DateError;

    /// Parses ISO forms: `2024-06-02`, `2024-06-02T10:30`, `2024-06-02T10:30:00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DateError::Empty);
        }
        ISO_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
            .map(Self)
            .ok_or_else(|| DateError::Parse {
                input: s.to_string(),
                format: ISO_DATE_FORMAT.to_string(),
            })
    }
}

impl TryFrom<String> for DateValue {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateValue> for String {
    fn from(value: DateValue) -> Self {
        value.to_string()
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}
