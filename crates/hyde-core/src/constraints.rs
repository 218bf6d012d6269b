#![forbid(unsafe_code)]

//! Selection constraints.
//!
//! [`Constraints`] bundles the range limits and the availability map and
//! answers the one question the pickers ask of every cell: can this value be
//! chosen at this granularity?
//!
//! # Rules
//!
//! | granularity | unavailable when |
//! |-------------|------------------|
//! | year  | outside `[min.year, max.year]`, or the map (not inverted) lists no day that year |
//! | month | year-month outside the truncated range, or the map (not inverted) lists no day that month |
//! | day   | outside `[min, max]`, or not listed in the map; `invert_available` negates the whole day test |
//!
//! `min_date <= max_date` is a caller precondition and is not checked.

use crate::availability::AvailabilityMap;
use crate::date::DateValue;
use crate::view::ViewKind;

/// Range and availability limits for one picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraints {
    min_date: Option<DateValue>,
    max_date: Option<DateValue>,
    available_dates: Option<AvailabilityMap>,
    invert_available: bool,
    start_day: u32,
    years_per_page: u32,
    time_wheel_step: u32,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_date: None,
            max_date: None,
            available_dates: None,
            invert_available: false,
            start_day: 1,
            years_per_page: 20,
            time_wheel_step: 1,
        }
    }
}

impl Constraints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower bound; the time of day is cleared.
    #[must_use]
    pub fn min_date(mut self, date: DateValue) -> Self {
        self.min_date = Some(date.clear_time());
        self
    }

    /// Upper bound; the time of day is cleared.
    #[must_use]
    pub fn max_date(mut self, date: DateValue) -> Self {
        self.max_date = Some(date.clear_time());
        self
    }

    #[must_use]
    pub fn available_dates(mut self, map: AvailabilityMap) -> Self {
        self.available_dates = Some(map);
        self
    }

    #[must_use]
    pub fn invert_available(mut self, invert: bool) -> Self {
        self.invert_available = invert;
        self
    }

    /// First column of the day grid, Sunday = 0 through Saturday = 6.
    #[must_use]
    pub fn start_day(mut self, day: u32) -> Self {
        self.start_day = day % 7;
        self
    }

    /// Years per page in the years view; zero is treated as one.
    #[must_use]
    pub fn years_per_page(mut self, years: u32) -> Self {
        self.years_per_page = years.max(1);
        self
    }

    /// Minute step of the time wheel; zero is treated as one.
    #[must_use]
    pub fn time_wheel_step(mut self, step: u32) -> Self {
        self.time_wheel_step = step.max(1);
        self
    }

    #[must_use]
    pub fn min(&self) -> Option<DateValue> {
        self.min_date
    }

    #[must_use]
    pub fn max(&self) -> Option<DateValue> {
        self.max_date
    }

    #[must_use]
    pub fn availability(&self) -> Option<&AvailabilityMap> {
        self.available_dates.as_ref()
    }

    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.invert_available
    }

    #[must_use]
    pub const fn first_weekday(&self) -> u32 {
        self.start_day
    }

    #[must_use]
    pub const fn page_years(&self) -> u32 {
        self.years_per_page
    }

    #[must_use]
    pub const fn wheel_step(&self) -> u32 {
        self.time_wheel_step
    }

    /// Pull `date` inside the bounds: below the minimum becomes the minimum,
    /// above the maximum becomes the maximum.
    #[must_use]
    pub fn clamp(&self, date: DateValue) -> DateValue {
        if let Some(min) = self.min_date
            && date < min
        {
            #[cfg(feature = "tracing")]
            crate::debug!(message = "constraints.clamp", bound = "min", from = %date, to = %min);
            return min;
        }
        if let Some(max) = self.max_date
            && date > max
        {
            #[cfg(feature = "tracing")]
            crate::debug!(message = "constraints.clamp", bound = "max", from = %date, to = %max);
            return max;
        }
        date
    }

    /// Whether `date` cannot be chosen at the granularity of `view`.
    ///
    /// The time view uses day granularity.
    #[must_use]
    pub fn is_unavailable(&self, date: &DateValue, view: ViewKind) -> bool {
        match view {
            ViewKind::Years => self.year_unavailable(date.year()),
            ViewKind::Months => self.month_unavailable(date.year(), date.month()),
            ViewKind::Days | ViewKind::Time => self.day_unavailable(date),
        }
    }

    #[must_use]
    pub fn year_unavailable(&self, year: i32) -> bool {
        if self.min_date.is_some_and(|min| year < min.year())
            || self.max_date.is_some_and(|max| year > max.year())
        {
            return true;
        }
        match &self.available_dates {
            Some(map) if !self.invert_available => !map.year_has_days(year),
            _ => false,
        }
    }

    #[must_use]
    pub fn month_unavailable(&self, year: i32, month: u32) -> bool {
        let key = i64::from(year) * 100 + i64::from(month);
        if self.min_date.is_some_and(|min| key < min.year_month())
            || self.max_date.is_some_and(|max| key > max.year_month())
        {
            return true;
        }
        match &self.available_dates {
            Some(map) if !self.invert_available => !map.month_has_days(year, month),
            _ => false,
        }
    }

    #[must_use]
    pub fn day_unavailable(&self, date: &DateValue) -> bool {
        let day = date.date();
        let mut blocked = self.min_date.is_some_and(|min| day < min.date())
            || self.max_date.is_some_and(|max| day > max.date());
        if let Some(map) = &self.available_dates {
            blocked = blocked || !map.contains(date.year(), date.month(), date.day());
            if self.invert_available {
                blocked = !blocked;
            }
        }
        blocked
    }

    /// Whether the period containing `date` at `view` granularity ends
    /// before the minimum. Years and months views compare years, the days
    /// view compares year-months.
    #[must_use]
    pub fn precedes_min(&self, date: &DateValue, view: ViewKind) -> bool {
        self.min_date.is_some_and(|min| match view {
            ViewKind::Years | ViewKind::Months => date.year() < min.year(),
            ViewKind::Days | ViewKind::Time => date.year_month() < min.year_month(),
        })
    }

    /// Whether the period containing `date` at `view` granularity starts
    /// after the maximum.
    #[must_use]
    pub fn exceeds_max(&self, date: &DateValue, view: ViewKind) -> bool {
        self.max_date.is_some_and(|max| match view {
            ViewKind::Years | ViewKind::Months => date.year() > max.year(),
            ViewKind::Days | ViewKind::Time => date.year_month() > max.year_month(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> DateValue {
        DateValue::from_ymd(y, m, day).expect("valid date")
    }

    fn ranged() -> Constraints {
        Constraints::new()
            .min_date(d(2010, 1, 10))
            .max_date(d(2010, 3, 20))
    }

    #[test]
    fn clamp_pulls_into_range() {
        let c = ranged();
        assert_eq!(c.clamp(d(2009, 5, 1)), d(2010, 1, 10));
        assert_eq!(c.clamp(d(2011, 5, 1)), d(2010, 3, 20));
        assert_eq!(c.clamp(d(2010, 2, 1)), d(2010, 2, 1));
    }

    #[test]
    fn bounds_drop_time_of_day() {
        let c = Constraints::new().min_date(DateValue::from_ymd_hm(2010, 1, 10, 15, 30).expect("valid"));
        assert_eq!(c.min(), Some(d(2010, 1, 10)));
    }

    #[test]
    fn day_range_is_inclusive() {
        let c = ranged();
        assert!(c.day_unavailable(&d(2010, 1, 9)));
        assert!(!c.day_unavailable(&d(2010, 1, 10)));
        assert!(!c.day_unavailable(&DateValue::from_ymd_hm(2010, 3, 20, 23, 59).expect("valid")));
        assert!(c.day_unavailable(&d(2010, 3, 21)));
    }

    #[test]
    fn month_range_is_truncated() {
        let c = ranged();
        assert!(c.month_unavailable(2009, 12));
        assert!(!c.month_unavailable(2010, 1));
        assert!(!c.month_unavailable(2010, 3));
        assert!(c.month_unavailable(2010, 4));
    }

    #[test]
    fn year_range_is_truncated() {
        let c = ranged();
        assert!(c.year_unavailable(2009));
        assert!(!c.year_unavailable(2010));
        assert!(c.year_unavailable(2011));
    }

    #[test]
    fn availability_map_restricts_days() {
        let c = Constraints::new().available_dates(AvailabilityMap::new().with_days(2024, 6, [1, 2, 3]));
        assert!(c.day_unavailable(&d(2024, 6, 4)));
        assert!(!c.day_unavailable(&d(2024, 6, 2)));
        assert!(!c.month_unavailable(2024, 6));
        assert!(c.month_unavailable(2024, 5));
        assert!(!c.year_unavailable(2024));
        assert!(c.year_unavailable(2023));
    }

    #[test]
    fn inverted_map_blocks_listed_days_only() {
        let c = Constraints::new()
            .available_dates(AvailabilityMap::new().with_days(2024, 6, [1, 2, 3]))
            .invert_available(true);
        assert!(c.day_unavailable(&d(2024, 6, 2)));
        assert!(!c.day_unavailable(&d(2024, 6, 4)));
        // Months and years ignore an inverted map.
        assert!(!c.month_unavailable(2024, 5));
        assert!(!c.year_unavailable(2023));
    }

    #[test]
    fn inversion_also_flips_range_checks() {
        let c = Constraints::new()
            .min_date(d(2024, 6, 10))
            .available_dates(AvailabilityMap::new().with_days(2024, 6, [1, 20]))
            .invert_available(true);
        // Before the minimum and unlisted: blocked, then inverted to allowed.
        assert!(!c.day_unavailable(&d(2024, 6, 5)));
        // Listed and in range: allowed, then inverted to blocked.
        assert!(c.day_unavailable(&d(2024, 6, 20)));
    }

    #[test]
    fn unconstrained_allows_everything() {
        let c = Constraints::new();
        for view in ViewKind::ALL {
            assert!(!c.is_unavailable(&d(1900, 1, 1), view));
        }
    }

    #[test]
    fn period_boundaries() {
        let c = ranged();
        assert!(c.precedes_min(&d(2009, 12, 31), ViewKind::Days));
        assert!(!c.precedes_min(&d(2010, 1, 1), ViewKind::Days));
        assert!(c.precedes_min(&d(2009, 12, 31), ViewKind::Months));
        assert!(c.exceeds_max(&d(2010, 4, 1), ViewKind::Days));
        assert!(!c.exceeds_max(&d(2010, 4, 1), ViewKind::Years));
        assert!(!Constraints::new().precedes_min(&d(1, 1, 1), ViewKind::Years));
    }

    #[test]
    fn setters_sanitise_zero_values() {
        let c = Constraints::new().years_per_page(0).time_wheel_step(0).start_day(8);
        assert_eq!(c.page_years(), 1);
        assert_eq!(c.wheel_step(), 1);
        assert_eq!(c.first_weekday(), 1);
    }
}
