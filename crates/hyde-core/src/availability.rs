#![forbid(unsafe_code)]

//! Sparse table of individually selectable days.

use std::collections::{BTreeMap, BTreeSet};

/// `year -> month (1-12) -> days` listing which days may be chosen.
///
/// Absent years and months mean "nothing listed". An empty day set behaves
/// like an absent month.
///
/// Serialized as nested tables keyed by the decimal year and month, so the
/// map reads the same from JSON objects and TOML tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityMap {
    years: BTreeMap<i32, BTreeMap<u32, BTreeSet<u32>>>,
}

impl AvailabilityMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert_days`](Self::insert_days).
    #[must_use]
    pub fn with_days(mut self, year: i32, month: u32, days: impl IntoIterator<Item = u32>) -> Self {
        self.insert_days(year, month, days);
        self
    }

    /// List `day` as available.
    pub fn insert(&mut self, year: i32, month: u32, day: u32) {
        self.insert_days(year, month, [day]);
    }

    /// List every day in `days` as available. An empty iterator still
    /// creates the (empty) month entry.
    pub fn insert_days(&mut self, year: i32, month: u32, days: impl IntoIterator<Item = u32>) {
        self.years
            .entry(year)
            .or_default()
            .entry(month)
            .or_default()
            .extend(days);
    }

    /// Whether the exact day is listed.
    #[must_use]
    pub fn contains(&self, year: i32, month: u32, day: u32) -> bool {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .is_some_and(|days| days.contains(&day))
    }

    /// Whether the month has at least one listed day.
    #[must_use]
    pub fn month_has_days(&self, year: i32, month: u32) -> bool {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .is_some_and(|days| !days.is_empty())
    }

    /// Whether any month of the year has at least one listed day.
    #[must_use]
    pub fn year_has_days(&self, year: i32) -> bool {
        self.years
            .get(&year)
            .is_some_and(|months| months.values().any(|days| !days.is_empty()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Iterate `(year, month, day)` triples in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, u32, u32)> + '_ {
        self.years.iter().flat_map(|(&year, months)| {
            months
                .iter()
                .flat_map(move |(&month, days)| days.iter().map(move |&day| (year, month, day)))
        })
    }
}

impl FromIterator<(i32, u32, u32)> for AvailabilityMap {
    fn from_iter<T: IntoIterator<Item = (i32, u32, u32)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (year, month, day) in iter {
            map.insert(year, month, day);
        }
        map
    }
}

#[cfg(feature = "serde")]
type KeyedByText = BTreeMap<String, BTreeMap<String, BTreeSet<u32>>>;

#[cfg(feature = "serde")]
impl serde::Serialize for AvailabilityMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keyed: KeyedByText = self
            .years
            .iter()
            .map(|(year, months)| {
                let months = months
                    .iter()
                    .map(|(month, days)| (month.to_string(), days.clone()))
                    .collect();
                (year.to_string(), months)
            })
            .collect();
        keyed.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AvailabilityMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let keyed = KeyedByText::deserialize(deserializer)?;
        let mut map = Self::new();
        for (year, months) in keyed {
            let year: i32 = year
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid year key {year:?}")))?;
            for (month, days) in months {
                let month: u32 = month
                    .trim()
                    .parse()
                    .map_err(|_| D::Error::custom(format!("invalid month key {month:?}")))?;
                map.insert_days(year, month, days);
            }
        }
        Ok(map)
    }
}
