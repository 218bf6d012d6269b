#![forbid(unsafe_code)]

//! Per-picker configuration.
//!
//! [`PickerConfig`] replaces the per-element option bag with one explicit
//! struct, resolved once when a picker is built. With the `config` feature
//! it can be loaded from TOML or JSON:
//!
//! ```toml
//! min_date = "2010-01-01"
//! max_date = "2010-12-31"
//! start_view = "months"
//! time_picker = true
//! time_wheel_step = 5
//! ```
//!
//! ```rust,ignore
//! let config = PickerConfig::from_toml_str(text)?;
//! ```
//!
//! # Defaults
//!
//! Weeks start on Monday, 20 years per page, a 1-minute wheel step, the days
//! view first, months and days can always be left upwards, and the year
//! picker is enabled.

#[cfg(feature = "config")]
use std::path::Path;

use hyde_core::{AvailabilityMap, Constraints, DateValue, ViewKind};

use super::ViewSet;

/// Short date format used when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
/// Short time format appended when the time picker is enabled.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Options for one date picker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PickerConfig {
    /// Earliest selectable day.
    pub min_date: Option<DateValue>,
    /// Latest selectable day.
    pub max_date: Option<DateValue>,
    /// Sparse table of selectable days; overrides the plain range.
    pub available_dates: Option<AvailabilityMap>,
    /// Treat listed days as unavailable instead.
    pub invert_available: bool,
    /// First column of the day grid, Sunday = 0 through Saturday = 6.
    pub start_day: u32,
    pub years_per_page: u32,
    /// Minute step of the time wheel.
    pub time_wheel_step: u32,
    /// Commit from this view instead of drilling further.
    pub pick_only: Option<ViewKind>,
    pub start_view: ViewKind,
    /// strftime-style output format; derived from the other options if unset.
    pub format: Option<String>,
    pub time_picker: bool,
    /// Pages shown side by side.
    pub columns: u32,
    pub can_always_go_up: Vec<ViewKind>,
    pub year_picker: bool,
    /// Reopen on the view that was showing when the picker last closed.
    pub open_last_view: bool,
    /// Write committed values to every attached input.
    pub update_all: bool,
    pub week_numbers: bool,
    /// Swallow keystrokes other than tab/escape on attached inputs.
    pub block_keydown: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            min_date: None,
            max_date: None,
            available_dates: None,
            invert_available: false,
            start_day: 1,
            years_per_page: 20,
            time_wheel_step: 1,
            pick_only: None,
            start_view: ViewKind::Days,
            format: None,
            time_picker: false,
            columns: 1,
            can_always_go_up: vec![ViewKind::Months, ViewKind::Days],
            year_picker: true,
            open_last_view: false,
            update_all: false,
            week_numbers: false,
            block_keydown: true,
        }
    }
}

impl PickerConfig {
    /// Apply the option interactions once:
    ///
    /// - `pick_only` forces the start view and, for the time view, enables
    ///   the time picker.
    /// - A missing format becomes the short date format (empty when only the
    ///   time is picked) followed by the short time format when the time
    ///   picker is on.
    #[must_use]
    pub fn resolved(mut self) -> Self {
        if let Some(view) = self.pick_only {
            self.start_view = view;
            if view == ViewKind::Time {
                self.time_picker = true;
            }
        }
        if self.format.is_none() {
            let mut format = if self.pick_only == Some(ViewKind::Time) {
                String::new()
            } else {
                DEFAULT_DATE_FORMAT.to_string()
            };
            if self.time_picker {
                if !format.is_empty() {
                    format.push(' ');
                }
                format.push_str(DEFAULT_TIME_FORMAT);
            }
            self.format = Some(format);
        }
        self
    }

    /// Output format, falling back to the short date format.
    #[must_use]
    pub fn output_format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Range and availability limits described by this config.
    #[must_use]
    pub fn constraints(&self) -> Constraints {
        let mut constraints = Constraints::new()
            .invert_available(self.invert_available)
            .start_day(self.start_day)
            .years_per_page(self.years_per_page)
            .time_wheel_step(self.time_wheel_step);
        if let Some(min) = self.min_date {
            constraints = constraints.min_date(min);
        }
        if let Some(max) = self.max_date {
            constraints = constraints.max_date(max);
        }
        if let Some(map) = &self.available_dates {
            constraints = constraints.available_dates(map.clone());
        }
        constraints
    }

    #[must_use]
    pub fn always_up(&self) -> ViewSet {
        self.can_always_go_up.iter().copied().collect()
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.start_day > 6 {
            errors.push(format!("start_day must be in 0..=6, got {}", self.start_day));
        }
        if self.years_per_page == 0 {
            errors.push("years_per_page must be > 0".into());
        }
        if self.time_wheel_step == 0 || self.time_wheel_step > 60 {
            errors.push(format!(
                "time_wheel_step must be in 1..=60, got {}",
                self.time_wheel_step
            ));
        }
        if self.columns == 0 {
            errors.push("columns must be > 0".into());
        }
        if let (Some(min), Some(max)) = (self.min_date, self.max_date)
            && min.clear_time() > max.clear_time()
        {
            errors.push(format!("min_date {min} is after max_date {max}"));
        }
        if let Some(format) = &self.format
            && DateValue::now().format(format).is_err()
        {
            errors.push(format!("format {format:?} is not a valid date format"));
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Errors from loading a [`PickerConfig`].
#[cfg(feature = "config")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid picker config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[cfg(feature = "config")]
impl PickerConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
