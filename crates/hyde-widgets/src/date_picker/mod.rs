#![forbid(unsafe_code)]

//! Date picker state machine.
//!
//! [`PickerState`] decides which page of cells is visible, which cells can be
//! chosen, and how a choice moves the picker between views:
//!
//! | from   | condition                              | to     |
//! |--------|----------------------------------------|--------|
//! | Years  | `pick_only != Years`                   | Months |
//! | Years  | `pick_only == Years`                   | commit |
//! | Months | `pick_only != Months`                  | Days   |
//! | Months | `pick_only == Months`                  | commit |
//! | Days   | `pick_only != Days` and time picker on | Time   |
//! | Days   | otherwise                              | commit |
//! | Time   | hour/minute confirmed                  | commit |
//!
//! "Commit" is terminal: the state reports the final value and the owner
//! discards it. Navigation past a range limit is disabled rather than an
//! error; every operation is total.

pub mod attach;
pub mod cells;
pub mod config;
pub mod time_wheel;

use bitflags::bitflags;
use hyde_core::{Constraints, DateValue, Unit, ViewKind};

pub use cells::{CellDescriptor, CellPage};
use cells::{Marks, build_pages, window_bounds};
use time_wheel::{Wheel, round_minutes, wheel_hour, wheel_minute};

bitflags! {
    /// Set of views, used for the views that may always be left upwards.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ViewSet: u8 {
        const TIME = 1 << 0;
        const DAYS = 1 << 1;
        const MONTHS = 1 << 2;
        const YEARS = 1 << 3;
    }
}

impl ViewSet {
    /// Flag for a single view.
    #[must_use]
    pub const fn of(view: ViewKind) -> Self {
        match view {
            ViewKind::Time => Self::TIME,
            ViewKind::Days => Self::DAYS,
            ViewKind::Months => Self::MONTHS,
            ViewKind::Years => Self::YEARS,
        }
    }

    #[must_use]
    pub fn has(self, view: ViewKind) -> bool {
        self.contains(Self::of(view))
    }
}

impl FromIterator<ViewKind> for ViewSet {
    fn from_iter<T: IntoIterator<Item = ViewKind>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), |set, view| set | Self::of(view))
    }
}

/// Page navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

/// Outcome of choosing a cell or confirming a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The picker now shows this view.
    View(ViewKind),
    /// The final value; the picker should close.
    Commit(DateValue),
    /// The cell was unselectable or belongs to another view.
    Ignored,
}

/// Navigation and selection state of one open picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    current_view: ViewKind,
    selected: DateValue,
    anchor: DateValue,
    /// Day of month the anchor was last set to; navigation restores it so a
    /// round trip through a shorter month lands back on the same day.
    anchor_day: u32,
    today: DateValue,
    constraints: Constraints,
    pick_only: Option<ViewKind>,
    can_always_go_up: ViewSet,
    time_picker: bool,
    year_picker: bool,
    columns: u32,
    week_numbers: bool,
}

impl PickerState {
    /// Open a picker on `seed`, clamped into the configured range.
    #[must_use]
    pub fn open(seed: DateValue, constraints: Constraints, start_view: ViewKind) -> Self {
        let seed = constraints.clamp(seed);
        let mut state = Self {
            current_view: start_view,
            selected: seed,
            anchor: seed,
            anchor_day: seed.day(),
            today: DateValue::now(),
            constraints,
            pick_only: None,
            can_always_go_up: ViewSet::MONTHS | ViewSet::DAYS,
            time_picker: false,
            year_picker: true,
            columns: 1,
            week_numbers: false,
        };
        if start_view == ViewKind::Time {
            state.snap_minutes();
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "datepicker.open",
            view = start_view.as_str(),
            seed = %seed
        );
        state
    }

    /// Restrict committing to a single view.
    #[must_use]
    pub fn pick_only(mut self, view: Option<ViewKind>) -> Self {
        self.pick_only = view;
        self
    }

    /// Views that may be left upwards even when they are the `pick_only` view.
    #[must_use]
    pub fn can_always_go_up(mut self, views: ViewSet) -> Self {
        self.can_always_go_up = views;
        self
    }

    /// Offer the time view after a day is chosen.
    #[must_use]
    pub fn time_picker(mut self, enabled: bool) -> Self {
        self.time_picker = enabled;
        self
    }

    /// Allow going up from months to years.
    #[must_use]
    pub fn year_picker(mut self, enabled: bool) -> Self {
        self.year_picker = enabled;
        self
    }

    /// Number of pages shown side by side (at least one).
    #[must_use]
    pub fn columns(mut self, columns: u32) -> Self {
        self.columns = columns.max(1);
        self
    }

    #[must_use]
    pub fn week_numbers(mut self, enabled: bool) -> Self {
        self.week_numbers = enabled;
        self
    }

    /// Override the date used for `is_today` marks.
    #[must_use]
    pub fn with_today(mut self, today: DateValue) -> Self {
        self.today = today;
        self
    }

    #[must_use]
    pub const fn current_view(&self) -> ViewKind {
        self.current_view
    }

    #[must_use]
    pub const fn selected_date(&self) -> DateValue {
        self.selected
    }

    #[must_use]
    pub const fn anchor_date(&self) -> DateValue {
        self.anchor
    }

    #[must_use]
    pub const fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    #[must_use]
    pub const fn pick_only_view(&self) -> Option<ViewKind> {
        self.pick_only
    }

    #[must_use]
    pub const fn column_count(&self) -> u32 {
        self.columns
    }

    /// Current `(hour, minute)` of the selected date.
    #[must_use]
    pub fn time(&self) -> (u32, u32) {
        (self.selected.hour(), self.selected.minute())
    }

    fn marks(&self) -> Marks<'_> {
        Marks {
            constraints: &self.constraints,
            selected: self.selected,
            today: self.today,
            columns: self.columns,
            week_numbers: self.week_numbers,
        }
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// All cells of the visible pages for `view` around `anchor`, in order.
    ///
    /// The time view has no cells.
    #[must_use]
    pub fn page_cells(&self, view: ViewKind, anchor: DateValue) -> Vec<CellDescriptor> {
        build_pages(view, anchor, &self.marks())
            .into_iter()
            .flat_map(|page| page.cells)
            .collect()
    }

    /// Visible pages for `view` around `anchor`, with titles.
    #[must_use]
    pub fn pages(&self, view: ViewKind, anchor: DateValue) -> Vec<CellPage> {
        build_pages(view, anchor, &self.marks())
    }

    /// Pages for the current view and anchor.
    #[must_use]
    pub fn current_pages(&self) -> Vec<CellPage> {
        self.pages(self.current_view, self.anchor)
    }

    /// Heading for the current view.
    #[must_use]
    pub fn title(&self) -> String {
        if self.current_view == ViewKind::Time {
            return if self.pick_only == Some(ViewKind::Time) {
                "Select a time".to_string()
            } else {
                format!(
                    "{:02} {}, {}",
                    self.selected.day(),
                    self.selected.month_name(),
                    self.selected.year()
                )
            };
        }
        self.current_pages()
            .iter()
            .map(|page| page.title.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Anchor after one page step in `direction`.
    fn shifted_anchor(&self, direction: Direction) -> DateValue {
        let (unit, amount) = match self.current_view {
            ViewKind::Years => (Unit::Year, self.constraints.page_years()),
            ViewKind::Months => (Unit::Year, self.columns),
            ViewKind::Days | ViewKind::Time => (Unit::Month, self.columns),
        };
        let moved = match direction {
            Direction::Previous => self.anchor.decrement(unit, amount),
            Direction::Next => self.anchor.increment(unit, amount),
        };
        moved.with_day(self.anchor_day)
    }

    /// Whether the previous/next control is enabled.
    ///
    /// Disabled when the page about to be shown lies entirely before the
    /// minimum (or after the maximum), and always in the time view.
    #[must_use]
    pub fn can_navigate(&self, direction: Direction) -> bool {
        if self.current_view == ViewKind::Time {
            return false;
        }
        let view = self.current_view;
        let (first, last) = window_bounds(view, self.shifted_anchor(direction), &self.marks());
        match direction {
            Direction::Previous => !self.constraints.precedes_min(&last, view),
            Direction::Next => !self.constraints.exceeds_max(&first, view),
        }
    }

    /// Move the anchor one page. Returns `false` (and changes nothing) when
    /// the control is disabled.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        if !self.can_navigate(direction) {
            return false;
        }
        #[cfg(feature = "tracing")]
        let from = self.anchor;
        self.anchor = self.shifted_anchor(direction);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "datepicker.navigate",
            view = self.current_view.as_str(),
            direction = ?direction,
            from = %from,
            to = %self.anchor
        );
        true
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Choose `cell` in the current view.
    pub fn drill_down(&mut self, cell: &CellDescriptor) -> Transition {
        if !cell.selectable || cell.view != self.current_view {
            return Transition::Ignored;
        }
        let transition = match self.current_view {
            ViewKind::Years | ViewKind::Months => {
                if self.pick_only == Some(self.current_view) {
                    Transition::Commit(cell.value)
                } else {
                    // Years and Months always have a child view.
                    Transition::View(self.current_view.child().unwrap_or(ViewKind::Days))
                }
            }
            ViewKind::Days => {
                if self.pick_only != Some(ViewKind::Days) && self.time_picker {
                    Transition::View(ViewKind::Time)
                } else {
                    Transition::Commit(cell.value)
                }
            }
            ViewKind::Time => Transition::Ignored,
        };
        match transition {
            Transition::View(ViewKind::Time) => {
                let (hour, minute) = self.time();
                self.set_anchor(cell.value.with_time(hour, minute));
                self.current_view = ViewKind::Time;
                self.snap_minutes();
            }
            Transition::View(view) => {
                self.set_anchor(cell.value);
                self.current_view = view;
            }
            Transition::Commit(value) => self.set_anchor(value),
            Transition::Ignored => {}
        }
        #[cfg(feature = "tracing")]
        self.log_transition("drill_down", transition);
        transition
    }

    /// Whether going one level up is currently allowed.
    #[must_use]
    pub fn can_drill_up(&self) -> bool {
        let Some(parent) = self.current_view.parent() else {
            return false;
        };
        if parent == ViewKind::Years && !self.year_picker {
            return false;
        }
        self.pick_only != Some(self.current_view) || self.can_always_go_up.has(self.current_view)
    }

    /// Go one level up, keeping the anchor. Returns `false` when disallowed.
    pub fn drill_up(&mut self) -> bool {
        if !self.can_drill_up() {
            return false;
        }
        let Some(parent) = self.current_view.parent() else {
            return false;
        };
        self.current_view = parent;
        #[cfg(feature = "tracing")]
        self.log_transition("drill_up", Transition::View(parent));
        true
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Set the selected time, rounding minutes to `step` (60 wraps to 0
    /// without touching the hour). The date is unchanged.
    pub fn set_time(&mut self, hour: u32, minute: u32, step: u32) {
        let minute = round_minutes(minute.min(59), step);
        self.selected = self.selected.with_time(hour.min(23), minute);
    }

    /// Rotate the hour wheel.
    pub fn wheel_hour(&mut self, wheel: Wheel) {
        let (hour, minute) = self.time();
        self.selected = self.selected.with_time(wheel_hour(hour, wheel), minute);
    }

    /// Rotate the minute wheel by the configured step.
    pub fn wheel_minute(&mut self, wheel: Wheel) {
        let (hour, minute) = self.time();
        let minute = wheel_minute(minute, self.constraints.wheel_step(), wheel);
        self.selected = self.selected.with_time(hour, minute);
    }

    /// Confirm the time view. Commits the selected value; ignored outside
    /// the time view.
    pub fn confirm_time(&mut self) -> Transition {
        if self.current_view != ViewKind::Time {
            return Transition::Ignored;
        }
        let transition = Transition::Commit(self.selected);
        #[cfg(feature = "tracing")]
        self.log_transition("confirm_time", transition);
        transition
    }

    fn snap_minutes(&mut self) {
        let (hour, minute) = self.time();
        self.set_time(hour, minute, self.constraints.wheel_step());
    }

    fn set_anchor(&mut self, value: DateValue) {
        self.anchor = value;
        self.selected = value;
        self.anchor_day = value.day();
    }

    #[cfg(feature = "tracing")]
    fn log_transition(&self, reason: &str, transition: Transition) {
        match transition {
            Transition::View(view) => {
                tracing::debug!(message = "datepicker.view", reason, view = view.as_str());
            }
            Transition::Commit(value) => {
                tracing::debug!(message = "datepicker.commit", reason, value = %value);
            }
            Transition::Ignored => {
                tracing::trace!(message = "datepicker.ignored", reason);
            }
        }
    }
}
