#![forbid(unsafe_code)]

//! Binding a picker to text inputs.
//!
//! A [`DatePicker`] owns one resolved [`PickerConfig`], the inputs it is
//! attached to, and the [`PickerState`] of the currently open popup (if any).
//! Opening seeds the state from the input text; committing writes the
//! formatted value back, caches the raw ISO value, and closes the popup.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut picker = DatePicker::new(PickerConfig::default());
//! let idx = picker.attach(TextInput::new("birthday").with_value("05/05/1987"));
//! picker.open(idx);
//! let cell = picker.state().unwrap().current_pages()[0].cells[10];
//! let committed = picker.select_cell(&cell);
//! ```

use hyde_core::{DateValue, RAW_FORMAT, ViewKind};

use super::config::PickerConfig;
use super::time_wheel::Wheel;
use super::{CellDescriptor, Direction, PickerState, Transition};

/// A text field a picker can read from and write to.
pub trait InputBinding {
    /// Visible text of the input.
    fn value(&self) -> &str;

    fn set_value(&mut self, value: String);

    /// Raw ISO value cached by the last commit, if any.
    fn cached_raw(&self) -> Option<&str>;

    fn store_raw(&mut self, raw: String);

    /// Raise the input's change notification.
    fn notify_change(&mut self);
}

/// In-memory input, the default binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub id: String,
    pub value: String,
    pub raw: Option<String>,
    /// Number of change notifications raised.
    pub changes: u32,
}

impl TextInput {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

impl InputBinding for TextInput {
    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
    }

    fn cached_raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    fn store_raw(&mut self, raw: String) {
        self.raw = Some(raw);
    }

    fn notify_change(&mut self) {
        self.changes += 1;
    }
}

/// Keys seen by an attached input while its picker is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerKey {
    Tab,
    Escape,
    /// Any other key.
    Other,
}

/// What the input should do with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyOutcome {
    /// The picker closed; let the key through.
    Close,
    /// Swallow the key.
    Block,
    /// Let the key through.
    Pass,
}

/// A date picker attached to one or more inputs.
#[derive(Debug, Clone)]
pub struct DatePicker<I = TextInput> {
    config: PickerConfig,
    inputs: Vec<I>,
    active: Option<usize>,
    state: Option<PickerState>,
    last_view: Option<ViewKind>,
}

impl<I: InputBinding> DatePicker<I> {
    /// Create a picker; `config` is resolved here.
    #[must_use]
    pub fn new(config: PickerConfig) -> Self {
        Self {
            config: config.resolved(),
            inputs: Vec::new(),
            active: None,
            state: None,
            last_view: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Attach an input, returning its index.
    pub fn attach(&mut self, input: I) -> usize {
        self.inputs.push(input);
        self.inputs.len() - 1
    }

    /// Detach the input at `index`. Closes the popup if it belonged to it.
    pub fn detach(&mut self, index: usize) -> Option<I> {
        if index >= self.inputs.len() {
            return None;
        }
        match self.active {
            Some(active) if active == index => self.close(),
            Some(active) if active > index => self.active = Some(active - 1),
            _ => {}
        }
        Some(self.inputs.remove(index))
    }

    #[must_use]
    pub fn inputs(&self) -> &[I] {
        &self.inputs
    }

    #[must_use]
    pub fn input(&self, index: usize) -> Option<&I> {
        self.inputs.get(index)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Index of the input the popup was opened from.
    #[must_use]
    pub fn active_input(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn state(&self) -> Option<&PickerState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut PickerState> {
        self.state.as_mut()
    }

    /// Open the popup for the input at `index`, using the current time as
    /// the fallback seed. Returns `false` for an unknown index.
    pub fn open(&mut self, index: usize) -> bool {
        self.open_at(index, DateValue::now())
    }

    /// Open with an explicit fallback seed.
    ///
    /// The seed is the input text parsed with the output format, else the
    /// cached raw value, else `now`.
    pub fn open_at(&mut self, index: usize, now: DateValue) -> bool {
        let Some(input) = self.inputs.get(index) else {
            return false;
        };
        let format = self.config.output_format();
        let seed = DateValue::parse_with_base(input.value(), format, now)
            .or_else(|_| input.cached_raw().unwrap_or_default().parse())
            .unwrap_or(now);
        let view = match self.last_view {
            Some(view) if self.config.open_last_view => view,
            _ => self.config.start_view,
        };
        let state = PickerState::open(seed, self.config.constraints(), view)
            .pick_only(self.config.pick_only)
            .can_always_go_up(self.config.always_up())
            .time_picker(self.config.time_picker)
            .year_picker(self.config.year_picker)
            .columns(self.config.columns)
            .week_numbers(self.config.week_numbers)
            .with_today(now);
        self.state = Some(state);
        self.active = Some(index);
        true
    }

    /// Discard the popup without touching the inputs.
    pub fn close(&mut self) {
        if let Some(state) = self.state.take() {
            self.last_view = Some(state.current_view());
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "datepicker.close",
                view = state.current_view().as_str()
            );
        }
        self.active = None;
    }

    /// Write `date` to the active input (or to every input with
    /// `update_all`, or when no input is active), then close.
    pub fn commit(&mut self, date: DateValue) -> Result<DateValue, hyde_core::DateError> {
        let text = date.format(self.config.output_format())?;
        let raw = date.format(RAW_FORMAT)?;
        let targets: Vec<usize> = match self.active {
            Some(index) if !self.config.update_all => vec![index],
            _ => (0..self.inputs.len()).collect(),
        };
        for index in targets {
            if let Some(input) = self.inputs.get_mut(index) {
                input.set_value(text.clone());
                input.store_raw(raw.clone());
                input.notify_change();
            }
        }
        #[cfg(feature = "tracing")]
        tracing::info!(message = "datepicker.committed", value = %date, text = %text);
        self.close();
        Ok(date)
    }

    /// Move the open popup one page.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        self.state
            .as_mut()
            .is_some_and(|state| state.navigate(direction))
    }

    pub fn drill_up(&mut self) -> bool {
        self.state.as_mut().is_some_and(PickerState::drill_up)
    }

    /// Choose a cell. A committing choice is written to the inputs and its
    /// value returned; otherwise `Ok(None)`.
    pub fn select_cell(
        &mut self,
        cell: &CellDescriptor,
    ) -> Result<Option<DateValue>, hyde_core::DateError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(None);
        };
        let transition = state.drill_down(cell);
        self.finish(transition)
    }

    /// Confirm the time view and commit.
    pub fn confirm_time(&mut self) -> Result<Option<DateValue>, hyde_core::DateError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(None);
        };
        let transition = state.confirm_time();
        self.finish(transition)
    }

    pub fn set_time(&mut self, hour: u32, minute: u32) {
        let step = self.config.time_wheel_step;
        if let Some(state) = self.state.as_mut() {
            state.set_time(hour, minute, step);
        }
    }

    /// Rotate the hour (`minutes == false`) or minute wheel.
    pub fn wheel(&mut self, minutes: bool, wheel: Wheel) {
        if let Some(state) = self.state.as_mut() {
            if minutes {
                state.wheel_minute(wheel);
            } else {
                state.wheel_hour(wheel);
            }
        }
    }

    /// Key handling for an attached input: tab and escape close the popup,
    /// anything else is blocked when `block_keydown` is set.
    pub fn key_down(&mut self, key: PickerKey) -> KeyOutcome {
        match key {
            PickerKey::Tab | PickerKey::Escape => {
                self.close();
                KeyOutcome::Close
            }
            PickerKey::Other if self.config.block_keydown => KeyOutcome::Block,
            PickerKey::Other => KeyOutcome::Pass,
        }
    }

    fn finish(&mut self, transition: Transition) -> Result<Option<DateValue>, hyde_core::DateError> {
        match transition {
            Transition::Commit(value) => self.commit(value).map(Some),
            Transition::View(_) | Transition::Ignored => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "tracing")]
    use std::sync::{Arc, Mutex};
    #[cfg(feature = "tracing")]
    use tracing::Subscriber;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::Layer;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::layer::{Context, SubscriberExt};

    fn now() -> DateValue {
        DateValue::from_ymd_hm(2024, 6, 20, 9, 41).expect("valid date")
    }

    fn d(y: i32, m: u32, day: u32) -> DateValue {
        DateValue::from_ymd(y, m, day).expect("valid date")
    }

    fn cell_for(picker: &DatePicker, value: DateValue) -> CellDescriptor {
        let state = picker.state().expect("open");
        state
            .current_pages()
            .iter()
            .flat_map(|page| page.cells.iter().copied())
            .find(|cell| match cell.view {
                ViewKind::Years => cell.value.year() == value.year(),
                ViewKind::Months => {
                    cell.value.year() == value.year() && cell.value.month() == value.month()
                }
                _ => cell.value.same_day(&value),
            })
            .expect("cell present")
    }

    #[test]
    fn open_seeds_from_formatted_text() {
        let mut picker = DatePicker::new(PickerConfig::default());
        let idx = picker.attach(TextInput::new("a").with_value("05/05/1987"));
        assert!(picker.open_at(idx, now()));
        let state = picker.state().expect("open");
        assert_eq!(state.selected_date(), d(1987, 5, 5));
        assert_eq!(state.current_view(), ViewKind::Days);
        assert_eq!(picker.active_input(), Some(idx));
    }

    #[test]
    fn open_falls_back_to_raw_then_now() {
        let mut picker = DatePicker::new(PickerConfig::default());
        let mut input = TextInput::new("a").with_value("garbage");
        input.raw = Some("2001-02-03T04:05:00".into());
        let with_raw = picker.attach(input);
        let empty = picker.attach(TextInput::new("b"));

        picker.open_at(with_raw, now());
        assert_eq!(
            picker.state().map(PickerState::selected_date),
            DateValue::from_ymd_hm(2001, 2, 3, 4, 5).ok()
        );
        picker.open_at(empty, now());
        assert_eq!(picker.state().map(PickerState::selected_date), Some(now()));
    }

    #[test]
    fn open_unknown_index_is_refused() {
        let mut picker: DatePicker = DatePicker::new(PickerConfig::default());
        assert!(!picker.open_at(3, now()));
        assert!(!picker.is_open());
    }

    #[test]
    fn commit_writes_active_input_only() {
        let mut picker = DatePicker::new(PickerConfig::default());
        let a = picker.attach(TextInput::new("a"));
        let b = picker.attach(TextInput::new("b"));
        picker.open_at(a, now());

        let cell = cell_for(&picker, d(2024, 6, 12));
        let committed = picker.select_cell(&cell).expect("format");
        assert_eq!(committed, DateValue::from_ymd_hm(2024, 6, 12, 9, 41).ok());

        let input = picker.input(a).expect("input");
        assert_eq!(input.value, "12/06/2024");
        assert_eq!(input.raw.as_deref(), Some("2024-06-12T09:41:00"));
        assert_eq!(input.changes, 1);
        assert_eq!(picker.input(b).map(|i| i.changes), Some(0));
        assert!(!picker.is_open());
    }

    #[test]
    fn update_all_writes_every_input() {
        let mut picker = DatePicker::new(PickerConfig {
            update_all: true,
            ..PickerConfig::default()
        });
        let a = picker.attach(TextInput::new("a"));
        picker.attach(TextInput::new("b"));
        picker.open_at(a, now());
        picker.commit(d(2024, 1, 2)).expect("format");
        assert!(picker.inputs().iter().all(|i| i.value == "02/01/2024" && i.changes == 1));
    }

    #[test]
    fn datetime_flow_goes_through_time_view() {
        let mut picker = DatePicker::new(PickerConfig {
            time_picker: true,
            time_wheel_step: 5,
            ..PickerConfig::default()
        });
        let idx = picker.attach(TextInput::new("a"));
        picker.open_at(idx, now());

        let cell = cell_for(&picker, d(2024, 6, 3));
        assert_eq!(picker.select_cell(&cell).expect("format"), None);
        assert_eq!(
            picker.state().map(PickerState::current_view),
            Some(ViewKind::Time)
        );
        picker.set_time(14, 22);
        picker.wheel(true, Wheel::Up);
        picker.wheel(false, Wheel::Down);
        let committed = picker.confirm_time().expect("format");
        assert_eq!(committed, DateValue::from_ymd_hm(2024, 6, 3, 13, 25).ok());
        assert_eq!(
            picker.input(idx).map(|i| i.value.as_str()),
            Some("03/06/2024 13:25")
        );
    }

    #[test]
    fn time_only_text_keeps_the_fallback_day() {
        let mut picker = DatePicker::new(PickerConfig {
            pick_only: Some(ViewKind::Time),
            ..PickerConfig::default()
        });
        let idx = picker.attach(TextInput::new("t").with_value("07:30"));
        picker.open_at(idx, now());
        let state = picker.state().expect("open");
        assert_eq!(state.current_view(), ViewKind::Time);
        assert_eq!(
            state.selected_date(),
            DateValue::from_ymd_hm(2024, 6, 20, 7, 30).expect("valid")
        );
    }

    #[test]
    fn open_last_view_restores_view() {
        let mut picker = DatePicker::new(PickerConfig {
            open_last_view: true,
            ..PickerConfig::default()
        });
        let idx = picker.attach(TextInput::new("a"));
        picker.open_at(idx, now());
        assert!(picker.drill_up());
        picker.close();
        picker.open_at(idx, now());
        assert_eq!(
            picker.state().map(PickerState::current_view),
            Some(ViewKind::Months)
        );
    }

    #[test]
    fn keys_close_or_block() {
        let mut picker = DatePicker::new(PickerConfig::default());
        let idx = picker.attach(TextInput::new("a"));
        picker.open_at(idx, now());
        assert_eq!(picker.key_down(PickerKey::Other), KeyOutcome::Block);
        assert!(picker.is_open());
        assert_eq!(picker.key_down(PickerKey::Escape), KeyOutcome::Close);
        assert!(!picker.is_open());

        let mut clearable = DatePicker::<TextInput>::new(PickerConfig {
            block_keydown: false,
            ..PickerConfig::default()
        });
        assert_eq!(clearable.key_down(PickerKey::Other), KeyOutcome::Pass);
    }

    #[test]
    fn detach_shifts_active_index() {
        let mut picker = DatePicker::new(PickerConfig::default());
        picker.attach(TextInput::new("a"));
        let b = picker.attach(TextInput::new("b"));
        picker.open_at(b, now());
        assert_eq!(picker.detach(0).map(|i| i.id), Some("a".to_string()));
        assert_eq!(picker.active_input(), Some(0));
        assert!(picker.detach(0).is_some());
        assert!(!picker.is_open());
        assert!(picker.detach(0).is_none());
    }

    #[test]
    fn navigation_without_popup_is_noop() {
        let mut picker: DatePicker = DatePicker::new(PickerConfig::default());
        assert!(!picker.navigate(Direction::Next));
        assert!(!picker.drill_up());
        assert_eq!(picker.confirm_time(), Ok(None));
    }

    #[cfg(feature = "tracing")]
    #[derive(Default)]
    struct PickerTraceState {
        saw_commit: bool,
        saw_close: bool,
    }

    #[cfg(feature = "tracing")]
    struct PickerTraceCapture {
        state: Arc<Mutex<PickerTraceState>>,
    }

    #[cfg(feature = "tracing")]
    impl<S> Layer<S> for PickerTraceCapture
    where
        S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct Msg {
                message: Option<String>,
            }
            impl tracing::field::Visit for Msg {
                fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                    if field.name() == "message" {
                        self.message = Some(value.to_string());
                    }
                }

                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                    }
                }
            }
            let mut msg = Msg { message: None };
            event.record(&mut msg);
            let mut state = self.state.lock().expect("picker trace lock");
            match msg.message.as_deref() {
                Some("datepicker.committed") => state.saw_commit = true,
                Some("datepicker.close") => state.saw_close = true,
                _ => {}
            }
        }
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn commit_emits_tracing_events() {
        let state = Arc::new(Mutex::new(PickerTraceState::default()));
        let subscriber = tracing_subscriber::registry().with(PickerTraceCapture {
            state: Arc::clone(&state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut picker = DatePicker::new(PickerConfig::default());
        let idx = picker.attach(TextInput::new("a"));
        picker.open_at(idx, now());
        picker.commit(d(2024, 6, 1)).expect("format");

        let snapshot = state.lock().expect("picker trace lock");
        assert!(snapshot.saw_commit, "expected datepicker.committed event");
        assert!(snapshot.saw_close, "expected datepicker.close event");
    }
}
