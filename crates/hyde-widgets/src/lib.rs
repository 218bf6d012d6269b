#![forbid(unsafe_code)]

//! Widgets for Hyde UI.
//!
//! The date picker is split into three layers:
//!
//! - [`PickerState`]: the view/selection state machine (pages of cells,
//!   navigation limits, drill-down and drill-up, the time wheel).
//! - [`DatePicker`]: binds a state machine to one or more text inputs,
//!   seeding from their text and writing committed values back.
//! - [`PickerRegistry`]: creates pickers idempotently from element ids and
//!   preset CSS classes.
//!
//! Rendering is left to the caller: [`PickerState::pages`] yields plain
//! [`CellPage`] values that any renderer can draw.

pub mod date_picker;
pub mod registry;

pub use date_picker::attach::{DatePicker, InputBinding, KeyOutcome, PickerKey, TextInput};
#[cfg(feature = "config")]
pub use date_picker::config::ConfigError;
pub use date_picker::config::PickerConfig;
pub use date_picker::time_wheel::{Wheel, round_minutes};
pub use date_picker::{CellDescriptor, CellPage, Direction, PickerState, Transition, ViewSet};
pub use registry::{PickerElement, PickerPreset, PickerRegistry};
