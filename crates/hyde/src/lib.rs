#![forbid(unsafe_code)]

//! Hyde UI public facade crate.
//!
//! This crate provides the stable surface area for users. It re-exports the
//! date values and constraints from `hyde-core`, the date picker from
//! `hyde-widgets`, and (with the default `runtime` feature) the state cookie
//! from `hyde-runtime`, plus a prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use hyde_core::{
    AvailabilityMap, Constraints, DateError, DateValue, ParseViewError, RAW_FORMAT, Unit, ViewKind,
};

// --- Widget re-exports -----------------------------------------------------

#[cfg(feature = "config")]
pub use hyde_widgets::ConfigError;
pub use hyde_widgets::{
    CellDescriptor, CellPage, DatePicker, Direction, InputBinding, KeyOutcome, PickerConfig,
    PickerElement, PickerKey, PickerPreset, PickerRegistry, PickerState, TextInput, Transition,
    ViewSet, Wheel,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use hyde_runtime::{
    CookieError, CookieOptions, CookieStore, MemoryCookieStore, NavigationPanel, RestoreDirective,
    StateCookie,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Hyde UI.
#[derive(Debug)]
pub enum Error {
    /// A date could not be parsed or formatted.
    Date(DateError),
    /// Picker configuration failed to load.
    #[cfg(feature = "config")]
    Config(ConfigError),
    /// The state cookie could not be read or written.
    #[cfg(feature = "runtime")]
    Cookie(CookieError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(err) => write!(f, "{err}"),
            #[cfg(feature = "config")]
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Cookie(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Date(err) => Some(err),
            #[cfg(feature = "config")]
            Self::Config(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Cookie(err) => Some(err),
        }
    }
}

impl From<DateError> for Error {
    fn from(err: DateError) -> Self {
        Self::Date(err)
    }
}

#[cfg(feature = "config")]
impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "runtime")]
impl From<CookieError> for Error {
    fn from(err: CookieError) -> Self {
        Self::Cookie(err)
    }
}

/// Standard result type for Hyde UI APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CellDescriptor, Constraints, DatePicker, DateValue, Direction, Error, PickerConfig,
        PickerRegistry, PickerState, Result, TextInput, Transition, ViewKind,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{CookieOptions, MemoryCookieStore, StateCookie};

    pub use crate::{core, widgets};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use hyde_core as core;
#[cfg(feature = "runtime")]
pub use hyde_runtime as runtime;
pub use hyde_widgets as widgets;
