#![forbid(unsafe_code)]

//! Core: date values, view kinds, and availability constraints.
//!
//! # Role in Hyde
//! `hyde-core` is the data layer shared by every widget. It owns the
//! [`DateValue`] type the pickers navigate over, the [`ViewKind`] drill-down
//! hierarchy, and the [`Constraints`] that decide which dates may be chosen.
//!
//! # How it fits in the system
//! `hyde-widgets` builds the date picker state machine on top of these types.
//! Nothing here touches the DOM or any storage, so every rule is
//! deterministic and testable in isolation.

pub mod availability;
pub mod constraints;
pub mod date;
pub mod logging;
pub mod view;

pub use availability::AvailabilityMap;
pub use constraints::Constraints;
pub use date::{DateError, DateValue, RAW_FORMAT, Unit, days_in_month, weekday_abbr};
pub use view::{ParseViewError, ViewKind};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, info_span, trace, warn};
