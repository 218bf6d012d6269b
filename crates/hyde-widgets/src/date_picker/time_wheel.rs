#![forbid(unsafe_code)]

//! Hour/minute wheel arithmetic for the time view.
//!
//! Minutes live on a grid of `step` (1, 5, 10, 15, 20, 30, ...). Rounding up
//! to 60 wraps to 0 **without** carrying into the hour: 23:58 with a 5-minute
//! step becomes 23:00, not 00:00 of the next day. Callers relying on carry
//! semantics must handle it themselves.

/// Wheel rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wheel {
    Up,
    Down,
}

/// Round `minute` half-up to the nearest multiple of `step` (taken as
/// `1..=60`), wrapping 60 to 0.
#[must_use]
pub fn round_minutes(minute: u32, step: u32) -> u32 {
    let step = u64::from(step.clamp(1, 60));
    let rounded = (u64::from(minute) * 2 + step) / (2 * step) * step;
    u32::try_from(rounded).ok().filter(|&m| m < 60).unwrap_or(0)
}

/// Rotate the hour by one, wrapping 23 -> 0 and 0 -> 23.
#[must_use]
pub fn wheel_hour(hour: u32, wheel: Wheel) -> u32 {
    match wheel {
        Wheel::Up if hour < 23 => hour + 1,
        Wheel::Up => 0,
        Wheel::Down if hour > 0 => (hour - 1).min(23),
        Wheel::Down => 23,
    }
}

/// Rotate the minutes by one `step`, wrapping at the top of the hour.
#[must_use]
pub fn wheel_minute(minute: u32, step: u32, wheel: Wheel) -> u32 {
    let step = step.clamp(1, 60);
    let next = match wheel {
        Wheel::Up if minute < 59 => minute + step,
        Wheel::Up => 0,
        Wheel::Down if minute > 0 => minute.saturating_sub(step),
        Wheel::Down => 60 - step,
    };
    if next >= 60 { 0 } else { next }
}
