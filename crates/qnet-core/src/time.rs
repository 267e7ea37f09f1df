//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing second counter from simulation
//! midnight.  The engine advances by exactly one unit per step and is
//! otherwise agnostic to what the unit means; one second is the conventional
//! interpretation and the one all capacity arithmetic in the config assumes.
//!
//! Using an integer as the canonical time unit means schedule arithmetic is
//! exact (no floating-point drift) and comparisons are O(1).

use std::fmt;

/// An absolute simulation time in seconds since simulation midnight.
///
/// `u32` covers ~136 years of simulated seconds — far beyond the single-day
/// horizon this engine models, with room for multi-day warm-up scenarios.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(pub u32);

impl Time {
    pub const ZERO: Time = Time(0);

    /// Sentinel meaning "never" — used e.g. as the activity end of an agent
    /// that is currently traveling, or of a final activity with no end.
    pub const NEVER: Time = Time(u32::MAX);

    /// Return the time `n` seconds after `self`, saturating at `NEVER`.
    #[inline]
    pub fn offset(self, n: u32) -> Time {
        Time(self.0.saturating_add(n))
    }

    /// Seconds elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Time) -> u32 {
        self.0 - earlier.0
    }

    /// Break into (hour, minute, second) components for display.
    pub fn hms(self) -> (u32, u32, u32) {
        (self.0 / 3_600, (self.0 % 3_600) / 60, self.0 % 60)
    }
}

impl std::ops::Add<u32> for Time {
    type Output = Time;
    #[inline]
    fn add(self, rhs: u32) -> Time {
        Time(self.0 + rhs)
    }
}

impl std::ops::Sub for Time {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: Time) -> u32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Time::NEVER {
            return f.write_str("--:--:--");
        }
        let (h, m, s) = self.hms();
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

/// Convenience constructor: `hms(7, 30, 0)` → 07:30:00.
#[inline]
pub fn hms(h: u32, m: u32, s: u32) -> Time {
    Time(h * 3_600 + m * 60 + s)
}
