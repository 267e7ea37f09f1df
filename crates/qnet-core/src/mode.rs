//! Leg mode enum shared across the plan, event, and simulation crates.
//!
//! The engine never branches on the mode — whether a leg runs through the
//! link-queue model or is teleported is decided by its route variant.  The
//! mode is carried into departure and arrival events so scoring can price
//! trips per mode.

/// The transport mode of a leg.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum LegMode {
    #[default]
    Car,
    Walk,
    Bike,
    Pt,
    Other,
}

impl LegMode {
    /// Human-readable label, used in event output.
    pub fn as_str(self) -> &'static str {
        match self {
            LegMode::Car   => "car",
            LegMode::Walk  => "walk",
            LegMode::Bike  => "bike",
            LegMode::Pt    => "pt",
            LegMode::Other => "other",
        }
    }

    /// Parse the label written by [`as_str`](Self::as_str); unknown labels
    /// map to `Other`.
    pub fn parse(s: &str) -> LegMode {
        match s {
            "car"  => LegMode::Car,
            "walk" => LegMode::Walk,
            "bike" => LegMode::Bike,
            "pt"   => LegMode::Pt,
            _      => LegMode::Other,
        }
    }
}

impl std::fmt::Display for LegMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
