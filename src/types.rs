//! Shared identifiers, system sets and unit helpers for the flight core.

use bevy::prelude::*;

/// Milliseconds per second; the frame scheduler speaks milliseconds,
/// the integrator speaks seconds.
pub const MS_PER_SECOND: f64 = 1000.0;

/// System set for ordering the per-frame flight systems.
///
/// Input must be sampled before the simulation advances, and anything that
/// reacts to the tick report (logging, leaderboard hand-off, rendering) runs
/// after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlightSystemSet {
    /// Keyboard sampling into [`crate::input::PilotInput`].
    Input,
    /// The simulation tick itself.
    Simulate,
    /// Consumers of the latest tick report.
    React,
}

/// Index of a planet in the system, stable for the lifetime of a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanetId(pub usize);

impl PlanetId {
    pub fn index(self) -> usize {
        self.0
    }

    /// One-based number shown to the player ("Planet 3").
    pub fn display_number(self) -> usize {
        self.0 + 1
    }
}

impl std::fmt::Display for PlanetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Planet {}", self.display_number())
    }
}

/// Convert a frame delta in milliseconds to seconds, clamping negative
/// deltas to zero.
#[inline]
pub fn ms_to_seconds(ms: f64) -> f64 {
    (ms / MS_PER_SECOND).max(0.0)
}
