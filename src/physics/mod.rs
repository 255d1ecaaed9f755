//! Physics primitives for the ship: point gravity and nearest-body selection.
//!
//! The flight model in [`crate::ship`] composes these each frame: the nearest
//! planet and the sun each contribute a capped inverse-square pull, applied
//! to the velocity before the position update.

mod gravity;

#[cfg(test)]
mod proptest_physics;

pub use gravity::{
    apply_gravity, nearest_index, nearest_planet, point_gravity, source_acceleration,
    GravitySource, Nearest,
};
