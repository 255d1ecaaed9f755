//! Orbital Lander - 2D orbital flight core
//!
//! A library crate providing the ship flight model, planet kinematics,
//! contact classification and wake trails, plus the Bevy plugins that host
//! them.

pub mod collision;
pub mod config;
pub mod docking;
pub mod input;
pub mod leaderboard;
pub mod orbit;
pub mod outcome;
pub mod physics;
pub mod render;
pub mod ship;
pub mod simulation;
pub mod sun;
pub mod trail;
pub mod types;

#[cfg(test)]
pub mod test_utils;
