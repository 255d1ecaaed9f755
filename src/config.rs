//! Tuning knobs for the flight simulation.
//!
//! Every constant the simulation consumes lives in [`FlightConfig`], which is
//! handed to [`crate::simulation::FlightSimulation`] at construction. Tests
//! substitute their own values instead of patching literals.

use bevy::math::DVec2;
use bevy::prelude::*;

/// Errors raised when a configuration cannot drive a simulation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("at least two planets are required to pick a target (got {0})")]
    TooFewPlanets(usize),

    #[error("invalid {name}: {value} (must be positive)")]
    NonPositive { name: &'static str, value: f64 },

    #[error("invalid start/target pair: start {start}, target {target} with {planets} planets")]
    InvalidStart {
        start: usize,
        target: usize,
        planets: usize,
    },
}

/// Point-gravity constants shared by every source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityConfig {
    /// Strength constant applied to the nearest planet.
    pub planet_k: f64,
    /// Strength constant applied to the sun.
    pub sun_k: f64,
    /// Distance floor used in the inverse-square law.
    pub min_r: f64,
    /// Acceleration cap, in world units per second².
    pub max_a: f64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            planet_k: 700.0,
            sun_k: 500.0,
            min_r: 28.0,
            max_a: 90.0,
        }
    }
}

/// Ship handling, fuel and contact thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipConfig {
    /// Rotation rate while a rotate key is held (rad/s).
    pub rotate_speed: f64,
    /// Thrust acceleration (units/s²).
    pub thrust: f64,
    /// Velocity multiplier applied once per frame.
    pub drag: f64,
    /// Fuel at scene start.
    pub initial_fuel: f64,
    /// Fuel burned per second of thrust.
    pub fuel_burn_rate: f64,
    /// Distance from ship center to its tail; also the docking standoff.
    pub tail_offset: f64,
    /// Radius added to a planet's radius for contact tests.
    pub collision_radius: f64,
    /// Maximum relative speed that still counts as a landing (inclusive).
    pub landing_speed_max: f64,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 2.8,
            thrust: 220.0,
            drag: 0.995,
            initial_fuel: 100.0,
            fuel_burn_rate: 10.0,
            tail_offset: 12.0,
            collision_radius: 10.0,
            landing_speed_max: 80.0,
        }
    }
}

/// Sampling and decay policy shared by all seven trails.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WakeConfig {
    pub max_age_ms: f64,
    pub min_step: f64,
    pub sample_interval_ms: f64,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            max_age_ms: 3000.0,
            min_step: 90.0,
            sample_interval_ms: 240.0,
        }
    }
}

/// Sun radius pulse.
///
/// `radius = base_radius * (pulse_base + pulse_amplitude * sin(now_ms * pulse_rate)) + jitter * u`
/// with `u` drawn uniformly from [0, 1) each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunConfig {
    pub base_radius: f64,
    pub pulse_base: f64,
    pub pulse_amplitude: f64,
    pub pulse_rate: f64,
    pub jitter: f64,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            base_radius: 110.0,
            pulse_base: 0.5,
            pulse_amplitude: 0.02,
            pulse_rate: 0.0005,
            jitter: 0.1,
        }
    }
}

/// Timeline of the destruction sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DestructionConfig {
    /// How long the explosion effect plays.
    pub explosion_ms: f64,
    /// Delay before a restart is offered.
    pub restart_prompt_ms: f64,
}

impl Default for DestructionConfig {
    fn default() -> Self {
        Self {
            explosion_ms: 2600.0,
            restart_prompt_ms: 3000.0,
        }
    }
}

/// Size of the playfield. The star system sits at the viewport center and
/// the wrap rectangle is the viewport scaled by `world_scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    pub viewport: DVec2,
    pub world_scale: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            viewport: DVec2::new(1280.0, 720.0),
            world_scale: 2.2,
        }
    }
}

impl WorldConfig {
    /// Fixed center of the star system.
    pub fn center(&self) -> DVec2 {
        self.viewport * 0.5
    }

    pub fn bounds(&self) -> WorldBounds {
        let size = (self.viewport * self.world_scale).ceil();
        let min = self.center() - size * 0.5;
        WorldBounds {
            min,
            max: min + size,
        }
    }
}

/// Axis-aligned rectangle the ship wraps around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl WorldBounds {
    /// Toroidal wrap: leaving through one edge re-enters at the opposite one.
    pub fn wrap(&self, mut pos: DVec2) -> DVec2 {
        if pos.x < self.min.x {
            pos.x = self.max.x;
        } else if pos.x > self.max.x {
            pos.x = self.min.x;
        }
        if pos.y < self.min.y {
            pos.y = self.max.y;
        } else if pos.y > self.max.y {
            pos.y = self.min.y;
        }
        pos
    }

    pub fn contains(&self, pos: DVec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

/// Static description of one orbiting planet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetSpec {
    /// Display radius; doubles as the contact radius and gravity "mass".
    pub radius: f64,
    pub orbit_radius: f64,
    /// Signed angular speed (rad/s).
    pub angular_speed: f64,
}

/// The six planets of the stock system, innermost first.
pub const DEFAULT_PLANETS: [PlanetSpec; 6] = [
    PlanetSpec { radius: 5.6, orbit_radius: 90.0, angular_speed: 0.5 },
    PlanetSpec { radius: 10.4, orbit_radius: 160.0, angular_speed: 0.35 },
    PlanetSpec { radius: 12.4, orbit_radius: 230.0, angular_speed: 0.3 },
    PlanetSpec { radius: 10.4, orbit_radius: 300.0, angular_speed: 0.23 },
    PlanetSpec { radius: 21.6, orbit_radius: 370.0, angular_speed: 0.1 },
    PlanetSpec { radius: 16.5, orbit_radius: 440.0, angular_speed: 0.1 },
];

/// Complete simulation configuration.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct FlightConfig {
    pub gravity: GravityConfig,
    pub ship: ShipConfig,
    pub wake: WakeConfig,
    pub sun: SunConfig,
    pub destruction: DestructionConfig,
    pub world: WorldConfig,
    pub planets: Vec<PlanetSpec>,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            gravity: GravityConfig::default(),
            ship: ShipConfig::default(),
            wake: WakeConfig::default(),
            sun: SunConfig::default(),
            destruction: DestructionConfig::default(),
            world: WorldConfig::default(),
            planets: DEFAULT_PLANETS.to_vec(),
        }
    }
}

impl FlightConfig {
    /// Reject configurations that would break the simulation's invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.planets.len() < 2 {
            return Err(ConfigError::TooFewPlanets(self.planets.len()));
        }

        let positive = [
            ("gravity.min_r", self.gravity.min_r),
            ("gravity.max_a", self.gravity.max_a),
            ("ship.landing_speed_max", self.ship.landing_speed_max),
            ("wake.max_age_ms", self.wake.max_age_ms),
            ("world.world_scale", self.world.world_scale),
        ];
        for (name, value) in positive {
            // Also rejects NaN.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        for spec in &self.planets {
            if !(spec.radius > 0.0) {
                return Err(ConfigError::NonPositive {
                    name: "planet.radius",
                    value: spec.radius,
                });
            }
        }

        Ok(())
    }
}
