//! Test utilities for flight simulation tests.
//!
//! Provides fixtures for planets that sit still or orbit predictably, a sun
//! that does not pulse, and configs with gravity switched off.

use bevy::math::DVec2;

use crate::config::{FlightConfig, PlanetSpec, SunConfig, WorldBounds};
use crate::orbit::Planet;
use crate::simulation::FlightSimulation;
use crate::sun::Sun;
use crate::types::PlanetId;

/// Fixtures for creating test flight states.
pub mod fixtures {
    use super::*;

    /// Default config.
    pub fn quiet_config() -> FlightConfig {
        FlightConfig::default()
    }

    /// Default config with both gravity constants zeroed.
    pub fn no_gravity_config() -> FlightConfig {
        let mut config = FlightConfig::default();
        config.gravity.planet_k = 0.0;
        config.gravity.sun_k = 0.0;
        config
    }

    /// A sun of constant radius 110 at `center`.
    pub fn quiet_sun(center: DVec2) -> Sun {
        let config = SunConfig {
            pulse_base: 1.0,
            pulse_amplitude: 0.0,
            jitter: 0.0,
            ..SunConfig::default()
        };
        Sun::new(center, &config)
    }

    /// Bounds far enough away that nothing wraps.
    pub fn wide_bounds() -> WorldBounds {
        WorldBounds {
            min: DVec2::splat(-1.0e9),
            max: DVec2::splat(1.0e9),
        }
    }

    pub fn planet_spec(radius: f64, orbit_radius: f64, angular_speed: f64) -> PlanetSpec {
        PlanetSpec {
            radius,
            orbit_radius,
            angular_speed,
        }
    }

    /// A planet that never moves, centered at `pos`.
    pub fn parked_planet(id: usize, pos: DVec2, radius: f64) -> Planet {
        let spec = planet_spec(radius, 100.0, 0.0);
        Planet::new(PlanetId(id), &spec, pos - DVec2::new(100.0, 0.0), 0.0)
    }

    /// Radius-10 planet orbiting the origin, starting on the +x axis.
    pub fn orbiting_planet(id: usize, orbit_radius: f64, angular_speed: f64) -> Planet {
        let spec = planet_spec(10.0, orbit_radius, angular_speed);
        Planet::new(PlanetId(id), &spec, DVec2::ZERO, 0.0)
    }

    /// Default scene docked on planet `start`, aiming for `target`.
    pub fn simulation(start: usize, target: usize) -> FlightSimulation {
        FlightSimulation::with_start(quiet_config(), 7, PlanetId(start), PlanetId(target))
            .expect("fixture start/target must be valid")
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parked_planet_sits_still() {
        let mut planet = fixtures::parked_planet(0, DVec2::new(3.0, 4.0), 10.0);
        assert_relative_eq!(planet.position().x, 3.0, epsilon = 1e-12);
        planet.step(1.0);
        assert_relative_eq!(planet.position().y, 4.0, epsilon = 1e-12);
        assert_eq!(planet.velocity(1.0), DVec2::ZERO);
    }

    #[test]
    fn test_quiet_sun_radius() {
        assert_eq!(fixtures::quiet_sun(DVec2::ZERO).radius(), 110.0);
    }
}
