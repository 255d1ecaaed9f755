//! Common test utilities for integration tests.

use bevy::math::DVec2;
use orbital_lander::config::FlightConfig;
use orbital_lander::input::PilotInput;
use orbital_lander::outcome::TickReport;
use orbital_lander::ship::Ship;
use orbital_lander::simulation::FlightSimulation;
use orbital_lander::types::PlanetId;

/// Nominal frame length (ms).
pub const FRAME_MS: f64 = 16.0;

/// Default scene docked on planet `start`, aiming for `target`.
pub fn scene(start: usize, target: usize) -> FlightSimulation {
    scene_with(FlightConfig::default(), start, target)
}

pub fn scene_with(config: FlightConfig, start: usize, target: usize) -> FlightSimulation {
    FlightSimulation::with_start(config, 7, PlanetId(start), PlanetId(target)).unwrap()
}

/// Fixed-step frame clock driving a simulation.
#[derive(Debug, Default)]
pub struct Clock {
    pub now_ms: f64,
}

impl Clock {
    pub fn tick(&mut self, sim: &mut FlightSimulation, input: &PilotInput) -> TickReport {
        self.now_ms += FRAME_MS;
        sim.tick(input, false, self.now_ms, FRAME_MS)
    }

    pub fn tick_gated(&mut self, sim: &mut FlightSimulation, input: &PilotInput) -> TickReport {
        self.now_ms += FRAME_MS;
        sim.tick(input, true, self.now_ms, FRAME_MS)
    }

    /// Run `frames` idle frames, returning every report.
    pub fn idle(&mut self, sim: &mut FlightSimulation, frames: usize) -> Vec<TickReport> {
        (0..frames)
            .map(|_| self.tick(sim, &PilotInput::default()))
            .collect()
    }
}

/// Put a flying ship just off planet `index`, on the side away from the sun,
/// moving with the planet plus `approach` units/s toward its center.
pub fn hover_over(sim: &mut FlightSimulation, index: usize, approach: f64) {
    let planet = &sim.planets()[index];
    let outward = (planet.position() - sim.sun().center()).normalize();
    let pos = planet.position() + outward * (planet.radius() + 5.0);
    let vel = planet.velocity(FRAME_MS / 1000.0) - outward * approach;
    let fuel = sim.ship().fuel;
    *sim.ship_mut() = Ship::flying(pos, vel, 0.0, fuel);
}

/// Distance from the ship to a planet center.
pub fn ship_distance_to(sim: &FlightSimulation, index: usize) -> f64 {
    sim.ship().pos.distance(sim.planets()[index].position())
}

/// A point one unit inside the right world edge, level with the sun.
pub fn near_right_edge(sim: &FlightSimulation) -> DVec2 {
    DVec2::new(sim.bounds().max.x - 1.0, sim.sun().center().y)
}
