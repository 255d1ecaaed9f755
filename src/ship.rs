//! Ship flight model.
//!
//! A flying ship integrates rotation, thrust, gravity and drag with a
//! semi-implicit Euler step and wraps around the world rectangle. A docked
//! ship is rigidly attached to its planet and only listens for a launch.

use bevy::math::DVec2;

use crate::config::{FlightConfig, ShipConfig, WorldBounds};
use crate::docking::{DockContext, DockState};
use crate::input::PilotInput;
use crate::orbit::Planet;
use crate::physics::{apply_gravity, nearest_planet, GravitySource};
use crate::sun::Sun;
use crate::trail::TrailBuffer;
use crate::types::PlanetId;

/// Read-only surroundings for one flight step.
#[derive(Clone, Copy, Debug)]
pub struct FlightContext<'a> {
    pub config: &'a FlightConfig,
    pub planets: &'a [Planet],
    pub sun: &'a Sun,
    pub bounds: WorldBounds,
}

#[derive(Clone, Debug)]
pub struct Ship {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Heading (rad). Not normalized.
    pub rotation: f64,
    /// Remaining fuel, never negative.
    pub fuel: f64,
    dock: DockState,
    wake: TrailBuffer,
}

impl Ship {
    /// A ship resting on `planet` at docking angle `theta`.
    pub fn docked_on(planet: &Planet, theta: f64, fuel: f64, tail_offset: f64) -> Self {
        let dock = DockContext::new(planet, theta);
        Self {
            pos: dock.anchor(planet, tail_offset),
            vel: DVec2::ZERO,
            rotation: theta,
            fuel,
            dock: DockState::Docked(dock),
            wake: TrailBuffer::new(),
        }
    }

    /// A ship already in free flight.
    pub fn flying(pos: DVec2, vel: DVec2, rotation: f64, fuel: f64) -> Self {
        Self {
            pos,
            vel,
            rotation,
            fuel,
            dock: DockState::Flying,
            wake: TrailBuffer::new(),
        }
    }

    pub fn dock_state(&self) -> &DockState {
        &self.dock
    }

    pub fn is_docked(&self) -> bool {
        self.dock.is_docked()
    }

    pub fn docked_planet(&self) -> Option<PlanetId> {
        self.dock.planet()
    }

    pub fn wake(&self) -> &TrailBuffer {
        &self.wake
    }

    pub(crate) fn wake_mut(&mut self) -> &mut TrailBuffer {
        &mut self.wake
    }

    /// Point `tail_offset` behind the ship along its heading.
    pub fn tail(&self, tail_offset: f64) -> DVec2 {
        self.pos - DVec2::from_angle(self.rotation) * tail_offset
    }

    /// Advance a flying ship by `dt` seconds.
    pub fn fly(&mut self, input: &PilotInput, ctx: &FlightContext, now_ms: f64, dt: f64) {
        let ship = &ctx.config.ship;
        let gravity = &ctx.config.gravity;

        if input.rotate_left {
            self.rotation -= ship.rotate_speed * dt;
        }
        if input.rotate_right {
            self.rotation += ship.rotate_speed * dt;
        }

        if input.thrust && self.fuel > 0.0 {
            self.vel += DVec2::from_angle(self.rotation) * ship.thrust * dt;
            self.fuel = (self.fuel - ship.fuel_burn_rate * dt).max(0.0);

            let wake = &ctx.config.wake;
            let tail = self.tail(ship.tail_offset);
            self.wake
                .push(tail, now_ms, wake.min_step, wake.sample_interval_ms);
        }

        let sun = GravitySource {
            pos: ctx.sun.center(),
            mass_like: ctx.sun.mass_like(),
            k: gravity.sun_k,
        };
        let planet = nearest_planet(self.pos, ctx.planets).map(|(p, _)| GravitySource {
            pos: p.position(),
            mass_like: p.mass_like(),
            k: gravity.planet_k,
        });
        let sources: Vec<GravitySource> = planet.into_iter().chain([sun]).collect();
        apply_gravity(&mut self.vel, self.pos, &sources, gravity, dt);

        self.pos += self.vel * dt;
        self.vel *= ship.drag;
        self.pos = ctx.bounds.wrap(self.pos);
    }

    /// Ride along with the docked planet for one frame.
    ///
    /// With `input` present, a fresh thrust press and some fuel launch the
    /// ship with the planet's velocity, which is returned. Thrust itself only
    /// acts from the next frame on.
    pub fn ride(
        &mut self,
        planet: &Planet,
        input: Option<&PilotInput>,
        config: &ShipConfig,
        dt: f64,
    ) -> Option<DVec2> {
        let dock = *self.dock.context()?;
        debug_assert_eq!(dock.planet, planet.id(), "riding the wrong planet");

        self.pos = dock.anchor(planet, config.tail_offset);
        self.rotation = dock.theta;
        self.vel = DVec2::ZERO;

        let wants_launch = input.is_some_and(|i| i.thrust_pressed) && self.fuel > 0.0;
        if wants_launch {
            let vel = self.dock.launch(planet.position(), dt)?;
            self.vel = vel;
            return Some(vel);
        }

        self.dock.track(planet.position());
        None
    }

    /// Dock on `planet` at the current approach angle. Returns the docking angle.
    pub fn land_on(&mut self, planet: &Planet, tail_offset: f64) -> f64 {
        let dock = self.dock.land(planet, self.pos);
        self.pos = dock.anchor(planet, tail_offset);
        self.rotation = dock.theta;
        self.vel = DVec2::ZERO;
        self.wake.clear();
        dock.theta
    }

    /// Kill all motion and the wake, as on destruction.
    pub fn halt(&mut self) {
        self.vel = DVec2::ZERO;
        self.wake.clear();
    }
}
