//! Docked/flying state machine.
//!
//! A ship starts docked, leaves on a thrust press (inheriting its planet's
//! orbital velocity) and docks again on the next gentle contact. The dock
//! reference lives inside [`DockState::Docked`], so a flying ship cannot
//! launch and a docked ship always knows its planet.

use bevy::math::DVec2;

use crate::orbit::{finite_difference, Planet};
use crate::types::PlanetId;

/// Angle from the planet center to `ship_pos`.
#[inline]
pub fn approach_angle(ship_pos: DVec2, planet_pos: DVec2) -> f64 {
    (ship_pos.y - planet_pos.y).atan2(ship_pos.x - planet_pos.x)
}

/// Where a ship docked at `theta` sits: on the circle of
/// `planet_radius + standoff` around the planet center.
#[inline]
pub fn dock_position(planet_pos: DVec2, planet_radius: f64, theta: f64, standoff: f64) -> DVec2 {
    planet_pos + DVec2::from_angle(theta) * (planet_radius + standoff)
}

/// Everything a docked ship remembers about its planet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockContext {
    pub planet: PlanetId,
    /// Fixed docking angle, captured at touchdown.
    pub theta: f64,
    /// Planet position on the previous docked frame; launch velocity is
    /// measured against it.
    pub last_planet_pos: DVec2,
}

impl DockContext {
    pub fn new(planet: &Planet, theta: f64) -> Self {
        Self {
            planet: planet.id(),
            theta,
            last_planet_pos: planet.position(),
        }
    }

    /// Ship position for the planet's current location.
    pub fn anchor(&self, planet: &Planet, standoff: f64) -> DVec2 {
        dock_position(planet.position(), planet.radius(), self.theta, standoff)
    }

    /// Velocity inherited on launch: the planet's displacement since the
    /// last docked frame over `dt`.
    pub fn launch_velocity(&self, planet_pos: DVec2, dt: f64) -> DVec2 {
        finite_difference(planet_pos, self.last_planet_pos, dt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DockState {
    Docked(DockContext),
    Flying,
}

impl DockState {
    pub fn is_docked(&self) -> bool {
        matches!(self, DockState::Docked(_))
    }

    pub fn planet(&self) -> Option<PlanetId> {
        match self {
            DockState::Docked(dock) => Some(dock.planet),
            DockState::Flying => None,
        }
    }

    pub fn context(&self) -> Option<&DockContext> {
        match self {
            DockState::Docked(dock) => Some(dock),
            DockState::Flying => None,
        }
    }

    /// Touch down on `planet`. The approach angle becomes the docking angle
    /// and the planet's current position the launch baseline.
    pub fn land(&mut self, planet: &Planet, ship_pos: DVec2) -> DockContext {
        let dock = DockContext::new(planet, approach_angle(ship_pos, planet.position()));
        *self = DockState::Docked(dock);
        dock
    }

    /// Leave the planet at `planet_pos`, returning the inherited velocity.
    /// `None` when already flying.
    pub fn launch(&mut self, planet_pos: DVec2, dt: f64) -> Option<DVec2> {
        let DockState::Docked(dock) = self else {
            return None;
        };
        let vel = dock.launch_velocity(planet_pos, dt);
        *self = DockState::Flying;
        Some(vel)
    }

    /// Move the launch baseline to the planet's current position.
    pub fn track(&mut self, planet_pos: DVec2) {
        if let DockState::Docked(dock) = self {
            dock.last_planet_pos = planet_pos;
        }
    }
}
