//! Kinematic planet orbits.
//!
//! Planets ride fixed circular orbits around the system center. Nothing
//! perturbs them: their position is a pure function of the orbital angle.

use bevy::math::DVec2;

use crate::config::PlanetSpec;
use crate::types::PlanetId;

/// Position on a circle of `radius` around `center` at `angle`.
#[inline]
pub fn orbit_position(center: DVec2, radius: f64, angle: f64) -> DVec2 {
    center + DVec2::new(angle.cos(), angle.sin()) * radius
}

/// Velocity estimated from two successive positions.
///
/// Returns zero for a non-positive `dt` instead of dividing by it.
#[inline]
pub fn finite_difference(current: DVec2, last: DVec2, dt: f64) -> DVec2 {
    if dt > 0.0 {
        (current - last) / dt
    } else {
        DVec2::ZERO
    }
}

/// Circular orbit parameters plus the current phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    pub center: DVec2,
    pub radius: f64,
    /// Signed angular speed (rad/s).
    pub angular_speed: f64,
    /// Current angle (rad). Grows without wrapping; only sin/cos consume it.
    pub angle: f64,
}

impl Orbit {
    pub fn advance(&mut self, dt: f64) {
        self.angle += self.angular_speed * dt;
    }

    pub fn position(&self) -> DVec2 {
        orbit_position(self.center, self.radius, self.angle)
    }
}

/// An orbiting planet.
#[derive(Clone, Debug)]
pub struct Planet {
    id: PlanetId,
    radius: f64,
    orbit: Orbit,
    pos: DVec2,
    prev_pos: DVec2,
}

impl Planet {
    /// Place a planet on its orbit at `angle`. The previous position starts
    /// equal to the current one, so its first velocity reads as zero.
    pub fn new(id: PlanetId, spec: &PlanetSpec, center: DVec2, angle: f64) -> Self {
        let orbit = Orbit {
            center,
            radius: spec.orbit_radius,
            angular_speed: spec.angular_speed,
            angle,
        };
        let pos = orbit.position();
        Self {
            id,
            radius: spec.radius,
            orbit,
            pos,
            prev_pos: pos,
        }
    }

    /// Advance one frame, remembering where the planet was.
    pub fn step(&mut self, dt: f64) {
        self.prev_pos = self.pos;
        self.orbit.advance(dt);
        self.pos = self.orbit.position();
    }

    pub fn id(&self) -> PlanetId {
        self.id
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    pub fn position(&self) -> DVec2 {
        self.pos
    }

    pub fn previous_position(&self) -> DVec2 {
        self.prev_pos
    }

    /// Gravity "mass": the display radius squared.
    pub fn mass_like(&self) -> f64 {
        self.radius * self.radius
    }

    /// Instantaneous velocity over the last step.
    ///
    /// Only meaningful once per frame, after [`Planet::step`] ran with the same `dt`.
    pub fn velocity(&self, dt: f64) -> DVec2 {
        finite_difference(self.pos, self.prev_pos, dt)
    }
}
