//! Contact classification for the ship.
//!
//! Every active frame the ship is tested against the sun and then, if it is
//! flying, against each planet in index order. A planet contact lands when
//! the speed relative to that planet is at or below the landing threshold
//! and crashes otherwise.

use bevy::math::DVec2;

use crate::config::ShipConfig;
use crate::orbit::Planet;
use crate::ship::Ship;
use crate::sun::Sun;
use crate::types::PlanetId;

/// What a contact means for the ship.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Contact {
    /// Gentle touchdown; `theta` is the approach angle from the planet center.
    Landing {
        planet: PlanetId,
        theta: f64,
        relative_speed: f64,
    },
    /// Too fast.
    Crash {
        planet: PlanetId,
        relative_speed: f64,
    },
    /// Flew into the sun.
    SolarDestruction,
}

impl Contact {
    pub fn is_destructive(&self) -> bool {
        !matches!(self, Contact::Landing { .. })
    }
}

/// Speed of the ship relative to `planet`'s motion over the last `dt`.
pub fn relative_speed(ship_vel: DVec2, planet: &Planet, dt: f64) -> f64 {
    (ship_vel - planet.velocity(dt)).length()
}

/// Classify a touch between the ship and `planet`, if they touch at all.
///
/// Contact means `distance <= planet radius + ship collision radius`; landing
/// means `relative speed <= landing_speed_max`. Both bounds are inclusive.
pub fn classify_planet_contact(
    ship_pos: DVec2,
    ship_vel: DVec2,
    planet: &Planet,
    config: &ShipConfig,
    dt: f64,
) -> Option<Contact> {
    let dist = ship_pos.distance(planet.position());
    if dist > planet.radius() + config.collision_radius {
        return None;
    }

    let relative_speed = relative_speed(ship_vel, planet, dt);
    let contact = if relative_speed <= config.landing_speed_max {
        let offset = ship_pos - planet.position();
        Contact::Landing {
            planet: planet.id(),
            theta: offset.y.atan2(offset.x),
            relative_speed,
        }
    } else {
        Contact::Crash {
            planet: planet.id(),
            relative_speed,
        }
    };
    Some(contact)
}

/// Run the full per-frame contact test.
///
/// The sun is checked first and regardless of docking. A docked ship then
/// skips the planet checks. Planets are checked in index order and the first
/// one in range decides the outcome, even if a later one is closer.
pub fn detect_contact(
    ship: &Ship,
    planets: &[Planet],
    sun: &Sun,
    config: &ShipConfig,
    dt: f64,
) -> Option<Contact> {
    if sun.engulfs(ship.pos) {
        return Some(Contact::SolarDestruction);
    }

    if ship.is_docked() {
        return None;
    }

    planets
        .iter()
        .find_map(|planet| classify_planet_contact(ship.pos, ship.vel, planet, config, dt))
}
