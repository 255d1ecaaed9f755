//! Point gravity for the ship.
//!
//! Each source pulls with `K * massLike / d²`, where `d` never drops below a
//! floor and the result never exceeds a cap. Only the nearest planet and the
//! sun act on the ship in a given frame.

use bevy::math::DVec2;

use crate::config::GravityConfig;
use crate::orbit::Planet;

/// A single attracting body as seen by the integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravitySource {
    pub pos: DVec2,
    /// Stand-in for mass: display radius squared.
    pub mass_like: f64,
    /// Strength constant for this kind of body.
    pub k: f64,
}

/// Acceleration exerted on a ship at `ship` by a point mass at `source`.
///
/// # Arguments
/// * `mass_like` - Radius-squared "mass" of the source
/// * `k` - Strength constant
/// * `min_r` - Distance floor used in the inverse-square law
/// * `max_a` - Acceleration magnitude cap
///
/// # Returns
/// Acceleration vector pointing from the ship toward the source, with
/// magnitude at most `max_a`. A ship sitting exactly on the source gets zero.
#[inline]
pub fn point_gravity(
    ship: DVec2,
    source: DVec2,
    mass_like: f64,
    k: f64,
    min_r: f64,
    max_a: f64,
) -> DVec2 {
    let delta = source - ship;
    let dist = delta.length().max(min_r);

    let accel = (k * mass_like / (dist * dist)).min(max_a);

    delta.normalize_or_zero() * accel
}

/// Acceleration from a [`GravitySource`] under the shared floor and cap.
#[inline]
pub fn source_acceleration(ship: DVec2, source: &GravitySource, config: &GravityConfig) -> DVec2 {
    point_gravity(
        ship,
        source.pos,
        source.mass_like,
        source.k,
        config.min_r,
        config.max_a,
    )
}

/// Apply every source to `vel` independently (semi-implicit Euler kick).
///
/// All accelerations are evaluated at the same ship position, so the order of
/// `sources` does not matter.
pub fn apply_gravity(
    vel: &mut DVec2,
    ship: DVec2,
    sources: &[GravitySource],
    config: &GravityConfig,
    dt: f64,
) {
    for source in sources {
        *vel += source_acceleration(ship, source, config) * dt;
    }
}

/// Result of a nearest-body scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    pub index: usize,
    pub dist_sq: f64,
}

/// Index and squared distance of the position closest to `ship`.
///
/// Linear scan with a strict comparison, so the first of several equally
/// close bodies wins. `None` for an empty input.
pub fn nearest_index(ship: DVec2, positions: impl IntoIterator<Item = DVec2>) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;

    for (index, pos) in positions.into_iter().enumerate() {
        let dist_sq = ship.distance_squared(pos);
        if best.is_none_or(|b| dist_sq < b.dist_sq) {
            best = Some(Nearest { index, dist_sq });
        }
    }

    best
}

/// The planet closest to `ship`, with its squared distance.
pub fn nearest_planet(ship: DVec2, planets: &[Planet]) -> Option<(&Planet, f64)> {
    nearest_index(ship, planets.iter().map(Planet::position))
        .map(|n| (&planets[n.index], n.dist_sq))
}
