//! Property-based tests for the flight physics using proptest.
//!
//! These tests verify the clamps and invariants that keep the integrator
//! stable across a wide range of geometry and tuning.

use bevy::math::DVec2;
use proptest::prelude::*;

use super::{nearest_index, point_gravity};
use crate::orbit::Planet;
use crate::test_utils::fixtures;
use crate::trail::TrailBuffer;
use crate::types::PlanetId;

fn coord() -> impl Strategy<Value = f64> {
    -2000.0f64..2000.0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The cap holds no matter how close the ship gets, including on top of the source.
    #[test]
    fn prop_acceleration_never_exceeds_cap(
        sx in coord(), sy in coord(),
        offset in 0.0f64..50.0,
        angle in 0.0f64..std::f64::consts::TAU,
        mass_like in 0.0f64..20_000.0,
        k in 0.0f64..1000.0,
        min_r in 0.01f64..50.0,
        max_a in 0.01f64..500.0,
    ) {
        let ship = DVec2::new(sx, sy);
        let source = ship + DVec2::from_angle(angle) * offset;
        let a = point_gravity(ship, source, mass_like, k, min_r, max_a);

        prop_assert!(a.is_finite(), "acceleration not finite: {:?}", a);
        prop_assert!(
            a.length() <= max_a * (1.0 + 1e-12),
            "|a| = {} exceeds cap {}", a.length(), max_a
        );
    }

    /// Inside the floor the inverse-square law sees `min_r`, never the real distance.
    #[test]
    fn prop_distance_floor(
        fraction in 0.001f64..1.0,
        angle in 0.0f64..std::f64::consts::TAU,
        mass_like in 1.0f64..5000.0,
        k in 1.0f64..1000.0,
        min_r in 1.0f64..50.0,
    ) {
        let source = DVec2::from_angle(angle) * (min_r * fraction);
        let a = point_gravity(DVec2::ZERO, source, mass_like, k, min_r, f64::MAX);

        let expected = k * mass_like / (min_r * min_r);
        let error = ((a.length() - expected) / expected).abs();
        prop_assert!(error < 1e-9, "got {}, expected {}", a.length(), expected);
    }

    /// The pull always points from the ship toward the source.
    #[test]
    fn prop_acceleration_points_at_source(
        sx in coord(), sy in coord(),
        tx in coord(), ty in coord(),
    ) {
        let ship = DVec2::new(sx, sy);
        let source = DVec2::new(tx, ty);
        prop_assume!(ship.distance(source) > 1e-6);

        let a = point_gravity(ship, source, 400.0, 700.0, 28.0, 90.0);
        prop_assert!(a.dot(source - ship) > 0.0);
    }

    /// Nearest selection agrees with a brute-force minimum.
    #[test]
    fn prop_nearest_matches_brute_force(
        ship in (coord(), coord()),
        points in prop::collection::vec((coord(), coord()), 1..12),
    ) {
        let ship = DVec2::new(ship.0, ship.1);
        let positions: Vec<DVec2> = points.iter().map(|&(x, y)| DVec2::new(x, y)).collect();

        let nearest = nearest_index(ship, positions.iter().copied()).unwrap();
        let min = positions
            .iter()
            .map(|p| ship.distance_squared(*p))
            .fold(f64::INFINITY, f64::min);

        prop_assert_eq!(nearest.dist_sq, min);
        // First minimum wins.
        let first = positions.iter().position(|p| ship.distance_squared(*p) == min).unwrap();
        prop_assert_eq!(nearest.index, first);
    }

    /// Planets never leave their orbit circle.
    #[test]
    fn prop_planet_stays_on_orbit(
        angle in -100.0f64..100.0,
        speed in -3.0f64..3.0,
        steps in prop::collection::vec(0.0f64..0.1, 1..200),
    ) {
        let spec = fixtures::planet_spec(10.0, 230.0, speed);
        let center = DVec2::new(640.0, 360.0);
        let mut planet = Planet::new(PlanetId(0), &spec, center, angle);

        for dt in steps {
            planet.step(dt);
            let r = planet.position().distance(center);
            prop_assert!((r - 230.0).abs() < 1e-9, "radius drifted to {}", r);
        }
    }

    /// After pruning, every sample is within the age window and still in time order.
    #[test]
    fn prop_trail_prune_window(
        samples in prop::collection::vec(((coord(), coord()), 0.0f64..500.0), 1..64),
        max_age in 1.0f64..5000.0,
    ) {
        let mut trail = TrailBuffer::new();
        let mut now = 0.0;
        for ((x, y), gap) in samples {
            now += gap;
            trail.push(DVec2::new(x, y), now, 90.0, 240.0);
        }

        trail.prune(now, max_age);

        let mut last_time = f64::NEG_INFINITY;
        for s in trail.iter() {
            prop_assert!(now - s.time_ms <= max_age);
            prop_assert!(s.time_ms >= last_time);
            last_time = s.time_ms;
        }
    }
}
