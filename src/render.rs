//! Gizmo rendering of the flight simulation.
//!
//! Reads [`FlightSimulation`] each frame and never mutates it. Simulation
//! coordinates grow downward from the top-left of the world; the renderer
//! recenters them on the sun and flips y.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::config::FlightConfig;
use crate::simulation::FlightSimulation;
use crate::trail::TrailBuffer;
use crate::types::FlightSystemSet;

const SUN_COLOR: Color = Color::srgb(1.0, 0.8, 0.3);
const SHIP_COLOR: Color = Color::srgb(0.9, 0.95, 1.0);
const TARGET_COLOR: Color = Color::srgb(0.3, 1.0, 0.5);
const EXPLOSION_COLOR: Color = Color::srgb(1.0, 0.4, 0.1);

/// Ship hull length for drawing.
const SHIP_LENGTH: f32 = 14.0;

/// Simulation position to render space around `center`.
#[inline]
pub fn to_render(pos: DVec2, center: DVec2) -> Vec2 {
    Vec2::new((pos.x - center.x) as f32, (center.y - pos.y) as f32)
}

/// Heading in render space (y flipped).
#[inline]
fn heading(rotation: f64) -> Vec2 {
    Vec2::new(rotation.cos() as f32, -(rotation.sin() as f32))
}

fn planet_color(index: usize) -> Color {
    match index % 6 {
        0 => Color::srgb(0.6, 0.6, 0.6),
        1 => Color::srgb(0.9, 0.85, 0.7),
        2 => Color::srgb(0.2, 0.5, 0.8),
        3 => Color::srgb(0.8, 0.4, 0.2),
        4 => Color::srgb(0.8, 0.7, 0.6),
        _ => Color::srgb(0.6, 0.8, 0.9),
    }
}

/// Plugin providing the 2D view: camera plus gizmo drawing.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera).add_systems(
            Update,
            (draw_orbits, draw_trails, draw_bodies, draw_ship)
                .after(FlightSystemSet::Simulate),
        );
    }
}

fn spawn_camera(mut commands: Commands, config: Res<FlightConfig>) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: config.world.world_scale as f32,
            ..OrthographicProjection::default_2d()
        }),
    ));
}

fn draw_orbits(mut gizmos: Gizmos, sim: Option<Res<FlightSimulation>>) {
    let Some(sim) = sim else {
        return;
    };
    for planet in sim.planets() {
        gizmos.circle_2d(
            Isometry2d::IDENTITY,
            planet.orbit().radius as f32,
            Color::srgba(1.0, 1.0, 1.0, 0.08),
        );
    }
}

fn draw_trail(gizmos: &mut Gizmos, trail: &TrailBuffer, now_ms: f64, max_age_ms: f64, center: DVec2, color: Color) {
    for dot in trail.fade(now_ms, max_age_ms) {
        gizmos.circle_2d(
            Isometry2d::from_translation(to_render(dot.pos, center)),
            dot.radius as f32,
            color.with_alpha(dot.alpha as f32 * 0.6),
        );
    }
}

fn draw_trails(mut gizmos: Gizmos, sim: Option<Res<FlightSimulation>>, time: Res<Time>) {
    let Some(sim) = sim else {
        return;
    };
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    let max_age = sim.config().wake.max_age_ms;
    let center = sim.sun().center();

    for (i, trail) in sim.planet_trails().iter().enumerate() {
        draw_trail(&mut gizmos, trail, now_ms, max_age, center, planet_color(i));
    }
    draw_trail(&mut gizmos, sim.ship().wake(), now_ms, max_age, center, SHIP_COLOR);
}

fn draw_bodies(mut gizmos: Gizmos, sim: Option<Res<FlightSimulation>>) {
    let Some(sim) = sim else {
        return;
    };
    let center = sim.sun().center();

    gizmos.circle_2d(Isometry2d::IDENTITY, sim.sun().radius() as f32, SUN_COLOR);

    for planet in sim.planets() {
        let pos = to_render(planet.position(), center);
        gizmos.circle_2d(
            Isometry2d::from_translation(pos),
            planet.radius() as f32,
            planet_color(planet.id().index()),
        );
        if planet.id() == sim.target() {
            gizmos.circle_2d(
                Isometry2d::from_translation(pos),
                planet.radius() as f32 + 8.0,
                TARGET_COLOR,
            );
        }
    }
}

fn draw_ship(mut gizmos: Gizmos, sim: Option<Res<FlightSimulation>>) {
    let Some(sim) = sim else {
        return;
    };
    let center = sim.sun().center();

    if let Some(destruction) = sim.destruction() {
        if sim.is_exploding() {
            let t = (destruction.elapsed_ms / sim.config().destruction.explosion_ms) as f32;
            let pos = to_render(destruction.position, center);
            for ring in 0..3 {
                let radius = 6.0 + (t * 40.0) * (1.0 + ring as f32 * 0.4);
                gizmos.circle_2d(
                    Isometry2d::from_translation(pos),
                    radius,
                    EXPLOSION_COLOR.with_alpha(1.0 - t),
                );
            }
        }
        return;
    }

    let ship = sim.ship();
    let nose_dir = heading(ship.rotation);
    let side = nose_dir.perp() * (SHIP_LENGTH * 0.4);
    let pos = to_render(ship.pos, center);
    let nose = pos + nose_dir * (SHIP_LENGTH * 0.6);
    let back = pos - nose_dir * (SHIP_LENGTH * 0.4);

    gizmos.line_2d(nose, back + side, SHIP_COLOR);
    gizmos.line_2d(back + side, back - side, SHIP_COLOR);
    gizmos.line_2d(back - side, nose, SHIP_COLOR);
}
