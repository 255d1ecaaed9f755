//! Orbital Lander
//!
//! Dock, launch and glide through a pulsing star system, then land gently on
//! the target planet. The first command-line argument is the pilot's
//! initials for the score board.

use bevy::prelude::*;

use orbital_lander::leaderboard::{LeaderboardPlugin, PilotTag};
use orbital_lander::render::RenderPlugin;
use orbital_lander::simulation::SimulationPlugin;

fn main() {
    let tag = std::env::args().nth(1).unwrap_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orbital Lander".into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Insert resources before plugins that depend on them
        .insert_resource(PilotTag(tag))
        .add_plugins((SimulationPlugin, LeaderboardPlugin, RenderPlugin))
        .run();
}
