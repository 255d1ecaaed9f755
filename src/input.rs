//! Pilot input sampling.
//!
//! The keyboard is read once per frame into [`PilotInput`], which is all the
//! simulation ever sees. [`InputGate`] is raised by whatever owns modal UI;
//! while it is up the simulation ignores input and skips contact checks.

use bevy::prelude::*;

/// Control state for one frame.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PilotInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Thrust held this frame.
    pub thrust: bool,
    /// Thrust went down this frame (launch trigger while docked).
    pub thrust_pressed: bool,
    /// Restart requested this frame.
    pub restart: bool,
}

impl PilotInput {
    /// Holding thrust from a standing start: held and newly pressed.
    pub fn thrust_tap() -> Self {
        Self {
            thrust: true,
            thrust_pressed: true,
            ..Default::default()
        }
    }
}

/// External "a dialog is open" flag.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputGate(pub bool);

impl InputGate {
    pub fn is_gated(&self) -> bool {
        self.0
    }
}

/// Map the keyboard to [`PilotInput`].
///
/// W / Up thrusts, A / Left and D / Right rotate, R restarts. Without a
/// keyboard resource (headless apps) the input stays neutral.
pub fn read_pilot_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PilotInput>) {
    let Some(keys) = keys else {
        *input = PilotInput::default();
        return;
    };

    *input = PilotInput {
        rotate_left: keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
        rotate_right: keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
        thrust: keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]),
        thrust_pressed: keys.any_just_pressed([KeyCode::KeyW, KeyCode::ArrowUp]),
        restart: keys.just_pressed(KeyCode::KeyR),
    };
}
