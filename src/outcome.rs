//! Flight outcomes: the events a tick can produce, the destruction
//! timeline, and victory scoring.

use bevy::math::DVec2;

use crate::config::DestructionConfig;
use crate::types::PlanetId;

/// Why the ship was destroyed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DestructionCause {
    /// Hit a planet too fast.
    Crash { planet: PlanetId, relative_speed: f64 },
    /// Flew into the sun.
    Sun,
}

/// Something that happened during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum FlightEvent {
    /// Left a planet with its orbital velocity.
    Launched { planet: PlanetId, velocity: DVec2 },
    /// Docked on a planet.
    Landed {
        planet: PlanetId,
        theta: f64,
        relative_speed: f64,
    },
    /// Hit a planet too fast.
    Crashed { planet: PlanetId, relative_speed: f64 },
    /// Entered the sun.
    SolarDestruction,
    /// Explosion effect should play at `position`.
    Explosion { position: DVec2 },
    /// Landed on the target planet.
    Victory { planet: PlanetId, score: u32 },
    /// The destruction sequence is over and a restart can be offered.
    RestartReady,
}

/// Everything one tick produced, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<FlightEvent>,
}

impl TickReport {
    pub fn push(&mut self, event: FlightEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn victory(&self) -> Option<(PlanetId, u32)> {
        self.events.iter().find_map(|e| match e {
            FlightEvent::Victory { planet, score } => Some((*planet, *score)),
            _ => None,
        })
    }

    pub fn landed(&self) -> Option<PlanetId> {
        self.events.iter().find_map(|e| match e {
            FlightEvent::Landed { planet, .. } => Some(*planet),
            _ => None,
        })
    }

    pub fn destroyed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, FlightEvent::Crashed { .. } | FlightEvent::SolarDestruction))
    }

    pub fn restart_ready(&self) -> bool {
        self.events.contains(&FlightEvent::RestartReady)
    }
}

/// An in-progress destruction sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Destruction {
    pub cause: DestructionCause,
    pub position: DVec2,
    /// Time since the explosion started (ms).
    pub elapsed_ms: f64,
    prompted: bool,
}

impl Destruction {
    pub fn new(cause: DestructionCause, position: DVec2) -> Self {
        Self {
            cause,
            position,
            elapsed_ms: 0.0,
            prompted: false,
        }
    }

    /// Advance the timeline. Returns `true` exactly once, on the frame the
    /// restart prompt becomes due.
    pub fn advance(&mut self, dt_ms: f64, config: &DestructionConfig) -> bool {
        self.elapsed_ms += dt_ms.max(0.0);
        if !self.prompted && self.elapsed_ms >= config.restart_prompt_ms {
            self.prompted = true;
            return true;
        }
        false
    }

    pub fn is_exploding(&self, config: &DestructionConfig) -> bool {
        self.elapsed_ms < config.explosion_ms
    }

    pub fn restart_ready(&self) -> bool {
        self.prompted
    }
}

/// Victory score: remaining fuel × 100, floored, never negative.
pub fn score_for_fuel(fuel: f64) -> u32 {
    (fuel * 100.0).floor().max(0.0) as u32
}
