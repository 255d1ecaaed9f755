//! The sun: a fixed, pulsing, lethal point mass at the system center.

use bevy::math::DVec2;

use crate::config::SunConfig;

/// Sun radius at `now_ms`, given a jitter sample `u` in [0, 1).
pub fn pulse_radius(config: &SunConfig, now_ms: f64, u: f64) -> f64 {
    let pulse = config.pulse_base + config.pulse_amplitude * (now_ms * config.pulse_rate).sin();
    config.base_radius * pulse + config.jitter * u
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sun {
    center: DVec2,
    radius: f64,
}

impl Sun {
    /// A sun at `center` with its radius evaluated at t = 0 without jitter.
    pub fn new(center: DVec2, config: &SunConfig) -> Self {
        Self {
            center,
            radius: pulse_radius(config, 0.0, 0.0),
        }
    }

    /// Recompute the radius for this frame.
    pub fn update(&mut self, config: &SunConfig, now_ms: f64, u: f64) {
        self.radius = pulse_radius(config, now_ms, u);
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// Visual radius, which is also the lethal contact radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass_like(&self) -> f64 {
        self.radius * self.radius
    }

    /// Strictly inside the sun; touching the rim is survivable.
    pub fn engulfs(&self, pos: DVec2) -> bool {
        pos.distance_squared(self.center) < self.radius * self.radius
    }
}
