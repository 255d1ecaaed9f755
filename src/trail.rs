//! Time-windowed wake trails.
//!
//! One [`TrailBuffer`] backs each planet's wake and one backs the ship's.
//! Samples are appended at the back with monotonic timestamps, so decay is a
//! simple trim from the front.

use std::collections::VecDeque;

use bevy::math::DVec2;

/// A single wake sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSample {
    pub pos: DVec2,
    /// Frame time the sample was taken at (ms).
    pub time_ms: f64,
}

/// Render-ready view of a sample: where to draw it, how opaque, how big.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailDot {
    pub pos: DVec2,
    pub alpha: f64,
    pub radius: f64,
}

/// Oldest-first sequence of wake samples.
#[derive(Clone, Debug, Default)]
pub struct TrailBuffer {
    samples: VecDeque<TrailSample>,
}

impl TrailBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a new sample.
    ///
    /// The first sample is always taken. After that a sample is taken when the
    /// point moved at least `min_step` from the last sample *or* at least
    /// `min_interval_ms` passed since it. Returns whether the sample was kept.
    pub fn push(&mut self, pos: DVec2, now_ms: f64, min_step: f64, min_interval_ms: f64) -> bool {
        let Some(last) = self.samples.back() else {
            self.samples.push_back(TrailSample { pos, time_ms: now_ms });
            return true;
        };

        let moved_enough = pos.distance_squared(last.pos) >= min_step * min_step;
        let time_enough = now_ms - last.time_ms >= min_interval_ms;

        if moved_enough || time_enough {
            self.samples.push_back(TrailSample { pos, time_ms: now_ms });
            true
        } else {
            false
        }
    }

    /// Drop every sample older than `max_age_ms`. Returns how many were removed.
    pub fn prune(&mut self, now_ms: f64, max_age_ms: f64) -> usize {
        let mut removed = 0;
        while let Some(front) = self.samples.front() {
            if now_ms - front.time_ms > max_age_ms {
                self.samples.pop_front();
                removed += 1;
            } else {
                break;
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&TrailSample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailSample> {
        self.samples.iter()
    }

    /// Fade each sample by age: alpha falls linearly from 1 to 0 over
    /// `max_age_ms` and the dot radius shrinks from 4 to 2 with it.
    pub fn fade(&self, now_ms: f64, max_age_ms: f64) -> impl Iterator<Item = TrailDot> + '_ {
        self.samples.iter().map(move |s| {
            let age = now_ms - s.time_ms;
            let alpha = (1.0 - age / max_age_ms).clamp(0.0, 1.0);
            TrailDot {
                pos: s.pos,
                alpha,
                radius: 2.0 + alpha * 2.0,
            }
        })
    }
}
