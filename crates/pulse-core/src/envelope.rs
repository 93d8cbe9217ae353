//! Asymmetric envelope follower: quick attack, slow release.

use crate::audio::{sanitize_dt, sanitize_level};
use crate::config::EnvelopeConfig;
use crate::constants::REFERENCE_FPS;

/// Convert a per-reference-frame blend rate into the blend for `dt_sec`.
///
/// At `dt_sec == 1 / REFERENCE_FPS` this returns `rate` unchanged.
#[inline]
pub fn frame_alpha(rate: f32, dt_sec: f32) -> f32 {
    let rate = rate.clamp(0.0, 1.0);
    if dt_sec <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - rate).powf(dt_sec * REFERENCE_FPS)
}

/// Move `current` toward `target`, using `attack` when rising and `release`
/// when falling.
#[inline]
pub fn asymmetric_blend(current: f32, target: f32, attack: f32, release: f32, dt_sec: f32) -> f32 {
    let rate = if target > current { attack } else { release };
    current + (target - current) * frame_alpha(rate, dt_sec)
}

/// Smoothed "felt" loudness of one band.
#[derive(Clone, Debug)]
pub struct EnvelopeFilter {
    config: EnvelopeConfig,
    value: f32,
}

impl EnvelopeFilter {
    pub fn new(config: EnvelopeConfig) -> Self {
        Self { config, value: 0.0 }
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    /// Feed one raw sample and return the smoothed level in \[0, 1\].
    pub fn update(&mut self, raw: f32, dt_sec: f32) -> f32 {
        let dt = sanitize_dt(dt_sec);
        let target = sanitize_level(raw).powf(self.config.curve.max(0.0));
        let next = asymmetric_blend(
            self.value,
            target,
            self.config.attack,
            self.config.release,
            dt,
        );
        self.value = sanitize_level(next);
        self.value
    }
}
