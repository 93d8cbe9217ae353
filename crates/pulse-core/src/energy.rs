//! Slow rolling measure of sustained loudness ("afterglow").

use crate::audio::{sanitize_dt, sanitize_level};
use crate::config::EnergyConfig;
use crate::constants::BAND_WEIGHTS;

/// Fixed weighted mix of the smoothed bands, in \[0, 1\].
#[inline]
pub fn instant_energy(bass: f32, mid: f32, high: f32) -> f32 {
    let mix = BAND_WEIGHTS[0] * sanitize_level(bass)
        + BAND_WEIGHTS[1] * sanitize_level(mid)
        + BAND_WEIGHTS[2] * sanitize_level(high);
    mix.clamp(0.0, 1.0)
}

#[derive(Clone, Debug)]
pub struct EnergyAccumulator {
    config: EnergyConfig,
    value: f32,
}

impl EnergyAccumulator {
    pub fn new(config: EnergyConfig) -> Self {
        Self { config, value: 0.0 }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Blend toward `instant` with the rise or fall time constant.
    pub fn update(&mut self, instant: f32, dt_sec: f32) -> f32 {
        let dt = sanitize_dt(dt_sec);
        let target = sanitize_level(instant);
        let tau = if target > self.value {
            self.config.rise_tau_sec
        } else {
            self.config.fall_tau_sec
        };
        let alpha = if tau > 0.0 {
            1.0 - (-dt / tau).exp()
        } else {
            1.0
        };
        self.value = sanitize_level(self.value + (target - self.value) * alpha);
        self.value
    }
}
