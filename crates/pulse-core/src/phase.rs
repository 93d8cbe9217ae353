//! Monotonic phase accumulators with a smoothed, audio-driven rate.
//!
//! The rate, not the phase, follows the audio: it speeds up quickly on
//! energy and spins down slowly, and the phase integrates it. Since the rate
//! is floored at a positive minimum and `dt` is never negative, the phase can
//! only grow.

use crate::audio::{sanitize_dt, sanitize_level};
use crate::config::PhaseRateConfig;
use crate::envelope::asymmetric_blend;

/// Filtered audio the rate law reads each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RateInputs {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    pub sustained: f32,
}

impl RateInputs {
    fn sanitized(self) -> Self {
        Self {
            bass: sanitize_level(self.bass),
            mid: sanitize_level(self.mid),
            high: sanitize_level(self.high),
            sustained: sanitize_level(self.sustained),
        }
    }
}

/// Unsmoothed rate for the given inputs.
pub fn target_rate(config: &PhaseRateConfig, inputs: RateInputs) -> f32 {
    let i = inputs.sanitized();
    let rate = config.idle_rate
        + config.bass_weight * i.bass.powf(config.bass_curve.max(0.0))
        + config.mid_weight * i.mid
        + config.high_weight * i.high
        + config.sustained_weight * i.sustained;
    if rate.is_finite() {
        rate
    } else {
        config.idle_rate
    }
}

#[derive(Clone, Debug)]
pub struct PhaseAccumulator {
    config: PhaseRateConfig,
    rate: f32,
    phase: f64,
}

impl PhaseAccumulator {
    pub fn new(config: PhaseRateConfig) -> Self {
        let rate = config.idle_rate.max(config.min_rate).max(0.0);
        Self {
            config,
            rate,
            phase: 0.0,
        }
    }

    pub fn config(&self) -> &PhaseRateConfig {
        &self.config
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Phase as handed to shaders.
    pub fn phase_f32(&self) -> f32 {
        self.phase as f32
    }

    /// Smooth the rate toward the audio-driven target and integrate it over `dt_sec`.
    pub fn advance(&mut self, dt_sec: f32, inputs: RateInputs) -> f64 {
        let dt = sanitize_dt(dt_sec);
        if dt == 0.0 {
            return self.phase;
        }
        let target = target_rate(&self.config, inputs);
        let floor = self.config.min_rate.max(0.0);
        let blended = asymmetric_blend(
            self.rate,
            target,
            self.config.attack,
            self.config.release,
            dt,
        );
        self.rate = if blended.is_finite() {
            blended.max(floor)
        } else {
            floor
        };
        self.phase += f64::from(self.rate) * f64::from(dt);
        self.phase
    }
}
