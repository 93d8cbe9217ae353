//! Rising-edge ("hit") detection on raw band levels with a re-trigger cooldown.

use crate::audio::{sanitize_dt, sanitize_level, Band};
use crate::config::TransientConfig;

/// A detected hit on one band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransientEvent {
    pub band: Band,
    /// Normalized 0..1, `min(delta / reference_delta, 1)`
    pub strength: f32,
    /// Raw rise that triggered the event
    pub delta: f32,
}

/// Stateless edge test. The caller owns `previous` and the cooldown.
///
/// Fires when the rise exceeds `threshold`, the current level reaches `floor`
/// and no cooldown remains.
pub fn detect(
    band: Band,
    current: f32,
    previous: f32,
    cooldown_remaining: f32,
    config: &TransientConfig,
) -> Option<TransientEvent> {
    let current = sanitize_level(current);
    let previous = sanitize_level(previous);
    let delta = current - previous;
    if cooldown_remaining > 0.0 || delta <= config.threshold || current < config.floor {
        return None;
    }
    let strength = if config.reference_delta > 0.0 {
        (delta / config.reference_delta).min(1.0)
    } else {
        1.0
    };
    Some(TransientEvent {
        band,
        strength,
        delta,
    })
}

/// Per-band detector keeping the previous raw level and the cooldown timer.
#[derive(Clone, Debug)]
pub struct TransientDetector {
    band: Band,
    config: TransientConfig,
    previous: f32,
    cooldown: f32,
}

impl TransientDetector {
    pub fn new(band: Band, config: TransientConfig) -> Self {
        Self {
            band,
            config,
            previous: 0.0,
            cooldown: 0.0,
        }
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown
    }

    /// Feed this frame's raw level. Returns the event if the band hit.
    pub fn update(&mut self, raw: f32, dt_sec: f32) -> Option<TransientEvent> {
        let raw = sanitize_level(raw);
        self.cooldown = (self.cooldown - sanitize_dt(dt_sec)).max(0.0);
        let event = detect(self.band, raw, self.previous, self.cooldown, &self.config);
        if event.is_some() {
            self.cooldown = self.config.cooldown_sec.max(0.0);
        }
        self.previous = raw;
        event
    }

    /// Adopt `raw` as the previous level without testing for an edge. The
    /// cooldown still counts down by `dt_sec`.
    pub fn resync(&mut self, raw: f32, dt_sec: f32) {
        self.cooldown = (self.cooldown - sanitize_dt(dt_sec)).max(0.0);
        self.previous = sanitize_level(raw);
    }
}
