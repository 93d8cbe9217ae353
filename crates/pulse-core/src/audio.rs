//! Per-frame audio input as delivered by the external analyzer.
//!
//! The engine never trusts these values: every level is sanitized to the
//! \[0, 1\] range and every frame delta is clamped before use.

use crate::constants::MAX_FRAME_DT_SEC;

/// Frequency band of an [`AudioFrame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    Bass,
    Mid,
    High,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Bass, Band::Mid, Band::High];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Band::Bass => 0,
            Band::Mid => 1,
            Band::High => 2,
        }
    }
}

/// Three normalized band energies sampled once per rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioFrame {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

impl AudioFrame {
    pub const SILENT: AudioFrame = AudioFrame {
        bass: 0.0,
        mid: 0.0,
        high: 0.0,
    };

    pub fn new(bass: f32, mid: f32, high: f32) -> Self {
        Self { bass, mid, high }
    }

    pub fn band(&self, band: Band) -> f32 {
        match band {
            Band::Bass => self.bass,
            Band::Mid => self.mid,
            Band::High => self.high,
        }
    }

    /// Copy with every level passed through [`sanitize_level`].
    pub fn sanitized(&self) -> Self {
        Self {
            bass: sanitize_level(self.bass),
            mid: sanitize_level(self.mid),
            high: sanitize_level(self.high),
        }
    }
}

/// Non-finite levels read as silence; everything else is clamped to \[0, 1\].
#[inline]
pub fn sanitize_level(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Frame delta in seconds, clamped to `[0, MAX_FRAME_DT_SEC]`. NaN reads as 0.
#[inline]
pub fn sanitize_dt(dt_sec: f32) -> f32 {
    if dt_sec.is_finite() {
        dt_sec.clamp(0.0, MAX_FRAME_DT_SEC)
    } else if dt_sec == f32::INFINITY {
        MAX_FRAME_DT_SEC
    } else {
        0.0
    }
}
