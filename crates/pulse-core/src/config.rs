//! Named tuning for every filter, detector, accumulator and impulse pool.
//!
//! A variant's personality is a [`VariantProfile`] value: the primitives are
//! shared and only these numbers differ between variants.

use crate::field::Variant;

/// Asymmetric envelope rates, expressed per reference frame (60 fps).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeConfig {
    /// Blend toward a rising target (0..1, higher = punchier)
    pub attack: f32,
    /// Blend toward a falling target (0..1, lower = longer tail)
    pub release: f32,
    /// Exponent applied to the raw level before smoothing
    pub curve: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: 0.08,
            release: 0.012,
            curve: 1.3,
        }
    }
}

impl EnvelopeConfig {
    pub fn bass() -> Self {
        Self {
            attack: 0.10,
            release: 0.012,
            curve: 1.4,
        }
    }

    pub fn mid() -> Self {
        Self {
            attack: 0.06,
            release: 0.010,
            curve: 1.2,
        }
    }

    pub fn high() -> Self {
        Self {
            attack: 0.12,
            release: 0.020,
            curve: 1.5,
        }
    }
}

/// Rising-edge detector tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransientConfig {
    /// Minimum frame-to-frame rise of the raw level
    pub threshold: f32,
    /// Raw level the current frame must reach
    pub floor: f32,
    /// Re-trigger lockout after a hit, in seconds
    pub cooldown_sec: f32,
    /// Rise that maps to full strength (1.0 = the largest possible rise)
    pub reference_delta: f32,
}

impl Default for TransientConfig {
    fn default() -> Self {
        Self {
            threshold: 0.12,
            floor: 0.2,
            cooldown_sec: 0.12,
            reference_delta: 1.0,
        }
    }
}

impl TransientConfig {
    pub fn bass() -> Self {
        Self::default()
    }

    pub fn mid() -> Self {
        Self {
            threshold: 0.15,
            floor: 0.25,
            cooldown_sec: 0.09,
            reference_delta: 1.0,
        }
    }

    pub fn high() -> Self {
        Self {
            threshold: 0.18,
            floor: 0.3,
            cooldown_sec: 0.06,
            reference_delta: 1.0,
        }
    }
}

/// Sustained-energy time constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyConfig {
    pub rise_tau_sec: f32,
    pub fall_tau_sec: f32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            rise_tau_sec: 2.0,
            fall_tau_sec: 4.0,
        }
    }
}

/// Rate law of one phase accumulator.
///
/// `target = idle_rate + bass_weight * bass^bass_curve + mid_weight * mid
///  + high_weight * high + sustained_weight * sustained`, smoothed with
/// `attack`/`release` and floored at `min_rate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseRateConfig {
    pub idle_rate: f32,
    pub bass_weight: f32,
    pub bass_curve: f32,
    pub mid_weight: f32,
    pub high_weight: f32,
    pub sustained_weight: f32,
    pub attack: f32,
    pub release: f32,
    pub min_rate: f32,
}

impl Default for PhaseRateConfig {
    fn default() -> Self {
        Self::rotation()
    }
}

impl PhaseRateConfig {
    /// Bass-dominated spin with a super-linear curve.
    pub fn rotation() -> Self {
        Self {
            idle_rate: 0.05,
            bass_weight: 0.6,
            bass_curve: 1.6,
            mid_weight: 0.15,
            high_weight: 0.05,
            sustained_weight: 0.2,
            attack: 0.08,
            release: 0.01,
            min_rate: 0.02,
        }
    }

    /// Color cycling mostly follows sustained energy.
    pub fn color() -> Self {
        Self {
            idle_rate: 0.02,
            bass_weight: 0.05,
            bass_curve: 1.0,
            mid_weight: 0.08,
            high_weight: 0.1,
            sustained_weight: 0.4,
            attack: 0.04,
            release: 0.006,
            min_rate: 0.01,
        }
    }

    pub fn ripple() -> Self {
        Self {
            idle_rate: 0.3,
            bass_weight: 1.2,
            bass_curve: 1.2,
            mid_weight: 0.2,
            high_weight: 0.0,
            sustained_weight: 0.3,
            attack: 0.1,
            release: 0.015,
            min_rate: 0.15,
        }
    }

    pub fn flow() -> Self {
        Self {
            idle_rate: 0.1,
            bass_weight: 0.2,
            bass_curve: 1.0,
            mid_weight: 0.5,
            high_weight: 0.3,
            sustained_weight: 0.35,
            attack: 0.06,
            release: 0.01,
            min_rate: 0.05,
        }
    }
}

/// Ripple pulses: spawned on bass transients, advected by the ripple phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleConfig {
    pub phase: PhaseRateConfig,
    /// Wavefront distance per unit of ripple phase
    pub propagation_speed: f32,
    /// Strength multiplier per reference frame
    pub decay_per_frame: f32,
    /// Pulses weaker than this are pruned
    pub min_strength: f32,
    /// Hard age cap in seconds
    pub max_age_sec: f32,
    /// Transients weaker than this do not spawn a pulse
    pub min_spawn_strength: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            phase: PhaseRateConfig::ripple(),
            propagation_speed: 1.5,
            decay_per_frame: 0.995,
            min_strength: 0.02,
            max_age_sec: 4.0,
            min_spawn_strength: 0.05,
        }
    }
}

/// Tilt impulses: damped oscillation `exp(-k t) cos(w t)` in a random direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltConfig {
    /// Offset amplitude at full transient strength
    pub magnitude: f32,
    /// Envelope decay `k` (1/s)
    pub decay_constant: f32,
    /// Oscillation `w` (rad/s)
    pub frequency: f32,
    /// Impulses whose envelope drops below this are pruned
    pub envelope_floor: f32,
    pub max_age_sec: f32,
    pub min_spawn_strength: f32,
    /// Which bands' transients spawn a tilt
    pub bands: [bool; 3],
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            magnitude: 0.25,
            decay_constant: 3.0,
            frequency: 9.0,
            envelope_floor: 0.01,
            max_age_sec: 3.0,
            min_spawn_strength: 0.05,
            bands: [true, true, false],
        }
    }
}

/// Complete tuning of one visual variant.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantProfile {
    pub envelopes: [EnvelopeConfig; 3],
    pub transients: [TransientConfig; 3],
    pub energy: EnergyConfig,
    pub rotation: PhaseRateConfig,
    pub color: PhaseRateConfig,
    pub flow: Option<PhaseRateConfig>,
    pub ripple: Option<RippleConfig>,
    pub tilt: Option<TiltConfig>,
}

impl Default for VariantProfile {
    fn default() -> Self {
        Self {
            envelopes: [
                EnvelopeConfig::bass(),
                EnvelopeConfig::mid(),
                EnvelopeConfig::high(),
            ],
            transients: [
                TransientConfig::bass(),
                TransientConfig::mid(),
                TransientConfig::high(),
            ],
            energy: EnergyConfig::default(),
            rotation: PhaseRateConfig::rotation(),
            color: PhaseRateConfig::color(),
            flow: None,
            ripple: None,
            tilt: None,
        }
    }
}

impl VariantProfile {
    pub fn for_variant(variant: Variant) -> Self {
        let base = Self::default();
        match variant {
            // Orbiting disk: bass ripples across the plane, hits tip it.
            Variant::Disk => Self {
                ripple: Some(RippleConfig::default()),
                tilt: Some(TiltConfig::default()),
                ..base
            },
            // Galaxy: slow heavy spin, arms stream along the flow phase.
            Variant::Spiral => Self {
                rotation: PhaseRateConfig {
                    idle_rate: 0.03,
                    bass_weight: 0.35,
                    release: 0.006,
                    ..PhaseRateConfig::rotation()
                },
                flow: Some(PhaseRateConfig::flow()),
                tilt: Some(TiltConfig {
                    magnitude: 0.15,
                    decay_constant: 2.0,
                    frequency: 6.0,
                    ..TiltConfig::default()
                }),
                ..base
            },
            // Faceted sphere: snappy, high band also kicks the tilt.
            Variant::Sphere => Self {
                rotation: PhaseRateConfig {
                    bass_weight: 0.8,
                    attack: 0.12,
                    ..PhaseRateConfig::rotation()
                },
                ripple: Some(RippleConfig {
                    propagation_speed: 1.0,
                    ..RippleConfig::default()
                }),
                tilt: Some(TiltConfig {
                    bands: [true, true, true],
                    ..TiltConfig::default()
                }),
                ..base
            },
            // Forward tunnel: flow is the travel speed, rings pulse outward.
            Variant::Tunnel => Self {
                flow: Some(PhaseRateConfig {
                    idle_rate: 0.4,
                    bass_weight: 1.0,
                    bass_curve: 1.4,
                    min_rate: 0.2,
                    ..PhaseRateConfig::flow()
                }),
                ripple: Some(RippleConfig {
                    propagation_speed: 2.5,
                    decay_per_frame: 0.99,
                    ..RippleConfig::default()
                }),
                ..base
            },
        }
    }
}
