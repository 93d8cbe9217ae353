//! Bounded pools of discrete, independently aging events.
//!
//! Ripple pulses ride the ripple phase outward and fade multiplicatively.
//! Tilt impulses knock the field in a random direction and settle through a
//! damped oscillation. Both pools are fixed-size and evict the oldest entry
//! when full, so the newest event is never lost.

use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;

use crate::audio::{sanitize_dt, sanitize_level};
use crate::config::{RippleConfig, TiltConfig};
use crate::constants::{REFERENCE_FPS, RIPPLE_CAPACITY, TILT_CAPACITY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpulseKind {
    Ripple,
    Tilt,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RipplePulse {
    /// Ripple phase at spawn time
    pub origin_phase: f32,
    /// 0..1, decays every tick
    pub strength: f32,
    pub age: f32,
}

impl RipplePulse {
    /// Distance the wavefront has travelled at `current_phase`.
    #[inline]
    pub fn wavefront(&self, current_phase: f32, propagation_speed: f32) -> f32 {
        (current_phase - self.origin_phase).max(0.0) * propagation_speed
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltImpulse {
    pub axis_offset_x: f32,
    pub axis_offset_z: f32,
    pub age: f32,
    /// Envelope decay `k` in `exp(-k t) cos(w t)`
    pub decay_constant: f32,
    /// Oscillation `w` in rad/s
    pub frequency: f32,
}

impl TiltImpulse {
    /// Decay part of the envelope, used for pruning.
    #[inline]
    pub fn decay(&self) -> f32 {
        (-self.decay_constant * self.age).exp()
    }

    /// Signed envelope: overshoots once, then settles.
    #[inline]
    pub fn envelope(&self) -> f32 {
        self.decay() * (self.frequency * self.age).cos()
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.axis_offset_x, self.axis_offset_z) * self.envelope()
    }
}

/// Push `item` into a fixed-capacity pool, evicting the oldest (front) entry
/// when full. Returns whether something was evicted.
fn push_evicting<A: smallvec::Array>(pool: &mut SmallVec<A>, capacity: usize, item: A::Item) -> bool {
    if capacity == 0 {
        return false;
    }
    let mut evicted = false;
    while pool.len() >= capacity {
        pool.remove(0);
        evicted = true;
    }
    pool.push(item);
    evicted
}

pub struct ImpulseDecaySystem {
    ripple: Option<RippleConfig>,
    tilt: Option<TiltConfig>,
    ripples: SmallVec<[RipplePulse; RIPPLE_CAPACITY]>,
    tilts: SmallVec<[TiltImpulse; TILT_CAPACITY]>,
    rng: StdRng,
}

impl ImpulseDecaySystem {
    /// `None` disables that impulse kind for the owning variant.
    pub fn new(ripple: Option<RippleConfig>, tilt: Option<TiltConfig>, seed: u64) -> Self {
        // Decorrelate from the particle generator, which consumes the raw seed.
        let mix = seed ^ 0x9E37_79B9_7F4A_7C15;
        Self {
            ripple,
            tilt,
            ripples: SmallVec::new(),
            tilts: SmallVec::new(),
            rng: StdRng::seed_from_u64(mix),
        }
    }

    pub fn ripple_config(&self) -> Option<&RippleConfig> {
        self.ripple.as_ref()
    }

    /// Live ripples, oldest first.
    pub fn ripples(&self) -> &[RipplePulse] {
        &self.ripples
    }

    /// Live tilts, oldest first.
    pub fn tilts(&self) -> &[TiltImpulse] {
        &self.tilts
    }

    /// Sum of all live tilt offsets on the (x, z) axes.
    pub fn tilt_offset(&self) -> Vec2 {
        self.tilts.iter().map(TiltImpulse::offset).sum()
    }

    /// Spawn one impulse. Returns `false` when the kind is disabled or the
    /// strength is too weak (or not a number) to be worth an event.
    pub fn spawn(&mut self, kind: ImpulseKind, strength: f32, origin_phase: f32) -> bool {
        if !strength.is_finite() {
            return false;
        }
        let strength = sanitize_level(strength);
        match kind {
            ImpulseKind::Ripple => {
                let Some(cfg) = self.ripple else {
                    return false;
                };
                if strength < cfg.min_spawn_strength {
                    return false;
                }
                let origin_phase = if origin_phase.is_finite() {
                    origin_phase.max(0.0)
                } else {
                    0.0
                };
                let evicted = push_evicting(
                    &mut self.ripples,
                    RIPPLE_CAPACITY,
                    RipplePulse {
                        origin_phase,
                        strength,
                        age: 0.0,
                    },
                );
                if evicted {
                    log::trace!("[motion] ripple pool full, evicted oldest");
                }
                log::trace!("[motion] ripple spawned origin={origin_phase:.3} strength={strength:.2}");
                true
            }
            ImpulseKind::Tilt => {
                let Some(cfg) = self.tilt else {
                    return false;
                };
                if strength < cfg.min_spawn_strength {
                    return false;
                }
                let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                let axis = Vec2::from_angle(angle) * (strength * cfg.magnitude);
                let evicted = push_evicting(
                    &mut self.tilts,
                    TILT_CAPACITY,
                    TiltImpulse {
                        axis_offset_x: axis.x,
                        axis_offset_z: axis.y,
                        age: 0.0,
                        decay_constant: cfg.decay_constant,
                        frequency: cfg.frequency,
                    },
                );
                if evicted {
                    log::trace!("[motion] tilt pool full, evicted oldest");
                }
                log::trace!("[motion] tilt spawned axis=({:+.3},{:+.3})", axis.x, axis.y);
                true
            }
        }
    }

    /// Age every impulse, decay ripple strength and prune what has faded.
    pub fn tick(&mut self, dt_sec: f32) {
        let dt = sanitize_dt(dt_sec);
        if let Some(cfg) = self.ripple {
            let factor = cfg.decay_per_frame.clamp(0.0, 1.0).powf(dt * REFERENCE_FPS);
            for pulse in self.ripples.iter_mut() {
                pulse.age += dt;
                pulse.strength *= factor;
            }
            self.ripples
                .retain(|p| p.strength >= cfg.min_strength && p.age <= cfg.max_age_sec);
        }
        if let Some(cfg) = self.tilt {
            for tilt in self.tilts.iter_mut() {
                tilt.age += dt;
            }
            self.tilts
                .retain(|t| t.decay() >= cfg.envelope_floor && t.age <= cfg.max_age_sec);
        }
    }
}
