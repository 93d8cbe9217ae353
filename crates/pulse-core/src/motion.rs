//! Per-visualizer motion state and its ordered per-frame update.

use glam::Vec2;

use crate::audio::{sanitize_dt, AudioFrame, Band};
use crate::config::VariantProfile;
use crate::constants::HIT_DECAY_PER_SEC;
use crate::energy::{instant_energy, EnergyAccumulator};
use crate::envelope::EnvelopeFilter;
use crate::field::Variant;
use crate::impulse::{ImpulseDecaySystem, ImpulseKind};
use crate::phase::{PhaseAccumulator, RateInputs};
use crate::transient::{TransientDetector, TransientEvent};

/// Lifecycle of a [`MotionState`]. Dropping the state is the terminal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, nothing integrated yet
    Idle,
    /// Receiving one update per rendered frame
    Active,
    /// Hidden; updates are ignored and every value is frozen
    Suspended,
}

pub struct MotionState {
    profile: VariantProfile,
    lifecycle: Lifecycle,
    envelopes: [EnvelopeFilter; 3],
    detectors: [TransientDetector; 3],
    energy: EnergyAccumulator,
    rotation: PhaseAccumulator,
    color: PhaseAccumulator,
    ripple_phase: Option<PhaseAccumulator>,
    flow: Option<PhaseAccumulator>,
    impulses: ImpulseDecaySystem,
    hits: [f32; 3],
    last_transients: Vec<TransientEvent>,
    time: f64,
    frames: u32,
    resync: bool,
}

impl MotionState {
    pub fn new(variant: Variant, seed: u64) -> Self {
        Self::with_profile(VariantProfile::for_variant(variant), seed)
    }

    pub fn with_profile(profile: VariantProfile, seed: u64) -> Self {
        let envelopes = [
            EnvelopeFilter::new(profile.envelopes[0]),
            EnvelopeFilter::new(profile.envelopes[1]),
            EnvelopeFilter::new(profile.envelopes[2]),
        ];
        let detectors = [
            TransientDetector::new(Band::Bass, profile.transients[0]),
            TransientDetector::new(Band::Mid, profile.transients[1]),
            TransientDetector::new(Band::High, profile.transients[2]),
        ];
        Self {
            lifecycle: Lifecycle::Idle,
            envelopes,
            detectors,
            energy: EnergyAccumulator::new(profile.energy),
            rotation: PhaseAccumulator::new(profile.rotation),
            color: PhaseAccumulator::new(profile.color),
            ripple_phase: profile.ripple.map(|r| PhaseAccumulator::new(r.phase)),
            flow: profile.flow.map(PhaseAccumulator::new),
            impulses: ImpulseDecaySystem::new(profile.ripple, profile.tilt, seed),
            hits: [0.0; 3],
            last_transients: Vec::with_capacity(3),
            time: 0.0,
            frames: 0,
            resync: false,
            profile,
        }
    }

    pub fn profile(&self) -> &VariantProfile {
        &self.profile
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Freeze. Further updates are no-ops until [`MotionState::resume`].
    pub fn suspend(&mut self) {
        if self.lifecycle == Lifecycle::Active {
            self.lifecycle = Lifecycle::Suspended;
        }
    }

    /// Continue from the frozen values. The first frame after resuming only
    /// re-primes the transient detectors, so a level jump across the pause
    /// does not read as a hit.
    pub fn resume(&mut self) {
        if self.lifecycle == Lifecycle::Suspended {
            self.lifecycle = Lifecycle::Active;
            self.resync = true;
        }
    }

    /// Run one frame. Returns `false` (and changes nothing) while suspended.
    pub fn update(&mut self, frame: AudioFrame, dt_sec: f32) -> bool {
        match self.lifecycle {
            Lifecycle::Suspended => return false,
            Lifecycle::Idle => self.lifecycle = Lifecycle::Active,
            Lifecycle::Active => {}
        }
        let dt = sanitize_dt(dt_sec);
        let raw = frame.sanitized();

        // Envelopes
        let mut smoothed = [0.0f32; 3];
        for band in Band::ALL {
            let i = band.index();
            smoothed[i] = self.envelopes[i].update(raw.band(band), dt);
        }

        // Transients and sustained energy
        self.last_transients.clear();
        for band in Band::ALL {
            let i = band.index();
            if self.resync {
                self.detectors[i].resync(raw.band(band), dt);
            } else if let Some(ev) = self.detectors[i].update(raw.band(band), dt) {
                log::trace!("[motion] transient {:?} strength={:.2}", ev.band, ev.strength);
                self.last_transients.push(ev);
            }
        }
        self.resync = false;
        let sustained = self
            .energy
            .update(instant_energy(smoothed[0], smoothed[1], smoothed[2]), dt);

        // Phases
        let inputs = RateInputs {
            bass: smoothed[0],
            mid: smoothed[1],
            high: smoothed[2],
            sustained,
        };
        self.rotation.advance(dt, inputs);
        self.color.advance(dt, inputs);
        if let Some(p) = self.ripple_phase.as_mut() {
            p.advance(dt, inputs);
        }
        if let Some(p) = self.flow.as_mut() {
            p.advance(dt, inputs);
        }

        // Impulses: age the existing ones, then add this frame's.
        self.impulses.tick(dt);
        let ripple_origin = self.ripple_phase();
        let tilt_bands = self.profile.tilt.map(|t| t.bands).unwrap_or([false; 3]);
        for ev in &self.last_transients {
            if ev.band == Band::Bass {
                self.impulses
                    .spawn(ImpulseKind::Ripple, ev.strength, ripple_origin);
            }
            if tilt_bands[ev.band.index()] {
                self.impulses.spawn(ImpulseKind::Tilt, ev.strength, 0.0);
            }
        }

        // Hit envelopes
        let hit_decay = (-HIT_DECAY_PER_SEC * dt).exp();
        for h in self.hits.iter_mut() {
            *h *= hit_decay;
        }
        for ev in &self.last_transients {
            let h = &mut self.hits[ev.band.index()];
            *h = h.max(ev.strength);
        }

        self.time += f64::from(dt);
        self.frames = self.frames.wrapping_add(1);
        true
    }

    pub fn bass(&self) -> f32 {
        self.envelopes[0].value()
    }

    pub fn mid(&self) -> f32 {
        self.envelopes[1].value()
    }

    pub fn high(&self) -> f32 {
        self.envelopes[2].value()
    }

    pub fn sustained(&self) -> f32 {
        self.energy.value()
    }

    pub fn rotation(&self) -> f32 {
        self.rotation.phase_f32()
    }

    pub fn color_phase(&self) -> f32 {
        self.color.phase_f32()
    }

    /// 0 when the variant has no ripples.
    pub fn ripple_phase(&self) -> f32 {
        self.ripple_phase
            .as_ref()
            .map_or(0.0, PhaseAccumulator::phase_f32)
    }

    /// 0 when the variant has no flow.
    pub fn flow_phase(&self) -> f32 {
        self.flow.as_ref().map_or(0.0, PhaseAccumulator::phase_f32)
    }

    pub fn impulses(&self) -> &ImpulseDecaySystem {
        &self.impulses
    }

    pub fn tilt_offset(&self) -> Vec2 {
        self.impulses.tilt_offset()
    }

    /// Per-band flash level: transient strength decaying over time.
    pub fn hits(&self) -> [f32; 3] {
        self.hits
    }

    /// Transients detected by the most recent update.
    pub fn last_transients(&self) -> &[TransientEvent] {
        &self.last_transients
    }

    /// Active seconds integrated so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }
}
