//! Visualizer instances and the host-side stage that owns the active one.

use std::sync::Arc;

use crate::audio::AudioFrame;
use crate::bridge::{self, FrameUniforms, RenderScale, UniformSink};
use crate::error::FieldError;
use crate::field::{FieldCache, ParticleField, QualityTier, Variant};
use crate::motion::{Lifecycle, MotionState};

/// One live visualization: its motion state plus the field buffer it draws.
pub struct Visualizer {
    variant: Variant,
    field: Arc<ParticleField>,
    motion: MotionState,
    scale: RenderScale,
}

impl Visualizer {
    pub fn new(field: Arc<ParticleField>, scale: RenderScale) -> Self {
        let variant = field.variant();
        let motion = MotionState::new(variant, field.seed());
        Self::with_motion(field, motion, scale)
    }

    /// Use a prepared (possibly retuned) motion state.
    pub fn with_motion(field: Arc<ParticleField>, motion: MotionState, scale: RenderScale) -> Self {
        Self {
            variant: field.variant(),
            field,
            motion,
            scale: scale.sanitized(),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn tier(&self) -> QualityTier {
        self.field.tier()
    }

    pub fn field(&self) -> &Arc<ParticleField> {
        &self.field
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.motion.lifecycle()
    }

    pub fn set_scale(&mut self, scale: RenderScale) {
        self.scale = scale.sanitized();
    }

    /// Bind another tier's buffer for the same variant. Motion carries on.
    ///
    /// A field for a different variant is ignored and `false` is returned.
    pub fn set_field(&mut self, field: Arc<ParticleField>) -> bool {
        if field.variant() != self.variant {
            return false;
        }
        self.field = field;
        true
    }

    pub fn suspend(&mut self) {
        self.motion.suspend();
    }

    pub fn resume(&mut self) {
        self.motion.resume();
    }

    /// Current uniforms without advancing.
    pub fn uniforms(&self) -> FrameUniforms {
        let density = self.variant.density_scale(self.field.tier());
        bridge::snapshot(&self.motion, self.scale, density)
    }

    /// Run one frame and return its uniforms; `None` while suspended.
    pub fn advance(&mut self, frame: AudioFrame, dt_sec: f32) -> Option<FrameUniforms> {
        if !self.motion.update(frame, dt_sec) {
            return None;
        }
        Some(self.uniforms())
    }
}

/// Owns the field cache and at most one active visualizer.
pub struct Stage {
    cache: FieldCache,
    active: Option<Visualizer>,
    tier: QualityTier,
    seed: u64,
    scale: RenderScale,
}

impl Stage {
    pub fn new(tier: QualityTier, seed: u64, scale: RenderScale) -> Self {
        Self {
            cache: FieldCache::new(),
            active: None,
            tier,
            seed,
            scale: scale.sanitized(),
        }
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn active(&self) -> Option<&Visualizer> {
        self.active.as_ref()
    }

    pub fn cache(&self) -> &FieldCache {
        &self.cache
    }

    /// Discard the current visualizer and start a fresh, idle one.
    pub fn switch_to(&mut self, variant: Variant) -> Result<(), FieldError> {
        let field = self.cache.get_or_generate(variant, self.tier, self.seed)?;
        log::info!("[stage] switched to {variant} ({} particles)", field.len());
        self.active = Some(Visualizer::new(field, self.scale));
        Ok(())
    }

    /// Swap the bound particle buffer; the active motion state is kept.
    pub fn set_tier(&mut self, tier: QualityTier) -> Result<(), FieldError> {
        if tier == self.tier {
            return Ok(());
        }
        if let Some(vis) = self.active.as_mut() {
            let field = self.cache.get_or_generate(vis.variant(), tier, self.seed)?;
            vis.set_field(field);
        }
        log::info!("[stage] quality tier {} -> {}", self.tier, tier);
        self.tier = tier;
        Ok(())
    }

    pub fn set_scale(&mut self, scale: RenderScale) {
        self.scale = scale.sanitized();
        if let Some(vis) = self.active.as_mut() {
            vis.set_scale(self.scale);
        }
    }

    pub fn suspend(&mut self) {
        if let Some(vis) = self.active.as_mut() {
            vis.suspend();
            log::info!("[stage] suspended {}", vis.variant());
        }
    }

    pub fn resume(&mut self) {
        if let Some(vis) = self.active.as_mut() {
            vis.resume();
            log::info!("[stage] resumed {}", vis.variant());
        }
    }

    /// Advance the active visualizer and hand its uniforms to `sink`.
    ///
    /// Returns whether uniforms were delivered. No visualizer, a suspended
    /// one, or a sink that is not ready all skip the frame.
    pub fn frame(
        &mut self,
        audio: AudioFrame,
        dt_sec: f32,
        sink: Option<&mut dyn UniformSink>,
    ) -> bool {
        let Some(vis) = self.active.as_mut() else {
            return false;
        };
        match vis.advance(audio, dt_sec) {
            Some(uniforms) => bridge::deliver(&uniforms, sink),
            None => false,
        }
    }
}
