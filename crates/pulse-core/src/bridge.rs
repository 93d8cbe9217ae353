//! Packing of a [`MotionState`] into the uniform block a render pass reads.
//!
//! Nothing here changes state: `snapshot` is a field-by-field read.

use bytemuck::Zeroable;

use crate::constants::{PIXEL_RATIO_MAX, PIXEL_RATIO_MIN, RIPPLE_UNIFORM_SLOTS};
use crate::motion::MotionState;

const RIPPLE_ROWS: usize = RIPPLE_UNIFORM_SLOTS / 4;

/// Uniform block, std140-compatible (every row is one vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub time: f32,
    pub bass: f32,
    pub mid: f32,
    pub high: f32,

    pub sustained: f32,
    pub rotation: f32,
    pub color_phase: f32,
    pub ripple_phase: f32,

    pub flow_phase: f32,
    pub pixel_scale: f32,
    pub density_scale: f32,
    pub ripple_count: u32,

    pub tilt: [f32; 2],
    pub ripple_speed: f32,
    pub frame: u32,

    /// bass, mid, high, unused
    pub hits: [f32; 4],

    /// Origin phase per ripple slot; slots at or past `ripple_count` are zero
    pub ripple_origins: [[f32; 4]; RIPPLE_ROWS],
    pub ripple_strengths: [[f32; 4]; RIPPLE_ROWS],
}

impl FrameUniforms {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn ripple_origin(&self, slot: usize) -> f32 {
        self.ripple_origins[slot / 4][slot % 4]
    }

    pub fn ripple_strength(&self, slot: usize) -> f32 {
        self.ripple_strengths[slot / 4][slot % 4]
    }
}

/// Output-surface scale the host supplies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderScale {
    pub pixel_ratio: f32,
}

impl Default for RenderScale {
    fn default() -> Self {
        Self { pixel_ratio: 1.0 }
    }
}

impl RenderScale {
    pub fn new(pixel_ratio: f32) -> Self {
        Self { pixel_ratio }.sanitized()
    }

    pub fn sanitized(self) -> Self {
        let pixel_ratio = if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio.clamp(PIXEL_RATIO_MIN, PIXEL_RATIO_MAX)
        } else {
            1.0
        };
        Self { pixel_ratio }
    }
}

/// Read `state` into a uniform block.
pub fn snapshot(state: &MotionState, scale: RenderScale, density_scale: f32) -> FrameUniforms {
    let mut u = FrameUniforms::zeroed();
    u.time = state.time() as f32;
    u.bass = state.bass();
    u.mid = state.mid();
    u.high = state.high();

    u.sustained = state.sustained();
    u.rotation = state.rotation();
    u.color_phase = state.color_phase();
    u.ripple_phase = state.ripple_phase();

    u.flow_phase = state.flow_phase();
    u.pixel_scale = scale.sanitized().pixel_ratio;
    u.density_scale = density_scale;

    let ripples = state.impulses().ripples();
    let count = ripples.len().min(RIPPLE_UNIFORM_SLOTS);
    u.ripple_count = count as u32;
    for (slot, pulse) in ripples.iter().take(count).enumerate() {
        u.ripple_origins[slot / 4][slot % 4] = pulse.origin_phase;
        u.ripple_strengths[slot / 4][slot % 4] = pulse.strength;
    }

    u.tilt = state.tilt_offset().to_array();
    u.ripple_speed = state
        .impulses()
        .ripple_config()
        .map_or(0.0, |c| c.propagation_speed);
    u.frame = state.frames();

    let hits = state.hits();
    u.hits = [hits[0], hits[1], hits[2], 0.0];
    u
}

/// Where a frame's uniforms go: a GPU buffer, a capture, a test harness.
pub trait UniformSink {
    fn write_uniforms(&mut self, uniforms: &FrameUniforms);
}

/// Hand `uniforms` to `sink`. A target that is not ready yet skips the frame.
pub fn deliver(uniforms: &FrameUniforms, sink: Option<&mut dyn UniformSink>) -> bool {
    match sink {
        Some(s) => {
            s.write_uniforms(uniforms);
            true
        }
        None => false,
    }
}
