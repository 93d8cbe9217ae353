// Shared engine tuning constants. Per-variant feel lives in `config`; these
// are the fixed limits every variant shares.

// Frame timing
pub const REFERENCE_FPS: f32 = 60.0; // per-frame rates are expressed at this frame rate
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // a stalled host never advances more than this per update

// Instantaneous energy mix (bass weighted highest), sums to 1
pub const BAND_WEIGHTS: [f32; 3] = [0.5, 0.3, 0.2];

// Impulse pools
pub const RIPPLE_CAPACITY: usize = 6; // live ripple pulses per instance
pub const TILT_CAPACITY: usize = 4; // live tilt impulses per instance
pub const RIPPLE_UNIFORM_SLOTS: usize = 8; // vec4-packed slots in the uniform block

// Hit envelopes (per-band flash after a transient)
pub const HIT_DECAY_PER_SEC: f32 = 6.0;

// Particle generator (Park-Miller minimal standard LCG)
pub const LCG_MODULUS: u64 = 2_147_483_647; // 2^31 - 1
pub const LCG_MULTIPLIER: u64 = 16_807;

// Render scale limits
pub const PIXEL_RATIO_MIN: f32 = 0.5;
pub const PIXEL_RATIO_MAX: f32 = 4.0;

const _: () = assert!(RIPPLE_CAPACITY <= RIPPLE_UNIFORM_SLOTS);
const _: () = assert!(RIPPLE_UNIFORM_SLOTS % 4 == 0);
