//! Deterministic particle field generation.
//!
//! A field is a pure function of `(variant, tier, seed)`: every attribute is
//! drawn from one Park-Miller LCG sequence, so the same inputs always produce
//! the same bytes. Fields are immutable after generation and shared by `Arc`.

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use fnv::FnvHashMap;
use glam::Vec3;

use crate::constants::{LCG_MODULUS, LCG_MULTIPLIER};
use crate::error::FieldError;

/// Motion personality of a visualizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Center-weighted orbiting disk
    Disk,
    /// Multi-arm spiral galaxy
    Spiral,
    /// Faceted sphere shell
    Sphere,
    /// Forward-travelling tunnel
    Tunnel,
}

impl Variant {
    pub const ALL: [Variant; 4] = [Variant::Disk, Variant::Spiral, Variant::Sphere, Variant::Tunnel];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Disk => "disk",
            Variant::Spiral => "spiral",
            Variant::Sphere => "sphere",
            Variant::Tunnel => "tunnel",
        }
    }

    pub fn particle_count(self, tier: QualityTier) -> usize {
        match (self, tier) {
            (Variant::Disk, QualityTier::High) => 48_000,
            (Variant::Disk, QualityTier::Low) => 16_000,
            (Variant::Spiral, QualityTier::High) => 64_000,
            (Variant::Spiral, QualityTier::Low) => 20_000,
            (Variant::Sphere, QualityTier::High) => 36_000,
            (Variant::Sphere, QualityTier::Low) => 12_000,
            (Variant::Tunnel, QualityTier::High) => 56_000,
            (Variant::Tunnel, QualityTier::Low) => 18_000,
        }
    }

    /// Point-size compensation so a sparse tier covers a similar area.
    pub fn density_scale(self, tier: QualityTier) -> f32 {
        let full = self.particle_count(QualityTier::High) as f32;
        (full / self.particle_count(tier) as f32).sqrt()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disk" => Ok(Variant::Disk),
            "spiral" | "galaxy" => Ok(Variant::Spiral),
            "sphere" => Ok(Variant::Sphere),
            "tunnel" => Ok(Variant::Tunnel),
            _ => Err(FieldError::UnknownVariant(s.to_string())),
        }
    }
}

/// Particle density tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum QualityTier {
    #[default]
    High,
    Low,
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityTier::High => "high",
            QualityTier::Low => "low",
        })
    }
}

impl FromStr for QualityTier {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(QualityTier::High),
            "low" => Ok(QualityTier::Low),
            _ => Err(FieldError::UnknownTier(s.to_string())),
        }
    }
}

/// Park-Miller minimal standard generator: `state = state * 16807 mod (2^31 - 1)`.
#[derive(Clone, Debug)]
pub struct FieldRng {
    state: u64,
}

impl FieldRng {
    /// Seeds are reduced modulo 2^31 - 1; a zero residue would lock the
    /// sequence at zero and is rejected.
    pub fn new(seed: u64) -> Result<Self, FieldError> {
        let state = seed % LCG_MODULUS;
        if state == 0 {
            return Err(FieldError::DegenerateSeed(seed));
        }
        Ok(Self { state })
    }

    /// Next raw state in `1..LCG_MODULUS`.
    #[inline]
    pub fn next_state(&mut self) -> u64 {
        self.state = self.state * LCG_MULTIPLIER % LCG_MODULUS;
        self.state
    }

    /// Uniform in \[0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        let v = (self.next_state() - 1) as f64 / (LCG_MODULUS - 1) as f64;
        (v as f32).min(1.0 - f32::EPSILON)
    }

    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Uniform in \[-1, 1).
    #[inline]
    pub fn signed(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }

    /// Cheap bell-shaped value in about \[-1, 1\] (mean of three uniforms).
    #[inline]
    pub fn bell(&mut self) -> f32 {
        (self.signed() + self.signed() + self.signed()) / 3.0
    }
}

/// Interleaved per-particle record for vertex-buffer upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub size: f32,
    pub random: [f32; 3],
    pub region: f32,
}

/// Immutable attribute buffers for one `(variant, tier, seed)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    variant: Variant,
    tier: QualityTier,
    seed: u64,
    positions: Vec<f32>,
    sizes: Vec<f32>,
    regions: Vec<f32>,
    randoms: Vec<f32>,
}

impl ParticleField {
    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// xyz per particle.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Color/region index per particle, stored as float for the vertex stage.
    pub fn regions(&self) -> &[f32] {
        &self.regions
    }

    /// Three jitter randoms per particle.
    pub fn randoms(&self) -> &[f32] {
        &self.randoms
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// All four attribute arrays concatenated as bytes, in declaration order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            4 * (self.positions.len() + self.sizes.len() + self.regions.len() + self.randoms.len()),
        );
        out.extend_from_slice(bytemuck::cast_slice(&self.positions));
        out.extend_from_slice(bytemuck::cast_slice(&self.sizes));
        out.extend_from_slice(bytemuck::cast_slice(&self.regions));
        out.extend_from_slice(bytemuck::cast_slice(&self.randoms));
        out
    }

    pub fn vertices(&self) -> Vec<ParticleVertex> {
        (0..self.len())
            .map(|i| ParticleVertex {
                position: [
                    self.positions[i * 3],
                    self.positions[i * 3 + 1],
                    self.positions[i * 3 + 2],
                ],
                size: self.sizes[i],
                random: [
                    self.randoms[i * 3],
                    self.randoms[i * 3 + 1],
                    self.randoms[i * 3 + 2],
                ],
                region: self.regions[i],
            })
            .collect()
    }
}

// Shape parameters
const DISK_RADIUS: f32 = 3.0;
const DISK_THICKNESS: f32 = 0.12;
const DISK_RINGS: f32 = 4.0;

const SPIRAL_RADIUS: f32 = 4.0;
const SPIRAL_ARMS: usize = 4;
const SPIRAL_TWIST: f32 = 1.6; // radians of wind per unit radius
const SPIRAL_ARM_SPREAD: f32 = 0.35;
const SPIRAL_BULGE_FRACTION: f32 = 0.12;
const SPIRAL_BULGE_RADIUS: f32 = 0.6;

const SPHERE_RADIUS: f32 = 2.2;
const SPHERE_SHELL_INNER: f32 = 0.82; // inner radius as a fraction of the outer
const SPHERE_FACET_BANDS: usize = 6; // latitude bands
const SPHERE_FACET_SECTORS: usize = 10; // longitude sectors

const TUNNEL_RADIUS: f32 = 1.8;
const TUNNEL_DEPTH: f32 = 40.0;
const TUNNEL_WALL_JITTER: f32 = 0.25;
const TUNNEL_SEGMENTS: f32 = 16.0;

struct Particle {
    position: Vec3,
    size: f32,
    region: f32,
}

fn disk_particle(rng: &mut FieldRng) -> Particle {
    let t = rng.next_f32();
    let r = DISK_RADIUS * t * t;
    let angle = rng.range(0.0, TAU);
    let taper = 1.0 - r / DISK_RADIUS;
    let y = rng.bell() * DISK_THICKNESS * (0.25 + taper);
    let size = 0.6 + 1.4 * taper * rng.range(0.5, 1.0);
    let region = (t * DISK_RINGS).floor().min(DISK_RINGS - 1.0);
    Particle {
        position: Vec3::new(r * angle.cos(), y, r * angle.sin()),
        size,
        region,
    }
}

fn spiral_particle(rng: &mut FieldRng, index: usize) -> Particle {
    if rng.next_f32() < SPIRAL_BULGE_FRACTION {
        // Inverse-transform sample of a small dense ball.
        let r = SPIRAL_BULGE_RADIUS * rng.next_f32().powf(0.5);
        let cos_t = rng.signed();
        let sin_t = (1.0 - cos_t * cos_t).max(0.0).sqrt();
        let phi = rng.range(0.0, TAU);
        return Particle {
            position: Vec3::new(r * sin_t * phi.cos(), 0.5 * r * cos_t, r * sin_t * phi.sin()),
            size: rng.range(1.0, 1.8),
            region: SPIRAL_ARMS as f32,
        };
    }
    let arm = index % SPIRAL_ARMS;
    let base = arm as f32 * TAU / SPIRAL_ARMS as f32;
    let r = SPIRAL_BULGE_RADIUS + (SPIRAL_RADIUS - SPIRAL_BULGE_RADIUS) * rng.next_f32().powf(1.3);
    let scatter = rng.bell() * SPIRAL_ARM_SPREAD * (0.4 + r / SPIRAL_RADIUS);
    let angle = base + r * SPIRAL_TWIST + scatter;
    let y = rng.bell() * 0.08 * (1.0 + 0.5 * (1.0 - r / SPIRAL_RADIUS));
    Particle {
        position: Vec3::new(r * angle.cos(), y, r * angle.sin()),
        size: rng.range(0.5, 1.3),
        region: arm as f32,
    }
}

fn sphere_particle(rng: &mut FieldRng) -> Particle {
    // Uniform direction: cos(theta) uniform in [-1, 1], phi uniform.
    let cos_t = rng.signed();
    let phi = rng.range(0.0, TAU);
    // Uniform volume within the shell: invert the r^3 CDF.
    let inner3 = SPHERE_SHELL_INNER.powi(3);
    let w = rng.next_f32();
    let r = SPHERE_RADIUS * (inner3 + (1.0 - inner3) * w).cbrt();
    let sin_t = (1.0 - cos_t * cos_t).max(0.0).sqrt();
    let theta = cos_t.clamp(-1.0, 1.0).acos();
    let band = ((theta / PI) * SPHERE_FACET_BANDS as f32).floor() as usize;
    let sector = ((phi / TAU) * SPHERE_FACET_SECTORS as f32).floor() as usize;
    let facet = band.min(SPHERE_FACET_BANDS - 1) * SPHERE_FACET_SECTORS
        + sector.min(SPHERE_FACET_SECTORS - 1);
    Particle {
        position: Vec3::new(r * sin_t * phi.cos(), r * cos_t, r * sin_t * phi.sin()),
        size: rng.range(0.7, 1.4),
        region: facet as f32,
    }
}

fn tunnel_particle(rng: &mut FieldRng) -> Particle {
    let depth = rng.next_f32();
    let angle = rng.range(0.0, TAU);
    let r = TUNNEL_RADIUS + rng.bell() * TUNNEL_WALL_JITTER;
    Particle {
        position: Vec3::new(r * angle.cos(), r * angle.sin(), -depth * TUNNEL_DEPTH),
        size: rng.range(0.6, 1.2) * (1.0 + 0.5 * depth),
        region: (depth * TUNNEL_SEGMENTS).floor().min(TUNNEL_SEGMENTS - 1.0),
    }
}

/// Build the field for `(variant, tier, seed)`.
///
/// Fails only for a degenerate seed; no partial field is ever returned.
pub fn generate(variant: Variant, tier: QualityTier, seed: u64) -> Result<ParticleField, FieldError> {
    let mut rng = FieldRng::new(seed)?;
    let count = variant.particle_count(tier);
    let mut positions = Vec::with_capacity(count * 3);
    let mut sizes = Vec::with_capacity(count);
    let mut regions = Vec::with_capacity(count);
    let mut randoms = Vec::with_capacity(count * 3);

    for i in 0..count {
        let p = match variant {
            Variant::Disk => disk_particle(&mut rng),
            Variant::Spiral => spiral_particle(&mut rng, i),
            Variant::Sphere => sphere_particle(&mut rng),
            Variant::Tunnel => tunnel_particle(&mut rng),
        };
        positions.extend_from_slice(&p.position.to_array());
        sizes.push(p.size);
        regions.push(p.region);
        randoms.extend_from_slice(&[rng.next_f32(), rng.next_f32(), rng.next_f32()]);
    }

    log::debug!("[field] generated {variant}/{tier} seed={seed} particles={count}");
    Ok(ParticleField {
        variant,
        tier,
        seed,
        positions,
        sizes,
        regions,
        randoms,
    })
}

/// Generate-once store of shared fields, keyed by `(variant, tier, seed)`.
#[derive(Default)]
pub struct FieldCache {
    fields: FnvHashMap<(Variant, QualityTier, u64), Arc<ParticleField>>,
}

impl FieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_generate(
        &mut self,
        variant: Variant,
        tier: QualityTier,
        seed: u64,
    ) -> Result<Arc<ParticleField>, FieldError> {
        if let Some(field) = self.fields.get(&(variant, tier, seed)) {
            log::debug!("[field] cache hit {variant}/{tier} seed={seed}");
            return Ok(Arc::clone(field));
        }
        let field = Arc::new(generate(variant, tier, seed)?);
        self.fields.insert((variant, tier, seed), Arc::clone(&field));
        Ok(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
