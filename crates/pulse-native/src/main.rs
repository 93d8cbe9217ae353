use std::time::Instant;

use anyhow::Context;
use pulse_core::{
    AudioFrame, FrameUniforms, QualityTier, RenderScale, Stage, UniformSink, Variant,
};

const FRAME_RATE: f32 = 60.0;
const DEFAULT_SECONDS: f32 = 8.0;
const DEFAULT_SEED: u64 = 42;
const BPM: f32 = 124.0;

/// Stands in for a GPU uniform buffer: keeps the bytes a queue write would upload.
#[derive(Default)]
struct CaptureSink {
    bytes: Vec<u8>,
    writes: u64,
    last: Option<FrameUniforms>,
}

impl UniformSink for CaptureSink {
    fn write_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytemuck::bytes_of(uniforms));
        self.writes += 1;
        self.last = Some(*uniforms);
    }
}

/// Four-on-the-floor kick, offbeat hats and a slow pad swell, in band levels.
fn synth_frame(t: f32) -> AudioFrame {
    let beat = t * BPM / 60.0;
    let phase = beat.fract();
    let kick = (-phase * 9.0).exp();
    let hat_phase = (beat + 0.5).fract();
    let hat = (-hat_phase * 25.0).exp();
    let pad = 0.35 + 0.25 * (t * 0.4).sin();
    AudioFrame::new(
        (0.08 + 0.9 * kick).min(1.0),
        (pad + 0.15 * kick).min(1.0),
        (0.1 + 0.7 * hat).min(1.0),
    )
}

struct Args {
    variant: Variant,
    tier: QualityTier,
    seconds: f32,
    seed: u64,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut it = std::env::args().skip(1);
    let variant = match it.next() {
        Some(v) => v.parse().context("variant")?,
        None => Variant::Disk,
    };
    let tier = match it.next() {
        Some(t) => t.parse().context("quality tier")?,
        None => QualityTier::High,
    };
    let seconds = match it.next() {
        Some(s) => s.parse().with_context(|| format!("seconds `{s}`"))?,
        None => DEFAULT_SECONDS,
    };
    let seed = match it.next() {
        Some(s) => s.parse().with_context(|| format!("seed `{s}`"))?,
        None => DEFAULT_SEED,
    };
    Ok(Args {
        variant,
        tier,
        seconds,
        seed,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args()?;
    log::info!(
        "pulse-native starting: {} / {} seed={} for {:.1}s",
        args.variant,
        args.tier,
        args.seed,
        args.seconds
    );

    let mut stage = Stage::new(args.tier, args.seed, RenderScale::new(1.0));
    let started = Instant::now();
    stage
        .switch_to(args.variant)
        .context("generate particle field")?;
    log::info!("[field] ready in {:.1} ms", started.elapsed().as_secs_f64() * 1e3);

    let dt = 1.0 / FRAME_RATE;
    let total = (args.seconds.max(0.0) * FRAME_RATE) as u32;
    let mut sink = CaptureSink::default();
    let mut skipped = 0u32;
    for i in 0..total {
        let t = i as f32 * dt;
        // The target comes up a few frames late, as a real surface would.
        let target: Option<&mut dyn UniformSink> = if i < 3 { None } else { Some(&mut sink) };
        if !stage.frame(synth_frame(t), dt, target) {
            skipped += 1;
        }
        if (i + 1) % FRAME_RATE as u32 == 0 {
            if let Some(u) = sink.last {
                log::info!(
                    "[frame {:>5}] bass={:.2} mid={:.2} high={:.2} sustained={:.2} rot={:.3} color={:.3} ripple={:.3} flow={:.3} ripples={} tilt=({:+.3},{:+.3})",
                    u.frame,
                    u.bass,
                    u.mid,
                    u.high,
                    u.sustained,
                    u.rotation,
                    u.color_phase,
                    u.ripple_phase,
                    u.flow_phase,
                    u.ripple_count,
                    u.tilt[0],
                    u.tilt[1],
                );
            }
        }
    }

    log::info!(
        "done: {} uniform writes ({} bytes each), {} skipped frames",
        sink.writes,
        sink.bytes.len(),
        skipped
    );
    Ok(())
}
