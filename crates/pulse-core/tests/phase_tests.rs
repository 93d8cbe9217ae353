// Host-side tests for phase accumulators: idle integral, rate smoothing and
// monotonicity under arbitrary input.

use pulse_core::*;

const DT: f32 = 1.0 / 60.0;

fn loud() -> RateInputs {
    RateInputs {
        bass: 1.0,
        mid: 1.0,
        high: 1.0,
        sustained: 1.0,
    }
}

#[test]
fn idle_rotation_integrates_idle_baseline() {
    let cfg = PhaseRateConfig {
        idle_rate: 0.05,
        ..PhaseRateConfig::rotation()
    };
    let mut p = PhaseAccumulator::new(cfg);
    for _ in 0..600 {
        p.advance(DT, RateInputs::default());
    }
    assert!((p.phase() - 0.5).abs() < 1e-4, "phase {}", p.phase());
}

#[test]
fn target_rate_is_idle_plus_weighted_inputs() {
    let cfg = PhaseRateConfig::rotation();
    assert!((target_rate(&cfg, RateInputs::default()) - cfg.idle_rate).abs() < 1e-6);
    let full = cfg.idle_rate
        + cfg.bass_weight
        + cfg.mid_weight
        + cfg.high_weight
        + cfg.sustained_weight;
    assert!((target_rate(&cfg, loud()) - full).abs() < 1e-5);
    // Super-linear bass: half bass contributes less than half its weight.
    let half = RateInputs {
        bass: 0.5,
        ..RateInputs::default()
    };
    assert!(target_rate(&cfg, half) - cfg.idle_rate < cfg.bass_weight * 0.5);
}

#[test]
fn rate_speeds_up_fast_and_spins_down_slowly() {
    let mut p = PhaseAccumulator::new(PhaseRateConfig::rotation());
    let idle = p.rate();
    let peak_target = target_rate(p.config(), loud());
    let mut up = 0;
    while p.rate() < idle + 0.9 * (peak_target - idle) {
        p.advance(DT, loud());
        up += 1;
    }
    let mut down = 0;
    while p.rate() > idle + 0.1 * (peak_target - idle) {
        p.advance(DT, RateInputs::default());
        down += 1;
    }
    assert!(down > 2 * up, "up {up} frames, down {down} frames");
}

#[test]
fn rate_never_drops_below_floor() {
    let cfg = PhaseRateConfig {
        idle_rate: 0.0,
        min_rate: 0.02,
        ..PhaseRateConfig::color()
    };
    let mut p = PhaseAccumulator::new(cfg);
    for _ in 0..1000 {
        p.advance(DT, RateInputs::default());
        assert!(p.rate() >= 0.02);
    }
    assert!(p.phase() > 0.0);
}

#[test]
fn phase_is_monotonic_for_hostile_inputs() {
    let mut p = PhaseAccumulator::new(PhaseRateConfig::ripple());
    let levels = [0.0, 1.0, 0.3, f32::NAN, f32::INFINITY, -2.0, 9.0];
    let dts = [DT, 0.0, -0.1, f32::NAN, f32::INFINITY, 5.0, 0.033];
    let mut prev = p.phase();
    for (i, &lvl) in levels.iter().cycle().take(500).enumerate() {
        let inputs = RateInputs {
            bass: lvl,
            mid: levels[(i + 1) % levels.len()],
            high: levels[(i + 2) % levels.len()],
            sustained: levels[(i + 3) % levels.len()],
        };
        let now = p.advance(dts[i % dts.len()], inputs);
        assert!(now.is_finite());
        assert!(now >= prev, "phase went backwards at step {i}: {prev} -> {now}");
        prev = now;
    }
}

#[test]
fn oversized_dt_is_clamped() {
    let mut p = PhaseAccumulator::new(PhaseRateConfig::rotation());
    let rate = p.rate();
    p.advance(10.0, RateInputs::default());
    assert!(p.phase() <= f64::from(rate) * f64::from(MAX_FRAME_DT_SEC) + 1e-6);
}
