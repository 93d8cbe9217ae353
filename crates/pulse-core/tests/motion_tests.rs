// Host-side tests for the per-instance motion state: lifecycle, ordering of
// the per-frame pipeline, and the global invariants under long random runs.

use pulse_core::*;

const DT: f32 = 1.0 / 60.0;

/// Deterministic pseudo-audio with beats, silence and garbage samples mixed in.
fn audio_sequence(len: usize) -> Vec<AudioFrame> {
    let mut rng = FieldRng::new(2024).unwrap();
    (0..len)
        .map(|i| {
            let beat = if i % 30 < 3 { 0.95 } else { 0.1 };
            let mut f = AudioFrame::new(
                beat * rng.range(0.7, 1.0),
                rng.next_f32(),
                rng.next_f32() * 0.6,
            );
            match i % 97 {
                0 => f.bass = f32::NAN,
                1 => f.mid = f32::INFINITY,
                2 => f.high = -4.0,
                3 => f.bass = 12.0,
                _ => {}
            }
            if (400..520).contains(&i) {
                f = AudioFrame::SILENT;
            }
            f
        })
        .collect()
}

fn phases(s: &MotionState) -> [f32; 4] {
    [s.rotation(), s.color_phase(), s.ripple_phase(), s.flow_phase()]
}

#[test]
fn new_state_is_idle_until_first_update() {
    let mut s = MotionState::new(Variant::Disk, 1);
    assert_eq!(s.lifecycle(), Lifecycle::Idle);
    assert_eq!(phases(&s), [0.0; 4]);
    // Suspending an idle state does nothing.
    s.suspend();
    assert_eq!(s.lifecycle(), Lifecycle::Idle);
    assert!(s.update(AudioFrame::SILENT, DT));
    assert_eq!(s.lifecycle(), Lifecycle::Active);
    assert_eq!(s.frames(), 1);
}

#[test]
fn phases_never_decrease_and_levels_stay_bounded() {
    for variant in Variant::ALL {
        let mut s = MotionState::new(variant, 99);
        let mut prev = phases(&s);
        let dts = [DT, 0.0, 0.5, f32::NAN, -0.02, 1.0 / 144.0, f32::INFINITY];
        for (i, frame) in audio_sequence(2000).into_iter().enumerate() {
            s.update(frame, dts[i % dts.len()]);
            let now = phases(&s);
            for k in 0..4 {
                assert!(now[k] >= prev[k], "{variant} phase {k} reversed at {i}");
            }
            for v in [s.bass(), s.mid(), s.high(), s.sustained()] {
                assert!(v.is_finite() && (0.0..=1.0).contains(&v), "{variant} level {v}");
            }
            assert!(s.impulses().ripples().len() <= RIPPLE_CAPACITY);
            assert!(s.impulses().tilts().len() <= TILT_CAPACITY);
            assert!(s.tilt_offset().is_finite());
            prev = now;
        }
    }
}

#[test]
fn idle_variant_rotation_follows_idle_rate() {
    let mut s = MotionState::new(Variant::Disk, 3);
    for _ in 0..600 {
        s.update(AudioFrame::SILENT, DT);
    }
    let idle = VariantProfile::for_variant(Variant::Disk).rotation.idle_rate;
    assert!((s.rotation() - idle * 10.0).abs() < 1e-3);
    assert!((s.time() - 10.0).abs() < 1e-3);
}

#[test]
fn bass_hit_spawns_ripple_at_current_ripple_phase() {
    let mut s = MotionState::new(Variant::Disk, 5);
    for _ in 0..10 {
        s.update(AudioFrame::SILENT, DT);
    }
    s.update(AudioFrame::new(0.9, 0.0, 0.0), DT);
    assert_eq!(s.last_transients().len(), 1);
    assert_eq!(s.last_transients()[0].band, Band::Bass);
    let ripples = s.impulses().ripples();
    assert_eq!(ripples.len(), 1);
    assert_eq!(ripples[0].origin_phase, s.ripple_phase());
    assert_eq!(s.impulses().tilts().len(), 1);
    assert!((s.hits()[0] - 0.9).abs() < 1e-3, "hit {}", s.hits()[0]);
}

#[test]
fn simultaneous_band_hits_are_all_reported() {
    let mut s = MotionState::new(Variant::Sphere, 5);
    s.update(AudioFrame::SILENT, DT);
    s.update(AudioFrame::new(1.0, 1.0, 1.0), DT);
    assert_eq!(s.last_transients().len(), 3);
    // Sphere tilts on every band; one ripple for the bass hit.
    assert_eq!(s.impulses().tilts().len(), 3);
    assert_eq!(s.impulses().ripples().len(), 1);
}

#[test]
fn variants_without_ripples_or_flow_report_zero() {
    let mut spiral = MotionState::new(Variant::Spiral, 5);
    let mut tunnel = MotionState::new(Variant::Tunnel, 5);
    for _ in 0..60 {
        spiral.update(AudioFrame::new(0.9, 0.5, 0.5), DT);
        tunnel.update(AudioFrame::new(0.9, 0.5, 0.5), DT);
    }
    assert_eq!(spiral.ripple_phase(), 0.0);
    assert!(spiral.impulses().ripples().is_empty());
    assert!(spiral.flow_phase() > 0.0);
    assert!(tunnel.impulses().tilts().is_empty());
    assert!(tunnel.ripple_phase() > 0.0);
}

#[test]
fn suspended_state_is_frozen() {
    let mut s = MotionState::new(Variant::Disk, 5);
    for _ in 0..30 {
        s.update(AudioFrame::new(0.8, 0.6, 0.4), DT);
    }
    s.suspend();
    assert_eq!(s.lifecycle(), Lifecycle::Suspended);
    let before = (phases(&s), s.bass(), s.sustained(), s.frames());
    for _ in 0..30 {
        assert!(!s.update(AudioFrame::new(1.0, 1.0, 1.0), DT));
    }
    assert_eq!((phases(&s), s.bass(), s.sustained(), s.frames()), before);
}

#[test]
fn resume_continues_without_a_stale_transient() {
    let mut s = MotionState::new(Variant::Disk, 5);
    for _ in 0..30 {
        s.update(AudioFrame::SILENT, DT);
    }
    let rotation = s.rotation();
    s.suspend();
    s.resume();
    assert_eq!(s.lifecycle(), Lifecycle::Active);
    // Level jumped while hidden: not a hit.
    s.update(AudioFrame::new(0.9, 0.0, 0.0), DT);
    assert!(s.last_transients().is_empty());
    assert!(s.rotation() >= rotation);
    // Subsequent genuine hits still register.
    s.update(AudioFrame::SILENT, DT);
    for _ in 0..10 {
        s.update(AudioFrame::SILENT, DT);
    }
    s.update(AudioFrame::new(0.9, 0.0, 0.0), DT);
    assert_eq!(s.last_transients().len(), 1);
}

#[test]
fn instances_do_not_interfere() {
    let mut a = MotionState::new(Variant::Disk, 5);
    let mut b = MotionState::new(Variant::Disk, 5);
    let c = MotionState::new(Variant::Disk, 5);
    for frame in audio_sequence(300) {
        a.update(frame, DT);
        b.update(frame, DT);
    }
    assert_eq!(phases(&a), phases(&b));
    assert_eq!(a.impulses().tilts(), b.impulses().tilts());
    assert_eq!(phases(&c), [0.0; 4]);
}

#[test]
fn custom_profile_changes_feel_only() {
    let mut profile = VariantProfile::for_variant(Variant::Disk);
    profile.rotation.idle_rate = 0.5;
    let mut fast = MotionState::with_profile(profile, 1);
    let mut stock = MotionState::new(Variant::Disk, 1);
    for _ in 0..60 {
        fast.update(AudioFrame::SILENT, DT);
        stock.update(AudioFrame::SILENT, DT);
    }
    assert!(fast.rotation() > stock.rotation() * 5.0);
}

#[test]
fn hit_envelope_decays_exponentially() {
    let mut s = MotionState::new(Variant::Disk, 5);
    s.update(AudioFrame::SILENT, DT);
    s.update(AudioFrame::new(0.9, 0.0, 0.0), DT);
    let strength = s.last_transients()[0].strength;
    assert_eq!(s.hits()[0], strength);
    let n = 30;
    for _ in 0..n {
        s.update(AudioFrame::SILENT, DT);
    }
    let expected = strength * (-HIT_DECAY_PER_SEC * DT * n as f32).exp();
    assert!((s.hits()[0] - expected).abs() < 1e-4, "{} vs {expected}", s.hits()[0]);
    assert_eq!(s.hits()[1], 0.0);
    assert_eq!(s.hits()[2], 0.0);
}

#[test]
fn weaker_hit_does_not_lower_a_decaying_stronger_one() {
    let mut s = MotionState::new(Variant::Disk, 5);
    s.update(AudioFrame::SILENT, DT);
    s.update(AudioFrame::new(1.0, 0.0, 0.0), DT);
    for _ in 0..10 {
        s.update(AudioFrame::SILENT, DT);
    }
    // 0.25 rise fires (cooldown elapsed) but is weaker than what remains.
    s.update(AudioFrame::new(0.25, 0.0, 0.0), DT);
    assert_eq!(s.last_transients().len(), 1);
    let weak = s.last_transients()[0].strength;
    let expected = (-HIT_DECAY_PER_SEC * DT * 11.0).exp();
    assert!(weak < expected);
    assert!((s.hits()[0] - expected).abs() < 1e-4, "{} vs {expected}", s.hits()[0]);
}
