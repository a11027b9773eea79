use space_invaders::config::{POWER_UP_DURATION, SLOW_MOTION_FACTOR};
use space_invaders::effects::*;

// ── TimedEffect ───────────────────────────────────────────────────────────────

#[test]
fn timed_effect_expires_at_duration() {
    let mut effect = TimedEffect::default();
    assert!(!effect.is_active());

    effect.activate(5.0);
    effect.tick(4.5);
    assert!(effect.is_active());
    assert!((effect.remaining() - 0.5).abs() < 1e-6);

    effect.tick(0.5);
    assert!(!effect.is_active());
    assert_eq!(effect.remaining(), 0.0);
    assert_eq!(effect.progress(), 0.0);
}

#[test]
fn reapplying_resets_instead_of_stacking() {
    let mut effect = TimedEffect::default();
    effect.activate(5.0);
    effect.tick(4.0);

    effect.activate(5.0);
    assert_eq!(effect.remaining(), 5.0);
    assert_eq!(effect.elapsed(), 0.0);

    // Still runs for exactly one duration from the second pickup
    effect.tick(4.9);
    assert!(effect.is_active());
    effect.tick(0.2);
    assert!(!effect.is_active());
}

#[test]
fn inactive_effect_ignores_ticks() {
    let mut effect = TimedEffect::default();
    effect.tick(10.0);
    assert!(!effect.is_active());
    assert_eq!(effect.elapsed(), 0.0);
}

#[test]
fn progress_counts_down() {
    let mut effect = TimedEffect::default();
    effect.activate(4.0);
    assert_eq!(effect.progress(), 1.0);
    effect.tick(1.0);
    assert_eq!(effect.progress(), 0.75);
}

// ── Shield ────────────────────────────────────────────────────────────────────

#[test]
fn shield_breaks_after_strength_hits() {
    let mut shield = Shield::default();
    shield.activate(3, 5.0);

    assert!(shield.absorb_hit());
    assert!(shield.absorb_hit());
    assert!(shield.is_active());
    assert!(shield.absorb_hit());

    // Third hit exhausted it long before the timer
    assert!(!shield.is_active());
    assert_eq!(shield.strength(), 0);
    assert!(!shield.absorb_hit());
}

#[test]
fn shield_expires_on_timer_with_strength_left() {
    let mut shield = Shield::default();
    shield.activate(3, 5.0);
    assert!(shield.absorb_hit());

    shield.tick(2.5);
    assert!(shield.is_active());
    shield.tick(2.5);

    assert!(!shield.is_active());
    assert_eq!(shield.strength(), 0);
    assert!(!shield.absorb_hit());
}

#[test]
fn shield_reapply_restores_strength_and_timer() {
    let mut shield = Shield::default();
    shield.activate(3, 5.0);
    shield.absorb_hit();
    shield.absorb_hit();
    shield.tick(4.0);

    shield.activate(3, 5.0);
    assert_eq!(shield.strength(), 3);
    assert_eq!(shield.remaining(), 5.0);
}

#[test]
fn zero_strength_shield_is_never_active() {
    let mut shield = Shield::default();
    shield.activate(0, 5.0);
    assert!(!shield.is_active());
    assert!(!shield.absorb_hit());
}

// ── SlowMotion ────────────────────────────────────────────────────────────────

#[test]
fn slow_motion_scales_time_while_active() {
    let mut slow = SlowMotion::default();
    assert_eq!(slow.time_scale(), 1.0);

    slow.activate(POWER_UP_DURATION);
    assert_eq!(slow.time_scale(), SLOW_MOTION_FACTOR);

    slow.tick(POWER_UP_DURATION - 0.5);
    assert_eq!(slow.time_scale(), SLOW_MOTION_FACTOR);

    slow.tick(0.5);
    assert_eq!(slow.time_scale(), 1.0);
}

#[test]
fn slow_motion_clear_is_immediate() {
    let mut slow = SlowMotion::default();
    slow.activate(POWER_UP_DURATION);
    slow.clear();
    assert!(!slow.is_active());
    assert_eq!(slow.time_scale(), 1.0);
    slow.clear();
    assert!(!slow.is_active());
}
