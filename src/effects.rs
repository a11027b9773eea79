//! Temporary abilities.  Each one is an independent countdown; re-activating
//! an effect restarts its clock instead of adding to it.

use crate::config::SLOW_MOTION_FACTOR;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimedEffect {
    active: bool,
    elapsed: f32,
    duration: f32,
}

impl TimedEffect {
    pub fn activate(&mut self, duration: f32) {
        self.active = true;
        self.elapsed = 0.0;
        self.duration = duration;
    }

    pub fn deactivate(&mut self) {
        *self = TimedEffect::default();
    }

    /// Advance the clock; clears the effect once `duration` is reached.
    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.deactivate();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn elapsed(&self) -> f32 {
        if self.active { self.elapsed } else { 0.0 }
    }

    pub fn remaining(&self) -> f32 {
        if self.active {
            (self.duration - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }

    /// Remaining fraction in `0.0..=1.0`, for progress bars.
    pub fn progress(&self) -> f32 {
        if !self.active || self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining() / self.duration).clamp(0.0, 1.0)
    }
}

/// A timed shield that also breaks after absorbing `strength` hits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shield {
    effect: TimedEffect,
    strength: u32,
}

impl Shield {
    pub fn activate(&mut self, strength: u32, duration: f32) {
        self.effect.activate(duration);
        self.strength = strength;
        if strength == 0 {
            self.effect.deactivate();
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.effect.tick(dt);
        if !self.effect.is_active() {
            self.strength = 0;
        }
    }

    /// Spend one point of strength.  Returns `false` when there was no
    /// shield to take the hit.
    pub fn absorb_hit(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.strength -= 1;
        if self.strength == 0 {
            self.effect.deactivate();
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.effect.is_active() && self.strength > 0
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    pub fn remaining(&self) -> f32 {
        self.effect.remaining()
    }

    pub fn progress(&self) -> f32 {
        self.effect.progress()
    }
}

/// Session-wide slow motion.  Counts down in real (unscaled) time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlowMotion {
    effect: TimedEffect,
}

impl SlowMotion {
    pub fn activate(&mut self, duration: f32) {
        self.effect.activate(duration);
    }

    pub fn tick(&mut self, dt: f32) {
        self.effect.tick(dt);
    }

    pub fn clear(&mut self) {
        self.effect.deactivate();
    }

    pub fn is_active(&self) -> bool {
        self.effect.is_active()
    }

    /// Multiplier applied to the world's delta time.
    pub fn time_scale(&self) -> f32 {
        if self.is_active() { SLOW_MOTION_FACTOR } else { 1.0 }
    }

    pub fn remaining(&self) -> f32 {
        self.effect.remaining()
    }

    pub fn progress(&self) -> f32 {
        self.effect.progress()
    }
}
