//! Spawning policy: when enemies, the boss and power-up drops appear.

use rand::Rng;

use crate::config::{self, Difficulty};
use crate::entities::PowerUpKind;

/// What the spawn phase should create this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnDecision {
    pub enemy: bool,
    pub boss: bool,
}

/// Accumulating timers driving enemy and boss spawns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnTimers {
    pub enemy: f32,
    pub boss: f32,
    /// The boss appears at most once per session.
    pub boss_spawned: bool,
}

impl SpawnTimers {
    /// Advance both timers by `dt` and decide what to spawn.  Enemies are
    /// held back while a boss is on the field; their timer keeps running so
    /// the next wave starts right after the fight.
    pub fn tick(&mut self, dt: f32, difficulty: Difficulty, boss_present: bool) -> SpawnDecision {
        let mut decision = SpawnDecision::default();

        self.enemy += dt;
        if !boss_present && self.enemy >= config::enemy_spawn_interval(difficulty) {
            decision.enemy = true;
            self.enemy = 0.0;
        }

        if !self.boss_spawned {
            self.boss += dt;
            if !boss_present && self.boss >= config::boss_spawn_time(difficulty) {
                decision.boss = true;
                self.boss_spawned = true;
                self.boss = 0.0;
            }
        }

        decision
    }

    pub fn reset(&mut self) {
        *self = SpawnTimers::default();
    }
}

/// Roll the tier's drop chance for a destroyed enemy.
pub fn roll_power_up_drop(difficulty: Difficulty, rng: &mut impl Rng) -> Option<PowerUpKind> {
    if rng.gen_bool(config::power_up_drop_chance(difficulty)) {
        Some(PowerUpKind::random(rng))
    } else {
        None
    }
}
