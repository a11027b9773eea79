//! Difficulty tables and runtime settings.
//!
//! Every gameplay constant that scales with the tier lives here as a plain
//! `match` lookup so the rest of the crate never hard-codes a number twice.

use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};

// ── Play field ───────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 800.0;
pub const TARGET_FPS: u32 = 60;

// ── Shared gameplay constants ────────────────────────────────────────────────

pub const POWER_UP_DURATION: f32 = 5.0;
pub const SHIELD_STRENGTH: u32 = 3;
pub const SLOW_MOTION_FACTOR: f32 = 0.4;
pub const BOSS_DEFEAT_BONUS: u32 = 500;
pub const BOSS_HIT_DAMAGE: u32 = 1;
pub const EXPLOSION_DURATION: f32 = 0.5;

pub const PLAYER_SIZE: f32 = 120.0;
pub const PLAYER_BASE_LIVES: u32 = 3;
pub const PLAYER_BULLET_RADIUS: f32 = 6.0;
pub const PLAYER_BULLET_SPEED: f32 = 500.0;
/// Horizontal gap between the three bullets of a triple shot.
pub const TRIPLE_SHOT_SPREAD: f32 = 30.0;

pub const ENEMY_TYPE_COUNT: usize = 5;
pub const ENEMY_BASE_SIZE: f32 = 64.0;
pub const ENEMY_BULLET_RADIUS: f32 = 8.0;
pub const ENEMY_MIN_SHOOT_COOLDOWN: f32 = 0.2;

pub const BOSS_WIDTH: f32 = 200.0;
pub const BOSS_HEIGHT: f32 = 140.0;
pub const BOSS_MIN_Y: f32 = 30.0;
pub const BOSS_MAX_Y: f32 = 150.0;
pub const BOSS_START_Y: f32 = 50.0;

pub const POWER_UP_SIZE: f32 = 48.0;
pub const POWER_UP_FALL_SPEED: f32 = 120.0;

/// Fractional stat bonus granted by a non-default avatar.
pub const AVATAR_BONUS: f32 = 0.1;
pub const UNLOCK_COST: u32 = 30;
pub const MAX_HIGHSCORE_ENTRIES: usize = 10;

// ── Difficulty ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

// ── Difficulty tables ────────────────────────────────────────────────────────

/// Seconds between enemy spawns.
pub fn enemy_spawn_interval(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 1.8,
        Difficulty::Medium => 1.2,
        Difficulty::Hard => 0.8,
    }
}

/// Base falling speed of an enemy, before per-instance variance.
pub fn enemy_speed(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 120.0,
        Difficulty::Medium => 180.0,
        Difficulty::Hard => 240.0,
    }
}

pub fn enemy_shoot_cooldown(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 2.5,
        Difficulty::Medium => 1.8,
        Difficulty::Hard => 1.2,
    }
}

pub fn enemy_bullet_speed(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 200.0,
        Difficulty::Medium => 280.0,
        Difficulty::Hard => 360.0,
    }
}

pub fn player_shoot_cooldown(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 0.35,
        Difficulty::Medium => 0.30,
        Difficulty::Hard => 0.25,
    }
}

pub fn player_movement_speed(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 280.0,
        Difficulty::Medium => 320.0,
        Difficulty::Hard => 360.0,
    }
}

/// Chance that a destroyed enemy drops a power-up.
pub fn power_up_drop_chance(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 0.15,
        Difficulty::Medium => 0.12,
        Difficulty::Hard => 0.08,
    }
}

/// Seconds of play before the boss appears.
pub fn boss_spawn_time(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 90.0,
        Difficulty::Medium => 75.0,
        Difficulty::Hard => 60.0,
    }
}

pub fn boss_max_health(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 15,
        Difficulty::Medium => 20,
        Difficulty::Hard => 30,
    }
}

pub fn boss_difficulty_multiplier(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 0.8,
        Difficulty::Medium => 1.0,
        Difficulty::Hard => 1.5,
    }
}

/// Angular speed of the boss's horizontal sweep.
pub fn boss_movement_speed(difficulty: Difficulty) -> f32 {
    1.0 + 0.3 * boss_difficulty_multiplier(difficulty)
}

pub fn boss_movement_amplitude(difficulty: Difficulty) -> f32 {
    100.0 + 40.0 * boss_difficulty_multiplier(difficulty)
}

pub fn boss_shoot_cooldown(difficulty: Difficulty) -> f32 {
    2.0 / (1.0 + 0.5 * boss_difficulty_multiplier(difficulty))
}

pub fn boss_bullet_speed(difficulty: Difficulty) -> f32 {
    320.0 + 60.0 * boss_difficulty_multiplier(difficulty)
}

// ── Runtime configuration ────────────────────────────────────────────────────

/// Settings for the terminal front end and the save file.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub save_path: PathBuf,
    pub log_path: PathBuf,
    pub target_fps: u32,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            save_path: PathBuf::from(home).join(".space_invaders.json"),
            log_path: PathBuf::from("space_invaders.log"),
            target_fps: TARGET_FPS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("INVADERS_SAVE_PATH") {
            config.save_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("INVADERS_LOG_PATH") {
            config.log_path = PathBuf::from(path);
        }

        if let Ok(fps) = std::env::var("INVADERS_FPS") {
            match fps.parse::<u32>() {
                Ok(parsed) if (10..=240).contains(&parsed) => config.target_fps = parsed,
                Ok(_) => warn!("INVADERS_FPS must be 10-240, using default"),
                Err(_) => warn!("Invalid INVADERS_FPS '{}', using default", fps),
            }
        }

        if let Ok(seed) = std::env::var("INVADERS_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => config.seed = Some(parsed),
                Err(_) => warn!("Invalid INVADERS_SEED '{}', ignoring", seed),
            }
        }

        config
    }
}
