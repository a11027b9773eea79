//! The frame driver.
//!
//! `Session` owns every entity collection.  `step` runs the phases in a fixed
//! order once per frame: spawn, update, collide, clean up.  All randomness
//! comes through the `rng` argument so tests can pin it with a seed.

use log::{debug, info};
use rand::Rng;

use crate::arena::Arena;
use crate::collision::{self, CollisionOutcome};
use crate::config::{self, Difficulty};
use crate::effects::SlowMotion;
use crate::entities::{
    Avatar, Boss, Bullet, Enemy, EnemyBullet, Explosion, Player, PowerUp, StartMod,
};
use crate::input::FrameInput;
use crate::spawn::SpawnTimers;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSetup {
    pub name: String,
    pub avatar: Avatar,
    pub start_mod: StartMod,
}

/// Everything needed to start (and restart) a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSetup {
    pub difficulty: Difficulty,
    /// One entry for single player, two for local multiplayer.
    pub players: Vec<PlayerSetup>,
}

impl SessionSetup {
    pub fn single(
        name: impl Into<String>,
        avatar: Avatar,
        start_mod: StartMod,
        difficulty: Difficulty,
    ) -> Self {
        SessionSetup {
            difficulty,
            players: vec![PlayerSetup { name: name.into(), avatar, start_mod }],
        }
    }

    /// Two local players.  Start modifiers are a single-player feature.
    pub fn multiplayer(first: Avatar, second: Avatar, difficulty: Difficulty) -> Self {
        SessionSetup {
            difficulty,
            players: vec![
                PlayerSetup { name: "Player 1".into(), avatar: first, start_mod: StartMod::None },
                PlayerSetup { name: "Player 2".into(), avatar: second, start_mod: StartMod::None },
            ],
        }
    }

    pub fn is_multiplayer(&self) -> bool {
        self.players.len() > 1
    }
}

/// Final result of one player in a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerResult {
    pub name: String,
    pub avatar: Avatar,
    pub start_mod: StartMod,
    pub score: u32,
}

/// Aggregate handed to the save system when a run ends.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub players: Vec<PlayerResult>,
    pub total_score: u32,
    pub enemies_killed: u32,
    pub boss_defeated: bool,
    pub play_time: f32,
    pub difficulty: Difficulty,
    pub multiplayer: bool,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub setup: SessionSetup,
    pub difficulty: Difficulty,
    pub players: Vec<Player>,
    pub enemies: Arena<Enemy>,
    pub bullets: Arena<Bullet>,
    pub enemy_bullets: Arena<EnemyBullet>,
    pub power_ups: Arena<PowerUp>,
    pub explosions: Arena<Explosion>,
    /// `Some` exactly while the boss is on the field.
    pub boss: Option<Boss>,
    pub spawn_timers: SpawnTimers,
    pub slow_motion: SlowMotion,
    /// Real seconds played.
    pub elapsed: f32,
    pub enemies_killed: u32,
    pub boss_defeated: bool,
    pub status: SessionStatus,
    pub frame: u64,
}

impl Session {
    pub fn new(setup: SessionSetup) -> Self {
        let mut session = Session {
            difficulty: setup.difficulty,
            players: Vec::new(),
            enemies: Arena::new(),
            bullets: Arena::new(),
            enemy_bullets: Arena::new(),
            power_ups: Arena::new(),
            explosions: Arena::new(),
            boss: None,
            spawn_timers: SpawnTimers::default(),
            slow_motion: SlowMotion::default(),
            elapsed: 0.0,
            enemies_killed: 0,
            boss_defeated: false,
            status: SessionStatus::Playing,
            frame: 0,
            setup,
        };
        session.restart();
        session
    }

    /// Fresh players, empty field, zeroed timers; same setup as before.
    pub fn restart(&mut self) {
        self.clear_all();
        self.spawn_timers.reset();
        self.slow_motion.clear();
        self.elapsed = 0.0;
        self.enemies_killed = 0;
        self.boss_defeated = false;
        self.status = SessionStatus::Playing;
        self.frame = 0;

        let multiplayer = self.setup.is_multiplayer();
        self.players = self
            .setup
            .players
            .iter()
            .enumerate()
            .map(|(id, entry)| {
                let fraction = match (multiplayer, id) {
                    (false, _) => 0.5,
                    (true, 0) => 0.75,
                    (true, _) => 0.25,
                };
                let mut player =
                    Player::new(id, entry.name.clone(), entry.avatar, Player::spawn_point(fraction));
                player.apply_start_mod(entry.start_mod);
                player
            })
            .collect();

        if self.players.iter().any(|p| p.start_mod == StartMod::SlowMotion) {
            self.slow_motion.activate(config::POWER_UP_DURATION);
        }

        info!(
            "Session started: {} player(s), difficulty {}",
            self.players.len(),
            self.difficulty.label()
        );
    }

    /// Advance the simulation by one frame of `dt` real seconds.  A paused
    /// frame leaves every clock and entity untouched.
    pub fn step(&mut self, input: &FrameInput, dt: f32, rng: &mut impl Rng) -> CollisionOutcome {
        if self.status == SessionStatus::GameOver || input.pause {
            return CollisionOutcome::default();
        }
        self.frame += 1;
        self.elapsed += dt;

        self.slow_motion.tick(dt);
        let world_dt = dt * self.time_scale();

        // ── 1. Spawn ─────────────────────────────────────────────────────────
        self.spawn_phase(dt, rng);

        // ── 2. Update ────────────────────────────────────────────────────────
        self.update_players(input, dt);
        self.update_world(dt, world_dt);

        // ── 3. Collide ───────────────────────────────────────────────────────
        let outcome = collision::resolve(self, rng);

        // ── 4. Clean up ──────────────────────────────────────────────────────
        self.cleanup();

        if self.players.iter().all(|p| !p.is_alive()) {
            self.status = SessionStatus::GameOver;
            info!(
                "Game over after {:.1}s: total score {}, {} kills",
                self.elapsed,
                self.total_score(),
                self.enemies_killed
            );
        }

        outcome
    }

    /// Multiplier applied to the world's delta time.
    pub fn time_scale(&self) -> f32 {
        self.slow_motion.time_scale()
    }

    pub fn boss_active(&self) -> bool {
        self.boss.is_some()
    }

    pub fn is_over(&self) -> bool {
        self.status == SessionStatus::GameOver
    }

    pub fn total_score(&self) -> u32 {
        self.players.iter().map(|p| p.score).sum()
    }

    pub fn spawn_boss(&mut self) {
        if self.boss.is_some() {
            return;
        }
        let boss = Boss::new(self.difficulty);
        info!("Boss spawned with {} health at {:.1}s", boss.max_health, self.elapsed);
        self.boss = Some(boss);
    }

    fn spawn_phase(&mut self, dt: f32, rng: &mut impl Rng) {
        let decision = self.spawn_timers.tick(dt, self.difficulty, self.boss_active());
        if decision.enemy {
            let enemy = Enemy::spawn(self.difficulty, rng);
            debug!("Enemy type {} spawned at x={:.0}", enemy.kind, enemy.position.x);
            self.enemies.insert(enemy);
        }
        if decision.boss {
            self.spawn_boss();
        }
    }

    fn update_players(&mut self, input: &FrameInput, dt: f32) {
        for player in self.players.iter_mut().filter(|p| p.is_alive()) {
            player.update(dt, self.difficulty);
            player.handle_input(&input.player(player.id), dt);
            if player.wants_to_shoot() {
                for bullet in player.fire() {
                    self.bullets.insert(bullet);
                }
            }
        }
    }

    /// Player bullets fly in real time; everything hostile is slowed.
    fn update_world(&mut self, dt: f32, world_dt: f32) {
        for bullet in self.bullets.iter_mut() {
            bullet.update(dt);
        }

        for enemy in self.enemies.iter_mut() {
            enemy.update(world_dt);
            if let Some(shot) = enemy.shoot(self.difficulty) {
                self.enemy_bullets.insert(shot);
            }
        }

        if let Some(boss) = self.boss.as_mut() {
            boss.update(world_dt);
            for shot in boss.shoot() {
                self.enemy_bullets.insert(shot);
            }
        }

        for shot in self.enemy_bullets.iter_mut() {
            shot.update(world_dt);
        }
        for power_up in self.power_ups.iter_mut() {
            power_up.update(world_dt);
        }
        for explosion in self.explosions.iter_mut() {
            explosion.update(world_dt);
        }
    }

    /// Drop every entity deactivated this frame and every finished explosion.
    pub fn cleanup(&mut self) {
        self.enemies.sweep();
        self.bullets.sweep();
        self.enemy_bullets.sweep();
        self.power_ups.sweep();
        self.explosions.sweep();
    }

    /// Empty every collection and remove the boss.  Safe to call repeatedly.
    pub fn clear_all(&mut self) {
        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.power_ups.clear();
        self.explosions.clear();
        self.boss = None;
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            players: self
                .players
                .iter()
                .map(|p| PlayerResult {
                    name: p.name.clone(),
                    avatar: p.avatar,
                    start_mod: p.start_mod,
                    score: p.score,
                })
                .collect(),
            total_score: self.total_score(),
            enemies_killed: self.enemies_killed,
            boss_defeated: self.boss_defeated,
            play_time: self.elapsed,
            difficulty: self.difficulty,
            multiplayer: self.setup.is_multiplayer(),
        }
    }
}
