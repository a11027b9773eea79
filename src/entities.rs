//! Game entities and their per-frame behaviour.
//!
//! Entities hold no references to each other; the session owns every
//! collection and the collision engine is the only place where two entities
//! meet.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arena::Active;
use crate::config::{self, Difficulty, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::effects::{Shield, TimedEffect};
use crate::input::PlayerInput;
use crate::types::{Rect, Vec2};

// ── Kinds ────────────────────────────────────────────────────────────────────

/// Cosmetic player skin with a small permanent stat bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Avatar {
    /// Free default, no bonus.
    Blue,
    /// One extra life.
    Green,
    /// Faster bullets.
    Red,
    /// Faster movement.
    Yellow,
    /// Faster fire rate.
    Purple,
}

impl Avatar {
    pub const ALL: [Avatar; 5] = [
        Avatar::Blue,
        Avatar::Green,
        Avatar::Red,
        Avatar::Yellow,
        Avatar::Purple,
    ];

    pub fn index(&self) -> usize {
        match self {
            Avatar::Blue => 0,
            Avatar::Green => 1,
            Avatar::Red => 2,
            Avatar::Yellow => 3,
            Avatar::Purple => 4,
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            Avatar::Blue => 0,
            _ => config::UNLOCK_COST,
        }
    }

    pub fn bonus_lives(&self) -> u32 {
        match self {
            Avatar::Green => 1,
            _ => 0,
        }
    }

    pub fn bullet_speed_multiplier(&self) -> f32 {
        match self {
            Avatar::Red => 1.0 + config::AVATAR_BONUS,
            _ => 1.0,
        }
    }

    pub fn movement_multiplier(&self) -> f32 {
        match self {
            Avatar::Yellow => 1.0 + config::AVATAR_BONUS,
            _ => 1.0,
        }
    }

    pub fn fire_rate_multiplier(&self) -> f32 {
        match self {
            Avatar::Purple => 1.0 + config::AVATAR_BONUS,
            _ => 1.0,
        }
    }
}

/// Ability pre-activated at session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartMod {
    None,
    FastFire,
    Shield,
    TripleShot,
    SlowMotion,
}

impl StartMod {
    pub const ALL: [StartMod; 5] = [
        StartMod::None,
        StartMod::FastFire,
        StartMod::Shield,
        StartMod::TripleShot,
        StartMod::SlowMotion,
    ];

    pub fn cost(&self) -> u32 {
        match self {
            StartMod::None => 0,
            _ => config::UNLOCK_COST,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    Shield,
    TripleShot,
    SlowMotion,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] =
        [PowerUpKind::Shield, PowerUpKind::TripleShot, PowerUpKind::SlowMotion];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Player bullet flavour; only affects the spawn pattern and colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletKind {
    Normal,
    FastFire,
    TripleShot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletColor {
    Purple,
    DarkGreen,
    Orange,
    Pink,
    SkyBlue,
    Blue,
    DarkBlue,
}

/// Outcome of a player being struck by an enemy or enemy bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    Absorbed,
    LifeLost,
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    /// Index into the session's player list; stamped on every bullet fired.
    pub id: usize,
    pub name: String,
    pub avatar: Avatar,
    pub start_mod: StartMod,
    /// Top-left corner of the sprite.
    pub position: Vec2,
    pub lives: u32,
    pub max_lives: u32,
    pub score: u32,
    pub shield: Shield,
    pub triple_shot: TimedEffect,
    pub fast_fire: TimedEffect,
    movement_speed: f32,
    shoot_cooldown: f32,
    shoot_timer: f32,
    shoot_requested: bool,
}

impl Player {
    pub fn new(id: usize, name: impl Into<String>, avatar: Avatar, position: Vec2) -> Self {
        let max_lives = config::PLAYER_BASE_LIVES + avatar.bonus_lives();
        let mut player = Player {
            id,
            name: name.into(),
            avatar,
            start_mod: StartMod::None,
            position,
            lives: max_lives,
            max_lives,
            score: 0,
            shield: Shield::default(),
            triple_shot: TimedEffect::default(),
            fast_fire: TimedEffect::default(),
            movement_speed: config::player_movement_speed(Difficulty::Medium),
            shoot_cooldown: config::player_shoot_cooldown(Difficulty::Medium),
            shoot_timer: 0.0,
            shoot_requested: false,
        };
        player.clamp_position();
        player
    }

    /// Default spawn point: horizontally at `fraction` of the field width,
    /// resting just above the bottom edge.
    pub fn spawn_point(fraction: f32) -> Vec2 {
        Vec2::new(
            SCREEN_WIDTH * fraction - config::PLAYER_SIZE / 2.0,
            SCREEN_HEIGHT - config::PLAYER_SIZE - 20.0,
        )
    }

    /// Refresh difficulty-derived stats and advance every timer.
    pub fn update(&mut self, dt: f32, difficulty: Difficulty) {
        self.movement_speed =
            config::player_movement_speed(difficulty) * self.avatar.movement_multiplier();
        self.shoot_cooldown = config::player_shoot_cooldown(difficulty) / self.fire_rate_multiplier();

        self.shield.tick(dt);
        self.triple_shot.tick(dt);
        self.fast_fire.tick(dt);
        self.shoot_timer += dt;
    }

    pub fn handle_input(&mut self, input: &PlayerInput, dt: f32) {
        if input.left {
            self.position.x -= self.movement_speed * dt;
        }
        if input.right {
            self.position.x += self.movement_speed * dt;
        }
        self.clamp_position();

        if input.shoot && self.can_shoot() {
            self.shoot_requested = true;
            self.shoot_timer = 0.0;
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_timer >= self.shoot_cooldown
    }

    pub fn wants_to_shoot(&self) -> bool {
        self.shoot_requested
    }

    /// Consume a pending shoot request and build the bullets it produces.
    pub fn fire(&mut self) -> Vec<Bullet> {
        if !self.shoot_requested {
            return Vec::new();
        }
        self.shoot_requested = false;

        let origin = Vec2::new(self.position.x + config::PLAYER_SIZE / 2.0, self.position.y);
        let speed = config::PLAYER_BULLET_SPEED * self.avatar.bullet_speed_multiplier();

        if self.triple_shot.is_active() {
            [-config::TRIPLE_SHOT_SPREAD, 0.0, config::TRIPLE_SHOT_SPREAD]
                .iter()
                .map(|dx| {
                    Bullet::new(
                        self.id,
                        origin.add(Vec2::new(*dx, 0.0)),
                        speed,
                        BulletKind::TripleShot,
                    )
                })
                .collect()
        } else {
            let kind = if self.fast_fire.is_active() {
                BulletKind::FastFire
            } else {
                BulletKind::Normal
            };
            vec![Bullet::new(self.id, origin, speed, kind)]
        }
    }

    /// Fire-rate multiplier including the fast-fire power-up.
    pub fn fire_rate_multiplier(&self) -> f32 {
        let bonus = if self.fast_fire.is_active() { 2.0 } else { 1.0 };
        self.avatar.fire_rate_multiplier() * bonus
    }

    pub fn shoot_cooldown(&self) -> f32 {
        self.shoot_cooldown
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    /// Resolve a hit: the shield takes it if it can, otherwise a life is lost.
    pub fn hit(&mut self) -> HitOutcome {
        if self.shield.absorb_hit() {
            HitOutcome::Absorbed
        } else {
            self.lose_life();
            HitOutcome::LifeLost
        }
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn gain_life(&mut self) {
        if self.lives < self.max_lives {
            self.lives += 1;
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn has_shield(&self) -> bool {
        self.shield.is_active()
    }

    pub fn activate_shield(&mut self, strength: u32, duration: f32) {
        self.shield.activate(strength, duration);
    }

    pub fn activate_triple_shot(&mut self, duration: f32) {
        self.triple_shot.activate(duration);
    }

    pub fn activate_fast_fire(&mut self, duration: f32) {
        self.fast_fire.activate(duration);
    }

    /// Pre-activate the chosen start modifier.  Slow motion is global and is
    /// started by the session instead.
    pub fn apply_start_mod(&mut self, start_mod: StartMod) {
        self.start_mod = start_mod;
        match start_mod {
            StartMod::Shield => {
                self.activate_shield(config::SHIELD_STRENGTH, config::POWER_UP_DURATION)
            }
            StartMod::TripleShot => self.activate_triple_shot(config::POWER_UP_DURATION),
            StartMod::FastFire => self.activate_fast_fire(config::POWER_UP_DURATION),
            StartMod::SlowMotion | StartMod::None => {}
        }
    }

    /// Back to full lives and zero score with every effect cleared.
    pub fn reset(&mut self, position: Vec2) {
        self.position = position;
        self.lives = self.max_lives;
        self.score = 0;
        self.shoot_requested = false;
        self.shoot_timer = 0.0;
        self.shield = Shield::default();
        self.triple_shot = TimedEffect::default();
        self.fast_fire = TimedEffect::default();
        self.clamp_position();
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, config::PLAYER_SIZE, config::PLAYER_SIZE)
    }

    fn clamp_position(&mut self) {
        self.position.x = self.position.x.clamp(0.0, SCREEN_WIDTH - config::PLAYER_SIZE);
        self.position.y = self.position.y.clamp(0.0, SCREEN_HEIGHT - config::PLAYER_SIZE);
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    /// Type index, always in `0..ENEMY_TYPE_COUNT`.
    pub kind: usize,
    /// Top-left corner.
    pub position: Vec2,
    pub size: f32,
    pub speed: f32,
    pub shoot_cooldown: f32,
    pub shoot_timer: f32,
    pub active: bool,
}

impl Enemy {
    /// Enemy with the tier's base stats and no random variance.
    pub fn new(kind: usize, position: Vec2, difficulty: Difficulty) -> Self {
        Enemy {
            kind: kind % config::ENEMY_TYPE_COUNT,
            position,
            size: config::ENEMY_BASE_SIZE,
            speed: config::enemy_speed(difficulty),
            shoot_cooldown: config::enemy_shoot_cooldown(difficulty),
            shoot_timer: 0.0,
            active: true,
        }
    }

    /// Random type, size, speed and cooldown, entering just above the top edge.
    pub fn spawn(difficulty: Difficulty, rng: &mut impl Rng) -> Self {
        let kind = rng.gen_range(0..config::ENEMY_TYPE_COUNT);
        let size = config::ENEMY_BASE_SIZE + rng.gen_range(-15i32..=15) as f32;
        let x = rng.gen_range(0.0..(SCREEN_WIDTH - size));

        let mut enemy = Enemy::new(kind, Vec2::new(x, -size), difficulty);
        enemy.size = size;

        let speed_variance = rng.gen_range(-25i32..=50) as f32 / 100.0;
        enemy.speed += enemy.speed * speed_variance;

        let cooldown_variance = rng.gen_range(-20i32..=20) as f32 / 100.0;
        enemy.shoot_cooldown += enemy.shoot_cooldown * cooldown_variance;
        enemy.shoot_cooldown = enemy.shoot_cooldown.max(config::ENEMY_MIN_SHOOT_COOLDOWN);

        enemy
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.position.y += self.speed * dt;
        self.shoot_timer += dt;
        if self.position.y > SCREEN_HEIGHT {
            self.active = false;
        }
    }

    pub fn wants_to_shoot(&self) -> bool {
        self.active && self.shoot_timer >= self.shoot_cooldown
    }

    /// Fire from the bottom centre if the cooldown has elapsed.
    pub fn shoot(&mut self, difficulty: Difficulty) -> Option<EnemyBullet> {
        if !self.wants_to_shoot() {
            return None;
        }
        self.shoot_timer = 0.0;
        let origin = Vec2::new(self.position.x + self.size / 2.0, self.position.y + self.size);
        Some(EnemyBullet::new(
            origin,
            config::enemy_bullet_speed(difficulty),
            self.bullet_color(),
        ))
    }

    pub fn score_value(&self) -> u32 {
        match self.kind {
            0 => 10,
            1 => 15,
            2 => 20,
            3 => 25,
            _ => 30,
        }
    }

    pub fn bullet_color(&self) -> BulletColor {
        match self.kind {
            0 => BulletColor::Purple,
            1 => BulletColor::DarkGreen,
            2 => BulletColor::Orange,
            3 => BulletColor::Pink,
            _ => BulletColor::SkyBlue,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size, self.size)
    }
}

impl Active for Enemy {
    fn is_active(&self) -> bool {
        self.active
    }
}

// ── Boss ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Boss {
    pub difficulty: Difficulty,
    pub position: Vec2,
    /// Centre of the oscillation path.
    pub origin: Vec2,
    pub health: u32,
    pub max_health: u32,
    movement_timer: f32,
    shoot_timer: f32,
    shoot_cooldown: f32,
}

impl Boss {
    pub fn new(difficulty: Difficulty) -> Self {
        let origin = Vec2::new((SCREEN_WIDTH - config::BOSS_WIDTH) / 2.0, config::BOSS_START_Y);
        let max_health = config::boss_max_health(difficulty);
        Boss {
            difficulty,
            position: origin,
            origin,
            health: max_health,
            max_health,
            movement_timer: 0.0,
            shoot_timer: 0.0,
            shoot_cooldown: config::boss_shoot_cooldown(difficulty),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.movement_timer += dt;
        self.position = self.path_at(self.movement_timer);
        self.shoot_timer += dt;
    }

    /// Horizontal sine sweep with a small vertical bob, kept on screen.
    fn path_at(&self, t: f32) -> Vec2 {
        let horizontal = config::boss_movement_speed(self.difficulty);
        let vertical = horizontal * 0.5;
        let amplitude = config::boss_movement_amplitude(self.difficulty);

        let x = self.origin.x + amplitude * (t * horizontal).sin();
        let y = self.origin.y + 20.0 * (t * vertical * 2.0).sin();
        Vec2::new(
            x.clamp(0.0, SCREEN_WIDTH - config::BOSS_WIDTH),
            y.clamp(config::BOSS_MIN_Y, config::BOSS_MAX_Y),
        )
    }

    pub fn wants_to_shoot(&self) -> bool {
        self.shoot_timer >= self.shoot_cooldown
    }

    /// Fire the difficulty's fan of shots if the cooldown has elapsed.
    pub fn shoot(&mut self) -> Vec<EnemyBullet> {
        if !self.wants_to_shoot() {
            return Vec::new();
        }
        self.shoot_timer = 0.0;

        let speed = config::boss_bullet_speed(self.difficulty);
        let muzzle = |fraction: f32| {
            Vec2::new(
                self.position.x + config::BOSS_WIDTH * fraction,
                self.position.y + config::BOSS_HEIGHT,
            )
        };

        let mut shots = vec![
            EnemyBullet::new(muzzle(0.25), speed, BulletColor::Blue),
            EnemyBullet::new(muzzle(0.75), speed, BulletColor::Blue),
        ];
        if self.difficulty >= Difficulty::Medium {
            shots.push(EnemyBullet::new(muzzle(0.5), speed, BulletColor::DarkBlue));
        }
        if self.difficulty >= Difficulty::Hard {
            shots.push(EnemyBullet::new(muzzle(0.15), speed * 0.8, BulletColor::Purple));
            shots.push(EnemyBullet::new(muzzle(0.85), speed * 0.8, BulletColor::Purple));
        }
        shots
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    pub fn health_ratio(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, config::BOSS_WIDTH, config::BOSS_HEIGHT)
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// Upward-moving player bullet.  `position` is the centre.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub owner: usize,
    pub position: Vec2,
    pub speed: f32,
    pub kind: BulletKind,
    pub active: bool,
}

impl Bullet {
    pub fn new(owner: usize, position: Vec2, speed: f32, kind: BulletKind) -> Self {
        Bullet { owner, position, speed, kind, active: true }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.position.y -= self.speed * dt;
        if self.position.y + config::PLAYER_BULLET_RADIUS < 0.0 {
            self.active = false;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, config::PLAYER_BULLET_RADIUS * 2.0)
    }
}

impl Active for Bullet {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Downward-moving enemy or boss bullet.  `position` is the centre.
#[derive(Clone, Debug)]
pub struct EnemyBullet {
    pub position: Vec2,
    pub speed: f32,
    pub color: BulletColor,
    pub active: bool,
}

impl EnemyBullet {
    pub fn new(position: Vec2, speed: f32, color: BulletColor) -> Self {
        EnemyBullet { position, speed, color, active: true }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.position.y += self.speed * dt;
        if self.position.y - config::ENEMY_BULLET_RADIUS > SCREEN_HEIGHT {
            self.active = false;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, config::ENEMY_BULLET_RADIUS * 2.0)
    }
}

impl Active for EnemyBullet {
    fn is_active(&self) -> bool {
        self.active
    }
}

// ── Power-ups & effects ──────────────────────────────────────────────────────

/// Falling collectible.  `position` is the centre; the pickup box pulses.
#[derive(Clone, Debug)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub position: Vec2,
    pub speed: f32,
    pub phase: f32,
    pub rotation: f32,
    pub active: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, position: Vec2) -> Self {
        PowerUp {
            kind,
            position,
            speed: config::POWER_UP_FALL_SPEED,
            phase: 0.0,
            rotation: 0.0,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.position.y += self.speed * dt;
        self.phase += dt;
        self.rotation = (self.rotation + 120.0 * dt) % 360.0;
        if self.position.y - config::POWER_UP_SIZE > SCREEN_HEIGHT {
            self.active = false;
        }
    }

    pub fn pulse_scale(&self) -> f32 {
        1.0 + 0.1 * (self.phase * 4.0).sin()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, config::POWER_UP_SIZE * self.pulse_scale())
    }
}

impl Active for PowerUp {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Purely cosmetic blast left behind by a kill.
#[derive(Clone, Debug)]
pub struct Explosion {
    /// Top-left corner of the destroyed sprite.
    pub position: Vec2,
    pub size: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl Explosion {
    pub fn new(position: Vec2, size: f32) -> Self {
        Explosion { position, size, elapsed: 0.0, duration: config::EXPLOSION_DURATION }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Remaining fraction of the blast animation.
    pub fn progress(&self) -> f32 {
        (1.0 - self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size, self.size)
    }
}

impl Active for Explosion {
    fn is_active(&self) -> bool {
        !self.is_finished()
    }
}
