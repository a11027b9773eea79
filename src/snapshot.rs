//! Read-only view of a session for the renderer.  Nothing in here can mutate
//! the simulation.

use crate::entities::{Avatar, BulletColor, BulletKind, PowerUpKind};
use crate::session::{Session, SessionStatus};
use crate::types::Rect;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpriteKind {
    Player { id: usize, avatar: Avatar, shielded: bool },
    Enemy { kind: usize },
    Boss,
    Bullet(BulletKind),
    EnemyBullet(BulletColor),
    PowerUp(PowerUpKind),
    /// Carries the remaining fraction of the blast.
    Explosion(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub bounds: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerHud {
    pub name: String,
    pub lives: u32,
    pub max_lives: u32,
    pub score: u32,
    pub shield_strength: u32,
    pub shield: f32,
    pub triple_shot: f32,
    pub fast_fire: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossHud {
    pub health: u32,
    pub max_health: u32,
    pub ratio: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Back to front: explosions and pickups first, players last.
    pub sprites: Vec<Sprite>,
    pub players: Vec<PlayerHud>,
    pub boss: Option<BossHud>,
    /// Remaining fraction of global slow motion, if running.
    pub slow_motion: Option<f32>,
    pub elapsed: f32,
    pub status: SessionStatus,
}

impl Session {
    pub fn snapshot(&self) -> Snapshot {
        let mut sprites = Vec::new();

        sprites.extend(self.explosions.iter().map(|e| Sprite {
            kind: SpriteKind::Explosion(e.progress()),
            bounds: e.bounds(),
        }));
        sprites.extend(self.power_ups.iter().filter(|p| p.active).map(|p| Sprite {
            kind: SpriteKind::PowerUp(p.kind),
            bounds: p.bounds(),
        }));
        sprites.extend(self.enemies.iter().filter(|e| e.active).map(|e| Sprite {
            kind: SpriteKind::Enemy { kind: e.kind },
            bounds: e.bounds(),
        }));
        if let Some(boss) = &self.boss {
            sprites.push(Sprite { kind: SpriteKind::Boss, bounds: boss.bounds() });
        }
        sprites.extend(self.enemy_bullets.iter().filter(|b| b.active).map(|b| Sprite {
            kind: SpriteKind::EnemyBullet(b.color),
            bounds: b.bounds(),
        }));
        sprites.extend(self.bullets.iter().filter(|b| b.active).map(|b| Sprite {
            kind: SpriteKind::Bullet(b.kind),
            bounds: b.bounds(),
        }));
        sprites.extend(self.players.iter().filter(|p| p.is_alive()).map(|p| Sprite {
            kind: SpriteKind::Player { id: p.id, avatar: p.avatar, shielded: p.has_shield() },
            bounds: p.bounds(),
        }));

        let players = self
            .players
            .iter()
            .map(|p| PlayerHud {
                name: p.name.clone(),
                lives: p.lives,
                max_lives: p.max_lives,
                score: p.score,
                shield_strength: p.shield.strength(),
                shield: p.shield.progress(),
                triple_shot: p.triple_shot.progress(),
                fast_fire: p.fast_fire.progress(),
            })
            .collect();

        Snapshot {
            sprites,
            players,
            boss: self.boss.as_ref().map(|b| BossHud {
                health: b.health,
                max_health: b.max_health,
                ratio: b.health_ratio(),
            }),
            slow_motion: self.slow_motion.is_active().then(|| self.slow_motion.progress()),
            elapsed: self.elapsed,
            status: self.status,
        }
    }
}
