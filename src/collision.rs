//! Collision detection and resolution.
//!
//! Five passes, always in this order:
//!   1. player bullets ↔ enemies
//!   2. player bullets ↔ boss
//!   3. players ↔ enemies
//!   4. enemy bullets ↔ players
//!   5. players ↔ power-ups
//!
//! Within a pass entities are visited in slot order and deactivated on the
//! spot, so the first match wins and later checks skip anything already hit.

use log::{debug, info};
use rand::Rng;

use crate::config;
use crate::effects::SlowMotion;
use crate::entities::{Explosion, HitOutcome, Player, PowerUp, PowerUpKind};
use crate::session::Session;
use crate::spawn::roll_power_up_drop;

/// Tally of what happened during one resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub enemies_destroyed: u32,
    pub boss_hits: u32,
    pub boss_defeated: bool,
    pub lives_lost: u32,
    pub hits_absorbed: u32,
    pub power_ups_dropped: u32,
    pub power_ups_collected: u32,
}

pub fn resolve(session: &mut Session, rng: &mut impl Rng) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    bullets_vs_enemies(session, rng, &mut outcome);
    bullets_vs_boss(session, &mut outcome);
    players_vs_enemies(session, &mut outcome);
    enemy_bullets_vs_players(session, &mut outcome);
    players_vs_power_ups(session, &mut outcome);
    outcome
}

fn bullets_vs_enemies(session: &mut Session, rng: &mut impl Rng, outcome: &mut CollisionOutcome) {
    let Session { bullets, enemies, players, explosions, power_ups, difficulty, .. } = session;

    for bullet in bullets.iter_mut() {
        if !bullet.active {
            continue;
        }
        for enemy in enemies.iter_mut() {
            if !enemy.active || !bullet.bounds().intersects(&enemy.bounds()) {
                continue;
            }
            bullet.active = false;
            enemy.active = false;

            if let Some(owner) = players.get_mut(bullet.owner) {
                owner.add_score(enemy.score_value());
            }
            explosions.insert(Explosion::new(enemy.position, enemy.size));
            outcome.enemies_destroyed += 1;

            if let Some(kind) = roll_power_up_drop(*difficulty, rng) {
                debug!("Enemy dropped {:?}", kind);
                power_ups.insert(PowerUp::new(kind, enemy.bounds().center()));
                outcome.power_ups_dropped += 1;
            }
            break;
        }
    }

    session.enemies_killed += outcome.enemies_destroyed;
}

fn bullets_vs_boss(session: &mut Session, outcome: &mut CollisionOutcome) {
    let Session { bullets, boss, players, explosions, .. } = session;
    let Some(target) = boss.as_mut() else {
        return;
    };

    let mut defeated_by = None;
    for bullet in bullets.iter_mut() {
        if !bullet.active || !bullet.bounds().intersects(&target.bounds()) {
            continue;
        }
        bullet.active = false;
        target.take_damage(config::BOSS_HIT_DAMAGE);
        outcome.boss_hits += 1;
        if target.is_defeated() {
            defeated_by = Some(bullet.owner);
            break;
        }
    }

    let Some(owner) = defeated_by else {
        return;
    };
    if let Some(player) = players.get_mut(owner) {
        player.add_score(config::BOSS_DEFEAT_BONUS);
    }
    explosions.insert(Explosion::new(target.position, config::BOSS_WIDTH));
    *boss = None;

    session.boss_defeated = true;
    outcome.boss_defeated = true;
    info!("Boss defeated by player {} at {:.1}s", owner + 1, session.elapsed);
}

fn players_vs_enemies(session: &mut Session, outcome: &mut CollisionOutcome) {
    let Session { players, enemies, explosions, .. } = session;

    for player in players.iter_mut().filter(|p| p.is_alive()) {
        for enemy in enemies.iter_mut() {
            if !enemy.active || !player.bounds().intersects(&enemy.bounds()) {
                continue;
            }
            enemy.active = false;
            match player.hit() {
                HitOutcome::Absorbed => outcome.hits_absorbed += 1,
                HitOutcome::LifeLost => {
                    outcome.lives_lost += 1;
                    explosions.insert(Explosion::new(enemy.position, enemy.size));
                }
            }
        }
    }
}

fn enemy_bullets_vs_players(session: &mut Session, outcome: &mut CollisionOutcome) {
    let Session { players, enemy_bullets, .. } = session;

    for player in players.iter_mut().filter(|p| p.is_alive()) {
        for shot in enemy_bullets.iter_mut() {
            if !shot.active || !player.bounds().intersects(&shot.bounds()) {
                continue;
            }
            shot.active = false;
            match player.hit() {
                HitOutcome::Absorbed => outcome.hits_absorbed += 1,
                HitOutcome::LifeLost => outcome.lives_lost += 1,
            }
        }
    }
}

fn players_vs_power_ups(session: &mut Session, outcome: &mut CollisionOutcome) {
    let Session { players, power_ups, slow_motion, .. } = session;

    for player in players.iter_mut().filter(|p| p.is_alive()) {
        for power_up in power_ups.iter_mut() {
            if !power_up.active || !player.bounds().intersects(&power_up.bounds()) {
                continue;
            }
            power_up.active = false;
            apply_power_up(power_up.kind, player, slow_motion);
            outcome.power_ups_collected += 1;
        }
    }
}

/// Grant a power-up.  Slow motion is global and ignores `player`.
pub fn apply_power_up(kind: PowerUpKind, player: &mut Player, slow_motion: &mut SlowMotion) {
    debug!("Player {} collected {:?}", player.id + 1, kind);
    match kind {
        PowerUpKind::Shield => {
            player.activate_shield(config::SHIELD_STRENGTH, config::POWER_UP_DURATION)
        }
        PowerUpKind::TripleShot => player.activate_triple_shot(config::POWER_UP_DURATION),
        PowerUpKind::SlowMotion => slow_motion.activate(config::POWER_UP_DURATION),
    }
}
