use space_invaders::collision::{self, apply_power_up};
use space_invaders::config::{self, Difficulty};
use space_invaders::entities::*;
use space_invaders::input::FrameInput;
use space_invaders::session::{Session, SessionSetup};
use space_invaders::types::{Rect, Vec2};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_session(difficulty: Difficulty) -> Session {
    Session::new(SessionSetup::single("Tester", Avatar::Blue, StartMod::None, difficulty))
}

fn player_center(session: &Session, id: usize) -> Vec2 {
    session.players[id].bounds().center()
}

// ── Scenario A: bullet kills an enemy ─────────────────────────────────────────

#[test]
fn bullet_destroys_enemy_and_awards_type_score() {
    let mut session = make_session(Difficulty::Medium);
    let mut rng = seeded_rng();

    let enemy_pos = Vec2::new(600.0, 300.0);
    session.enemies.insert(Enemy::new(2, enemy_pos, Difficulty::Medium));
    // Centred under the enemy, close enough to meet it within one frame
    session
        .bullets
        .insert(Bullet::new(0, Vec2::new(632.0, 400.0), 500.0, BulletKind::Normal));

    let outcome = session.step(&FrameInput::default(), 0.1, &mut rng);

    assert_eq!(outcome.enemies_destroyed, 1);
    assert_eq!(session.players[0].score, 20);
    assert_eq!(session.enemies_killed, 1);

    // Both were swept in the same frame
    assert!(session.enemies.is_empty());
    assert!(session.bullets.is_empty());

    // Explosion sits where the enemy was when it died
    assert_eq!(session.explosions.len(), 1);
    let explosion = session.explosions.iter().next().expect("one explosion");
    assert_eq!(explosion.position.x, enemy_pos.x);
    assert!((explosion.position.y - 318.0).abs() < 1e-3);
    assert_eq!(explosion.size, config::ENEMY_BASE_SIZE);
}

#[test]
fn one_bullet_kills_only_the_first_enemy() {
    let mut session = make_session(Difficulty::Medium);
    let mut rng = seeded_rng();

    session.enemies.insert(Enemy::new(0, Vec2::new(600.0, 300.0), Difficulty::Medium));
    session.enemies.insert(Enemy::new(4, Vec2::new(600.0, 300.0), Difficulty::Medium));
    session
        .bullets
        .insert(Bullet::new(0, Vec2::new(632.0, 332.0), 500.0, BulletKind::Normal));

    let outcome = collision::resolve(&mut session, &mut rng);

    assert_eq!(outcome.enemies_destroyed, 1);
    let states: Vec<bool> = session.enemies.iter().map(|e| e.active).collect();
    assert_eq!(states, vec![false, true]);
    assert_eq!(session.players[0].score, 10);
}

#[test]
fn score_goes_to_the_bullet_owner() {
    let mut session = Session::new(SessionSetup::multiplayer(
        Avatar::Blue,
        Avatar::Blue,
        Difficulty::Easy,
    ));
    let mut rng = seeded_rng();

    session.enemies.insert(Enemy::new(3, Vec2::new(600.0, 300.0), Difficulty::Easy));
    session
        .bullets
        .insert(Bullet::new(1, Vec2::new(632.0, 332.0), 500.0, BulletKind::Normal));

    collision::resolve(&mut session, &mut rng);
    assert_eq!(session.players[0].score, 0);
    assert_eq!(session.players[1].score, 25);
}

#[test]
fn drop_rate_follows_difficulty() {
    let mut rng = seeded_rng();
    let drops = (0..10_000)
        .filter(|_| space_invaders::spawn::roll_power_up_drop(Difficulty::Easy, &mut rng).is_some())
        .count();
    assert!((1_200..=1_800).contains(&drops), "drops = {}", drops);
}

// ── Scenario B: boss takes exactly max-health hits ────────────────────────────

#[test]
fn boss_defeated_exactly_on_last_hit() {
    let mut session = make_session(Difficulty::Medium);
    let mut rng = seeded_rng();
    session.spawn_boss();
    assert!(session.boss_active());

    let target = session.boss.as_ref().map(|b| b.bounds().center()).expect("boss present");

    for hit in 1..=20u32 {
        session.bullets.insert(Bullet::new(0, target, 500.0, BulletKind::Normal));
        let outcome = collision::resolve(&mut session, &mut rng);
        session.cleanup();

        assert_eq!(outcome.boss_hits, 1);
        if hit < 20 {
            assert!(session.boss_active(), "boss gone after only {} hits", hit);
            assert_eq!(session.boss.as_ref().map(|b| b.health), Some(20 - hit));
            assert!(!outcome.boss_defeated);
        } else {
            assert!(!session.boss_active());
            assert!(outcome.boss_defeated);
        }
    }

    assert!(session.boss_defeated);
    assert_eq!(session.players[0].score, config::BOSS_DEFEAT_BONUS);
    assert_eq!(session.explosions.len(), 1);
    assert!(session.bullets.is_empty());
}

#[test]
fn extra_bullets_after_boss_death_are_kept() {
    let mut session = make_session(Difficulty::Easy);
    let mut rng = seeded_rng();
    session.spawn_boss();
    if let Some(boss) = session.boss.as_mut() {
        boss.health = 1;
    }
    let target = session.boss.as_ref().map(|b| b.bounds().center()).expect("boss present");

    session.bullets.insert(Bullet::new(0, target, 500.0, BulletKind::Normal));
    session.bullets.insert(Bullet::new(0, target, 500.0, BulletKind::Normal));
    let outcome = collision::resolve(&mut session, &mut rng);

    assert!(outcome.boss_defeated);
    assert_eq!(outcome.boss_hits, 1);
    assert_eq!(session.bullets.iter().filter(|b| b.active).count(), 1);
}

// ── Scenario C: shield absorbs an enemy collision ─────────────────────────────

#[test]
fn shield_absorbs_enemy_collision() {
    let mut session = make_session(Difficulty::Medium);
    let mut rng = seeded_rng();
    session.players[0].activate_shield(1, config::POWER_UP_DURATION);

    let pos = session.players[0].position;
    session
        .enemies
        .insert(Enemy::new(0, Vec2::new(pos.x + 20.0, pos.y + 20.0), Difficulty::Medium));

    let outcome = collision::resolve(&mut session, &mut rng);

    assert_eq!(outcome.hits_absorbed, 1);
    assert_eq!(outcome.lives_lost, 0);
    assert!(session.enemies.iter().all(|e| !e.active));
    assert_eq!(session.players[0].shield.strength(), 0);
    assert!(!session.players[0].has_shield());
    assert_eq!(session.players[0].lives, 3);
    // Absorbed hits leave no explosion
    assert!(session.explosions.is_empty());
}

#[test]
fn enemy_collision_without_shield_costs_life_and_explodes() {
    let mut session = make_session(Difficulty::Medium);
    let mut rng = seeded_rng();
    let pos = session.players[0].position;
    session.enemies.insert(Enemy::new(0, pos, Difficulty::Medium));
    session
        .enemies
        .insert(Enemy::new(1, Vec2::new(pos.x + 40.0, pos.y), Difficulty::Medium));

    let outcome = collision::resolve(&mut session, &mut rng);

    // Each colliding enemy is resolved on its own
    assert_eq!(outcome.lives_lost, 2);
    assert_eq!(session.players[0].lives, 1);
    assert_eq!(session.explosions.len(), 2);
}

#[test]
fn enemy_bullet_is_consumed_either_way() {
    let mut session = make_session(Difficulty::Medium);
    let mut rng = seeded_rng();
    let center = player_center(&session, 0);

    session.players[0].activate_shield(3, config::POWER_UP_DURATION);
    session.enemy_bullets.insert(EnemyBullet::new(center, 280.0, BulletColor::Orange));
    let outcome = collision::resolve(&mut session, &mut rng);
    assert_eq!(outcome.hits_absorbed, 1);
    assert_eq!(session.players[0].shield.strength(), 2);
    assert!(session.enemy_bullets.iter().all(|b| !b.active));

    session.cleanup();
    session.players[0].shield = Default::default();
    session.enemy_bullets.insert(EnemyBullet::new(center, 280.0, BulletColor::Orange));
    let outcome = collision::resolve(&mut session, &mut rng);
    assert_eq!(outcome.lives_lost, 1);
    assert_eq!(session.players[0].lives, 2);
    assert!(session.enemy_bullets.iter().all(|b| !b.active));
}

#[test]
fn dead_players_are_not_hit() {
    let mut session = Session::new(SessionSetup::multiplayer(
        Avatar::Blue,
        Avatar::Blue,
        Difficulty::Medium,
    ));
    let mut rng = seeded_rng();
    session.players[1].lives = 0;
    let pos = session.players[1].position;
    session.enemies.insert(Enemy::new(0, pos, Difficulty::Medium));

    let outcome = collision::resolve(&mut session, &mut rng);
    assert_eq!(outcome.lives_lost, 0);
    assert!(session.enemies.iter().all(|e| e.active));
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[test]
fn picking_up_power_up_applies_it_to_collector() {
    let mut session = make_session(Difficulty::Medium);
    let mut rng = seeded_rng();
    let center = player_center(&session, 0);
    session.power_ups.insert(PowerUp::new(PowerUpKind::TripleShot, center));

    let outcome = collision::resolve(&mut session, &mut rng);

    assert_eq!(outcome.power_ups_collected, 1);
    assert!(session.players[0].triple_shot.is_active());
    assert!(session.power_ups.iter().all(|p| !p.active));
}

#[test]
fn shield_power_up_sets_fixed_strength() {
    let mut session = make_session(Difficulty::Medium);
    let Session { players, slow_motion, .. } = &mut session;
    apply_power_up(PowerUpKind::Shield, &mut players[0], slow_motion);
    assert_eq!(players[0].shield.strength(), config::SHIELD_STRENGTH);
    assert!(players[0].has_shield());
    assert!(!slow_motion.is_active());
}

#[test]
fn slow_motion_power_up_is_global() {
    let mut session = make_session(Difficulty::Medium);
    let Session { players, slow_motion, .. } = &mut session;
    apply_power_up(PowerUpKind::SlowMotion, &mut players[0], slow_motion);
    assert!(slow_motion.is_active());
    assert!(!players[0].triple_shot.is_active());
    assert!(!players[0].has_shield());
    assert_eq!(session.time_scale(), config::SLOW_MOTION_FACTOR);
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[test]
fn touching_edges_do_not_intersect() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 0.0, 10.0, 10.0);
    let c = Rect::new(9.0, 9.0, 10.0, 10.0);
    assert!(!a.intersects(&b));
    assert!(a.intersects(&c));
    assert!(c.intersects(&a));
}
