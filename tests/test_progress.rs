use space_invaders::config::Difficulty;
use space_invaders::entities::{Avatar, StartMod};
use space_invaders::progress::*;
use space_invaders::save::{SaveError, SaveStore};
use space_invaders::session::{PlayerResult, SessionReport};

use std::path::PathBuf;

fn single_report(score: u32, boss_defeated: bool) -> SessionReport {
    SessionReport {
        players: vec![PlayerResult {
            name: "Ace".to_string(),
            avatar: Avatar::Red,
            start_mod: StartMod::Shield,
            score,
        }],
        total_score: score,
        enemies_killed: 12,
        boss_defeated,
        play_time: 30.0,
        difficulty: Difficulty::Hard,
        multiplayer: false,
    }
}

fn multiplayer_report(scores: [u32; 2]) -> SessionReport {
    SessionReport {
        players: scores
            .iter()
            .enumerate()
            .map(|(i, &score)| PlayerResult {
                name: format!("Player {}", i + 1),
                avatar: Avatar::Blue,
                start_mod: StartMod::None,
                score,
            })
            .collect(),
        total_score: scores.iter().sum(),
        enemies_killed: 3,
        boss_defeated: false,
        play_time: 10.0,
        difficulty: Difficulty::Easy,
        multiplayer: true,
    }
}

fn temp_save_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("space_invaders_{}_{}.json", name, std::process::id()))
}

// ── Profile defaults ──────────────────────────────────────────────────────────

#[test]
fn defaults_unlock_only_free_items() {
    let profile = Profile::default();
    assert_eq!(profile.coins, 0);
    assert!(profile.is_avatar_unlocked(Avatar::Blue));
    assert!(!profile.is_avatar_unlocked(Avatar::Green));
    assert!(profile.is_mod_unlocked(StartMod::None));
    assert!(!profile.is_mod_unlocked(StartMod::TripleShot));
}

// ── record_session ────────────────────────────────────────────────────────────

#[test]
fn single_player_run_earns_half_score_in_coins() {
    let mut profile = Profile::default();
    let earned = profile.record_session(&single_report(301, false));
    assert_eq!(earned, 150);
    assert_eq!(profile.coins, 150);
}

#[test]
fn single_player_run_updates_highscores_and_stats() {
    let mut profile = Profile::default();
    profile.record_session(&single_report(200, true));

    assert_eq!(profile.highscores.len(), 1);
    let entry = &profile.highscores[0];
    assert_eq!(entry.name, "Ace");
    assert_eq!(entry.score, 200);
    assert_eq!(entry.avatar, Avatar::Red);
    assert_eq!(entry.start_mod, StartMod::Shield);
    assert_eq!(entry.difficulty, Difficulty::Hard);

    let stats = &profile.statistics;
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.total_score, 200);
    assert_eq!(stats.total_coins, 100);
    assert_eq!(stats.total_kills, 12);
    assert_eq!(stats.boss_defeats, 1);
    assert_eq!(stats.play_time, 30.0);
    assert_eq!(stats.avatar_usage[Avatar::Red.index()], 1);
    assert_eq!(stats.difficulty_plays[Difficulty::Hard.index()], 1);
    assert_eq!(stats.difficulty_wins[Difficulty::Hard.index()], 1);
    assert_eq!(stats.most_used_avatar(), Some(Avatar::Red));
}

#[test]
fn a_loss_counts_as_play_not_win() {
    let mut profile = Profile::default();
    profile.record_session(&single_report(50, false));
    let stats = &profile.statistics;
    assert_eq!(stats.difficulty_plays[Difficulty::Hard.index()], 1);
    assert_eq!(stats.difficulty_wins[Difficulty::Hard.index()], 0);
    assert_eq!(stats.boss_defeats, 0);
}

#[test]
fn multiplayer_only_tracks_best_combined_score() {
    let mut profile = Profile::default();
    assert_eq!(profile.record_session(&multiplayer_report([100, 50])), 0);
    assert_eq!(profile.best_multiplayer_score, 150);

    profile.record_session(&multiplayer_report([10, 10]));
    assert_eq!(profile.best_multiplayer_score, 150);

    assert_eq!(profile.coins, 0);
    assert!(profile.highscores.is_empty());
    assert_eq!(profile.statistics.games_played, 0);
}

#[test]
fn highscores_stay_sorted_and_capped() {
    let mut profile = Profile::default();
    for score in [30, 500, 10, 250, 90, 400, 70, 60, 300, 20, 80, 5] {
        profile.record_session(&single_report(score, false));
    }

    let scores: Vec<u32> = profile.highscores.iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![500, 400, 300, 250, 90, 80, 70, 60, 30, 20]);
    assert_eq!(profile.best_score(), 500);
    assert_eq!(profile.statistics.games_played, 12);
}

#[test]
fn average_score_handles_no_games() {
    let stats = Statistics::default();
    assert_eq!(stats.average_score(), 0.0);
    assert_eq!(stats.most_used_avatar(), None);
}

// ── Purchases ─────────────────────────────────────────────────────────────────

#[test]
fn purchase_requires_enough_coins() {
    let mut profile = Profile::default();
    profile.coins = 29;
    assert_eq!(
        profile.purchase_avatar(Avatar::Green),
        Err(ProgressError::NotEnoughCoins { needed: 30, available: 29 })
    );
    assert_eq!(profile.coins, 29);
    assert!(!profile.is_avatar_unlocked(Avatar::Green));
}

#[test]
fn purchase_unlocks_and_is_idempotent() {
    let mut profile = Profile::default();
    profile.coins = 70;

    assert_eq!(profile.purchase_avatar(Avatar::Purple), Ok(true));
    assert_eq!(profile.coins, 40);
    assert!(profile.is_avatar_unlocked(Avatar::Purple));

    assert_eq!(profile.purchase_avatar(Avatar::Purple), Ok(false));
    assert_eq!(profile.coins, 40);

    assert_eq!(profile.purchase_mod(StartMod::SlowMotion), Ok(true));
    assert_eq!(profile.coins, 10);
    assert_eq!(profile.purchase_mod(StartMod::None), Ok(false));
}

// ── SaveStore ─────────────────────────────────────────────────────────────────

#[test]
fn missing_save_file_gives_default_profile() {
    let store = SaveStore::new(temp_save_path("missing"));
    let _ = std::fs::remove_file(store.path());
    let profile = store.load().expect("missing file is not an error");
    assert_eq!(profile, Profile::default());
}

#[test]
fn profile_survives_save_and_load() {
    let store = SaveStore::new(temp_save_path("persist"));
    let mut profile = Profile::default();
    profile.record_session(&single_report(120, true));
    profile.coins = 90;
    profile.purchase_avatar(Avatar::Yellow).expect("enough coins");

    store.save(&profile).expect("save");
    let loaded = store.load().expect("load");
    let _ = std::fs::remove_file(store.path());

    assert_eq!(loaded, profile);
    assert!(loaded.is_avatar_unlocked(Avatar::Yellow));
}

#[test]
fn corrupt_save_file_is_reported() {
    let store = SaveStore::new(temp_save_path("corrupt"));
    std::fs::write(store.path(), "{ not json").expect("write");
    let result = store.load();
    let _ = std::fs::remove_file(store.path());

    assert!(matches!(result, Err(SaveError::Format(_))));
}

#[test]
fn corrupt_save_file_can_be_moved_aside() {
    let store = SaveStore::new(temp_save_path("backup"));
    std::fs::write(store.path(), "{ not json").expect("write");

    let backup = store.back_up().expect("back up");
    let kept = std::fs::read_to_string(&backup).expect("read backup");
    let original_exists = store.path().exists();
    let reloaded = store.load().expect("load after backup");
    let _ = std::fs::remove_file(&backup);

    assert_eq!(kept, "{ not json");
    assert!(backup.to_string_lossy().ends_with(".json.bak"));
    assert!(!original_exists);
    assert_eq!(reloaded, Profile::default());
}
