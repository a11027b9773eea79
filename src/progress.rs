//! Meta-progression carried between runs: coins, unlocks, the highscore
//! table and lifetime statistics.

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::{self, Difficulty};
use crate::entities::{Avatar, StartMod};
use crate::session::SessionReport;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    #[error("Not enough coins: need {needed}, have {available}")]
    NotEnoughCoins { needed: u32, available: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub name: String,
    pub score: u32,
    pub avatar: Avatar,
    pub start_mod: StartMod,
    pub difficulty: Difficulty,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub games_played: u32,
    pub total_score: u64,
    pub total_coins: u64,
    pub total_kills: u64,
    pub boss_defeats: u32,
    /// Seconds.
    pub play_time: f64,
    /// Indexed by `Avatar::index`.
    pub avatar_usage: [u32; 5],
    /// Indexed by `Difficulty::index`.
    pub difficulty_plays: [u32; 3],
    pub difficulty_wins: [u32; 3],
}

impl Statistics {
    pub fn average_score(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_score as f64 / self.games_played as f64
        }
    }

    pub fn most_used_avatar(&self) -> Option<Avatar> {
        Avatar::ALL
            .iter()
            .copied()
            .filter(|a| self.avatar_usage[a.index()] > 0)
            .max_by_key(|a| self.avatar_usage[a.index()])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub coins: u32,
    pub highscores: Vec<HighscoreEntry>,
    pub statistics: Statistics,
    pub unlocked_avatars: Vec<Avatar>,
    pub unlocked_mods: Vec<StartMod>,
    pub best_multiplayer_score: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            coins: 0,
            highscores: Vec::new(),
            statistics: Statistics::default(),
            unlocked_avatars: vec![Avatar::Blue],
            unlocked_mods: vec![StartMod::None],
            best_multiplayer_score: 0,
        }
    }
}

impl Profile {
    /// Fold a finished run into the profile.  Returns the coins earned.
    pub fn record_session(&mut self, report: &SessionReport) -> u32 {
        if report.multiplayer {
            if report.total_score > self.best_multiplayer_score {
                info!("New multiplayer best: {}", report.total_score);
                self.best_multiplayer_score = report.total_score;
            }
            return 0;
        }

        let Some(player) = report.players.first() else {
            return 0;
        };

        let earned = report.total_score / 2;
        self.coins = self.coins.saturating_add(earned);
        self.add_highscore(HighscoreEntry {
            name: player.name.clone(),
            score: player.score,
            avatar: player.avatar,
            start_mod: player.start_mod,
            difficulty: report.difficulty,
        });

        let stats = &mut self.statistics;
        stats.games_played += 1;
        stats.total_score += u64::from(report.total_score);
        stats.total_coins += u64::from(earned);
        stats.total_kills += u64::from(report.enemies_killed);
        stats.play_time += f64::from(report.play_time);
        stats.avatar_usage[player.avatar.index()] += 1;
        stats.difficulty_plays[report.difficulty.index()] += 1;
        if report.boss_defeated {
            stats.boss_defeats += 1;
            stats.difficulty_wins[report.difficulty.index()] += 1;
        }

        info!(
            "Recorded run: score {}, {} coins earned, balance {}",
            report.total_score, earned, self.coins
        );
        earned
    }

    /// Insert keeping the table sorted by score, best first, capped.  Equal
    /// scores keep their arrival order.
    pub fn add_highscore(&mut self, entry: HighscoreEntry) {
        let at = self
            .highscores
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.highscores.len());
        self.highscores.insert(at, entry);
        self.highscores.truncate(config::MAX_HIGHSCORE_ENTRIES);
    }

    pub fn best_score(&self) -> u32 {
        self.highscores.first().map_or(0, |e| e.score)
    }

    pub fn is_avatar_unlocked(&self, avatar: Avatar) -> bool {
        avatar.cost() == 0 || self.unlocked_avatars.contains(&avatar)
    }

    pub fn is_mod_unlocked(&self, start_mod: StartMod) -> bool {
        start_mod.cost() == 0 || self.unlocked_mods.contains(&start_mod)
    }

    /// Unlock an avatar.  Already owned is a free no-op returning `Ok(false)`.
    pub fn purchase_avatar(&mut self, avatar: Avatar) -> Result<bool, ProgressError> {
        if self.is_avatar_unlocked(avatar) {
            return Ok(false);
        }
        self.spend(avatar.cost())?;
        self.unlocked_avatars.push(avatar);
        info!("Unlocked avatar {:?}, {} coins left", avatar, self.coins);
        Ok(true)
    }

    pub fn purchase_mod(&mut self, start_mod: StartMod) -> Result<bool, ProgressError> {
        if self.is_mod_unlocked(start_mod) {
            return Ok(false);
        }
        self.spend(start_mod.cost())?;
        self.unlocked_mods.push(start_mod);
        info!("Unlocked start mod {:?}, {} coins left", start_mod, self.coins);
        Ok(true)
    }

    fn spend(&mut self, cost: u32) -> Result<(), ProgressError> {
        if self.coins < cost {
            return Err(ProgressError::NotEnoughCoins { needed: cost, available: self.coins });
        }
        self.coins -= cost;
        Ok(())
    }
}
