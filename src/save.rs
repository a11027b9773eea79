//! JSON save file holding the player's `Profile`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::progress::Profile;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Corrupt save file: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SaveStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is a fresh profile, not an error.
    pub fn load(&self) -> Result<Profile, SaveError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No save file at {}, starting fresh", self.path.display());
                return Ok(Profile::default());
            }
            Err(e) => return Err(e.into()),
        };
        let profile: Profile = serde_json::from_str(&contents)?;
        info!(
            "Loaded profile from {}: {} coins, {} highscores",
            self.path.display(),
            profile.coins,
            profile.highscores.len()
        );
        Ok(profile)
    }

    /// Move the current file aside to `<name>.bak` so a later `save` cannot
    /// overwrite it.  Replaces an older backup.
    pub fn back_up(&self) -> Result<PathBuf, SaveError> {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".bak");
        let backup = self.path.with_file_name(name);
        fs::rename(&self.path, &backup)?;
        info!("Moved {} to {}", self.path.display(), backup.display());
        Ok(backup)
    }

    pub fn save(&self, profile: &Profile) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, contents)?;
        debug!("Saved profile to {}", self.path.display());
        Ok(())
    }
}
