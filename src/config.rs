use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, Result};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "jump_mania.ron";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub score_path: PathBuf,
    /// Sprite sheet override; `None` draws with the sheet built into the binary.
    pub assets_path: Option<PathBuf>,
    pub log_path: PathBuf,
    pub target_fps: u32,
    pub jump_volume: f32,
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            score_path: home.join(".jump_mania_scores"),
            assets_path: None,
            log_path: PathBuf::from("jump_mania.log"),
            target_fps: 60,
            jump_volume: 0.5,
            music_volume: 0.3,
            muted: false,
        }
    }
}

impl Config {
    /// Read an explicit config file.  Unlike the score record, a config that
    /// exists but cannot be parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `explicit` must exist; otherwise fall back to `jump_mania.ron` in the
    /// working directory, then to the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn frame_millis(&self) -> u64 {
        1000 / u64::from(self.target_fps.max(1))
    }
}
