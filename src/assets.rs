/// Character-art sprite sheet: the one built into the binary, or a RON file
/// named in the config.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::entities::{Rgb, SpriteKey};
use crate::error::{GameError, Result};

/// One image.  `bg` fills the whole destination rect before `rows` are
/// drawn; a sprite with only a background is a flat texture (sky, ground).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Sprite {
    #[serde(default)]
    pub fg: Option<Rgb>,
    #[serde(default)]
    pub bg: Option<Rgb>,
    #[serde(default)]
    pub rows: Vec<String>,
}

/// Compiled into the binary; used when no sheet path is configured.
const BUNDLED: &str = include_str!("../assets/sprites.ron");

#[derive(Clone, Debug, Deserialize)]
pub struct SpriteSheet {
    sprites: HashMap<SpriteKey, Sprite>,
}

impl SpriteSheet {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| GameError::AssetRead {
            path: path.to_path_buf(),
            source,
        })?;
        let sheet = Self::parse(&text).map_err(|err| match err {
            ParseFailure::Syntax(source) => GameError::AssetParse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::Missing(key) => GameError::MissingSprite(key),
        })?;
        tracing::info!(path = %path.display(), sprites = sheet.sprites.len(), "sprite sheet loaded");
        Ok(sheet)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_ron(BUNDLED)
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        Self::parse(text).map_err(|err| match err {
            ParseFailure::Syntax(source) => GameError::AssetParse {
                path: "<inline>".into(),
                source,
            },
            ParseFailure::Missing(key) => GameError::MissingSprite(key),
        })
    }

    fn parse(text: &str) -> std::result::Result<Self, ParseFailure> {
        let sheet: SpriteSheet = ron::from_str(text).map_err(ParseFailure::Syntax)?;
        if let Some(key) = SpriteKey::ALL
            .iter()
            .find(|key| !sheet.sprites.contains_key(key))
        {
            return Err(ParseFailure::Missing(*key));
        }
        Ok(sheet)
    }

    /// Every key is checked at load time, so lookups always succeed.
    pub fn get(&self, key: SpriteKey) -> &Sprite {
        &self.sprites[&key]
    }
}

enum ParseFailure {
    Syntax(ron::error::SpannedError),
    Missing(SpriteKey),
}
