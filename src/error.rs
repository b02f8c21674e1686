use std::path::PathBuf;

use thiserror::Error;

use crate::entities::SpriteKey;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read sprite sheet {path}")]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed sprite sheet {path}")]
    AssetParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("sprite sheet has no entry for {0:?}")]
    MissingSprite(SpriteKey),
    #[error("failed to read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to write scores to {path}")]
    ScoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("audio output unavailable: {0}")]
    Audio(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
