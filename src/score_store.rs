/// Last/high score persistence.
///
/// The file holds two lines, `last\nhigh\n`.  Reading never fails: a missing
/// or unreadable record just means nobody has played yet.

use std::fs;
use std::path::{Path, PathBuf};

use crate::entities::ScoreRecord;
use crate::error::{GameError, Result};

#[derive(Clone, Debug)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ScoreStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ScoreRecord {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), %err, "no score record, starting fresh");
                return ScoreRecord::default();
            }
        };
        match parse_record(&text) {
            Some(record) => record,
            None => {
                tracing::warn!(path = %self.path.display(), "malformed score record, using zeroes");
                ScoreRecord::default()
            }
        }
    }

    /// Overwrite the record in place.
    pub fn save(&self, record: &ScoreRecord) -> Result<()> {
        fs::write(&self.path, format_record(record)).map_err(|source| GameError::ScoreWrite {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            last = record.last_score,
            high = record.high_score,
            "scores saved"
        );
        Ok(())
    }
}

fn parse_record(text: &str) -> Option<ScoreRecord> {
    let mut lines = text.lines();
    let last_score = lines.next()?.trim().parse().ok()?;
    let high_score = lines.next()?.trim().parse().ok()?;
    Some(ScoreRecord { last_score, high_score })
}

fn format_record(record: &ScoreRecord) -> String {
    format!("{}\n{}\n", record.last_score, record.high_score)
}
