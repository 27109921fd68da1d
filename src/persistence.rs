//! High score persistence
//!
//! The only state that outlives a session is a single integer. It is stored
//! as plain text so it can be inspected or reset by hand.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Where the best score is kept between runs
pub trait HighScoreStore {
    /// Stored high score, or 0 if none has been saved or it cannot be read
    fn load(&self) -> u32;

    fn save(&mut self, score: u32) -> Result<()>;
}

/// High score kept in a text file containing just the number
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "Ignoring malformed high score {:?} in {:?}",
                    contents.trim(),
                    self.path
                );
                0
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No high score file at {:?}", self.path);
                0
            }
            Err(e) => {
                warn!("Failed to read high score from {:?}: {}", self.path, e);
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        std::fs::write(&self.path, score.to_string())
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        Ok(())
    }
}

/// High score that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    score: Option<u32>,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        Self { score: Some(score) }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.score.unwrap_or(0)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.score = Some(score);
        Ok(())
    }
}
