use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key under which the high score is stored, as a string-encoded integer
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Somewhere the high score survives between runs
pub trait HighScoreStore {
    /// Read the stored high score, `None` if nothing usable is stored
    fn load(&self) -> Result<Option<u32>>;

    /// Overwrite the stored high score
    fn save(&mut self, score: u32) -> Result<()>;
}

/// Default location: `<data dir>/snake_arcade/high_score.json`, falling back to
/// the working directory when the platform has no data dir.
pub fn default_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("snake_arcade"))
        .unwrap_or_default()
        .join("high_score.json")
}

/// A JSON object kept in one file
///
/// The high score is written as a string; a plain number is read too. Keys
/// other than [`HIGH_SCORE_KEY`] are left as they are, whatever their type.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse high score file {:?}", self.path))
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u32>> {
        let entries = self.read_entries()?;
        Ok(entries.get(HIGH_SCORE_KEY).and_then(parse_score))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        // An unreadable file is replaced rather than blocking the save
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(HIGH_SCORE_KEY.to_string(), Value::String(score.to_string()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json =
            serde_json::to_string_pretty(&entries).context("Failed to serialize high score")?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write high score to {:?}", tmp_path))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to move high score into {:?}", self.path))?;

        Ok(())
    }
}

fn parse_score(value: &Value) -> Option<u32> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

/// Keeps the high score for the lifetime of the process only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        Self { value: Some(score) }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>> {
        Ok(self.value)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.value = Some(score);
        Ok(())
    }
}
