use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable game rules
///
/// Lengths are in world units; one cell is `cell_size` units wide. Speed is in
/// ticks per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Size of one grid cell; every position and move is a multiple of it
    pub cell_size: i32,
    /// Number of segments a fresh snake starts with
    pub initial_snake_length: usize,

    // Speed progression
    /// Ticks per second at the start of a session
    pub initial_speed: f32,
    /// Bump applied each time the score hits a multiple of `score_threshold`
    pub speed_increment: f32,
    /// Bump applied on every fruit once the score reaches `second_speed_threshold`
    pub speed_acceleration: f32,
    pub score_threshold: u32,
    pub second_speed_threshold: u32,
    /// Speed never goes above this
    pub max_speed: f32,

    // Big fruit
    /// A big fruit spawns every time this many small fruits have been eaten
    pub big_fruit_every: u32,
    pub big_fruit_score: u32,
    /// Per-axis distance under which the head eats the big fruit
    pub big_fruit_radius: i32,

    /// Largest play area, in world units
    pub max_viewport_width: i32,
    pub max_viewport_height: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 10,
            initial_snake_length: 4,
            initial_speed: 10.0,
            speed_increment: 1.0,
            speed_acceleration: 0.2,
            score_threshold: 10,
            second_speed_threshold: 50,
            max_speed: 25.0,
            big_fruit_every: 5,
            big_fruit_score: 5,
            big_fruit_radius: 20,
            max_viewport_width: 720,
            max_viewport_height: 480,
        }
    }
}

impl GameConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject rule sets the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.cell_size > 0, "cell_size must be positive");
        ensure!(
            self.initial_snake_length >= 1,
            "initial_snake_length must be at least 1"
        );
        ensure!(self.initial_speed > 0.0, "initial_speed must be positive");
        ensure!(
            self.max_speed >= self.initial_speed,
            "max_speed ({}) must not be below initial_speed ({})",
            self.max_speed,
            self.initial_speed
        );
        ensure!(
            self.speed_increment >= 0.0 && self.speed_acceleration >= 0.0,
            "speed increments must not be negative"
        );
        ensure!(self.score_threshold > 0, "score_threshold must be positive");
        ensure!(self.big_fruit_every > 0, "big_fruit_every must be positive");
        let Some((min_width, min_height)) = self.min_viewport() else {
            bail!(
                "initial_snake_length ({}) is too long for any play area",
                self.initial_snake_length
            );
        };
        ensure!(
            self.max_viewport_width >= min_width && self.max_viewport_height >= min_height,
            "max viewport is too small for the initial snake"
        );
        Ok(())
    }

    /// Smallest play area that still fits the initial snake centred, or `None`
    /// when that size does not fit in world coordinates
    fn min_viewport(&self) -> Option<(i32, i32)> {
        let length = i32::try_from(self.initial_snake_length).ok()?;
        let width = length.checked_mul(2)?.checked_mul(self.cell_size)?;
        let height = self.cell_size.checked_mul(4)?;
        Some((width, height))
    }

    /// Narrowest play area that still fits the initial snake centred
    pub fn min_viewport_width(&self) -> i32 {
        self.min_viewport().map_or(i32::MAX, |(width, _)| width)
    }

    pub fn min_viewport_height(&self) -> i32 {
        self.min_viewport().map_or(i32::MAX, |(_, height)| height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.cell_size, 10);
        assert_eq!(config.initial_snake_length, 4);
        assert_eq!(config.initial_speed, 10.0);
        assert_eq!(config.max_speed, 25.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_viewport() {
        let config = GameConfig::default();
        assert_eq!(config.min_viewport_width(), 80);
        assert_eq!(config.min_viewport_height(), 40);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_cell = GameConfig {
            cell_size: 0,
            ..Default::default()
        };
        assert!(zero_cell.validate().is_err());

        let slow_max = GameConfig {
            max_speed: 5.0,
            ..Default::default()
        };
        assert!(slow_max.validate().is_err());

        let stalled = GameConfig {
            initial_speed: 0.0,
            ..Default::default()
        };
        assert!(stalled.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_snake() {
        // Would wrap to zero if narrowed with `as`
        let huge: GameConfig =
            serde_json::from_str(r#"{ "initial_snake_length": 4294967296 }"#).unwrap();
        assert!(huge.validate().is_err());

        let too_long = GameConfig {
            initial_snake_length: 40,
            ..Default::default()
        };
        assert!(too_long.validate().is_err());

        let widest = GameConfig {
            initial_snake_length: 36,
            ..Default::default()
        };
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_speed": 30.0, "big_fruit_every": 3 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.max_speed, 30.0);
        assert_eq!(config.big_fruit_every, 3);
        assert_eq!(config.cell_size, 10);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "cell_size": -10 }}"#).unwrap();

        assert!(GameConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GameConfig::load(&dir.path().join("nope.json")).is_err());
    }
}
