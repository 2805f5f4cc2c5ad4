use anyhow::{Context, Result};
use clap::Parser;
use ratatui::layout::Rect;
use std::path::PathBuf;

use snake_arcade::audio::{AudioSink, Silent, TerminalBell};
use snake_arcade::game::GameConfig;
use snake_arcade::modes::{PlayMode, ViewportOverride};
use snake_arcade::persistence::{self, HighScoreStore, JsonFileStore, MemoryStore};
use snake_arcade::render::Renderer;
use snake_arcade::session::SessionController;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Classic arcade Snake in the terminal")]
struct Cli {
    /// JSON file with game rules; missing fields use the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Play-area width in world units (10 per cell); defaults to the terminal width
    #[arg(long)]
    width: Option<i32>,

    /// Play-area height in world units (10 per cell); defaults to the terminal height
    #[arg(long)]
    height: Option<i32>,

    /// Starting speed in ticks per second
    #[arg(long)]
    initial_speed: Option<f32>,

    /// Speed cap in ticks per second
    #[arg(long)]
    max_speed: Option<f32>,

    /// Where the high score is kept
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Keep the high score in memory only
    #[arg(long)]
    no_save: bool,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(speed) = self.initial_speed {
            config.initial_speed = speed;
        }
        if let Some(speed) = self.max_speed {
            config.max_speed = speed;
        }
        config.validate().context("Invalid game configuration")?;

        Ok(config)
    }

    fn high_score_store(&self) -> Box<dyn HighScoreStore> {
        if self.no_save {
            return Box::new(MemoryStore::new());
        }
        let path = self
            .high_score_file
            .clone()
            .unwrap_or_else(persistence::default_path);
        let store = JsonFileStore::new(path);
        log::info!("High score file: {:?}", store.path());
        Box::new(store)
    }

    fn audio(&self) -> Box<dyn AudioSink> {
        if self.mute {
            Box::new(Silent)
        } else {
            Box::new(TerminalBell::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        snake_arcade::logging::init(path)?;
    }

    let config = cli.game_config()?;
    let viewport = ViewportOverride {
        width: cli.width,
        height: cli.height,
    };

    // First session is sized to the terminal we start in
    let (columns, rows) = crossterm::terminal::size().context("Failed to read terminal size")?;
    let bounds = PlayMode::bounds_for(
        &Renderer::new(config.cell_size),
        &config,
        viewport,
        Rect::new(0, 0, columns, rows),
    );

    let controller =
        SessionController::new(config, bounds, cli.high_score_store(), cli.audio());
    let mut play_mode = PlayMode::new(controller, viewport);
    play_mode.run().await?;

    Ok(())
}
