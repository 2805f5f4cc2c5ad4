use rand::Rng;
use rand::rngs::ThreadRng;
use std::time::Duration;

use crate::audio::{AudioCue, AudioSink};
use crate::game::{Bounds, Direction, GameConfig, GameEngine, GameState, SessionPhase, StepResult};
use crate::input::DirectionInput;
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;

/// Owns the one live game and everything that reacts to it.
///
/// The controller is the only mutator of the game state. It turns step results
/// into sounds, high-score writes and phase changes; audio and storage failures
/// are logged and otherwise ignored.
pub struct SessionController<R = ThreadRng> {
    engine: GameEngine<R>,
    state: GameState,
    input: DirectionInput,
    high_score: u32,
    store: Box<dyn HighScoreStore>,
    audio: Box<dyn AudioSink>,
    metrics: GameMetrics,
    /// Bounds for the next session; the live one keeps its own
    next_bounds: Bounds,
    background_started: bool,
}

impl SessionController<ThreadRng> {
    pub fn new(
        config: GameConfig,
        bounds: Bounds,
        store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        Self::with_engine(GameEngine::new(config), bounds, store, audio)
    }
}

impl<R: Rng> SessionController<R> {
    pub fn with_engine(
        mut engine: GameEngine<R>,
        bounds: Bounds,
        store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let high_score = match store.load() {
            Ok(Some(score)) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Could not load high score: {:#}", e);
                0
            }
        };

        let state = engine.new_game(bounds);
        log::info!(
            "New session on a {}x{} board",
            bounds.width,
            bounds.height
        );

        Self {
            input: DirectionInput::new(state.snake.direction),
            engine,
            state,
            high_score,
            store,
            audio,
            metrics: GameMetrics::new(),
            next_bounds: bounds,
            background_started: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Bounds of the live session
    pub fn bounds(&self) -> Bounds {
        self.state.bounds
    }

    /// Delay before the next tick, derived from the current speed
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.state.speed))
    }

    /// Ask the snake to turn. Reversals are dropped.
    pub fn steer(&mut self, direction: Direction) -> bool {
        self.on_interaction();
        self.input.request(self.state.snake.direction, direction)
    }

    /// Steer by a swipe vector; ignored once the session has ended
    pub fn swipe(&mut self, dx: i32, dy: i32) -> bool {
        self.on_interaction();
        if !self.is_running() {
            return false;
        }
        match Direction::from_swipe(dx, dy) {
            Some(direction) => self.input.request(self.state.snake.direction, direction),
            None => false,
        }
    }

    /// Run one simulation step. Does nothing after game over.
    pub fn tick(&mut self) -> Option<StepResult> {
        if !self.is_running() {
            return None;
        }

        let result = self.engine.step(&mut self.state, self.input.pending());

        if result.ate_food() {
            self.cue(AudioCue::FruitEaten);
            if result.info.speed_changed {
                log::debug!("Speed now {:.1} ticks/s", self.state.speed);
            }
            if result.info.big_fruit_spawned {
                log::debug!("Big fruit appeared at {:?}", self.state.big_fruit);
            }
        }

        if result.terminated {
            self.on_game_over(&result);
        }

        Some(result)
    }

    /// Start a new session if the current one is over. Returns whether it did.
    pub fn resume(&mut self) -> bool {
        self.on_interaction();
        if self.is_running() {
            return false;
        }
        self.reset();
        true
    }

    /// Start a new session unconditionally, on the most recent bounds
    pub fn reset(&mut self) {
        self.engine.reset(&mut self.state, self.next_bounds);
        self.input = DirectionInput::new(self.state.snake.direction);
        self.metrics.on_game_start();
        log::info!(
            "New session on a {}x{} board",
            self.next_bounds.width,
            self.next_bounds.height
        );
    }

    /// Record new play-area bounds. They apply from the next session on.
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds != self.next_bounds {
            log::debug!("Viewport now {}x{}", bounds.width, bounds.height);
            self.next_bounds = bounds;
        }
    }

    fn on_game_over(&mut self, result: &StepResult) {
        log::info!(
            "Game over ({:?}) with score {}",
            result.info.collision_type,
            self.state.score
        );
        self.cue(AudioCue::GameOver);
        self.metrics.on_game_over();

        if self.state.score > self.high_score {
            self.high_score = self.state.score;
            if let Err(e) = self.store.save(self.high_score) {
                log::warn!("Could not save high score: {:#}", e);
            }
        }
    }

    /// Background music waits for the first user interaction
    fn on_interaction(&mut self) {
        if self.background_started {
            return;
        }
        self.background_started = true;
        if let Err(e) = self.audio.start_background() {
            log::debug!("Background track failed: {:#}", e);
        }
    }

    fn cue(&mut self, cue: AudioCue) {
        if let Err(e) = self.audio.play(cue) {
            log::debug!("Audio cue {:?} failed: {:#}", cue, e);
        }
    }
}
