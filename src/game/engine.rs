use super::{
    action::Direction,
    config::GameConfig,
    grid::{Bounds, random_position},
    state::{CollisionType, GameState, SessionPhase},
};
use rand::Rng;
use rand::rngs::ThreadRng;

/// What the snake ate during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumed {
    Fruit,
    BigFruit,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Fruit eaten this step, if any
    pub consumed: Option<Consumed>,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Whether a big fruit appeared this step
    pub big_fruit_spawned: bool,
    /// Whether the speed went up this step
    pub speed_changed: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the session has ended
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn idle(terminated: bool) -> Self {
        Self {
            terminated,
            info: StepInfo {
                consumed: None,
                collision_type: None,
                big_fruit_spawned: false,
                speed_changed: false,
            },
        }
    }

    pub fn ate_food(&self) -> bool {
        self.info.consumed.is_some()
    }
}

/// The game engine that handles all game logic
pub struct GameEngine<R = ThreadRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<ThreadRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine drawing fruit positions from `rng`
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh session inside `bounds`
    pub fn new_game(&mut self, bounds: Bounds) -> GameState {
        GameState::new_game(bounds, &self.config, &mut self.rng)
    }

    /// Reset an existing state in place
    pub fn reset(&mut self, state: &mut GameState, bounds: Bounds) {
        state.reset(bounds, &self.config, &mut self.rng);
    }

    /// Advance the game by one tick.
    ///
    /// `pending` must already be checked against 180-degree turns; it is
    /// committed as-is. A finished game is left untouched.
    pub fn step(&mut self, state: &mut GameState, pending: Direction) -> StepResult {
        if !state.is_running() {
            return StepResult::idle(true);
        }

        state.ticks += 1;
        state.snake.direction = pending;
        state.pending_direction = pending;

        let new_head = state
            .snake
            .head()
            .moved_in_direction(pending, self.config.cell_size);

        // Grow first; the tail is only dropped when nothing was eaten
        state.snake.push_head(new_head);

        if let Some(collision_type) = self.check_collision(state) {
            state.phase = SessionPhase::GameOver;

            let mut result = StepResult::idle(true);
            result.info.collision_type = Some(collision_type);
            return result;
        }

        let mut result = StepResult::idle(false);

        if new_head == state.fruit {
            self.eat_fruit(state, &mut result);
        } else if state
            .big_fruit
            .is_some_and(|big| new_head.is_near(big, self.config.big_fruit_radius))
        {
            state.score += self.config.big_fruit_score;
            state.big_fruit = None;
            result.info.consumed = Some(Consumed::BigFruit);
        } else {
            state.snake.drop_tail();
        }

        result
    }

    /// Check if the freshly pushed head causes a collision
    fn check_collision(&self, state: &GameState) -> Option<CollisionType> {
        let head = state.snake.head();

        if !state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        // Everything behind the new head, including the tail that has not moved yet
        if state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn eat_fruit(&mut self, state: &mut GameState, result: &mut StepResult) {
        let cell_size = self.config.cell_size;

        state.score += 1;
        state.small_fruit_count += 1;
        state.fruit = random_position(&mut self.rng, state.bounds, cell_size);
        result.info.consumed = Some(Consumed::Fruit);

        if state.small_fruit_count % self.config.big_fruit_every == 0 {
            state.big_fruit = Some(random_position(&mut self.rng, state.bounds, cell_size));
            result.info.big_fruit_spawned = true;
        }

        // Both rules are checked on their own and may stack in one tick
        let before = state.speed;
        if state.score % self.config.score_threshold == 0 {
            self.accelerate(state, self.config.speed_increment);
        }
        if state.score >= self.config.second_speed_threshold {
            self.accelerate(state, self.config.speed_acceleration);
        }
        result.info.speed_changed = state.speed > before;
    }

    fn accelerate(&self, state: &mut GameState, amount: f32) {
        if state.speed < self.config.max_speed {
            state.speed = (state.speed + amount).min(self.config.max_speed);
        }
    }
}
