use super::action::Direction;
use super::config::GameConfig;
use super::grid::{Bounds, random_position};
use rand::Rng;

/// A position in world units, aligned to the cell grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position `step` units in a direction
    pub fn moved_in_direction(&self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * step, dy * step)
    }

    /// True when both axis-wise distances to `other` are below `radius`
    pub fn is_near(&self, other: Position, radius: i32) -> bool {
        (self.x - other.x).abs() < radius && (self.y - other.y).abs() < radius
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake with its segments trailing behind the head, one cell apart
    pub fn new(head: Position, direction: Direction, length: usize, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.moved_by(-dx * cell_size * i, -dy * cell_size * i))
            .collect();

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Put a new head in front of the body. Length grows by one until the tail is dropped.
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the last segment
    pub fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    /// Terminal until an explicit reset
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Last direction accepted from input, committed at the next tick
    pub pending_direction: Direction,
    /// Small fruit; always on the board
    pub fruit: Position,
    /// Big fruit, when one is waiting to be eaten
    pub big_fruit: Option<Position>,
    pub bounds: Bounds,
    pub score: u32,
    pub small_fruit_count: u32,
    /// Ticks per second
    pub speed: f32,
    pub ticks: u32,
    pub phase: SessionPhase,
}

impl GameState {
    /// Create a game state around an existing snake and fruit
    pub fn new(snake: Snake, fruit: Position, bounds: Bounds, speed: f32) -> Self {
        Self {
            pending_direction: snake.direction,
            snake,
            fruit,
            big_fruit: None,
            bounds,
            score: 0,
            small_fruit_count: 0,
            speed,
            ticks: 0,
            phase: SessionPhase::Running,
        }
    }

    /// Fresh session: centred snake heading right, one random fruit
    pub fn new_game<R: Rng>(bounds: Bounds, config: &GameConfig, rng: &mut R) -> Self {
        let snake = Snake::new(
            bounds.centered(config.cell_size),
            Direction::Right,
            config.initial_snake_length,
            config.cell_size,
        );
        let fruit = random_position(rng, bounds, config.cell_size);

        Self::new(snake, fruit, bounds, config.initial_speed)
    }

    /// Start over in place. Same result as `new_game`.
    pub fn reset<R: Rng>(&mut self, bounds: Bounds, config: &GameConfig, rng: &mut R) {
        *self = Self::new_game(bounds, config, rng);
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.bounds.contains(pos)
    }
}
