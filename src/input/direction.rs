//! Validated direction intents between ticks

use crate::game::Direction;

/// Holds the direction the next tick will commit.
///
/// Requests that would reverse the snake onto its own neck are swallowed.
/// Between ticks the last accepted request wins; nothing is queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionInput {
    pending: Direction,
}

impl DirectionInput {
    pub fn new(initial: Direction) -> Self {
        Self { pending: initial }
    }

    /// Offer a new direction. `current` is the direction the snake is travelling in.
    ///
    /// Returns whether the request was accepted.
    pub fn request(&mut self, current: Direction, requested: Direction) -> bool {
        if current.is_opposite(requested) {
            return false;
        }
        self.pending = requested;
        true
    }

    /// Direction to commit on the next tick
    pub fn pending(&self) -> Direction {
        self.pending
    }
}

/// Turns pointer drags into swipe vectors, one per drag sample
#[derive(Debug, Default)]
pub struct SwipeTracker {
    origin: Option<(i32, i32)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer pressed: start a new gesture
    pub fn start(&mut self, x: i32, y: i32) {
        self.origin = Some((x, y));
    }

    /// Pointer moved while pressed. Returns the movement since the last sample.
    pub fn drag(&mut self, x: i32, y: i32) -> Option<(i32, i32)> {
        let (ox, oy) = self.origin.replace((x, y))?;
        Some((x - ox, y - oy))
    }

    /// Pointer released
    pub fn end(&mut self) {
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_perpendicular_turn() {
        let mut input = DirectionInput::new(Direction::Right);
        assert!(input.request(Direction::Right, Direction::Up));
        assert_eq!(input.pending(), Direction::Up);
    }

    #[test]
    fn test_swallows_reversal() {
        let mut input = DirectionInput::new(Direction::Right);
        assert!(!input.request(Direction::Right, Direction::Left));
        assert_eq!(input.pending(), Direction::Right);
    }

    #[test]
    fn test_last_write_wins() {
        let mut input = DirectionInput::new(Direction::Right);
        input.request(Direction::Right, Direction::Up);
        input.request(Direction::Right, Direction::Down);
        assert_eq!(input.pending(), Direction::Down);
    }

    #[test]
    fn test_reversal_checked_against_travel_not_pending() {
        // Moving right, Up is pending; Down is still only a turn relative to travel
        let mut input = DirectionInput::new(Direction::Right);
        input.request(Direction::Right, Direction::Up);
        assert!(input.request(Direction::Right, Direction::Down));
        assert!(!input.request(Direction::Right, Direction::Left));
        assert_eq!(input.pending(), Direction::Down);
    }

    #[test]
    fn test_swipe_tracker() {
        let mut swipe = SwipeTracker::new();
        assert_eq!(swipe.drag(5, 5), None);

        swipe.start(10, 10);
        assert_eq!(swipe.drag(14, 11), Some((4, 1)));
        // Origin follows the pointer
        assert_eq!(swipe.drag(14, 8), Some((0, -3)));

        swipe.end();
        assert_eq!(swipe.drag(20, 20), None);
    }
}
