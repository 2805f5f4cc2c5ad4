//! Play-area geometry: bounds, cell alignment and random placement

use super::config::GameConfig;
use super::state::Position;
use rand::Rng;

/// Size of the play area in world units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Derive play-area bounds from an environment-provided viewport size.
    ///
    /// The size is clamped to the configured maximum, raised to the minimum that
    /// fits the initial snake, and rounded down to whole cells.
    pub fn from_viewport(width: i32, height: i32, config: &GameConfig) -> Self {
        let cell = config.cell_size;
        let width = width
            .min(config.max_viewport_width)
            .max(config.min_viewport_width());
        let height = height
            .min(config.max_viewport_height)
            .max(config.min_viewport_height());

        Self {
            width: width / cell * cell,
            height: height / cell * cell,
        }
    }

    /// Half-open containment test over `[0, width) x [0, height)`
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Number of cells along each axis, counting a partial trailing cell
    pub fn cells(&self, cell_size: i32) -> (i32, i32) {
        (
            (self.width + cell_size - 1) / cell_size,
            (self.height + cell_size - 1) / cell_size,
        )
    }

    /// Grid-aligned cell at (or just before) the centre of the area
    pub fn centered(&self, cell_size: i32) -> Position {
        Position::new(
            self.width / 2 / cell_size * cell_size,
            self.height / 2 / cell_size * cell_size,
        )
    }
}

/// Uniformly random cell origin inside `bounds`.
///
/// Occupied cells are not excluded: the result may land on the snake or on
/// another fruit.
pub fn random_position<R: Rng>(rng: &mut R, bounds: Bounds, cell_size: i32) -> Position {
    let (columns, rows) = bounds.cells(cell_size);
    let x = rng.gen_range(0..columns.max(1));
    let y = rng.gen_range(0..rows.max(1));
    Position::new(x * cell_size, y * cell_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_viewport_clamped_to_max() {
        let config = GameConfig::default();
        let bounds = Bounds::from_viewport(1920, 1080, &config);
        assert_eq!(bounds, Bounds::new(720, 480));
    }

    #[test]
    fn test_viewport_rounded_to_cells() {
        let config = GameConfig::default();
        let bounds = Bounds::from_viewport(455, 237, &config);
        assert_eq!(bounds, Bounds::new(450, 230));
    }

    #[test]
    fn test_viewport_raised_to_min() {
        let config = GameConfig::default();
        let bounds = Bounds::from_viewport(20, 10, &config);
        assert_eq!(bounds, Bounds::new(80, 40));
    }

    #[test]
    fn test_contains_is_half_open() {
        let bounds = Bounds::new(200, 100);
        assert!(bounds.contains(Position::new(0, 0)));
        assert!(bounds.contains(Position::new(190, 90)));
        assert!(!bounds.contains(Position::new(200, 0)));
        assert!(!bounds.contains(Position::new(0, 100)));
        assert!(!bounds.contains(Position::new(-10, 50)));
        assert!(!bounds.contains(Position::new(50, -10)));
    }

    #[test]
    fn test_centered_is_aligned() {
        assert_eq!(Bounds::new(720, 480).centered(10), Position::new(360, 240));
        assert_eq!(Bounds::new(450, 230).centered(10), Position::new(220, 110));
    }

    #[test]
    fn test_random_position_on_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = Bounds::new(120, 80);

        for _ in 0..500 {
            let pos = random_position(&mut rng, bounds, 10);
            assert!(bounds.contains(pos));
            assert_eq!(pos.x % 10, 0);
            assert_eq!(pos.y % 10, 0);
        }
    }

    #[test]
    fn test_random_position_covers_corners() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = Bounds::new(20, 20);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            seen.insert(random_position(&mut rng, bounds, 10));
        }

        assert_eq!(seen.len(), 4);
    }
}
