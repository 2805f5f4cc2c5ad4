use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

/// Rows taken by the header and footer
const CHROME_ROWS: u16 = 6;
/// Terminal columns per grid cell, so cells come out roughly square
const COLUMNS_PER_CELL: u16 = 2;
/// The big fruit is drawn as a 2x2 block of cells
const BIG_FRUIT_CELLS: i32 = 2;

/// Everything the renderer shows besides the board itself
pub struct Scoreboard<'a> {
    pub high_score: u32,
    pub metrics: &'a GameMetrics,
}

pub struct Renderer {
    cell_size: i32,
}

impl Renderer {
    pub fn new(cell_size: i32) -> Self {
        Self { cell_size }
    }

    /// Play-area size in world units that fits a terminal area
    pub fn viewport_for(&self, area: Rect) -> (i32, i32) {
        let columns = area.width.saturating_sub(2) / COLUMNS_PER_CELL;
        let rows = area.height.saturating_sub(CHROME_ROWS + 2);
        (
            i32::from(columns) * self.cell_size,
            i32::from(rows) * self.cell_size,
        )
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, scoreboard: &Scoreboard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, scoreboard);
        frame.render_widget(stats, chunks[0]);

        let (columns, rows) = state.bounds.cells(self.cell_size);
        let board_width = (columns as u16)
            .saturating_mul(COLUMNS_PER_CELL)
            .saturating_add(2);
        let board_height = (rows as u16).saturating_add(2);

        if state.is_running() {
            let game_area = centered(chunks[1], board_width, board_height);
            let grid = self.render_grid(state);
            frame.render_widget(grid, game_area);
        } else {
            // Keep the panel readable on tiny boards
            let game_area = centered(chunks[1], board_width.max(44), board_height.max(9));
            let game_over = self.render_game_over(state, scoreboard);
            frame.render_widget(game_over, game_area);
        }

        let controls = self.render_controls(state);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let (columns, rows) = state.bounds.cells(self.cell_size);
        let head = state.snake.head();
        let body: HashSet<Position> = state.snake.body_segments().iter().copied().collect();
        let big_fruit_span = BIG_FRUIT_CELLS * self.cell_size;

        let mut lines = Vec::with_capacity(rows as usize);

        for row in 0..rows {
            let mut spans = Vec::with_capacity(columns as usize);

            for column in 0..columns {
                let pos = Position::new(column * self.cell_size, row * self.cell_size);
                let in_big_fruit = state.big_fruit.is_some_and(|big| {
                    pos.x >= big.x
                        && pos.x < big.x + big_fruit_span
                        && pos.y >= big.y
                        && pos.y < big.y + big_fruit_span
                });

                let cell = if pos == head {
                    // Snake head - distinct color
                    Span::styled(
                        "██",
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&pos) {
                    Span::styled("██", Style::default().fg(Color::Green))
                } else if pos == state.fruit {
                    Span::styled("██", Style::default().fg(Color::Red))
                } else if in_big_fruit {
                    Span::styled("██", Style::default().fg(Color::Yellow))
                } else {
                    Span::raw("  ")
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .style(Style::default().bg(Color::Black))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
    }

    fn render_stats(&self, state: &GameState, scoreboard: &Scoreboard) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                scoreboard.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:.1}", state.speed),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                scoreboard.metrics.format_time(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.ticks.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                scoreboard.metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, scoreboard: &Scoreboard) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Your Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    scoreboard.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "P",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, state: &GameState) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / drag to move | "),
        ];
        if !state.is_running() {
            spans.push(Span::styled("P", Style::default().fg(Color::Green)));
            spans.push(Span::raw(" to restart | "));
        }
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

/// A `width` x `height` box centred in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);
    board
}
