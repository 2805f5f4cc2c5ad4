use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, interval, sleep_until};

use crate::game::{Bounds, GameConfig};
use crate::input::{InputHandler, KeyAction, SwipeTracker};
use crate::render::{Renderer, Scoreboard};
use crate::session::SessionController;

/// Fixed play-area size requested on the command line, in world units
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportOverride {
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// When the next simulation tick is due
///
/// The deadline is taken from the speed at the moment a tick runs or a new
/// session starts. There is no deadline while the session is over.
#[derive(Debug, Clone, Copy)]
struct TickSchedule {
    next: Instant,
}

impl TickSchedule {
    fn new(now: Instant, interval: Duration) -> Self {
        Self {
            next: now + interval,
        }
    }

    fn deadline(&self, running: bool) -> Option<Instant> {
        running.then_some(self.next)
    }

    fn rearm(&mut self, now: Instant, interval: Duration) {
        self.next = now + interval;
    }
}

/// Sleep until `deadline`, or forever when there is none
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Interactive play in the terminal
pub struct PlayMode {
    controller: SessionController,
    renderer: Renderer,
    input_handler: InputHandler,
    swipe: SwipeTracker,
    viewport: ViewportOverride,
    schedule: TickSchedule,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(controller: SessionController, viewport: ViewportOverride) -> Self {
        let renderer = Renderer::new(controller.config().cell_size);
        let schedule = TickSchedule::new(Instant::now(), controller.tick_interval());

        Self {
            controller,
            renderer,
            input_handler: InputHandler::new(),
            swipe: SwipeTracker::new(),
            viewport,
            schedule,
            should_quit: false,
        }
    }

    /// Bounds for a terminal of the given size, honouring command-line overrides
    pub fn bounds_for(
        renderer: &Renderer,
        config: &GameConfig,
        viewport: ViewportOverride,
        area: Rect,
    ) -> Bounds {
        let (width, height) = renderer.viewport_for(area);
        Bounds::from_viewport(
            viewport.width.unwrap_or(width),
            viewport.height.unwrap_or(height),
            config,
        )
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        self.schedule.rearm(Instant::now(), self.controller.tick_interval());

        // Redraw at ~30 FPS so the clock keeps moving between ticks
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            let deadline = self.schedule.deadline(self.controller.is_running());

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            self.handle_event(event);
                        }
                        Some(Err(e)) => log::warn!("Terminal event error: {}", e),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick; never fires once the session is over
                _ = wait_until(deadline) => {
                    self.on_tick();
                }

                // Render frame
                _ = render_timer.tick() => {}

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            self.draw(terminal)?;
        }

        Ok(())
    }

    fn on_tick(&mut self) {
        self.controller.tick();
        self.schedule.rearm(Instant::now(), self.controller.tick_interval());
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.controller.metrics_mut().update();
        let scoreboard = Scoreboard {
            high_score: self.controller.high_score(),
            metrics: self.controller.metrics(),
        };
        let state = self.controller.state();
        let renderer = &self.renderer;

        terminal
            .draw(|frame| renderer.render(frame, state, &scoreboard))
            .context("Failed to draw frame")?;
        Ok(())
    }

    /// Returns true when the event started a new session
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return false;
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::Steer(direction) => {
                        self.controller.steer(direction);
                    }
                    KeyAction::Resume => {
                        if self.controller.resume() {
                            // A fresh session starts a fresh tick chain
                            self.schedule.rearm(Instant::now(), self.controller.tick_interval());
                            return true;
                        }
                    }
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::None => {}
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(Rect::new(0, 0, width, height)),
            _ => {}
        }

        false
    }

    /// Mouse drags stand in for touch swipes
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));

        match mouse.kind {
            MouseEventKind::Down(_) => self.swipe.start(x, y),
            MouseEventKind::Drag(_) => {
                if let Some((dx, dy)) = self.swipe.drag(x, y) {
                    // A terminal column is about half as wide as a row is tall
                    self.controller.swipe(dx, dy * 2);
                }
            }
            MouseEventKind::Up(_) => self.swipe.end(),
            _ => {}
        }
    }

    fn resize(&mut self, area: Rect) {
        let bounds = Self::bounds_for(
            &self.renderer,
            self.controller.config(),
            self.viewport,
            area,
        );
        self.controller.resize(bounds);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Silent;
    use crate::game::Direction;
    use crate::persistence::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton};

    fn mode(viewport: ViewportOverride) -> PlayMode {
        let controller = SessionController::new(
            GameConfig::default(),
            Bounds::new(720, 480),
            Box::new(MemoryStore::new()),
            Box::new(Silent),
        );
        PlayMode::new(controller, viewport)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_bounds_from_terminal() {
        let renderer = Renderer::new(10);
        let config = GameConfig::default();

        let bounds = PlayMode::bounds_for(
            &renderer,
            &config,
            ViewportOverride::default(),
            Rect::new(0, 0, 82, 30),
        );
        assert_eq!(bounds, Bounds::new(400, 220));

        // Huge terminals are capped
        let bounds = PlayMode::bounds_for(
            &renderer,
            &config,
            ViewportOverride::default(),
            Rect::new(0, 0, 400, 200),
        );
        assert_eq!(bounds, Bounds::new(720, 480));
    }

    #[test]
    fn test_bounds_override() {
        let renderer = Renderer::new(10);
        let config = GameConfig::default();
        let viewport = ViewportOverride {
            width: Some(300),
            height: None,
        };

        let bounds = PlayMode::bounds_for(&renderer, &config, viewport, Rect::new(0, 0, 82, 30));
        assert_eq!(bounds, Bounds::new(300, 220));
    }

    #[test]
    fn test_arrow_key_steers() {
        let mut mode = mode(ViewportOverride::default());

        assert!(!mode.handle_event(key(KeyCode::Up)));
        mode.controller.tick();

        assert_eq!(mode.controller.state().snake.direction, Direction::Up);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode(ViewportOverride::default());
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_resume_ignored_while_running() {
        let mut mode = mode(ViewportOverride::default());
        assert!(!mode.handle_event(key(KeyCode::Char('p'))));
    }

    #[test]
    fn test_resume_after_game_over() {
        let mut mode = mode(ViewportOverride::default());
        // Drive the snake into the right-hand wall
        while mode.controller.is_running() {
            mode.controller.tick();
        }

        assert!(mode.handle_event(key(KeyCode::Char('P'))));
        assert!(mode.controller.is_running());
    }

    #[test]
    fn test_key_release_ignored() {
        let mut mode = mode(ViewportOverride::default());
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        mode.handle_event(Event::Key(release));
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_drag_swipes() {
        let mut mode = mode(ViewportOverride::default());

        mode.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        mode.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 11, 14));
        mode.controller.tick();

        assert_eq!(mode.controller.state().snake.direction, Direction::Down);
    }

    #[test]
    fn test_no_deadline_after_game_over() {
        let mut mode = mode(ViewportOverride::default());
        assert!(mode.schedule.deadline(mode.controller.is_running()).is_some());

        while mode.controller.is_running() {
            mode.on_tick();
        }

        assert_eq!(mode.schedule.deadline(mode.controller.is_running()), None);
    }

    #[test]
    fn test_resume_rearms_deadline() {
        let mut mode = mode(ViewportOverride::default());
        while mode.controller.is_running() {
            mode.on_tick();
        }

        let before = Instant::now();
        assert!(mode.handle_event(key(KeyCode::Char('p'))));

        let deadline = mode
            .schedule
            .deadline(mode.controller.is_running())
            .expect("resumed session should tick");
        assert!(deadline >= before + mode.controller.tick_interval());
    }

    #[test]
    fn test_tick_deadline_follows_speed() {
        let now = Instant::now();
        let mut schedule = TickSchedule::new(now, Duration::from_millis(100));
        assert_eq!(schedule.deadline(true), Some(now + Duration::from_millis(100)));
        assert_eq!(schedule.deadline(false), None);

        schedule.rearm(now, Duration::from_millis(40));
        assert_eq!(schedule.deadline(true), Some(now + Duration::from_millis(40)));
    }

    #[tokio::test]
    async fn test_wait_until() {
        let idle = tokio::time::timeout(Duration::from_millis(20), wait_until(None)).await;
        assert!(idle.is_err());

        let due = tokio::time::timeout(
            Duration::from_millis(200),
            wait_until(Some(Instant::now())),
        )
        .await;
        assert!(due.is_ok());
    }

    #[test]
    fn test_resize_waits_for_next_session() {
        let mut mode = mode(ViewportOverride::default());

        mode.handle_event(Event::Resize(82, 30));
        assert_eq!(mode.controller.bounds(), Bounds::new(720, 480));

        mode.controller.reset();
        assert_eq!(mode.controller.bounds(), Bounds::new(400, 220));
    }
}
