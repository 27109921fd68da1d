use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{Direction, Session, TickOutcome};
use crate::input::{InputHandler, KeyAction, PointerInput};
use crate::render::Renderer;

/// Frame interval for redrawing, independent of game speed (about 30 FPS)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// What the loop has to do after handling an event or tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct LoopControl {
    /// Replace the tick timer with one at this period
    reschedule: Option<Duration>,
    /// Draw immediately instead of waiting for the next frame
    redraw: bool,
}

/// Interactive play in the terminal
pub struct HumanMode {
    session: Session,
    renderer: Renderer,
    input_handler: InputHandler,
    pointer: PointerInput,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            pointer: PointerInput::new(),
            should_quit: false,
        }
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

    /// Tick timer whose first tick fires one full period from now
    fn tick_timer(period: Duration) -> Interval {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Only polled while a game is running
        let mut tick_timer = Self::tick_timer(self.session.tick_interval());

        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            let mut control = LoopControl::default();

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        control = self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick(), if self.session.is_running() => {
                    control = self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    control.redraw = true;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if let Some(period) = control.reschedule {
                tick_timer = Self::tick_timer(period);
            }

            if control.redraw {
                self.draw(terminal)?;
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let renderer = &mut self.renderer;
        let session = &self.session;
        terminal
            .draw(|frame| renderer.render(frame, session))
            .context("Failed to draw frame")?;
        self.pointer.set_buttons(self.renderer.control_pad());
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> LoopControl {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return LoopControl::default();
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::Steer(direction) => self.steer(direction),
                    KeyAction::Start => return self.start_game(),
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::None => {}
                }
            }
            Event::Mouse(mouse) => {
                if let Some(direction) = self.pointer.handle_mouse_event(mouse) {
                    self.steer(direction);
                }
            }
            // A running game is redrawn on the next frame anyway
            Event::Resize(_, _) if !self.session.is_running() => {
                return LoopControl {
                    redraw: true,
                    ..Default::default()
                };
            }
            _ => {}
        }

        LoopControl::default()
    }

    fn steer(&mut self, direction: Direction) {
        // Rejected requests (reversals, or no game running) are dropped.
        self.session.request_direction(direction);
    }

    fn start_game(&mut self) -> LoopControl {
        match self.session.start() {
            Some(period) => LoopControl {
                reschedule: Some(period),
                redraw: true,
            },
            // Already running; the tick timer keeps its phase.
            None => LoopControl::default(),
        }
    }

    fn update_game(&mut self) -> LoopControl {
        match self.session.tick() {
            TickOutcome::Moved { reschedule, .. } => LoopControl {
                reschedule,
                redraw: false,
            },
            TickOutcome::GameOver(summary) => {
                info!(
                    "Final result: {} ({}% discount)",
                    summary.headline(),
                    summary.tier.discount
                );
                LoopControl {
                    reschedule: None,
                    redraw: true,
                }
            }
            TickOutcome::Ignored => LoopControl::default(),
        }
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
