use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::game::{
    Direction, GameState, GameSummary, ObstacleKind, Position, Session, SessionPhase,
};

/// Head colour of the trail
const TRAIL_HEAD_RGB: (u8, u8, u8) = (231, 76, 60);
/// Colour the trail fades to at its tail
const TRAIL_TAIL_RGB: (u8, u8, u8) = (52, 152, 231);

const BUTTON_WIDTH: u16 = 7;

/// Colour of trail segment `index` out of `len`, fading from red at the car
/// to blue at the end
pub fn trail_color(index: usize, len: usize) -> Color {
    let t = if len == 0 {
        0.0
    } else {
        index as f32 / len as f32
    };
    let lerp = |from: u8, to: u8| -> u8 {
        let value = f32::from(from) + (f32::from(to) - f32::from(from)) * t;
        value.clamp(0.0, 255.0) as u8
    };
    Color::Rgb(
        lerp(TRAIL_HEAD_RGB.0, TRAIL_TAIL_RGB.0),
        lerp(TRAIL_HEAD_RGB.1, TRAIL_TAIL_RGB.1),
        lerp(TRAIL_HEAD_RGB.2, TRAIL_TAIL_RGB.2),
    )
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "▲ ",
        Direction::Down => "▼ ",
        Direction::Left => "◀ ",
        Direction::Right => "▶ ",
    }
}

fn obstacle_span(kind: ObstacleKind) -> Span<'static> {
    match kind {
        ObstacleKind::Tree => Span::styled(
            "♣ ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        ObstacleKind::Car => Span::styled("▣ ", Style::default().fg(Color::Gray)),
        ObstacleKind::Signpost => Span::styled(
            "╬ ",
            Style::default().fg(Color::Rgb(230, 126, 34)),
        ),
    }
}

/// Draws the session, and remembers where the control pad buttons ended up
/// so mouse clicks can be mapped back to directions.
pub struct Renderer {
    control_pad: Vec<(Rect, Direction)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            control_pad: Vec::new(),
        }
    }

    /// Button areas from the most recent frame
    pub fn control_pad(&self) -> &[(Rect, Direction)] {
        &self.control_pad
    }

    pub fn render(&mut self, frame: &mut Frame, session: &Session) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // NCB message
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Control pad
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(session), chunks[0]);
        frame.render_widget(self.render_ncb_info(session), chunks[1]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[2])[1];

        match session.phase() {
            SessionPhase::Idle => frame.render_widget(self.render_start_screen(), game_area),
            SessionPhase::Running => {
                frame.render_widget(self.render_grid(session.state()), game_area)
            }
            SessionPhase::GameOver => match session.summary() {
                Some(summary) => {
                    frame.render_widget(self.render_game_over(summary), game_area)
                }
                None => frame.render_widget(self.render_grid(session.state()), game_area),
            },
        }

        self.render_control_pad(frame, chunks[3]);
        frame.render_widget(self.render_controls(), chunks[4]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_size);
        let len = state.snake.len();

        for y in 0..state.grid_size {
            let mut spans = Vec::with_capacity(state.grid_size);

            for x in 0..state.grid_size {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.snake.head() {
                    // The car, pointing where it is driving
                    Span::styled(
                        head_glyph(state.snake.direction),
                        Style::default()
                            .fg(Color::Rgb(TRAIL_HEAD_RGB.0, TRAIL_HEAD_RGB.1, TRAIL_HEAD_RGB.2))
                            .add_modifier(Modifier::BOLD),
                    )
                } else if let Some(index) = state.snake.body.iter().position(|&p| p == pos) {
                    Span::styled("■ ", Style::default().fg(trail_color(index, len)))
                } else if let Some(obstacle) = state.obstacle_at(pos) {
                    obstacle_span(obstacle.kind)
                } else if pos == state.food {
                    // Claim-free year token
                    Span::styled(
                        "Y ",
                        Style::default()
                            .fg(Color::Rgb(243, 156, 18))
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" NCB Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, session: &Session) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let text = vec![Line::from(vec![
            Span::styled("Years: ", label),
            Span::styled(session.state().score.to_string(), value),
            Span::raw("    "),
            Span::styled("Discount: ", label),
            Span::styled(format!("{}%", session.discount().discount), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(session.high_score().to_string(), value),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_ncb_info(&self, session: &Session) -> Paragraph<'_> {
        Paragraph::new(Line::from(Span::styled(
            session.discount().message,
            Style::default().fg(Color::Cyan),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
    }

    fn render_start_screen(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "NO CLAIMS BONUS",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Collect claim-free years to grow your discount."),
            Line::from("Avoid the walls, your own trail and roadside hazards."),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double),
            )
    }

    fn render_game_over(&self, summary: &GameSummary) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(Span::styled(
                summary.headline(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                summary.message(),
                Style::default().fg(Color::Yellow),
            )),
        ];

        if summary.new_high_score {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
    }

    /// Clickable arrow buttons, centred under the grid
    fn render_control_pad(&mut self, frame: &mut Frame, area: Rect) {
        const BUTTONS: [(Direction, &str); 4] = [
            (Direction::Left, "←"),
            (Direction::Up, "↑"),
            (Direction::Down, "↓"),
            (Direction::Right, "→"),
        ];

        let row = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(BUTTON_WIDTH),
                Constraint::Length(BUTTON_WIDTH),
                Constraint::Length(BUTTON_WIDTH),
                Constraint::Length(BUTTON_WIDTH),
                Constraint::Min(0),
            ])
            .split(area);

        self.control_pad.clear();
        for (slot, (direction, arrow)) in row[1..5].iter().zip(BUTTONS) {
            let button = Paragraph::new(Span::styled(
                arrow,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            );
            frame.render_widget(button, *slot);
            self.control_pad.push((*slot, direction));
        }
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / drag / click to steer | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" to start | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};
    use crate::persistence::MemoryHighScoreStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn session() -> Session {
        Session::new(
            GameEngine::with_seed(GameConfig::default(), 1).unwrap(),
            Box::new(MemoryHighScoreStore::new()),
        )
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_trail_gradient_endpoints() {
        assert_eq!(trail_color(0, 10), Color::Rgb(231, 76, 60));
        assert_eq!(trail_color(10, 10), Color::Rgb(52, 152, 231));
        assert_eq!(trail_color(0, 0), Color::Rgb(231, 76, 60));
    }

    #[test]
    fn test_idle_screen_and_control_pad() {
        let mut renderer = Renderer::new();
        let session = session();
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();

        terminal
            .draw(|frame| renderer.render(frame, &session))
            .unwrap();

        assert!(screen_text(&terminal).contains("NO CLAIMS BONUS"));
        let directions: Vec<Direction> = renderer.control_pad().iter().map(|(_, d)| *d).collect();
        assert_eq!(
            directions,
            vec![Direction::Left, Direction::Up, Direction::Down, Direction::Right]
        );
        assert!(renderer.control_pad().iter().all(|(rect, _)| rect.width == BUTTON_WIDTH));
    }

    #[test]
    fn test_running_screen_shows_discount() {
        let mut renderer = Renderer::new();
        let mut session = session();
        session.start();
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();

        terminal
            .draw(|frame| renderer.render(frame, &session))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Discount:"));
        assert!(text.contains("Start building your No Claims Bonus!"));
    }
}
