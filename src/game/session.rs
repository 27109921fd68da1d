use std::time::Duration;

use log::{error, info};

use super::{
    direction::Direction,
    discount::{self, NcbTier},
    engine::{GameEngine, StepResult},
    state::{CollisionType, GameState},
};
use crate::persistence::HighScoreStore;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing played yet
    Idle,
    /// Ticking and accepting steering input
    Running,
    /// Ticks stopped; waiting for a restart
    GameOver,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Collision(CollisionType),
    /// No free cell was left for the next food
    BoardFull,
}

/// Final numbers for a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub score: u32,
    pub reason: EndReason,
    pub tier: &'static NcbTier,
    pub high_score: u32,
    pub new_high_score: bool,
}

impl GameSummary {
    pub fn headline(&self) -> String {
        discount::final_score_line(self.score)
    }

    pub fn message(&self) -> String {
        discount::final_message(self.score)
    }
}

/// What a single tick did, as far as the loop driving it cares
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Session not running; nothing happened
    Ignored,
    /// Snake moved. `reschedule` carries the new interval when the game
    /// sped up.
    Moved {
        ate_food: bool,
        reschedule: Option<Duration>,
    },
    /// Session ended this tick; the tick timer must stop
    GameOver(GameSummary),
}

/// One player's run of games: the state machine around [`GameEngine`] plus
/// the persisted high score.
pub struct Session {
    engine: GameEngine,
    state: GameState,
    phase: SessionPhase,
    high_score: u32,
    store: Box<dyn HighScoreStore>,
    summary: Option<GameSummary>,
}

impl Session {
    pub fn new(mut engine: GameEngine, store: Box<dyn HighScoreStore>) -> Self {
        let state = engine.reset();
        let high_score = store.load();

        Self {
            engine,
            state,
            phase: SessionPhase::Idle,
            high_score,
            store,
            summary: None,
        }
    }

    /// Begin a fresh game, from idle or after a game over. Everything is
    /// reset; nothing carries over from a previous game except the high
    /// score. Returns the interval for the first tick, or `None` when a
    /// game is already running, which is left untouched.
    pub fn start(&mut self) -> Option<Duration> {
        if self.phase == SessionPhase::Running {
            return None;
        }

        self.state = self.engine.reset();
        self.phase = SessionPhase::Running;
        self.summary = None;

        info!(
            "Session started on a {0}x{0} grid at {1}ms per tick",
            self.state.grid_size, self.state.speed_ms
        );

        Some(self.tick_interval())
    }

    /// Queue a turn for the next tick. Ignored unless running; reversals of
    /// the active direction are dropped.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.state.request_direction(direction)
    }

    /// Advance the game by one tick
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Ignored;
        }

        let StepResult { terminated, info } = self.engine.step(&mut self.state);

        if terminated {
            let reason = match info.collision_type {
                Some(collision) => EndReason::Collision(collision),
                None => EndReason::BoardFull,
            };
            return TickOutcome::GameOver(self.finish(reason));
        }

        TickOutcome::Moved {
            ate_food: info.ate_food,
            reschedule: info.new_speed_ms.map(Duration::from_millis),
        }
    }

    fn finish(&mut self, reason: EndReason) -> GameSummary {
        self.phase = SessionPhase::GameOver;

        let score = self.state.score;
        let new_high_score = score > self.high_score;
        if new_high_score {
            info!("New high score {} (was {})", score, self.high_score);
            self.high_score = score;
            if let Err(e) = self.store.save(score) {
                error!("Error saving high score: {:#}", e);
            }
        }

        info!("Game over ({:?}) with score {}", reason, score);

        let summary = GameSummary {
            score,
            reason,
            tier: discount::discount_for(score),
            high_score: self.high_score,
            new_high_score,
        };
        self.summary = Some(summary.clone());
        summary
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.speed_ms)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Discount tier for the current score
    pub fn discount(&self) -> &'static NcbTier {
        discount::discount_for(self.state.score)
    }

    /// Summary of the last finished game, while in [`SessionPhase::GameOver`]
    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    pub fn store(&self) -> &dyn HighScoreStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, Obstacle, ObstacleKind, Occupancy, Position, rules};
    use crate::persistence::MemoryHighScoreStore;

    fn session_with(high_score: u32) -> Session {
        Session::new(
            GameEngine::with_seed(GameConfig::default(), 21).unwrap(),
            Box::new(MemoryHighScoreStore::with_score(high_score)),
        )
    }

    fn feed(session: &mut Session) {
        let state = &mut session.state;
        state.food = rules::advance(state.snake.head(), state.pending_direction);
    }

    /// Drive right until the wall, keeping food and obstacles out of the way
    fn crash_into_wall(session: &mut Session) -> GameSummary {
        session.state.food = Position::new(0, 19);
        session
            .state
            .obstacles
            .iter_mut()
            .for_each(|o| o.position = Position::new(0, 0));

        for _ in 0..session.state.grid_size {
            if let TickOutcome::GameOver(summary) = session.tick() {
                return summary;
            }
        }
        panic!("snake never reached the wall");
    }

    #[test]
    fn test_starts_idle() {
        let mut session = session_with(0);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert!(!session.request_direction(Direction::Up));
    }

    #[test]
    fn test_start_runs_at_initial_speed() {
        let mut session = session_with(0);
        let interval = session.start();

        assert_eq!(interval, Some(Duration::from_millis(150)));
        assert!(session.is_running());
        assert_eq!(session.state().snake.len(), 3);
        assert_eq!(session.state().score, 0);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut session = session_with(0);
        session.start();
        for _ in 0..2 {
            feed(&mut session);
            session.tick();
        }
        let before = session.state().clone();

        assert_eq!(session.start(), None);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.state().score, 2);
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_high_score_loaded_from_store() {
        let session = session_with(11);
        assert_eq!(session.high_score(), 11);
    }

    #[test]
    fn test_reversal_ignored_then_turn_honored() {
        let mut session = session_with(0);
        session.start();
        session.state.food = Position::new(0, 0);

        assert!(!session.request_direction(Direction::Left));
        session.tick();
        assert_eq!(session.state().snake.direction, Direction::Right);

        assert!(session.request_direction(Direction::Up));
        session.tick();
        assert_eq!(session.state().snake.direction, Direction::Up);
    }

    #[test]
    fn test_food_reschedules_tick() {
        let mut session = session_with(0);
        session.start();
        feed(&mut session);

        assert_eq!(
            session.tick(),
            TickOutcome::Moved {
                ate_food: true,
                reschedule: Some(Duration::from_millis(145)),
            }
        );
        assert_eq!(session.tick_interval(), Duration::from_millis(145));
        assert_eq!(session.discount().discount, 30);
    }

    #[test]
    fn test_full_session_flow() {
        let mut session = session_with(0);
        session.start();

        for _ in 0..3 {
            session
                .state
                .obstacles
                .iter_mut()
                .for_each(|o| o.position = Position::new(0, 0));
            feed(&mut session);
            assert!(matches!(
                session.tick(),
                TickOutcome::Moved { ate_food: true, .. }
            ));
        }

        let state = session.state();
        assert_eq!(state.score, 3);
        assert_eq!(state.snake.len(), 6);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.speed_ms, 135);
        assert!(!state.snake.occupies(state.food));
        assert!(!state.obstacles.occupies(state.food));

        let summary = crash_into_wall(&mut session);

        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(summary.reason, EndReason::Collision(CollisionType::Wall));
        assert_eq!(summary.score, 3);
        assert_eq!(summary.tier.discount, 50);
        assert_eq!(
            summary.message(),
            "That earned you a 50% discount on your insurance. Great driving!"
        );
        assert_eq!(summary.headline(), "You achieved 3 claim-free years!");
        assert_eq!(session.summary(), Some(&summary));

        // Timer stopped: further ticks and input do nothing.
        let frozen = session.state().clone();
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert!(!session.request_direction(Direction::Up));
        assert_eq!(session.state(), &frozen);
    }

    #[test]
    fn test_obstacle_collision_ends_session() {
        let mut session = session_with(0);
        session.start();
        let ahead = rules::advance(session.state.snake.head(), Direction::Right);
        session.state.food = Position::new(0, 19);
        session
            .state
            .obstacles
            .push(Obstacle::new(ahead, ObstacleKind::Signpost));

        match session.tick() {
            TickOutcome::GameOver(summary) => {
                assert_eq!(
                    summary.reason,
                    EndReason::Collision(CollisionType::Obstacle)
                );
                assert_eq!(summary.message(), discount::final_message(0));
            }
            other => panic!("expected game over, got {:?}", other),
        }
    }

    #[test]
    fn test_high_score_saved_only_when_beaten() {
        let mut session = session_with(2);

        session.start();
        feed(&mut session);
        session.tick();
        let summary = crash_into_wall(&mut session);
        assert!(!summary.new_high_score);
        assert_eq!(session.high_score(), 2);
        assert_eq!(session.store().load(), 2);

        session.start();
        for _ in 0..3 {
            session
                .state
                .obstacles
                .iter_mut()
                .for_each(|o| o.position = Position::new(0, 0));
            feed(&mut session);
            session.tick();
        }
        let summary = crash_into_wall(&mut session);
        assert!(summary.new_high_score);
        assert_eq!(summary.high_score, 3);
        assert_eq!(session.high_score(), 3);
        assert_eq!(session.store().load(), 3);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = session_with(0);
        session.start();
        for _ in 0..3 {
            session
                .state
                .obstacles
                .iter_mut()
                .for_each(|o| o.position = Position::new(0, 0));
            feed(&mut session);
            session.tick();
        }
        crash_into_wall(&mut session);

        let interval = session.start();

        assert!(session.is_running());
        assert_eq!(interval, Some(Duration::from_millis(150)));
        let state = session.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 3);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.last_obstacle_score, 0);
        assert!(session.summary().is_none());
    }
}
