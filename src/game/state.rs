use std::fmt;

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Anything that claims cells on the grid.
///
/// The spawner takes a list of these as exclusion sets when looking for a
/// free cell.
pub trait Occupancy {
    fn occupies(&self, pos: Position) -> bool;
}

impl Occupancy for Position {
    fn occupies(&self, pos: Position) -> bool {
        *self == pos
    }
}

/// The player's car and the trail behind it
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction currently in effect
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = Vec::with_capacity(length.max(1));
        body.push(head);

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Commit an accepted move: the new head goes in front, and the tail is
    /// dropped unless the snake grows this tick.
    pub fn push_head(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
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

impl Occupancy for Snake {
    fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }
}

/// Cosmetic flavour of an obstacle. Every kind blocks exactly one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Car,
    Signpost,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::Tree,
        ObstacleKind::Car,
        ObstacleKind::Signpost,
    ];
}

/// A roadside hazard placed as the score grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Position,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(position: Position, kind: ObstacleKind) -> Self {
        Self { position, kind }
    }
}

impl Occupancy for Vec<Obstacle> {
    fn occupies(&self, pos: Position) -> bool {
        self.iter().any(|obstacle| obstacle.position == pos)
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake drove into its own trail
    SelfCollision,
    /// Snake hit a tree, parked car or signpost
    Obstacle,
}

impl fmt::Display for CollisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CollisionType::Wall => "wall",
            CollisionType::SelfCollision => "self",
            CollisionType::Obstacle => "obstacle",
        };
        f.write_str(label)
    }
}

/// Complete state of one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Direction requested since the last tick, applied when the next tick starts
    pub pending_direction: Direction,
    pub food: Position,
    pub obstacles: Vec<Obstacle>,
    pub grid_size: usize,
    pub score: u32,
    /// Current tick interval in milliseconds
    pub speed_ms: u64,
    /// Score at which the most recent obstacle was spawned
    pub last_obstacle_score: u32,
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, grid_size: usize, speed_ms: u64) -> Self {
        Self {
            pending_direction: snake.direction,
            snake,
            food,
            obstacles: Vec::new(),
            grid_size,
            score: 0,
            speed_ms,
            last_obstacle_score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let size = self.grid_size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    pub fn obstacle_at(&self, pos: Position) -> Option<&Obstacle> {
        self.obstacles.iter().find(|obstacle| obstacle.position == pos)
    }

    /// Buffer a direction change for the next tick.
    ///
    /// The request is checked against the direction actually in effect, not
    /// the pending one, so two quick turns can never add up to a reversal
    /// within a single tick. Returns whether the request was recorded.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.snake.direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(10, 10),
            20,
            150,
        )
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(4, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_push_head() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.push_head(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));

        snake.push_head(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_occupancy() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(snake.occupies(Position::new(5, 5)));
        assert!(snake.occupies(Position::new(3, 5)));
        assert!(!snake.occupies(Position::new(2, 5)));

        let obstacles = vec![Obstacle::new(Position::new(1, 1), ObstacleKind::Car)];
        assert!(obstacles.occupies(Position::new(1, 1)));
        assert!(!obstacles.occupies(Position::new(1, 2)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = state();

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_reverse_request_rejected() {
        let mut state = state();

        assert!(!state.request_direction(Direction::Left));
        assert_eq!(state.pending_direction, Direction::Right);

        assert!(state.request_direction(Direction::Up));
        assert_eq!(state.pending_direction, Direction::Up);
    }

    #[test]
    fn test_reversal_checked_against_active_direction() {
        let mut state = state();

        // Up is pending, but Right is still in effect, so Left stays illegal
        // and Down is fine.
        assert!(state.request_direction(Direction::Up));
        assert!(!state.request_direction(Direction::Left));
        assert!(state.request_direction(Direction::Down));
        assert_eq!(state.pending_direction, Direction::Down);
    }
}
