//! Pure rule functions: movement, collision, speed ramp and obstacle cadence.
//!
//! Nothing here touches game state directly; [`crate::game::GameEngine`]
//! combines these into a tick.

use super::direction::Direction;
use super::state::{CollisionType, Obstacle, Occupancy, Position, Snake};

/// Candidate head cell for a move, without committing it
pub fn advance(head: Position, direction: Direction) -> Position {
    head.moved_in_direction(direction)
}

/// Decide whether moving the head to `candidate` ends the session.
///
/// The snake is checked as it was before the move, tail included. Driving
/// into the cell the tail is about to leave therefore still counts as a
/// self collision.
pub fn check_collision(
    candidate: Position,
    snake: &Snake,
    obstacles: &[Obstacle],
    grid_size: usize,
) -> Option<CollisionType> {
    let size = grid_size as i32;
    if candidate.x < 0 || candidate.x >= size || candidate.y < 0 || candidate.y >= size {
        return Some(CollisionType::Wall);
    }

    if snake.occupies(candidate) {
        return Some(CollisionType::SelfCollision);
    }

    if obstacles.iter().any(|obstacle| obstacle.position == candidate) {
        return Some(CollisionType::Obstacle);
    }

    None
}

/// Tick interval after one food is eaten
pub fn next_speed(current_ms: u64, step_ms: u64, floor_ms: u64) -> u64 {
    if current_ms > floor_ms {
        current_ms.saturating_sub(step_ms).max(floor_ms)
    } else {
        current_ms
    }
}

/// Whether the score has just reached a multiple that has not produced an
/// obstacle yet
pub fn obstacle_due(score: u32, last_spawn_score: u32, every: u32) -> bool {
    every > 0 && score > 0 && score > last_spawn_score && score % every == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::ObstacleKind;

    fn snake() -> Snake {
        Snake::new(Position::new(5, 5), Direction::Right, 3)
    }

    #[test]
    fn test_advance() {
        let head = Position::new(3, 3);
        assert_eq!(advance(head, Direction::Up), Position::new(3, 2));
        assert_eq!(advance(head, Direction::Down), Position::new(3, 4));
        assert_eq!(advance(head, Direction::Left), Position::new(2, 3));
        assert_eq!(advance(head, Direction::Right), Position::new(4, 3));
    }

    #[test]
    fn test_wall_collision() {
        let snake = snake();
        for pos in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(10, 0),
            Position::new(0, 10),
        ] {
            assert_eq!(
                check_collision(pos, &snake, &[], 10),
                Some(CollisionType::Wall)
            );
        }
        assert_eq!(check_collision(Position::new(9, 9), &snake, &[], 10), None);
    }

    #[test]
    fn test_self_collision() {
        let snake = snake();
        assert_eq!(
            check_collision(Position::new(4, 5), &snake, &[], 10),
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_vacating_tail_cell_still_collides() {
        // Square loop: the head at (5,5) is about to enter (5,6), the tail.
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
            ],
            direction: Direction::Left,
        };
        let candidate = advance(snake.head(), Direction::Down);
        assert_eq!(candidate, snake.tail());
        assert_eq!(
            check_collision(candidate, &snake, &[], 10),
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_obstacle_collision() {
        let obstacles = [Obstacle::new(Position::new(6, 5), ObstacleKind::Tree)];
        assert_eq!(
            check_collision(Position::new(6, 5), &snake(), &obstacles, 10),
            Some(CollisionType::Obstacle)
        );
        assert_eq!(
            check_collision(Position::new(6, 6), &snake(), &obstacles, 10),
            None
        );
    }

    #[test]
    fn test_wall_takes_precedence() {
        let obstacles = [Obstacle::new(Position::new(10, 5), ObstacleKind::Car)];
        assert_eq!(
            check_collision(Position::new(10, 5), &snake(), &obstacles, 10),
            Some(CollisionType::Wall)
        );
    }

    #[test]
    fn test_next_speed_ramps_to_floor() {
        assert_eq!(next_speed(150, 5, 50), 145);
        assert_eq!(next_speed(53, 5, 50), 50);
        assert_eq!(next_speed(50, 5, 50), 50);
        assert_eq!(next_speed(3, 5, 1), 1);
    }

    #[test]
    fn test_obstacle_due() {
        assert!(!obstacle_due(0, 0, 3));
        assert!(!obstacle_due(2, 0, 3));
        assert!(obstacle_due(3, 0, 3));
        assert!(!obstacle_due(3, 3, 3));
        assert!(!obstacle_due(4, 3, 3));
        assert!(obstacle_due(6, 3, 3));
        assert!(!obstacle_due(6, 0, 0));
    }
}
