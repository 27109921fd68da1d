use log::{debug, warn};

use super::{
    config::{ConfigError, GameConfig},
    direction::Direction,
    rules,
    spawner::Spawner,
    state::{CollisionType, GameState, Obstacle, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Food could not be placed because no free cell was left
    pub board_full: bool,
    /// Obstacle added this step
    pub spawned_obstacle: Option<Obstacle>,
    /// New tick interval if eating sped the game up
    pub new_speed_ms: Option<u64>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the session has ended
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    spawner: Spawner,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            spawner: Spawner::new(),
        })
    }

    /// Engine whose food and obstacle placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            spawner: Spawner::from_seed(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center = (self.config.grid_size / 2) as i32;

        let snake = Snake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_snake_length,
        );

        // The constructors only accept validated configs, which always
        // leave room for the first food.
        let food = self
            .spawner
            .spawn_food(self.config.grid_size, &snake, &Vec::new())
            .unwrap_or(Position::new(0, 0));

        GameState::new(
            snake,
            food,
            self.config.grid_size,
            self.config.initial_speed_ms,
        )
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if !state.is_alive {
            return StepResult {
                terminated: true,
                info: StepInfo::default(),
            };
        }

        // The buffered turn takes effect only now, at the start of the tick
        state.snake.direction = state.pending_direction;

        let new_head = rules::advance(state.snake.head(), state.snake.direction);

        if let Some(collision_type) =
            rules::check_collision(new_head, &state.snake, &state.obstacles, state.grid_size)
        {
            state.is_alive = false;

            return StepResult {
                terminated: true,
                info: StepInfo {
                    collision_type: Some(collision_type),
                    ..Default::default()
                },
            };
        }

        let ate_food = new_head == state.food;
        state.snake.push_head(new_head, ate_food);
        state.steps += 1;

        let mut info = StepInfo {
            ate_food,
            ..Default::default()
        };

        if ate_food {
            state.score += 1;
            debug!("Food eaten at {}, score {}", new_head, state.score);

            match self
                .spawner
                .spawn_food(state.grid_size, &state.snake, &state.obstacles)
            {
                Some(food) => state.food = food,
                None => {
                    warn!("No free cell left for food, ending session");
                    state.is_alive = false;
                    info.board_full = true;
                    return StepResult {
                        terminated: true,
                        info,
                    };
                }
            }

            let speed = rules::next_speed(
                state.speed_ms,
                self.config.speed_step_ms,
                self.config.min_speed_ms,
            );
            if speed != state.speed_ms {
                debug!("Speed {}ms -> {}ms", state.speed_ms, speed);
                state.speed_ms = speed;
                info.new_speed_ms = Some(speed);
            }
        }

        if rules::obstacle_due(
            state.score,
            state.last_obstacle_score,
            self.config.obstacle_every,
        ) {
            state.last_obstacle_score = state.score;
            match self.spawner.spawn_obstacle(
                state.grid_size,
                &state.snake,
                &state.obstacles,
                state.food,
            ) {
                Some(obstacle) => {
                    debug!("{:?} placed at {}", obstacle.kind, obstacle.position);
                    state.obstacles.push(obstacle);
                    info.spawned_obstacle = Some(obstacle);
                }
                None => warn!("No free cell left for an obstacle, skipping"),
            }
        }

        StepResult {
            terminated: false,
            info,
        }
    }
}
