use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::state::{Obstacle, ObstacleKind, Occupancy, Position, Snake};

/// Rejected samples allowed per grid cell before falling back to a scan
const SAMPLES_PER_CELL: usize = 4;

/// Places food and obstacles on free cells
pub struct Spawner {
    rng: StdRng,
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Spawner with a fixed seed, for reproducible sessions
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a uniformly random cell that none of `excluded` occupies.
    ///
    /// Random sampling is tried first. On a crowded grid this falls back to
    /// choosing among the remaining free cells, so the call always
    /// terminates. Returns `None` only if every cell is taken.
    pub fn place_random_cell(
        &mut self,
        grid_size: usize,
        excluded: &[&dyn Occupancy],
    ) -> Option<Position> {
        if grid_size == 0 {
            return None;
        }

        let is_free = |pos: Position| !excluded.iter().any(|set| set.occupies(pos));

        for _ in 0..grid_size * grid_size * SAMPLES_PER_CELL {
            let x = self.rng.gen_range(0..grid_size) as i32;
            let y = self.rng.gen_range(0..grid_size) as i32;
            let pos = Position::new(x, y);

            if is_free(pos) {
                return Some(pos);
            }
        }

        warn!("Random placement kept colliding, scanning for free cells");
        let size = grid_size as i32;
        let free: Vec<Position> = (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .filter(|&pos| is_free(pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }

    /// Place food anywhere not covered by the snake or an obstacle
    pub fn spawn_food(
        &mut self,
        grid_size: usize,
        snake: &Snake,
        obstacles: &Vec<Obstacle>,
    ) -> Option<Position> {
        self.place_random_cell(grid_size, &[snake, obstacles])
    }

    /// Place an obstacle of random kind, keeping clear of the snake, other
    /// obstacles and the food
    pub fn spawn_obstacle(
        &mut self,
        grid_size: usize,
        snake: &Snake,
        obstacles: &Vec<Obstacle>,
        food: Position,
    ) -> Option<Obstacle> {
        let position = self.place_random_cell(grid_size, &[snake, obstacles, &food])?;
        let kind = ObstacleKind::ALL[self.rng.gen_range(0..ObstacleKind::ALL.len())];
        Some(Obstacle::new(position, kind))
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}
