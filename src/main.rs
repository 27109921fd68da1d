use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};
use ncb_snake::game::{GameConfig, GameEngine, Session};
use ncb_snake::modes::HumanMode;
use ncb_snake::persistence::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ncb_snake")]
#[command(version, about = "Snake for safe drivers: collect claim-free years, grow your discount")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width and height of the grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    initial_speed: Option<u64>,

    /// Milliseconds shaved off the tick interval per year collected
    #[arg(long)]
    speed_step: Option<u64>,

    /// Fastest tick interval in milliseconds
    #[arg(long)]
    min_speed: Option<u64>,

    /// Seed for food and obstacle placement
    #[arg(long)]
    seed: Option<u64>,

    /// File the high score is kept in
    #[arg(long, default_value = ".ncb_snake_high_score")]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_save: bool,

    /// Log file (the terminal is taken by the game)
    #[arg(long, default_value = "ncb_snake.log")]
    log_file: PathBuf,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(initial_speed) = self.initial_speed {
            config.initial_speed_ms = initial_speed;
        }
        if let Some(speed_step) = self.speed_step {
            config.speed_step_ms = speed_step;
        }
        if let Some(min_speed) = self.min_speed {
            config.min_speed_ms = min_speed;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level.into(), Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = cli.game_config()?;
    info!("Starting with {:?}", config);

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    }
    .context("Invalid game configuration")?;

    let store: Box<dyn HighScoreStore> = if cli.no_save {
        Box::new(MemoryHighScoreStore::new())
    } else {
        Box::new(FileHighScoreStore::new(cli.high_score_file.clone()))
    };

    let mut human_mode = HumanMode::new(Session::new(engine, store));
    human_mode.run().await?;

    Ok(())
}
