mod barrier;
mod buffer;
mod config;
mod driver;
mod engine;
mod error;
mod grid;
mod logging;
mod partition;
mod rules;
mod settings;
mod terminal;
mod universe;

use clap::{Args, Parser, Subcommand};
use config::{LifeConfig, RawConfig, SeedSource, DEFAULT_DELAY, DEFAULT_UNIVERSE, DEFAULT_WORKERS};
use driver::TextSink;
use engine::Engine;
use error::{LifeError, LifeResult};
use grid::Grid;
use rand::prelude::*;
use settings::Settings;
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "parlife")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Conway's Game of Life on a torus, stepped by parallel band workers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the universe in the terminal until q, Esc or Ctrl-C
    Run {
        #[command(flatten)]
        universe: UniverseArgs,

        /// Seconds between frames
        #[arg(short, long)]
        time: Option<f32>,

        /// Character used to draw alive cells
        #[arg(short, long)]
        char: Option<char>,

        /// Colour scheme (0-9)
        #[arg(short = 'C', long)]
        color: Option<u8>,
    },

    /// Print generations 0..=N as '0'/'1' text to stdout
    Print {
        #[command(flatten)]
        universe: UniverseArgs,

        /// Last generation to print
        #[arg(short, long, default_value = "1")]
        generations: u64,
    },
}

#[derive(Args)]
struct UniverseArgs {
    /// Side of the square universe
    size: usize,

    /// Number of worker threads (one column band each)
    workers: Option<usize>,

    /// Universe width, overriding SIZE
    #[arg(long)]
    width: Option<usize>,

    /// Universe height, overriding SIZE
    #[arg(long)]
    height: Option<usize>,

    /// Seed file of '0'/'1' rows
    #[arg(short, long)]
    universe: Option<PathBuf>,

    /// Start from a random soup with this alive density instead of a file
    #[arg(long)]
    random: Option<f64>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log: Option<PathBuf>,
}

impl UniverseArgs {
    fn raw_config(&self, settings: &Settings) -> RawConfig {
        let seed = match self.random {
            Some(density) => SeedSource::Random { density, seed: self.seed },
            None => SeedSource::File(
                self.universe
                    .clone()
                    .or_else(|| settings.universe.clone())
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_UNIVERSE)),
            ),
        };
        RawConfig {
            width: self.width.unwrap_or(self.size),
            height: self.height.unwrap_or(self.size),
            workers: self.workers.or(settings.workers).unwrap_or(DEFAULT_WORKERS),
            delay: settings.delay.unwrap_or(DEFAULT_DELAY),
            seed,
            draw_char: settings.draw_char.unwrap_or('█'),
            color_scheme: settings.color_scheme.unwrap_or(0),
        }
    }
}

fn seed_grid(config: &LifeConfig) -> LifeResult<Grid> {
    match &config.seed {
        SeedSource::File(path) => Ok(universe::load(path, config.width, config.height)?),
        SeedSource::Random { density, seed } => {
            let seed = seed.unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0)
            });
            tracing::info!(seed, density, "random universe");
            let mut rng = StdRng::seed_from_u64(seed);
            Ok(universe::random(config.width, config.height, *density, &mut rng))
        }
    }
}

fn run(cli: Cli) -> LifeResult<()> {
    let universe = match &cli.command {
        Commands::Run { universe, .. } | Commands::Print { universe, .. } => universe,
    };
    logging::init(universe.log.as_deref()).map_err(|e| LifeError::Resource {
        what: "log file".into(),
        message: e.to_string(),
    })?;
    let settings = Settings::load();
    let mut raw = universe.raw_config(&settings);

    match cli.command {
        Commands::Run { time, char: draw_char, color, .. } => {
            raw.delay = time.unwrap_or(raw.delay);
            raw.draw_char = draw_char.unwrap_or(raw.draw_char);
            raw.color_scheme = color.unwrap_or(raw.color_scheme).min(9);
            let config = raw.validate()?;
            tracing::info!(?config, "starting live view");

            let engine = Engine::start(seed_grid(&config)?, config.workers)?;
            let mut sink = terminal::TerminalSink::new(config.draw_char, config.color_scheme)?;
            driver::run(&engine, &mut sink, config.delay)?;
        }
        Commands::Print { generations, .. } => {
            let config = raw.validate()?;
            let engine = Engine::start(seed_grid(&config)?, config.workers)?;
            let mut sink = TextSink::new(io::stdout().lock());
            driver::run_for(&engine, &mut sink, generations)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "fatal");
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
