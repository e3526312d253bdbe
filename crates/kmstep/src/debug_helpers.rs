use crate::{
    DEFAULT_COORDINATE_RANGE, DEFAULT_RUN_THROUGH_LIMIT, DEFAULT_SEED, Engine, EngineConfig,
    EngineError, InitMode, rng,
};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SourceArgs {
    /// Point file to load instead of generating random points
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Dimension of generated points
    #[arg(long, default_value_t = 2)]
    pub dimension: usize,

    /// Number of generated points
    #[arg(long, default_value_t = 300)]
    pub count: usize,

    /// Seed for the engine's random generator
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Half-width of the sampling interval
    #[arg(long, default_value_t = DEFAULT_COORDINATE_RANGE)]
    pub range: f32,

    /// Iteration limit for run-through
    #[arg(long, default_value_t = DEFAULT_RUN_THROUGH_LIMIT)]
    pub limit: usize,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[derive(Args)]
pub struct ClusterArgs {
    /// Number of clusters
    #[arg(short, long, default_value_t = 3)]
    pub k: usize,

    /// Initialization: 0 = uniform random, 1 = random sample, 2 = farthest point
    #[arg(short, long, default_value_t = 2)]
    pub mode: u8,
}

impl ClusterArgs {
    pub fn init_mode(&self) -> Result<InitMode, EngineError> {
        InitMode::try_from(self.mode)
    }
}

pub fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .init();
}

/// Engine seeded and configured from the command line, holding either the
/// loaded or the generated point set.
pub fn build_engine(args: &SourceArgs) -> Result<Engine, EngineError> {
    let config = EngineConfig {
        coordinate_range: args.range,
        run_through_limit: args.limit,
    };
    let mut engine = Engine::with_rng(rng::from_seed(args.seed), config);
    match &args.file {
        Some(path) => engine.load_from_file(path)?,
        None => engine.generate(args.dimension, args.count)?,
    };
    Ok(engine)
}
