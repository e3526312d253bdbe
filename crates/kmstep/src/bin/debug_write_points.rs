use clap::Parser;
use kmstep::debug_helpers::init_logging;
use kmstep::{DEFAULT_COORDINATE_RANGE, DEFAULT_SEED, PointSet, rng};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    /// Output point file
    out: PathBuf,

    #[arg(long, default_value_t = 2)]
    dimension: usize,

    #[arg(long, default_value_t = 300)]
    count: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long, default_value_t = DEFAULT_COORDINATE_RANGE)]
    range: f32,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    let mut rng = rng::from_seed(args.seed);
    let points = match PointSet::generate(&mut rng, args.dimension, args.count, args.range) {
        Ok(points) => points,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = points.write_to_file(&args.out) {
        error!("{e}");
        std::process::exit(1);
    }
    info!("wrote {} points to {}", points.len(), args.out.display());
}
