use clap::Parser;
use kmstep::EngineError;
use kmstep::debug_helpers::{ClusterArgs, SourceArgs, build_engine, init_logging};
use log::error;
use std::time::Instant;

#[derive(Parser)]
struct Args {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    cluster: ClusterArgs,
}

fn run(args: &Args) -> Result<(), EngineError> {
    let mut engine = build_engine(&args.source)?;
    engine.initialize(args.cluster.k, args.cluster.init_mode()?)?;

    let t = Instant::now();
    let outcome = engine.run_through()?;
    let elapsed = t.elapsed();

    let state = engine.state();
    println!(
        "{outcome:?}: {} iterations, energy {:?}, {:?}",
        state.iteration(),
        state.energy(),
        elapsed,
    );
    for (j, size) in state.cluster_sizes().iter().enumerate() {
        println!("cluster {j}: {size} points, centroid {:?}", state.centroid(j));
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.source.debug);

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}
