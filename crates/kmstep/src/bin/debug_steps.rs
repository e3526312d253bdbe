use clap::Parser;
use kmstep::EngineError;
use kmstep::debug_helpers::{ClusterArgs, SourceArgs, build_engine, init_logging};
use log::error;

#[derive(Parser)]
struct Args {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    cluster: ClusterArgs,

    /// Number of forward steps
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Step back once after this many steps
    #[arg(long)]
    step_back_at: Option<usize>,
}

fn run(args: &Args) -> Result<(), EngineError> {
    let mut engine = build_engine(&args.source)?;
    engine.initialize(args.cluster.k, args.cluster.init_mode()?)?;

    for i in 1..=args.steps {
        let state = engine.step()?;
        println!(
            "step {:>4}: energy {:?}, sizes {:?}",
            state.iteration(),
            state.energy(),
            state.cluster_sizes(),
        );

        if args.step_back_at == Some(i) {
            let state = engine.step_back()?;
            println!(
                "back {:>4}: energy {:?}, sizes {:?}",
                state.iteration(),
                state.energy(),
                state.cluster_sizes(),
            );
        }
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
