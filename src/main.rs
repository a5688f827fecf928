use clap::Parser;
use log::{debug, LevelFilter};
use snafu::ErrorCompat;

mod args;
mod census;

use crate::args::Args;
use crate::census::{build_options, run_dashboard, CensusResult, Overrides};

fn run(args: &Args) -> CensusResult<()> {
    let overrides = Overrides {
        assets_dir: args.assets.clone(),
        year: args.year,
        religion: args.religion.clone(),
        strict: args.strict,
        out: args.out.clone(),
        long_csv: args.long_csv.clone(),
        reference: args.reference.clone(),
    };
    let opts = build_options(args.config.as_deref(), &overrides)?;
    run_dashboard(&opts)
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
    debug!("args: {:?}", args);

    if let Err(e) = run(&args) {
        eprintln!("An error occured: {}", e);
        if let Some(source) = std::error::Error::source(&e) {
            eprintln!("caused by: {}", source);
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
