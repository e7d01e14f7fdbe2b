mod analysis;
mod args;

use clap::Parser;
use log::{debug, LevelFilter};

use crate::args::Args;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::builder().filter_level(LevelFilter::Debug).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
    debug!("args: {:?}", args);

    if let Err(e) = analysis::run_from_args(&args) {
        analysis::print_error(&e);
        std::process::exit(1);
    }
}
