//! `ccc` — circular cross-correlation of pairs of equal-length signals
//! stored in one or more signal files.
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

use taskfarm::cli::CccArgs;
use taskfarm::dispatcher::spawn_workers_and_run_ccc;
use taskfarm::error::Error;
use taskfarm::report::print_ccc_outcome;

fn main() -> ExitCode {
    env_logger::init();
    let args = CccArgs::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e}");
            error!("fatal: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(args: CccArgs) -> Result<(), Error> {
    if args.files.is_empty() {
        return Err(Error::Usage(
            "The program needs at least one signal file to parse!".to_string(),
        ));
    }
    if args.workers < 1 {
        return Err(Error::Usage(
            "The program needs at least one worker!".to_string(),
        ));
    }

    let start = Instant::now();
    info!(
        "starting ccc: {} file(s), {} worker(s), compare = {}",
        args.files.len(),
        args.workers,
        args.compare
    );
    let outcome = spawn_workers_and_run_ccc(args.workers, &args.files, args.compare)?;
    info!("elapsed: {:.6}s", start.elapsed().as_secs_f64());

    print_ccc_outcome(&outcome, args.compare);
    Ok(())
}
