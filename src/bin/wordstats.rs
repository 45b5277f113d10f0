//! `wordstats` — word-length and vowel-by-length statistics over one or
//! more UTF-8 text files.
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

use taskfarm::cli::WordStatsArgs;
use taskfarm::dispatcher::spawn_workers_and_run_word_stats;
use taskfarm::error::Error;
use taskfarm::report::print_word_stats;

fn main() -> ExitCode {
    env_logger::init();
    let args = WordStatsArgs::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e}");
            error!("fatal: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(args: WordStatsArgs) -> Result<(), Error> {
    if args.files.is_empty() {
        return Err(Error::Usage(
            "The program needs at least one text file to parse!".to_string(),
        ));
    }
    if args.workers < 1 {
        return Err(Error::Usage(
            "The program needs at least one worker!".to_string(),
        ));
    }

    let start = Instant::now();
    info!(
        "starting wordstats: {} file(s), {} worker(s), buffer_size = {}",
        args.files.len(),
        args.workers,
        args.buffer_size
    );
    let outcome =
        spawn_workers_and_run_word_stats(args.workers, &args.files, args.buffer_size)?;
    info!("elapsed: {:.6}s", start.elapsed().as_secs_f64());

    for (path, agg) in &outcome.per_file {
        print_word_stats(path, agg);
    }
    Ok(())
}
