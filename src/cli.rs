//! Shared CLI surface for `wordstats` and `ccc`.
use std::path::PathBuf;

use clap::Parser;

/// There is no real process group to query here — ranks are simulated
/// in-process — so the worker count defaults to the number of available
/// cores minus the dispatcher's own thread.
fn default_workers() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// Compute the frequency distribution of word lengths, and a 2-D histogram
/// of (vowel count, word length), for each input text file.
#[derive(Debug, Parser)]
#[command(name = "wordstats", version, about)]
pub struct WordStatsArgs {
    /// One or more UTF-8 text files. Deliberately not `#[arg(required =
    /// true)]`: an empty list must fail with a single-line message on
    /// stdout and exit code 1, which clap's own usage-error formatting
    /// (stderr, exit code 2) does not give us — so the check is left to
    /// `run()`'s explicit usage-error path instead.
    pub files: Vec<PathBuf>,

    /// Number of worker threads (ranks 1..=N).
    #[arg(long, default_value_t = default_workers())]
    pub workers: usize,

    /// Maximum chunk size handed to a single worker, in bytes.
    #[arg(long, default_value_t = 1000)]
    pub buffer_size: usize,
}

/// Compute the circular cross-correlation of each pair of equal-length
/// signals stored in the given files.
#[derive(Debug, Parser)]
#[command(name = "ccc", version, about)]
pub struct CccArgs {
    /// One or more signal files. Not marked `required` at the clap level,
    /// for the same reason as `WordStatsArgs::files`.
    pub files: Vec<PathBuf>,

    /// Number of worker threads (ranks 1..=N).
    #[arg(long, default_value_t = default_workers())]
    pub workers: usize,

    /// Compare against the stored reference vector instead of appending.
    #[arg(short = 'c', long = "compare")]
    pub compare: bool,
}
