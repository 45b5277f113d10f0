//! # taskfarm
//!
//! A parallel task-farm coordinator for two embarrassingly-parallel
//! workloads — word-length/vowel statistics over text files, and circular
//! cross-correlation over pairs of signal files — executed across a fixed
//! pool of worker threads connected by a point-to-point, rank-addressed
//! message transport.
//!
//! The coordination core (dispatcher, worker, transport, task/result
//! records, aggregation) is shared by both workloads; only the task
//! production (the tokenizer/chunker, or the CCC signal/tau cursor) and the
//! per-task kernel differ.
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), taskfarm::error::Error> {
//! use taskfarm::dispatcher::spawn_workers_and_run_word_stats;
//!
//! let outcome = spawn_workers_and_run_word_stats(4, &["a.txt", "b.txt"], 1000)?;
//! for (path, agg) in &outcome.per_file {
//!     println!("{}: {} words", path.display(), agg.total_words);
//! }
//! # Ok(())
//! # }
//! ```
pub mod aggregate;
pub mod ccc;
pub mod cli;
pub mod dispatcher;
pub mod error;
pub mod io;
pub mod report;
pub mod signal_io;
pub mod task;
pub mod tokenizer;
pub mod transport;
pub mod worker;
