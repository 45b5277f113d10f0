//! The task-farm control loop. One dispatcher, `num_workers` slots, a
//! demand-driven collect-then-dispatch steady state, and an explicit
//! `DISPATCHING -> DRAINING -> DONE` state machine for termination.
use std::path::Path;

use log::{debug, info};

use crate::aggregate::{CccAggregate, WordStatsAggregate};
use crate::error::Error;
use crate::signal_io::SignalFile;
use crate::task::{ResultMsg, TaskMsg};
use crate::tokenizer::ChunkReader;
use crate::transport::DispatcherTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatcherState {
    Dispatching,
    Draining,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Busy,
    Drained,
}

pub struct WordStatsOutcome {
    pub per_file: Vec<(std::path::PathBuf, WordStatsAggregate)>,
}

pub struct CccFileOutcome {
    pub path: std::path::PathBuf,
    pub n: usize,
    pub result: Vec<f64>,
    pub mismatches: Option<usize>,
}

pub struct CccOutcome {
    pub per_file: Vec<CccFileOutcome>,
}

/// Producer of tasks, independent of workload kind: the dispatcher pulls
/// `next()` until it returns `None`, meaning all files are exhausted.
trait TaskSource {
    fn next(&mut self) -> Result<Option<TaskMsg>, Error>;
}

struct WordStatsSource {
    reader: ChunkReader,
}

impl TaskSource for WordStatsSource {
    fn next(&mut self) -> Result<Option<TaskMsg>, Error> {
        Ok(self
            .reader
            .next_chunk()?
            .map(|(file_id, bytes)| TaskMsg::WordChunk { file_id, bytes }))
    }
}

struct CccSource {
    files: Vec<(SignalFile, std::fs::File)>,
    file_idx: usize,
    tau: usize,
}

impl TaskSource for CccSource {
    fn next(&mut self) -> Result<Option<TaskMsg>, Error> {
        // A zero-length signal file has no tau to dispatch; its (trivially
        // complete, empty) aggregate is handled entirely by `CccAggregate`.
        while self.file_idx < self.files.len() && self.files[self.file_idx].0.n == 0 {
            self.file_idx += 1;
        }
        if self.file_idx >= self.files.len() {
            return Ok(None);
        }
        let (sig, _file) = &self.files[self.file_idx];
        let task = TaskMsg::Ccc {
            file_id: self.file_idx,
            n: sig.n,
            x: sig.x.clone(),
            y: sig.y.clone(),
            tau: self.tau,
        };
        self.tau += 1;
        if self.tau >= sig.n {
            self.tau = 0;
            self.file_idx += 1;
        }
        Ok(Some(task))
    }
}

/// Run the WordStats workload to completion: one chunk per task, results
/// merged into a `WordStatsAggregate` per file.
pub fn run_word_stats(
    transport: &DispatcherTransport,
    num_workers: usize,
    paths: &[impl AsRef<Path>],
    buffer_size: usize,
) -> Result<WordStatsOutcome, Error> {
    let reader = ChunkReader::open(paths, buffer_size)?;
    let mut source = WordStatsSource { reader };
    let mut aggregates: Vec<WordStatsAggregate> =
        (0..paths.len()).map(|_| WordStatsAggregate::new()).collect();

    run_loop(transport, num_workers, &mut source, |result| match result {
        ResultMsg::WordStats { file_id, stats, .. } => {
            aggregates[file_id].merge(&stats);
            Ok(())
        }
        ResultMsg::Ccc { .. } | ResultMsg::Failed { .. } => Err(Error::Protocol(
            "received an unexpected result while running the WordStats workload".to_string(),
        )),
    })?;

    Ok(WordStatsOutcome {
        per_file: paths
            .iter()
            .map(|p| p.as_ref().to_path_buf())
            .zip(aggregates)
            .collect(),
    })
}

/// Run the CCC workload to completion: one tau per task, results stored
/// into a per-file `R[]`, then written back (append) or diffed (compare).
pub fn run_ccc(
    transport: &DispatcherTransport,
    num_workers: usize,
    paths: &[impl AsRef<Path>],
    compare: bool,
) -> Result<CccOutcome, Error> {
    let mut files = Vec::with_capacity(paths.len());
    let mut aggregates = Vec::with_capacity(paths.len());
    for p in paths {
        let (sig, file) = SignalFile::load(p.as_ref())?;
        aggregates.push(CccAggregate::new(sig.n));
        files.push((sig, file));
    }
    let mut source = CccSource {
        files,
        file_idx: 0,
        tau: 0,
    };

    run_loop(transport, num_workers, &mut source, |result| match result {
        ResultMsg::Ccc {
            file_id,
            tau,
            value,
            ..
        } => aggregates[file_id].store(tau, value),
        ResultMsg::WordStats { .. } | ResultMsg::Failed { .. } => Err(Error::Protocol(
            "received an unexpected result while running the CCC workload".to_string(),
        )),
    })?;

    let mut per_file = Vec::with_capacity(paths.len());
    for ((sig, file), agg) in source.files.into_iter().zip(aggregates) {
        if !agg.is_complete() {
            return Err(Error::Protocol(format!(
                "incomplete result vector for a file of size {}",
                sig.n
            )));
        }
        let r = agg.into_vector()?;
        let mismatches = if compare {
            let reference = sig.read_reference(&file)?;
            Some(
                reference
                    .iter()
                    .zip(r.iter())
                    .filter(|(a, b)| a.to_bits() != b.to_bits())
                    .count(),
            )
        } else {
            sig.append_result(&file, &r)?;
            None
        };
        per_file.push(CccFileOutcome {
            path: std::path::PathBuf::new(),
            n: sig.n,
            result: r,
            mismatches,
        });
    }
    for (outcome, p) in per_file.iter_mut().zip(paths) {
        outcome.path = p.as_ref().to_path_buf();
    }

    Ok(CccOutcome { per_file })
}

/// The scheduling policy shared by both workloads: bootstrap one task per
/// worker, then demand-driven collect-then-dispatch until every slot drains.
fn run_loop(
    transport: &DispatcherTransport,
    num_workers: usize,
    source: &mut dyn TaskSource,
    mut integrate: impl FnMut(ResultMsg) -> Result<(), Error>,
) -> Result<(), Error> {
    let mut slots = vec![SlotState::Busy; num_workers];
    let mut in_flight = 0usize;

    for rank in 1..=num_workers {
        match source.next()? {
            Some(task) => {
                transport.send(rank, task)?;
                in_flight += 1;
            }
            None => {
                transport.send(rank, TaskMsg::Sentinel)?;
                slots[rank - 1] = SlotState::Drained;
            }
        }
    }
    let mut state = if slots.iter().all(|s| *s == SlotState::Drained) {
        DispatcherState::Draining
    } else {
        DispatcherState::Dispatching
    };
    debug!("bootstrap complete, {in_flight} tasks in flight, state = {state:?}");

    while state != DispatcherState::Done {
        let result = transport.recv_any()?;
        // A worker reports its own fatal error this way instead of just
        // dropping off the channel, so the dispatcher surfaces the real
        // diagnostic instead of waiting for every other worker to drain and
        // then reporting a generic channel-closed error.
        if let ResultMsg::Failed { rank, message } = result {
            return Err(Error::Protocol(format!("worker {rank} failed: {message}")));
        }
        let rank = match &result {
            ResultMsg::WordStats { rank, .. } => *rank,
            ResultMsg::Ccc { rank, .. } => *rank,
            ResultMsg::Failed { .. } => unreachable!("handled above"),
        };
        integrate(result)?;
        in_flight -= 1;

        match source.next()? {
            Some(task) => {
                transport.send(rank, task)?;
                in_flight += 1;
            }
            None => {
                transport.send(rank, TaskMsg::Sentinel)?;
                slots[rank - 1] = SlotState::Drained;
                if state == DispatcherState::Dispatching
                    && slots.iter().all(|s| *s == SlotState::Drained)
                {
                    state = DispatcherState::Draining;
                }
            }
        }

        if state == DispatcherState::Draining && in_flight == 0 {
            state = DispatcherState::Done;
        }
    }
    info!("dispatcher done, all {num_workers} workers sent a sentinel");
    Ok(())
}

/// Spawn `num_workers` worker threads, wire them to a fresh transport, run
/// the WordStats dispatch loop, and join every thread before returning.
pub fn spawn_workers_and_run_word_stats(
    num_workers: usize,
    paths: &[impl AsRef<Path>],
    buffer_size: usize,
) -> Result<WordStatsOutcome, Error> {
    let (dispatcher_transport, worker_transports) = crate::transport::build(num_workers);
    let handles: Vec<_> = worker_transports
        .into_iter()
        .map(|wt| std::thread::spawn(move || crate::worker::run(wt)))
        .collect();

    let outcome = run_word_stats(&dispatcher_transport, num_workers, paths, buffer_size);
    // Drop the dispatcher's task senders before joining: on a fatal error
    // that short-circuits `run_word_stats` before every worker has been sent
    // a sentinel, this is what unblocks the remaining workers' `recv_task`
    // (channel disconnect) instead of joining hanging forever.
    drop(dispatcher_transport);
    join_workers(handles, outcome)
}

/// Same as [`spawn_workers_and_run_word_stats`] for the CCC workload.
pub fn spawn_workers_and_run_ccc(
    num_workers: usize,
    paths: &[impl AsRef<Path>],
    compare: bool,
) -> Result<CccOutcome, Error> {
    let (dispatcher_transport, worker_transports) = crate::transport::build(num_workers);
    let handles: Vec<_> = worker_transports
        .into_iter()
        .map(|wt| std::thread::spawn(move || crate::worker::run(wt)))
        .collect();

    let outcome = run_ccc(&dispatcher_transport, num_workers, paths, compare);
    drop(dispatcher_transport);
    join_workers(handles, outcome)
}

/// Join every worker thread, then return `outcome` unchanged if it already
/// carries the run's own fatal error. A join-stage failure (a panicked
/// thread, or a worker that exited because the dispatcher's error path
/// dropped the transport out from under it) is only surfaced when `outcome`
/// itself was `Ok` — otherwise an incidental worker-side disconnect would
/// overwrite the specific, diagnostic error the dispatcher already captured
/// with a generic transport error.
fn join_workers<T>(
    handles: Vec<std::thread::JoinHandle<Result<(), Error>>>,
    outcome: Result<T, Error>,
) -> Result<T, Error> {
    let mut join_err = None;
    for h in handles {
        match h.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                join_err.get_or_insert(e);
            }
            Err(_) => {
                join_err.get_or_insert(Error::Transport("worker thread panicked".to_string()));
            }
        }
    }
    match outcome {
        Err(e) => Err(e),
        Ok(v) => match join_err {
            Some(e) => Err(e),
            None => Ok(v),
        },
    }
}
