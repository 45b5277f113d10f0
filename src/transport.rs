//! Point-to-point message transport with rank identifiers.
//!
//! One `flume` channel per worker carries tasks from the dispatcher to that
//! worker (strictly ordered, one producer, one consumer); a single shared
//! channel carries results back from every worker to the dispatcher.
//! `flume::Sender` clones cheaply, which is what lets every worker rank hold
//! its own clone of the one dispatcher-side result sender — a wildcard
//! receive on the dispatcher side, since any worker may be the next to
//! answer.

use crate::error::Error;
use crate::task::{ResultMsg, TaskMsg};

/// Dispatcher-side handle: one per-worker task sender (ordered per pair) and
/// one shared result receiver (no ordering across workers).
pub struct DispatcherTransport {
    pub task_txs: Vec<flume::Sender<TaskMsg>>,
    pub result_rx: flume::Receiver<ResultMsg>,
}

/// Worker-side handle for a single rank.
pub struct WorkerTransport {
    pub rank: usize,
    pub task_rx: flume::Receiver<TaskMsg>,
    pub result_tx: flume::Sender<ResultMsg>,
}

/// Build the transport for `num_workers` worker ranks (1..=num_workers).
/// Rank 0 is implicitly the dispatcher and owns no channel endpoints of its
/// own beyond `DispatcherTransport`.
pub fn build(num_workers: usize) -> (DispatcherTransport, Vec<WorkerTransport>) {
    let (result_tx_template, result_rx) = flume::unbounded::<ResultMsg>();
    let mut task_txs = Vec::with_capacity(num_workers);
    let mut workers = Vec::with_capacity(num_workers);
    for rank in 1..=num_workers {
        let (task_tx, task_rx) = flume::unbounded::<TaskMsg>();
        task_txs.push(task_tx);
        workers.push(WorkerTransport {
            rank,
            task_rx,
            result_tx: result_tx_template.clone(),
        });
    }
    (
        DispatcherTransport {
            task_txs,
            result_rx,
        },
        workers,
    )
}

impl DispatcherTransport {
    /// Send one task to worker `rank` (1-indexed). Per-(dispatcher, rank)
    /// ordering is guaranteed by the underlying channel.
    pub fn send(&self, rank: usize, msg: TaskMsg) -> Result<(), Error> {
        self.task_txs[rank - 1]
            .send(msg)
            .map_err(|e| Error::Transport(format!("send to worker {rank} failed: {e}")))
    }

    /// Blocking wildcard receive: the next result from any worker.
    pub fn recv_any(&self) -> Result<ResultMsg, Error> {
        self.result_rx
            .recv()
            .map_err(|e| Error::Transport(format!("result channel closed: {e}")))
    }
}

impl WorkerTransport {
    pub fn recv_task(&self) -> Result<TaskMsg, Error> {
        self.task_rx
            .recv()
            .map_err(|e| Error::Transport(format!("worker {} task channel closed: {e}", self.rank)))
    }

    pub fn send_result(&self, msg: ResultMsg) -> Result<(), Error> {
        self.result_tx
            .send(msg)
            .map_err(|e| Error::Transport(format!("worker {} result send failed: {e}", self.rank)))
    }
}
