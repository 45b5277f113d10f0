//! Wire types exchanged between the dispatcher and its workers.
use std::sync::Arc;

/// One unit of work sent from the dispatcher to a worker. `Sentinel` is a
/// dedicated termination message rather than a reserved `file_id` value, so
/// a valid task can never be confused with a shutdown signal.
#[derive(Debug, Clone)]
pub enum TaskMsg {
    WordChunk { file_id: usize, bytes: Vec<u8> },
    Ccc {
        file_id: usize,
        n: usize,
        x: Arc<[f64]>,
        y: Arc<[f64]>,
        tau: usize,
    },
    Sentinel,
}

/// A result sent from a worker back to the dispatcher. `rank` identifies the
/// sending worker, since the shared result channel does not otherwise expose
/// which worker produced a given message. `Failed` lets a worker that hit a
/// fatal error while holding a task report that error back immediately,
/// instead of simply dropping off the channel and leaving the dispatcher to
/// infer a failure from a generic disconnect once every other worker has
/// also exited.
#[derive(Debug, Clone)]
pub enum ResultMsg {
    WordStats {
        rank: usize,
        file_id: usize,
        stats: ChunkStats,
    },
    Ccc {
        rank: usize,
        file_id: usize,
        tau: usize,
        value: f64,
    },
    Failed {
        rank: usize,
        message: String,
    },
}

/// Per-chunk word-length / vowel histogram produced by one worker, one
/// chunk. Merged additively into a file's aggregate once it reaches the
/// dispatcher.
#[derive(Debug, Clone, Default)]
pub struct ChunkStats {
    pub max_len: usize,
    pub max_vowel: usize,
    pub word_len: Vec<u64>,
    pub vowel_by_len: Vec<Vec<u64>>,
}
