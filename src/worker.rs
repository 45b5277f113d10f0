//! The worker loop. Stateless across tasks aside from reusable scratch
//! buffers; exits on the first `Sentinel`.
use log::debug;

use crate::ccc::circular_cross_correlation;
use crate::error::Error;
use crate::task::{ResultMsg, TaskMsg};
use crate::tokenizer::tokenize_chunk;
use crate::transport::WorkerTransport;

/// Serve tasks until a `Sentinel` arrives, then return. Each task carries
/// its own data by value (an `Arc<[f64]>` clone for CCC, an owned `Vec<u8>`
/// for a word chunk), so there is no per-task scratch buffer to grow here;
/// the grow-on-demand discipline instead lives in the tokenizer's
/// word-length/vowel tables, which only ever widen.
///
/// A fatal error hit while holding a task (malformed UTF-8, an out-of-range
/// `tau`) is reported back to the dispatcher as a `Failed` result before
/// this function returns `Err` — otherwise the dispatcher would just see
/// this worker's channel go silent and have no way to tell a real failure
/// apart from a worker that is simply still computing.
pub fn run(transport: WorkerTransport) -> Result<(), Error> {
    let rank = transport.rank;

    loop {
        match transport.recv_task()? {
            TaskMsg::Sentinel => {
                debug!("worker {rank} received sentinel, exiting");
                return Ok(());
            }
            TaskMsg::WordChunk { file_id, bytes } => {
                let stats = match tokenize_chunk(&bytes) {
                    Ok(stats) => stats,
                    Err(e) => {
                        report_failure(&transport, rank, &e);
                        return Err(e);
                    }
                };
                transport.send_result(ResultMsg::WordStats {
                    rank,
                    file_id,
                    stats,
                })?;
            }
            TaskMsg::Ccc {
                file_id,
                n,
                x,
                y,
                tau,
            } => {
                if tau >= n {
                    let e = Error::Protocol(format!(
                        "worker {rank} received tau {tau} out of range for N = {n}"
                    ));
                    report_failure(&transport, rank, &e);
                    return Err(e);
                }
                let value = circular_cross_correlation(&x, &y, tau);
                transport.send_result(ResultMsg::Ccc {
                    rank,
                    file_id,
                    tau,
                    value,
                })?;
            }
        }
    }
}

/// Best-effort notification to the dispatcher that this worker is about to
/// exit with a fatal error. If the result channel is already gone there is
/// nothing more to report; the dispatcher will hit its own transport error.
fn report_failure(transport: &WorkerTransport, rank: usize, e: &Error) {
    let _ = transport.send_result(ResultMsg::Failed {
        rank,
        message: e.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A malformed UTF-8 leading byte inside a word chunk is fatal; the
    /// worker must report it as `ResultMsg::Failed` before exiting, not just
    /// drop off the channel.
    #[test]
    fn malformed_chunk_reports_failed_before_exiting() {
        let (dispatcher, mut workers) = crate::transport::build(1);
        let wt = workers.remove(0);

        dispatcher
            .send(
                1,
                TaskMsg::WordChunk {
                    file_id: 0,
                    bytes: vec![0xff, b'a'],
                },
            )
            .unwrap();

        let handle = std::thread::spawn(move || run(wt));

        let result = dispatcher.recv_any().unwrap();
        match result {
            ResultMsg::Failed { rank, message } => {
                assert_eq!(rank, 1);
                assert!(message.contains("malformed"), "got: {message}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }

        assert!(handle.join().unwrap().is_err());
    }

    /// An out-of-range `tau` is a protocol violation; same reporting
    /// discipline as malformed input.
    #[test]
    fn out_of_range_tau_reports_failed_before_exiting() {
        let (dispatcher, mut workers) = crate::transport::build(1);
        let wt = workers.remove(0);

        dispatcher
            .send(
                1,
                TaskMsg::Ccc {
                    file_id: 0,
                    n: 4,
                    x: vec![1.0; 4].into(),
                    y: vec![1.0; 4].into(),
                    tau: 4,
                },
            )
            .unwrap();

        let handle = std::thread::spawn(move || run(wt));

        let result = dispatcher.recv_any().unwrap();
        match result {
            ResultMsg::Failed { rank, message } => {
                assert_eq!(rank, 1);
                assert!(message.contains("out of range"), "got: {message}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }

        assert!(handle.join().unwrap().is_err());
    }
}
