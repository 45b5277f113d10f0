//! Per-file result aggregation, owned exclusively by the dispatcher. Merges
//! are associative and commutative so arrival order never matters.
use crate::error::Error;
use crate::task::ChunkStats;

#[derive(Debug, Default, Clone)]
pub struct WordStatsAggregate {
    pub total_words: u64,
    pub max_len: usize,
    pub word_len: Vec<u64>,
    pub vowel_by_len: Vec<Vec<u64>>,
}

impl WordStatsAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one chunk's stats in by addition, never assignment: an
    /// overwriting merge would silently drop every chunk but the last one
    /// seen for a multi-chunk file.
    pub fn merge(&mut self, stats: &ChunkStats) {
        if stats.max_len >= self.word_len.len() {
            self.word_len.resize(stats.max_len + 1, 0);
        }
        if stats.max_len > self.max_len {
            self.max_len = stats.max_len;
        }
        for (len, &count) in stats.word_len.iter().enumerate() {
            self.word_len[len] += count;
            self.total_words += count;
        }

        if stats.max_vowel >= self.vowel_by_len.len() {
            self.vowel_by_len.resize(stats.max_vowel + 1, Vec::new());
        }
        for (vowels, row) in stats.vowel_by_len.iter().enumerate() {
            if row.len() > self.vowel_by_len[vowels].len() {
                self.vowel_by_len[vowels].resize(row.len(), 0);
            }
            for (len, &count) in row.iter().enumerate() {
                self.vowel_by_len[vowels][len] += count;
            }
        }
    }
}

/// CCC per-file result vector. Each `tau` is written exactly once; writing
/// an already-filled or out-of-range `tau` is a protocol violation.
#[derive(Debug, Clone)]
pub struct CccAggregate {
    r: Vec<Option<f64>>,
}

impl CccAggregate {
    pub fn new(n: usize) -> Self {
        Self { r: vec![None; n] }
    }

    pub fn store(&mut self, tau: usize, value: f64) -> Result<(), Error> {
        match self.r.get_mut(tau) {
            None => Err(Error::Protocol(format!(
                "tau {} out of range (N = {})",
                tau,
                self.r.len()
            ))),
            Some(slot) if slot.is_some() => Err(Error::Protocol(format!(
                "tau {tau} written more than once"
            ))),
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.r.iter().all(Option::is_some)
    }

    /// Finalize into a plain `R[]` vector. Fatal protocol error if any tau
    /// was never written (the dispatcher should not call this before
    /// `is_complete()`).
    pub fn into_vector(self) -> Result<Vec<f64>, Error> {
        self.r
            .into_iter()
            .enumerate()
            .map(|(tau, v)| v.ok_or_else(|| Error::Protocol(format!("tau {tau} never received"))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_order_independent() {
        let a = ChunkStats {
            max_len: 5,
            max_vowel: 2,
            word_len: vec![0, 0, 0, 0, 0, 2],
            vowel_by_len: vec![vec![0; 6], vec![0, 0, 0, 0, 0, 1], vec![0, 0, 0, 0, 0, 1]],
        };
        let b = ChunkStats {
            max_len: 3,
            max_vowel: 1,
            word_len: vec![0, 0, 0, 1],
            vowel_by_len: vec![vec![0; 4], vec![0, 0, 0, 1]],
        };

        let mut ab = WordStatsAggregate::new();
        ab.merge(&a);
        ab.merge(&b);

        let mut ba = WordStatsAggregate::new();
        ba.merge(&b);
        ba.merge(&a);

        assert_eq!(ab.total_words, ba.total_words);
        assert_eq!(ab.word_len, ba.word_len);
        assert_eq!(ab.vowel_by_len, ba.vowel_by_len);
        assert_eq!(ab.total_words, 3);
    }

    #[test]
    fn double_write_to_same_tau_is_a_protocol_error() {
        let mut agg = CccAggregate::new(4);
        agg.store(2, 1.0).unwrap();
        assert!(agg.store(2, 2.0).is_err());
    }

    #[test]
    fn out_of_range_tau_is_a_protocol_error() {
        let mut agg = CccAggregate::new(4);
        assert!(agg.store(4, 1.0).is_err());
    }
}
