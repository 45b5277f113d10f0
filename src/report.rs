//! Result pretty-printing, kept intentionally thin: format whatever the
//! dispatcher already computed, nothing more.
use std::path::Path;

use crate::aggregate::WordStatsAggregate;
use crate::dispatcher::CccOutcome;

pub fn print_word_stats(path: &Path, agg: &WordStatsAggregate) {
    println!("File: {}", path.display());
    println!("  total words: {}", agg.total_words);
    if agg.max_len == 0 {
        println!("  (no words found)");
        return;
    }
    print!("  length:");
    for len in 1..=agg.max_len {
        print!(" {len:>6}");
    }
    println!();
    print!("  count: ");
    for len in 1..=agg.max_len {
        print!(" {:>6}", agg.word_len.get(len).copied().unwrap_or(0));
    }
    println!();
    for vowels in 0..agg.vowel_by_len.len() {
        print!("  vowels={vowels:<2}:");
        for len in 1..=agg.max_len {
            let count = agg
                .vowel_by_len
                .get(vowels)
                .and_then(|row| row.get(len))
                .copied()
                .unwrap_or(0);
            let total = agg.word_len.get(len).copied().unwrap_or(0);
            let pct = if total > 0 {
                (count as f64) * 100.0 / (total as f64)
            } else {
                0.0
            };
            print!(" {pct:>5.1}%");
        }
        println!();
    }
}

pub fn print_ccc_outcome(outcome: &CccOutcome, compare: bool) {
    for file in &outcome.per_file {
        println!("File: {}", file.path.display());
        println!("  N = {}", file.n);
        if compare {
            println!(
                "  mismatches: {}",
                file.mismatches.unwrap_or(0)
            );
        } else {
            println!("  R[] written back to file");
        }
    }
}
