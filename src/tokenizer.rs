//! UTF-8 word tokenizer: code-point classification, the per-file chunker
//! that the dispatcher owns, and the stateless per-chunk word-length/vowel
//! counter that runs inside a worker.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Error;
use crate::task::ChunkStats;

/// Delimiter set from the glossary. Multi-byte code points are compared as
/// complete UTF-8 strings, never byte-by-byte.
const DELIMITERS: &[&str] = &[
    " ", "-", "\u{2013}", "\u{2014}", ".", ",", ":", ";", "(", ")", "[", "]", "{", "}", "?", "!",
    "\n", "\t", "\r", "\"", "\u{201c}", "\u{201d}", "\u{ab}", "\u{bb}", "\u{2026}",
];

/// Mergers contribute zero length to the word they sit inside.
const MERGERS: &[&str] = &["\u{2018}", "\u{2019}", "\u{b4}", "`", "'"];

/// `ü`/`Ü` classify as vowels here, not mergers.
const VOWELS: &[&str] = &[
    "a", "e", "i", "o", "u", "A", "E", "I", "O", "U", "\u{e1}", "\u{e0}", "\u{e3}", "\u{e2}",
    "\u{e4}", "\u{e9}", "\u{e8}", "\u{1ebd}", "\u{ea}", "\u{eb}", "\u{c1}", "\u{c0}", "\u{c3}",
    "\u{c2}", "\u{c4}", "\u{c9}", "\u{c8}", "\u{1ebc}", "\u{ca}", "\u{cb}", "\u{f3}", "\u{f2}",
    "\u{f5}", "\u{f4}", "\u{f6}", "\u{d3}", "\u{d2}", "\u{d5}", "\u{d4}", "\u{d6}", "\u{ed}",
    "\u{ec}", "\u{cd}", "\u{cc}", "\u{fa}", "\u{f9}", "\u{da}", "\u{d9}", "\u{fc}", "\u{dc}",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Delimiter,
    Merger,
    Vowel,
    Other,
}

/// Classify one already-decoded UTF-8 code point.
pub fn classify(symbol: &[u8]) -> CharClass {
    let s = std::str::from_utf8(symbol).unwrap_or("");
    if DELIMITERS.contains(&s) {
        CharClass::Delimiter
    } else if MERGERS.contains(&s) {
        CharClass::Merger
    } else if VOWELS.contains(&s) {
        CharClass::Vowel
    } else {
        CharClass::Other
    }
}

/// Decode one UTF-8 code point from `reader` using the leading-byte
/// run-length rule: the number of leading one-bits in the first byte gives
/// the total byte length (1..=4). Returns `Ok(None)` at a clean EOF before
/// any byte of the code point was read. A lone continuation byte, or a
/// leading byte claiming 5+ bytes, is malformed input and fatal.
pub fn read_codepoint(reader: &mut impl Read) -> Result<Option<Vec<u8>>, Error> {
    let mut lead = [0u8; 1];
    match reader.read(&mut lead) {
        Ok(0) => return Ok(None),
        Ok(_) => {}
        Err(e) => return Err(Error::Protocol(format!("read failure while tokenizing: {e}"))),
    }
    let ones = lead[0].leading_ones();
    let len = match ones {
        0 => 1,
        2..=4 => ones as usize,
        _ => {
            return Err(Error::Protocol(format!(
                "malformed UTF-8 leading byte 0x{:02x}",
                lead[0]
            )))
        }
    };
    let mut buf = Vec::with_capacity(len);
    buf.push(lead[0]);
    if len > 1 {
        let mut rest = vec![0u8; len - 1];
        reader
            .read_exact(&mut rest)
            .map_err(|e| Error::Protocol(format!("truncated UTF-8 code point: {e}")))?;
        buf.extend_from_slice(&rest);
    }
    Ok(Some(buf))
}

/// Owns per-file reader state, the carry-over partial word, and the current
/// file index. Exclusively owned by the dispatcher.
pub struct ChunkReader {
    readers: Vec<BufReader<File>>,
    current_file_idx: usize,
    tmp_word: Vec<u8>,
    buffer_size: usize,
}

impl ChunkReader {
    pub fn open(paths: &[impl AsRef<Path>], buffer_size: usize) -> Result<Self, Error> {
        let mut readers = Vec::with_capacity(paths.len());
        for p in paths {
            let f = File::open(p.as_ref()).map_err(|e| Error::Io {
                path: p.as_ref().to_path_buf(),
                source: e,
            })?;
            readers.push(BufReader::new(f));
        }
        Ok(Self {
            readers,
            current_file_idx: 0,
            tmp_word: Vec::new(),
            buffer_size,
        })
    }

    /// Produce the next chunk, or `None` once every file has been fully
    /// drained. A chunk returned here always contains whole delimited words
    /// only: it is built by flushing complete `word + delimiter` runs out of
    /// the carry-over buffer, never the run currently being accumulated.
    pub fn next_chunk(&mut self) -> Result<Option<(usize, Vec<u8>)>, Error> {
        let mut chunk = Vec::new();
        chunk.append(&mut self.tmp_word);
        let mut file_id = self.current_file_idx;

        // An empty (or already-exhausted) file yields no bytes on its own;
        // advance past it rather than reporting a spurious empty chunk, so a
        // zero-byte file in the middle of the input set doesn't truncate the
        // task stream for the files after it. `file_id` always tracks
        // whichever file is being read in the current iteration, so content
        // flushed after skipping past empty files is tagged correctly.
        while self.current_file_idx < self.readers.len() && chunk.len() < self.buffer_size {
            file_id = self.current_file_idx;
            let reader = &mut self.readers[self.current_file_idx];
            match read_codepoint(reader)? {
                None => {
                    if self.tmp_word.len() + chunk.len() < self.buffer_size {
                        chunk.append(&mut self.tmp_word);
                    }
                    self.current_file_idx += 1;
                    if !chunk.is_empty() {
                        break;
                    }
                }
                Some(symbol) => {
                    if classify(&symbol) == CharClass::Delimiter {
                        if self.tmp_word.len() + chunk.len() < self.buffer_size {
                            chunk.append(&mut self.tmp_word);
                        } else {
                            self.tmp_word.extend_from_slice(&symbol);
                            break;
                        }
                    }
                    self.tmp_word.extend_from_slice(&symbol);
                }
            }
        }

        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some((file_id, chunk)))
        }
    }
}

/// Stateless worker-side pass over one already-chunked byte run: classify
/// every code point, accumulate word length (mergers add nothing) and vowel
/// count per word, flushing on every delimiter and once more at the end of
/// the chunk for any trailing word.
pub fn tokenize_chunk(chunk: &[u8]) -> Result<ChunkStats, Error> {
    let mut word_len = vec![0u64; 1];
    let mut vowel_by_len: Vec<Vec<u64>> = vec![vec![0u64; 1]];
    let mut max_len = 0usize;
    let mut max_vowel = 0usize;
    let mut cur_len = 0usize;
    let mut cur_vowels = 0usize;

    let mut cursor = chunk;
    let flush = |cur_len: &mut usize,
                 cur_vowels: &mut usize,
                 word_len: &mut Vec<u64>,
                 vowel_by_len: &mut Vec<Vec<u64>>,
                 max_len: &mut usize,
                 max_vowel: &mut usize| {
        if *cur_len > 0 {
            if *cur_len >= word_len.len() {
                word_len.resize(*cur_len + 1, 0);
            }
            word_len[*cur_len] += 1;
            if *cur_len > *max_len {
                *max_len = *cur_len;
            }
            if *cur_vowels >= vowel_by_len.len() {
                vowel_by_len.resize(*cur_vowels + 1, Vec::new());
            }
            if *cur_len >= vowel_by_len[*cur_vowels].len() {
                vowel_by_len[*cur_vowels].resize(*cur_len + 1, 0);
            }
            vowel_by_len[*cur_vowels][*cur_len] += 1;
            if *cur_vowels > *max_vowel {
                *max_vowel = *cur_vowels;
            }
        }
        *cur_len = 0;
        *cur_vowels = 0;
    };

    while !cursor.is_empty() {
        let symbol = {
            let ones = cursor[0].leading_ones();
            let len = match ones {
                0 => 1,
                2..=4 => ones as usize,
                _ => {
                    return Err(Error::Protocol(format!(
                        "malformed UTF-8 leading byte 0x{:02x}",
                        cursor[0]
                    )))
                }
            };
            if len > cursor.len() {
                return Err(Error::Protocol(
                    "truncated UTF-8 code point inside chunk".to_string(),
                ));
            }
            let (head, tail) = cursor.split_at(len);
            cursor = tail;
            head
        };

        match classify(symbol) {
            CharClass::Delimiter => flush(
                &mut cur_len,
                &mut cur_vowels,
                &mut word_len,
                &mut vowel_by_len,
                &mut max_len,
                &mut max_vowel,
            ),
            CharClass::Merger => {}
            CharClass::Vowel => {
                cur_len += 1;
                cur_vowels += 1;
            }
            CharClass::Other => {
                cur_len += 1;
            }
        }
    }
    flush(
        &mut cur_len,
        &mut cur_vowels,
        &mut word_len,
        &mut vowel_by_len,
        &mut max_len,
        &mut max_vowel,
    );

    // Normalize row widths so every vowel row spans 0..=max_len.
    for row in vowel_by_len.iter_mut() {
        if row.len() <= max_len {
            row.resize(max_len + 1, 0);
        }
    }
    if word_len.len() <= max_len {
        word_len.resize(max_len + 1, 0);
    }
    vowel_by_len.truncate(max_vowel + 1);
    if vowel_by_len.is_empty() {
        vowel_by_len.push(vec![0; max_len + 1]);
    }

    Ok(ChunkStats {
        max_len,
        max_vowel,
        word_len,
        vowel_by_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_accented_u_as_vowel() {
        assert_eq!(classify("\u{fc}".as_bytes()), CharClass::Vowel);
        assert_eq!(classify("\u{dc}".as_bytes()), CharClass::Vowel);
    }

    #[test]
    fn classifies_apostrophe_as_merger() {
        assert_eq!(classify("'".as_bytes()), CharClass::Merger);
    }

    #[test]
    fn tokenize_hello_world() {
        let stats = tokenize_chunk("Hello, world!\n".as_bytes()).unwrap();
        assert_eq!(stats.max_len, 5);
        assert_eq!(stats.word_len[5], 2);
        assert_eq!(stats.vowel_by_len[2][5], 1); // Hello
        assert_eq!(stats.vowel_by_len[1][5], 1); // world
    }

    #[test]
    fn merger_does_not_count_toward_length() {
        // "don't" -> d,o,n,',t -> length 4, one vowel (o)
        let stats = tokenize_chunk("don't\n".as_bytes()).unwrap();
        assert_eq!(stats.word_len[4], 1);
        assert_eq!(stats.vowel_by_len[1][4], 1);
    }

    #[test]
    fn chunk_reader_never_splits_a_word() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "alpha beta gamma delta epsilon\n").unwrap();
        let path = f.path().to_path_buf();
        // Small enough to force several chunks, but the reader must never
        // hand back a chunk that ends mid-word.
        let mut reader = ChunkReader::open(&[path], 8).unwrap();
        let mut whole = Vec::new();
        while let Some((_, chunk)) = reader.next_chunk().unwrap() {
            whole.extend_from_slice(&chunk);
        }
        assert_eq!(whole, b"alpha beta gamma delta epsilon\n");
    }

    #[test]
    fn empty_file_between_two_nonempty_files_does_not_truncate_the_stream() {
        let empty = tempfile::NamedTempFile::new().unwrap();
        let mut first = tempfile::NamedTempFile::new().unwrap();
        let mut last = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        write!(first, "alpha\n").unwrap();
        write!(last, "beta\n").unwrap();

        let mut reader = ChunkReader::open(
            &[first.path().to_path_buf(), empty.path().to_path_buf(), last.path().to_path_buf()],
            1000,
        )
        .unwrap();

        let (id0, c0) = reader.next_chunk().unwrap().unwrap();
        assert_eq!(id0, 0);
        assert_eq!(c0, b"alpha\n");

        let (id2, c2) = reader.next_chunk().unwrap().unwrap();
        assert_eq!(id2, 2);
        assert_eq!(c2, b"beta\n");

        assert!(reader.next_chunk().unwrap().is_none());
    }
}
