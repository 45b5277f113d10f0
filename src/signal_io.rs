//! Signal file format: a little-endian `int32` sample count `N`, followed by
//! `N` little-endian `f64` samples of `x`, then `N` of `y`, then (compare
//! mode) `N` of a reference `R[]`. Append mode writes the computed `R[]`
//! back at the same offset.
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Error;
use crate::io::{read_bytes_at, write_bytes_at};

pub struct SignalFile {
    pub n: usize,
    pub x: Arc<[f64]>,
    pub y: Arc<[f64]>,
    path: PathBuf,
}

impl SignalFile {
    /// Open and load `N`, `x[]`, `y[]`. The file stays open (read/write) so
    /// that append/compare can later seek to the tail without reopening.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, File), Error> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| Error::Io {
                path: path.clone(),
                source: e,
            })?;

        let mut header = [0u8; 4];
        read_bytes_at(&mut header, &file, 0).map_err(|e| Error::Io {
            path: path.clone(),
            source: e,
        })?;
        let n = i32::from_le_bytes(header);
        if n < 0 {
            return Err(Error::Protocol(format!(
                "negative sample count in {}",
                path.display()
            )));
        }
        let n = n as usize;

        let x = read_f64_array(&file, 4, n, &path)?;
        let y = read_f64_array(&file, 4 + 8 * n as u64, n, &path)?;

        Ok((
            SignalFile {
                n,
                x: x.into(),
                y: y.into(),
                path,
            },
            file,
        ))
    }

    /// Read the `N` reference doubles stored after `x` and `y` (compare
    /// mode).
    pub fn read_reference(&self, file: &File) -> Result<Vec<f64>, Error> {
        read_f64_array(file, 4 + 16 * self.n as u64, self.n, &self.path)
    }

    /// Append the computed `R[]` vector right after `x` and `y` (append
    /// mode). Writes the whole vector or none of it: a short write is fatal
    /// and no partial result is left visible via this call.
    pub fn append_result(&self, file: &File, r: &[f64]) -> Result<(), Error> {
        debug_assert_eq!(r.len(), self.n);
        let mut bytes = Vec::with_capacity(r.len() * 8);
        for v in r {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        write_bytes_at(&bytes, file, 4 + 16 * self.n as u64).map_err(|e| Error::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn read_f64_array(file: &File, offset: u64, n: usize, path: &Path) -> Result<Vec<f64>, Error> {
    let mut bytes = vec![0u8; n * 8];
    read_bytes_at(&mut bytes, file, offset).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(bytes
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_signal_file(x: &[f64], y: &[f64]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&(x.len() as i32).to_le_bytes()).unwrap();
        for v in x {
            f.write_all(&v.to_le_bytes()).unwrap();
        }
        for v in y {
            f.write_all(&v.to_le_bytes()).unwrap();
        }
        f.flush().unwrap();
        f
    }

    #[test]
    fn loads_header_and_vectors() {
        let x = [1.0, 2.0, 3.0];
        let y = [4.0, 5.0, 6.0];
        let f = write_signal_file(&x, &y);
        let (sig, _file) = SignalFile::load(f.path()).unwrap();
        assert_eq!(sig.n, 3);
        assert_eq!(&*sig.x, &x);
        assert_eq!(&*sig.y, &y);
    }

    #[test]
    fn append_then_reread_roundtrips() {
        let x = [1.0, 0.0, 0.0, 0.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let f = write_signal_file(&x, &y);
        let (sig, file) = SignalFile::load(f.path()).unwrap();
        let r = vec![1.0, 2.0, 3.0, 4.0];
        sig.append_result(&file, &r).unwrap();
        drop(file);
        let (_sig2, file2) = SignalFile::load(f.path()).unwrap();
        let back = read_f64_array(&file2, 4 + 16 * 4, 4, f.path()).unwrap();
        assert_eq!(back, r);
    }
}
