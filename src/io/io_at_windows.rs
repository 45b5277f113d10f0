//! Functions to read/write from/to files at a specified offset.
use std::fs::File;
use std::io;

/// Read `buffer.len()` bytes from `file` at `offset`.
pub fn read_bytes_at(buffer: &mut [u8], file: &File, offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    let mut data_read = 0usize;
    while data_read < buffer.len() {
        let n = file.seek_read(&mut buffer[data_read..], offset + data_read as u64)?;
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "short read"));
        }
        data_read += n;
    }
    Ok(())
}

/// Write `buffer` to `file` at `offset`.
pub fn write_bytes_at(buffer: &[u8], file: &File, offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    let mut written = 0usize;
    while written < buffer.len() {
        let n = file.seek_write(&buffer[written..], offset + written as u64)?;
        written += n;
    }
    Ok(())
}
