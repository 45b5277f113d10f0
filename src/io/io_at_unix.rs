//! Functions to read/write from/to files at a specified offset, wrapping
//! `pread`/`pwrite`. Errors are plain `std::io::Error`; callers attach the
//! file path (see `signal_io.rs`).
use std::fs::File;
use std::io;
use std::os::raw::c_void;
use std::os::unix::io::{AsRawFd, RawFd};

pub type ssize_t = isize;
pub type size_t = usize;
pub type off_t = isize;
extern "C" {
    fn pread(fd: RawFd, buf: *mut c_void, count: size_t, offset: off_t) -> ssize_t;
    fn pwrite(fd: RawFd, buf: *const c_void, count: size_t, offset: off_t) -> ssize_t;
}

/// Read `buffer.len()` bytes from `file` at `offset`, invoking `pread` in a
/// loop to cover short reads.
pub fn read_bytes_at(buffer: &mut [u8], file: &File, offset: u64) -> io::Result<()> {
    let mut data_read = 0usize;
    let fd = file.as_raw_fd();
    while data_read < buffer.len() {
        let sz = buffer.len() - data_read;
        let ret = unsafe {
            pread(
                fd,
                buffer.as_mut_ptr().add(data_read) as *mut c_void,
                sz as size_t,
                (offset as usize + data_read) as off_t,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        if ret == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "short read"));
        }
        data_read += ret as usize;
    }
    Ok(())
}

/// Write `buffer` to `file` at `offset`, invoking `pwrite` in a loop to
/// cover short writes.
pub fn write_bytes_at(buffer: &[u8], file: &File, offset: u64) -> io::Result<()> {
    let fd = file.as_raw_fd();
    let mut written = 0usize;
    while written < buffer.len() {
        let sz = buffer.len() - written;
        let ret = unsafe {
            pwrite(
                fd,
                buffer.as_ptr().add(written) as *const c_void,
                sz as size_t,
                (offset as usize + written) as off_t,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        written += ret as usize;
    }
    Ok(())
}
