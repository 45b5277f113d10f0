//! Read/write bytes at a file offset, conditionally including UNIX/Windows
//! implementations (`pread`/`pwrite` vs `seek_read`/`seek_write`).
#[cfg(unix)]
pub mod io_at_unix;
#[cfg(unix)]
pub use io_at_unix::{read_bytes_at, write_bytes_at};

#[cfg(windows)]
pub mod io_at_windows;
#[cfg(windows)]
pub use io_at_windows::{read_bytes_at, write_bytes_at};
