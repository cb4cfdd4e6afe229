//! Module file loader
//!
//! Reads an entire module file into memory. Size checks happen before the
//! buffer is allocated, and the allocation itself is fallible so that an
//! oversized file surfaces as [`ScanError::OutOfMemory`] instead of an abort.

use crate::{Result, ScanError};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read the whole file at `path`.
///
/// `max_size` is the largest accepted file size in bytes. The file handle is
/// closed before returning, on success and on failure.
///
/// # Errors
/// - [`ScanError::Open`] if the file cannot be opened
/// - [`ScanError::Empty`] if it reports a size of zero or yields no bytes
/// - [`ScanError::TooLarge`] if it exceeds `max_size` or the address space
/// - [`ScanError::OutOfMemory`] if the buffer cannot be allocated
/// - [`ScanError::Read`] if reading fails part way
pub fn load_buffer(path: &Path, max_size: u64) -> Result<Vec<u8>> {
    let label = || path.display().to_string();

    let mut file = File::open(path).map_err(|source| ScanError::Open {
        path: label(),
        source,
    })?;

    let size = file
        .metadata()
        .map_err(|source| ScanError::Read {
            path: label(),
            source,
        })?
        .len();

    if size == 0 {
        return Err(ScanError::Empty { path: label() });
    }
    if size > max_size {
        return Err(ScanError::TooLarge { path: label() });
    }
    let size = usize::try_from(size).map_err(|_| ScanError::TooLarge { path: label() })?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| ScanError::OutOfMemory { path: label() })?;

    file.read_to_end(&mut buffer)
        .map_err(|source| ScanError::Read {
            path: label(),
            source,
        })?;

    // The file may have been truncated between stat and read
    if buffer.is_empty() {
        return Err(ScanError::Empty { path: label() });
    }

    debug!("{}: loaded {} bytes", path.display(), buffer.len());
    Ok(buffer)
}
