// src/resolver/io.rs
//
// File mapping: exposes a file's contents as one read-only byte range.

use crate::error::ProbeError;
use crate::resolver::common::ProbeResult;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Read-only view over a whole file.
///
/// The descriptor is closed as soon as the mapping exists; dropping the
/// value unmaps the file.
#[derive(Debug)]
pub enum FileBytes {
    /// Zero-length file. Nothing is mapped.
    Empty,
    /// Memory-mapped file (zero-copy access)
    Mapped(Mmap),
}

impl FileBytes {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileBytes::Empty => &[],
            FileBytes::Mapped(mmap) => mmap.as_ref(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Open `path` read-only and map its full contents.
pub fn map(path: &Path) -> ProbeResult<FileBytes> {
    let display = || path.to_string_lossy().into_owned();

    let file = File::open(path).map_err(|e| ProbeError::file_open_failed(display(), e))?;
    let metadata = file
        .metadata()
        .map_err(|e| ProbeError::file_open_failed(display(), e))?;
    if !metadata.is_file() {
        return Err(ProbeError::file_open_failed(
            display(),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    let size = metadata.len();

    if size == 0 {
        return Ok(FileBytes::Empty);
    }

    // Safety: the mapping is read-only and lives only for one resolve call.
    // A concurrent writer truncating the file is outside what we defend against,
    // same as any mmap-based reader.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| ProbeError::mmap_failed(display(), e))?;
    Ok(FileBytes::Mapped(mmap))
}
