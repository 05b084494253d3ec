use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::Path;
use crate::core::error::Result;

/// Read-only memory-mapped file. Reads take `&self`, so one mapping can
/// serve any number of concurrent readers.
pub struct MmapFile {
    mmap: Option<Mmap>,  // None for an empty file, which cannot be mapped
    pub len: usize,
}

impl MmapFile {
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let metadata = file.metadata()?;
        let len = metadata.len() as usize;

        if len == 0 {
            return Ok(MmapFile { mmap: None, len });
        }

        // The index files are never modified once indexing has finished
        let mmap = unsafe { MmapOptions::new().len(len).map(&file)? };

        Ok(MmapFile { mmap: Some(mmap), len })
    }

    pub fn data(&self) -> &[u8] {
        match &self.mmap {
            Some(mmap) => &mmap[..],
            None => &[],
        }
    }
}
