use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::codec;
use crate::index::posting::PostingList;
use crate::mmap::mmap_file::MmapFile;

/// Appends `<term> <encoded list>\n` lines and reports where each encoded
/// list starts.
pub struct PostingsWriter {
    out: BufWriter<File>,
    offset: u64,
    line: Vec<u8>,
}

impl PostingsWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(PostingsWriter {
            out: BufWriter::new(File::create(path)?),
            offset: 0,
            line: Vec::with_capacity(4096),
        })
    }

    /// Write one term's line; returns the byte offset of the encoded list.
    pub fn append(&mut self, term: &str, list: &PostingList) -> Result<u64> {
        if term.is_empty() || term.contains(char::is_whitespace) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("term {:?} cannot be stored in a line-oriented file", term),
            ));
        }

        self.line.clear();
        self.line.extend_from_slice(term.as_bytes());
        self.line.push(b' ');
        let list_offset = self.offset + self.line.len() as u64;
        codec::encode_into(list, &mut self.line);
        self.line.push(b'\n');

        self.out.write_all(&self.line)?;
        self.offset += self.line.len() as u64;
        Ok(list_offset)
    }

    pub fn finish(mut self) -> Result<u64> {
        self.out.flush()?;
        self.out.get_ref().sync_all()?;
        Ok(self.offset)
    }
}

/// Random access into a postings file by byte offset
pub struct PostingsReader {
    file: MmapFile,
}

impl PostingsReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(PostingsReader {
            file: MmapFile::open_read_only(path)?,
        })
    }

    /// Decode the list starting at `offset`, up to the end of its line.
    pub fn read_at(&self, offset: u64) -> Result<PostingList> {
        let data = self.file.data();
        let start = usize::try_from(offset)
            .ok()
            .filter(|&start| start < data.len())
            .ok_or_else(|| Error::malformed_postings(format!(
                "offset {} is outside the postings file ({} bytes)", offset, data.len()
            )))?;

        let rest = &data[start..];
        let end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        codec::decode(&rest[..end])
            .map_err(|e| Error::malformed_postings(format!("at offset {}: {}", offset, e.context)))
    }
}
