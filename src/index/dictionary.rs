use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Term};
use crate::index::codec;

/// Term statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermInfo {
    pub doc_freq: usize,      // Length of the term's posting list
    pub posting_offset: u64,  // Offset of the encoded list in the postings file
}

/// Streams `<term> <docFrequency> <byteOffset>` lines, then the universal
/// doc id set as the final line.
pub struct DictionaryWriter {
    out: BufWriter<File>,
    last_term: Option<Term>,
    terms: usize,
}

impl DictionaryWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(DictionaryWriter {
            out: BufWriter::new(File::create(path)?),
            last_term: None,
            terms: 0,
        })
    }

    /// Terms must arrive in ascending order
    pub fn add(&mut self, term: &str, info: TermInfo) -> Result<()> {
        if let Some(last) = &self.last_term {
            if last.as_str() >= term {
                return Err(Error::new(
                    ErrorKind::InvalidArgument,
                    format!("dictionary terms out of order: {:?} after {:?}", term, last),
                ));
            }
        }
        writeln!(self.out, "{} {} {}", term, info.doc_freq, info.posting_offset)?;
        self.last_term = Some(term.to_string());
        self.terms += 1;
        Ok(())
    }

    pub fn finish(mut self, universe: &[DocId]) -> Result<usize> {
        self.out.write_all(&codec::encode_doc_ids(universe))?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.out.get_ref().sync_all()?;
        Ok(self.terms)
    }
}

/// In-memory term dictionary plus the universal doc id set
#[derive(Debug, Clone, Default)]
pub struct TermDictionary {
    pub term_map: HashMap<Term, TermInfo>,
    pub universe: Vec<DocId>,
}

impl TermDictionary {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
        let (universe_line, term_lines) = lines.split_last().ok_or_else(|| {
            Error::new(ErrorKind::Parse, "dictionary is empty".to_string())
        })?;

        let universe = codec::decode(universe_line.trim().as_bytes())
            .map_err(|e| Error::new(
                ErrorKind::Parse,
                format!("universal doc id set: {}", e.context),
            ))?
            .doc_ids();

        let mut term_map = HashMap::with_capacity(term_lines.len());
        for (line_no, line) in term_lines.iter().enumerate() {
            let (term, info) = parse_entry(line).ok_or_else(|| {
                Error::new(
                    ErrorKind::Parse,
                    format!("dictionary line {}: {:?}", line_no + 1, line),
                )
            })?;
            term_map.insert(term.to_string(), info);
        }

        Ok(TermDictionary { term_map, universe })
    }

    pub fn get(&self, term: &str) -> Option<&TermInfo> {
        self.term_map.get(term)
    }

    /// 0 for unknown terms
    pub fn doc_freq(&self, term: &str) -> usize {
        self.get(term).map(|info| info.doc_freq).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.term_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_map.is_empty()
    }
}

fn parse_entry(line: &str) -> Option<(&str, TermInfo)> {
    let mut fields = line.split_whitespace();
    let term = fields.next()?;
    let doc_freq = fields.next()?.parse().ok()?;
    let posting_offset = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((term, TermInfo { doc_freq, posting_offset }))
}
