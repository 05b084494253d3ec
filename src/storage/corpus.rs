use std::fs;
use std::path::{Path, PathBuf};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;

/// A directory of documents, one file per document, named by its numeric id
/// (`12`, `12.txt`). Files whose stem is not an integer are ignored.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    pub dir: PathBuf,
    files: Vec<(DocId, PathBuf)>,
}

impl DirectoryCorpus {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let entries = fs::read_dir(&dir).map_err(|e| {
            Error::new(ErrorKind::Io, format!("cannot read corpus {}: {}", dir.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let id = path.file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u64>().ok());
            match id {
                Some(id) => files.push((DocId(id), path)),
                None => log::debug!("skipping non-document file {}", path.display()),
            }
        }
        files.sort();

        if let Some(pair) = files.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("{} and {} share doc id {}", pair[0].1.display(), pair[1].1.display(), pair[0].0),
            ));
        }

        Ok(DirectoryCorpus { dir, files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.files.iter().map(|(id, _)| *id)
    }

    /// Documents in id order, read one at a time
    pub fn documents(&self) -> impl Iterator<Item = Result<(DocId, String)>> + '_ {
        self.files.iter().map(|(id, path)| {
            let bytes = fs::read(path).map_err(|e| {
                Error::new(ErrorKind::Io, format!("cannot read document {}: {}", path.display(), e))
            })?;
            let text = String::from_utf8(bytes).map_err(|e| {
                Error::new(ErrorKind::Io, format!("document {} is not UTF-8: {}", path.display(), e))
            })?;
            Ok((*id, text))
        })
    }
}
