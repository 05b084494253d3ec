use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub block_size_docs: usize,            // Documents per flushed block
    pub blocks_dir: Option<PathBuf>,       // None: fresh temp dir per run
    pub max_query_length: usize,           // In characters
    pub parallel_merge: bool,              // Run same-depth merges on rayon
    pub workers: usize,                    // Rayon pool size
    pub progress_interval: usize,          // Docs between progress log lines
}

impl Default for Config {
    fn default() -> Self {
        Config {
            block_size_docs: 2000,
            blocks_dir: None,
            max_query_length: 1024,
            parallel_merge: false,
            workers: num_cpus::get(),
            progress_interval: 1000,
        }
    }
}

impl Config {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size_docs == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "block_size_docs must be at least 1".to_string(),
            ));
        }
        if self.max_query_length == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "max_query_length must be at least 1".to_string(),
            ));
        }
        if self.progress_interval == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "progress_interval must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_block_size(mut self, block_size_docs: usize) -> Self {
        self.block_size_docs = block_size_docs;
        self
    }

    pub fn with_blocks_dir(mut self, dir: PathBuf) -> Self {
        self.blocks_dir = Some(dir);
        self
    }

    pub fn with_parallel_merge(mut self, enabled: bool) -> Self {
        self.parallel_merge = enabled;
        self
    }

    pub fn with_max_query_length(mut self, max_query_length: usize) -> Self {
        self.max_query_length = max_query_length;
        self
    }
}
