use std::path::{Path, PathBuf};
use std::fs;
use crate::core::error::Result;
use crate::storage::block::BlockId;

/// Directory structure for intermediate index files
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,      // Root directory
    pub blocks_dir: PathBuf,    // Transient blocks (.blk files)
}

impl StorageLayout {
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        let blocks_dir = base_dir.join("blocks");

        fs::create_dir_all(&blocks_dir)?;

        Ok(StorageLayout {
            base_dir,
            blocks_dir,
        })
    }

    pub fn block_path(&self, id: BlockId) -> PathBuf {
        self.blocks_dir.join(format!("{:08}.blk", id.0))
    }

    /// Inverse of `block_path`; None for files that are not blocks
    pub fn parse_block_path(path: &Path) -> Option<BlockId> {
        if path.extension()? != "blk" {
            return None;
        }
        path.file_stem()?.to_str()?.parse().ok().map(BlockId)
    }

    pub fn blocks_dir(&self) -> &PathBuf {
        &self.blocks_dir
    }
}
