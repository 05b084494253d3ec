use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind as IoErrorKind, Write};
use std::path::PathBuf;
use parking_lot::RwLock;
use tempfile::TempDir;
use crate::core::error::{Error, ErrorKind, Result};
use crate::storage::block::{Block, BlockId};
use crate::storage::layout::StorageLayout;

/// Storage for transient blocks, keyed by block id.
///
/// The store owns nothing beyond the bytes: the indexer decides when a
/// block is created and when it goes away.
pub trait BlockStore: Send + Sync {
    /// Persist a block, replacing any block with the same id
    fn write_block(&self, id: BlockId, block: &Block) -> Result<()>;

    /// Fails with `BlockNotFound` if the id is absent
    fn read_block(&self, id: BlockId) -> Result<Block>;

    /// Idempotent
    fn delete_block(&self, id: BlockId) -> Result<()>;

    /// Drop every block
    fn reset(&self) -> Result<()>;

    /// Ids currently stored, ascending
    fn block_ids(&self) -> Result<Vec<BlockId>>;
}

fn block_not_found(id: BlockId) -> Error {
    Error::new(ErrorKind::BlockNotFound, format!("{} does not exist", id))
}

/// One bincode file per block under `<base>/blocks/`
pub struct FsBlockStore {
    layout: StorageLayout,
    _temp_dir: Option<TempDir>,  // Removed on drop when the store owns it
}

impl FsBlockStore {
    pub fn open(base_dir: PathBuf) -> Result<Self> {
        Ok(FsBlockStore {
            layout: StorageLayout::new(base_dir)?,
            _temp_dir: None,
        })
    }

    /// Store backed by a fresh temporary directory, deleted on drop
    pub fn temporary() -> Result<Self> {
        let temp_dir = tempfile::Builder::new().prefix("boolidx-blocks").tempdir()?;
        Ok(FsBlockStore {
            layout: StorageLayout::new(temp_dir.path().to_path_buf())?,
            _temp_dir: Some(temp_dir),
        })
    }
}

impl BlockStore for FsBlockStore {
    fn write_block(&self, id: BlockId, block: &Block) -> Result<()> {
        let path = self.layout.block_path(id);
        let mut writer = BufWriter::new(fs::File::create(path)?);
        bincode::serialize_into(&mut writer, block)?;
        writer.flush()?;
        Ok(())
    }

    fn read_block(&self, id: BlockId) -> Result<Block> {
        let file = match fs::File::open(self.layout.block_path(id)) {
            Ok(file) => file,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Err(block_not_found(id)),
            Err(e) => return Err(e.into()),
        };
        let block = bincode::deserialize_from(BufReader::new(file))?;
        Ok(block)
    }

    fn delete_block(&self, id: BlockId) -> Result<()> {
        match fs::remove_file(self.layout.block_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn reset(&self) -> Result<()> {
        for id in self.block_ids()? {
            self.delete_block(id)?;
        }
        Ok(())
    }

    fn block_ids(&self) -> Result<Vec<BlockId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.layout.blocks_dir())? {
            if let Some(id) = StorageLayout::parse_block_path(&entry?.path()) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Blocks kept in memory; for tests and small corpora
#[derive(Default)]
pub struct MemoryBlockStore {
    blocks: RwLock<HashMap<BlockId, Block>>,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockStore for MemoryBlockStore {
    fn write_block(&self, id: BlockId, block: &Block) -> Result<()> {
        self.blocks.write().insert(id, block.clone());
        Ok(())
    }

    fn read_block(&self, id: BlockId) -> Result<Block> {
        self.blocks.read()
            .get(&id)
            .cloned()
            .ok_or_else(|| block_not_found(id))
    }

    fn delete_block(&self, id: BlockId) -> Result<()> {
        self.blocks.write().remove(&id);
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        self.blocks.write().clear();
        Ok(())
    }

    fn block_ids(&self) -> Result<Vec<BlockId>> {
        let mut ids: Vec<BlockId> = self.blocks.read().keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
