//! # Chunk Store
//!
//! File-backed persistence for chunk block sets. Each chunk lives in one file
//! under the save root, named by its [`ChunkCoord`], holding consecutive
//! 8-byte records with no framing.
//!
//! ## Failure Semantics
//!
//! The store is called from inside the frame loop, so nothing here is fatal:
//!
//! * A missing chunk file reads as the empty set. Absence of the file is also
//!   the signal that the chunk has never been generated.
//! * A short trailing record is treated as end of stream; the records decoded
//!   before it are still returned.
//! * A record whose id names no block type is skipped and logged.
//!
//! Write errors are returned to the caller so it can decide whether to roll
//! back any in-memory state that assumed the write happened.
//!
//! All methods take `&self` and the struct holds no interior mutability. If
//! chunk I/O ever moves to a worker thread, mutual exclusion belongs here,
//! scoped per chunk file.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use cgmath::Point3;
use log::{debug, warn};
use thiserror::Error;

use super::block::{Block, BlockType};
use super::codec::{self, RECORD_BYTES};
use super::coords::ChunkCoord;

/// Errors produced by chunk store writes.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The underlying file operation failed.
    #[error("chunk file i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// File-backed storage for chunk block sets.
pub struct ChunkStore {
    root: PathBuf,
}

impl ChunkStore {
    /// Creates a store that keeps its chunk files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ChunkStore { root: root.into() }
    }

    /// Returns the directory holding this store's chunk files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, coord: ChunkCoord) -> PathBuf {
        self.root.join(coord.file_name())
    }

    /// Checks whether the chunk file for `coord` exists.
    ///
    /// Existence alone, not content, signals that a chunk has been generated.
    pub fn exists(&self, coord: ChunkCoord) -> bool {
        self.path_for(coord).exists()
    }

    /// Reads every block of a chunk into a set.
    ///
    /// Duplicate positions are collapsed with first-record-wins, matching the
    /// block identity rule. A missing or unreadable file yields the empty set
    /// and a log line, never an error.
    pub fn read_all(&self, coord: ChunkCoord) -> HashSet<Block> {
        let path = self.path_for(coord);
        match read_records(&path) {
            Ok(records) => {
                let mut blocks = HashSet::with_capacity(records.len());
                for block in records {
                    blocks.insert(block);
                }
                blocks
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("chunk {coord} has no file yet");
                HashSet::new()
            }
            Err(err) => {
                warn!("cannot read chunk file {}: {err}", path.display());
                HashSet::new()
            }
        }
    }

    /// Appends a single block record to a chunk file.
    ///
    /// The write is skipped when a record with the same position and type is
    /// already present, so calling `append` twice with one block yields one
    /// record. The check reads the file first, which makes this an
    /// at-least-once rather than exactly-once guard if two execution contexts
    /// ever interleave writes.
    ///
    /// # Returns
    /// `Ok(true)` when a record was written, `Ok(false)` when the block was
    /// already on disk.
    pub fn append(&self, coord: ChunkCoord, block: Block) -> Result<bool, StorageError> {
        let existing = self.read_all(coord);
        if existing
            .get(&block)
            .is_some_and(|held| held.block_type() == block.block_type())
        {
            return Ok(false);
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.path_for(coord))?;
        file.write_all(&codec::to_bytes(&block))?;
        Ok(true)
    }

    /// Removes every record matching `position` and `block_type` from a chunk.
    ///
    /// The chunk is read in full, filtered, written to a temporary file in the
    /// same directory, and renamed over the original. The chunk file is never
    /// mutated in place, so a crash leaves either the old file or the complete
    /// new one.
    ///
    /// Records that fail to decode are dropped by the rewrite.
    pub fn delete_one(
        &self,
        coord: ChunkCoord,
        position: Point3<i32>,
        block_type: BlockType,
    ) -> Result<(), StorageError> {
        let path = self.path_for(coord);
        let records = match read_records(&path) {
            Ok(records) => records,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("delete in chunk {coord} skipped, no file");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let mut bytes = Vec::with_capacity(records.len() * RECORD_BYTES);
        for block in records {
            if block.position() == position && block.block_type() == block_type {
                continue;
            }
            bytes.extend_from_slice(&codec::to_bytes(&block));
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

/// Decodes the consecutive records of a chunk file, in file order.
///
/// A short trailing record ends the stream; undecodable records are skipped.
fn read_records(path: &Path) -> io::Result<Vec<Block>> {
    let bytes = fs::read(path)?;
    if bytes.len() % RECORD_BYTES != 0 {
        debug!(
            "chunk file {} has a truncated trailing record",
            path.display()
        );
    }

    let mut records = Vec::with_capacity(bytes.len() / RECORD_BYTES);
    let mut buffer = [0u8; RECORD_BYTES];
    for record in bytes.chunks_exact(RECORD_BYTES) {
        buffer.copy_from_slice(record);
        match codec::from_bytes(buffer) {
            Ok(block) => records.push(block),
            Err(err) => warn!("skipping record in {}: {err}", path.display()),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(tag: &str) -> ChunkStore {
        let dir = std::env::temp_dir().join(format!(
            "voxel-sandbox-{tag}-{}-{}",
            std::process::id(),
            fastrand::u32(..)
        ));
        fs::create_dir_all(&dir).expect("scratch dir");
        ChunkStore::new(dir)
    }

    #[test]
    fn missing_chunk_reads_empty() {
        let store = scratch_store("missing");
        let coord = ChunkCoord::new(3, -3);
        assert!(!store.exists(coord));
        assert!(store.read_all(coord).is_empty());
    }

    #[test]
    fn append_then_read_round_trips() {
        let store = scratch_store("roundtrip");
        let coord = ChunkCoord::new(0, 0);
        let block = Block::new(Point3::new(4, 9, 12), BlockType::WOOD);

        assert!(store.append(coord, block).expect("append"));
        assert!(store.exists(coord));

        let blocks = store.read_all(coord);
        assert_eq!(blocks.len(), 1);
        let held = blocks.get(&block).expect("block present");
        assert_eq!(held.block_type(), BlockType::WOOD);
    }

    #[test]
    fn append_deduplicates_identical_blocks() {
        let store = scratch_store("dedupe");
        let coord = ChunkCoord::new(1, 1);
        let block = Block::new(Point3::new(20, 5, 21), BlockType::STONE);

        assert!(store.append(coord, block).expect("first append"));
        assert!(!store.append(coord, block).expect("second append"));

        let len = fs::metadata(store.path_for(coord)).expect("metadata").len();
        assert_eq!(len as usize, RECORD_BYTES);
    }

    #[test]
    fn same_position_different_type_appends_but_first_wins_on_read() {
        let store = scratch_store("firstwins");
        let coord = ChunkCoord::new(0, 1);
        let position = Point3::new(2, 30, 18);

        assert!(store
            .append(coord, Block::new(position, BlockType::GRASS))
            .expect("append grass"));
        assert!(store
            .append(coord, Block::new(position, BlockType::WATER))
            .expect("append water"));

        let len = fs::metadata(store.path_for(coord)).expect("metadata").len();
        assert_eq!(len as usize, 2 * RECORD_BYTES);

        let blocks = store.read_all(coord);
        assert_eq!(blocks.len(), 1);
        let held = blocks
            .get(&Block::new(position, BlockType::WATER))
            .expect("position present");
        assert_eq!(held.block_type(), BlockType::GRASS);
    }

    #[test]
    fn delete_one_rewrites_without_the_block() {
        let store = scratch_store("delete");
        let coord = ChunkCoord::new(-1, 2);
        let doomed = Block::new(Point3::new(-5, 8, 40), BlockType::DIRT);
        let survivor = Block::new(Point3::new(-6, 8, 40), BlockType::DIRT);

        store.append(coord, doomed).expect("append doomed");
        store.append(coord, survivor).expect("append survivor");
        store
            .delete_one(coord, doomed.position(), doomed.block_type())
            .expect("delete");

        let blocks = store.read_all(coord);
        assert_eq!(blocks.len(), 1);
        assert!(blocks.contains(&survivor));
        assert!(!blocks.contains(&doomed));
    }

    #[test]
    fn delete_in_missing_chunk_is_not_an_error() {
        let store = scratch_store("delete-missing");
        let coord = ChunkCoord::new(9, 9);
        store
            .delete_one(coord, Point3::new(0, 0, 0), BlockType::STONE)
            .expect("delete without file");
        assert!(!store.exists(coord));
    }

    #[test]
    fn truncated_trailing_record_ends_the_stream() {
        let store = scratch_store("truncated");
        let coord = ChunkCoord::new(2, 2);
        let block = Block::new(Point3::new(33, 1, 34), BlockType::LEAVES);

        let mut bytes = codec::to_bytes(&block).to_vec();
        bytes.extend_from_slice(&[0xAB, 0xCD, 0xEF]);
        fs::write(store.path_for(coord), bytes).expect("write");

        let blocks = store.read_all(coord);
        assert_eq!(blocks.len(), 1);
        assert!(blocks.contains(&block));
    }
}
