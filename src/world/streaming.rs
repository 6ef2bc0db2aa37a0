//! # Streaming Scheduler
//!
//! Keeps the player-centered region of the world generated on disk and
//! materialized in memory, without ever doing more than one chunk's worth of
//! file I/O in a single tick.
//!
//! ## Two Radii
//!
//! The scheduler works with two square regions around the player's chunk:
//!
//! * `render_distance + buffer`: the generation region. Chunks in this square
//!   whose file does not exist are candidates for generation.
//! * `render_distance`: the visible region. Chunks in this square that are
//!   not yet in the in-memory cache are candidates for loading.
//!
//! The buffer ring exists to hide generation latency: a chunk is generated
//! while it is still outside the visible radius, so by the time the player's
//! movement brings it into view only the (cheap) cache load remains.
//!
//! ## Pacing
//!
//! Per tick, at most one chunk transitions ungenerated to generated and at
//! most one chunk transitions uncached to cached. This caps the worst-case
//! per-frame I/O at one chunk, which is what keeps blocking file access
//! acceptable on the render thread. Loading everything in view up front is
//! exactly the stall this scheduler exists to avoid.
//!
//! The generation candidates are rescanned from disk state every tick rather
//! than queued across ticks, so candidates that leave the region as the
//! player moves simply stop being found.
//!
//! ## Cache Growth
//!
//! Cache entries are created on first load and never evicted. The cache
//! grows without bound as the player travels; that growth is a known
//! property of this design, inherited deliberately, and callers should not
//! assume eviction ever happens.

use std::collections::{HashMap, HashSet};

use cgmath::Point3;
use log::{debug, error};

use super::block::{Block, BlockType};
use super::coords::ChunkCoord;
use super::store::{ChunkStore, StorageError};
use super::terrain::TerrainGenerator;

/// What one scheduler tick did, for logging and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamReport {
    /// How many chunks of the generation region had no file this tick.
    pub missing: usize,
    /// The chunk generated this tick, if any.
    pub generated: Option<ChunkCoord>,
    /// The chunk loaded into the cache this tick, if any.
    pub cached: Option<ChunkCoord>,
}

/// Maintains the active region: pending generation plus the in-memory cache.
pub struct ChunkStreamer {
    render_distance: i32,
    buffer: i32,
    cache: HashMap<ChunkCoord, HashSet<Block>>,
}

impl ChunkStreamer {
    /// Creates a streamer with the given visible radius and buffer ring width,
    /// both in chunks.
    pub fn new(render_distance: i32, buffer: i32) -> Self {
        ChunkStreamer {
            render_distance,
            buffer,
            cache: HashMap::new(),
        }
    }

    /// Runs one scheduler tick centered on the player's chunk.
    ///
    /// Scans the buffered region for ungenerated chunks and generates at most
    /// one of them, then scans the visible region for uncached chunks and
    /// loads at most one. Generation failures are logged and the frame
    /// continues; the chunk will be found missing again on a later tick if
    /// its file was never created.
    pub fn tick(
        &mut self,
        store: &ChunkStore,
        generator: &TerrainGenerator,
        player_chunk: ChunkCoord,
    ) -> StreamReport {
        let mut report = StreamReport::default();

        let reach = self.render_distance + self.buffer;
        let mut pending = None;
        for i in -reach..=reach {
            for j in -reach..=reach {
                let coord = ChunkCoord::new(player_chunk.x + i, player_chunk.z + j);
                if !store.exists(coord) {
                    report.missing += 1;
                    if pending.is_none() {
                        pending = Some(coord);
                    }
                }
            }
        }

        if let Some(coord) = pending {
            debug!("generating chunk {coord}");
            match generator.generate_chunk(store, coord) {
                Ok(()) => report.generated = Some(coord),
                Err(err) => error!("generation of chunk {coord} failed: {err}"),
            }
        }

        'load: for i in -self.render_distance..=self.render_distance {
            for j in -self.render_distance..=self.render_distance {
                let coord = ChunkCoord::new(player_chunk.x + i, player_chunk.z + j);
                if !self.cache.contains_key(&coord) && store.exists(coord) {
                    self.cache.insert(coord, store.read_all(coord));
                    report.cached = Some(coord);
                    break 'load;
                }
            }
        }

        report
    }

    /// Returns the union of every cached chunk's blocks.
    ///
    /// This is what the renderer consumes each tick.
    pub fn visible_blocks(&self) -> HashSet<Block> {
        let mut blocks = HashSet::new();
        for chunk_blocks in self.cache.values() {
            blocks.extend(chunk_blocks.iter().copied());
        }
        blocks
    }

    /// Returns how many chunks are currently materialized in the cache.
    pub fn cached_chunks(&self) -> usize {
        self.cache.len()
    }

    /// Checks whether the chunk at `coord` is materialized in the cache.
    pub fn is_cached(&self, coord: ChunkCoord) -> bool {
        self.cache.contains_key(&coord)
    }

    /// Looks up the cached block at an exact position, if its chunk is cached
    /// and a block is there.
    pub fn cached_block_at(&self, position: Point3<i32>) -> Option<Block> {
        let coord = ChunkCoord::containing(position);
        let chunk_blocks = self.cache.get(&coord)?;
        // Block equality ignores the probe's type, so any type works here.
        chunk_blocks
            .get(&Block::new(position, BlockType::STONE))
            .copied()
    }

    /// Writes a block through the store and, on success, into the cache.
    ///
    /// The cache is only touched after the file write succeeds, so a failed
    /// write leaves cache and file in agreement. When the block's chunk is
    /// not cached yet, the file write alone is enough: the block arrives in
    /// memory whenever that chunk is loaded.
    ///
    /// # Returns
    /// `Ok(true)` when the block was written, `Ok(false)` when an identical
    /// block was already on disk.
    pub fn place(&mut self, store: &ChunkStore, block: Block) -> Result<bool, StorageError> {
        let coord = ChunkCoord::containing(block.position());
        let written = store.append(coord, block)?;
        if written {
            if let Some(chunk_blocks) = self.cache.get_mut(&coord) {
                chunk_blocks.insert(block);
            }
        }
        Ok(written)
    }

    /// Deletes a block through the store and, on success, from the cache.
    ///
    /// Like [`ChunkStreamer::place`], the cache mutation happens only after
    /// the rewrite succeeds. The cached entry is removed only when it matches
    /// the requested type as well as the position.
    pub fn remove(&mut self, store: &ChunkStore, block: Block) -> Result<(), StorageError> {
        let coord = ChunkCoord::containing(block.position());
        store.delete_one(coord, block.position(), block.block_type())?;
        if let Some(chunk_blocks) = self.cache.get_mut(&coord) {
            let matches = chunk_blocks
                .get(&block)
                .is_some_and(|held| held.block_type() == block.block_type());
            if matches {
                chunk_blocks.remove(&block);
            }
        }
        Ok(())
    }
}
