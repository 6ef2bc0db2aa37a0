//! # Terrain Generator
//!
//! Deterministic, column-at-a-time terrain generation. Every column of a
//! chunk gets a height from seeded 2D Perlin noise; columns above the water
//! level get one surface block (and sometimes a tree), columns at or below it
//! get one water block.
//!
//! Determinism is a hard requirement: the world is file-backed, so the same
//! seed and coordinate must produce the same blocks across sessions for
//! regeneration to be consistent. Nothing in this module draws from a
//! non-seeded random source.
//!
//! Generated blocks are written through [`ChunkStore::append`] one at a time,
//! routed to the chunk containing each block's own `(x, z)`. Tree canopies
//! can therefore reach across a chunk border; a canopy block is only written
//! when its target chunk file already exists, so stamping never marks a
//! neighboring chunk as generated.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};

use super::block::{Block, BlockType};
use super::coords::ChunkCoord;
use super::store::{ChunkStore, StorageError};

/// Scaling factor applied to world coordinates when sampling the height noise.
pub const HEIGHT_FREQUENCY: f64 = 0.02;
/// Maximum surface height produced by the height noise.
const SURFACE_AMPLITUDE: f64 = 48.0;

/// Scaling factor for the tree placement noise. Much higher frequency than the
/// height noise so neighboring columns gate independently.
const TREE_FREQUENCY: f64 = 0.9;
/// Tree noise samples above this value grow a tree on the column.
const TREE_THRESHOLD: f64 = 0.72;
/// Height of a tree trunk, in blocks above the surface.
const TRUNK_HEIGHT: i32 = 6;
/// Radius of the spherical leaf cluster at the trunk top.
const LEAF_RADIUS: i32 = 2;

/// Deterministic height and material assignment for world columns.
pub struct TerrainGenerator {
    height_noise: Perlin,
    tree_noise: Perlin,
    water_level: i32,
}

impl TerrainGenerator {
    /// Creates a generator for the given world seed and water level.
    ///
    /// The tree noise is seeded independently of the height noise so the two
    /// fields do not correlate.
    pub fn new(seed: u32, water_level: i32) -> Self {
        TerrainGenerator {
            height_noise: Perlin::new(seed),
            tree_noise: Perlin::new(seed.wrapping_add(1)),
            water_level,
        }
    }

    /// Returns the surface height of the column at world `(x, z)`.
    ///
    /// The noise sample in `[-1, 1]` is mapped onto `[0, SURFACE_AMPLITUDE]`.
    /// The same `(x, z)` always yields the same height.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let sample = self.height_noise.get([
            x as f64 * HEIGHT_FREQUENCY,
            z as f64 * HEIGHT_FREQUENCY,
        ]);
        ((sample + 1.0) * 0.5 * SURFACE_AMPLITUDE) as i32
    }

    fn wants_tree(&self, x: i32, z: i32) -> bool {
        let sample = self
            .tree_noise
            .get([x as f64 * TREE_FREQUENCY, z as f64 * TREE_FREQUENCY]);
        sample > TREE_THRESHOLD
    }

    /// Generates the column at world `(x, z)` and writes it through the store.
    ///
    /// Columns above the water level get one grass surface block at their
    /// height, and possibly a tree. All other columns get one water block at
    /// the water level.
    pub fn generate_column(
        &self,
        store: &ChunkStore,
        x: i32,
        z: i32,
    ) -> Result<(), StorageError> {
        let height = self.surface_height(x, z);
        if height > self.water_level {
            let surface = Point3::new(x, height, z);
            self.place(store, Block::new(surface, BlockType::GRASS))?;
            if self.wants_tree(x, z) {
                self.stamp_tree(store, surface)?;
            }
        } else {
            let surface = Point3::new(x, self.water_level, z);
            self.place(store, Block::new(surface, BlockType::WATER))?;
        }
        Ok(())
    }

    /// Generates all 256 columns of the chunk at `coord`.
    ///
    /// Column iteration comes from [`ChunkCoord::columns`], which covers the
    /// full 16x16 extent in every quadrant. Generation order determines the
    /// record order inside the file but not its content: regenerating the
    /// same coordinate yields the same block at every position.
    pub fn generate_chunk(&self, store: &ChunkStore, coord: ChunkCoord) -> Result<(), StorageError> {
        for (x, z) in coord.columns() {
            self.generate_column(store, x, z)?;
        }
        Ok(())
    }

    fn place(&self, store: &ChunkStore, block: Block) -> Result<(), StorageError> {
        store.append(ChunkCoord::containing(block.position()), block)?;
        Ok(())
    }

    /// Stamps a tree on the surface block at `base`: a vertical trunk with a
    /// spherical leaf cluster centered at the trunk top.
    fn stamp_tree(&self, store: &ChunkStore, base: Point3<i32>) -> Result<(), StorageError> {
        for level in 1..TRUNK_HEIGHT {
            let trunk = Point3::new(base.x, base.y + level, base.z);
            self.place(store, Block::new(trunk, BlockType::WOOD))?;

            if level == TRUNK_HEIGHT - 1 {
                for x in trunk.x - LEAF_RADIUS..=trunk.x + LEAF_RADIUS {
                    for y in trunk.y - LEAF_RADIUS..=trunk.y + LEAF_RADIUS {
                        for z in trunk.z - LEAF_RADIUS..=trunk.z + LEAF_RADIUS {
                            let dx = x - trunk.x;
                            let dy = y - trunk.y;
                            let dz = z - trunk.z;
                            if dx * dx + dy * dy + dz * dz > LEAF_RADIUS * LEAF_RADIUS {
                                continue;
                            }
                            let coord = ChunkCoord::of_world(x, z);
                            // Canopies may reach into a neighboring chunk. Writing
                            // there would create its file and mark it generated, so
                            // leaves only land in chunks that already exist.
                            if store.exists(coord) {
                                store.append(coord, Block::new(Point3::new(x, y, z), BlockType::LEAVES))?;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
