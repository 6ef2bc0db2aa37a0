//! # Coordinate Mapper
//!
//! This module converts between world coordinates and chunk coordinates, and
//! derives the stable file name under which a chunk is persisted.
//!
//! ## Coordinate Spaces
//!
//! The world is an unbounded grid of integer block positions. Persistence and
//! streaming operate on chunks, 16x16 columns of the world's `(x, z)` plane.
//! World coordinate `w` belongs to chunk coordinate `floor(w / 16)`. Floor
//! division (not truncating division) matters for negative coordinates:
//! `-20 / 16` truncates to `-1`, while block `-20` belongs to chunk `-2`.
//!
//! Chunk coordinates and world coordinates are easy to mix up because both are
//! plain integers. The two `ChunkCoord` constructors keep the call sites
//! distinct: `ChunkCoord::new` takes coordinates that are already in chunk
//! space, `ChunkCoord::of_world` takes world coordinates and divides them.

use std::fmt;

use cgmath::Point3;

/// The width and depth of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;

/// Maps a single world-axis coordinate to its chunk-axis coordinate.
///
/// This is floor division by [`CHUNK_DIMENSION`], so the invariant
/// `chunk_axis(w) * 16 <= w < chunk_axis(w) * 16 + 16` holds for every `w`,
/// including negatives and exact multiples of 16.
///
/// # Arguments
/// * `world` - A world coordinate on the x or z axis
///
/// # Returns
/// The chunk coordinate containing `world`.
pub fn chunk_axis(world: i32) -> i32 {
    world.div_euclid(CHUNK_DIMENSION)
}

/// Identifies one 16x16 column region of the world.
///
/// A `ChunkCoord` is the key for every persistence and streaming operation:
/// it names the chunk file on disk and the cache entry in memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// Chunk coordinate along the world x axis.
    pub x: i32,
    /// Chunk coordinate along the world z axis.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate from values already in chunk space.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// Creates the chunk coordinate containing the given world `(x, z)`.
    pub fn of_world(x: i32, z: i32) -> Self {
        ChunkCoord {
            x: chunk_axis(x),
            z: chunk_axis(z),
        }
    }

    /// Creates the chunk coordinate containing a block position.
    ///
    /// Only the `x` and `z` components participate; chunks span the full
    /// height of the world.
    pub fn containing(position: Point3<i32>) -> Self {
        Self::of_world(position.x, position.z)
    }

    /// Returns the file name under which this chunk is persisted.
    ///
    /// The mapping is injective and stable: two distinct coordinates never
    /// collide, and the same coordinate always yields the same name.
    pub fn file_name(&self) -> String {
        format!("Chunk({},{}).bin", self.x, self.z)
    }

    /// Iterates the 256 world `(x, z)` columns belonging to this chunk.
    ///
    /// The bounds are `[x * 16, x * 16 + 16)` on each axis. A single ascending
    /// range is correct in all four quadrants because the multiplication, not
    /// the sign of the chunk coordinate, drives the bounds.
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32)> {
        let base_x = self.x * CHUNK_DIMENSION;
        let base_z = self.z * CHUNK_DIMENSION;
        (base_x..base_x + CHUNK_DIMENSION).flat_map(move |x| {
            (base_z..base_z + CHUNK_DIMENSION).map(move |z| (x, z))
        })
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_axis_satisfies_floor_invariant() {
        for w in -100..=100 {
            let c = chunk_axis(w);
            assert!(
                c * CHUNK_DIMENSION <= w && w < c * CHUNK_DIMENSION + CHUNK_DIMENSION,
                "world {} mapped to chunk {}",
                w,
                c
            );
        }
    }

    #[test]
    fn chunk_axis_handles_negative_boundaries() {
        assert_eq!(chunk_axis(0), 0);
        assert_eq!(chunk_axis(15), 0);
        assert_eq!(chunk_axis(16), 1);
        assert_eq!(chunk_axis(-1), -1);
        assert_eq!(chunk_axis(-16), -1);
        assert_eq!(chunk_axis(-17), -2);
        assert_eq!(chunk_axis(-20), -2);
    }

    #[test]
    fn world_and_chunk_constructors_agree() {
        assert_eq!(ChunkCoord::of_world(5, -20), ChunkCoord::new(0, -2));
        assert_eq!(
            ChunkCoord::of_world(5, -20).file_name(),
            ChunkCoord::new(0, -2).file_name()
        );
    }

    #[test]
    fn file_names_are_stable_and_injective() {
        let coord = ChunkCoord::new(-3, 7);
        assert_eq!(coord.file_name(), "Chunk(-3,7).bin");
        assert_eq!(coord.file_name(), coord.file_name());

        let mut names = std::collections::HashSet::new();
        for x in -4..4 {
            for z in -4..4 {
                assert!(names.insert(ChunkCoord::new(x, z).file_name()));
            }
        }
    }

    #[test]
    fn columns_cover_the_full_extent_in_every_quadrant() {
        for coord in [
            ChunkCoord::new(0, 0),
            ChunkCoord::new(-1, 0),
            ChunkCoord::new(-1, -1),
            ChunkCoord::new(2, -3),
        ] {
            let columns: Vec<(i32, i32)> = coord.columns().collect();
            assert_eq!(columns.len(), 256);
            for (x, z) in columns {
                assert_eq!(chunk_axis(x), coord.x);
                assert_eq!(chunk_axis(z), coord.z);
            }
        }
    }
}
