//! # Block Module
//!
//! This module defines the block value type and the finite enumeration of
//! block materials. Blocks are the unit of persistence: one block becomes one
//! fixed-size record in a chunk file.

use std::hash::{Hash, Hasher};

use cgmath::Point3;
use num_derive::FromPrimitive;

/// The underlying integer type used to represent block types on disk.
pub type BlockTypeSize = u8;

/// Enumerates all block materials in the world.
///
/// The discriminants are the on-disk ids. The record format reserves 7 bits
/// for the id, so ids up to 127 are representable; values outside this
/// enumeration are headroom with no assigned meaning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Plain stone.
    STONE,

    /// Dirt, the filler material under grass.
    DIRT,

    /// A grass-topped surface block, the default terrain material.
    GRASS,

    /// Tree trunk material.
    WOOD,

    /// Tree canopy material.
    LEAVES,

    /// Water, placed at the water level wherever the terrain dips below it.
    WATER,
}

impl BlockType {
    /// Converts an on-disk id to a `BlockType`.
    ///
    /// # Arguments
    /// * `id` - The block type id as stored in a chunk record
    ///
    /// # Returns
    /// The corresponding `BlockType`, or `None` when the id has no assigned
    /// material.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// Returns the on-disk id of this block type.
    pub fn id(&self) -> BlockTypeSize {
        *self as BlockTypeSize
    }

    /// Returns every block type, in id order.
    pub fn all() -> [Self; 6] {
        [
            BlockType::STONE,
            BlockType::DIRT,
            BlockType::GRASS,
            BlockType::WOOD,
            BlockType::LEAVES,
            BlockType::WATER,
        ]
    }
}

/// A single voxel: an integer position and a material.
///
/// # Identity
///
/// Equality and hashing consider the position only. Two blocks at the same
/// position are the same entity regardless of their declared type, so a
/// `HashSet<Block>` never holds two entries at one position and the first
/// inserted entry wins. Chunk loading and the deduplication check on write
/// both rely on this.
#[derive(Copy, Clone, Debug)]
pub struct Block {
    position: Point3<i32>,
    block_type: BlockType,
}

impl Block {
    /// Creates a new block.
    ///
    /// # Arguments
    /// * `position` - Integer world position of the block
    /// * `block_type` - The material of the block
    pub fn new(position: Point3<i32>, block_type: BlockType) -> Self {
        Block {
            position,
            block_type,
        }
    }

    /// Returns the world position of this block.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Returns the material of this block.
    pub fn block_type(&self) -> BlockType {
        self.block_type
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for Block {}

impl Hash for Block {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equality_is_position_only() {
        let position = Point3::new(4, 10, -3);
        let grass = Block::new(position, BlockType::GRASS);
        let water = Block::new(position, BlockType::WATER);
        assert_eq!(grass, water);
        assert_ne!(grass, Block::new(Point3::new(4, 11, -3), BlockType::GRASS));
    }

    #[test]
    fn sets_keep_the_first_block_per_position() {
        let position = Point3::new(0, 5, 0);
        let mut blocks = HashSet::new();
        assert!(blocks.insert(Block::new(position, BlockType::STONE)));
        assert!(!blocks.insert(Block::new(position, BlockType::WATER)));
        assert_eq!(blocks.len(), 1);
        let held = blocks
            .get(&Block::new(position, BlockType::WATER))
            .expect("position is present");
        assert_eq!(held.block_type(), BlockType::STONE);
    }

    #[test]
    fn ids_round_trip_through_the_enumeration() {
        for block_type in BlockType::all() {
            assert_eq!(BlockType::from_id(block_type.id()), Some(block_type));
        }
        assert_eq!(BlockType::from_id(6), None);
        assert_eq!(BlockType::from_id(127), None);
    }
}
