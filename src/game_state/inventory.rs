//! # Inventory
//!
//! Per-block-type counters for the player's stock. Placement debits one
//! block, removal refunds one.

use std::collections::HashMap;

use crate::world::BlockType;

/// The player's stock of placeable blocks, one counter per block type.
pub struct Inventory {
    blocks: HashMap<BlockType, u32>,
}

impl Inventory {
    /// Creates an inventory holding `starting_count` of every block type.
    pub fn new(starting_count: u32) -> Self {
        let mut blocks = HashMap::new();
        for block_type in BlockType::all() {
            blocks.insert(block_type, starting_count);
        }
        Inventory { blocks }
    }

    /// Returns how many blocks of `block_type` the player holds.
    pub fn block_count(&self, block_type: BlockType) -> u32 {
        self.blocks.get(&block_type).copied().unwrap_or(0)
    }

    /// Adds one block of the given type.
    pub fn add_block(&mut self, block_type: BlockType) {
        *self.blocks.entry(block_type).or_insert(0) += 1;
    }

    /// Removes one block of the given type if any are held.
    ///
    /// # Returns
    /// `true` when a block was available and removed, `false` when the
    /// counter was already zero.
    pub fn remove_block(&mut self, block_type: BlockType) -> bool {
        match self.blocks.get_mut(&block_type) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_equal_and_move_one_at_a_time() {
        let mut inventory = Inventory::new(2);
        assert_eq!(inventory.block_count(BlockType::WOOD), 2);

        assert!(inventory.remove_block(BlockType::WOOD));
        assert!(inventory.remove_block(BlockType::WOOD));
        assert!(!inventory.remove_block(BlockType::WOOD));
        assert_eq!(inventory.block_count(BlockType::WOOD), 0);

        inventory.add_block(BlockType::WOOD);
        assert_eq!(inventory.block_count(BlockType::WOOD), 1);
        assert_eq!(inventory.block_count(BlockType::WATER), 2);
    }
}
