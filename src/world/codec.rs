//! # Block Codec
//!
//! Fixed-width binary encoding of a single block into a 64-bit record.
//!
//! ## Record Layout
//!
//! One block occupies exactly 8 bytes. The bit layout, from the most
//! significant bit down:
//!
//! | field       | bits | meaning                                      |
//! |-------------|------|----------------------------------------------|
//! | x sign      | 1    | 1 when the world x coordinate is negative    |
//! | z sign      | 1    | 1 when the world z coordinate is negative    |
//! | y           | 7    | unsigned height, 0..=127                     |
//! | x magnitude | 20   | absolute value of x, up to 1,048,575         |
//! | z magnitude | 20   | absolute value of z                          |
//! | block id    | 7    | the `BlockType` id                           |
//! | attributes  | 8    | reserved, always written as 0                |
//!
//! The x and z coordinates are stored as magnitude plus sign bit, never as
//! two's complement. The y coordinate has no sign bit: heights are never
//! negative in this world model. Values wider than their field are narrowed
//! by masking.
//!
//! Records are written as 8 little-endian bytes with no separators or length
//! prefixes; the end of the file is the only record count. Encoding and
//! decoding round-trip exactly for every value within the field ranges.

use cgmath::Point3;
use thiserror::Error;

use super::block::{Block, BlockType, BlockTypeSize};

/// The size of one encoded block record in bytes.
pub const RECORD_BYTES: usize = 8;

const X_SIGN_SHIFT: u32 = 63;
const Z_SIGN_SHIFT: u32 = 62;
const Y_SHIFT: u32 = 55;
const X_MAG_SHIFT: u32 = 35;
const Z_MAG_SHIFT: u32 = 15;
const ID_SHIFT: u32 = 8;

const Y_MASK: u64 = 0x7F;
const MAGNITUDE_MASK: u64 = 0xF_FFFF;
const ID_MASK: u64 = 0x7F;

/// Errors produced while decoding a block record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The record's id field names no known block type.
    #[error("no block type with id {0}")]
    UnknownBlockType(BlockTypeSize),
}

/// Encodes a block into its 64-bit record.
pub fn encode(block: &Block) -> u64 {
    let position = block.position();
    let x_sign = u64::from(position.x < 0);
    let z_sign = u64::from(position.z < 0);
    let x_magnitude = u64::from(position.x.unsigned_abs()) & MAGNITUDE_MASK;
    let z_magnitude = u64::from(position.z.unsigned_abs()) & MAGNITUDE_MASK;
    let y = (position.y as u64) & Y_MASK;
    let id = u64::from(block.block_type().id()) & ID_MASK;

    x_sign << X_SIGN_SHIFT
        | z_sign << Z_SIGN_SHIFT
        | y << Y_SHIFT
        | x_magnitude << X_MAG_SHIFT
        | z_magnitude << Z_MAG_SHIFT
        | id << ID_SHIFT
}

/// Decodes a 64-bit record back into a block.
///
/// # Arguments
/// * `record` - The packed record, as produced by [`encode`]
///
/// # Returns
/// The decoded block, or a [`CodecError`] when the id field names no known
/// block type.
pub fn decode(record: u64) -> Result<Block, CodecError> {
    let x_magnitude = ((record >> X_MAG_SHIFT) & MAGNITUDE_MASK) as i32;
    let z_magnitude = ((record >> Z_MAG_SHIFT) & MAGNITUDE_MASK) as i32;
    let x = if record >> X_SIGN_SHIFT & 1 == 1 {
        -x_magnitude
    } else {
        x_magnitude
    };
    let z = if record >> Z_SIGN_SHIFT & 1 == 1 {
        -z_magnitude
    } else {
        z_magnitude
    };
    let y = ((record >> Y_SHIFT) & Y_MASK) as i32;
    let id = ((record >> ID_SHIFT) & ID_MASK) as BlockTypeSize;
    let block_type = BlockType::from_id(id).ok_or(CodecError::UnknownBlockType(id))?;

    Ok(Block::new(Point3::new(x, y, z), block_type))
}

/// Encodes a block into the 8 bytes written to a chunk file.
pub fn to_bytes(block: &Block) -> [u8; RECORD_BYTES] {
    encode(block).to_le_bytes()
}

/// Decodes 8 bytes read from a chunk file.
pub fn from_bytes(bytes: [u8; RECORD_BYTES]) -> Result<Block, CodecError> {
    decode(u64::from_le_bytes(bytes))
}
