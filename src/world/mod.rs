//! # World Module
//!
//! The persistence and streaming core of the sandbox: coordinate mapping,
//! the binary block codec, the file-backed chunk store, terrain generation,
//! and the streaming scheduler that ties them together.
//!
//! ## Data Flow
//!
//! The player's position selects a square of chunk coordinates. The
//! [`streaming::ChunkStreamer`] asks the [`store::ChunkStore`] which of those
//! chunks exist on disk; absent chunks are produced by the
//! [`terrain::TerrainGenerator`], which writes blocks through the store using
//! the [`codec`] record format. Present chunks are loaded into the in-memory
//! cache, whose union of blocks is handed to the renderer every tick.
//!
//! Chunk files are the source of truth. A chunk file's existence, not its
//! content, is what marks a region as generated.

pub mod block;
pub mod codec;
pub mod coords;
pub mod store;
pub mod streaming;
pub mod terrain;

pub use block::{Block, BlockType};
pub use coords::{chunk_axis, ChunkCoord, CHUNK_DIMENSION};
pub use store::{ChunkStore, StorageError};
pub use streaming::{ChunkStreamer, StreamReport};
pub use terrain::TerrainGenerator;
