//! # Game State Module
//!
//! The state owned by the main loop: camera, inventory, chunk store, terrain
//! generator and streaming scheduler, held together by one explicit
//! [`GameState`] struct. There are no process-wide singletons; everything the
//! frame loop touches is reachable from here.
//!
//! ## Collaborator Seams
//!
//! The windowing and rendering layers live outside this crate and talk to the
//! game through two small traits:
//!
//! * [`InputSink`] - the window layer forwards key, cursor and scroll events
//!   into the game through a stable handle. `GameState` implements it.
//! * [`Renderer`] - receives the set of visible blocks once per tick and is
//!   free to draw them however it likes. Rendering never affects the
//!   correctness of the storage and streaming core.
//!
//! ## Mutation Path
//!
//! Block placement and removal go through the chunk store and the in-memory
//! cache in one call, and the inventory is debited or credited around them.
//! On a failed write nothing is applied to cache or inventory, so the three
//! never disagree for longer than the failing call.

use std::collections::HashSet;
use std::time::Duration;

use cgmath::{Deg, Point3};
use log::{error, info};

use crate::config::WorldSettings;
use crate::world::{
    Block, BlockType, ChunkCoord, ChunkStore, ChunkStreamer, StreamReport, TerrainGenerator,
};

use camera::{Camera, CameraController};
use inventory::Inventory;

pub mod camera;
pub mod inventory;

/// Movement speed handed to the camera controller, in blocks per second.
const CAMERA_SPEED: f32 = 8.0;
/// Mouse look sensitivity handed to the camera controller.
const CAMERA_SENSITIVITY: f32 = 0.4;

/// The input vocabulary the windowing collaborator translates its events into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyInput {
    /// Move toward the view direction.
    MoveForward,
    /// Move away from the view direction.
    MoveBackward,
    /// Strafe left.
    StrafeLeft,
    /// Strafe right.
    StrafeRight,
    /// Rise vertically.
    Ascend,
    /// Sink vertically.
    Descend,
    /// Select the block type with this id for placement.
    Hotbar(u8),
}

/// Receives input events from the windowing collaborator.
///
/// The window layer holds a handle to the implementor and calls these methods
/// from its event callbacks.
pub trait InputSink {
    /// Called when a key is pressed or released.
    fn on_key(&mut self, key: KeyInput, pressed: bool);
    /// Called when the cursor moves, with its new absolute position.
    fn on_cursor_move(&mut self, x: f64, y: f64);
    /// Called when the scroll wheel moves.
    fn on_scroll(&mut self, delta_x: f64, delta_y: f64);
}

/// Consumes the set of visible blocks once per tick.
pub trait Renderer {
    /// Draws the given blocks. Called every tick with the cache's union.
    fn render(&mut self, blocks: &HashSet<Block>);
}

/// Everything the main loop owns.
pub struct GameState {
    /// The player's camera.
    pub camera: Camera,
    /// Input accumulator feeding the camera.
    pub controller: CameraController,
    /// The player's block stock.
    pub inventory: Inventory,
    /// File-backed chunk persistence.
    pub store: ChunkStore,
    /// Deterministic terrain generation.
    pub generator: TerrainGenerator,
    /// The streaming scheduler and block cache.
    pub streamer: ChunkStreamer,
    /// The block type the next placement will use.
    pub selected_block: BlockType,
    last_cursor: Option<(f64, f64)>,
}

impl GameState {
    /// Creates the game state for a world described by `settings`.
    pub fn new(settings: &WorldSettings) -> Self {
        GameState {
            camera: Camera::new(Point3::new(0.0, 30.0, 3.0), Deg(-90.0), Deg(-20.0)),
            controller: CameraController::new(CAMERA_SPEED, CAMERA_SENSITIVITY),
            inventory: Inventory::new(settings.starting_blocks),
            store: ChunkStore::new(settings.save_dir.clone()),
            generator: TerrainGenerator::new(settings.seed, settings.water_level),
            streamer: ChunkStreamer::new(settings.render_distance, settings.buffer),
            selected_block: BlockType::STONE,
            last_cursor: None,
        }
    }

    /// Returns the chunk coordinate the camera currently occupies.
    pub fn player_chunk(&self) -> ChunkCoord {
        ChunkCoord::of_world(self.camera.position.x as i32, self.camera.position.z as i32)
    }

    /// Advances the world by one frame.
    ///
    /// Applies accumulated input to the camera, runs one streaming scheduler
    /// tick (at most one chunk generated, at most one chunk cached), and
    /// hands the visible block set to the renderer. Nothing in here can fail
    /// the frame; every error degrades to a log line.
    ///
    /// # Arguments
    /// * `dt` - Time elapsed since the previous tick
    /// * `renderer` - The rendering collaborator for this frame
    ///
    /// # Returns
    /// A report of what the streaming scheduler did this tick.
    pub fn tick(&mut self, dt: Duration, renderer: &mut dyn Renderer) -> StreamReport {
        self.camera.update(&mut self.controller, dt);
        let report = self
            .streamer
            .tick(&self.store, &self.generator, self.player_chunk());
        renderer.render(&self.streamer.visible_blocks());
        report
    }

    /// Returns the block position the camera is aiming at, `distance` blocks
    /// along its view direction.
    pub fn target_position(&self, distance: f32) -> Point3<i32> {
        let forward = self.camera.forward();
        let target = self.camera.position + forward * distance;
        Point3::new(
            target.x.round() as i32,
            target.y.round() as i32,
            target.z.round() as i32,
        )
    }

    /// Places one block of the selected type at `position`.
    ///
    /// The inventory is debited first; when the write is skipped (a matching
    /// block already there) or fails, the debit is refunded so inventory,
    /// cache and file stay in agreement.
    ///
    /// # Returns
    /// `true` when a block was placed.
    pub fn place_block(&mut self, position: Point3<i32>) -> bool {
        let block_type = self.selected_block;
        if !self.inventory.remove_block(block_type) {
            info!("out of {block_type:?} blocks");
            return false;
        }

        let block = Block::new(position, block_type);
        match self.streamer.place(&self.store, block) {
            Ok(true) => true,
            Ok(false) => {
                self.inventory.add_block(block_type);
                false
            }
            Err(err) => {
                error!(
                    "placing block at ({}, {}, {}) failed: {err}",
                    position.x, position.y, position.z
                );
                self.inventory.add_block(block_type);
                false
            }
        }
    }

    /// Removes the block at `position`, refunding it to the inventory.
    ///
    /// The block must be materialized in the cache to be removed; only
    /// blocks the renderer can see can be hit.
    ///
    /// # Returns
    /// `true` when a block was removed.
    pub fn remove_block(&mut self, position: Point3<i32>) -> bool {
        let Some(block) = self.streamer.cached_block_at(position) else {
            return false;
        };
        match self.streamer.remove(&self.store, block) {
            Ok(()) => {
                self.inventory.add_block(block.block_type());
                true
            }
            Err(err) => {
                error!(
                    "removing block at ({}, {}, {}) failed: {err}",
                    position.x, position.y, position.z
                );
                false
            }
        }
    }
}

impl InputSink for GameState {
    fn on_key(&mut self, key: KeyInput, pressed: bool) {
        if let KeyInput::Hotbar(id) = key {
            if pressed {
                if let Some(block_type) = BlockType::from_id(id) {
                    self.selected_block = block_type;
                }
            }
            return;
        }
        self.controller.process_key(key, pressed);
    }

    fn on_cursor_move(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_cursor {
            self.controller.process_mouse(x - last_x, last_y - y);
        }
        self.last_cursor = Some((x, y));
    }

    fn on_scroll(&mut self, _delta_x: f64, delta_y: f64) {
        self.controller.process_scroll(delta_y);
    }
}
