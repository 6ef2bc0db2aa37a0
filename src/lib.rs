#![warn(missing_docs)]

//! # Voxel Sandbox
//!
//! A voxel-world sandbox built around a chunked terrain persistence and
//! streaming core: procedurally generated terrain saved to per-chunk binary
//! files, loaded back incrementally as the player moves, with block placement
//! and removal persisted through the same path.
//!
//! ## Key Modules
//!
//! * `world` - the persistence and streaming core: coordinates, block codec,
//!   chunk store, terrain generation and the streaming scheduler
//! * `game_state` - the state owned by the main loop, plus the `InputSink`
//!   and `Renderer` seams for the windowing and rendering collaborators
//! * `config` - world settings loaded from an optional JSON file
//!
//! ## Architecture
//!
//! Rendering and windowing live outside this crate. Each frame the game hands
//! the renderer the union of all cached blocks; input events arrive through
//! the `InputSink` trait. Everything else, from noise-driven generation to
//! the on-disk record format, is owned here. All streaming I/O happens on the
//! frame thread and is paced to at most one chunk generated and one chunk
//! loaded per tick, so a burst of newly visible terrain never stalls a frame.
//!
//! ## Usage
//!
//! ```rust,no_run
//! fn main() {
//!     voxel_sandbox::run();
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use log::info;

use config::WorldSettings;
use game_state::{GameState, InputSink, KeyInput, Renderer};
use world::Block;

pub mod config;
pub mod game_state;
pub mod world;

/// Frame pacing for the headless demo loop, roughly 60 ticks per second.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// How often the demo loop reports what the world looks like, in ticks.
const REPORT_INTERVAL: u64 = 120;

/// A renderer that counts what it is given instead of drawing it.
///
/// Stands in for the external rendering collaborator when the crate runs
/// headless.
#[derive(Default)]
struct BlockCountRenderer {
    frames: u64,
    visible: usize,
}

impl Renderer for BlockCountRenderer {
    fn render(&mut self, blocks: &HashSet<Block>) {
        self.frames += 1;
        self.visible = blocks.len();
    }
}

/// Runs the headless demo loop: streams the world around a wandering camera.
///
/// Initializes logging, loads [`config::SETTINGS_FILE`] if present, and then
/// ticks the game forever at roughly 60 Hz, turning the camera by small
/// random amounts while it walks forward. Chunk files accumulate in the save
/// directory exactly as they would under a real window, so this loop doubles
/// as a soak test for the persistence core.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let settings = WorldSettings::load(Path::new(config::SETTINGS_FILE));
    info!(
        "world seed {} | render distance {} + buffer {} | save dir {}",
        settings.seed,
        settings.render_distance,
        settings.buffer,
        settings.save_dir.display()
    );

    let mut state = GameState::new(&settings);
    let mut renderer = BlockCountRenderer::default();

    // Walk forward forever, steering with small random cursor nudges.
    state.on_key(KeyInput::MoveForward, true);
    let mut cursor_x = 0.0;
    state.on_cursor_move(cursor_x, 0.0);

    let mut last_frame = Instant::now();
    loop {
        let now = Instant::now();
        let dt = now - last_frame;
        last_frame = now;

        cursor_x += (fastrand::f64() - 0.5) * 30.0;
        state.on_cursor_move(cursor_x, 0.0);

        let report = state.tick(dt, &mut renderer);
        if renderer.frames % REPORT_INTERVAL == 0 {
            info!(
                "chunk {} | {} blocks visible | {} chunks cached | {} ungenerated in reach",
                state.player_chunk(),
                renderer.visible,
                state.streamer.cached_chunks(),
                report.missing
            );
        }

        thread::sleep(FRAME_INTERVAL);
    }
}
