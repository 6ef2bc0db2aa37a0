//! # Voxel Sandbox Entry Point
//!
//! Starts the headless demo loop. The windowed build lives in a separate
//! front end that drives the same library through its `InputSink` and
//! `Renderer` seams.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxel_sandbox::run();
}
