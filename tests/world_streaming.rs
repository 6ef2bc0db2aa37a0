//! End-to-end exercises of the streaming scheduler and the persistence core,
//! run against scratch save directories.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use cgmath::Point3;

use voxel_sandbox::config::WorldSettings;
use voxel_sandbox::game_state::{GameState, Renderer};
use voxel_sandbox::world::{
    Block, BlockType, ChunkCoord, ChunkStore, ChunkStreamer, TerrainGenerator,
};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "voxel-sandbox-it-{tag}-{}-{}",
        std::process::id(),
        fastrand::u32(..)
    ));
    fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

struct CountingRenderer {
    ticks: usize,
    last_visible: usize,
}

impl Renderer for CountingRenderer {
    fn render(&mut self, blocks: &HashSet<Block>) {
        self.ticks += 1;
        self.last_visible = blocks.len();
    }
}

#[test]
fn buffered_region_fills_at_one_chunk_per_tick() {
    let store = ChunkStore::new(scratch_dir("region"));
    let generator = TerrainGenerator::new(0, 5);
    let mut streamer = ChunkStreamer::new(3, 1);
    let origin = ChunkCoord::new(0, 0);

    // First tick: the whole 9x9 buffered region is missing and exactly one
    // chunk comes into existence.
    let first = streamer.tick(&store, &generator, origin);
    assert_eq!(first.missing, 81);
    assert!(first.generated.is_some());
    let on_disk = (-4..=4)
        .flat_map(|i| (-4..=4).map(move |j| ChunkCoord::new(i, j)))
        .filter(|&coord| store.exists(coord))
        .count();
    assert_eq!(on_disk, 1);

    // After 81 ticks every chunk of the buffered region exists on disk.
    for _ in 0..80 {
        streamer.tick(&store, &generator, origin);
    }
    for i in -4..=4 {
        for j in -4..=4 {
            assert!(
                store.exists(ChunkCoord::new(i, j)),
                "chunk ({i}, {j}) missing after 81 ticks"
            );
        }
    }
}

#[test]
fn world_and_chunk_coordinates_name_the_same_file() {
    // World (5, -20) lives in chunk (0, -2); both spellings must map to one
    // file, or placements would land in a different file than generation.
    assert_eq!(
        ChunkCoord::of_world(5, -20).file_name(),
        ChunkCoord::new(0, -2).file_name()
    );
}

#[test]
fn regeneration_reproduces_the_same_chunk_files() {
    let generator = TerrainGenerator::new(1234, 5);
    let coord = ChunkCoord::new(2, -2);

    let first = ChunkStore::new(scratch_dir("regen-a"));
    generator.generate_chunk(&first, coord).expect("generate");
    let second = ChunkStore::new(scratch_dir("regen-b"));
    generator.generate_chunk(&second, coord).expect("generate");

    let a = first.read_all(coord);
    let b = second.read_all(coord);
    assert!(!a.is_empty());
    assert_eq!(a.len(), b.len());
    for block in &a {
        let twin = b.get(block).expect("same position generated");
        assert_eq!(twin.block_type(), block.block_type());
    }
}

#[test]
fn game_loop_streams_renders_and_edits_one_world() {
    let settings = WorldSettings {
        save_dir: scratch_dir("game-loop"),
        render_distance: 1,
        buffer: 1,
        ..WorldSettings::default()
    };
    let mut state = GameState::new(&settings);
    let mut renderer = CountingRenderer {
        ticks: 0,
        last_visible: 0,
    };

    // 25 ticks generate the 5x5 buffered region; a few more let the cache
    // absorb the 3x3 visible region.
    for _ in 0..35 {
        state.tick(Duration::ZERO, &mut renderer);
    }
    assert_eq!(renderer.ticks, 35);
    assert!(renderer.last_visible > 0);
    assert!(state.streamer.cached_chunks() >= 9);

    // Place and remove a block well above the terrain, then confirm neither
    // the file nor the cache still knows about it.
    let position = Point3::new(2, 110, 2);
    let chunk = ChunkCoord::containing(position);
    let stone_before = state.inventory.block_count(BlockType::STONE);

    assert!(state.place_block(position));
    assert_eq!(
        state.inventory.block_count(BlockType::STONE),
        stone_before - 1
    );
    let probe = Block::new(position, BlockType::STONE);
    assert!(state.store.read_all(chunk).contains(&probe));
    assert_eq!(
        state
            .streamer
            .cached_block_at(position)
            .map(|b| b.block_type()),
        Some(BlockType::STONE)
    );

    assert!(state.remove_block(position));
    assert_eq!(state.inventory.block_count(BlockType::STONE), stone_before);
    assert!(!state.store.read_all(chunk).contains(&probe));
    assert_eq!(state.streamer.cached_block_at(position), None);

    // The next tick still renders the untouched terrain.
    state.tick(Duration::ZERO, &mut renderer);
    assert!(renderer.last_visible > 0);
}

#[test]
fn appending_twice_never_duplicates_a_record() {
    let store = ChunkStore::new(scratch_dir("double-append"));
    let coord = ChunkCoord::new(0, 0);
    let block = Block::new(Point3::new(8, 64, 8), BlockType::DIRT);

    assert!(store.append(coord, block).expect("first append"));
    assert!(!store.append(coord, block).expect("second append"));

    let decoded = store.read_all(coord);
    assert_eq!(decoded.len(), 1);
    let file = store.root().join(coord.file_name());
    assert_eq!(fs::metadata(file).expect("metadata").len(), 8);
}
