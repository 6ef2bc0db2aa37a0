//! # Configuration
//!
//! World settings loaded from an optional JSON file. A missing or unreadable
//! settings file falls back to the defaults with a log line; configuration
//! problems never stop the game from starting.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

/// Default name of the settings file, looked up in the working directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Tunable parameters of a world.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Seed for the terrain noise. The same seed regenerates the same world.
    pub seed: u32,
    /// Radius in chunks of the region actively cached and drawn.
    pub render_distance: i32,
    /// Extra radius beyond the render distance that is pre-generated.
    pub buffer: i32,
    /// Terrain at or below this height becomes water.
    pub water_level: i32,
    /// Directory holding the chunk files of this world.
    pub save_dir: PathBuf,
    /// How many blocks of each type the player starts with.
    pub starting_blocks: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            seed: 0,
            render_distance: 3,
            buffer: 1,
            water_level: 5,
            save_dir: PathBuf::from("."),
            starting_blocks: 10,
        }
    }
}

impl WorldSettings {
    /// Loads settings from `path`, falling back to defaults when the file is
    /// absent or invalid.
    pub fn load(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(
                        "invalid settings in {}: {err}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Self::default(),
            Err(err) => {
                warn!("cannot read {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = WorldSettings::load(Path::new("definitely-not-here.json"));
        assert_eq!(settings.render_distance, 3);
        assert_eq!(settings.buffer, 1);
        assert_eq!(settings.save_dir, PathBuf::from("."));
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let dir = std::env::temp_dir().join(format!(
            "voxel-sandbox-settings-{}-{}",
            std::process::id(),
            fastrand::u32(..)
        ));
        fs::create_dir_all(&dir).expect("scratch dir");
        let path = dir.join(SETTINGS_FILE);
        fs::write(&path, r#"{ "seed": 99, "render_distance": 5 }"#).expect("write settings");

        let settings = WorldSettings::load(&path);
        assert_eq!(settings.seed, 99);
        assert_eq!(settings.render_distance, 5);
        assert_eq!(settings.water_level, 5);
    }
}
