//! Host configuration, asset loading and logging setup.
//!
//! Everything here runs once at startup, before the terminal is taken over,
//! so errors are reported with `anyhow` context and end the process.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::{Atlas, LevelDesc, Shading};
use crate::engine::LevelSource;

pub const DEFAULT_ATLAS: &str = "sprites/sprite-sheet.png";
pub const DEFAULT_SEED: u32 = 1;

/// Startup settings read from `LUNAR_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub atlas_path: PathBuf,
    pub level_file: Option<PathBuf>,
    pub seed: u32,
    pub shading: Shading,
    pub log_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            atlas_path: PathBuf::from(DEFAULT_ATLAS),
            level_file: None,
            seed: DEFAULT_SEED,
            shading: Shading::default(),
            log_path: None,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let defaults = Self::default();
        Self {
            atlas_path: non_empty("LUNAR_ATLAS").map_or(defaults.atlas_path, PathBuf::from),
            level_file: non_empty("LUNAR_LEVEL_FILE").map(PathBuf::from),
            seed: non_empty("LUNAR_SEED")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.seed),
            shading: non_empty("LUNAR_SHADING")
                .and_then(|s| Shading::from_str(&s))
                .unwrap_or(defaults.shading),
            log_path: non_empty("LUNAR_LOG_PATH").map(PathBuf::from),
        }
    }

    /// The configured level file, or seeded generation when none is set.
    pub fn level_source(&self) -> Result<LevelSource> {
        let Some(path) = &self.level_file else {
            return Ok(LevelSource::Generated(self.seed));
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading level file {}", path.display()))?;
        let desc = LevelDesc::from_json(&json)
            .with_context(|| format!("parsing level file {}", path.display()))?;
        Ok(LevelSource::Fixed(desc))
    }
}

/// Decode a PNG sprite sheet from disk.
pub fn load_atlas(path: &Path) -> Result<Atlas> {
    let bytes = fs::read(path).with_context(|| format!("reading sprite atlas {}", path.display()))?;
    decode_atlas(&bytes).with_context(|| format!("loading sprite atlas {}", path.display()))
}

/// Decode an in-memory image into an atlas (RGBA8, 1024 columns).
pub fn decode_atlas(bytes: &[u8]) -> Result<Atlas> {
    let image = image::load_from_memory(bytes)
        .context("decoding sprite atlas")?
        .to_rgba8();
    let (width, height) = image.dimensions();
    let atlas = Atlas::from_rgba8(width as usize, height as usize, image.as_raw())?;
    info!(width, height, "sprite atlas loaded");
    Ok(atlas)
}

/// Install the global `tracing` subscriber, writing to `log_path`.
///
/// The terminal is in the alternate screen while playing, so without a log
/// file nothing is installed. Filtering follows `RUST_LOG` (default `info`).
pub fn init_tracing(log_path: Option<&Path>) -> Result<()> {
    let Some(path) = log_path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))?;
    Ok(())
}
