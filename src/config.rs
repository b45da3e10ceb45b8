//! Game tuning and level layouts
//!
//! Both are plain JSON. Every tuning field has a default, so a config file
//! only needs the values it changes.

use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{POINTS_PER_BLOCK, SCREEN_WIDTH_IN_UNITS, SPARKLES_LIFETIME_SECS};
use crate::sim::{
    BlockConfig, Effect, GameStatus, LevelExitConfig, PaddleConfig, Sound, Sprite, Transform2,
};

/// Failure reading a config or layout file
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "read failed: {}", e),
            ConfigError::Parse(e) => write!(f, "invalid JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Brick-breaker ===
    pub paddle: PaddleConfig,
    /// Score awarded per destroyed block
    pub points_per_block: u64,
    /// Paddle tracks the ball instead of the pointer
    pub auto_play: bool,
    /// Scaled seconds before a destroyed block's sparkles are removed
    pub sparkles_lifetime_secs: f32,

    // === Platformer ===
    pub level_exit: LevelExitConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            paddle: PaddleConfig::default(),
            points_per_block: POINTS_PER_BLOCK,
            auto_play: false,
            sparkles_lifetime_secs: SPARKLES_LIFETIME_SECS,
            level_exit: LevelExitConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Fresh score tracker with this config's scoring and auto-play
    pub fn game_status(&self) -> Rc<RefCell<GameStatus>> {
        GameStatus::shared(self.points_per_block, self.auto_play)
    }

    /// Load from a file, falling back to defaults if it is missing or invalid
    pub fn load(path: &Path) -> Self {
        match read_json(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}

fn default_block_size() -> Vec2 {
    Vec2::new(1.0, 0.5)
}

/// A pre-placed block in a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedBlock {
    #[serde(default)]
    pub name: Option<String>,
    pub transform: Transform2,
    /// Initial appearance
    #[serde(default)]
    pub sprite: Option<Sprite>,
    /// Full width and height in world units
    #[serde(default = "default_block_size")]
    pub size: Vec2,
    #[serde(flatten)]
    pub block: BlockConfig,
}

/// Block placement for one brick-breaker level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelLayout {
    pub blocks: Vec<PlacedBlock>,
}

impl LevelLayout {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    /// Built-in level: a row of unbreakable blocks over three rows of
    /// breakable ones, toughest at the top
    pub fn classic() -> Self {
        let mut blocks = Vec::new();
        let columns = 7;
        let spacing = SCREEN_WIDTH_IN_UNITS / (columns as f32 + 1.0);

        for column in 0..columns {
            let x = spacing * (column as f32 + 1.0);

            if column % 3 == 0 {
                blocks.push(PlacedBlock {
                    name: Some(format!("Unbreakable {column}")),
                    transform: Transform2::at(Vec2::new(x, 7.0)),
                    sprite: Some(Sprite("block_steel".into())),
                    size: default_block_size(),
                    block: BlockConfig::unbreakable(),
                });
            }

            for (row, hits) in [(0usize, 0usize), (1, 1), (2, 2)] {
                let hit_sprites = (0..hits)
                    .map(|i| Some(Sprite(format!("block_cracked_{i}"))))
                    .collect();
                blocks.push(PlacedBlock {
                    name: Some(format!("Block {row}:{column}")),
                    transform: Transform2::at(Vec2::new(x, 8.0 + row as f32)),
                    sprite: Some(Sprite("block".into())),
                    size: default_block_size(),
                    block: BlockConfig {
                        hit_sprites,
                        break_sound: Some(Sound("break".into())),
                        sparkles: Some(Effect("block_sparkles".into())),
                        ..BlockConfig::breakable(Vec::new())
                    },
                });
            }
        }

        Self { blocks }
    }

    /// Blocks that count toward clearing the level
    pub fn breakable_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.block.category == crate::sim::BlockCategory::Breakable)
            .count()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
