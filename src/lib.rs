//! Arcade Scripts - gameplay logic for two small 2D arcade games
//!
//! Core modules:
//! - `sim`: Engine-agnostic gameplay scripts (blocks, paddle, level exit)
//!   and the `Host`/`Script` interfaces they talk through
//! - `stage`: Headless single-threaded host that drives scripts
//! - `config`: Data-driven tuning and level layouts

pub mod config;
pub mod sim;
pub mod stage;

pub use config::{ConfigError, GameConfig, LevelLayout, PlacedBlock};
pub use stage::Stage;

/// Game configuration constants
pub mod consts {
    /// Fixed frame step used by the native demo (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Camera size is 6 (12 units tall); at 4:3 the playfield is 16 wide
    pub const SCREEN_WIDTH_IN_UNITS: f32 = 16.0;
    pub const SCREEN_HEIGHT_IN_UNITS: f32 = 12.0;

    /// Paddle is 2 units wide with a centered pivot, so it stops 1 unit in
    pub const PADDLE_MIN_X: f32 = 1.0;
    pub const PADDLE_MAX_X: f32 = 15.0;
    pub const PADDLE_HALF_WIDTH: f32 = 1.0;

    /// Score awarded per destroyed block
    pub const POINTS_PER_BLOCK: u64 = 1;

    /// Sparkle effect lifetime (scaled seconds)
    pub const SPARKLES_LIFETIME_SECS: f32 = 1.0;

    /// Level exit slow motion
    pub const EXIT_SLOW_MOTION_SCALE: f32 = 0.2;
    pub const EXIT_DELAY_SECS: f32 = 2.0;
    pub const NORMAL_TIME_SCALE: f32 = 1.0;
}
