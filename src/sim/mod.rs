//! Gameplay scripts
//!
//! Everything here is engine-agnostic:
//! - Scripts react to events delivered one at a time through [`Script`]
//! - Engine services are reached only through [`Host`]
//! - Shared trackers are injected at construction, never looked up

pub mod block;
pub mod host;
pub mod level_exit;
pub mod paddle;
pub mod script;
pub mod timer;
pub mod trackers;

pub use block::{Block, BlockCategory, BlockConfig, BlockState, HitOutcome};
pub use host::{Clock, Delay, Effect, Host, ObjectId, Sound, Sprite, TimerId, Transform2};
pub use level_exit::{ExitPhase, LevelExitConfig, LevelExitTrigger};
pub use paddle::{PaddleConfig, PaddleController, clamp_x, target_x};
pub use script::{Context, Script};
pub use timer::Timers;
pub use trackers::{GameStatus, Level, LevelProgress, ScoreTracker, SharedLevel, SharedScore};
