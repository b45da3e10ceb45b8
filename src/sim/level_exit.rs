//! Platformer level exit
//!
//! Entering the exit drops the game into slow motion, waits a fixed amount
//! of wall-clock time, restores normal speed and loads the next scene.

use serde::{Deserialize, Serialize};

use super::host::{Delay, ObjectId, TimerId};
use super::script::{Context, Script};
use crate::consts::{EXIT_DELAY_SECS, EXIT_SLOW_MOTION_SCALE, NORMAL_TIME_SCALE};

const LOAD_NEXT_LEVEL: TimerId = TimerId(0);

/// Slow-motion transition settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelExitConfig {
    /// Time scale while the exit sequence runs
    pub slow_motion_scale: f32,
    /// Real-time seconds before the next scene loads
    pub delay_secs: f32,
}

impl Default for LevelExitConfig {
    fn default() -> Self {
        Self {
            slow_motion_scale: EXIT_SLOW_MOTION_SCALE,
            delay_secs: EXIT_DELAY_SECS,
        }
    }
}

/// Where the exit sequence is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExitPhase {
    #[default]
    Idle,
    /// Slowed down, waiting for the real-time delay
    SlowMotion,
    Finished,
}

/// Level exit trigger script
#[derive(Debug, Clone, Default)]
pub struct LevelExitTrigger {
    config: LevelExitConfig,
    phase: ExitPhase,
}

impl LevelExitTrigger {
    pub fn new(config: LevelExitConfig) -> Self {
        Self {
            config,
            phase: ExitPhase::Idle,
        }
    }

    pub fn phase(&self) -> ExitPhase {
        self.phase
    }
}

impl Script for LevelExitTrigger {
    fn on_trigger_enter(&mut self, cx: &mut Context<'_>, other: ObjectId) {
        if self.phase != ExitPhase::Idle {
            log::debug!("Exit re-entered by {:?} during {:?}, ignoring", other, self.phase);
            return;
        }

        cx.host.set_time_scale(self.config.slow_motion_scale);
        cx.host.schedule(
            cx.this,
            Delay::realtime(self.config.delay_secs),
            LOAD_NEXT_LEVEL,
        );
        self.phase = ExitPhase::SlowMotion;
    }

    fn on_timer(&mut self, cx: &mut Context<'_>, timer: TimerId) {
        if timer != LOAD_NEXT_LEVEL || self.phase != ExitPhase::SlowMotion {
            return;
        }

        cx.host.set_time_scale(NORMAL_TIME_SCALE);
        let next = cx.host.active_scene_index() + 1;
        log::info!("Level exit reached, loading scene {}", next);
        cx.host.load_scene(next);
        self.phase = ExitPhase::Finished;
    }
}
