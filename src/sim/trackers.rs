//! Shared level-progress and score trackers
//!
//! Components receive these as `Rc<RefCell<dyn ...>>` at construction time.
//! Everything runs on the single event thread, so `RefCell` is enough.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::POINTS_PER_BLOCK;

/// Counts the breakable blocks still standing in a level
pub trait LevelProgress {
    fn register_breakable_block(&mut self);
    fn notify_block_destroyed(&mut self);
}

/// Keeps the score and the global auto-play flag
pub trait ScoreTracker {
    fn increment_score(&mut self);
    fn is_auto_play_enabled(&self) -> bool;
}

/// Shared handle to a level-progress tracker
pub type SharedLevel = Rc<RefCell<dyn LevelProgress>>;
/// Shared handle to a score tracker
pub type SharedScore = Rc<RefCell<dyn ScoreTracker>>;

/// Remaining-block counter for one level instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    remaining: u32,
    registered: u32,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// True once every registered breakable block has been destroyed
    pub fn is_cleared(&self) -> bool {
        self.registered > 0 && self.remaining == 0
    }
}

impl LevelProgress for Level {
    fn register_breakable_block(&mut self) {
        self.remaining += 1;
        self.registered += 1;
    }

    fn notify_block_destroyed(&mut self) {
        if self.remaining == 0 {
            log::warn!("Block destroyed with no breakable blocks remaining");
            return;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            log::info!("Level cleared ({} blocks)", self.registered);
        }
    }
}

/// Score and auto-play state for a brick-breaker session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStatus {
    score: u64,
    points_per_block: u64,
    auto_play: bool,
}

impl Default for GameStatus {
    fn default() -> Self {
        Self {
            score: 0,
            points_per_block: POINTS_PER_BLOCK,
            auto_play: false,
        }
    }
}

impl GameStatus {
    pub fn new(points_per_block: u64, auto_play: bool) -> Self {
        Self {
            score: 0,
            points_per_block,
            auto_play,
        }
    }

    pub fn shared(points_per_block: u64, auto_play: bool) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(points_per_block, auto_play)))
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn points_per_block(&self) -> u64 {
        self.points_per_block
    }

    pub fn set_auto_play(&mut self, enabled: bool) {
        self.auto_play = enabled;
    }
}

impl ScoreTracker for GameStatus {
    fn increment_score(&mut self) {
        self.score = self.score.saturating_add(self.points_per_block);
    }

    fn is_auto_play_enabled(&self) -> bool {
        self.auto_play
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_counts_down_to_cleared() {
        let mut level = Level::new();
        assert!(!level.is_cleared());

        level.register_breakable_block();
        level.register_breakable_block();
        assert_eq!(level.remaining(), 2);

        level.notify_block_destroyed();
        assert!(!level.is_cleared());
        level.notify_block_destroyed();
        assert_eq!(level.remaining(), 0);
        assert!(level.is_cleared());
    }

    #[test]
    fn test_level_does_not_underflow() {
        let mut level = Level::new();
        level.notify_block_destroyed();
        assert_eq!(level.remaining(), 0);
        assert!(!level.is_cleared());
    }

    #[test]
    fn test_game_status_scoring() {
        let mut status = GameStatus::default();
        status.increment_score();
        assert_eq!(status.score(), 1);

        let mut status = GameStatus::new(83, true);
        status.increment_score();
        status.increment_score();
        assert_eq!(status.score(), 166);
        assert!(status.is_auto_play_enabled());
        status.set_auto_play(false);
        assert!(!status.is_auto_play_enabled());
    }

    #[test]
    fn test_shared_handles_coerce_to_traits() {
        let level = Level::shared();
        let as_trait: SharedLevel = level.clone();
        as_trait.borrow_mut().register_breakable_block();
        assert_eq!(level.borrow().remaining(), 1);

        let status = GameStatus::shared(1, false);
        let as_trait: SharedScore = status.clone();
        as_trait.borrow_mut().increment_score();
        assert_eq!(status.borrow().score(), 1);
    }
}
