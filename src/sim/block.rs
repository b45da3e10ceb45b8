//! Brick-breaker block: hit counting and destruction
//!
//! A breakable block with `N` hit sprites takes `N + 1` hits. Each surviving
//! hit swaps in the next damage sprite; the final hit scores, plays the
//! break sound, removes the block, tells the level and leaves a short-lived
//! sparkle effect behind.

use serde::{Deserialize, Serialize};

use super::host::{Effect, ObjectId, Sound, Sprite, Transform2};
use super::script::{Context, Script};
use super::trackers::{SharedLevel, SharedScore};
use crate::consts::SPARKLES_LIFETIME_SECS;

/// Whether collisions wear a block down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockCategory {
    #[default]
    Breakable,
    /// Never counts toward level progress, never breaks
    Unbreakable,
}

/// Author-time configuration of a block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockConfig {
    #[serde(default)]
    pub category: BlockCategory,
    /// Damage sprites in hit order. `None` marks a slot left unset.
    #[serde(default)]
    pub hit_sprites: Vec<Option<Sprite>>,
    #[serde(default)]
    pub break_sound: Option<Sound>,
    #[serde(default)]
    pub sparkles: Option<Effect>,
}

impl BlockConfig {
    pub fn breakable(hit_sprites: Vec<Option<Sprite>>) -> Self {
        Self {
            category: BlockCategory::Breakable,
            hit_sprites,
            break_sound: None,
            sparkles: None,
        }
    }

    pub fn unbreakable() -> Self {
        Self {
            category: BlockCategory::Unbreakable,
            ..Default::default()
        }
    }

    /// Hits needed to destroy the block
    pub fn max_hits(&self) -> u32 {
        self.hit_sprites.len() as u32 + 1
    }
}

/// Hit-progression state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    Intact { times_hit: u32 },
    Destroyed,
}

/// Result of registering one collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Unbreakable, or already destroyed
    Ignored,
    /// Survived; show `hit_sprites[sprite_index]`
    Damaged { times_hit: u32, sprite_index: usize },
    /// This hit reached the maximum
    Destroyed,
}

/// A block script
pub struct Block {
    config: BlockConfig,
    state: BlockState,
    /// Scaled seconds the sparkle effect lives
    sparkles_lifetime: f32,
    level: SharedLevel,
    score: SharedScore,
}

impl Block {
    pub fn new(config: BlockConfig, level: SharedLevel, score: SharedScore) -> Self {
        Self {
            config,
            state: BlockState::Intact { times_hit: 0 },
            sparkles_lifetime: SPARKLES_LIFETIME_SECS,
            level,
            score,
        }
    }

    pub fn with_sparkles_lifetime(mut self, seconds: f32) -> Self {
        self.sparkles_lifetime = seconds;
        self
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    pub fn is_breakable(&self) -> bool {
        self.config.category == BlockCategory::Breakable
    }

    /// Advance the hit counter without touching the world
    pub fn register_hit(&mut self) -> HitOutcome {
        if !self.is_breakable() {
            return HitOutcome::Ignored;
        }
        let BlockState::Intact { times_hit } = self.state else {
            return HitOutcome::Ignored;
        };

        let times_hit = times_hit + 1;
        if times_hit >= self.config.max_hits() {
            self.state = BlockState::Destroyed;
            HitOutcome::Destroyed
        } else {
            self.state = BlockState::Intact { times_hit };
            HitOutcome::Damaged {
                times_hit,
                sprite_index: (times_hit - 1) as usize,
            }
        }
    }

    fn show_hit_sprite(&self, cx: &mut Context<'_>, sprite_index: usize) {
        match self.config.hit_sprites.get(sprite_index).and_then(Option::as_ref) {
            Some(sprite) => cx.host.set_sprite(cx.this, sprite),
            None => log::error!(
                "Block sprite is missing from hit sprites at index {} ({})",
                sprite_index,
                cx.host.object_name(cx.this)
            ),
        }
    }

    fn destroy(&self, cx: &mut Context<'_>) {
        // Capture before removal; the host forgets the transform on despawn
        let last_transform = cx.host.transform(cx.this).unwrap_or_default();

        self.score.borrow_mut().increment_score();

        match &self.config.break_sound {
            Some(sound) => {
                let camera = cx.host.camera_position();
                cx.host.play_clip_at_point(sound, camera);
            }
            None => log::debug!("No break sound on {}", cx.host.object_name(cx.this)),
        }

        cx.host.despawn(cx.this);
        self.level.borrow_mut().notify_block_destroyed();
        self.spawn_sparkles(cx, last_transform);
    }

    fn spawn_sparkles(&self, cx: &mut Context<'_>, at: Transform2) {
        let Some(effect) = &self.config.sparkles else {
            log::debug!("No sparkles effect configured, skipping");
            return;
        };
        let sparkles = cx.host.spawn_effect(effect, at);
        cx.host.despawn_after(sparkles, self.sparkles_lifetime);
    }
}

impl Script for Block {
    fn on_init(&mut self, _cx: &mut Context<'_>) {
        if self.is_breakable() {
            self.level.borrow_mut().register_breakable_block();
        }
    }

    fn on_collision(&mut self, cx: &mut Context<'_>, _other: ObjectId) {
        match self.register_hit() {
            HitOutcome::Ignored => {}
            HitOutcome::Damaged { sprite_index, .. } => self.show_hit_sprite(cx, sprite_index),
            HitOutcome::Destroyed => self.destroy(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::trackers::{GameStatus, Level};

    fn sprites(n: usize) -> Vec<Option<Sprite>> {
        (0..n).map(|i| Some(Sprite(format!("hit_{i}")))).collect()
    }

    fn block(config: BlockConfig) -> Block {
        Block::new(config, Level::shared(), GameStatus::shared(1, false))
    }

    #[test]
    fn test_two_sprites_take_three_hits() {
        let mut b = block(BlockConfig::breakable(sprites(2)));
        assert_eq!(b.config().max_hits(), 3);

        assert_eq!(
            b.register_hit(),
            HitOutcome::Damaged {
                times_hit: 1,
                sprite_index: 0
            }
        );
        assert_eq!(
            b.register_hit(),
            HitOutcome::Damaged {
                times_hit: 2,
                sprite_index: 1
            }
        );
        assert_eq!(b.register_hit(), HitOutcome::Destroyed);
        assert_eq!(b.state(), BlockState::Destroyed);

        // Terminal
        assert_eq!(b.register_hit(), HitOutcome::Ignored);
    }

    #[test]
    fn test_no_sprites_breaks_on_first_hit() {
        let mut b = block(BlockConfig::breakable(Vec::new()));
        assert_eq!(b.register_hit(), HitOutcome::Destroyed);
    }

    #[test]
    fn test_unbreakable_never_transitions() {
        let mut b = block(BlockConfig::unbreakable());
        for _ in 0..10 {
            assert_eq!(b.register_hit(), HitOutcome::Ignored);
        }
        assert_eq!(b.state(), BlockState::Intact { times_hit: 0 });
    }

    #[test]
    fn test_n_sprites_need_n_plus_one_hits() {
        for n in 0..6 {
            let mut b = block(BlockConfig::breakable(sprites(n)));
            for _ in 0..n {
                assert!(matches!(b.register_hit(), HitOutcome::Damaged { .. }));
            }
            assert_eq!(b.register_hit(), HitOutcome::Destroyed);
        }
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "category": "Breakable",
            "hit_sprites": ["cracked", null],
            "break_sound": "break.wav"
        }"#;
        let config: BlockConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_hits(), 3);
        assert_eq!(config.hit_sprites[0], Some(Sprite("cracked".into())));
        assert_eq!(config.hit_sprites[1], None);
        assert_eq!(config.break_sound, Some(Sound("break.wav".into())));
        assert!(config.sparkles.is_none());
    }

    mod ordering {
        use std::cell::RefCell;
        use std::rc::Rc;

        use glam::Vec2;

        use super::*;
        use crate::sim::host::{Delay, Host, TimerId};
        use crate::sim::trackers::{LevelProgress, ScoreTracker};

        type Journal = Rc<RefCell<Vec<String>>>;

        struct Recorder(Journal);

        impl Recorder {
            fn note(&self, entry: impl Into<String>) {
                self.0.borrow_mut().push(entry.into());
            }
        }

        impl LevelProgress for Recorder {
            fn register_breakable_block(&mut self) {
                self.note("register");
            }
            fn notify_block_destroyed(&mut self) {
                self.note("level");
            }
        }

        impl ScoreTracker for Recorder {
            fn increment_score(&mut self) {
                self.note("score");
            }
            fn is_auto_play_enabled(&self) -> bool {
                false
            }
        }

        impl Host for Recorder {
            fn transform(&self, _id: ObjectId) -> Option<Transform2> {
                Some(Transform2 {
                    position: Vec2::new(2.0, 3.0),
                    rotation: 0.25,
                })
            }
            fn set_position(&mut self, _id: ObjectId, _position: Vec2) {}
            fn set_sprite(&mut self, _id: ObjectId, sprite: &Sprite) {
                self.note(format!("sprite {}", sprite.0));
            }
            fn object_name(&self, _id: ObjectId) -> String {
                "Block".into()
            }
            fn despawn(&mut self, _id: ObjectId) {
                self.note("despawn");
            }
            fn despawn_after(&mut self, id: ObjectId, seconds: f32) {
                self.note(format!("despawn {:?} after {}", id, seconds));
            }
            fn spawn_effect(&mut self, effect: &Effect, at: Transform2) -> ObjectId {
                self.note(format!("effect {} at {} {}", effect.0, at.position, at.rotation));
                ObjectId(42)
            }
            fn play_clip_at_point(&mut self, sound: &Sound, position: Vec2) {
                self.note(format!("sound {} at {}", sound.0, position));
            }
            fn camera_position(&self) -> Vec2 {
                Vec2::new(8.0, 6.0)
            }
            fn pointer_position(&self) -> Vec2 {
                Vec2::ZERO
            }
            fn viewport_size(&self) -> Vec2 {
                Vec2::ONE
            }
            fn time_scale(&self) -> f32 {
                1.0
            }
            fn set_time_scale(&mut self, _scale: f32) {}
            fn active_scene_index(&self) -> usize {
                0
            }
            fn load_scene(&mut self, _index: usize) {}
            fn schedule(&mut self, _owner: ObjectId, _delay: Delay, _timer: TimerId) {}
        }

        #[test]
        fn test_destruction_side_effects_in_order() {
            let journal: Journal = Rc::default();
            let mut host = Recorder(journal.clone());
            let mut block = Block::new(
                BlockConfig {
                    break_sound: Some(Sound("break".into())),
                    sparkles: Some(Effect("sparkles".into())),
                    ..BlockConfig::breakable(sprites(1))
                },
                Rc::new(RefCell::new(Recorder(journal.clone()))),
                Rc::new(RefCell::new(Recorder(journal.clone()))),
            );

            let mut cx = Context::new(ObjectId(7), &mut host);
            block.on_init(&mut cx);
            block.on_collision(&mut cx, ObjectId(1));
            block.on_collision(&mut cx, ObjectId(1));
            block.on_collision(&mut cx, ObjectId(1));

            assert_eq!(
                *journal.borrow(),
                vec![
                    "register",
                    "sprite hit_0",
                    "score",
                    "sound break at [8, 6]",
                    "despawn",
                    "level",
                    "effect sparkles at [2, 3] 0.25",
                    "despawn ObjectId(42) after 1",
                ]
            );
        }

        #[test]
        fn test_sparkles_use_configured_lifetime() {
            let journal: Journal = Rc::default();
            let mut host = Recorder(journal.clone());
            let mut block = Block::new(
                BlockConfig {
                    sparkles: Some(Effect("sparkles".into())),
                    ..BlockConfig::breakable(Vec::new())
                },
                Rc::new(RefCell::new(Recorder(journal.clone()))),
                Rc::new(RefCell::new(Recorder(journal.clone()))),
            )
            .with_sparkles_lifetime(2.5);

            let mut cx = Context::new(ObjectId(7), &mut host);
            block.on_collision(&mut cx, ObjectId(1));

            assert_eq!(
                journal.borrow().last().map(String::as_str),
                Some("despawn ObjectId(42) after 2.5")
            );
        }
    }
}
