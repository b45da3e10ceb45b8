//! Engine services consumed by gameplay scripts
//!
//! Scripts never reach into the engine directly. Everything they need
//! (transforms, sprites, audio, effects, time scale, scenes, timers) goes
//! through the [`Host`] trait, so any runtime that implements it can drive
//! them. [`crate::stage::Stage`] is the headless implementation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Handle to an object owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Identifies a timer among those scheduled by one object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Position and rotation of an object in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform2 {
    pub position: Vec2,
    /// Rotation in radians
    #[serde(default)]
    pub rotation: f32,
}

impl Transform2 {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }
}

/// Sprite asset reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sprite(pub String);

/// Audio clip reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sound(pub String);

/// Transient visual effect prefab reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Effect(pub String);

/// Which clock a delay is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clock {
    /// Simulated time, multiplied by the current time scale
    Scaled,
    /// Wall-clock time, unaffected by the time scale
    Realtime,
}

/// A delay before a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delay {
    pub seconds: f32,
    pub clock: Clock,
}

impl Delay {
    pub fn scaled(seconds: f32) -> Self {
        Self {
            seconds,
            clock: Clock::Scaled,
        }
    }

    pub fn realtime(seconds: f32) -> Self {
        Self {
            seconds,
            clock: Clock::Realtime,
        }
    }
}

/// Engine services available to scripts
///
/// Calls referring to an object that no longer exists are no-ops (getters
/// return `None`). Implementations decide what an out-of-range scene index
/// means.
pub trait Host {
    /// Current transform of an object, `None` once it has been removed
    fn transform(&self, id: ObjectId) -> Option<Transform2>;

    fn set_position(&mut self, id: ObjectId, position: Vec2);

    /// Swap the sprite an object is rendered with
    fn set_sprite(&mut self, id: ObjectId, sprite: &Sprite);

    /// Display name, for diagnostics
    fn object_name(&self, id: ObjectId) -> String;

    /// Remove an object from the world immediately
    fn despawn(&mut self, id: ObjectId);

    /// Remove an object after `seconds` of scaled time
    fn despawn_after(&mut self, id: ObjectId, seconds: f32);

    /// Instantiate a transient effect object
    fn spawn_effect(&mut self, effect: &Effect, at: Transform2) -> ObjectId;

    /// Fire-and-forget playback of a clip at a world position
    fn play_clip_at_point(&mut self, sound: &Sound, position: Vec2);

    fn camera_position(&self) -> Vec2;

    /// Pointer position in viewport pixels
    fn pointer_position(&self) -> Vec2;

    /// Viewport size in pixels
    fn viewport_size(&self) -> Vec2;

    fn time_scale(&self) -> f32;

    fn set_time_scale(&mut self, scale: f32);

    fn active_scene_index(&self) -> usize;

    fn load_scene(&mut self, index: usize);

    /// Deliver `Script::on_timer(timer)` to `owner` once `delay` has elapsed
    fn schedule(&mut self, owner: ObjectId, delay: Delay, timer: TimerId);
}
