//! Headless host runtime
//!
//! `Stage` owns scene objects and the scripts attached to them, and delivers
//! events one at a time on the calling thread. It implements every engine
//! service scripts can ask for, but renders nothing and mixes no audio:
//! sprite swaps, played clips and scene loads are recorded so callers can
//! inspect them. There is no physics either; collisions and trigger entries
//! are injected with [`Stage::collide`] and [`Stage::trigger_enter`].
//!
//! Frame order:
//! 1. `on_init` for scripts that have not started yet
//! 2. timers advance (real-time by the real delta, scaled by the scaled
//!    delta) and due timers fire in scheduling order
//! 3. `on_tick(scaled_dt)` for every live script, in attach order

use glam::Vec2;

use crate::config::LevelLayout;
use crate::consts::{NORMAL_TIME_SCALE, SCREEN_HEIGHT_IN_UNITS, SCREEN_WIDTH_IN_UNITS};
use crate::sim::{
    Block, Context, Delay, Effect, Host, ObjectId, Script, SharedLevel, SharedScore, Sound,
    Sprite, TimerId, Timers, Transform2,
};

/// An object in the scene
#[derive(Debug, Clone)]
struct SceneObject {
    name: String,
    transform: Transform2,
    sprite: Option<Sprite>,
    alive: bool,
}

/// A clip played through [`Host::play_clip_at_point`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedClip {
    pub sound: Sound,
    pub position: Vec2,
}

/// What a due timer means
#[derive(Debug, Clone, Copy)]
enum Due {
    Script(TimerId),
    Despawn,
}

/// Host state that scripts see through [`Host`]
#[derive(Debug)]
pub struct World {
    objects: Vec<SceneObject>,
    camera: Vec2,
    pointer: Vec2,
    viewport: Vec2,
    time_scale: f32,
    scene_index: usize,
    /// `None` means any index loads
    scene_count: Option<usize>,
    scene_loads: Vec<usize>,
    played: Vec<PlayedClip>,
    timers: Timers<Due>,
    real_time: f64,
}

impl Default for World {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            camera: Vec2::new(SCREEN_WIDTH_IN_UNITS / 2.0, SCREEN_HEIGHT_IN_UNITS / 2.0),
            pointer: Vec2::ZERO,
            viewport: Vec2::new(800.0, 600.0),
            time_scale: NORMAL_TIME_SCALE,
            scene_index: 0,
            scene_count: None,
            scene_loads: Vec::new(),
            played: Vec::new(),
            timers: Timers::new(),
            real_time: 0.0,
        }
    }
}

impl World {
    fn live(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0 as usize).filter(|o| o.alive)
    }

    fn live_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        let object = self.objects.get_mut(id.0 as usize).filter(|o| o.alive);
        if object.is_none() {
            log::warn!("{:?} does not exist", id);
        }
        object
    }

    fn spawn(&mut self, name: String, transform: Transform2, sprite: Option<Sprite>) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(SceneObject {
            name,
            transform,
            sprite,
            alive: true,
        });
        id
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.live(id).is_some()
    }

    pub fn sprite(&self, id: ObjectId) -> Option<&Sprite> {
        self.live(id).and_then(|o| o.sprite.as_ref())
    }

    /// Live objects with the given name
    pub fn find_by_name(&self, name: &str) -> Vec<ObjectId> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.alive && o.name == name)
            .map(|(i, _)| ObjectId(i as u32))
            .collect()
    }

    pub fn played_clips(&self) -> &[PlayedClip] {
        &self.played
    }

    /// Every scene index successfully loaded, in order
    pub fn scene_loads(&self) -> &[usize] {
        &self.scene_loads
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Wall-clock seconds simulated so far
    pub fn real_time(&self) -> f64 {
        self.real_time
    }
}

impl Host for World {
    fn transform(&self, id: ObjectId) -> Option<Transform2> {
        self.live(id).map(|o| o.transform)
    }

    fn set_position(&mut self, id: ObjectId, position: Vec2) {
        if let Some(object) = self.live_mut(id) {
            object.transform.position = position;
        }
    }

    fn set_sprite(&mut self, id: ObjectId, sprite: &Sprite) {
        if let Some(object) = self.live_mut(id) {
            object.sprite = Some(sprite.clone());
        }
    }

    fn object_name(&self, id: ObjectId) -> String {
        match self.objects.get(id.0 as usize) {
            Some(object) => object.name.clone(),
            None => format!("{:?}", id),
        }
    }

    fn despawn(&mut self, id: ObjectId) {
        if let Some(object) = self.live_mut(id) {
            object.alive = false;
            // Script callbacks already scheduled still fire
            self.timers.cancel_where(id, |due| matches!(due, Due::Despawn));
        }
    }

    fn despawn_after(&mut self, id: ObjectId, seconds: f32) {
        if self.is_alive(id) {
            self.timers.schedule(id, Delay::scaled(seconds), Due::Despawn);
        }
    }

    fn spawn_effect(&mut self, effect: &Effect, at: Transform2) -> ObjectId {
        self.spawn(effect.0.clone(), at, None)
    }

    fn play_clip_at_point(&mut self, sound: &Sound, position: Vec2) {
        self.played.push(PlayedClip {
            sound: sound.clone(),
            position,
        });
    }

    fn camera_position(&self) -> Vec2 {
        self.camera
    }

    fn pointer_position(&self) -> Vec2 {
        self.pointer
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn time_scale(&self) -> f32 {
        self.time_scale
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    fn active_scene_index(&self) -> usize {
        self.scene_index
    }

    fn load_scene(&mut self, index: usize) {
        if let Some(count) = self.scene_count {
            if index >= count {
                log::error!(
                    "Scene {} out of range ({} scenes), staying on {}",
                    index,
                    count,
                    self.scene_index
                );
                return;
            }
        }
        log::info!("Loading scene {}", index);
        self.scene_index = index;
        self.scene_loads.push(index);
    }

    fn schedule(&mut self, owner: ObjectId, delay: Delay, timer: TimerId) {
        if self.is_alive(owner) {
            self.timers.schedule(owner, delay, Due::Script(timer));
        } else {
            log::warn!("Timer {:?} scheduled by missing {:?}", timer, owner);
        }
    }
}

/// A script bound to an object
struct Attached {
    object: ObjectId,
    script: Box<dyn Script>,
    started: bool,
}

/// Headless scene: objects, scripts and the event loop
#[derive(Default)]
pub struct Stage {
    world: World,
    scripts: Vec<Attached>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct host access, as a script would have
    pub fn host(&mut self) -> &mut dyn Host {
        &mut self.world
    }

    pub fn spawn(&mut self, name: &str, transform: Transform2, sprite: Option<Sprite>) -> ObjectId {
        self.world.spawn(name.to_string(), transform, sprite)
    }

    /// Attach a script; it starts on the next event delivery
    pub fn attach(&mut self, object: ObjectId, script: impl Script + 'static) {
        self.scripts.push(Attached {
            object,
            script: Box::new(script),
            started: false,
        });
    }

    /// Spawn a block script for every placed block in a layout
    pub fn spawn_layout(
        &mut self,
        layout: &LevelLayout,
        level: &SharedLevel,
        status: &SharedScore,
        sparkles_lifetime_secs: f32,
    ) -> Vec<ObjectId> {
        layout
            .blocks
            .iter()
            .enumerate()
            .map(|(i, placed)| {
                let name = placed.name.clone().unwrap_or_else(|| format!("Block {i}"));
                let id = self.world.spawn(name, placed.transform, placed.sprite.clone());
                let block = Block::new(placed.block.clone(), level.clone(), status.clone())
                    .with_sparkles_lifetime(sparkles_lifetime_secs);
                self.attach(id, block);
                id
            })
            .collect()
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.world.pointer = pointer;
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.world.viewport = viewport;
    }

    pub fn set_camera(&mut self, camera: Vec2) {
        self.world.camera = camera;
    }

    /// Set the active scene and how many scenes exist
    pub fn set_scenes(&mut self, active: usize, count: usize) {
        self.world.scene_index = active;
        self.world.scene_count = Some(count);
    }

    /// Run `on_init` for every script that has not started
    pub fn start_pending(&mut self) {
        for attached in self.scripts.iter_mut().filter(|a| !a.started) {
            attached.started = true;
            if !self.world.is_alive(attached.object) {
                continue;
            }
            let mut cx = Context::new(attached.object, &mut self.world);
            attached.script.on_init(&mut cx);
        }
        self.prune();
    }

    /// Advance one frame by `real_dt` wall-clock seconds
    pub fn frame(&mut self, real_dt: f32) {
        self.start_pending();

        let real_dt = real_dt.max(0.0);
        let scaled_dt = real_dt * self.world.time_scale;
        self.world.real_time += real_dt as f64;

        for (owner, due) in self.world.timers.advance(real_dt, scaled_dt) {
            match due {
                Due::Despawn => {
                    if self.world.is_alive(owner) {
                        self.world.despawn(owner);
                    }
                }
                Due::Script(timer) => self.deliver_timer(owner, timer),
            }
        }

        for attached in self.scripts.iter_mut() {
            if !self.world.is_alive(attached.object) {
                continue;
            }
            let mut cx = Context::new(attached.object, &mut self.world);
            attached.script.on_tick(&mut cx, scaled_dt);
        }
        self.prune();
    }

    /// Deliver a collision to the scripts of both objects
    pub fn collide(&mut self, a: ObjectId, b: ObjectId) {
        self.dispatch(a, |script, cx| script.on_collision(cx, b));
        self.dispatch(b, |script, cx| script.on_collision(cx, a));
    }

    /// Deliver a trigger entry to the scripts of `trigger`
    pub fn trigger_enter(&mut self, trigger: ObjectId, other: ObjectId) {
        self.dispatch(trigger, |script, cx| script.on_trigger_enter(cx, other));
    }

    fn dispatch(&mut self, object: ObjectId, mut event: impl FnMut(&mut dyn Script, &mut Context<'_>)) {
        self.start_pending();
        for attached in self.scripts.iter_mut().filter(|a| a.object == object) {
            if !self.world.is_alive(object) {
                break;
            }
            let mut cx = Context::new(object, &mut self.world);
            event(attached.script.as_mut(), &mut cx);
        }
        self.prune();
    }

    /// Timers reach their scripts even after the object is removed
    fn deliver_timer(&mut self, owner: ObjectId, timer: TimerId) {
        for attached in self.scripts.iter_mut().filter(|a| a.object == owner) {
            let mut cx = Context::new(owner, &mut self.world);
            attached.script.on_timer(&mut cx, timer);
        }
    }

    /// Drop scripts whose object is gone and that have no timer left to
    /// hear; they never receive another event
    fn prune(&mut self) {
        let world = &self.world;
        self.scripts
            .retain(|a| world.is_alive(a.object) || world.timers.has_pending(a.object));
    }
}
