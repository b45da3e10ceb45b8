//! Arcade Scripts native entry point
//!
//! Runs headless sessions on the `Stage`: a brick-breaker level followed by
//! a level-exit sequence. Without `auto_play` the demo steers the paddle by
//! moving the pointer under the ball.
//!
//! Usage: `arcade-scripts [config.json] [layout.json]`

use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use arcade_scripts::consts::*;
use arcade_scripts::sim::{
    Host, Level, LevelExitTrigger, ObjectId, PaddleController, SharedLevel,
    SharedScore, Transform2,
};
use arcade_scripts::{GameConfig, LevelLayout, Stage};

/// Give up on a level after this many frames (5 minutes at 60 Hz)
const MAX_FRAMES: u32 = 60 * 60 * 5;
const BALL_RADIUS: f32 = 0.2;
const BALL_SPEED: f32 = 9.0;
const PADDLE_Y: f32 = 0.5;
const DEMO_SEED: u64 = 0x5EED;

/// Ball moved by the demo loop (no physics engine here)
struct DemoBall {
    id: ObjectId,
    pos: Vec2,
    vel: Vec2,
}

impl DemoBall {
    fn launch(id: ObjectId, rng: &mut Pcg32) -> Self {
        let angle = rng.random_range(0.35f32..0.65) * std::f32::consts::PI;
        Self {
            id,
            pos: Vec2::new(SCREEN_WIDTH_IN_UNITS / 2.0, PADDLE_Y + 0.5),
            vel: Vec2::new(angle.cos(), angle.sin()) * BALL_SPEED,
        }
    }

    /// Move and bounce off the walls and the paddle line
    fn step(&mut self, dt: f32, paddle_x: f32, rng: &mut Pcg32) {
        self.pos += self.vel * dt;

        if self.pos.x < BALL_RADIUS || self.pos.x > SCREEN_WIDTH_IN_UNITS - BALL_RADIUS {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.clamp(BALL_RADIUS, SCREEN_WIDTH_IN_UNITS - BALL_RADIUS);
        }
        if self.pos.y > SCREEN_HEIGHT_IN_UNITS - BALL_RADIUS {
            self.vel.y = -self.vel.y.abs();
        }
        if self.pos.y < PADDLE_Y + BALL_RADIUS && self.vel.y < 0.0 {
            if (self.pos.x - paddle_x).abs() <= PADDLE_HALF_WIDTH + BALL_RADIUS {
                // Small random tweak so the ball doesn't lock into a loop
                let tweak = rng.random_range(-0.3f32..0.3);
                self.vel = Vec2::new(self.vel.x + tweak, -self.vel.y).normalize() * BALL_SPEED;
            } else {
                log::info!("Ball missed the paddle, relaunching");
                self.pos = Vec2::new(paddle_x, PADDLE_Y + 0.5);
                self.vel.y = self.vel.y.abs();
            }
        }
    }

    fn overlaps(&self, center: Vec2, size: Vec2) -> bool {
        let half = size / 2.0 + Vec2::splat(BALL_RADIUS);
        let d = (self.pos - center).abs();
        d.x <= half.x && d.y <= half.y
    }
}

fn run_block_breaker(config: &GameConfig, layout: &LevelLayout) {
    let mut stage = Stage::new();
    let level = Level::shared();
    let status = config.game_status();
    let shared_level: SharedLevel = level.clone();
    let shared_status: SharedScore = status.clone();

    let mut rng = Pcg32::seed_from_u64(DEMO_SEED);
    let ball_id = stage.spawn("Ball", Transform2::default(), None);
    let mut ball = DemoBall::launch(ball_id, &mut rng);
    stage.host().set_position(ball.id, ball.pos);

    let paddle = stage.spawn("Paddle", Transform2::at(Vec2::new(8.0, PADDLE_Y)), None);
    stage.attach(
        paddle,
        PaddleController::new(config.paddle, ball.id, shared_status.clone()),
    );

    let blocks: Vec<(ObjectId, Vec2)> = stage
        .spawn_layout(layout, &shared_level, &shared_status, config.sparkles_lifetime_secs)
        .into_iter()
        .zip(layout.blocks.iter().map(|b| b.size))
        .collect();
    log::info!(
        "Block breaker: {} blocks, {} breakable, auto-play {}",
        blocks.len(),
        layout.breakable_count(),
        config.auto_play
    );

    let mut frames = 0;
    while frames < MAX_FRAMES {
        if !config.auto_play {
            let viewport = stage.world().viewport_size();
            let x = ball.pos.x / config.paddle.screen_width_in_units * viewport.x;
            stage.set_pointer(Vec2::new(x, 0.0));
        }
        stage.frame(SIM_DT);
        frames += 1;
        if level.borrow().is_cleared() {
            break;
        }

        let paddle_x = stage
            .world()
            .transform(paddle)
            .map(|t| t.position.x)
            .unwrap_or(SCREEN_WIDTH_IN_UNITS / 2.0);
        ball.step(SIM_DT, paddle_x, &mut rng);

        let hit = blocks
            .iter()
            .find(|(id, size)| {
                stage
                    .world()
                    .transform(*id)
                    .is_some_and(|t| ball.overlaps(t.position, *size))
            })
            .map(|&(id, _)| id);
        if let Some(block) = hit {
            ball.vel.y = -ball.vel.y;
            stage.collide(ball.id, block);
        }
        stage.host().set_position(ball.id, ball.pos);
    }

    let level = level.borrow();
    if level.is_cleared() {
        log::info!(
            "Level cleared in {} frames ({:.1}s), score {}",
            frames,
            stage.world().real_time(),
            status.borrow().score()
        );
    } else {
        log::warn!(
            "Gave up after {} frames: {} blocks left, score {}",
            frames,
            level.remaining(),
            status.borrow().score()
        );
    }
}

fn run_level_exit(config: &GameConfig) {
    let mut stage = Stage::new();
    stage.set_scenes(0, 3);
    let exit = stage.spawn("Level Exit", Transform2::at(Vec2::new(30.0, 2.0)), None);
    let player = stage.spawn("Player", Transform2::at(Vec2::new(30.0, 2.0)), None);
    stage.attach(exit, LevelExitTrigger::new(config.level_exit));

    stage.trigger_enter(exit, player);
    log::info!("Level exit entered, time scale {}", stage.world().time_scale());

    let mut frames = 0;
    while stage.world().scene_loads().is_empty() && frames < MAX_FRAMES {
        stage.frame(SIM_DT);
        frames += 1;
    }
    log::info!(
        "Scene {} after {:.2}s real time, time scale {}",
        stage.world().active_scene_index(),
        stage.world().real_time(),
        stage.world().time_scale()
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arcade Scripts (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = args
        .next()
        .map(|path| GameConfig::load(Path::new(&path)))
        .unwrap_or_default();
    let layout = match args.next() {
        Some(path) => match LevelLayout::load(Path::new(&path)) {
            Ok(layout) => layout,
            Err(e) => {
                log::error!("Failed to load layout {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => LevelLayout::classic(),
    };

    run_block_breaker(&config, &layout);
    run_level_exit(&config);
}
