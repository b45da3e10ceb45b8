//! Paddle horizontal position policy
//!
//! Each tick the paddle X is recomputed from scratch: the ball's X under
//! auto-play, otherwise the pointer's fraction of the viewport width mapped
//! onto the playfield. The result is clamped so the paddle never leaves the
//! screen. Y is never touched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::host::ObjectId;
use super::script::{Context, Script};
use super::trackers::SharedScore;
use crate::consts::{PADDLE_MAX_X, PADDLE_MIN_X, SCREEN_WIDTH_IN_UNITS};

/// Playfield mapping and clamp bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleConfig {
    /// World-space width of the visible playfield
    pub screen_width_in_units: f32,
    /// Leftmost paddle center (paddle is 2 units wide, pivot at center)
    pub min_x: f32,
    pub max_x: f32,
}

impl Default for PaddleConfig {
    fn default() -> Self {
        Self {
            screen_width_in_units: SCREEN_WIDTH_IN_UNITS,
            min_x: PADDLE_MIN_X,
            max_x: PADDLE_MAX_X,
        }
    }
}

/// Unclamped target X for this frame
pub fn target_x(
    auto_play: bool,
    ball_x: f32,
    pointer: Vec2,
    viewport: Vec2,
    screen_width_in_units: f32,
) -> f32 {
    if auto_play {
        ball_x
    } else if viewport.x > 0.0 {
        pointer.x / viewport.x * screen_width_in_units
    } else {
        0.0
    }
}

/// Clamp X into `[min_x, max_x]`
#[inline]
pub fn clamp_x(x: f32, min_x: f32, max_x: f32) -> f32 {
    // Not f32::clamp: that panics when min > max from bad config
    x.max(min_x).min(max_x)
}

/// Paddle script
pub struct PaddleController {
    config: PaddleConfig,
    ball: ObjectId,
    status: SharedScore,
}

impl PaddleController {
    pub fn new(config: PaddleConfig, ball: ObjectId, status: SharedScore) -> Self {
        if config.min_x > config.max_x {
            log::error!(
                "Paddle min_x {} exceeds max_x {}; paddle will pin to max_x",
                config.min_x,
                config.max_x
            );
        }
        Self {
            config,
            ball,
            status,
        }
    }

    pub fn config(&self) -> &PaddleConfig {
        &self.config
    }
}

impl Script for PaddleController {
    fn on_tick(&mut self, cx: &mut Context<'_>, _dt: f32) {
        let Some(paddle) = cx.host.transform(cx.this) else {
            return;
        };
        let auto_play = self.status.borrow().is_auto_play_enabled();

        let ball_x = if auto_play {
            match cx.host.transform(self.ball) {
                Some(ball) => ball.position.x,
                // Ball gone (between lives); hold position
                None => return,
            }
        } else {
            0.0
        };

        let raw = target_x(
            auto_play,
            ball_x,
            cx.host.pointer_position(),
            cx.host.viewport_size(),
            self.config.screen_width_in_units,
        );
        let x = clamp_x(raw, self.config.min_x, self.config.max_x);
        cx.host
            .set_position(cx.this, Vec2::new(x, paddle.position.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_pointer_midpoint_maps_to_center() {
        let raw = target_x(false, 0.0, Vec2::new(400.0, 10.0), VIEWPORT, 16.0);
        assert!((raw - 8.0).abs() < 1e-5);
        assert!((clamp_x(raw, 1.0, 15.0) - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_auto_play_follows_ball() {
        let raw = target_x(true, 4.25, Vec2::new(800.0, 0.0), VIEWPORT, 16.0);
        assert_eq!(raw, 4.25);
    }

    #[test]
    fn test_clamps_to_bounds() {
        assert_eq!(clamp_x(-3.0, 1.0, 15.0), 1.0);
        assert_eq!(clamp_x(99.0, 1.0, 15.0), 15.0);
    }

    #[test]
    fn test_zero_viewport_does_not_produce_nan() {
        let raw = target_x(false, 0.0, Vec2::new(100.0, 0.0), Vec2::ZERO, 16.0);
        assert_eq!(clamp_x(raw, 1.0, 15.0), 1.0);
    }

    #[test]
    fn test_config_defaults() {
        let config: PaddleConfig = serde_json::from_str(r#"{"max_x": 20.0}"#).unwrap();
        assert_eq!(config.screen_width_in_units, 16.0);
        assert_eq!(config.min_x, 1.0);
        assert_eq!(config.max_x, 20.0);
    }

    proptest! {
        #[test]
        fn prop_clamped_x_stays_in_bounds(
            auto_play in any::<bool>(),
            ball_x in -1.0e6f32..1.0e6,
            pointer_x in -1.0e6f32..1.0e6,
            width in 1.0f32..4000.0,
        ) {
            let raw = target_x(auto_play, ball_x, Vec2::new(pointer_x, 0.0), Vec2::new(width, 600.0), 16.0);
            let x = clamp_x(raw, 1.0, 15.0);
            prop_assert!((1.0..=15.0).contains(&x));
        }

        #[test]
        fn prop_manual_mode_is_linear_in_pointer_fraction(fraction in 0.0f32..1.0) {
            let raw = target_x(false, 123.0, Vec2::new(fraction * 800.0, 0.0), VIEWPORT, 16.0);
            prop_assert!((raw - fraction * 16.0).abs() < 1e-3);
        }
    }
}
