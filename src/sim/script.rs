//! Event handler interface implemented by gameplay components

use super::host::{Host, ObjectId, TimerId};

/// What a handler gets to work with: its own object and the host
pub struct Context<'a> {
    /// The object this script is attached to
    pub this: ObjectId,
    pub host: &'a mut dyn Host,
}

impl<'a> Context<'a> {
    pub fn new(this: ObjectId, host: &'a mut dyn Host) -> Self {
        Self { this, host }
    }
}

/// Lifecycle callbacks delivered by the host, one at a time
///
/// Every method defaults to doing nothing, so components only implement the
/// events they react to.
pub trait Script {
    /// Called once before the first event of any other kind
    fn on_init(&mut self, _cx: &mut Context<'_>) {}

    /// Called every frame with the scaled frame delta
    fn on_tick(&mut self, _cx: &mut Context<'_>, _dt: f32) {}

    fn on_collision(&mut self, _cx: &mut Context<'_>, _other: ObjectId) {}

    fn on_trigger_enter(&mut self, _cx: &mut Context<'_>, _other: ObjectId) {}

    /// A timer scheduled through [`Host::schedule`] came due
    fn on_timer(&mut self, _cx: &mut Context<'_>, _timer: TimerId) {}
}
