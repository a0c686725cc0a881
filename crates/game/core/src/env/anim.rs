//! Animation playback interface.

/// Fire-and-forget animation requests to the host's animation player.
///
/// Gameplay never waits for playback to finish; where a behavior needs an
/// "animation done" moment it runs its own phase timers instead.
pub trait AnimationSink {
    /// Requests playback of a named animation.
    fn play(&mut self, name: &str, looping: bool, speed: f32);
}

/// Sink that drops every request. Useful for enemies without a rig and for
/// unit tests that don't assert on animation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAnimations;

impl AnimationSink for NullAnimations {
    fn play(&mut self, _name: &str, _looping: bool, _speed: f32) {}
}
