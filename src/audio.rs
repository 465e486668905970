//! Side-effect ports consumed (not owned) by the core
//!
//! Sounds and screen shake are fire-and-forget: the host wires in
//! whatever backend it has, and the core never fails or blocks on it.

/// Sound effect kinds, by symbolic gameplay event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    Collision,
    Score,
    /// Distinct from `Score` so the two can play concurrently without
    /// cutting each other off
    LevelUp,
    ModeEnter,
    ModeExit,
}

/// Host-implemented effect sink. Default methods are no-ops, so a host
/// can implement only what it supports.
pub trait EffectSink {
    fn play_sound(&mut self, _effect: SoundEffect) {}
    fn trigger_shake(&mut self) {}
}

/// Sink that drops everything; the default for headless use
#[derive(Debug, Default)]
pub struct NullEffects;

impl EffectSink for NullEffects {}
