//! Audio event routing
//!
//! The core emits discrete [`GameEvent`]s; this module maps them to sound
//! effects and hands them to whatever [`AudioSink`] the platform provides.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Fruit cut in half
    Slice,
    /// Bomb cut
    Bomb,
    /// Power-up started
    PowerUp,
    /// Health ran out
    GameOver,
}

impl SoundEffect {
    /// The effect for a core event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::FruitSliced { .. } => Some(SoundEffect::Slice),
            GameEvent::BombSliced { .. } => Some(SoundEffect::Bomb),
            GameEvent::PowerUpActivated(_) => Some(SoundEffect::PowerUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        }
    }

    /// Asset name the platform player should look up
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Slice => "slice.wav",
            SoundEffect::Bomb => "bomb.wav",
            SoundEffect::PowerUp => "powerup.wav",
            SoundEffect::GameOver => "gameover.wav",
        }
    }
}

/// Something that can actually make noise
pub trait AudioSink: Send {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("Sound: {} at {:.2}", effect.asset_name(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Play the sounds for a batch of core events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}
