//! Audio triggers
//!
//! The simulation only names sounds and music; an [`AudioSink`] decides what
//! actually plays. The bundled [`LogAudio`] sink just logs the triggers.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Sonic wave fired
    Wave,
    /// Ship destroyed or player struck
    Explosion,
    /// Coin collected
    Coin,
    /// Ship fired a harpoon
    Harpoon,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Wave => "wave",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Coin => "coin",
            SoundEffect::Harpoon => "harpoon",
        }
    }
}

/// Background music states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    /// Ambient ocean loop while playing
    Normal,
    /// Game over theme
    GameOver,
}

impl MusicTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicTrack::Normal => "normal",
            MusicTrack::GameOver => "game-over",
        }
    }
}

/// Consumer of sound and music triggers
pub trait AudioSink {
    fn play_sound(&mut self, effect: SoundEffect);
    fn play_music(&mut self, track: MusicTrack);
}

/// Forward every audio trigger in `events` to the sink, in order
pub fn dispatch(sink: &mut impl AudioSink, events: &[GameEvent]) {
    for event in events {
        match *event {
            GameEvent::Sound(effect) => sink.play_sound(effect),
            GameEvent::Music(track) => sink.play_music(track),
            GameEvent::GameOver { .. } | GameEvent::Restarted => {}
        }
    }
}

/// Audio sink that logs triggers instead of playing them
#[derive(Debug, Clone)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_music: Option<MusicTrack>,
    sounds_played: u64,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new(0.8, 1.0, 0.7)
    }
}

impl LogAudio {
    pub fn new(master_volume: f32, sfx_volume: f32, music_volume: f32) -> Self {
        Self {
            master_volume: master_volume.clamp(0.0, 1.0),
            sfx_volume: sfx_volume.clamp(0.0, 1.0),
            music_volume: music_volume.clamp(0.0, 1.0),
            muted: false,
            current_music: None,
            sounds_played: 0,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Track currently looping, if any
    pub fn current_music(&self) -> Option<MusicTrack> {
        self.current_music
    }

    /// Sound effects that would have been audible
    pub fn sounds_played(&self) -> u64 {
        self.sounds_played
    }

    fn effective(&self, volume: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * volume
        }
    }
}

impl AudioSink for LogAudio {
    fn play_sound(&mut self, effect: SoundEffect) {
        let volume = self.effective(self.sfx_volume);
        if volume <= 0.0 {
            return;
        }
        self.sounds_played += 1;
        log::debug!("sfx {} at volume {:.2}", effect.as_str(), volume);
    }

    fn play_music(&mut self, track: MusicTrack) {
        if self.current_music == Some(track) {
            return;
        }
        self.current_music = Some(track);
        log::info!(
            "music -> {} at volume {:.2}",
            track.as_str(),
            self.effective(self.music_volume)
        );
    }
}
