//! Sound cues
//!
//! The simulation only emits [`GameEvent`]s; this module maps them to cues
//! and hands those to whatever [`AudioSink`] the frontend provides.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player leaves the ground
    Jump,
    /// Loose coin or coin block
    Coin,
    /// Exclamation block releases its key
    KeyDrop,
    /// Key picked up
    KeyCollect,
    /// Gate opens
    Unlock,
    /// Enemy contact or falling out
    Hurt,
    /// Flag reached
    LevelClear,
    /// Final flag reached
    Victory,
}

impl SoundEffect {
    /// Cue played once when `event` happens, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::CoinCollected | GameEvent::CoinBlockEmptied => Some(SoundEffect::Coin),
            GameEvent::KeyReleased { .. } => Some(SoundEffect::KeyDrop),
            GameEvent::KeyCollected { .. } => Some(SoundEffect::KeyCollect),
            GameEvent::LockOpened { .. } => Some(SoundEffect::Unlock),
            GameEvent::PlayerHit | GameEvent::FellOut => Some(SoundEffect::Hurt),
            GameEvent::LevelCompleted { .. } => Some(SoundEffect::LevelClear),
            GameEvent::GameBeaten => Some(SoundEffect::Victory),
            GameEvent::LevelLoaded { .. } => None,
        }
    }
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: u64,
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played += 1;
        log::debug!("Sound {:?} at volume {:.2}", effect, volume);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
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

    /// Play the cue of every event from the last tick, in order
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::sim::KeyColor;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push((effect, volume));
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::CoinBlockEmptied),
            Some(SoundEffect::Coin)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::KeyCollected {
                color: KeyColor::Red
            }),
            Some(SoundEffect::KeyCollect)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::FellOut),
            Some(SoundEffect::Hurt)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LevelLoaded { level: 2 }),
            None
        );
    }

    #[test]
    fn test_events_play_in_order_at_effective_volume() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.set_sfx_volume(0.5);
        audio.play_events(&[
            GameEvent::LevelLoaded { level: 1 },
            GameEvent::Jumped,
            GameEvent::CoinCollected,
        ]);
        let played = recorder.0.borrow().clone();
        assert_eq!(
            played,
            vec![(SoundEffect::Jump, 0.4), (SoundEffect::Coin, 0.4)]
        );
    }

    #[test]
    fn test_muted_plays_nothing() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.set_muted(true);
        audio.play(SoundEffect::Victory);
        audio.set_muted(false);
        audio.set_master_volume(-1.0);
        audio.play(SoundEffect::Victory);
        assert!(recorder.0.borrow().is_empty());
    }
}
