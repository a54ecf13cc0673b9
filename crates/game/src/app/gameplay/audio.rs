#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SoundCue {
    MeleeAttack,
    BulletFire,
    CannonFire,
    BombThrow,
    BombExplode,
    Damage,
}

impl SoundCue {
    fn name(self) -> &'static str {
        match self {
            Self::MeleeAttack => "melee_attack",
            Self::BulletFire => "bullet_fire",
            Self::CannonFire => "cannon_fire",
            Self::BombThrow => "bomb_throw",
            Self::BombExplode => "bomb_explode",
            Self::Damage => "damage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AudioSettings {
    sound_enabled: bool,
    music_enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
        }
    }
}

/// Playback backend. Implementations must treat a missing clip as a no-op.
trait AudioSink {
    fn play_sound(&mut self, cue: SoundCue);
    fn play_music(&mut self);
    fn pause_music(&mut self);
    fn stop_music(&mut self);
}

/// Default backend: no device, just trace events.
#[derive(Debug, Default)]
struct TracingAudio;

impl AudioSink for TracingAudio {
    fn play_sound(&mut self, cue: SoundCue) {
        debug!(cue = cue.name(), "sound_played");
    }

    fn play_music(&mut self) {
        debug!("music_playing");
    }

    fn pause_music(&mut self) {
        debug!("music_paused");
    }

    fn stop_music(&mut self) {
        debug!("music_stopped");
    }
}

struct Audio {
    settings: AudioSettings,
    sink: Box<dyn AudioSink>,
}

impl Audio {
    fn new(settings: AudioSettings, sink: Box<dyn AudioSink>) -> Self {
        Self { settings, sink }
    }

    fn play(&mut self, cue: SoundCue) {
        if self.settings.sound_enabled {
            self.sink.play_sound(cue);
        }
    }

    fn start_music(&mut self) {
        if self.settings.music_enabled {
            self.sink.play_music();
        }
    }

    fn toggle_sound(&mut self) {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        info!(enabled = self.settings.sound_enabled, "sound_toggled");
    }

    fn toggle_music(&mut self) {
        self.settings.music_enabled = !self.settings.music_enabled;
        if self.settings.music_enabled {
            self.sink.play_music();
        } else {
            self.sink.pause_music();
        }
        info!(enabled = self.settings.music_enabled, "music_toggled");
    }

    fn stop_music(&mut self) {
        self.sink.stop_music();
    }

    fn settings(&self) -> AudioSettings {
        self.settings
    }
}
