use std::collections::HashMap;
use std::path::Path;

use kira::{
    Volume,
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::{
        PlaybackRate,
        static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    },
    tween::Tween,
};
use rand::Rng;

/// Configuration for playing a sound with variation.
#[derive(Debug, Clone, Copy)]
pub struct SoundConfig {
    pub volume: f32,
    pub pitch: f32,
    /// Random pitch variation range (e.g. 0.1 = +/- 10%)
    pub pitch_variation: f32,
    /// Random volume variation range
    pub volume_variation: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pitch: 1.0,
            pitch_variation: 0.0,
            volume_variation: 0.0,
        }
    }
}

pub struct AudioContext {
    /// `None` when audio hardware is unavailable (headless / CI / no audio device).
    manager: Option<AudioManager>,
    sounds: HashMap<String, StaticSoundData>,
    active_music: Option<StaticSoundHandle>,
    /// Multiplied into every one-shot and music volume; from settings.json.
    master_volume: f32,
}

impl AudioContext {
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                eprintln!("[audio] Failed to initialize audio manager: {e}. Audio disabled.");
                None
            }
        };
        Self {
            manager,
            sounds: HashMap::new(),
            active_music: None,
            master_volume: 1.0,
        }
    }

    /// Returns true if audio hardware is available.
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 2.0);
    }

    /// Load a sound file (WAV, OGG) into memory.
    /// Logs a warning and returns if the file cannot be read.
    pub fn load_sound<P: AsRef<Path>>(&mut self, name: &str, path: P) {
        match StaticSoundData::from_file(path.as_ref()) {
            Ok(sound) => {
                self.sounds.insert(name.to_string(), sound);
            }
            Err(e) => eprintln!(
                "[audio] Failed to load '{}' from '{}': {e}",
                name,
                path.as_ref().display()
            ),
        }
    }

    /// Load every `.wav` and `.ogg` file in `folder` (non-recursive), keyed
    /// by file stem.
    pub fn load_sound_folder(&mut self, folder: &str) {
        for entry in walkdir::WalkDir::new(folder)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            match path.extension().and_then(|s| s.to_str()) {
                Some("wav") | Some("ogg") => {}
                _ => continue,
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                let name = name.to_string();
                self.load_sound(&name, path);
            }
        }
    }

    /// Play a sound once with optional config.  Unknown names are silent.
    pub fn play(&mut self, name: &str, config: SoundConfig) {
        let Some(manager) = self.manager.as_mut() else {
            return;
        };
        if let Some(data) = self.sounds.get(name) {
            let mut rng = rand::thread_rng();
            let p_offset = if config.pitch_variation > 0.0 {
                rng.gen_range(-config.pitch_variation..=config.pitch_variation)
            } else {
                0.0
            };
            let v_offset = if config.volume_variation > 0.0 {
                rng.gen_range(-config.volume_variation..=config.volume_variation)
            } else {
                0.0
            };

            let mut settings = StaticSoundSettings::new();
            settings.playback_rate = PlaybackRate::Factor((config.pitch + p_offset) as f64).into();
            let volume = ((config.volume + v_offset) * self.master_volume).clamp(0.0, 2.0);
            settings.volume = Volume::Amplitude(volume as f64).into();

            let _ = manager.play(data.clone().with_settings(settings));
        }
    }

    /// Play background music that loops indefinitely.
    pub fn play_music(&mut self, name: &str, fade_in_secs: f32) {
        let Some(manager) = self.manager.as_mut() else {
            return;
        };
        if let Some(data) = self.sounds.get(name) {
            // Fade out previous music with a fixed short duration independent
            // of the new track's fade-in.
            if let Some(mut handle) = self.active_music.take() {
                let _ = handle.stop(Tween {
                    duration: std::time::Duration::from_secs_f32(0.5),
                    ..Default::default()
                });
            }

            let mut settings = StaticSoundSettings::new().loop_region(0.0..);
            settings.volume = Volume::Amplitude(0.0).into();

            match manager.play(data.clone().with_settings(settings)) {
                Ok(mut handle) => {
                    let _ = handle.set_volume(
                        Volume::Amplitude(self.master_volume as f64),
                        Tween {
                            duration: std::time::Duration::from_secs_f32(fade_in_secs),
                            ..Default::default()
                        },
                    );
                    self.active_music = Some(handle);
                }
                Err(e) => eprintln!("[audio] Failed to play music '{name}': {e}"),
            }
        }
    }
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}
