/// Sound bank on top of rodio.
///
/// Sounds are loaded once into memory and addressed by `SoundId`.  Missing
/// files and a missing output device are logged and turn every call into
/// a no-op; audio is never fatal.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::effects::Cue;
use crate::story::Mood;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundId(usize);

struct Sound {
    bytes: Arc<[u8]>,
    volume: f32,
}

const MUSIC_VOLUME: f32 = 0.6;

pub struct AudioBank {
    stream: Option<OutputStream>,
    sounds: Vec<Sound>,
    /// Sinks of sounds started with `looped = true`, by sound.
    looping: HashMap<SoundId, Sink>,
    cues: HashMap<Cue, SoundId>,
    music: HashMap<Mood, SoundId>,
    current_music: Option<SoundId>,
}

impl AudioBank {
    /// Open the default output device.  Without one the bank stays silent.
    pub fn open() -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                log::warn!("audio output unavailable, running silent: {e}");
                None
            }
        };
        Self::with_stream(stream)
    }

    /// A bank that accepts every call and plays nothing.
    pub fn silent() -> Self {
        Self::with_stream(None)
    }

    fn with_stream(stream: Option<OutputStream>) -> Self {
        AudioBank {
            stream,
            sounds: Vec::new(),
            looping: HashMap::new(),
            cues: HashMap::new(),
            music: HashMap::new(),
            current_music: None,
        }
    }

    /// Read and validate a sound file.  `None` if it is missing or not a
    /// format rodio can decode.
    pub fn load(&mut self, path: &Path) -> Option<SoundId> {
        let bytes: Arc<[u8]> = match std::fs::read(path) {
            Ok(bytes) => bytes.into(),
            Err(e) => {
                log::warn!("failed to load sound {}: {e}", path.display());
                return None;
            }
        };
        if let Err(e) = Decoder::new(Cursor::new(bytes.clone())) {
            log::warn!("failed to decode sound {}: {e}", path.display());
            return None;
        }
        self.sounds.push(Sound { bytes, volume: 1.0 });
        log::info!("loaded {}", path.display());
        Some(SoundId(self.sounds.len() - 1))
    }

    /// Load every cue and every story track from `dir`.
    pub fn load_all(&mut self, dir: &Path) {
        for cue in Cue::ALL {
            if let Some(id) = self.load(&dir.join(cue.file_name())) {
                self.cues.insert(cue, id);
            }
        }
        for mood in [Mood::Neutral, Mood::Sad, Mood::Triumphant] {
            match self.load(&dir.join(mood.music_file())) {
                Some(id) => {
                    self.music.insert(mood, id);
                }
                None => log::warn!("story music for {mood:?} not loaded"),
            }
        }
    }

    pub fn set_volume(&mut self, id: SoundId, level: f32) {
        let level = level.clamp(0.0, 1.0);
        if let Some(sound) = self.sounds.get_mut(id.0) {
            sound.volume = level;
        }
        if let Some(sink) = self.looping.get(&id) {
            sink.set_volume(level);
        }
    }

    pub fn play(&mut self, id: SoundId, looped: bool) {
        let (Some(stream), Some(sound)) = (&self.stream, self.sounds.get(id.0)) else {
            return;
        };
        let source = match Decoder::new(Cursor::new(sound.bytes.clone())) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("sound {id:?} failed to decode: {e}");
                return;
            }
        };
        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(sound.volume);
        if looped {
            sink.append(source.repeat_infinite());
            if let Some(old) = self.looping.insert(id, sink) {
                old.stop();
            }
        } else {
            sink.append(source);
            sink.detach();
        }
    }

    pub fn pause(&mut self, id: SoundId) {
        if let Some(sink) = self.looping.get(&id) {
            sink.pause();
        }
    }

    pub fn stop(&mut self, id: SoundId) {
        if let Some(sink) = self.looping.remove(&id) {
            sink.stop();
        }
    }

    // ── Game-facing helpers ──────────────────────────────────────────────────

    pub fn cue(&mut self, cue: Cue, volume: f32) {
        if let Some(&id) = self.cues.get(&cue) {
            self.set_volume(id, volume);
            self.play(id, false);
        }
    }

    /// Loop the track for `mood`.  A track that is already playing is left
    /// alone; a different one is stopped first.
    pub fn start_music(&mut self, mood: Mood) {
        let Some(&id) = self.music.get(&mood) else {
            log::debug!("no story music for {mood:?}");
            return;
        };
        if self.current_music == Some(id) {
            return;
        }
        self.stop_music();
        self.set_volume(id, MUSIC_VOLUME);
        self.play(id, true);
        self.current_music = Some(id);
        log::debug!("story music {mood:?} started");
    }

    pub fn stop_music(&mut self) {
        if let Some(id) = self.current_music.take() {
            self.pause(id);
            self.stop(id);
            log::debug!("story music stopped");
        }
    }
}
