/// Side effects requested by the simulation.
///
/// The core never touches audio devices or files.  Each frame it appends
/// `Effect`s here and the frontend drains them after the update.

use crate::story::Mood;

/// One-shot sound cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Shoot,
    ExplosionSmall,
    ExplosionLarge,
    PowerUp,
    PlayerHit,
    LevelComplete,
    GameOver,
    MenuSelect,
    BossHit,
}

impl Cue {
    pub const ALL: [Cue; 9] = [
        Cue::Shoot,
        Cue::ExplosionSmall,
        Cue::ExplosionLarge,
        Cue::PowerUp,
        Cue::PlayerHit,
        Cue::LevelComplete,
        Cue::GameOver,
        Cue::MenuSelect,
        Cue::BossHit,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Cue::Shoot => "shoot.wav",
            Cue::ExplosionSmall => "explosion_small.wav",
            Cue::ExplosionLarge => "explosion_large.wav",
            Cue::PowerUp => "powerup.wav",
            Cue::PlayerHit => "player_hit.wav",
            Cue::LevelComplete => "level_complete.wav",
            Cue::GameOver => "game_over.wav",
            Cue::MenuSelect => "menu_select.wav",
            Cue::BossHit => "boss_hit.wav",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Sound { cue: Cue, volume: f32 },
    /// Start looping story music for a mood (no-op if it is already playing).
    Music(Mood),
    StopMusic,
    /// The high score was beaten; write it out.
    PersistHighScore(u32),
    Quit,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects {
    queue: Vec<Effect>,
}

impl Effects {
    pub fn push(&mut self, effect: Effect) {
        self.queue.push(effect);
    }

    pub fn play(&mut self, cue: Cue, volume: f32) {
        self.queue.push(Effect::Sound { cue, volume });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.queue.iter()
    }

    pub fn sounds(&self) -> impl Iterator<Item = Cue> + '_ {
        self.queue.iter().filter_map(|e| match e {
            Effect::Sound { cue, .. } => Some(*cue),
            _ => None,
        })
    }

    pub fn contains(&self, effect: &Effect) -> bool {
        self.queue.contains(effect)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Effect> {
        self.queue.drain(..)
    }
}
