/// Narrative slideshows shown between levels.
///
/// An arc is a fixed list of slides.  The `Sequencer` holds presentation
/// state for the arc currently on screen: typewriter reveal, fade-in,
/// auto-advance and the hold-Escape skip.  It is reset on every arc entry.

use crate::config::Tuning;
use crate::input::{FrameInput, Key};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mood {
    Neutral,
    Sad,
    Triumphant,
}

impl Mood {
    pub fn music_file(self) -> &'static str {
        match self {
            Mood::Neutral => "story_epic.wav",
            Mood::Sad => "story_sad.wav",
            Mood::Triumphant => "story_triumph.wav",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slide {
    /// Image path relative to the sprite directory.
    pub image: &'static str,
    pub caption: &'static str,
}

const fn slide(image: &'static str, caption: &'static str) -> Slide {
    Slide { image, caption }
}

static INTRO: [Slide; 5] = [
    slide(
        "story_intro_1.jpg",
        "The Alien threat began with a calculated gaze upon Earth...\nTarget: Dhaka.",
    ),
    slide(
        "story_intro_2.jpg",
        "Our Satellite 'Bangabandhu Deep Space Sentinel-1'\ndetected the incoming invasion fleet.",
    ),
    slide(
        "story_intro_3.jpg",
        "Emergency Protocol Initiated.\nWorld Leaders gathered to formulate a pre-emptive strike.",
    ),
    slide(
        "story_intro_4.png",
        "Operation Starfall Launch Initiated.\nThe Bangladesh Space Force deploys the flagship.",
    ),
    slide(
        "story_intro_5.png",
        "Battle Stations!\nOur forces engage the enemy to defend our home!",
    ),
];

static LEVEL2: [Slide; 3] = [
    slide(
        "story_lvl2_1.jpg",
        "The Aliens are losing patience!\nTheir commander orders the swarm to attack!",
    ),
    slide(
        "story_lvl2_2.jpg",
        "Humanity fights back!\nOur pilots regroup for the counter-offensive.",
    ),
    slide(
        "story_lvl2_3.png",
        "Dogfight in Deep Space!\nEngaging enemy fighter squadrons.",
    ),
];

static LEVEL3: [Slide; 3] = [
    slide(
        "story_lvl3_1.png",
        "The Alien Queen is furious at her fleet's failure!\nShe commands the mothership to engage.",
    ),
    slide(
        "story_lvl3_2.png",
        "Warning: Massive Energy Signature Detected!\nThe Boss Ship is approaching.",
    ),
    slide(
        "story_lvl3_3.jpg",
        "The Final Battle Begins!\nDefend Earth at all costs!",
    ),
];

static DEFEAT: [Slide; 3] = [
    slide(
        "story_gameover_1.jpg",
        "Our flagship is destroyed!\nThe alien fleet overwhelms our defenses.",
    ),
    slide(
        "story_gameover_2.jpg",
        "With no one left to stop them...\nThe aliens unleash their fury upon Earth.",
    ),
    slide(
        "story_gameover_3.jpg",
        "Earth falls silent...\nHumanity's last hope is gone.",
    ),
];

static VICTORY: [Slide; 4] = [
    slide(
        "story_victory_1.jpg",
        "The Alien Mothership is destroyed!\nHumanity's counterattack succeeds!",
    ),
    slide(
        "story_victory_2.jpg",
        "Our forces push forward and obliterate\nthe alien homeworld!",
    ),
    slide(
        "story_victory_3.jpg",
        "Our heroes return home to a hero's welcome.\nLeaders embrace the saviors of Earth!",
    ),
    slide(
        "story_victory_4.jpg",
        "The people of Earth celebrate VICTORY!\nBangladesh leads the way to peace!",
    ),
];

/// The five story arcs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoryArc {
    Intro,
    Level2,
    Level3,
    Defeat,
    Victory,
}

impl StoryArc {
    pub fn slides(self) -> &'static [Slide] {
        match self {
            StoryArc::Intro => &INTRO,
            StoryArc::Level2 => &LEVEL2,
            StoryArc::Level3 => &LEVEL3,
            StoryArc::Defeat => &DEFEAT,
            StoryArc::Victory => &VICTORY,
        }
    }

    pub fn mood(self) -> Mood {
        match self {
            StoryArc::Intro | StoryArc::Level2 | StoryArc::Level3 => Mood::Neutral,
            StoryArc::Defeat => Mood::Sad,
            StoryArc::Victory => Mood::Triumphant,
        }
    }

    /// The level this arc leads into, or `None` for the two endings.
    pub fn next_level(self) -> Option<u8> {
        match self {
            StoryArc::Intro => Some(1),
            StoryArc::Level2 => Some(2),
            StoryArc::Level3 => Some(3),
            StoryArc::Defeat | StoryArc::Victory => None,
        }
    }

    pub fn all_images() -> impl Iterator<Item = &'static str> {
        [StoryArc::Intro, StoryArc::Level2, StoryArc::Level3, StoryArc::Defeat, StoryArc::Victory]
            .into_iter()
            .flat_map(|arc| arc.slides().iter().map(|s| s.image))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoryStep {
    Stay,
    /// Moved on to the next slide of the same arc.
    Advanced,
    /// The arc is over, either by advancing past its last slide or by the
    /// hold-to-skip.
    Finished { skipped: bool },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sequencer {
    pub index: usize,
    pub typewriter: f32,
    pub fade: f32,
    pub slide_timer: f32,
    pub skip_timer: f32,
    /// Free-running clock for the image sway; never reset mid-arc.
    pub sway: f32,
}

impl Sequencer {
    /// Back to the first slide with every timer cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn reset_slide(&mut self) {
        self.typewriter = 0.0;
        self.fade = 0.0;
        self.slide_timer = 0.0;
    }

    pub fn slide(&self, arc: StoryArc) -> Option<&'static Slide> {
        arc.slides().get(self.index)
    }

    pub fn update(
        &mut self,
        arc: StoryArc,
        dt: f32,
        input: &FrameInput,
        tuning: &Tuning,
    ) -> StoryStep {
        self.slide_timer += dt;
        self.typewriter += dt;
        self.fade += dt;
        self.sway += dt;

        if input.held(Key::Escape) {
            self.skip_timer += dt;
            if self.skip_timer >= tuning.skip_hold {
                return StoryStep::Finished { skipped: true };
            }
        } else {
            self.skip_timer = 0.0;
        }

        let advance = input.any_pressed(&[Key::Enter, Key::Space])
            || self.slide_timer >= tuning.auto_advance;
        if !advance {
            return StoryStep::Stay;
        }

        self.index += 1;
        self.reset_slide();
        if self.index >= arc.slides().len() {
            StoryStep::Finished { skipped: false }
        } else {
            StoryStep::Advanced
        }
    }

    /// The visible prefix of `caption` under the typewriter reveal.
    pub fn revealed<'a>(&self, caption: &'a str, rate: f32) -> &'a str {
        let shown = (self.typewriter * rate).max(0.0) as usize;
        match caption.char_indices().nth(shown) {
            Some((end, _)) => &caption[..end],
            None => caption,
        }
    }

    /// Opacity of the black overlay during fade-in, 1.0 down to 0.0.
    pub fn fade_overlay(&self, fade_in: f32) -> f32 {
        if fade_in <= 0.0 || self.fade >= fade_in {
            return 0.0;
        }
        1.0 - self.fade / fade_in
    }

    /// Fraction of the skip hold completed, 0.0 to 1.0.
    pub fn skip_progress(&self, skip_hold: f32) -> f32 {
        if skip_hold <= 0.0 {
            return 1.0;
        }
        (self.skip_timer / skip_hold).min(1.0)
    }

    /// Whole seconds left before auto-advance, for the on-screen countdown.
    pub fn seconds_left(&self, auto_advance: f32) -> Option<u32> {
        let left = auto_advance - self.slide_timer;
        (left > 0.0).then(|| left as u32 + 1)
    }
}
