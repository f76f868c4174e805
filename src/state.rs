/// Top-level screen state machine.
///
/// `Screen::transition` is the whole transition table: it maps the current
/// screen and an event to the next screen, or `None` when the event means
/// nothing there.  Enter/exit work lives with the driver in `game`.

use crate::story::StoryArc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Story(StoryArc),
    LevelIntro { level: u8 },
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Start pressed on the menu.
    Start,
    /// The current story arc ended (last slide or skip).
    StoryDone,
    /// Confirm pressed on the level intro card.
    Begin,
    Pause,
    Resume,
    QuitToMenu,
    LevelCleared(u8),
    Defeated,
    /// Confirm pressed on the game-over screen.
    Dismiss,
}

impl Screen {
    pub fn transition(self, event: Event) -> Option<Screen> {
        use Event::*;
        use Screen::*;

        let next = match (self, event) {
            (Menu, Start) => Story(StoryArc::Intro),
            (Story(arc), StoryDone) => match arc.next_level() {
                Some(level) => LevelIntro { level },
                None => GameOver,
            },
            (LevelIntro { .. }, Begin) => Playing,
            (Playing, Pause) => Paused,
            (Paused, Resume) => Playing,
            (Paused, QuitToMenu) => Menu,
            (Playing, LevelCleared(1)) => Story(StoryArc::Level2),
            (Playing, LevelCleared(2)) => Story(StoryArc::Level3),
            (Playing, LevelCleared(3)) => Story(StoryArc::Victory),
            (Playing, Defeated) => Story(StoryArc::Defeat),
            (GameOver, Dismiss) => Menu,
            _ => return None,
        };
        Some(next)
    }

    /// True while the simulation is live or frozen mid-level.
    pub fn in_level(self) -> bool {
        matches!(self, Screen::Playing | Screen::Paused)
    }
}
