/// The frame driver.
///
/// `Game` owns the current `Screen`, the gameplay `Session`, the story
/// sequencer and everything that outlives a run (difficulty, high score,
/// tuning).  `tick` advances it by one frame; `Game::fire` applies a
/// state-machine event and runs the exit hook of the old screen and the
/// enter hook of the new one.

use rand::Rng;

use crate::config::{Difficulty, Tuning};
use crate::effects::{Cue, Effect, Effects};
use crate::input::{FrameInput, Key};
use crate::kinematics::Bounds;
use crate::session::{self, Session};
use crate::state::{Event, Screen};
use crate::story::{Sequencer, StoryStep};

#[derive(Clone, Debug)]
pub struct Game {
    pub screen: Screen,
    pub session: Session,
    pub story: Sequencer,
    pub difficulty: Difficulty,
    pub high_score: u32,
    /// Seconds since the level intro card appeared.
    pub intro_timer: f32,
    pub tuning: Tuning,
    /// Effects produced by the most recent frame.
    pub effects: Effects,
}

impl Game {
    pub fn new(tuning: Tuning, high_score: u32, bounds: Bounds) -> Self {
        Game {
            screen: Screen::Menu,
            session: Session::new(&tuning, bounds),
            story: Sequencer::default(),
            difficulty: Difficulty::default(),
            high_score,
            intro_timer: 0.0,
            tuning,
            effects: Effects::default(),
        }
    }

    /// Apply `event`.  Returns false (and changes nothing) when the current
    /// screen has no transition for it.
    pub fn fire(&mut self, event: Event, bounds: Bounds) -> bool {
        let Some(next) = self.screen.transition(event) else {
            log::warn!("ignored {event:?} on {:?}", self.screen);
            return false;
        };
        log::debug!("{:?} --{event:?}--> {next:?}", self.screen);
        let prev = self.screen;
        self.exit(prev, next);
        self.screen = next;
        self.enter(next, bounds);
        true
    }

    fn exit(&mut self, from: Screen, to: Screen) {
        if let Screen::Story(_) = from {
            if !matches!(to, Screen::Story(_)) {
                self.effects.push(Effect::StopMusic);
            }
        }
    }

    fn enter(&mut self, screen: Screen, bounds: Bounds) {
        match screen {
            Screen::Story(arc) => {
                self.story.reset();
                self.effects.push(Effect::Music(arc.mood()));
            }
            Screen::LevelIntro { level } => {
                self.intro_timer = 0.0;
                self.session
                    .start_level(level, &self.tuning, self.difficulty, bounds);
                log::info!("starting level {level} on {}", self.difficulty.name());
            }
            Screen::GameOver => self.record_high_score(),
            Screen::Menu | Screen::Playing | Screen::Paused => {}
        }
    }

    /// Keep the best score.  Emits a persistence effect only when the stored
    /// value actually changes, so the file always holds `max(old, score)`.
    pub fn record_high_score(&mut self) {
        if self.session.score > self.high_score {
            self.high_score = self.session.score;
            self.effects.push(Effect::PersistHighScore(self.high_score));
            log::info!("new high score {}", self.high_score);
        }
    }

    /// New run with the current tuning.  Difficulty and high score survive.
    pub fn reset_session(&mut self, bounds: Bounds) {
        self.session = Session::new(&self.tuning, bounds);
    }

    /// The intro title blinks at 2 Hz.
    pub fn intro_title_visible(&self) -> bool {
        (self.intro_timer * 4.0) % 2.0 < 1.0
    }

    /// Score that counts as a new record on the game-over card.
    pub fn is_new_high_score(&self) -> bool {
        self.session.score >= self.high_score && self.session.score > 0
    }
}

// ── Per-frame update ─────────────────────────────────────────────────────────

/// Advance the game by one frame, returning the next state.  The input
/// state is not modified; all randomness comes through `rng`.
pub fn tick(
    game: &Game,
    input: &FrameInput,
    dt: f32,
    bounds: Bounds,
    rng: &mut impl Rng,
) -> Game {
    let mut next = game.clone();
    advance(&mut next, input, dt, bounds, rng);
    next
}

/// In-place form of `tick`.  Clears the previous frame's effects first.
pub fn advance(game: &mut Game, input: &FrameInput, dt: f32, bounds: Bounds, rng: &mut impl Rng) {
    game.effects.clear();

    match game.screen {
        Screen::Menu => menu(game, input, bounds),
        Screen::Story(arc) => {
            let step = game.story.update(arc, dt, input, &game.tuning);
            match step {
                StoryStep::Stay => {}
                StoryStep::Advanced => game.effects.play(Cue::MenuSelect, 1.0),
                StoryStep::Finished { skipped } => {
                    if !skipped {
                        game.effects.play(Cue::MenuSelect, 1.0);
                    }
                    game.fire(Event::StoryDone, bounds);
                }
            }
        }
        Screen::LevelIntro { .. } => {
            game.intro_timer += dt;
            if input.pressed(Key::Enter) {
                game.fire(Event::Begin, bounds);
            }
        }
        Screen::Playing => playing(game, input, dt, bounds, rng),
        Screen::Paused => {
            if input.any_pressed(&[Key::Escape, Key::P]) {
                game.fire(Event::Resume, bounds);
            } else if input.pressed(Key::Q) {
                game.record_high_score();
                game.fire(Event::QuitToMenu, bounds);
            }
        }
        Screen::GameOver => {
            if input.pressed(Key::Enter) {
                game.fire(Event::Dismiss, bounds);
            }
        }
    }
}

fn menu(game: &mut Game, input: &FrameInput, bounds: Bounds) {
    if input.pressed(Key::Left) {
        game.difficulty = game.difficulty.easier();
        game.effects.play(Cue::MenuSelect, 1.0);
    }
    if input.pressed(Key::Right) {
        game.difficulty = game.difficulty.harder();
        game.effects.play(Cue::MenuSelect, 1.0);
    }
    if input.any_pressed(&[Key::Enter, Key::Space]) {
        game.effects.play(Cue::MenuSelect, 1.0);
        game.reset_session(bounds);
        game.fire(Event::Start, bounds);
    } else if input.pressed(Key::Q) {
        game.effects.push(Effect::Quit);
    }
}

fn playing(game: &mut Game, input: &FrameInput, dt: f32, bounds: Bounds, rng: &mut impl Rng) {
    if input.any_pressed(&[Key::Escape, Key::P]) {
        game.fire(Event::Pause, bounds);
        return;
    }

    let outcome = session::simulate(
        &mut game.session,
        input,
        dt,
        bounds,
        &game.tuning,
        rng,
        &mut game.effects,
    );

    if outcome.defeated {
        game.session.won = false;
        game.record_high_score();
        game.fire(Event::Defeated, bounds);
        return;
    }

    if game.session.level_cleared(&game.tuning) {
        let level = game.session.level;
        game.effects.play(Cue::LevelComplete, 1.0);
        log::info!("level {level} cleared, score {}", game.session.score);
        if level == 3 {
            game.session.won = true;
            game.record_high_score();
        }
        game.fire(Event::LevelCleared(level), bounds);
    }
}
