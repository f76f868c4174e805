mod display;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use env_logger::{Env, Target};
use rand::thread_rng;

use starfall::assets::{Art, ImageStore};
use starfall::audio::AudioBank;
use starfall::config::Tuning;
use starfall::effects::Effect;
use starfall::game::{tick, Game};
use starfall::highscore::{self, HIGH_SCORE_FILE};
use starfall::input::{FrameInput, Key};

use display::{world_bounds, View};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Longest simulated step.  A stall (terminal resize, debugger) turns into
/// one slow frame instead of a teleport.
const MAX_DT: f32 = 0.1;

const LOG_FILE: &str = "starfall.log";
const TUNING_FILE: &str = "starfall.toml";
const SPRITE_DIR: &str = "assets/sprites";
const AUDIO_DIR: &str = "assets/audio";

// ── Simultaneous-input tracking ───────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Key::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Key::Right,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Key::Up,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char('p') | KeyCode::Char('P') => Key::P,
        KeyCode::Char('q') | KeyCode::Char('Q') => Key::Q,
        _ => return None,
    };
    Some(key)
}

/// Input model: instead of acting on each key event individually, we keep
/// the frame number of the last press/repeat event for every key.  A key is
/// "held" while that stamp is fresh, and "pressed" on the frame it turns
/// from not held to held.  OS auto-repeat on classic terminals shows up as a
/// stream of `Press` events; those only refresh the stamp.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: keys expire after `HOLD_WINDOW` frames of
///   silence.
#[derive(Default)]
struct KeyTracker {
    key_frame: HashMap<Key, u64>,
    pressed: HashSet<Key>,
}

impl KeyTracker {
    fn is_held(&self, key: Key, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn record(&mut self, code: KeyCode, kind: KeyEventKind, frame: u64) {
        let Some(key) = map_key(code) else {
            return;
        };
        match kind {
            KeyEventKind::Press => {
                if !self.is_held(key, frame) {
                    self.pressed.insert(key);
                }
                self.key_frame.insert(key, frame);
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(key, frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&key);
            }
        }
    }

    /// Snapshot for this frame; clears the pressed set.
    fn snapshot(&mut self, frame: u64) -> FrameInput {
        let mut input = FrameInput::new();
        for key in self.pressed.drain() {
            input = input.press(key);
        }
        for (&key, _) in self.key_frame.iter() {
            if self.is_held(key, frame) {
                input = input.hold(key);
            }
        }
        input
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Log to a file; the terminal belongs to the game.  `RUST_LOG` filters,
/// default `info`.  Without a writable log file the game runs unlogged.
fn init_logging() {
    match File::create(LOG_FILE) {
        Ok(file) => {
            env_logger::Builder::from_env(Env::default().default_filter_or("info"))
                .target(Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("cannot open {LOG_FILE}: {e}; logging disabled"),
    }
}

/// Everything loaded from disk before the first frame.  None of it is
/// required: missing pieces degrade to shapes and silence.
struct Resources {
    tuning: Tuning,
    high_score: u32,
    store: ImageStore,
    art: Art,
    audio: AudioBank,
}

fn load_resources() -> Resources {
    let tuning = Tuning::load_or_default(Path::new(TUNING_FILE));
    let high_score = highscore::load(Path::new(HIGH_SCORE_FILE));

    let mut store = ImageStore::default();
    let art = Art::load(&mut store, Path::new(SPRITE_DIR));

    let mut audio = AudioBank::open();
    audio.load_all(Path::new(AUDIO_DIR));

    Resources { tuning, high_score, store, art, audio }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging();
    log::info!("starfall {} starting", env!("CARGO_PKG_VERSION"));
    let mut res = load_resources();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    log::debug!("keyboard enhancement: {keyboard_enhanced}");

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &mut res);

    // Always restore the terminal
    res.audio.stop_music();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match &result {
        Ok(()) => log::info!("clean exit"),
        Err(e) => log::error!("fatal: {e:#}"),
    }
    result
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    res: &mut Resources,
) -> anyhow::Result<()> {
    let mut rng = thread_rng();
    let (cols, rows) = terminal::size()?;
    let mut game = Game::new(res.tuning.clone(), res.high_score, world_bounds(cols, rows));
    let mut view = View::new(&mut rng);
    let mut keys = KeyTracker::default();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev {
                if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                    // A run interrupted mid-level still counts for the high score.
                    if game.screen.in_level() {
                        game.effects.clear();
                        game.record_high_score();
                        apply_effects(&mut game, res);
                    }
                    return Ok(());
                }
                keys.record(code, kind, frame);
            }
        }
        let input = keys.snapshot(frame);

        let dt = frame_start.duration_since(last).as_secs_f32().min(MAX_DT);
        last = frame_start;

        let (cols, rows) = terminal::size()?;
        let bounds = world_bounds(cols, rows);
        game = tick(&game, &input, dt, bounds, &mut rng);

        if apply_effects(&mut game, res) {
            return Ok(());
        }

        view.render(out, &game, &res.store, &res.art, cols, rows, dt, &mut rng)
            .context("drawing frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

/// Carry out the effects the last frame requested.  Returns true on quit.
fn apply_effects(game: &mut Game, res: &mut Resources) -> bool {
    let mut quit = false;
    for effect in game.effects.drain() {
        match effect {
            Effect::Sound { cue, volume } => res.audio.cue(cue, volume),
            Effect::Music(mood) => res.audio.start_music(mood),
            Effect::StopMusic => res.audio.stop_music(),
            Effect::PersistHighScore(score) => {
                match highscore::save_if_higher(Path::new(HIGH_SCORE_FILE), score) {
                    Ok(stored) => log::debug!("high score file holds {stored}"),
                    Err(e) => log::warn!("high score not saved: {e:#}"),
                }
            }
            Effect::Quit => quit = true,
        }
    }
    quit
}
