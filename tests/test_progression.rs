use starfall::config::{Difficulty, Tuning};
use starfall::effects::{Cue, Effect, Effects};
use starfall::entities::*;
use starfall::game::{advance, tick, Game};
use starfall::input::{FrameInput, Key};
use starfall::kinematics::Bounds;
use starfall::spawner;
use starfall::state::{Event, Screen};
use starfall::story::{Mood, StoryArc};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 1.0 / 30.0;

fn bounds() -> Bounds {
    Bounds::new(800.0, 600.0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A game dropped straight into `level`, with auto-fire off so stray
/// bullets never interfere.
fn make_game(level: u8) -> Game {
    let tuning = Tuning { auto_fire: false, ..Tuning::default() };
    let mut game = Game::new(tuning, 0, bounds());
    game.session.start_level(level, &game.tuning, Difficulty::Normal, bounds());
    game.screen = Screen::Playing;
    game
}

fn idle() -> FrameInput {
    FrameInput::new()
}

fn press(key: Key) -> FrameInput {
    FrameInput::new().press(key)
}

fn step(game: &mut Game, input: &FrameInput, rng: &mut StdRng) {
    advance(game, input, DT, bounds(), rng);
}

// ── Menu and intro flow ───────────────────────────────────────────────────────

#[test]
fn menu_start_enters_intro_story_with_music() {
    let mut game = Game::new(Tuning::default(), 0, bounds());
    let mut rng = seeded_rng();

    step(&mut game, &press(Key::Enter), &mut rng);

    assert_eq!(game.screen, Screen::Story(StoryArc::Intro));
    assert!(game.effects.contains(&Effect::Music(Mood::Neutral)));
    assert!(game.effects.sounds().any(|c| c == Cue::MenuSelect));
}

#[test]
fn menu_changes_difficulty() {
    let mut game = Game::new(Tuning::default(), 0, bounds());
    let mut rng = seeded_rng();

    step(&mut game, &press(Key::Right), &mut rng);
    assert_eq!(game.difficulty, Difficulty::Hard);
    step(&mut game, &press(Key::Right), &mut rng);
    assert_eq!(game.difficulty, Difficulty::Hard);
    step(&mut game, &press(Key::Left), &mut rng);
    step(&mut game, &press(Key::Left), &mut rng);
    assert_eq!(game.difficulty, Difficulty::Easy);
    assert_eq!(game.screen, Screen::Menu);
}

#[test]
fn menu_quit_requests_exit() {
    let mut game = Game::new(Tuning::default(), 0, bounds());
    step(&mut game, &press(Key::Q), &mut seeded_rng());
    assert!(game.effects.contains(&Effect::Quit));
}

#[test]
fn intro_story_leads_to_level_one() {
    let mut game = Game::new(Tuning::default(), 0, bounds());
    let mut rng = seeded_rng();
    step(&mut game, &press(Key::Enter), &mut rng);

    let slides = StoryArc::Intro.slides().len();
    for _ in 0..slides {
        step(&mut game, &press(Key::Enter), &mut rng);
    }

    assert_eq!(game.screen, Screen::LevelIntro { level: 1 });
    assert!(game.effects.contains(&Effect::StopMusic));
    assert_eq!(game.session.level, 1);

    step(&mut game, &press(Key::Enter), &mut rng);
    assert_eq!(game.screen, Screen::Playing);
}

#[test]
fn level_intro_waits_for_confirm() {
    let mut game = make_game(1);
    game.screen = Screen::LevelIntro { level: 1 };
    let mut rng = seeded_rng();

    for _ in 0..60 {
        step(&mut game, &press(Key::Space), &mut rng);
    }
    assert_eq!(game.screen, Screen::LevelIntro { level: 1 });
    assert!(game.intro_timer > 1.9);
}

#[test]
fn tick_leaves_previous_state_untouched() {
    let game = make_game(1);
    let next = tick(&game, &idle(), DT, bounds(), &mut seeded_rng());
    assert_eq!(game.session.level_time, 0.0);
    assert!(next.session.level_time > 0.0);
}

// ── Level completion ──────────────────────────────────────────────────────────

#[test]
fn level_one_clears_on_timer() {
    let mut game = make_game(1);
    game.session.level_time = 24.99;
    let mut rng = seeded_rng();

    step(&mut game, &idle(), &mut rng);

    assert_eq!(game.screen, Screen::Story(StoryArc::Level2));
    assert!(game.effects.sounds().any(|c| c == Cue::LevelComplete));
}

#[test]
fn level_one_not_cleared_early() {
    let mut game = make_game(1);
    game.session.level_time = 20.0;
    step(&mut game, &idle(), &mut seeded_rng());
    assert_eq!(game.screen, Screen::Playing);
}

#[test]
fn level_two_clears_on_kill_target() {
    let mut game = make_game(2);
    game.session.kills = game.tuning.level2_kill_target - 1;
    game.session.enemies.push(Enemy {
        pos: Vec2::new(200.0, 200.0),
        vel: Vec2::ZERO,
        radius: 20.0,
        alive: true,
    });
    game.session.bullets.push(Bullet {
        pos: Vec2::new(200.0, 200.0),
        vel: Vec2::ZERO,
        radius: 6.0,
        alive: true,
    });

    step(&mut game, &idle(), &mut seeded_rng());

    assert_eq!(game.screen, Screen::Story(StoryArc::Level3));
}

#[test]
fn level_two_spawn_cap_is_independent_of_kills() {
    let mut game = make_game(2);
    game.session.timers.enemies_spawned = game.tuning.level2_spawn_cap;
    let mut rng = seeded_rng();

    for _ in 0..300 {
        spawner::run(
            &mut game.session,
            DT,
            false,
            bounds(),
            &game.tuning,
            &mut rng,
            &mut Effects::default(),
        );
    }

    assert!(game.session.enemies.is_empty());
    assert_eq!(game.session.kills, 0);
    assert!(!game.session.level_cleared(&game.tuning));
}

#[test]
fn entering_level_three_arms_the_boss() {
    let mut game = make_game(2);
    game.screen = Screen::Playing;
    game.fire(Event::LevelCleared(2), bounds());
    assert_eq!(game.screen, Screen::Story(StoryArc::Level3));
    game.fire(Event::StoryDone, bounds());

    assert_eq!(game.screen, Screen::LevelIntro { level: 3 });
    assert!(game.session.boss.alive);
    assert_eq!(game.session.boss.hp, game.tuning.boss_hp);
    assert!(game.session.enemies.is_empty());
}

#[test]
fn destroying_the_boss_wins() {
    let mut game = make_game(3);
    game.session.score = 500;
    game.session.boss.pos = Vec2::new(400.0, 130.0);
    game.session.boss.vel = Vec2::ZERO;
    game.session.boss.hp = game.tuning.boss_damage;
    game.session.bullets.push(Bullet {
        pos: Vec2::new(400.0, 150.0),
        vel: Vec2::ZERO,
        radius: 6.0,
        alive: true,
    });

    step(&mut game, &idle(), &mut seeded_rng());

    assert_eq!(game.screen, Screen::Story(StoryArc::Victory));
    assert!(game.session.won);
    assert!(game.effects.contains(&Effect::Music(Mood::Triumphant)));
    assert_eq!(game.high_score, game.session.score);
}

// ── Defeat ────────────────────────────────────────────────────────────────────

#[test]
fn losing_last_life_plays_defeat_story_and_saves() {
    let mut game = make_game(1);
    game.session.player.lives = 1;
    game.session.score = 40;
    let at = game.session.player.pos;
    game.session.asteroids.push(Asteroid { pos: at, vel: Vec2::ZERO, radius: 30.0, alive: true });

    step(&mut game, &idle(), &mut seeded_rng());

    assert_eq!(game.screen, Screen::Story(StoryArc::Defeat));
    assert!(!game.session.won);
    assert!(game.effects.contains(&Effect::PersistHighScore(40)));
    assert!(game.effects.contains(&Effect::Music(Mood::Sad)));
    assert_eq!(game.high_score, 40);
}

#[test]
fn defeat_story_ends_on_game_over_then_menu() {
    let mut game = make_game(1);
    game.screen = Screen::Story(StoryArc::Defeat);
    let mut rng = seeded_rng();

    for _ in 0..StoryArc::Defeat.slides().len() {
        step(&mut game, &press(Key::Enter), &mut rng);
    }
    assert_eq!(game.screen, Screen::GameOver);

    step(&mut game, &press(Key::Enter), &mut rng);
    assert_eq!(game.screen, Screen::Menu);
}

#[test]
fn lower_score_does_not_persist() {
    let mut game = make_game(1);
    game.high_score = 100;
    game.session.score = 40;
    game.session.player.lives = 1;
    let at = game.session.player.pos;
    game.session.asteroids.push(Asteroid { pos: at, vel: Vec2::ZERO, radius: 30.0, alive: true });

    step(&mut game, &idle(), &mut seeded_rng());

    assert_eq!(game.screen, Screen::Story(StoryArc::Defeat));
    assert!(!game.effects.iter().any(|e| matches!(e, Effect::PersistHighScore(_))));
    assert_eq!(game.high_score, 100);
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn pause_freezes_simulation() {
    let mut game = make_game(1);
    let mut rng = seeded_rng();
    step(&mut game, &idle(), &mut rng);

    step(&mut game, &press(Key::P), &mut rng);
    assert_eq!(game.screen, Screen::Paused);

    let time = game.session.level_time;
    let asteroids: Vec<Vec2> = game.session.asteroids.iter().map(|a| a.pos).collect();
    for _ in 0..30 {
        step(&mut game, &FrameInput::new().hold(Key::Left), &mut rng);
    }
    assert_eq!(game.session.level_time, time);
    let after: Vec<Vec2> = game.session.asteroids.iter().map(|a| a.pos).collect();
    assert_eq!(asteroids, after);

    step(&mut game, &press(Key::Escape), &mut rng);
    assert_eq!(game.screen, Screen::Playing);
}

#[test]
fn quitting_from_pause_saves_and_returns_to_menu() {
    let mut game = make_game(1);
    game.session.score = 75;
    let mut rng = seeded_rng();

    step(&mut game, &press(Key::Escape), &mut rng);
    step(&mut game, &press(Key::Q), &mut rng);

    assert_eq!(game.screen, Screen::Menu);
    assert!(game.effects.contains(&Effect::PersistHighScore(75)));
}

#[test]
fn restart_from_menu_resets_session() {
    let mut game = make_game(2);
    game.session.score = 90;
    game.session.player.lives = 1;
    game.screen = Screen::Menu;

    step(&mut game, &press(Key::Enter), &mut seeded_rng());

    assert_eq!(game.session.score, 0);
    assert_eq!(game.session.player.lives, game.tuning.player_lives);
    assert_eq!(game.session.level, 1);
}

// ── Player control ────────────────────────────────────────────────────────────

#[test]
fn held_arrow_moves_player() {
    let mut game = make_game(1);
    let start = game.session.player.pos;
    step(&mut game, &FrameInput::new().hold(Key::Left), &mut seeded_rng());
    assert!(game.session.player.pos.x < start.x);
    assert_eq!(game.session.player.pos.y, start.y);
}

#[test]
fn space_fires_when_auto_fire_is_off() {
    let mut game = make_game(1);
    let mut rng = seeded_rng();
    step(&mut game, &idle(), &mut rng);
    assert!(game.session.bullets.is_empty());

    step(&mut game, &FrameInput::new().hold(Key::Space), &mut rng);
    assert_eq!(game.session.bullets.len(), 1);
    assert!(game.effects.sounds().any(|c| c == Cue::Shoot));
}

#[test]
fn double_shot_fires_two_bullets() {
    let mut game = make_game(1);
    game.session.buffs.double_shot = 5.0;
    step(&mut game, &FrameInput::new().hold(Key::Space), &mut seeded_rng());
    assert_eq!(game.session.bullets.len(), 2);
}
