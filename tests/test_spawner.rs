use starfall::buffs::*;
use starfall::config::{Difficulty, Tuning};
use starfall::effects::Effects;
use starfall::entities::*;
use starfall::kinematics::Bounds;
use starfall::session::Session;
use starfall::spawner::*;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bounds() -> Bounds {
    Bounds::new(800.0, 600.0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_session(level: u8, difficulty: Difficulty) -> (Session, Tuning) {
    let tuning = Tuning::default();
    let mut s = Session::new(&tuning, bounds());
    s.start_level(level, &tuning, difficulty, bounds());
    (s, tuning)
}

fn run_for(s: &mut Session, tuning: &Tuning, frames: usize, dt: f32, rng: &mut StdRng) {
    for _ in 0..frames {
        run(s, dt, false, bounds(), tuning, rng, &mut Effects::default());
    }
}

// ── Timers ────────────────────────────────────────────────────────────────────

#[test]
fn asteroid_interval_scales_with_difficulty() {
    let t = Tuning::default();
    let normal = SpawnTimers::for_level(1, &t, Difficulty::Normal);
    let hard = SpawnTimers::for_level(1, &t, Difficulty::Hard);
    let easy = SpawnTimers::for_level(1, &t, Difficulty::Easy);
    assert_eq!(normal.asteroid_interval, 0.5);
    assert!(hard.asteroid_interval < normal.asteroid_interval);
    assert!(easy.asteroid_interval > normal.asteroid_interval);
    assert!((hard.asteroid_interval - 0.5 / 1.4).abs() < 1e-6);
}

#[test]
fn harder_sessions_spawn_more_asteroids() {
    let mut rng = seeded_rng();
    let (mut easy, t) = make_session(1, Difficulty::Easy);
    run_for(&mut easy, &t, 30, 0.1, &mut rng);
    let (mut hard, _) = make_session(1, Difficulty::Hard);
    run_for(&mut hard, &t, 30, 0.1, &mut rng);
    assert!(hard.asteroids.len() > easy.asteroids.len());
}

#[test]
fn enemies_only_from_level_two() {
    let t = Tuning::default();
    assert_eq!(SpawnTimers::for_level(1, &t, Difficulty::Normal).enemy_interval, None);
    assert_eq!(SpawnTimers::for_level(2, &t, Difficulty::Normal).enemy_interval, Some(2.0));
    assert_eq!(SpawnTimers::for_level(3, &t, Difficulty::Normal).enemy_interval, Some(2.5));
}

#[test]
fn asteroids_spawn_on_their_interval() {
    let (mut s, t) = make_session(1, Difficulty::Normal);
    let mut rng = seeded_rng();
    // Fires immediately, then every 0.5 s.
    run_for(&mut s, &t, 10, 0.1, &mut rng);
    assert_eq!(s.asteroids.len(), 2);
    assert!(s.enemies.is_empty());
}

#[test]
fn spawned_asteroids_start_above_screen() {
    let (mut s, t) = make_session(1, Difficulty::Normal);
    let mut rng = seeded_rng();
    run_for(&mut s, &t, 100, 0.1, &mut rng);
    for a in &s.asteroids {
        assert!(a.pos.y < 0.0);
        assert!(a.radius >= t.asteroid_radius_min && a.radius <= t.asteroid_radius_max);
        assert!(a.vel.y > 0.0);
    }
}

#[test]
fn enemy_population_is_capped() {
    let (mut s, t) = make_session(3, Difficulty::Normal);
    let mut rng = seeded_rng();
    run_for(&mut s, &t, 400, 0.1, &mut rng);
    assert_eq!(s.enemies.len(), t.max_enemies);
}

#[test]
fn level_two_stops_after_spawn_cap() {
    let (mut s, t) = make_session(2, Difficulty::Normal);
    s.timers.enemies_spawned = t.level2_spawn_cap - 1;
    let mut rng = seeded_rng();
    run_for(&mut s, &t, 100, 0.1, &mut rng);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.timers.enemies_spawned, t.level2_spawn_cap);
}

#[test]
fn enemies_fire_downward() {
    let (mut s, t) = make_session(2, Difficulty::Normal);
    s.enemies.push(Enemy { pos: Vec2::new(100.0, 100.0), vel: Vec2::ZERO, radius: 20.0, alive: true });
    let mut rng = seeded_rng();
    run_for(&mut s, &t, 1, 0.1, &mut rng);
    assert!(!s.enemy_bullets.is_empty());
    assert!(s.enemy_bullets.iter().all(|b| b.vel.y > 0.0 && b.vel.x == 0.0));
}

#[test]
fn boss_waits_before_first_volley() {
    let (mut s, t) = make_session(3, Difficulty::Normal);
    let mut rng = seeded_rng();
    run_for(&mut s, &t, 9, 0.1, &mut rng);
    let boss_shots = |s: &Session| s.enemy_bullets.iter().filter(|b| b.vel.y == t.boss_bullet_speed).count();
    assert_eq!(boss_shots(&s), 0);
    run_for(&mut s, &t, 2, 0.1, &mut rng);
    assert_eq!(boss_shots(&s), 2);
}

// ── Constructors ──────────────────────────────────────────────────────────────

#[test]
fn single_and_double_volley() {
    let t = Tuning::default();
    let player = Player { pos: Vec2::new(400.0, 540.0), speed: 180.0, radius: 30.0, lives: 3, invincible: 0.0 };

    let one = player_volley(&player, false, &t);
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].pos, Vec2::new(400.0, 510.0));
    assert_eq!(one[0].vel, Vec2::new(0.0, -t.bullet_speed));
    assert_eq!(one[0].radius, t.bullet_radius);

    let two = player_volley(&player, true, &t);
    assert_eq!(two.len(), 2);
    assert_eq!(two[0].pos.x, 400.0 - t.double_shot_spread);
    assert_eq!(two[1].pos.x, 400.0 + t.double_shot_spread);
}

#[test]
fn dead_boss_does_not_fire() {
    let t = Tuning::default();
    let (s, _) = make_session(3, Difficulty::Normal);
    assert!(boss_volley(&s.boss, &t).is_some());
    let mut dead = s.boss.clone();
    dead.alive = false;
    assert!(boss_volley(&dead, &t).is_none());
}

#[test]
fn power_up_drop_chance_extremes() {
    let mut t = Tuning::default();
    let mut rng = seeded_rng();
    t.powerup_chance = 1.0;
    for _ in 0..20 {
        let p = drop_power_up(&mut rng, Vec2::new(5.0, 5.0), &t).expect("guaranteed drop");
        assert_eq!(p.vel, Vec2::new(0.0, t.powerup_speed));
    }
    t.powerup_chance = 0.0;
    for _ in 0..20 {
        assert!(drop_power_up(&mut rng, Vec2::ZERO, &t).is_none());
    }
}

#[test]
fn narrow_playfield_does_not_panic() {
    let t = Tuning::default();
    let a = asteroid(&mut seeded_rng(), Bounds::new(5.0, 100.0), &t);
    assert_eq!(a.pos.x, 2.5);
    let e = enemy(&mut seeded_rng(), Bounds::new(50.0, 100.0), &t);
    assert_eq!(e.pos.x, 25.0);
}

// ── Buffs and shake ───────────────────────────────────────────────────────────

#[test]
fn repeated_pickup_restarts_rather_than_stacks() {
    let mut b = Buffs::default();
    assert_eq!(b.apply(PowerUpKind::DoubleShot, 8.0), Pickup::Timed);
    b.tick(5.0);
    assert_eq!(b.double_shot, 3.0);
    b.apply(PowerUpKind::DoubleShot, 8.0);
    assert_eq!(b.double_shot, 8.0);
}

#[test]
fn buffs_expire_at_zero() {
    let mut b = Buffs::default();
    b.apply(PowerUpKind::SpeedBoost, 1.0);
    b.apply(PowerUpKind::Shield, 2.0);
    b.tick(1.5);
    assert!(!b.has_speed_boost());
    assert_eq!(b.speed_boost, 0.0);
    assert!(b.has_shield());
    assert!(!b.has_double_shot());
}

#[test]
fn extra_life_leaves_timers_alone() {
    let mut b = Buffs::default();
    assert_eq!(b.apply(PowerUpKind::ExtraLife, 8.0), Pickup::ExtraLife);
    assert_eq!(b, Buffs::default());
}

#[test]
fn shake_latest_trigger_wins_and_decays() {
    let mut shake = ScreenShake::default();
    let mut rng = seeded_rng();
    assert_eq!(shake.offset(&mut rng), Vec2::ZERO);

    shake.trigger(Shake::LARGE);
    shake.trigger(Shake::SMALL);
    assert_eq!(shake.intensity, 3.0);
    let off = shake.offset(&mut rng);
    assert!(off.x.abs() <= 3.0 && off.y.abs() <= 3.0);

    shake.tick(0.2);
    assert!(!shake.is_active());
}
