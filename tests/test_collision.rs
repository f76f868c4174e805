use starfall::buffs::Pickup;
use starfall::collision::{damage_player, overlaps, resolve, Damage};
use starfall::config::{Difficulty, Tuning};
use starfall::effects::{Cue, Effects};
use starfall::entities::*;
use starfall::kinematics::Bounds;
use starfall::session::Session;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bounds() -> Bounds {
    Bounds::new(800.0, 600.0)
}

fn make_session(level: u8) -> (Session, Tuning) {
    let tuning = Tuning::default();
    let mut s = Session::new(&tuning, bounds());
    s.start_level(level, &tuning, Difficulty::Normal, bounds());
    (s, tuning)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn asteroid(x: f32, y: f32, radius: f32) -> Asteroid {
    Asteroid { pos: Vec2::new(x, y), vel: Vec2::ZERO, radius, alive: true }
}

fn bullet(x: f32, y: f32) -> Bullet {
    Bullet { pos: Vec2::new(x, y), vel: Vec2::ZERO, radius: 6.0, alive: true }
}

fn enemy(x: f32, y: f32) -> Enemy {
    Enemy { pos: Vec2::new(x, y), vel: Vec2::ZERO, radius: 20.0, alive: true }
}

// ── overlaps ──────────────────────────────────────────────────────────────────

#[test]
fn touching_circles_collide() {
    let a = asteroid(100.0, 100.0, 30.0);
    assert!(overlaps(&a, &bullet(100.0, 136.0))); // exactly r1 + r2
    assert!(!overlaps(&a, &bullet(100.0, 136.5)));
}

#[test]
fn overlaps_is_symmetric() {
    let a = asteroid(0.0, 0.0, 10.0);
    let b = bullet(12.0, 9.0);
    assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
}

// ── Bullets × asteroids / enemies ─────────────────────────────────────────────

#[test]
fn bullet_destroys_asteroid_and_scores() {
    let (mut s, tuning) = make_session(1);
    s.asteroids.push(asteroid(100.0, 100.0, 30.0));
    s.bullets.push(bullet(100.0, 124.0));
    let mut fx = Effects::default();

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut fx);

    assert!(!s.asteroids[0].alive);
    assert!(!s.bullets[0].alive);
    assert_eq!(s.score, 5);
    assert_eq!(s.explosions.len(), 1);
    assert_eq!(s.explosions[0].blast, Blast::Rock);
    assert!(fx.sounds().any(|c| c == Cue::ExplosionSmall));
}

#[test]
fn one_bullet_hits_at_most_one_target() {
    let (mut s, tuning) = make_session(1);
    s.asteroids.push(asteroid(100.0, 100.0, 30.0));
    s.asteroids.push(asteroid(110.0, 100.0, 30.0));
    s.bullets.push(bullet(105.0, 100.0));

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    let dead = s.asteroids.iter().filter(|a| !a.alive).count();
    assert_eq!(dead, 1);
    assert_eq!(s.score, 5);
}

#[test]
fn dead_asteroid_does_not_absorb_second_bullet() {
    let (mut s, tuning) = make_session(1);
    s.asteroids.push(asteroid(100.0, 100.0, 30.0));
    s.bullets.push(bullet(100.0, 100.0));
    s.bullets.push(bullet(102.0, 100.0));

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert!(!s.bullets[0].alive);
    assert!(s.bullets[1].alive);
}

#[test]
fn enemy_kill_counts_and_scores() {
    let (mut s, tuning) = make_session(2);
    s.enemies.push(enemy(300.0, 200.0));
    s.bullets.push(bullet(300.0, 210.0));

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert!(!s.enemies[0].alive);
    assert_eq!(s.kills, 1);
    assert_eq!(s.score, 10);
}

#[test]
fn guaranteed_drop_spawns_power_up_at_enemy() {
    let (mut s, mut tuning) = make_session(2);
    tuning.powerup_chance = 1.0;
    s.enemies.push(enemy(300.0, 200.0));
    s.bullets.push(bullet(300.0, 200.0));

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert_eq!(s.powerups.len(), 1);
    assert_eq!(s.powerups[0].pos, Vec2::new(300.0, 200.0));
}

// ── Player damage ─────────────────────────────────────────────────────────────

#[test]
fn asteroid_contact_costs_a_life() {
    let (mut s, tuning) = make_session(1);
    let at = s.player.pos;
    s.asteroids.push(asteroid(at.x, at.y, 30.0));
    let mut fx = Effects::default();

    let outcome = resolve(&mut s, &tuning, &mut seeded_rng(), &mut fx);

    assert!(!outcome.defeated);
    assert_eq!(s.player.lives, 2);
    assert_eq!(s.hits, 1);
    assert_eq!(s.player.invincible, tuning.invincibility);
    assert!(!s.asteroids[0].alive);
    assert!(s.shake.is_active());
    assert!(fx.sounds().any(|c| c == Cue::PlayerHit));
}

#[test]
fn second_contact_in_same_frame_is_blocked() {
    let (mut s, tuning) = make_session(1);
    let at = s.player.pos;
    s.asteroids.push(asteroid(at.x - 10.0, at.y, 30.0));
    s.asteroids.push(asteroid(at.x + 10.0, at.y, 30.0));

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert_eq!(s.player.lives, 2);
    assert!(s.asteroids.iter().all(|a| !a.alive));
}

#[test]
fn shield_blocks_damage_but_hazard_still_dies() {
    let (mut s, tuning) = make_session(1);
    s.buffs.shield = 5.0;
    let at = s.player.pos;
    s.asteroids.push(asteroid(at.x, at.y, 30.0));

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert_eq!(s.player.lives, 3);
    assert_eq!(s.hits, 0);
    assert!(!s.asteroids[0].alive);
}

#[test]
fn invincibility_blocks_damage() {
    let (mut s, tuning) = make_session(1);
    s.player.invincible = 1.0;
    let mut fx = Effects::default();
    assert_eq!(damage_player(&mut s, &tuning, &mut fx), Damage::Blocked);
    assert_eq!(s.player.lives, 3);
    assert_eq!(fx.sounds().count(), 0);
}

#[test]
fn last_life_is_a_kill() {
    let (mut s, tuning) = make_session(1);
    s.player.lives = 1;
    let mut fx = Effects::default();

    assert_eq!(damage_player(&mut s, &tuning, &mut fx), Damage::Killed);
    assert_eq!(s.player.lives, 0);
    assert!(s.explosions.iter().any(|e| e.blast == Blast::Ship));
    assert!(fx.sounds().any(|c| c == Cue::GameOver));
}

#[test]
fn enemy_bullet_hits_player() {
    let (mut s, tuning) = make_session(2);
    let at = s.player.pos;
    s.enemy_bullets.push(EnemyBullet { pos: at, vel: Vec2::ZERO, radius: 4.0, alive: true });

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert!(!s.enemy_bullets[0].alive);
    assert_eq!(s.player.lives, 2);
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[test]
fn extra_life_pickup() {
    let (mut s, tuning) = make_session(1);
    s.powerups.push(PowerUp {
        pos: s.player.pos,
        vel: Vec2::ZERO,
        radius: 15.0,
        kind: PowerUpKind::ExtraLife,
        alive: true,
    });
    let mut fx = Effects::default();

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut fx);

    assert_eq!(s.player.lives, 4);
    assert!(!s.powerups[0].alive);
    assert!(fx.sounds().any(|c| c == Cue::PowerUp));
}

#[test]
fn shield_pickup_starts_timer() {
    let (mut s, tuning) = make_session(1);
    s.powerups.push(PowerUp {
        pos: s.player.pos,
        vel: Vec2::ZERO,
        radius: 15.0,
        kind: PowerUpKind::Shield,
        alive: true,
    });

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert_eq!(s.buffs.shield, tuning.powerup_duration);
    assert_eq!(s.buffs.apply(PowerUpKind::ExtraLife, 1.0), Pickup::ExtraLife);
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[test]
fn only_one_bullet_lands_on_boss_per_frame() {
    let (mut s, tuning) = make_session(3);
    s.boss.pos = Vec2::new(400.0, 130.0);
    s.bullets.push(bullet(400.0, 150.0));
    s.bullets.push(bullet(410.0, 150.0));

    let outcome = resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert!(!outcome.boss_destroyed);
    assert_eq!(s.boss.hp, tuning.boss_hp - tuning.boss_damage);
    assert_eq!(s.score, tuning.score_boss_hit);
    assert_eq!(s.bullets.iter().filter(|b| b.alive).count(), 1);
}

#[test]
fn final_hit_destroys_boss() {
    let (mut s, tuning) = make_session(3);
    s.boss.pos = Vec2::new(400.0, 130.0);
    s.boss.hp = tuning.boss_damage;
    s.bullets.push(bullet(400.0, 150.0));

    let outcome = resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert!(outcome.boss_destroyed);
    assert!(!s.boss.alive);
    assert_eq!(s.boss.hp, 0);
    assert!(s.level_cleared(&tuning));
}

#[test]
fn boss_ignored_outside_level_three() {
    let (mut s, tuning) = make_session(2);
    s.boss.alive = true;
    s.boss.pos = Vec2::new(400.0, 130.0);
    s.bullets.push(bullet(400.0, 150.0));

    resolve(&mut s, &tuning, &mut seeded_rng(), &mut Effects::default());

    assert!(s.bullets[0].alive);
    assert_eq!(s.boss.hp, tuning.boss_hp);
}
