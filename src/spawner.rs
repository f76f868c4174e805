/// Timer-driven entity creation.
///
/// Each spawn class owns an independent countdown.  When it reaches zero
/// one spawn happens and the countdown is reloaded.  Constructors draw
/// their attributes from uniform ranges through the injected RNG.

use glam::Vec2;
use rand::Rng;

use crate::config::{Difficulty, Tuning};
use crate::effects::{Cue, Effects};
use crate::entities::{
    Asteroid, Blast, Boss, Bullet, Enemy, EnemyBullet, Explosion, Player, PowerUp, PowerUpKind,
};
use crate::kinematics::Bounds;
use crate::session::Session;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnTimers {
    pub asteroid: f32,
    /// Reload value for `asteroid`, already divided by the difficulty.
    pub asteroid_interval: f32,
    pub enemy: f32,
    /// `None` on levels without enemy fighters.
    pub enemy_interval: Option<f32>,
    pub enemy_fire: f32,
    pub boss_fire: f32,
    /// Player fire cooldown.  Survives level changes.
    pub fire: f32,
    /// Enemies created in the current level, alive or not.
    pub enemies_spawned: u32,
}

impl SpawnTimers {
    pub fn for_level(level: u8, tuning: &Tuning, difficulty: Difficulty) -> Self {
        SpawnTimers {
            asteroid: 0.0,
            asteroid_interval: tuning.asteroid_interval(level) / difficulty.multiplier(),
            enemy: 0.0,
            enemy_interval: tuning.enemy_interval(level),
            enemy_fire: 0.0,
            boss_fire: if level == 3 { tuning.boss_first_volley } else { 0.0 },
            fire: 0.0,
            enemies_spawned: 0,
        }
    }
}

/// Run every spawn countdown for one frame.
pub fn run(
    s: &mut Session,
    dt: f32,
    trigger: bool,
    bounds: Bounds,
    tuning: &Tuning,
    rng: &mut impl Rng,
    fx: &mut Effects,
) {
    // Player fire
    s.timers.fire -= dt;
    if s.timers.fire <= 0.0 && trigger {
        s.bullets
            .extend(player_volley(&s.player, s.buffs.has_double_shot(), tuning));
        fx.play(Cue::Shoot, 0.3);
        s.timers.fire = tuning.fire_cooldown;
    }

    // Asteroids
    s.timers.asteroid -= dt;
    if s.timers.asteroid <= 0.0 {
        s.asteroids.push(asteroid(rng, bounds, tuning));
        s.timers.asteroid = s.timers.asteroid_interval;
    }

    // Enemy fighters
    if let Some(interval) = s.timers.enemy_interval {
        s.timers.enemy -= dt;
        if s.timers.enemy <= 0.0 {
            let alive = s.enemies.iter().filter(|e| e.alive).count();
            let capped = s.level == 2 && s.timers.enemies_spawned >= tuning.level2_spawn_cap;
            if !capped && alive < tuning.max_enemies {
                s.timers.enemies_spawned += 1;
                s.enemies.push(enemy(rng, bounds, tuning));
            }
            s.timers.enemy = interval;
        }

        s.timers.enemy_fire -= dt;
        if s.timers.enemy_fire <= 0.0 {
            for e in s.enemies.iter().filter(|e| e.alive) {
                s.enemy_bullets.push(EnemyBullet {
                    pos: e.pos + Vec2::new(0.0, e.radius),
                    vel: Vec2::new(0.0, tuning.enemy_bullet_speed),
                    radius: tuning.enemy_bullet_radius,
                    alive: true,
                });
            }
            s.timers.enemy_fire = tuning.enemy_fire_cooldown;
        }
    }

    // Boss
    if s.level == 3 && s.boss.alive {
        s.timers.boss_fire -= dt;
        if s.timers.boss_fire <= 0.0 {
            if let Some(pair) = boss_volley(&s.boss, tuning) {
                s.enemy_bullets.extend(pair);
            }
            s.timers.boss_fire = tuning.boss_fire_cooldown;
        }
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn asteroid(rng: &mut impl Rng, bounds: Bounds, tuning: &Tuning) -> Asteroid {
    Asteroid {
        pos: Vec2::new(uniform(rng, 10.0, bounds.width - 10.0), -30.0),
        vel: Vec2::new(rng.gen_range(-20.0..=20.0), rng.gen_range(80.0..=150.0)),
        radius: uniform(rng, tuning.asteroid_radius_min, tuning.asteroid_radius_max),
        alive: true,
    }
}

pub fn enemy(rng: &mut impl Rng, bounds: Bounds, tuning: &Tuning) -> Enemy {
    Enemy {
        pos: Vec2::new(uniform(rng, 40.0, bounds.width - 40.0), -40.0),
        vel: Vec2::new(rng.gen_range(-40.0..=40.0), rng.gen_range(80.0..=130.0)),
        radius: tuning.enemy_radius,
        alive: true,
    }
}

/// One bullet from the nose, or two side by side under double shot.
pub fn player_volley(player: &Player, double: bool, tuning: &Tuning) -> Vec<Bullet> {
    let nose = player.pos - Vec2::new(0.0, player.radius);
    let bullet = |pos: Vec2| Bullet {
        pos,
        vel: Vec2::new(0.0, -tuning.bullet_speed),
        radius: tuning.bullet_radius,
        alive: true,
    };
    if double {
        let spread = Vec2::new(tuning.double_shot_spread, 0.0);
        vec![bullet(nose - spread), bullet(nose + spread)]
    } else {
        vec![bullet(nose)]
    }
}

/// Symmetric pair from the two muzzles.  Nothing while the boss is dead.
pub fn boss_volley(boss: &Boss, tuning: &Tuning) -> Option<[EnemyBullet; 2]> {
    if !boss.alive {
        return None;
    }
    let shot = |dx: f32| EnemyBullet {
        pos: boss.pos + Vec2::new(dx, boss.radius * 0.5),
        vel: Vec2::new(0.0, tuning.boss_bullet_speed),
        radius: tuning.enemy_bullet_radius,
        alive: true,
    };
    Some([shot(-tuning.boss_muzzle_spread), shot(tuning.boss_muzzle_spread)])
}

/// Roll for a power-up drop where an enemy died.
pub fn drop_power_up(rng: &mut impl Rng, pos: Vec2, tuning: &Tuning) -> Option<PowerUp> {
    if rng.gen::<f32>() > tuning.powerup_chance {
        return None;
    }
    let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
    Some(PowerUp {
        pos,
        vel: Vec2::new(0.0, tuning.powerup_speed),
        radius: tuning.powerup_radius,
        kind,
        alive: true,
    })
}

pub fn explosion(pos: Vec2, radius: f32, blast: Blast, tuning: &Tuning) -> Explosion {
    let duration = match blast {
        Blast::Rock => tuning.explosion_asteroid,
        Blast::Ship => tuning.explosion_ship,
    };
    Explosion { pos, timer: duration, duration, radius, blast }
}

/// `gen_range` panics on an empty range; a playfield narrower than the
/// spawn margins collapses to its midpoint instead.
fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        (lo + hi) / 2.0
    }
}
