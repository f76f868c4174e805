/// The gameplay session aggregate and its per-frame simulation.
///
/// `Session` owns every entity collection, timer and counter of a run.
/// `simulate` advances it by one frame in a fixed order: timers, player,
/// spawner, entity motion, collision pass, then compaction of the dead.

use glam::Vec2;
use rand::Rng;

use crate::buffs::{Buffs, ScreenShake};
use crate::collision::{self, Outcome};
use crate::config::{Difficulty, Tuning};
use crate::effects::Effects;
use crate::entities::{Asteroid, Boss, Bullet, Enemy, EnemyBullet, Explosion, Player, PowerUp};
use crate::input::{FrameInput, Key};
use crate::kinematics::{sweep, Bounds};
use crate::spawner::{self, SpawnTimers};

#[derive(Clone, Debug)]
pub struct Session {
    pub player: Player,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub powerups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub boss: Boss,
    pub buffs: Buffs,
    pub shake: ScreenShake,
    pub timers: SpawnTimers,
    /// 1 to 3.
    pub level: u8,
    pub level_time: f32,
    pub score: u32,
    /// Hits taken over the whole run.
    pub hits: u32,
    /// Enemies destroyed in the current level.
    pub kills: u32,
    pub won: bool,
}

impl Session {
    /// A fresh run: full lives, empty playfield, boss dormant.
    pub fn new(tuning: &Tuning, bounds: Bounds) -> Self {
        Session {
            player: Player {
                pos: start_position(tuning, bounds),
                speed: tuning.player_speed,
                radius: tuning.player_radius,
                lives: tuning.player_lives,
                invincible: 0.0,
            },
            asteroids: Vec::with_capacity(30),
            bullets: Vec::with_capacity(50),
            enemies: Vec::with_capacity(10),
            enemy_bullets: Vec::with_capacity(50),
            powerups: Vec::with_capacity(10),
            explosions: Vec::with_capacity(20),
            boss: Boss {
                pos: Vec2::new(bounds.width / 2.0, -tuning.boss_radius),
                vel: Vec2::ZERO,
                radius: tuning.boss_radius,
                hp: tuning.boss_hp,
                max_hp: tuning.boss_hp,
                cruise_y: tuning.boss_cruise_y,
                alive: false,
            },
            buffs: Buffs::default(),
            shake: ScreenShake::default(),
            timers: SpawnTimers::default(),
            level: 1,
            level_time: 0.0,
            score: 0,
            hits: 0,
            kills: 0,
            won: false,
        }
    }

    /// Set the playfield up for `level`: hostile and player projectiles are
    /// cleared, rates are configured for the level and difficulty, the player
    /// returns to the start position and, in level 3, the boss is armed.
    pub fn start_level(
        &mut self,
        level: u8,
        tuning: &Tuning,
        difficulty: Difficulty,
        bounds: Bounds,
    ) {
        self.level = level;
        self.level_time = 0.0;
        self.kills = 0;

        self.bullets.clear();
        self.asteroids.clear();
        self.enemies.clear();
        self.enemy_bullets.clear();

        self.timers = SpawnTimers::for_level(level, tuning, difficulty);

        if level == 3 {
            self.boss = Boss {
                pos: Vec2::new(bounds.width / 2.0, -tuning.boss_radius),
                vel: Vec2::new(tuning.boss_speed, tuning.boss_descent_speed),
                radius: tuning.boss_radius,
                hp: tuning.boss_hp,
                max_hp: tuning.boss_hp,
                cruise_y: tuning.boss_cruise_y,
                alive: true,
            };
        }

        self.player.pos = start_position(tuning, bounds);
        self.player.invincible = 0.0;
    }

    /// Level-specific completion rule.  Only meaningful while lives remain.
    pub fn level_cleared(&self, tuning: &Tuning) -> bool {
        if self.player.lives == 0 {
            return false;
        }
        match self.level {
            1 => self.level_time >= tuning.level1_duration,
            2 => self.kills >= tuning.level2_kill_target,
            3 => !self.boss.alive,
            _ => false,
        }
    }
}

fn start_position(tuning: &Tuning, bounds: Bounds) -> Vec2 {
    Vec2::new(bounds.width / 2.0, bounds.height - tuning.player_start_offset)
}

// ── Per-frame simulation ─────────────────────────────────────────────────────

/// Advance a live level by `dt` seconds.
///
/// All randomness comes through `rng` so callers control determinism.
pub fn simulate(
    s: &mut Session,
    input: &FrameInput,
    dt: f32,
    bounds: Bounds,
    tuning: &Tuning,
    rng: &mut impl Rng,
    fx: &mut Effects,
) -> Outcome {
    s.level_time += dt;

    // ── 1. Timers ─────────────────────────────────────────────────────────────
    s.buffs.tick(dt);
    s.shake.tick(dt);
    s.player.tick_invincibility(dt);

    // ── 2. Player ─────────────────────────────────────────────────────────────
    let speed = if s.buffs.has_speed_boost() {
        s.player.speed * tuning.speed_boost
    } else {
        s.player.speed
    };
    s.player.steer(input.axis(), speed, dt, bounds);

    // ── 3. Spawns ─────────────────────────────────────────────────────────────
    let trigger = tuning.auto_fire || input.held(Key::Space);
    spawner::run(s, dt, trigger, bounds, tuning, rng, fx);

    // ── 4. Motion ─────────────────────────────────────────────────────────────
    let margin = tuning.exit_margin;
    for p in s.powerups.iter_mut().filter(|p| p.alive) {
        p.advance(dt, bounds, margin);
    }
    for b in s.bullets.iter_mut().filter(|b| b.alive) {
        b.advance(dt, bounds, margin);
    }
    for a in s.asteroids.iter_mut().filter(|a| a.alive) {
        a.advance(dt, bounds, tuning.asteroid_radius_min);
    }
    for e in s.enemies.iter_mut().filter(|e| e.alive) {
        e.advance(dt, bounds, margin);
    }
    for eb in s.enemy_bullets.iter_mut().filter(|eb| eb.alive) {
        eb.advance(dt, bounds, margin);
    }
    if s.level == 3 && s.boss.alive {
        s.boss.advance(dt, bounds);
    }
    for ex in s.explosions.iter_mut() {
        ex.advance(dt);
    }

    // ── 5. Collisions ─────────────────────────────────────────────────────────
    let outcome = collision::resolve(s, tuning, rng, fx);

    // ── 6. Compaction ─────────────────────────────────────────────────────────
    sweep(&mut s.bullets);
    sweep(&mut s.asteroids);
    sweep(&mut s.enemies);
    sweep(&mut s.enemy_bullets);
    sweep(&mut s.powerups);
    s.explosions.retain(|ex| !ex.is_done());

    log::trace!(
        "level {} t={:.2} asteroids={} enemies={} bullets={}",
        s.level,
        s.level_time,
        s.asteroids.len(),
        s.enemies.len(),
        s.bullets.len()
    );

    outcome
}
