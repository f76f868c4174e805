/// Game entity records: pure data, no logic.

use glam::Vec2;

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Fire action emits two laterally offset bullets.
    DoubleShot,
    /// Player movement speed scaled while active.
    SpeedBoost,
    /// Player damage is ignored while active.
    Shield,
    /// Instantly adds one life.  No timer.
    ExtraLife,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::DoubleShot,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shield,
        PowerUpKind::ExtraLife,
    ];

    /// Two-character badge drawn on the pickup.
    pub fn badge(self) -> &'static str {
        match self {
            PowerUpKind::DoubleShot => "2X",
            PowerUpKind::SpeedBoost => "SP",
            PowerUpKind::Shield => "SH",
            PowerUpKind::ExtraLife => "+1",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
    pub alive: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    /// Base speed in px/s; speed boost is applied on top while moving.
    pub speed: f32,
    pub radius: f32,
    pub lives: u32,
    /// Seconds of invincibility left after a hit.
    pub invincible: f32,
}

// ── Hazards ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: i32,
    pub max_hp: i32,
    /// Height at which the boss stops descending and only patrols sideways.
    pub cruise_y: f32,
    pub alive: bool,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A player bullet.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

/// A bullet fired by an enemy fighter or the boss.
#[derive(Clone, Debug)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

// ── Presentation ──────────────────────────────────────────────────────────────

/// Which explosion sprite to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blast {
    Rock,
    Ship,
}

/// A short-lived explosion visual.  No gameplay effect.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub pos: Vec2,
    /// Seconds remaining.
    pub timer: f32,
    pub duration: f32,
    /// Radius of whatever blew up; the sprite is scaled to twice this.
    pub radius: f32,
    pub blast: Blast,
}
