/// Gameplay tuning. Every constant the simulation reads lives here.
///
/// `Tuning::default()` is the shipped game.  An optional TOML file can
/// override any subset of fields; missing fields keep their defaults.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

// ── Difficulty ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Effective asteroid spawn-rate multiplier.
    pub fn multiplier(self) -> f32 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }

    /// One step easier, saturating at `Easy`.
    pub fn easier(self) -> Self {
        match self {
            Difficulty::Easy | Difficulty::Normal => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Normal,
        }
    }

    /// One step harder, saturating at `Hard`.
    pub fn harder(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal | Difficulty::Hard => Difficulty::Hard,
        }
    }
}

// ── Tuning ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Player
    pub player_speed: f32,
    pub player_radius: f32,
    pub player_lives: u32,
    pub invincibility: f32,
    /// Distance of the spawn point above the bottom edge.
    pub player_start_offset: f32,
    pub fire_cooldown: f32,
    pub auto_fire: bool,

    // Projectiles
    pub bullet_radius: f32,
    pub bullet_speed: f32,
    pub enemy_bullet_radius: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_fire_cooldown: f32,
    pub boss_bullet_speed: f32,
    pub boss_fire_cooldown: f32,
    pub boss_first_volley: f32,
    pub boss_muzzle_spread: f32,
    pub double_shot_spread: f32,

    // Asteroids
    pub asteroid_radius_min: f32,
    pub asteroid_radius_max: f32,
    pub asteroid_spawn_intervals: [f32; 3],

    // Enemies
    pub enemy_radius: f32,
    pub enemy_spawn_interval_level2: f32,
    pub enemy_spawn_interval_level3: f32,
    pub max_enemies: usize,
    /// Exit margin below the bottom edge for enemies, power-ups and bullets.
    pub exit_margin: f32,

    // Boss
    pub boss_hp: i32,
    pub boss_radius: f32,
    pub boss_damage: i32,
    pub boss_speed: f32,
    pub boss_descent_speed: f32,
    pub boss_cruise_y: f32,

    // Scoring
    pub score_asteroid: u32,
    pub score_enemy: u32,
    pub score_boss_hit: u32,

    // Progression
    pub level1_duration: f32,
    pub level2_kill_target: u32,
    pub level2_spawn_cap: u32,

    // Power-ups
    pub powerup_chance: f32,
    pub powerup_speed: f32,
    pub powerup_radius: f32,
    pub powerup_duration: f32,
    pub speed_boost: f32,

    // Explosions
    pub explosion_asteroid: f32,
    pub explosion_ship: f32,

    // Story
    pub typewriter_rate: f32,
    pub fade_in: f32,
    pub auto_advance: f32,
    pub skip_hold: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 180.0,
            player_radius: 30.0,
            player_lives: 3,
            invincibility: 2.0,
            player_start_offset: 60.0,
            fire_cooldown: 0.30,
            auto_fire: true,

            bullet_radius: 6.0,
            bullet_speed: 350.0,
            enemy_bullet_radius: 4.0,
            enemy_bullet_speed: 220.0,
            enemy_fire_cooldown: 1.5,
            boss_bullet_speed: 260.0,
            boss_fire_cooldown: 1.2,
            boss_first_volley: 1.0,
            boss_muzzle_spread: 30.0,
            double_shot_spread: 15.0,

            asteroid_radius_min: 24.0,
            asteroid_radius_max: 40.0,
            asteroid_spawn_intervals: [0.5, 0.7, 0.9],

            enemy_radius: 20.0,
            enemy_spawn_interval_level2: 2.0,
            enemy_spawn_interval_level3: 2.5,
            max_enemies: 4,
            exit_margin: 20.0,

            boss_hp: 200,
            boss_radius: 60.0,
            boss_damage: 5,
            boss_speed: 90.0,
            boss_descent_speed: 60.0,
            boss_cruise_y: 130.0,

            score_asteroid: 5,
            score_enemy: 10,
            score_boss_hit: 25,

            level1_duration: 25.0,
            level2_kill_target: 15,
            level2_spawn_cap: 15,

            powerup_chance: 0.15,
            powerup_speed: 80.0,
            powerup_radius: 15.0,
            powerup_duration: 8.0,
            speed_boost: 1.5,

            explosion_asteroid: 0.25,
            explosion_ship: 0.35,

            typewriter_rate: 40.0,
            fade_in: 0.5,
            auto_advance: 8.0,
            skip_hold: 1.5,
        }
    }
}

impl Tuning {
    /// Asteroid spawn interval for a level (1-based), before difficulty.
    pub fn asteroid_interval(&self, level: u8) -> f32 {
        let idx = (level.clamp(1, 3) - 1) as usize;
        self.asteroid_spawn_intervals[idx]
    }

    /// Enemy spawn interval for a level; `None` where enemies never spawn.
    pub fn enemy_interval(&self, level: u8) -> Option<f32> {
        match level {
            2 => Some(self.enemy_spawn_interval_level2),
            3 => Some(self.enemy_spawn_interval_level3),
            _ => None,
        }
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("malformed tuning file")
    }

    /// Load overrides from `path`.  A missing file is the default tuning; a
    /// malformed one is logged and also falls back to the default.
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                log::debug!("no tuning file at {}, using defaults", path.display());
                return Self::default();
            }
        };
        match Self::parse(&text) {
            Ok(tuning) => {
                log::info!("loaded tuning overrides from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("ignoring {}: {e:#}", path.display());
                Self::default()
            }
        }
    }
}
