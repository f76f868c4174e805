/// Transient global modifiers: power-up countdowns and screen shake.
///
/// A countdown is "seconds remaining"; the effect is active while it is
/// positive.  Picking up a buff that is already running restarts it at the
/// full duration; durations never stack.

use glam::Vec2;
use rand::Rng;

use crate::entities::PowerUpKind;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Buffs {
    pub double_shot: f32,
    pub speed_boost: f32,
    pub shield: f32,
}

/// Result of picking up a power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pickup {
    /// A timed buff was (re)started.
    Timed,
    /// An extra life; the caller owns the lives counter.
    ExtraLife,
}

impl Buffs {
    pub fn has_double_shot(&self) -> bool {
        self.double_shot > 0.0
    }

    pub fn has_speed_boost(&self) -> bool {
        self.speed_boost > 0.0
    }

    pub fn has_shield(&self) -> bool {
        self.shield > 0.0
    }

    pub fn apply(&mut self, kind: PowerUpKind, duration: f32) -> Pickup {
        match kind {
            PowerUpKind::DoubleShot => self.double_shot = duration,
            PowerUpKind::SpeedBoost => self.speed_boost = duration,
            PowerUpKind::Shield => self.shield = duration,
            PowerUpKind::ExtraLife => return Pickup::ExtraLife,
        }
        Pickup::Timed
    }

    pub fn tick(&mut self, dt: f32) {
        for timer in [&mut self.double_shot, &mut self.speed_boost, &mut self.shield] {
            *timer = (*timer - dt).max(0.0);
        }
    }
}

// ── Screen shake ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shake {
    pub intensity: f32,
    pub duration: f32,
}

impl Shake {
    pub const SMALL: Shake = Shake { intensity: 3.0, duration: 0.15 };
    pub const MEDIUM: Shake = Shake { intensity: 6.0, duration: 0.3 };
    pub const LARGE: Shake = Shake { intensity: 10.0, duration: 0.3 };
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenShake {
    pub intensity: f32,
    pub timer: f32,
}

impl ScreenShake {
    /// Latest trigger wins.
    pub fn trigger(&mut self, shake: Shake) {
        self.intensity = shake.intensity;
        self.timer = shake.duration;
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer = (self.timer - dt).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }

    /// Random draw offset while shaking, zero otherwise.
    pub fn offset(&self, rng: &mut impl Rng) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)) * self.intensity
    }
}
