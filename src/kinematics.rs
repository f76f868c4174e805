/// Per-entity motion and liveness rules.
///
/// Every movable entity integrates `pos += vel * dt` and decides for itself
/// whether it has left the playfield.  Nothing dies by crossing the top edge
/// except player bullets, which only ever travel upward.

use glam::Vec2;

use crate::entities::{Asteroid, Boss, Bullet, Enemy, EnemyBullet, Explosion, Player, PowerUp};

/// Playfield size in world pixels, queried from the frontend every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// ── Shared collision capability ──────────────────────────────────────────────

/// Anything with a circular collision volume.
pub trait Body {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
    fn is_alive(&self) -> bool {
        true
    }
}

macro_rules! impl_body {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Body for $ty {
                fn center(&self) -> Vec2 {
                    self.pos
                }
                fn radius(&self) -> f32 {
                    self.radius
                }
                fn is_alive(&self) -> bool {
                    self.alive
                }
            }
        )*
    };
}

impl_body!(Asteroid, Bullet, Enemy, EnemyBullet, Boss, PowerUp);

impl Body for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Drop every dead entity.  Only called once per frame, after all updates
/// and collision passes are done.
pub fn sweep<T: Body>(items: &mut Vec<T>) {
    items.retain(|item| item.is_alive());
}

/// True once a circle is fully below the bottom edge plus `margin`.
fn past_bottom(pos: Vec2, radius: f32, bounds: Bounds, margin: f32) -> bool {
    pos.y - radius > bounds.height + margin
}

// ── Integration ───────────────────────────────────────────────────────────────

impl Asteroid {
    pub fn advance(&mut self, dt: f32, bounds: Bounds, margin: f32) {
        self.pos += self.vel * dt;
        if past_bottom(self.pos, self.radius, bounds, margin) {
            self.alive = false;
        }
    }
}

impl PowerUp {
    pub fn advance(&mut self, dt: f32, bounds: Bounds, margin: f32) {
        self.pos += self.vel * dt;
        if past_bottom(self.pos, self.radius, bounds, margin) {
            self.alive = false;
        }
    }
}

impl EnemyBullet {
    pub fn advance(&mut self, dt: f32, bounds: Bounds, margin: f32) {
        self.pos += self.vel * dt;
        if past_bottom(self.pos, self.radius, bounds, margin) {
            self.alive = false;
        }
    }
}

impl Bullet {
    /// Player bullets fly upward, so they are retired once fully above the
    /// top edge by `margin` (and below the bottom, for symmetry).
    pub fn advance(&mut self, dt: f32, bounds: Bounds, margin: f32) {
        self.pos += self.vel * dt;
        if self.pos.y + self.radius < -margin || past_bottom(self.pos, self.radius, bounds, margin)
        {
            self.alive = false;
        }
    }
}

impl Enemy {
    /// Reflects off the side walls; dies off the bottom.
    pub fn advance(&mut self, dt: f32, bounds: Bounds, margin: f32) {
        self.pos += self.vel * dt;

        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + self.radius > bounds.width {
            self.pos.x = bounds.width - self.radius;
            self.vel.x = -self.vel.x.abs();
        }

        if past_bottom(self.pos, self.radius, bounds, margin) {
            self.alive = false;
        }
    }
}

impl Boss {
    /// Descends to its cruise height, then patrols sideways inside the
    /// screen.  The boss never leaves the playfield horizontally.
    pub fn advance(&mut self, dt: f32, bounds: Bounds) {
        self.pos += self.vel * dt;

        if self.pos.y >= self.cruise_y {
            self.pos.y = self.cruise_y;
            self.vel.y = 0.0;
        }

        let left = self.radius;
        let right = (bounds.width - self.radius).max(left);
        if self.pos.x < left {
            self.pos.x = left;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x > right {
            self.pos.x = right;
            self.vel.x = -self.vel.x.abs();
        }
    }
}

impl Player {
    /// Move along `dir` (each axis in -1..=1) at `speed`, keeping the whole
    /// ship on screen.
    pub fn steer(&mut self, dir: Vec2, speed: f32, dt: f32, bounds: Bounds) {
        self.pos += dir * speed * dt;
        self.pos.x = self.pos.x.min(bounds.width - self.radius).max(self.radius);
        self.pos.y = self.pos.y.min(bounds.height - self.radius).max(self.radius);
    }

    pub fn tick_invincibility(&mut self, dt: f32) {
        self.invincible = (self.invincible - dt).max(0.0);
    }
}

impl Explosion {
    pub fn advance(&mut self, dt: f32) {
        self.timer -= dt;
    }

    pub fn is_done(&self) -> bool {
        self.timer <= 0.0
    }

    /// 0.0 when fresh, 1.0 when finished.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.timer / self.duration).clamp(0.0, 1.0)
    }
}
