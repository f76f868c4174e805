/// Pairwise circle collision tests and their consequences.
///
/// Every frame the passes below run once each, in this order:
///
///   bullets × asteroids, bullets × enemies, power-ups × player,
///   asteroids × player, enemies × player, enemy bullets × player,
///   then on level 3 bullets × boss and boss × player.
///
/// Passes only flip liveness flags.  Nothing is removed until the sweep at
/// the end of the frame, so no collection is resized while it is scanned.

use rand::Rng;

use crate::buffs::{Pickup, Shake};
use crate::config::Tuning;
use crate::effects::{Cue, Effects};
use crate::entities::Blast;
use crate::kinematics::Body;
use crate::session::Session;
use crate::spawner;

/// `dist² <= (r1 + r2)²`: touching circles collide.
pub fn overlaps<A: Body + ?Sized, B: Body + ?Sized>(a: &A, b: &B) -> bool {
    let reach = a.radius() + b.radius();
    a.center().distance_squared(b.center()) <= reach * reach
}

/// First live target touching `probe`, if any.
fn first_hit<'a, P: Body, T: Body>(probe: &P, targets: &'a mut [T]) -> Option<&'a mut T> {
    targets
        .iter_mut()
        .find(|t| t.is_alive() && overlaps(probe, &**t))
}

/// What the collision pass changed beyond score and liveness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The player lost their last life this frame.
    pub defeated: bool,
    /// The boss took its final hit this frame.
    pub boss_destroyed: bool,
}

pub fn resolve(s: &mut Session, tuning: &Tuning, rng: &mut impl Rng, fx: &mut Effects) -> Outcome {
    let mut outcome = Outcome::default();

    bullets_vs_asteroids(s, tuning, fx);
    bullets_vs_enemies(s, tuning, rng, fx);
    powerups_vs_player(s, tuning, fx);

    // Contacts are counted first and damage applied after each pass, so the
    // player is never borrowed while a hazard list is being scanned.
    let mut contacts = asteroids_vs_player(s, tuning);
    contacts += enemies_vs_player(s, tuning);
    contacts += enemy_bullets_vs_player(s);

    if s.level == 3 && s.boss.alive {
        outcome.boss_destroyed = bullets_vs_boss(s, tuning, fx);
    }
    if s.level == 3 && s.boss.alive && overlaps(&s.boss, &s.player) {
        contacts += 1;
    }

    for _ in 0..contacts {
        if damage_player(s, tuning, fx) == Damage::Killed {
            outcome.defeated = true;
        }
    }

    outcome
}

fn bullets_vs_asteroids(s: &mut Session, tuning: &Tuning, fx: &mut Effects) {
    for b in s.bullets.iter_mut().filter(|b| b.alive) {
        if let Some(a) = first_hit(&*b, &mut s.asteroids) {
            b.alive = false;
            a.alive = false;
            s.explosions
                .push(spawner::explosion(a.pos, a.radius, Blast::Rock, tuning));
            s.score += tuning.score_asteroid;
            fx.play(Cue::ExplosionSmall, 0.4);
        }
    }
}

fn bullets_vs_enemies(s: &mut Session, tuning: &Tuning, rng: &mut impl Rng, fx: &mut Effects) {
    for b in s.bullets.iter_mut().filter(|b| b.alive) {
        if let Some(e) = first_hit(&*b, &mut s.enemies) {
            b.alive = false;
            e.alive = false;
            s.explosions
                .push(spawner::explosion(e.pos, e.radius, Blast::Ship, tuning));
            s.score += tuning.score_enemy;
            s.kills += 1;
            if let Some(p) = spawner::drop_power_up(rng, e.pos, tuning) {
                s.powerups.push(p);
            }
            fx.play(Cue::ExplosionLarge, 0.6);
        }
    }
}

fn powerups_vs_player(s: &mut Session, tuning: &Tuning, fx: &mut Effects) {
    for p in s.powerups.iter_mut().filter(|p| p.alive) {
        if !overlaps(&*p, &s.player) {
            continue;
        }
        p.alive = false;
        fx.play(Cue::PowerUp, 0.8);
        if s.buffs.apply(p.kind, tuning.powerup_duration) == Pickup::ExtraLife {
            s.player.lives += 1;
        }
        log::info!("power-up {:?} picked up, lives {}", p.kind, s.player.lives);
    }
}

fn asteroids_vs_player(s: &mut Session, tuning: &Tuning) -> u32 {
    let mut contacts = 0;
    for a in s.asteroids.iter_mut().filter(|a| a.alive) {
        if overlaps(&*a, &s.player) {
            a.alive = false;
            s.explosions
                .push(spawner::explosion(a.pos, a.radius, Blast::Rock, tuning));
            contacts += 1;
        }
    }
    contacts
}

fn enemies_vs_player(s: &mut Session, tuning: &Tuning) -> u32 {
    let mut contacts = 0;
    for e in s.enemies.iter_mut().filter(|e| e.alive) {
        if overlaps(&*e, &s.player) {
            e.alive = false;
            s.explosions
                .push(spawner::explosion(e.pos, e.radius, Blast::Ship, tuning));
            contacts += 1;
        }
    }
    contacts
}

fn enemy_bullets_vs_player(s: &mut Session) -> u32 {
    let mut contacts = 0;
    for eb in s.enemy_bullets.iter_mut().filter(|eb| eb.alive) {
        if overlaps(&*eb, &s.player) {
            eb.alive = false;
            contacts += 1;
        }
    }
    contacts
}

/// At most one bullet lands on the boss per frame.  Returns true when that
/// hit destroyed it.
fn bullets_vs_boss(s: &mut Session, tuning: &Tuning, fx: &mut Effects) -> bool {
    let Some(b) = s
        .bullets
        .iter_mut()
        .find(|b| b.alive && overlaps(&**b, &s.boss))
    else {
        return false;
    };

    b.alive = false;
    s.boss.hp -= tuning.boss_damage;
    s.score += tuning.score_boss_hit;
    s.shake.trigger(Shake::SMALL);
    fx.play(Cue::BossHit, 0.4);

    if s.boss.hp > 0 {
        return false;
    }
    s.boss.hp = 0;
    s.boss.alive = false;
    s.explosions.push(spawner::explosion(
        s.boss.pos,
        s.boss.radius,
        Blast::Ship,
        tuning,
    ));
    s.shake.trigger(Shake::LARGE);
    fx.play(Cue::ExplosionLarge, 1.0);
    log::info!("boss destroyed, score {}", s.score);
    true
}

// ── Player damage ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Damage {
    /// Shield or invincibility absorbed the hit.
    Blocked,
    Hurt,
    /// That was the last life.
    Killed,
}

/// The single place the player loses lives.
pub fn damage_player(s: &mut Session, tuning: &Tuning, fx: &mut Effects) -> Damage {
    if s.buffs.has_shield() || s.player.invincible > 0.0 {
        return Damage::Blocked;
    }

    s.hits += 1;
    s.player.lives = s.player.lives.saturating_sub(1);
    s.player.invincible = tuning.invincibility;
    fx.play(Cue::PlayerHit, 0.7);
    s.shake.trigger(Shake::MEDIUM);

    if s.player.lives > 0 {
        return Damage::Hurt;
    }

    s.explosions.push(spawner::explosion(
        s.player.pos,
        s.player.radius,
        Blast::Ship,
        tuning,
    ));
    s.shake.trigger(Shake::LARGE);
    fx.play(Cue::GameOver, 1.0);
    log::info!("player destroyed after {} hits, score {}", s.hits, s.score);
    Damage::Killed
}
