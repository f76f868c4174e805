/// Rendering layer. All terminal output lives here.
///
/// `View::render` receives an immutable view of the game and paints one
/// frame onto the half-block canvas.  No game logic is performed; this
/// module only translates state into pixels and text.

mod canvas;

use std::f32::consts::TAU;
use std::io::Write;

use crossterm::{cursor, style, QueueableCommand};
use glam::Vec2;
use rand::Rng;

use starfall::assets::{Art, ImageId, ImageStore};
use starfall::entities::{Blast, PowerUpKind};
use starfall::game::Game;
use starfall::kinematics::Bounds;
use starfall::session::Session;
use starfall::state::Screen;
use starfall::story::{Mood, StoryArc};

use canvas::{Blend, Canvas, Rgb};

/// World pixels per terminal column and per terminal row.
pub const COL_PX: f32 = 10.0;
pub const ROW_PX: f32 = 20.0;

pub fn world_bounds(cols: u16, rows: u16) -> Bounds {
    Bounds::new(cols as f32 * COL_PX, rows as f32 * ROW_PX)
}

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SPACE: Rgb = [4, 6, 18];
const C_STAR: Rgb = [150, 150, 190];
const C_TITLE: Rgb = [90, 200, 255];
const C_TEXT: Rgb = [230, 230, 230];
const C_HINT: Rgb = [120, 120, 140];
const C_SCORE: Rgb = [255, 220, 80];
const C_LIVES: Rgb = [255, 80, 90];
const C_PLAYER: Rgb = [220, 230, 255];
const C_SHIELD: Rgb = [80, 220, 255];
const C_ASTEROID: Rgb = [140, 110, 90];
const C_ENEMY: Rgb = [90, 220, 90];
const C_BOSS: Rgb = [200, 60, 200];
const C_BULLET: Rgb = [120, 255, 255];
const C_ENEMY_BULLET: Rgb = [255, 90, 200];
const C_BOOM: Rgb = [255, 150, 40];
const C_HP_BACK: Rgb = [60, 20, 20];
const C_HP: Rgb = [230, 40, 40];

fn mood_color(mood: Mood) -> Rgb {
    match mood {
        Mood::Neutral => [235, 235, 235],
        Mood::Sad => [255, 140, 140],
        Mood::Triumphant => [255, 215, 90],
    }
}

fn power_up_color(kind: PowerUpKind) -> Rgb {
    match kind {
        PowerUpKind::DoubleShot => [255, 200, 60],
        PowerUpKind::SpeedBoost => [80, 255, 120],
        PowerUpKind::Shield => C_SHIELD,
        PowerUpKind::ExtraLife => [255, 90, 140],
    }
}

fn level_name(level: u8) -> &'static str {
    match level {
        1 => "ASTEROID BELT",
        2 => "FIGHTER SWARM",
        _ => "MOTHERSHIP",
    }
}

fn objective(s: &Session, game: &Game) -> String {
    let t = &game.tuning;
    match s.level {
        1 => format!("Survive {:.0}s", (t.level1_duration - s.level_time).max(0.0).ceil()),
        2 => format!("Kills {}/{}", s.kills, t.level2_kill_target),
        _ => "Destroy the mothership".to_string(),
    }
}

/// Story image sway: 8 px at 0.4 Hz.
const SWAY_PX: f32 = 8.0;
const SWAY_HZ: f32 = 0.4;

/// Starfield scroll speed in world px/s for the nearest layer.
const STAR_SPEED: f32 = 60.0;

pub struct View {
    canvas: Canvas,
    /// Normalised star positions and their parallax factor.
    stars: Vec<(Vec2, f32)>,
    scroll: f32,
}

impl View {
    pub fn new(rng: &mut impl Rng) -> Self {
        let stars = (0..120)
            .map(|_| {
                let pos = Vec2::new(rng.gen(), rng.gen());
                (pos, rng.gen_range(0.3..=1.0))
            })
            .collect();
        View {
            canvas: Canvas::new(0, 0),
            stars,
            scroll: 0.0,
        }
    }

    /// Render one complete frame.
    #[allow(clippy::too_many_arguments)]
    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        game: &Game,
        store: &ImageStore,
        art: &Art,
        cols: u16,
        rows: u16,
        dt: f32,
        rng: &mut impl Rng,
    ) -> std::io::Result<()> {
        let bounds = world_bounds(cols, rows);
        self.canvas.resize(cols, rows);
        self.canvas.clear(C_SPACE);
        self.scroll += dt * STAR_SPEED;

        match game.screen {
            Screen::Menu => self.menu(game, bounds),
            Screen::Story(arc) => self.story(game, arc, store, art, bounds),
            Screen::LevelIntro { level } => {
                self.playfield(game, store, art, bounds, rng);
                self.level_intro(game, level);
            }
            Screen::Playing => self.playfield(game, store, art, bounds, rng),
            Screen::Paused => {
                self.playfield(game, store, art, bounds, rng);
                self.paused();
            }
            Screen::GameOver => self.game_over(game, bounds),
        }

        self.canvas.flush(out)?;
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
        out.flush()
    }

    fn starfield(&mut self, bounds: Bounds) {
        for (pos, depth) in &self.stars {
            let y = (pos.y * bounds.height + self.scroll * depth)
                .rem_euclid(bounds.height.max(1.0));
            let shade = (*depth * 255.0) as u8;
            let color = [C_STAR[0].min(shade), C_STAR[1].min(shade), C_STAR[2].min(shade)];
            self.canvas
                .fill_circle(Vec2::new(pos.x * bounds.width, y), 4.0, color);
        }
    }

    // ── Menu ──────────────────────────────────────────────────────────────────

    fn menu(&mut self, game: &Game, bounds: Bounds) {
        self.starfield(bounds);
        let cy = self.canvas.rows() as i32 / 2;
        let c = &mut self.canvas;

        c.text_centered(cy - 6, "★  OPERATION  STARFALL  ★", C_TITLE);
        if game.high_score > 0 {
            c.text_centered(cy - 4, &format!("Best Score: {}", game.high_score), C_SCORE);
        }
        c.text_centered(cy - 1, "Difficulty", C_TEXT);
        c.text_centered(cy, &format!("◀  {}  ▶", game.difficulty.name()), C_SCORE);

        c.text_centered(cy + 3, "Power-ups drop from destroyed fighters:", C_HINT);
        c.text_centered(cy + 4, "2X double shot   SP speed   SH shield   +1 life", C_HINT);

        c.text_centered(cy + 7, "ENTER start   ← → difficulty   Q quit", C_TEXT);
        c.text_centered(cy + 8, "Arrows / WASD move   SPACE fire", C_HINT);
    }

    // ── Story ─────────────────────────────────────────────────────────────────

    fn story(&mut self, game: &Game, arc: StoryArc, store: &ImageStore, art: &Art, bounds: Bounds) {
        let seq = &game.story;
        let t = &game.tuning;
        let Some(slide) = seq.slide(arc) else {
            return;
        };

        let center = Vec2::new(bounds.width, bounds.height) / 2.0;
        let sway = Vec2::new((seq.sway * SWAY_HZ * TAU).sin() * SWAY_PX, 0.0);
        let size = Vec2::new(bounds.width, bounds.height) + Vec2::splat(SWAY_PX * 2.0);
        match art.story_image(slide.image).and_then(|id| store.get(id)) {
            Some(picture) => self.canvas.blit(picture, center + sway, size, 1.0, Blend::Normal),
            None => self.starfield(bounds),
        }

        let rows = self.canvas.rows() as i32;
        let c = &mut self.canvas;

        // Caption box along the bottom.
        let box_top = (rows - 7).max(0) as f32 * ROW_PX;
        c.fill_rect(
            Vec2::new(0.0, box_top),
            Vec2::new(bounds.width, bounds.height - box_top),
            [0, 0, 0],
            0.6,
        );

        let color = mood_color(arc.mood());
        let shown = seq.revealed(slide.caption, t.typewriter_rate);
        for (i, line) in shown.lines().enumerate() {
            c.text_centered(rows - 5 + i as i32, line, color);
        }

        c.text(1, 0, &format!("{}/{}", seq.index + 1, arc.slides().len()), C_HINT);
        if let Some(left) = seq.seconds_left(t.auto_advance) {
            let countdown = format!("next in {left}s");
            c.text(c.cols() as i32 - countdown.chars().count() as i32 - 1, 0, &countdown, C_HINT);
        }

        let typed = shown.len() == slide.caption.len();
        if typed && (seq.sway * 2.0) % 2.0 < 1.0 {
            c.text(c.cols() as i32 - 10, rows - 2, "ENTER ▸", C_TEXT);
        }

        if seq.skip_timer > 0.0 {
            let progress = seq.skip_progress(t.skip_hold);
            c.text(1, rows - 2, "Hold ESC to skip", C_HINT);
            c.fill_rect(
                Vec2::new(0.0, bounds.height - ROW_PX / 2.0),
                Vec2::new(bounds.width * progress, ROW_PX / 2.0),
                C_TITLE,
                1.0,
            );
        } else {
            c.text(1, rows - 2, "ESC (hold) skip", C_HINT);
        }

        c.shade(seq.fade_overlay(t.fade_in));
    }

    // ── Gameplay ──────────────────────────────────────────────────────────────

    fn playfield(
        &mut self,
        game: &Game,
        store: &ImageStore,
        art: &Art,
        bounds: Bounds,
        rng: &mut impl Rng,
    ) {
        let s = &game.session;

        match art.background.and_then(|id| store.get(id)) {
            Some(bg) => {
                let size = Vec2::new(bounds.width, bounds.height);
                let y = self.scroll.rem_euclid(bounds.height.max(1.0));
                let center = size / 2.0;
                self.canvas.blit(bg, center + Vec2::new(0.0, y), size, 1.0, Blend::Normal);
                self.canvas
                    .blit(bg, center + Vec2::new(0.0, y - bounds.height), size, 1.0, Blend::Normal);
            }
            None => self.starfield(bounds),
        }

        self.canvas.offset = s.shake.offset(rng);

        for p in &s.powerups {
            let color = power_up_color(p.kind);
            self.canvas.fill_circle(p.pos, p.radius, color);
            self.canvas.label(p.pos, p.kind.badge(), [0, 0, 0]);
        }
        for a in &s.asteroids {
            self.sprite(store, art.asteroid, a.pos, a.radius, C_ASTEROID);
        }
        for e in &s.enemies {
            self.sprite(store, art.enemy, e.pos, e.radius, C_ENEMY);
        }
        if s.level == 3 && s.boss.alive {
            self.sprite(store, art.boss, s.boss.pos, s.boss.radius, C_BOSS);
        }
        for b in &s.bullets {
            self.sprite(store, art.bullet, b.pos, b.radius, C_BULLET);
        }
        for eb in &s.enemy_bullets {
            self.canvas.fill_circle(eb.pos, eb.radius, C_ENEMY_BULLET);
        }

        // Blink while invincible.
        let p = &s.player;
        let blink = p.invincible > 0.0 && (p.invincible * 10.0) as i32 % 2 == 0;
        if p.lives > 0 && !blink {
            self.sprite(store, art.player, p.pos, p.radius, C_PLAYER);
        }
        if s.buffs.has_shield() {
            self.canvas.draw_circle(p.pos, p.radius + 8.0, C_SHIELD);
            self.canvas.glow(p.pos, p.radius + 8.0, C_SHIELD, 0.15);
        }

        for ex in &s.explosions {
            let t = ex.progress();
            let sprite = match ex.blast {
                Blast::Rock => art.boom_rock,
                Blast::Ship => art.boom_ship,
            };
            let size = Vec2::splat(ex.radius * 2.0 * (0.5 + t));
            match sprite.and_then(|id| store.get(id)) {
                Some(pic) => self.canvas.blit(pic, ex.pos, size, 1.0 - t, Blend::Additive),
                None => self.canvas.glow(ex.pos, size.x / 2.0, C_BOOM, 1.0 - t),
            }
        }

        self.canvas.offset = Vec2::ZERO;
        self.hud(game, bounds);
    }

    /// Draw a sprite scaled to the entity's diameter, or a filled circle if
    /// the image is missing.
    fn sprite(
        &mut self,
        store: &ImageStore,
        id: Option<ImageId>,
        pos: Vec2,
        radius: f32,
        fallback: Rgb,
    ) {
        match id.and_then(|id| store.get(id)) {
            Some(pic) => self
                .canvas
                .blit(pic, pos, Vec2::splat(radius * 2.0), 1.0, Blend::Normal),
            None => self.canvas.fill_circle(pos, radius, fallback),
        }
    }

    fn hud(&mut self, game: &Game, bounds: Bounds) {
        let s = &game.session;
        let c = &mut self.canvas;
        let cols = c.cols() as i32;

        c.text(1, 0, &format!("L{} {}", s.level, level_name(s.level)), C_TITLE);
        let best = game.high_score.max(s.score);
        c.text_centered(0, &format!("SCORE {:>6}   BEST {best:>6}", s.score), C_SCORE);
        let lives = "♥".repeat(s.player.lives as usize);
        c.text(cols - lives.chars().count() as i32 - 1, 0, &lives, C_LIVES);

        let mut badges = Vec::new();
        if s.buffs.has_double_shot() {
            badges.push(format!("2X {:.0}s", s.buffs.double_shot.ceil()));
        }
        if s.buffs.has_speed_boost() {
            badges.push(format!("SP {:.0}s", s.buffs.speed_boost.ceil()));
        }
        if s.buffs.has_shield() {
            badges.push(format!("SH {:.0}s", s.buffs.shield.ceil()));
        }
        c.text(1, 1, &badges.join("  "), C_SHIELD);
        c.text_centered(1, &objective(s, game), C_TEXT);
        let diff = game.difficulty.name();
        c.text(cols - diff.len() as i32 - 1, 1, diff, C_HINT);

        if s.level == 3 && s.boss.alive && s.boss.max_hp > 0 {
            let frac = s.boss.hp.max(0) as f32 / s.boss.max_hp as f32;
            let width = bounds.width * 0.6;
            let min = Vec2::new((bounds.width - width) / 2.0, ROW_PX * 2.0 + 4.0);
            let size = Vec2::new(width, ROW_PX / 2.0);
            c.fill_rect(min, size, C_HP_BACK, 1.0);
            c.fill_rect(min, Vec2::new(width * frac, size.y), C_HP, 1.0);
            c.text_centered(3, &format!("MOTHERSHIP {}/{}", s.boss.hp.max(0), s.boss.max_hp), C_HP);
        }
    }

    fn level_intro(&mut self, game: &Game, level: u8) {
        let c = &mut self.canvas;
        c.shade(0.5);
        let cy = c.rows() as i32 / 2;
        if game.intro_title_visible() {
            c.text_centered(cy - 2, &format!("LEVEL {level}"), C_TITLE);
        }
        c.text_centered(cy, level_name(level), C_SCORE);
        c.text_centered(cy + 1, &objective(&game.session, game), C_TEXT);
        c.text_centered(cy + 4, "Press ENTER", C_HINT);
    }

    fn paused(&mut self) {
        let c = &mut self.canvas;
        c.shade(0.6);
        let cy = c.rows() as i32 / 2;
        c.text_centered(cy - 1, "PAUSED", C_TITLE);
        c.text_centered(cy + 1, "ESC / P resume   Q save and quit to menu", C_HINT);
    }

    // ── Game over ─────────────────────────────────────────────────────────────

    fn game_over(&mut self, game: &Game, bounds: Bounds) {
        self.starfield(bounds);
        let s = &game.session;
        let c = &mut self.canvas;
        let cy = c.rows() as i32 / 2;

        let (title, color) = if s.won {
            ("MISSION  COMPLETE", C_SCORE)
        } else {
            ("GAME  OVER", C_LIVES)
        };
        c.text_centered(cy - 4, "╔══════════════════════╗", color);
        c.text_centered(cy - 3, &format!("║{title:^22}║"), color);
        c.text_centered(cy - 2, "╚══════════════════════╝", color);
        c.text_centered(cy, &format!("Final Score: {}", s.score), C_SCORE);
        c.text_centered(cy + 1, &format!("High Score: {}", game.high_score), C_TEXT);
        if game.is_new_high_score() {
            c.text_centered(cy + 2, "NEW HIGH SCORE!", C_TITLE);
        }
        c.text_centered(cy + 3, &format!("Hits taken: {}", s.hits), C_HINT);
        c.text_centered(cy + 5, "ENTER - Back to menu", C_TEXT);
    }
}
