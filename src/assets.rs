/// Image loading into an arena addressed by `ImageId`.
///
/// A failed load is logged and yields `None`; callers draw a primitive
/// shape in its place.  Pictures are owned by the store and dropped with it.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::story::StoryArc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(usize);

/// Decoded RGBA pixels, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Picture {
    pub width: u32,
    pub height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Picture {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            pixels.len() == (width as usize) * (height as usize),
            "{}x{} picture needs {} pixels, got {}",
            width,
            height,
            width as usize * height as usize,
            pixels.len()
        );
        Ok(Picture { width, height, pixels })
    }

    pub fn decode(path: &Path) -> anyhow::Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("decoding {}", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| p.0).collect();
        Self::from_rgba(width, height, pixels)
    }

    /// Pixel at (x, y), or `None` outside the picture.
    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

#[derive(Debug, Default)]
pub struct ImageStore {
    pictures: Vec<Picture>,
}

impl ImageStore {
    pub fn insert(&mut self, picture: Picture) -> ImageId {
        self.pictures.push(picture);
        ImageId(self.pictures.len() - 1)
    }

    pub fn load(&mut self, path: &Path) -> Option<ImageId> {
        match Picture::decode(path) {
            Ok(picture) => {
                log::info!("loaded {} ({}x{})", path.display(), picture.width, picture.height);
                Some(self.insert(picture))
            }
            Err(e) => {
                log::warn!("failed to load image: {e:#}");
                None
            }
        }
    }

    pub fn get(&self, id: ImageId) -> Option<&Picture> {
        self.pictures.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }
}

/// Handles for every image the game draws.  Any of them may be missing.
#[derive(Debug, Default)]
pub struct Art {
    pub background: Option<ImageId>,
    pub player: Option<ImageId>,
    pub asteroid: Option<ImageId>,
    pub enemy: Option<ImageId>,
    pub boss: Option<ImageId>,
    pub bullet: Option<ImageId>,
    pub boom_rock: Option<ImageId>,
    pub boom_ship: Option<ImageId>,
    story: HashMap<&'static str, ImageId>,
}

impl Art {
    pub fn load(store: &mut ImageStore, dir: &Path) -> Self {
        let mut load = |name: &str| store.load(&dir.join(name));
        let mut art = Art {
            background: load("bg_space.png"),
            player: load("player_ship.png"),
            asteroid: load("asteroid.png"),
            enemy: load("enemy_ship.png"),
            boss: load("boss_ship.png"),
            bullet: load("bullet.png"),
            boom_rock: load("boom_asteroid.png"),
            boom_ship: load("boom_ship.png"),
            story: HashMap::new(),
        };
        for name in StoryArc::all_images() {
            if let Some(id) = load(name) {
                art.story.insert(name, id);
            }
        }
        log::info!("{} images loaded", store.len());
        art
    }

    pub fn story_image(&self, name: &str) -> Option<ImageId> {
        self.story.get(name).copied()
    }
}
