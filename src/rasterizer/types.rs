//! Core types for the software renderer

use std::path::Path;

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const SKY: Color = Color::new(51, 197, 255);
    pub const GROUND: Color = Color::new(100, 100, 100);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha 0 marks a see-through texel
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Texture files by tile code. Code `n` is entry `n - 1`: wall/floor/ceiling
/// codes index this list directly and sprites use the tail.
pub const TEXTURE_FILES: [&str; 30] = [
    "texture-1.png",
    "texture-2.png",
    "texture-3.png",
    "texture-4.png",
    "texture-5.png",
    "texture-6.png",
    "safeDoor.png",
    "brickWall.png",
    "crackedBrickWall.png",
    "tiledFloor.png",
    "blueBrickWall.png",
    "crackedBlueBrickWall.png",
    "carpet.png",
    "tiledCeiling.png",
    "metalPlate.png",
    "marble.png",
    "exit.png",
    "spikeTrap.png",
    "stairs.png",
    "safeDoorBoss.png",
    "enemy.png",
    "bomb.png",
    "bullet.png",
    "key.png",
    "coin.png",
    "hammerEnemy.png",
    "spike.png",
    "drone.png",
    "goldBar.png",
    "swat.png",
];

/// Simple RGBA texture
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
        }
    }

    /// Single-color texture
    #[cfg(test)]
    pub fn solid(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
            name: String::new(),
        }
    }

    /// Load texture from a PNG file, keeping the alpha channel for sprite cut-outs
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Texel at integer coordinates; `None` when outside the texture
    pub fn sample(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width + x as usize).copied()
    }
}

/// All loaded textures, addressed by 1-based tile code
#[derive(Debug, Clone, Default)]
pub struct TextureTable {
    textures: Vec<Option<Texture>>,
}

impl TextureTable {
    pub fn new() -> Self {
        Self { textures: Vec::new() }
    }

    /// Build a table where entry `i` answers to code `i + 1`
    pub fn from_textures(textures: Vec<Option<Texture>>) -> Self {
        Self { textures }
    }

    /// Put a texture at `code`, growing the table as needed
    pub fn insert(&mut self, code: i32, texture: Texture) {
        if code < 1 {
            return;
        }
        let slot = code as usize - 1;
        if self.textures.len() <= slot {
            self.textures.resize(slot + 1, None);
        }
        self.textures[slot] = Some(texture);
    }

    /// Texture for a tile code; unknown or failed codes resolve to `None`
    pub fn get(&self, code: i32) -> Option<&Texture> {
        if code < 1 {
            return None;
        }
        self.textures.get(code as usize - 1).and_then(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn loaded_count(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }

    /// Load every entry of [`TEXTURE_FILES`] from `dir`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_directory<P: AsRef<Path>>(dir: P) -> Self {
        use indicatif::{ProgressBar, ProgressStyle};

        let dir = dir.as_ref();
        let pb = ProgressBar::new(TEXTURE_FILES.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("Loading textures [{bar:30}] {pos}/{len} {msg}") {
            pb.set_style(style.progress_chars("█▓░"));
        }

        let mut textures = Vec::with_capacity(TEXTURE_FILES.len());
        for file in TEXTURE_FILES {
            match Texture::from_file(dir.join(file)) {
                Ok(tex) => {
                    pb.set_message(format!("{} ({}x{})", tex.name, tex.width, tex.height));
                    textures.push(Some(tex));
                }
                Err(e) => {
                    log::warn!("{}", e);
                    textures.push(None);
                }
            }
            pb.inc(1);
        }

        let table = Self::from_textures(textures);
        pb.finish_with_message(format!("Loaded {} textures", table.loaded_count()));
        table
    }

    /// Load every entry of [`TEXTURE_FILES`] from `dir` (WASM - no progress bar)
    #[cfg(target_arch = "wasm32")]
    pub fn load_directory<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let textures = TEXTURE_FILES
            .iter()
            .map(|file| match Texture::from_file(dir.join(file)) {
                Ok(tex) => Some(tex),
                Err(e) => {
                    log::warn!("{}", e);
                    None
                }
            })
            .collect();
        Self::from_textures(textures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_out_of_bounds_is_none() {
        let tex = Texture::solid(4, 2, Color::WHITE);
        assert_eq!(tex.sample(3, 1), Some(Color::WHITE));
        assert_eq!(tex.sample(4, 0), None);
        assert_eq!(tex.sample(0, 2), None);
        assert_eq!(tex.sample(-1, 0), None);
    }

    #[test]
    fn test_table_is_one_based() {
        let mut table = TextureTable::new();
        table.insert(3, Texture::solid(1, 1, Color::BLACK));

        assert!(table.get(0).is_none());
        assert!(table.get(1).is_none());
        assert!(table.get(3).is_some());
        assert!(table.get(4).is_none());
        assert!(table.get(-7).is_none());
        assert_eq!(table.len(), 3);
        assert_eq!(table.loaded_count(), 1);
    }

    #[test]
    fn test_load_directory_skips_missing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 0]));
        img.save(dir.path().join("key.png")).unwrap();

        let table = TextureTable::load_directory(dir.path());
        assert_eq!(table.len(), TEXTURE_FILES.len());
        assert_eq!(table.loaded_count(), 1);

        let key = table.get(24).unwrap();
        assert_eq!(key.name, "key");
        assert!(key.sample(1, 1).unwrap().is_transparent());
    }
}
