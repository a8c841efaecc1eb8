use glam::{IVec2, Vec2};

use crate::error::SimError;
use crate::material;

/// One RGBA pixel.
pub type Rgba = [u8; 4];

/// Read-only color raster the bots roll over. Row-major.
#[derive(Debug, Clone)]
pub struct Terrain {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Terrain {
    /// Wrap tightly packed RGBA8 bytes, e.g. a decoded image.
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, SimError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(SimError::TerrainSize {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Pixel at integer coordinates, `None` outside the raster.
    pub fn get(&self, pixel: IVec2) -> Option<Rgba> {
        self.index(pixel.x, pixel.y).map(|i| self.pixels[i])
    }

    /// Pixel under a world point (floored).
    pub fn sample(&self, point: Vec2) -> Option<Rgba> {
        if !point.is_finite() {
            return None;
        }
        self.get(point.floor().as_ivec2())
    }

    /// Off-raster pixels are never ground.
    pub fn is_ground(&self, pixel: IVec2) -> bool {
        self.get(pixel).is_some_and(material::is_ground)
    }

    /// Overwrite a pixel. Only for maintenance between ticks.
    pub fn set(&mut self, pixel: IVec2, color: Rgba) {
        if let Some(i) = self.index(pixel.x, pixel.y) {
            self.pixels[i] = color;
        }
    }
}
