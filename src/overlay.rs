//! Mark raster that sensors draw their readings into.
//! The renderer shows every pixel with a non-zero mark count.

use glam::IVec2;

use crate::geometry::LinePixels;
use crate::sensor::Reading;

/// Which overlay a sensor draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Live ray returns.
    Interpretation,
    /// Long-lived trails.
    Memory,
}

pub struct Overlay {
    /// Overlapping readings stack, so erasing one keeps the others visible.
    marks: Vec<u16>,
    width: u32,
    height: u32,
}

impl Overlay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            marks: vec![0; width as usize * height as usize],
            width,
            height,
        }
    }

    fn index(&self, pixel: IVec2) -> Option<usize> {
        if pixel.x < 0 || pixel.y < 0 || pixel.x as u32 >= self.width || pixel.y as u32 >= self.height {
            return None;
        }
        Some(pixel.y as usize * self.width as usize + pixel.x as usize)
    }

    fn pixels(reading: &Reading) -> LinePixels {
        match *reading {
            Reading::Segment { origin, hit } => LinePixels::new(origin, hit),
            Reading::Point(p) => LinePixels::new(p, p),
        }
    }

    /// Draw a reading.
    pub fn stamp(&mut self, reading: &Reading) {
        for pixel in Self::pixels(reading) {
            if let Some(i) = self.index(pixel) {
                self.marks[i] = self.marks[i].saturating_add(1);
            }
        }
    }

    /// Remove a reading drawn earlier by [`Overlay::stamp`].
    pub fn erase(&mut self, reading: &Reading) {
        for pixel in Self::pixels(reading) {
            if let Some(i) = self.index(pixel) {
                self.marks[i] = self.marks[i].saturating_sub(1);
            }
        }
    }

    pub fn is_marked(&self, pixel: IVec2) -> bool {
        self.index(pixel).is_some_and(|i| self.marks[i] > 0)
    }

    /// Number of visible pixels.
    pub fn marked_pixels(&self) -> usize {
        self.marks.iter().filter(|&&m| m > 0).count()
    }

    /// Forget everything. External decay runs this between frames.
    pub fn clear(&mut self) {
        self.marks.fill(0);
    }

    /// Flatten to an R8 alpha mask for texture upload.
    pub fn to_alpha_mask(&self) -> Vec<u8> {
        self.marks
            .iter()
            .map(|&m| if m > 0 { 255 } else { 0 })
            .collect()
    }
}

/// Both overlay layers, sized like the terrain.
pub struct Overlays {
    pub interpretation: Overlay,
    pub memory: Overlay,
}

impl Overlays {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            interpretation: Overlay::new(width, height),
            memory: Overlay::new(width, height),
        }
    }

    pub fn layer(&self, layer: Layer) -> &Overlay {
        match layer {
            Layer::Interpretation => &self.interpretation,
            Layer::Memory => &self.memory,
        }
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut Overlay {
        match layer {
            Layer::Interpretation => &mut self.interpretation,
            Layer::Memory => &mut self.memory,
        }
    }
}
