//! Pixel buffer and the mapping between continuous and pixel coordinates
//!
//! Pixel coordinates are `(row, col)` pairs stored in a [`Vector2d`] as
//! `(x, y) = (row, col)`: rows grow downward from the top edge, columns grow
//! rightward from the left edge. The continuous window maps `max.y` to the
//! top row and `min.x` to the left column.

use crate::surface::Surface;
use chromacloud_core::{Result, Rgba, Vector2d};
use serde::{Deserialize, Serialize};

/// Continuous rectangle `[min, max]` shown by the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub min: Vector2d,
    pub max: Vector2d,
}

impl Window {
    pub fn new(min: Vector2d, max: Vector2d) -> Self {
        Self { min, max }
    }

    /// The square `[-half_extent, half_extent]²`
    pub fn symmetric(half_extent: f64) -> Self {
        Self::new(
            Vector2d::new(-half_extent, -half_extent),
            Vector2d::new(half_extent, half_extent),
        )
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(Vector2d::zeros(), Vector2d::new(1.0, 1.0))
    }
}

/// Width×height RGBA8 pixels
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    window: Window,
}

impl Framebuffer {
    /// A transparent framebuffer showing the unit square
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
            window: Window::default(),
        }
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn set_window(&mut self, window: Window) {
        self.window = window;
    }

    /// Paint every pixel with `color`
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgba> {
        (row < self.height && col < self.width).then(|| self.pixels[row * self.width + col])
    }

    /// Write one pixel; coordinates outside the buffer are skipped.
    ///
    /// Returns whether the pixel was written.
    pub fn set_pixel(&mut self, row: i64, col: i64, color: Rgba) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    pub(crate) fn index(&self, row: i64, col: i64) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// The pixels as row-major RGBA8 bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Continuous `(x, y)` to fractional pixel `(row, col)`
    pub fn world_to_pixel(&self, world: &Vector2d) -> Vector2d {
        let Window { min, max } = self.window;
        let row = (-(self.height as f64) / (max.y - min.y)) * (world.y - max.y);
        let col = (self.width as f64 / (max.x - min.x)) * (world.x - min.x);
        Vector2d::new(row, col)
    }

    /// Pixel `(row, col)` back to continuous `(x, y)`
    pub fn pixel_to_world(&self, pixel: &Vector2d) -> Vector2d {
        let Window { min, max } = self.window;
        let x = min.x + ((max.x - min.x) / self.width as f64) * pixel.y;
        let y = max.y - ((max.y - min.y) / self.height as f64) * pixel.x;
        Vector2d::new(x, y)
    }

    /// Copy the pixels to `surface`, then read the surface back so later
    /// draws see whatever the surface did to them.
    pub fn flush<S>(&mut self, surface: &mut S) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        surface.put_image(self.width, self.height, self.as_bytes())?;
        surface.get_image(
            self.width,
            self.height,
            bytemuck::cast_slice_mut(&mut self.pixels),
        )
    }
}
