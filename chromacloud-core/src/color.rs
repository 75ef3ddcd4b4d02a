//! RGBA colors and per-cluster color states

use crate::error::{Error, Result};
use crate::vector::Vector3d;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color, laid out exactly like one pixel of an RGBA8 buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const RED: Rgba = Rgba::new(255, 0, 0, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque color from a point of the unit color cube.
    ///
    /// Channels are scaled by 255 and clamped; the fraction is truncated.
    pub fn from_unit_rgb(rgb: &Vector3d) -> Self {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u8;
        Self::rgb(channel(rgb.x), channel(rgb.y), channel(rgb.z))
    }

    /// The color as a point of the unit color cube (alpha dropped)
    pub fn to_unit_rgb(self) -> Vector3d {
        Vector3d::new(self.r as f64, self.g as f64, self.b as f64) / 255.0
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional) into an opaque color
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || Error::InvalidData(format!("Invalid hex color: {hex:?}"));
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            _ => return Err(invalid()),
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(color: Rgba) -> Self {
        color.to_array()
    }
}

/// How the data points of one cluster are colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorState {
    /// Use the cluster's own color
    #[default]
    Cluster,
    /// Keep each data point's original color
    Original,
    /// Use a fixed user-chosen color
    Custom(Rgba),
}

impl ColorState {
    /// Resolve the color a data point is painted with
    pub fn resolve(self, cluster_color: Rgba, original_color: Rgba) -> Rgba {
        match self {
            ColorState::Cluster => cluster_color,
            ColorState::Original => original_color,
            ColorState::Custom(color) => color,
        }
    }
}
