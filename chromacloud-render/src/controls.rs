//! Pointer and wheel input turned into orbit parameter changes

use crate::camera::{Camera, OrbitParams};
use crate::config::ControlConfig;
use chromacloud_core::{Vector2d, VectorExt, DEFAULT_PRECISION};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Drag-to-orbit and wheel-to-zoom state.
///
/// Pointer positions are `(row, col)` pixel coordinates of the render
/// target. Controls only change the camera's orbit parameters; the viewer
/// recomputes the basis at the next frame.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: ControlConfig,
    dragging: bool,
    anchor: Vector2d,
}

impl OrbitControls {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            config,
            dragging: false,
            anchor: Vector2d::zeros(),
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start a drag at `position`
    pub fn press(&mut self, position: Vector2d) {
        self.anchor = position;
        self.dragging = true;
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Orbit by the pointer movement since the last drag position.
    ///
    /// A full buffer width of column movement turns the azimuth once around;
    /// a full height of row movement does the same for the elevation, within
    /// the pole margin. Returns whether the camera changed.
    pub fn drag(&mut self, position: Vector2d, camera: &mut Camera, width: usize, height: usize) -> bool {
        if !self.dragging || position.approx_eq(&self.anchor, DEFAULT_PRECISION) {
            return false;
        }
        let delta = position - self.anchor;
        let params = camera.orbit_params.offset(
            0.0,
            -TAU * delta.y / width as f64,
            TAU * delta.x / height as f64,
        );
        camera.orbit_params = self.constrain(params);
        self.anchor = position;
        true
    }

    /// Zoom by a wheel delta; positive deltas move the eye away
    pub fn wheel(&mut self, delta: f64, camera: &mut Camera) {
        let params = camera.orbit_params.offset(delta * self.config.wheel_scale, 0.0, 0.0);
        camera.orbit_params = self.constrain(params);
    }

    fn constrain(&self, params: OrbitParams) -> OrbitParams {
        let limit = FRAC_PI_2 - self.config.pole_margin;
        OrbitParams {
            radius: params.radius.max(self.config.min_radius),
            azimuth: params.azimuth,
            elevation: params.elevation.clamp(-limit, limit),
        }
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(ControlConfig::default())
    }
}
