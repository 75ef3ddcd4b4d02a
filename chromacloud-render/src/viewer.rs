//! Frame driver tying the camera, controls and framebuffer together

use crate::camera::{Camera, ShotStats};
use crate::config::{RenderConfig, ViewerConfig};
use crate::controls::OrbitControls;
use crate::framebuffer::Framebuffer;
use crate::metrics::Metrics;
use crate::surface::Surface;
use chromacloud_core::{Error, Result, Scene, Vector2d};

/// Interactive orbit view over a scene
///
/// Input events only adjust the orbit; the camera basis is recomputed at the
/// start of each [`render_frame`](Viewer::render_frame).
#[derive(Debug, Clone)]
pub struct Viewer {
    camera: Camera,
    controls: OrbitControls,
    framebuffer: Framebuffer,
    render: RenderConfig,
    metrics: Metrics,
}

impl Viewer {
    pub fn new(width: usize, height: usize, config: ViewerConfig) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidData(format!(
                "viewer size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            camera: Camera::new(config.camera)?,
            controls: OrbitControls::new(config.controls),
            framebuffer: Framebuffer::new(width, height),
            render: config.render,
            metrics: Metrics::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width()
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut Metrics {
        &mut self.metrics
    }

    pub fn pointer_down(&mut self, position: Vector2d) {
        self.controls.press(position);
    }

    /// Returns whether the orbit changed
    pub fn pointer_move(&mut self, position: Vector2d) -> bool {
        let (width, height) = (self.width(), self.height());
        self.controls.drag(position, &mut self.camera, width, height)
    }

    pub fn pointer_up(&mut self) {
        self.controls.release();
    }

    pub fn wheel(&mut self, delta: f64) {
        self.controls.wheel(delta, &mut self.camera);
    }

    /// Orbit, clear and shoot `scene` into `surface`, timed under `"frame"`
    pub fn render_frame<S>(&mut self, scene: &Scene, surface: &mut S) -> Result<ShotStats>
    where
        S: Surface + ?Sized,
    {
        let Self {
            camera,
            framebuffer,
            render,
            metrics,
            ..
        } = self;
        metrics.measure("frame", || {
            camera.orbit();
            if render.clear_before_shot {
                framebuffer.fill(render.background);
            }
            camera.shoot_scene(scene, framebuffer, surface)
        })
    }
}
