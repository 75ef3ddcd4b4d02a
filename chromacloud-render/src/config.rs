//! Configuration for the camera, the orbit controls and rendering

use crate::camera::OrbitParams;
use chromacloud_core::{Rgba, Vector3d};
use serde::{Deserialize, Serialize};

/// Projection and initial orbit of a [`Camera`](crate::Camera)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Distance from the eye to the image plane, also the near plane
    pub distance_to_plane: f64,
    /// Half of the field of view, in radians
    pub field_of_view_half_angle: f64,
    pub orbit: OrbitParams,
    pub focal_point: Vector3d,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance_to_plane: 1.0,
            field_of_view_half_angle: std::f64::consts::FRAC_PI_4,
            orbit: OrbitParams::new(2.0, 0.0, 0.0),
            focal_point: Vector3d::zeros(),
        }
    }
}

/// Pointer and wheel sensitivity of [`OrbitControls`](crate::OrbitControls)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Radius change per unit of wheel delta
    pub wheel_scale: f64,
    /// Elevation stays this far (radians) from the poles
    pub pole_margin: f64,
    /// Smallest orbit radius the wheel can reach
    pub min_radius: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            wheel_scale: 0.001,
            pole_margin: 1e-3,
            min_radius: 1e-3,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub background: Rgba,
    /// Fill the framebuffer with `background` before every frame
    pub clear_before_shot: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Rgba::BLACK,
            clear_before_shot: true,
        }
    }
}

/// Everything a [`Viewer`](crate::Viewer) needs besides its size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub controls: ControlConfig,
    pub render: RenderConfig,
}

/// Sizes and colors of the cluster overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub data_point_radius: u32,
    pub cluster_radius: u32,
    pub cluster_border: Rgba,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            data_point_radius: 1,
            cluster_radius: 4,
            cluster_border: Rgba::RED,
        }
    }
}
