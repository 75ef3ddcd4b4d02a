//! Software renderer for chromacloud scenes
//!
//! An orbiting perspective [`Camera`] projects the lines and points of a
//! [`Scene`](chromacloud_core::Scene) into a CPU [`Framebuffer`], which is
//! then flushed to any [`Surface`]. [`Viewer`] drives this once per frame
//! and turns pointer input into orbit changes through [`OrbitControls`].
//!
//! ```
//! use chromacloud_core::{Point, Rgba, Scene, Vector3d};
//! use chromacloud_render::{Viewer, ViewerConfig};
//!
//! let mut scene = Scene::new();
//! scene.add("origin", Point::new(Vector3d::zeros(), Rgba::WHITE));
//!
//! let mut viewer = Viewer::new(64, 64, ViewerConfig::default()).unwrap();
//! let mut image = image::RgbaImage::new(64, 64);
//! let stats = viewer.render_frame(&scene, &mut image).unwrap();
//! assert_eq!(stats.points_drawn, 1);
//! ```

pub mod camera;
pub mod config;
pub mod controls;
pub mod depth;
pub mod framebuffer;
pub mod metrics;
pub mod overlay;
pub mod raster;
pub mod surface;
pub mod viewer;

pub use camera::{Basis, Camera, LineOutcome, NearClip, OrbitParams, PointOutcome, ShotStats};
pub use config::{CameraConfig, ControlConfig, OverlayConfig, RenderConfig, ViewerConfig};
pub use controls::OrbitControls;
pub use depth::DepthBuffer;
pub use framebuffer::{Framebuffer, Window};
pub use metrics::{Metrics, TimingSummary};
pub use overlay::{Cluster, ClusterSceneBuilder};
pub use surface::Surface;
pub use viewer::Viewer;
