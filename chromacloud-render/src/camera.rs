//! Orbiting perspective camera
//!
//! The camera sits on a sphere around its focal point and always looks at it.
//! Shooting a scene transforms every primitive into camera space, culls or
//! clips it against the image plane, projects it and hands the result to the
//! framebuffer.

use crate::config::CameraConfig;
use crate::depth::DepthBuffer;
use crate::framebuffer::{Framebuffer, Window};
use crate::surface::Surface;
use chromacloud_core::{Error, Line, Point, Primitive, Result, Scene, Vector2d, Vector3d};
use log::{debug, trace};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Spherical coordinates of the eye around the focal point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    /// Distance from the focal point (rho)
    pub radius: f64,
    /// Angle around the z axis (theta)
    pub azimuth: f64,
    /// Angle above the xy plane (phi); the basis degenerates at ±π/2
    pub elevation: f64,
}

impl OrbitParams {
    pub const fn new(radius: f64, azimuth: f64, elevation: f64) -> Self {
        Self {
            radius,
            azimuth,
            elevation,
        }
    }

    /// Parameters shifted by the given deltas
    pub fn offset(self, d_radius: f64, d_azimuth: f64, d_elevation: f64) -> Self {
        Self::new(
            self.radius + d_radius,
            self.azimuth + d_azimuth,
            self.elevation + d_elevation,
        )
    }
}

/// World-space axes of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub right: Vector3d,
    pub up: Vector3d,
    /// Points from the eye toward the focal point
    pub forward: Vector3d,
}

impl Basis {
    fn from_orbit(params: &OrbitParams) -> Self {
        let (sin_t, cos_t) = params.azimuth.sin_cos();
        let (sin_p, cos_p) = params.elevation.sin_cos();
        Self {
            right: Vector3d::new(-sin_t, cos_t, 0.0),
            up: Vector3d::new(-sin_p * cos_t, -sin_p * sin_t, cos_p),
            forward: Vector3d::new(-cos_p * cos_t, -cos_p * sin_t, -sin_p),
        }
    }

    /// The axes as matrix columns
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[self.right, self.up, self.forward])
    }

    /// Express a world-space direction in camera axes (`basisᵀ · v`)
    pub fn to_camera(&self, v: &Vector3d) -> Vector3d {
        self.matrix().tr_mul(v)
    }
}

/// What happened to a line during a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Both endpoints were in front of the image plane
    Drawn,
    /// One endpoint was moved onto the image plane
    Clipped,
    Culled,
}

/// What happened to a point during a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    /// Handed to the rasterizer; `pixels` passed the depth test
    Drawn { pixels: usize },
    Culled,
}

/// Result of clipping a camera-space segment against the image plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NearClip {
    Inside(Vector3d, Vector3d),
    Clipped(Vector3d, Vector3d),
    Culled,
}

/// Counts collected while shooting one scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotStats {
    pub lines_drawn: usize,
    pub lines_clipped: usize,
    pub lines_culled: usize,
    pub points_drawn: usize,
    pub points_culled: usize,
    /// Point pixels that passed the depth test
    pub point_pixels: usize,
}

/// A perspective camera orbiting a focal point
#[derive(Debug, Clone)]
pub struct Camera {
    distance_to_plane: f64,
    field_of_view_half_angle: f64,
    /// Orbit parameters; call [`Camera::orbit`] after changing them
    pub orbit_params: OrbitParams,
    focal_point: Vector3d,
    eye: Vector3d,
    basis: Basis,
}

impl Camera {
    /// Create a camera, already orbited to its initial parameters
    pub fn new(config: CameraConfig) -> Result<Self> {
        if !(config.distance_to_plane > 0.0 && config.distance_to_plane.is_finite()) {
            return Err(Error::InvalidData(format!(
                "distance to plane must be positive, got {}",
                config.distance_to_plane
            )));
        }
        let half_angle = config.field_of_view_half_angle;
        if !(half_angle > 0.0 && half_angle < std::f64::consts::FRAC_PI_2) {
            return Err(Error::InvalidData(format!(
                "field of view half angle must be in (0, pi/2), got {half_angle}"
            )));
        }
        Ok(Self::from_config(config))
    }

    fn from_config(config: CameraConfig) -> Self {
        let mut camera = Self {
            distance_to_plane: config.distance_to_plane,
            field_of_view_half_angle: config.field_of_view_half_angle,
            orbit_params: config.orbit,
            focal_point: config.focal_point,
            eye: Vector3d::zeros(),
            basis: Basis::from_orbit(&config.orbit),
        };
        camera.orbit();
        camera
    }

    /// Recompute basis and eye from the orbit parameters
    pub fn orbit(&mut self) -> &mut Self {
        let params = self.orbit_params;
        let (sin_t, cos_t) = params.azimuth.sin_cos();
        let (sin_p, cos_p) = params.elevation.sin_cos();

        self.basis = Basis::from_orbit(&params);
        let offset = Vector3d::new(cos_p * cos_t, cos_p * sin_t, sin_p) * params.radius;
        self.eye = self.focal_point + offset;
        self
    }

    pub fn eye(&self) -> Vector3d {
        self.eye
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn focal_point(&self) -> Vector3d {
        self.focal_point
    }

    /// Move the orbit center; takes effect at the next [`Camera::orbit`]
    pub fn set_focal_point(&mut self, focal_point: Vector3d) {
        self.focal_point = focal_point;
    }

    pub fn distance_to_plane(&self) -> f64 {
        self.distance_to_plane
    }

    pub fn field_of_view_half_angle(&self) -> f64 {
        self.field_of_view_half_angle
    }

    /// Half side of the visible square of the image plane
    pub fn window_half_extent(&self) -> f64 {
        self.distance_to_plane * self.field_of_view_half_angle.tan()
    }

    pub fn to_camera_space(&self, world: &Vector3d) -> Vector3d {
        self.basis.to_camera(&(world - self.eye))
    }

    /// In front of (or on) the image plane
    pub fn in_frustum(&self, camera_space: &Vector3d) -> bool {
        camera_space.z >= self.distance_to_plane
    }

    /// Perspective projection of a camera-space point onto the image plane
    pub fn project(&self, camera_space: &Vector3d) -> Vector2d {
        camera_space.xy() * (self.distance_to_plane / camera_space.z)
    }

    /// Clip a camera-space segment so both ends lie in the frustum
    pub fn clip_to_near_plane(&self, start: Vector3d, end: Vector3d) -> NearClip {
        match (self.in_frustum(&start), self.in_frustum(&end)) {
            (true, true) => NearClip::Inside(start, end),
            (false, false) => NearClip::Culled,
            (true, false) => match self.intersect_image_plane(&end, &start) {
                Ok(p) => NearClip::Clipped(start, p),
                Err(err) => {
                    trace!("dropping line: {err}");
                    NearClip::Culled
                }
            },
            (false, true) => match self.intersect_image_plane(&start, &end) {
                Ok(p) => NearClip::Clipped(p, end),
                Err(err) => {
                    trace!("dropping line: {err}");
                    NearClip::Culled
                }
            },
        }
    }

    /// Point where the camera-space segment `outside → inside` crosses the
    /// image plane, found by extending from the `outside` end.
    ///
    /// Segments parallel to the plane, or whose crossing is not finite, are
    /// [`Error::DegenerateGeometry`].
    pub fn intersect_image_plane(&self, outside: &Vector3d, inside: &Vector3d) -> Result<Vector3d> {
        let v = outside - inside;
        if v.z == 0.0 {
            return Err(Error::DegenerateGeometry(
                "segment is parallel to the image plane".to_string(),
            ));
        }
        let t = (self.distance_to_plane - outside.z) / v.z;
        let p = outside + v * t;
        if p.iter().all(|c| c.is_finite()) {
            Ok(p)
        } else {
            Err(Error::DegenerateGeometry(format!(
                "image plane crossing of {outside:?} -> {inside:?} is not finite"
            )))
        }
    }

    /// Draw a line; lines are never depth tested
    pub fn draw_line(&self, line: &Line, framebuffer: &mut Framebuffer) -> LineOutcome {
        let start = self.to_camera_space(&line.start);
        let end = self.to_camera_space(&line.end);

        let (start, end, outcome) = match self.clip_to_near_plane(start, end) {
            NearClip::Inside(a, b) => (a, b, LineOutcome::Drawn),
            NearClip::Clipped(a, b) => (a, b, LineOutcome::Clipped),
            NearClip::Culled => return LineOutcome::Culled,
        };

        framebuffer.draw_line(&self.project(&start), &self.project(&end), line.color);
        outcome
    }

    /// Draw a point through the shared depth buffer
    pub fn draw_point(
        &self,
        point: &Point,
        framebuffer: &mut Framebuffer,
        depth: &mut DepthBuffer,
    ) -> PointOutcome {
        let camera_space = self.to_camera_space(&point.position);
        if !self.in_frustum(&camera_space) {
            return PointOutcome::Culled;
        }
        let z = camera_space.z;
        let projected = self.project(&camera_space);

        let pixels = framebuffer.draw_point(
            &projected,
            point.color,
            point.radius,
            |row, col| point.disable_depth_buffer || depth.test_and_set(row, col, z),
            |fragment| point.shade(fragment),
        );
        PointOutcome::Drawn { pixels }
    }

    /// Draw every primitive of `scene` in insertion order, then flush the
    /// framebuffer to `surface`.
    ///
    /// The framebuffer window is set to the visible square of the image
    /// plane. One depth buffer is shared by all points of this shot.
    pub fn shoot_scene<S>(
        &self,
        scene: &Scene,
        framebuffer: &mut Framebuffer,
        surface: &mut S,
    ) -> Result<ShotStats>
    where
        S: Surface + ?Sized,
    {
        let half = self.window_half_extent();
        framebuffer.set_window(Window::symmetric(half));
        let mut depth = DepthBuffer::new(framebuffer.width(), framebuffer.height());
        let mut stats = ShotStats::default();

        for (name, primitive) in scene.iter() {
            match primitive {
                Primitive::Line(line) => match self.draw_line(line, framebuffer) {
                    LineOutcome::Drawn => stats.lines_drawn += 1,
                    LineOutcome::Clipped => {
                        trace!("line {name} clipped at the image plane");
                        stats.lines_drawn += 1;
                        stats.lines_clipped += 1;
                    }
                    LineOutcome::Culled => {
                        trace!("line {name} behind the image plane");
                        stats.lines_culled += 1;
                    }
                },
                Primitive::Point(point) => match self.draw_point(point, framebuffer, &mut depth) {
                    PointOutcome::Drawn { pixels } => {
                        stats.points_drawn += 1;
                        stats.point_pixels += pixels;
                    }
                    PointOutcome::Culled => {
                        trace!("point {name} behind the image plane");
                        stats.points_culled += 1;
                    }
                },
            }
        }

        framebuffer.flush(surface)?;
        debug!(
            "shot {} primitives: {} lines drawn ({} clipped, {} culled), {} points drawn ({} culled)",
            scene.len(),
            stats.lines_drawn,
            stats.lines_clipped,
            stats.lines_culled,
            stats.points_drawn,
            stats.points_culled
        );
        Ok(stats)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chromacloud_core::Rgba;
    use image::RgbaImage;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn camera_at(orbit: OrbitParams) -> Camera {
        Camera::new(CameraConfig {
            orbit,
            ..CameraConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_scenario() {
        let camera = camera_at(OrbitParams::new(2.0, 0.0, 0.0));
        assert_relative_eq!(camera.eye(), Vector3d::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(camera.basis().forward, Vector3d::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(camera.window_half_extent(), 1.0, epsilon = 1e-12);

        let origin = camera.to_camera_space(&Vector3d::zeros());
        assert_relative_eq!(origin.z, 2.0, epsilon = 1e-12);
        assert!(camera.in_frustum(&origin));

        let behind = camera.to_camera_space(&Vector3d::new(3.0, 0.0, 0.0));
        assert_relative_eq!(behind.z, -1.0, epsilon = 1e-12);
        assert!(!camera.in_frustum(&behind));
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let params = OrbitParams::new(
                rng.gen_range(0.1..10.0),
                rng.gen_range(-2.0 * PI..2.0 * PI),
                rng.gen_range(-FRAC_PI_2 + 1e-3..FRAC_PI_2 - 1e-3),
            );
            let camera = camera_at(params);
            let Basis { right, up, forward } = *camera.basis();

            assert_abs_diff_eq!(right.dot(&up), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(right.dot(&forward), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(up.dot(&forward), 0.0, epsilon = 1e-12);
            for axis in [right, up, forward] {
                assert_relative_eq!(axis.norm(), 1.0, epsilon = 1e-12);
            }

            // forward points from the eye toward the focal point
            let to_focal = (camera.focal_point() - camera.eye()).normalize();
            assert_relative_eq!(forward, to_focal, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_orbit_is_idempotent() {
        let mut camera = camera_at(OrbitParams::new(3.0, 0.7, -0.4));
        camera.orbit();
        let (eye, basis) = (camera.eye(), *camera.basis());
        camera.orbit();
        assert_eq!(camera.eye(), eye);
        assert_eq!(*camera.basis(), basis);
    }

    #[test]
    fn test_orbit_follows_focal_point() {
        let mut camera = Camera::new(CameraConfig {
            orbit: OrbitParams::new(1.5, FRAC_PI_2, 0.0),
            focal_point: Vector3d::new(0.5, 0.5, 0.5),
            ..CameraConfig::default()
        })
        .unwrap();
        assert_relative_eq!(camera.eye(), Vector3d::new(0.5, 2.0, 0.5), epsilon = 1e-12);

        camera.set_focal_point(Vector3d::zeros());
        camera.orbit();
        assert_relative_eq!(camera.eye(), Vector3d::new(0.0, 1.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_invalid_projection() {
        let bad_distance = CameraConfig {
            distance_to_plane: 0.0,
            ..CameraConfig::default()
        };
        assert!(Camera::new(bad_distance).is_err());

        let bad_angle = CameraConfig {
            field_of_view_half_angle: FRAC_PI_2,
            ..CameraConfig::default()
        };
        assert!(Camera::new(bad_angle).is_err());
    }

    #[test]
    fn test_clip_keeps_lines_in_front() {
        let camera = Camera::default();
        let a = Vector3d::new(0.1, 0.2, 1.5);
        let b = Vector3d::new(-0.3, 0.0, 4.0);
        assert_eq!(camera.clip_to_near_plane(a, b), NearClip::Inside(a, b));
    }

    #[test]
    fn test_clip_moves_vertex_onto_image_plane() {
        let camera = Camera::default();
        let inside = Vector3d::new(0.5, -0.5, 3.0);
        let outside = Vector3d::new(-0.5, 0.5, -1.0);

        match camera.clip_to_near_plane(outside, inside) {
            NearClip::Clipped(p, q) => {
                assert_eq!(q, inside);
                assert_relative_eq!(p.z, camera.distance_to_plane(), epsilon = 1e-12);
                // the new vertex stays on the original segment
                let t = (p.x - inside.x) / (outside.x - inside.x);
                assert_relative_eq!(p, inside + (outside - inside) * t, epsilon = 1e-12);
            }
            other => panic!("expected a clipped line, got {other:?}"),
        }

        match camera.clip_to_near_plane(inside, outside) {
            NearClip::Clipped(p, q) => {
                assert_eq!(p, inside);
                assert_relative_eq!(q.z, camera.distance_to_plane(), epsilon = 1e-12);
            }
            other => panic!("expected a clipped line, got {other:?}"),
        }
    }

    #[test]
    fn test_image_plane_intersection_reports_degenerate_segments() {
        let camera = Camera::default();
        let p = camera
            .intersect_image_plane(&Vector3d::new(1.0, 2.0, -1.0), &Vector3d::new(1.0, 2.0, 3.0))
            .unwrap();
        assert_relative_eq!(p, Vector3d::new(1.0, 2.0, 1.0));

        let parallel = camera.intersect_image_plane(&Vector3d::new(0.0, 0.0, 0.5), &Vector3d::new(1.0, 0.0, 0.5));
        assert!(matches!(parallel, Err(Error::DegenerateGeometry(_))));

        let far = camera.intersect_image_plane(&Vector3d::new(f64::INFINITY, 0.0, -1.0), &Vector3d::new(0.0, 0.0, 3.0));
        assert!(matches!(far, Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn test_clip_culls_lines_behind() {
        let camera = Camera::default();
        let a = Vector3d::new(0.0, 0.0, 0.5);
        let b = Vector3d::new(1.0, 0.0, -2.0);
        assert_eq!(camera.clip_to_near_plane(a, b), NearClip::Culled);
    }

    #[test]
    fn test_culled_point_writes_nothing() {
        let camera = Camera::default();
        let mut framebuffer = Framebuffer::new(32, 32);
        framebuffer.set_window(Window::symmetric(camera.window_half_extent()));
        framebuffer.fill(Rgba::BLACK);
        let mut depth = DepthBuffer::new(32, 32);

        // camera-space z is 1.5 - 1 = 0.5 < distance to plane
        let point = Point::new(Vector3d::new(1.5, 0.0, 0.0), Rgba::WHITE);
        assert_eq!(camera.draw_point(&point, &mut framebuffer, &mut depth), PointOutcome::Culled);
        assert!(framebuffer.pixels().iter().all(|&p| p == Rgba::BLACK));
    }

    #[test]
    fn test_shoot_scene_projects_origin_to_center() {
        let camera = Camera::default();
        let mut framebuffer = Framebuffer::new(64, 48);
        framebuffer.fill(Rgba::BLACK);
        let mut surface = RgbaImage::new(64, 48);

        let mut scene = Scene::new();
        scene.add("origin", Point::new(Vector3d::zeros(), Rgba::WHITE));
        scene.add("behind", Point::new(Vector3d::new(3.0, 0.0, 0.0), Rgba::RED));

        let stats = camera.shoot_scene(&scene, &mut framebuffer, &mut surface).unwrap();
        assert_eq!(stats.points_drawn, 1);
        assert_eq!(stats.points_culled, 1);
        assert_eq!(framebuffer.pixel(24, 32), Some(Rgba::WHITE));
        assert_eq!(surface.get_pixel(32, 24).0, [255, 255, 255, 255]);
        assert_eq!(framebuffer.pixels().iter().filter(|&&p| p != Rgba::BLACK).count(), 1);
    }

    #[test]
    fn test_camera_space_of_rotated_camera() {
        // looking down from above: eye on +z, forward -z
        let camera = camera_at(OrbitParams::new(2.0, 0.0, FRAC_PI_2 - 1e-9));
        let p = camera.to_camera_space(&Vector3d::zeros());
        assert_relative_eq!(p.z, 2.0, epsilon = 1e-6);

        let diag = camera_at(OrbitParams::new(2.0, FRAC_PI_4, 0.0));
        assert_relative_eq!(
            diag.eye(),
            Vector3d::new(2.0_f64.sqrt(), 2.0_f64.sqrt(), 0.0),
            epsilon = 1e-12
        );
    }
}
