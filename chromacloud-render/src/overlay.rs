//! Scene builders for colors shown as a point cloud inside the RGB cube
//!
//! A color `(r, g, b)` in `[0, 1]³` is drawn at the world position of the
//! same coordinates. The overlays add the outline of the cube and one marker
//! per cluster center on top of the data points.

use crate::config::OverlayConfig;
use chromacloud_core::{
    ColorState, Error, Line, Point, Result, Rgba, Scene, Shader, Vector3d,
};
use itertools::Itertools;

/// Corner `i` of the unit cube: bit 0 is x, bit 1 is y, bit 2 is z
pub fn cube_vertex(i: usize) -> Vector3d {
    Vector3d::new(
        (i & 1) as f64,
        ((i >> 1) & 1) as f64,
        ((i >> 2) & 1) as f64,
    )
}

/// The 12 edges of `[0, 1]³`, named `cube-{i}_{j}` after their corners.
///
/// Each edge is colored by `color` applied to its end corner.
pub fn unit_cube_edges<F>(mut color: F) -> Vec<(String, Line)>
where
    F: FnMut(&Vector3d) -> Rgba,
{
    (0..8usize)
        .tuple_combinations()
        .filter(|&(i, j)| (i ^ j).count_ones() == 1)
        .map(|(i, j)| {
            let (start, end) = (cube_vertex(i), cube_vertex(j));
            let line = Line::new(start, end, color(&end));
            (format!("cube-{i}_{j}"), line)
        })
        .collect()
}

/// Colors of an RGBA8 pixel buffer as points of the unit cube.
///
/// `keep` sees the pixel index and decides whether the pixel is sampled;
/// alpha is ignored and a trailing partial pixel is dropped.
pub fn points_from_rgba_pixels<F>(bytes: &[u8], mut keep: F) -> Vec<Vector3d>
where
    F: FnMut(usize) -> bool,
{
    bytes
        .chunks_exact(4)
        .enumerate()
        .filter(|&(i, _)| keep(i))
        .map(|(_, px)| {
            Vector3d::new(
                f64::from(px[0]) / 255.0,
                f64::from(px[1]) / 255.0,
                f64::from(px[2]) / 255.0,
            )
        })
        .collect()
}

/// A square marker drawn over everything else, with a one pixel `border` ring
pub fn cluster_marker(position: Vector3d, color: Rgba, radius: u32, border: Rgba) -> Result<Point> {
    Point::builder()
        .position(position)
        .color(color)
        .radius(radius)
        .shader(Shader::bordered(radius, border))
        .disable_depth_buffer(true)
        .build()
}

/// A cluster center and how the points assigned to it are colored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    /// Center in `[0, 1]³`
    pub center: Vector3d,
    pub state: ColorState,
}

impl Cluster {
    pub fn new(center: Vector3d) -> Self {
        Self {
            center,
            state: ColorState::default(),
        }
    }

    pub fn with_state(mut self, state: ColorState) -> Self {
        self.state = state;
        self
    }

    /// Color of the center itself
    pub fn color(&self) -> Rgba {
        Rgba::from_unit_rgb(&self.center)
    }

    /// Display color of a data point assigned to this cluster
    pub fn point_color(&self, point: &Vector3d) -> Rgba {
        self.state
            .resolve(self.color(), Rgba::from_unit_rgb(point))
    }
}

/// Builds the cube, data and cluster layers of a clustered color cloud
#[derive(Debug, Clone, Default)]
pub struct ClusterSceneBuilder {
    config: OverlayConfig,
}

impl ClusterSceneBuilder {
    pub fn new(config: OverlayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// A fresh scene: cube edges, then the points `rgb{i}` colored through
    /// their cluster, then the markers `rgbCluster{k}`.
    ///
    /// `assignments[i]` is the cluster index of `data[i]`.
    pub fn build(
        &self,
        data: &[Vector3d],
        clusters: &[Cluster],
        assignments: &[usize],
    ) -> Result<Scene> {
        let mut scene = Scene::with_capacity(12 + data.len() + clusters.len());
        self.rebuild(&mut scene, data, clusters, assignments)?;
        Ok(scene)
    }

    /// Replace the contents of `scene` with the clustered cloud.
    ///
    /// The inputs are validated first; on error `scene` is left untouched.
    pub fn rebuild(
        &self,
        scene: &mut Scene,
        data: &[Vector3d],
        clusters: &[Cluster],
        assignments: &[usize],
    ) -> Result<()> {
        if data.len() != assignments.len() {
            return Err(Error::DimensionMismatch {
                left: data.len(),
                right: assignments.len(),
            });
        }
        if let Some((i, &k)) = assignments.iter().find_position(|&&k| k >= clusters.len()) {
            return Err(Error::InvalidData(format!(
                "point {i} is assigned to cluster {k}, only {} clusters exist",
                clusters.len()
            )));
        }
        if self.config.data_point_radius == 0 || self.config.cluster_radius == 0 {
            return Err(Error::InvalidData("Point radius must be at least 1".to_string()));
        }

        scene.clear();
        scene.extend(unit_cube_edges(|end| Rgba::from_unit_rgb(end)));

        for (i, (point, &k)) in data.iter().zip(assignments).enumerate() {
            let colored = Point::builder()
                .position(*point)
                .color(clusters[k].point_color(point))
                .radius(self.config.data_point_radius)
                .build()?;
            scene.add(format!("rgb{i}"), colored);
        }

        for (k, cluster) in clusters.iter().enumerate() {
            let marker = cluster_marker(
                cluster.center,
                cluster.color(),
                self.config.cluster_radius,
                self.config.cluster_border,
            )?;
            scene.add(format!("rgbCluster{k}"), marker);
        }
        Ok(())
    }
}

/// Unclustered colors inside a white cube outline, each point in its own color
pub fn point_cloud_scene(data: &[Vector3d], radius: u32) -> Result<Scene> {
    let mut scene: Scene = unit_cube_edges(|_| Rgba::WHITE).into_iter().collect();
    for (i, point) in data.iter().enumerate() {
        let colored = Point::builder()
            .position(*point)
            .color(Rgba::from_unit_rgb(point))
            .radius(radius)
            .build()?;
        scene.add(format!("rgb{i}"), colored);
    }
    Ok(scene)
}
