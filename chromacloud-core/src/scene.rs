//! Scene primitives and the name-keyed scene registry
//!
//! A [`Scene`] is a plain value: collaborators build a fresh one for every
//! data update and hand it to the renderer, which only reads it.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::vector::Vector3d;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One pixel of a point patch, as seen by a [`Shader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// Pixel row
    pub row: usize,
    /// Pixel column
    pub col: usize,
    /// Row offset from the point's center pixel
    pub d_row: i64,
    /// Column offset from the point's center pixel
    pub d_col: i64,
    /// The point's own color
    pub color: Rgba,
}

/// Per-pixel color function for points wider than one pixel
#[derive(Clone)]
pub struct Shader(Arc<dyn Fn(&Fragment) -> Rgba + Send + Sync>);

impl Shader {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Fragment) -> Rgba + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Solid patch in the point's color with a one pixel ring of `border`
    /// around a square of the given radius.
    pub fn bordered(radius: u32, border: Rgba) -> Self {
        let ring = i64::from(radius.saturating_sub(1));
        Self::new(move |frag| {
            if frag.d_row.abs().max(frag.d_col.abs()) == ring {
                border
            } else {
                frag.color
            }
        })
    }

    pub fn shade(&self, fragment: &Fragment) -> Rgba {
        (self.0)(fragment)
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Shader(..)")
    }
}

/// A colored segment in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Vector3d,
    pub end: Vector3d,
    pub color: Rgba,
}

impl Line {
    pub fn new(start: Vector3d, end: Vector3d, color: Rgba) -> Self {
        Self { start, end, color }
    }

    pub fn builder() -> LineBuilder {
        LineBuilder::default()
    }
}

/// Builder for [`Line`]; every field is required
#[derive(Debug, Clone, Default)]
pub struct LineBuilder {
    start: Option<Vector3d>,
    end: Option<Vector3d>,
    color: Option<Rgba>,
}

impl LineBuilder {
    pub fn start(mut self, start: Vector3d) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: Vector3d) -> Self {
        self.end = Some(end);
        self
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn build(self) -> Result<Line> {
        match (self.start, self.end, self.color) {
            (Some(start), Some(end), Some(color)) => Ok(Line { start, end, color }),
            _ => Err(Error::InvalidData("Line is incomplete".to_string())),
        }
    }
}

/// A colored square patch centered on a world-space position
#[derive(Debug, Clone)]
pub struct Point {
    pub position: Vector3d,
    pub color: Rgba,
    /// Half side of the patch in pixels, center included (at least 1)
    pub radius: u32,
    pub shader: Option<Shader>,
    /// Draw without reading or writing the depth buffer
    pub disable_depth_buffer: bool,
}

impl Point {
    /// A one pixel, depth-tested point
    pub fn new(position: Vector3d, color: Rgba) -> Self {
        Self {
            position,
            color,
            radius: 1,
            shader: None,
            disable_depth_buffer: false,
        }
    }

    pub fn builder() -> PointBuilder {
        PointBuilder::default()
    }

    /// Color of one pixel of the patch
    pub fn shade(&self, fragment: &Fragment) -> Rgba {
        match &self.shader {
            Some(shader) => shader.shade(fragment),
            None => fragment.color,
        }
    }
}

/// Builder for [`Point`]; position, color and radius are required
#[derive(Debug, Clone, Default)]
pub struct PointBuilder {
    position: Option<Vector3d>,
    color: Option<Rgba>,
    radius: Option<u32>,
    shader: Option<Shader>,
    disable_depth_buffer: bool,
}

impl PointBuilder {
    pub fn position(mut self, position: Vector3d) -> Self {
        self.position = Some(position);
        self
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn shader(mut self, shader: Shader) -> Self {
        self.shader = Some(shader);
        self
    }

    pub fn disable_depth_buffer(mut self, disable: bool) -> Self {
        self.disable_depth_buffer = disable;
        self
    }

    pub fn build(self) -> Result<Point> {
        let (Some(position), Some(color), Some(radius)) = (self.position, self.color, self.radius)
        else {
            return Err(Error::InvalidData("Point is incomplete".to_string()));
        };
        if radius == 0 {
            return Err(Error::InvalidData("Point radius must be at least 1".to_string()));
        }
        Ok(Point {
            position,
            color,
            radius,
            shader: self.shader,
            disable_depth_buffer: self.disable_depth_buffer,
        })
    }
}

/// Anything the renderer knows how to draw
#[derive(Debug, Clone)]
pub enum Primitive {
    Line(Line),
    Point(Point),
}

impl From<Line> for Primitive {
    fn from(line: Line) -> Self {
        Primitive::Line(line)
    }
}

impl From<Point> for Primitive {
    fn from(point: Point) -> Self {
        Primitive::Point(point)
    }
}

/// Name-keyed primitives, enumerated in insertion order.
///
/// Adding under an existing name replaces that primitive in place; it keeps
/// the position of the first insertion.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entries: Vec<(String, Primitive)>,
    index: HashMap<String, usize>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new scene with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Add or replace the primitive registered under `name`
    pub fn add(&mut self, name: impl Into<String>, primitive: impl Into<Primitive>) -> &mut Self {
        let name = name.into();
        let primitive = primitive.into();
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = primitive,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, primitive));
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Primitive> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Remove every primitive
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(name, primitive)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Primitive)> + '_ {
        self.entries.iter().map(|(name, p)| (name.as_str(), p))
    }

    /// Primitives in insertion order
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> + '_ {
        self.entries.iter().map(|(_, p)| p)
    }
}

impl<N: Into<String>, P: Into<Primitive>> Extend<(N, P)> for Scene {
    fn extend<I: IntoIterator<Item = (N, P)>>(&mut self, iter: I) {
        for (name, primitive) in iter {
            self.add(name, primitive);
        }
    }
}

impl<N: Into<String>, P: Into<Primitive>> FromIterator<(N, P)> for Scene {
    fn from_iter<I: IntoIterator<Item = (N, P)>>(iter: I) -> Self {
        let mut scene = Scene::new();
        scene.extend(iter);
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin_point(color: Rgba) -> Point {
        Point::new(Vector3d::zeros(), color)
    }

    #[test]
    fn test_scene_keeps_insertion_order() {
        let mut scene = Scene::new();
        scene
            .add("b", origin_point(Rgba::WHITE))
            .add("a", Line::new(Vector3d::zeros(), Vector3d::x(), Rgba::RED))
            .add("c", origin_point(Rgba::BLACK));

        let names: Vec<_> = scene.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_scene_add_replaces_in_place() {
        let mut scene = Scene::new();
        scene.add("p", origin_point(Rgba::WHITE));
        scene.add("q", origin_point(Rgba::WHITE));
        scene.add("p", origin_point(Rgba::RED));

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.iter().next().map(|(name, _)| name), Some("p"));
        match scene.get("p") {
            Some(Primitive::Point(p)) => assert_eq!(p.color, Rgba::RED),
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn test_scene_clear() {
        let mut scene: Scene = (0..4).map(|i| (format!("p{i}"), origin_point(Rgba::WHITE))).collect();
        assert_eq!(scene.len(), 4);
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.get("p0").is_none());
    }

    #[test]
    fn test_builders_require_fields() {
        let line = Line::builder().start(Vector3d::zeros()).color(Rgba::WHITE).build();
        assert_eq!(line.unwrap_err(), Error::InvalidData("Line is incomplete".to_string()));

        let point = Point::builder().position(Vector3d::zeros()).radius(2).build();
        assert!(matches!(point, Err(Error::InvalidData(_))));

        let zero_radius = Point::builder()
            .position(Vector3d::zeros())
            .color(Rgba::WHITE)
            .radius(0)
            .build();
        assert!(matches!(zero_radius, Err(Error::InvalidData(_))));

        let point = Point::builder()
            .position(Vector3d::zeros())
            .color(Rgba::WHITE)
            .radius(3)
            .disable_depth_buffer(true)
            .build()
            .unwrap();
        assert_eq!(point.radius, 3);
        assert!(point.disable_depth_buffer);
    }

    #[test]
    fn test_bordered_shader() {
        let shader = Shader::bordered(3, Rgba::RED);
        let frag = |d_row, d_col| Fragment { row: 10, col: 10, d_row, d_col, color: Rgba::WHITE };

        assert_eq!(shader.shade(&frag(0, 0)), Rgba::WHITE);
        assert_eq!(shader.shade(&frag(1, -1)), Rgba::WHITE);
        assert_eq!(shader.shade(&frag(2, 0)), Rgba::RED);
        assert_eq!(shader.shade(&frag(-1, -2)), Rgba::RED);
    }

    #[test]
    fn test_point_without_shader_keeps_color() {
        let point = origin_point(Rgba::rgb(1, 2, 3));
        let frag = Fragment { row: 0, col: 0, d_row: 0, d_col: 0, color: point.color };
        assert_eq!(point.shade(&frag), Rgba::rgb(1, 2, 3));
    }
}
