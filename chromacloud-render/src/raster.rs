//! Line and point rasterization with rectangle clipping
//!
//! Lines are walked with a simple DDA: one sample per unit of Manhattan
//! distance, which over-samples diagonals but never leaves gaps. Segments
//! that leave the pixel rectangle are first cut against its four edges.

use crate::framebuffer::Framebuffer;
use chromacloud_core::{Fragment, Rgba, Vector2d};

/// Intersections closer than this (in segment parameter) are the same point
const SAME_INTERSECTION: f64 = 1e-9;

/// Solve `[u.x  h] [s]   [z.x]`
///       `[u.y  0] [t] = [z.y]`
///
/// `None` when the system is degenerate (`u.y == 0` or `h == 0`).
pub fn solve_upper_triangular(u: &Vector2d, h: f64, z: &Vector2d) -> Option<Vector2d> {
    if u.y == 0.0 || h == 0.0 {
        return None;
    }
    let s = z.y / u.y;
    let t = (z.x - u.x * s) / h;
    (s.is_finite() && t.is_finite()).then(|| Vector2d::new(s, t))
}

/// Solve `[u.x  0] [s]   [z.x]`
///       `[u.y  w] [t] = [z.y]`
///
/// `None` when the system is degenerate (`u.x == 0` or `w == 0`).
pub fn solve_lower_triangular(u: &Vector2d, w: f64, z: &Vector2d) -> Option<Vector2d> {
    if u.x == 0.0 || w == 0.0 {
        return None;
    }
    let s = z.x / u.x;
    let t = (z.y - u.y * s) / w;
    (s.is_finite() && t.is_finite()).then(|| Vector2d::new(s, t))
}

fn inside_rectangle(p: &Vector2d, height: f64, width: f64) -> bool {
    (0.0..=height).contains(&p.x) && (0.0..=width).contains(&p.y)
}

/// Parameters `s ∈ [0, 1]` at which the pixel segment `p0 → p1` crosses the
/// edges of `[0, height] × [0, width]`, ascending, with corner duplicates merged.
pub fn boundary_intersections(p0: &Vector2d, p1: &Vector2d, height: f64, width: f64) -> Vec<f64> {
    let v = p1 - p0;
    let solutions = [
        // left edge: (0, 0) + (height, 0) t
        solve_upper_triangular(&v, -height, &(-p0)),
        // bottom edge: (height, 0) + (0, width) t
        solve_lower_triangular(&v, -width, &Vector2d::new(height - p0.x, -p0.y)),
        // right edge: (height, width) + (-height, 0) t
        solve_upper_triangular(&v, height, &(Vector2d::new(height, width) - p0)),
        // top edge: (0, width) + (0, -width) t
        solve_lower_triangular(&v, width, &Vector2d::new(-p0.x, width - p0.y)),
    ];

    let unit = 0.0..=1.0;
    let mut hits: Vec<f64> = solutions
        .into_iter()
        .flatten()
        .filter(|st| unit.contains(&st.x) && unit.contains(&st.y))
        .map(|st| st.x)
        .collect();
    hits.sort_by(f64::total_cmp);
    hits.dedup_by(|a, b| (*a - *b).abs() < SAME_INTERSECTION);
    hits
}

/// The part of the pixel segment `p0 → p1` inside `[0, height] × [0, width]`.
///
/// With both endpoints outside and a single boundary contact (the segment
/// only touches a corner) nothing is returned.
pub fn clip_segment(
    p0: &Vector2d,
    p1: &Vector2d,
    height: f64,
    width: f64,
) -> Option<(Vector2d, Vector2d)> {
    let inside0 = inside_rectangle(p0, height, width);
    let inside1 = inside_rectangle(p1, height, width);
    if inside0 && inside1 {
        return Some((*p0, *p1));
    }

    let v = p1 - p0;
    let at = |s: f64| p0 + v * s;
    match boundary_intersections(p0, p1, height, width).as_slice() {
        [] => None,
        [s] if inside0 => Some((*p0, at(*s))),
        [s] if inside1 => Some((*p1, at(*s))),
        [_] => None,
        [first, .., last] => Some((at(*first), at(*last))),
    }
}

impl Framebuffer {
    /// Draw the segment between two continuous-space points
    pub fn draw_line(&mut self, a: &Vector2d, b: &Vector2d, color: Rgba) {
        let p0 = self.world_to_pixel(a);
        let p1 = self.world_to_pixel(b);
        self.draw_line_pixels(&p0, &p1, color);
    }

    /// Draw the segment between two fractional pixel positions, clipped to the buffer
    pub fn draw_line_pixels(&mut self, p0: &Vector2d, p1: &Vector2d, color: Rgba) {
        if !p0.iter().chain(p1.iter()).all(|c| c.is_finite()) {
            return;
        }
        let (height, width) = (self.height() as f64, self.width() as f64);
        if let Some((a, b)) = clip_segment(p0, p1, height, width) {
            self.walk_line(&a, &b, color);
        }
    }

    fn walk_line(&mut self, p0: &Vector2d, p1: &Vector2d, color: Rgba) {
        let v = p1 - p0;
        let n = v.x.abs() + v.y.abs();
        let steps = n.ceil() as usize;
        for k in 0..steps {
            let p = p0 + v * (k as f64 / n);
            self.set_pixel(p.x.floor() as i64, p.y.floor() as i64, color);
        }
    }

    /// Draw a square patch of side `2·radius − 1` centered on a continuous-space point.
    ///
    /// `admit(row, col)` is asked before every in-bounds pixel; within one
    /// patch row the scan stops at the first refusal. Admitted pixels get
    /// `shade(fragment)`. Returns the number of pixels written.
    pub fn draw_point<P, S>(
        &mut self,
        position: &Vector2d,
        color: Rgba,
        radius: u32,
        mut admit: P,
        shade: S,
    ) -> usize
    where
        P: FnMut(usize, usize) -> bool,
        S: Fn(&Fragment) -> Rgba,
    {
        let center = self.world_to_pixel(position);
        if !center.iter().all(|c| c.is_finite()) {
            return 0;
        }
        let (row, col) = (center.x.floor() as i64, center.y.floor() as i64);
        if self.index(row, col).is_none() {
            return 0;
        }

        // offsets limited to the buffer; the center is in bounds
        let reach = i64::from(radius.max(1)) - 1;
        let rows = (-reach).max(-row)..=reach.min(self.height() as i64 - 1 - row);
        let cols = (-reach).max(-col)..=reach.min(self.width() as i64 - 1 - col);
        let mut written = 0;
        for d_row in rows {
            for d_col in cols.clone() {
                let (r, c) = (row + d_row, col + d_col);
                let Some(i) = self.index(r, c) else {
                    continue;
                };
                let (r, c) = (r as usize, c as usize);
                if !admit(r, c) {
                    break;
                }
                let fragment = Fragment {
                    row: r,
                    col: c,
                    d_row,
                    d_col,
                    color,
                };
                self.pixels_mut()[i] = shade(&fragment);
                written += 1;
            }
        }
        written
    }
}
