//! Per-pixel depth buffer owned by a single scene shot

/// Closest camera-space depth seen so far at every pixel
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    depths: Vec<f64>,
}

impl DepthBuffer {
    /// A buffer with every pixel infinitely far away
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depths: vec![f64::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.index(row, col).map(|i| self.depths[i])
    }

    /// Admit `depth` at `(row, col)` if it is strictly closer than what is
    /// stored, recording it on success. Pixels outside the buffer are rejected.
    pub fn test_and_set(&mut self, row: usize, col: usize, depth: f64) -> bool {
        let Some(i) = self.index(row, col) else {
            return false;
        };
        if depth < self.depths[i] {
            self.depths[i] = depth;
            true
        } else {
            false
        }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_infinitely_far() {
        let depth = DepthBuffer::new(4, 3);
        assert_eq!(depth.get(2, 3), Some(f64::INFINITY));
        assert_eq!(depth.get(3, 0), None);
    }

    #[test]
    fn test_only_strictly_closer_depths_pass() {
        let mut depth = DepthBuffer::new(2, 2);
        assert!(depth.test_and_set(1, 1, 5.0));
        assert!(!depth.test_and_set(1, 1, 5.0));
        assert!(!depth.test_and_set(1, 1, 6.0));
        assert!(depth.test_and_set(1, 1, 2.0));
        assert_eq!(depth.get(1, 1), Some(2.0));
        assert_eq!(depth.get(0, 0), Some(f64::INFINITY));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut depth = DepthBuffer::new(2, 2);
        assert!(!depth.test_and_set(2, 0, 1.0));
        assert!(!depth.test_and_set(0, 2, 1.0));
    }
}
