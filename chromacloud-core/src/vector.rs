//! Vector types and related functionality
//!
//! Fixed-size vectors are plain `nalgebra` vectors, which are `Copy` values:
//! every operation returns a new vector. [`VecN`] is the general
//! n-dimensional vector handed around by clustering collaborators; its binary
//! operations check dimensions and fail instead of truncating.

use crate::error::{Error, Result};
use nalgebra::{DVector, SVector, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// A 2D vector with double precision components
pub type Vector2d = Vector2<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Precision used by approximate vector equality when none is given
pub const DEFAULT_PRECISION: f64 = 1e-5;

/// Extra operations on fixed-size vectors.
///
/// Arithmetic, `dot`, `map` and `lerp` come straight from `nalgebra`.
pub trait VectorExt: Sized {
    /// Sum of squared components
    fn squared_length(&self) -> f64;

    /// Euclidean length
    fn length(&self) -> f64;

    /// Scale to unit length, unless some component is exactly zero.
    ///
    /// Vectors with a zero component (including the zero vector) are returned
    /// unchanged. Callers that need every non-zero vector normalized must
    /// guard separately.
    fn normalize_nonzero(&self) -> Self;

    /// Left fold over `(accumulator, component, index)`
    fn fold_indexed<F>(&self, init: f64, f: F) -> f64
    where
        F: FnMut(f64, f64, usize) -> f64;

    /// `true` when the distance between both vectors is below `precision`
    fn approx_eq(&self, other: &Self, precision: f64) -> bool;
}

impl<const D: usize> VectorExt for SVector<f64, D> {
    fn squared_length(&self) -> f64 {
        self.norm_squared()
    }

    fn length(&self) -> f64 {
        self.norm()
    }

    fn normalize_nonzero(&self) -> Self {
        if self.iter().any(|&c| c == 0.0) {
            return *self;
        }
        self / self.norm()
    }

    fn fold_indexed<F>(&self, init: f64, mut f: F) -> f64
    where
        F: FnMut(f64, f64, usize) -> f64,
    {
        self.iter()
            .enumerate()
            .fold(init, |acc, (i, &c)| f(acc, c, i))
    }

    fn approx_eq(&self, other: &Self, precision: f64) -> bool {
        (self - other).norm() < precision
    }
}

/// A dense vector of arbitrary dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VecN {
    data: DVector<f64>,
}

impl VecN {
    /// Create a vector from its components
    pub fn from_slice(components: &[f64]) -> Self {
        Self {
            data: DVector::from_column_slice(components),
        }
    }

    /// Create a vector taking ownership of its components
    pub fn from_vec(components: Vec<f64>) -> Self {
        Self {
            data: DVector::from_vec(components),
        }
    }

    /// The zero vector of dimension `n`
    pub fn zeros(n: usize) -> Self {
        Self {
            data: DVector::zeros(n),
        }
    }

    /// The canonical basis vector `e_i` of dimension `n`.
    ///
    /// An index outside `0..n` yields the zero vector.
    pub fn unit(n: usize, i: usize) -> Self {
        let mut data = DVector::zeros(n);
        if i < n {
            data[i] = 1.0;
        }
        Self { data }
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the vector has no components
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Component at index `i`, if any
    pub fn get(&self, i: usize) -> Option<f64> {
        self.data.get(i).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.data.as_slice()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    fn same_size(&self, other: &Self) -> Result<()> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                left: self.len(),
                right: other.len(),
            })
        }
    }

    fn zip_with<F>(&self, other: &Self, op: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.same_size(other)?;
        Ok(Self {
            data: self.data.zip_map(&other.data, op),
        })
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Componentwise product
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Componentwise quotient
    pub fn div(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a / b)
    }

    pub fn dot(&self, other: &Self) -> Result<f64> {
        self.same_size(other)?;
        Ok(self.data.dot(&other.data))
    }

    /// `self + (other - self) * t`
    pub fn lerp(&self, other: &Self, t: f64) -> Result<Self> {
        self.zip_with(other, |a, b| a + (b - a) * t)
    }

    pub fn scale(&self, r: f64) -> Self {
        Self {
            data: &self.data * r,
        }
    }

    /// Apply `f(component, index)` to every component
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(f64, usize) -> f64,
    {
        let components = self.data.iter().enumerate().map(|(i, &c)| f(c, i));
        Self {
            data: DVector::from_iterator(self.len(), components),
        }
    }

    /// Left fold over `(accumulator, component, index)`
    pub fn fold<F>(&self, init: f64, mut f: F) -> f64
    where
        F: FnMut(f64, f64, usize) -> f64,
    {
        self.data
            .iter()
            .enumerate()
            .fold(init, |acc, (i, &c)| f(acc, c, i))
    }

    pub fn squared_length(&self) -> f64 {
        self.data.norm_squared()
    }

    pub fn length(&self) -> f64 {
        self.data.norm()
    }

    /// Same rule as [`VectorExt::normalize_nonzero`]
    pub fn normalize(&self) -> Self {
        if self.data.iter().any(|&c| c == 0.0) {
            return self.clone();
        }
        self.scale(1.0 / self.length())
    }

    /// Components in `start..end`, clamped to the vector's length
    pub fn take(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len());
        let start = start.min(end);
        Self::from_slice(&self.as_slice()[start..end])
    }

    /// Approximate equality: the distance between both vectors is below `precision`
    pub fn approx_eq(&self, other: &Self, precision: f64) -> Result<bool> {
        Ok(self.sub(other)?.length() < precision)
    }

    pub fn to_vector3(&self) -> Result<Vector3d> {
        match self.as_slice() {
            &[x, y, z] => Ok(Vector3d::new(x, y, z)),
            _ => Err(Error::DimensionMismatch {
                left: self.len(),
                right: 3,
            }),
        }
    }
}

impl From<Vector3d> for VecN {
    fn from(v: Vector3d) -> Self {
        Self::from_slice(v.as_slice())
    }
}

impl From<Vector2d> for VecN {
    fn from(v: Vector2d) -> Self {
        Self::from_slice(v.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_nonzero_scales_to_unit_length() {
        let v = Vector3d::new(1.0, 2.0, 2.0).normalize_nonzero();
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v, Vector3d::new(1.0, 2.0, 2.0) / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_keeps_vectors_with_zero_component() {
        let zero = Vector3d::zeros();
        assert_eq!(zero.normalize_nonzero(), zero);

        let axis = Vector2d::new(3.0, 0.0);
        assert_eq!(axis.normalize_nonzero(), axis);
    }

    #[test]
    fn test_fold_indexed_and_lengths() {
        let v = Vector3d::new(1.0, 2.0, 3.0);
        let weighted = v.fold_indexed(0.0, |acc, c, i| acc + c * i as f64);
        assert_relative_eq!(weighted, 8.0);
        assert_relative_eq!(v.squared_length(), 14.0);
        assert_relative_eq!(v.lerp(&Vector3d::zeros(), 0.5), Vector3d::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn test_approx_eq() {
        let a = Vector2d::new(1.0, 1.0);
        assert!(a.approx_eq(&Vector2d::new(1.0, 1.0 + 1e-7), DEFAULT_PRECISION));
        assert!(!a.approx_eq(&Vector2d::new(1.0, 1.1), DEFAULT_PRECISION));
    }

    #[test]
    fn test_vecn_arithmetic() {
        let a = VecN::from_slice(&[1.0, 2.0, 3.0]);
        let b = VecN::from_slice(&[4.0, 5.0, 6.0]);

        assert_eq!(a.add(&b).unwrap().to_vec(), vec![5.0, 7.0, 9.0]);
        assert_eq!(b.sub(&a).unwrap().to_vec(), vec![3.0, 3.0, 3.0]);
        assert_eq!(a.mul(&b).unwrap().to_vec(), vec![4.0, 10.0, 18.0]);
        assert_relative_eq!(a.dot(&b).unwrap(), 32.0);
        assert_eq!(a.scale(2.0).to_vec(), vec![2.0, 4.0, 6.0]);
        assert_eq!(a.map(|c, i| c + i as f64).to_vec(), vec![1.0, 3.0, 5.0]);
        assert_relative_eq!(a.fold(0.0, |acc, c, _| acc + c), 6.0);
        assert_eq!(a.lerp(&b, 0.5).unwrap().to_vec(), vec![2.5, 3.5, 4.5]);
    }

    #[test]
    fn test_vecn_dimension_mismatch() {
        let a = VecN::from_slice(&[1.0, 2.0, 3.0]);
        let b = VecN::from_slice(&[1.0, 2.0]);

        let err = a.add(&b).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { left: 3, right: 2 });
        assert!(a.dot(&b).is_err());
        assert!(a.approx_eq(&b, DEFAULT_PRECISION).is_err());
        assert!(b.to_vector3().is_err());
    }

    #[test]
    fn test_vecn_unit_take_and_conversion() {
        assert_eq!(VecN::unit(3, 1).to_vec(), vec![0.0, 1.0, 0.0]);
        assert_eq!(VecN::unit(3, 7), VecN::zeros(3));

        let v = VecN::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v.take(1, 3).to_vec(), vec![2.0, 3.0]);
        assert_eq!(v.take(2, 10).to_vec(), vec![3.0, 4.0]);
        assert!(v.take(5, 10).is_empty());

        let p = VecN::from(Vector3d::new(0.25, 0.5, 0.75));
        assert_eq!(p.to_vector3().unwrap(), Vector3d::new(0.25, 0.5, 0.75));
    }

    #[test]
    fn test_vecn_normalize_quirk() {
        let v = VecN::from_slice(&[3.0, 4.0]).normalize();
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-12);

        let with_zero = VecN::from_slice(&[0.0, 4.0]);
        assert_eq!(with_zero.normalize(), with_zero);
    }
}
