//! Core data structures for chromacloud
//! 
//! This crate provides the fundamental types shared by the renderer and the
//! clustering collaborators that feed it: fixed and general vectors, RGBA
//! colors, and the scene registry of drawable lines and points.

pub mod vector;
pub mod color;
pub mod scene;
pub mod error;

pub use vector::*;
pub use color::*;
pub use scene::*;
pub use error::*;
