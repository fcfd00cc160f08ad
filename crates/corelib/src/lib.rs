//! Core types: math re-exports, bounding volumes, similarity transform.

pub use glam::{Mat4, Vec3, vec3};

pub mod bounds;
pub mod transform;
