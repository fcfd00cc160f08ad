use crate::{Mat4, Vec3};

/// Uniform similarity: translate by `offset`, then scale by `scale`.
///
/// `p' = (p + offset) * scale`. No rotation, so normals are unaffected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Similarity {
    pub offset: Vec3,
    pub scale: f32,
}

impl Similarity {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    #[inline]
    pub fn new(offset: Vec3, scale: f32) -> Self {
        Self { offset, scale }
    }

    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (p + self.offset) * self.scale
    }

    /// Matrix = S * T (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.scale)) * Mat4::from_translation(self.offset)
    }
}

impl Default for Similarity {
    fn default() -> Self {
        Self::identity()
    }
}
