//! CPU-side vertex, material and draw-range types produced by the loaders.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex: position, texture coordinate, normal. Object space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Stride of one vertex in the interleaved buffer.
    pub const SIZE: usize = std::mem::size_of::<Vertex>();

    pub fn new(position: [f32; 3], tex_coord: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }

    /// Exact bit equality across every field.
    ///
    /// Unlike `==`, `0.0` and `-0.0` differ and identical NaNs match.
    #[inline]
    pub fn bitwise_eq(&self, other: &Vertex) -> bool {
        bytemuck::bytes_of(self) == bytemuck::bytes_of(other)
    }
}

/// Fixed-function style material. Colours are RGBA.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// 0 = least shiny, 1 = most shiny.
    pub shininess: f32,
    /// 0 = fully transparent, 1 = fully opaque.
    pub alpha: f32,
    /// Diffuse colour map filename as written in the MTL file; empty if none.
    pub color_map: String,
}

impl Material {
    /// Name under which [`Material::fallback`] is registered.
    pub const DEFAULT_NAME: &'static str = "default";

    /// The material every model starts with at index 0.
    pub fn fallback() -> Self {
        Self {
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            shininess: 0.0,
            alpha: 1.0,
            color_map: String::new(),
        }
    }

    /// All channels zero, no colour map. Starting point for `newmtl`.
    pub fn zeroed() -> Self {
        Self {
            ambient: [0.0; 4],
            diffuse: [0.0; 4],
            specular: [0.0; 4],
            shininess: 0.0,
            alpha: 0.0,
            color_map: String::new(),
        }
    }

    #[inline]
    pub fn has_color_map(&self) -> bool {
        !self.color_map.is_empty()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Contiguous run of triangles in the index buffer sharing one material.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mesh {
    /// Offset into the index buffer (always a multiple of 3).
    pub start_index: usize,
    pub triangle_count: usize,
    pub material_index: usize,
}

impl Mesh {
    /// Range of the index buffer covered by this mesh.
    #[inline]
    pub fn index_range(&self) -> Range<usize> {
        self.start_index..self.start_index + self.triangle_count * 3
    }
}

/// Group per-triangle material ids into draw ranges.
///
/// A new [`Mesh`] starts whenever the id differs from the previous
/// triangle's. Non-adjacent runs of the same material stay separate.
pub fn build_meshes(attributes: &[usize]) -> Vec<Mesh> {
    let mut meshes: Vec<Mesh> = Vec::new();

    for (triangle, &material_index) in attributes.iter().enumerate() {
        match meshes.last_mut() {
            Some(mesh) if mesh.material_index == material_index => mesh.triangle_count += 1,
            _ => meshes.push(Mesh {
                start_index: triangle * 3,
                triangle_count: 1,
                material_index,
            }),
        }
    }

    meshes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(Vertex::SIZE, 8 * std::mem::size_of::<f32>());
    }

    #[test]
    fn bitwise_eq_distinguishes_signed_zero() {
        let a = Vertex::new([0.0, 1.0, 2.0], [0.0, 0.0], [0.0, 0.0, 1.0]);
        let mut b = a;
        assert!(a.bitwise_eq(&b));
        b.position[0] = -0.0;
        assert_eq!(a, b);
        assert!(!a.bitwise_eq(&b));
    }

    #[test]
    fn fallback_material_values() {
        let m = Material::fallback();
        assert_eq!(m.ambient, [0.2, 0.2, 0.2, 1.0]);
        assert_eq!(m.diffuse, [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(m.specular, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m.shininess, 0.0);
        assert_eq!(m.alpha, 1.0);
        assert!(!m.has_color_map());
    }

    #[test]
    fn runs_are_not_merged_across_gaps() {
        let (a, b) = (1, 2);
        let meshes = build_meshes(&[a, a, b, b, a]);
        assert_eq!(meshes.len(), 3);
        assert_eq!(
            meshes.iter().map(|m| m.triangle_count).collect::<Vec<_>>(),
            vec![2, 2, 1]
        );
        assert_eq!(
            meshes.iter().map(|m| m.start_index).collect::<Vec<_>>(),
            vec![0, 6, 12]
        );
        assert_eq!(
            meshes.iter().map(|m| m.material_index).collect::<Vec<_>>(),
            vec![a, b, a]
        );
    }

    #[test]
    fn first_triangle_always_opens_a_mesh() {
        let meshes = build_meshes(&[0]);
        assert_eq!(
            meshes,
            vec![Mesh {
                start_index: 0,
                triangle_count: 1,
                material_index: 0
            }]
        );
        assert_eq!(meshes[0].index_range(), 0..3);
        assert!(build_meshes(&[]).is_empty());
    }
}
