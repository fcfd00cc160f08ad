//! Imported model: deduplicated vertex buffer, triangle index buffer,
//! materials and per-material draw ranges.

use corelib::{
    Vec3,
    bounds::{BoundingBox, BoundingSphere},
    transform::Similarity,
};

use crate::mesh::{Material, Mesh, Vertex};

/// One indexed draw: the mesh, its material and the indices to submit.
#[derive(Clone, Copy, Debug)]
pub struct DrawRange<'a> {
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub indices: &'a [u32],
}

#[derive(Clone, Debug, Default)]
pub struct Model {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    materials: Vec<Material>,
    meshes: Vec<Mesh>,
    has_tex_coords: bool,
    has_vertex_normals: bool,
    center: [f32; 3],
    width: f32,
    height: f32,
    length: f32,
}

impl Model {
    /// Assemble a model from importer output and compute its box bounds.
    pub(crate) fn from_parts(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        materials: Vec<Material>,
        meshes: Vec<Mesh>,
        has_tex_coords: bool,
        has_vertex_normals: bool,
    ) -> Self {
        let mut model = Self {
            vertices,
            indices,
            materials,
            meshes,
            has_tex_coords,
            has_vertex_normals,
            ..Self::default()
        };
        model.update_box_bounds();
        model
    }

    /// Recompute smooth per-vertex normals from the triangles.
    ///
    /// Each face normal `(v1 - v0) x (v2 - v0)` is added unnormalized to its
    /// three vertices, so bigger triangles weigh more. A vertex whose sum is
    /// zero (degenerate geometry) ends up with a NaN normal.
    pub fn generate_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = [0.0; 3];
        }

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = Vec3::from(self.vertices[a].position);
            let p1 = Vec3::from(self.vertices[b].position);
            let p2 = Vec3::from(self.vertices[c].position);
            let face = (p1 - p0).cross(p2 - p0);

            for i in [a, b, c] {
                let n = &mut self.vertices[i].normal;
                *n = (Vec3::from(*n) + face).to_array();
            }
        }

        for v in &mut self.vertices {
            let n = Vec3::from(v.normal);
            v.normal = (n * n.length_recip()).to_array();
        }
    }

    /// Uniformly scale the model so its bounding sphere has radius
    /// `scale_to`, moving the sphere centre to the origin when `center` is
    /// set. Returns the transform that was applied.
    pub fn normalize(&mut self, scale_to: f32, center: bool) -> Similarity {
        let Some(sphere) = self.bounding_sphere() else {
            log::warn!("normalize called on a model without vertices");
            return Similarity::identity();
        };

        let scale = if sphere.radius > 0.0 {
            scale_to / sphere.radius
        } else {
            log::warn!("Model has zero radius; recentring without scaling");
            1.0
        };
        let offset = if center { -sphere.center } else { Vec3::ZERO };
        let transform = Similarity::new(offset, scale);

        for v in &mut self.vertices {
            v.position = transform
                .transform_point(Vec3::from(v.position))
                .to_array();
        }
        self.update_box_bounds();

        log::debug!(
            "Normalized: radius {:.4} -> {:.4}, offset {:?}",
            sphere.radius,
            sphere.radius * scale,
            offset
        );
        transform
    }

    /// Flip every triangle's winding and negate every normal.
    pub fn reverse_winding(&mut self) {
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
        for v in &mut self.vertices {
            v.normal = v.normal.map(|c| -c);
        }
    }

    /// Sphere around the mean vertex position; `None` if there are no vertices.
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        BoundingSphere::from_points(self.positions())
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions())
    }

    fn positions(&self) -> impl Iterator<Item = Vec3> + Clone + '_ {
        self.vertices.iter().map(|v| Vec3::from(v.position))
    }

    fn update_box_bounds(&mut self) {
        let (center, size) = match self.bounding_box() {
            Some(b) => (b.center(), b.extents()),
            None => (Vec3::ZERO, Vec3::ZERO),
        };
        self.center = center.to_array();
        self.width = size.x;
        self.height = size.y;
        self.length = size.z;
    }

    /// One entry per mesh, in index-buffer order.
    pub fn draw_ranges(&self) -> impl Iterator<Item = DrawRange<'_>> {
        self.meshes.iter().map(|mesh| DrawRange {
            mesh,
            material: &self.materials[mesh.material_index],
            indices: &self.indices[mesh.index_range()],
        })
    }

    /// Interleaved vertex data ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Box centre.
    #[inline]
    pub fn center(&self) -> [f32; 3] {
        self.center
    }

    /// Box size along x.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Box size along y.
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Box size along z.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, i: usize) -> Option<&Vertex> {
        self.vertices.get(i)
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, i: usize) -> Option<&Material> {
        self.materials.get(i)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh(&self, i: usize) -> Option<&Mesh> {
        self.meshes.get(i)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the source file had any `vt` records.
    #[inline]
    pub fn has_tex_coords(&self) -> bool {
        self.has_tex_coords
    }

    /// Whether the source file had any `vn` records. Generated normals do
    /// not change this.
    #[inline]
    pub fn has_vertex_normals(&self) -> bool {
        self.has_vertex_normals
    }
}
