//! Vertex deduplication keyed by the OBJ position index.
//!
//! The key is the 1-based position reference from the face, not a content
//! hash. Vertices sharing a position but differing in texcoord or normal
//! land in the same bucket and are told apart by a full bitwise compare.

use std::collections::HashMap;

use crate::{
    error::{ObjError, ObjResult},
    mesh::Vertex,
};

#[derive(Debug, Default)]
pub struct VertexCache {
    buckets: HashMap<usize, Vec<u32>>,
    vertices: Vec<Vertex>,
}

impl VertexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(vertices),
            vertices: Vec::with_capacity(vertices),
        }
    }

    /// Index of a vertex bitwise-equal to `vertex` previously interned under
    /// `key`, or a freshly appended slot.
    pub fn intern(&mut self, key: usize, vertex: Vertex) -> ObjResult<u32> {
        let bucket = self.buckets.entry(key).or_default();

        if let Some(&index) = bucket
            .iter()
            .find(|&&i| self.vertices[i as usize].bitwise_eq(&vertex))
        {
            return Ok(index);
        }

        let index = u32::try_from(self.vertices.len()).map_err(|_| ObjError::TooManyVertices)?;
        self.vertices.push(vertex);
        bucket.push(index);
        Ok(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(p: f32, t: f32) -> Vertex {
        Vertex::new([p, p, p], [t, t], [0.0, 0.0, 1.0])
    }

    #[test]
    fn identical_vertex_under_same_key_is_reused() {
        let mut cache = VertexCache::new();
        let a = cache.intern(1, v(1.0, 0.0)).unwrap();
        let b = cache.intern(1, v(1.0, 0.0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn same_key_different_attributes_get_new_slots() {
        let mut cache = VertexCache::new();
        let a = cache.intern(1, v(1.0, 0.0)).unwrap();
        let b = cache.intern(1, v(1.0, 0.5)).unwrap();
        let c = cache.intern(1, v(1.0, 0.5)).unwrap();
        assert_eq!((a, b, c), (0, 1, 1));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn equal_content_under_different_keys_is_not_merged() {
        let mut cache = VertexCache::new();
        let a = cache.intern(1, v(1.0, 0.0)).unwrap();
        let b = cache.intern(2, v(1.0, 0.0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(cache.into_vertices().len(), 2);
    }
}
