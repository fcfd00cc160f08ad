//! Asset loading: Wavefront OBJ models, MTL materials and their colour maps.
//! The importer produces GPU-ready indexed buffers grouped by material.

pub mod error;
pub mod mesh;
pub mod model;
pub mod mtl;
pub mod obj;
pub mod texture;
pub mod vertex_cache;

mod text;

pub use error::{ObjError, ObjResult};
pub use mesh::{Material, Mesh, Vertex};
pub use model::{DrawRange, Model};
pub use obj::{ImportOptions, LoadStrategy, load_obj_from_path, load_obj_with_options};
