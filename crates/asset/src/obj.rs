//! OBJ importer: positions, texcoords, normals, polygon faces and MTL
//! materials.
//!
//! Faces are fan-triangulated, vertices are deduplicated through
//! [`VertexCache`], and triangles are grouped into per-material [`Mesh`]
//! runs in file order. Groups and objects are ignored; everything ends up
//! in one [`Model`].
//!
//! [`Mesh`]: crate::mesh::Mesh

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Seek, SeekFrom},
    path::Path,
};

use crate::{
    error::{ObjError, ObjResult},
    mesh::{Vertex, build_meshes},
    model::Model,
    mtl::{MaterialLibrary, load_materials_from_path},
    text::{for_each_line, parse_floats},
    vertex_cache::VertexCache,
};

/// Most vertex references a single face may have.
pub const FACE_INDEX_CAPACITY: usize = 32;

/// How the importer walks the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Count records first and pre-size every buffer, then rewind and build.
    #[default]
    TwoPass,
    /// Build in one go, growing buffers as needed.
    SinglePass,
}

/// Knobs for [`load_obj_with_options`] and [`load_obj_from_reader`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub strategy: LoadStrategy,
    /// Regenerate normals even when the file provides them.
    pub rebuild_normals: bool,
}

/// Record counts gathered by the sizing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeometryCounts {
    pub positions: usize,
    pub tex_coords: usize,
    pub normals: usize,
    /// Upper bound assuming every face is fan-triangulated.
    pub triangles: usize,
}

/// Load an OBJ model (and its `mtllib` libraries) with default options.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> ObjResult<Model> {
    load_obj_with_options(path, &ImportOptions::default())
}

pub fn load_obj_with_options(path: impl AsRef<Path>, options: &ImportOptions) -> ObjResult<Model> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Importing OBJ model {}", path.display());

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    load_obj_from_reader(BufReader::new(file), base_dir, options)
}

/// Load from any seekable reader. `mtllib` names are resolved against
/// `base_dir`.
pub fn load_obj_from_reader<R: BufRead + Seek>(
    mut reader: R,
    base_dir: &Path,
    options: &ImportOptions,
) -> ObjResult<Model> {
    let counts = match options.strategy {
        LoadStrategy::TwoPass => {
            let counts = count_geometry(&mut reader)?;
            reader.seek(SeekFrom::Start(0)).map_err(ObjError::Rewind)?;
            log::debug!("First pass: {:?}", counts);
            counts
        }
        LoadStrategy::SinglePass => GeometryCounts::default(),
    };

    let mut builder = ObjBuilder::new(base_dir, &counts);
    for_each_line(reader, |line_no, line| builder.parse_line(line_no, line))?;
    Ok(builder.finish(options.rebuild_normals))
}

/// Convenience helper to parse an OBJ string literal. `mtllib` names
/// resolve against the working directory.
pub fn load_obj_from_str(contents: &str) -> ObjResult<Model> {
    load_obj_from_reader(
        io::Cursor::new(contents.as_bytes()),
        Path::new(""),
        &ImportOptions::default(),
    )
}

/// Sizing pass: count `v`, `vt`, `vn` records and the triangles the faces
/// will produce. Leaves the reader at end of stream.
pub fn count_geometry<R: BufRead>(reader: R) -> ObjResult<GeometryCounts> {
    let mut counts = GeometryCounts::default();
    for_each_line(reader, |_, line| {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => counts.positions += 1,
            Some("vt") => counts.tex_coords += 1,
            Some("vn") => counts.normals += 1,
            Some("f") => counts.triangles += tokens.count().saturating_sub(2),
            _ => {}
        }
        Ok(())
    })?;
    Ok(counts)
}

/// Emit the fan `(v0,v1,v2), (v0,v2,v3), ...` for one face. Returns the
/// number of triangles written.
fn triangulate_fan(face: &[u32], indices: &mut Vec<u32>) -> usize {
    let [first, second, rest @ ..] = face else {
        return 0;
    };
    let mut last = *second;
    for &next in rest {
        indices.extend_from_slice(&[*first, last, next]);
        last = next;
    }
    rest.len()
}

/// Resolve a 1-based (or negative, relative) OBJ index against `len`.
fn resolve_index(raw: i64, len: usize) -> Option<usize> {
    let idx = match raw {
        0 => return None,
        r if r > 0 => usize::try_from(r - 1).ok()?,
        r => len.checked_sub(usize::try_from(r.unsigned_abs()).ok()?)?,
    };
    (idx < len).then_some(idx)
}

/// One `p[/t][/n]` reference as written in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FaceVertex {
    position: i64,
    tex_coord: Option<i64>,
    normal: Option<i64>,
}

impl FaceVertex {
    /// `None` if the position part is not an integer.
    fn parse(token: &str) -> Option<Self> {
        let mut split = token.split('/');
        let position = split.next()?.parse::<i64>().ok()?;
        let mut component = || split.next().and_then(|s| s.parse::<i64>().ok());
        let tex_coord = component();
        let normal = component();
        Some(Self {
            position,
            tex_coord,
            normal,
        })
    }
}

struct ObjBuilder<'a> {
    base_dir: &'a Path,
    positions: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    cache: VertexCache,
    indices: Vec<u32>,
    /// Material id per triangle; consumed by `build_meshes`.
    attributes: Vec<usize>,
    materials: MaterialLibrary,
    active_material: usize,
}

impl<'a> ObjBuilder<'a> {
    fn new(base_dir: &'a Path, counts: &GeometryCounts) -> Self {
        Self {
            base_dir,
            positions: Vec::with_capacity(counts.positions),
            tex_coords: Vec::with_capacity(counts.tex_coords),
            normals: Vec::with_capacity(counts.normals),
            cache: VertexCache::with_capacity(counts.positions),
            indices: Vec::with_capacity(counts.triangles * 3),
            attributes: Vec::with_capacity(counts.triangles),
            materials: MaterialLibrary::new(),
            active_material: 0,
        }
    }

    fn parse_line(&mut self, line_no: usize, line: &str) -> ObjResult<()> {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(());
        };

        match command {
            "mtllib" => {
                for name in tokens {
                    self.import_materials(name);
                }
            }
            "usemtl" => {
                let name = tokens.next().unwrap_or_default();
                self.active_material = self.materials.index_of(name).unwrap_or_else(|| {
                    log::debug!("Unknown material '{}' on line {}, using default", name, line_no);
                    0
                });
            }
            "v" => self.positions.push(parse_floats(tokens)),
            "vt" => self.tex_coords.push(parse_floats(tokens)),
            "vn" => self.normals.push(parse_floats(tokens)),
            "f" => self.parse_face(line_no, tokens)?,
            // Comments, groups, objects, smoothing groups.
            _ => {}
        }
        Ok(())
    }

    fn import_materials(&mut self, name: &str) {
        let path = self.base_dir.join(name);
        if let Err(err) = load_materials_from_path(&path, &mut self.materials) {
            log::warn!("Skipping material library: {}", err);
        }
    }

    fn parse_face<'t>(
        &mut self,
        line_no: usize,
        tokens: impl Iterator<Item = &'t str>,
    ) -> ObjResult<()> {
        let mut resolved = [(0usize, Vertex::default()); FACE_INDEX_CAPACITY];
        let mut count = 0;

        for token in tokens {
            let Some(reference) = FaceVertex::parse(token) else {
                break;
            };
            if count == FACE_INDEX_CAPACITY {
                return Err(ObjError::FaceTooLarge {
                    line: line_no,
                    max: FACE_INDEX_CAPACITY,
                });
            }
            resolved[count] = self.resolve_vertex(line_no, reference);
            count += 1;
        }

        if count < 3 {
            log::warn!(
                "Face on line {} has {} vertex reference(s); skipped",
                line_no,
                count
            );
            return Ok(());
        }

        // Vertices enter the cache only once the face is known to produce triangles.
        let mut face = [0u32; FACE_INDEX_CAPACITY];
        for (slot, &(key, vertex)) in face.iter_mut().zip(&resolved[..count]) {
            *slot = self.cache.intern(key, vertex)?;
        }

        let triangles = triangulate_fan(&face[..count], &mut self.indices);
        self.attributes
            .extend(std::iter::repeat_n(self.active_material, triangles));
        Ok(())
    }

    /// Build the vertex for one reference. Unresolvable components stay
    /// zero. The cache key is the resolved 1-based position index.
    fn resolve_vertex(&self, line_no: usize, reference: FaceVertex) -> (usize, Vertex) {
        let mut vertex = Vertex::default();

        let key = match resolve_index(reference.position, self.positions.len()) {
            Some(i) => {
                vertex.position = self.positions[i];
                i + 1
            }
            None => {
                log::warn!(
                    "Position index {} out of range on line {}",
                    reference.position,
                    line_no
                );
                0
            }
        };

        if let Some(raw) = reference.tex_coord {
            match resolve_index(raw, self.tex_coords.len()) {
                Some(i) => vertex.tex_coord = self.tex_coords[i],
                None => log::warn!("Texcoord index {} out of range on line {}", raw, line_no),
            }
        }

        if let Some(raw) = reference.normal {
            match resolve_index(raw, self.normals.len()) {
                Some(i) => vertex.normal = self.normals[i],
                None => log::warn!("Normal index {} out of range on line {}", raw, line_no),
            }
        }

        (key, vertex)
    }

    fn finish(self, rebuild_normals: bool) -> Model {
        let has_vertex_normals = !self.normals.is_empty();
        let has_tex_coords = !self.tex_coords.is_empty();
        let meshes = build_meshes(&self.attributes);

        let mut model = Model::from_parts(
            self.cache.into_vertices(),
            self.indices,
            self.materials.into_materials(),
            meshes,
            has_tex_coords,
            has_vertex_normals,
        );

        if rebuild_normals || !has_vertex_normals {
            model.generate_normals();
        }

        log::info!(
            "Imported {} vertices, {} triangles, {} material(s), {} mesh(es)",
            model.vertex_count(),
            model.triangle_count(),
            model.material_count(),
            model.mesh_count()
        );
        model
    }
}
