//! MTL material library parser.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    error::{ObjError, ObjResult},
    mesh::Material,
    text::{for_each_line, parse_floats, rest_of_line},
};

/// Materials of one model plus a name lookup. Index 0 is always the
/// fallback material registered as `"default"`.
#[derive(Clone, Debug)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    names: HashMap<String, usize>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        let mut names = HashMap::new();
        names.insert(Material::DEFAULT_NAME.to_owned(), 0);
        Self {
            materials: vec![Material::fallback()],
            names,
        }
    }

    /// Append `material` and point `name` at it. A later definition with the
    /// same name wins the lookup.
    pub fn insert(&mut self, name: &str, material: Material) -> usize {
        let index = self.materials.len();
        self.materials.push(material);
        self.names.insert(name.to_owned(), index);
        index
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn into_materials(self) -> Vec<Material> {
        self.materials
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Load an MTL file into `library`. Returns how many materials it defined.
pub fn load_materials_from_path(
    path: impl AsRef<Path>,
    library: &mut MaterialLibrary,
) -> ObjResult<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let added = parse_materials(BufReader::new(file), library)?;
    log::debug!("Loaded {} material(s) from {}", added, path.display());
    Ok(added)
}

/// Parse MTL directives from `reader` into `library`.
///
/// Colour map filenames are stored verbatim; resolving them is up to the
/// caller.
pub fn parse_materials<R: BufRead>(reader: R, library: &mut MaterialLibrary) -> ObjResult<usize> {
    let mut current: Option<usize> = None;
    let mut added = 0;

    for_each_line(reader, |line_no, line| {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(());
        };

        if command == "newmtl" {
            let name = tokens.next().unwrap_or_default();
            current = Some(library.insert(name, Material::zeroed()));
            added += 1;
            return Ok(());
        }

        let material = match current {
            Some(i) => &mut library.materials[i],
            None => {
                if !command.starts_with('#') {
                    log::debug!("MTL line {}: '{}' before any newmtl, ignored", line_no, command);
                }
                return Ok(());
            }
        };

        match command {
            "Ka" => material.ambient = rgb_opaque(tokens),
            "Kd" => material.diffuse = rgb_opaque(tokens),
            "Ks" => material.specular = rgb_opaque(tokens),
            "Ns" => {
                // MTL shininess is [0,1000].
                let [ns] = parse_floats(tokens);
                material.shininess = ns / 1000.0;
            }
            "Tr" | "d" => {
                let [alpha] = parse_floats(tokens);
                material.alpha = alpha;
            }
            "illum" => {
                let mode = tokens.next().and_then(|t| t.parse::<i32>().ok());
                // Mode 1: diffuse only, no highlights.
                if mode == Some(1) {
                    material.specular = [0.0, 0.0, 0.0, 1.0];
                }
            }
            "map_Kd" => material.color_map = rest_of_line(line, command).to_owned(),
            _ => {}
        }
        Ok(())
    })?;

    Ok(added)
}

fn rgb_opaque<'a>(tokens: impl Iterator<Item = &'a str>) -> [f32; 4] {
    let [r, g, b] = parse_floats(tokens);
    [r, g, b, 1.0]
}
