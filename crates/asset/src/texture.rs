//! Colour-map textures referenced by model materials.
//! Images are decoded to RGBA8 for upload.

use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::mesh::Material;

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Wrap RGBA8 pixels. `data` must hold exactly `width * height * 4` bytes.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> anyhow::Result<Self> {
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            data.len() == expected,
            "RGBA8 data is {} bytes, expected {} for {}x{}",
            data.len(),
            expected,
            width,
            height
        );
        Ok(Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    /// Load and decode an image file (PNG, TGA, BMP or JPEG).
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);

        let img = image::open(path).with_context(|| format!("Failed to open image {:?}", path))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!("Loaded texture {}x{} with {} bytes", width, height, data.len());

        Self::new_rgba8(width, height, data)
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size =
            self.width as usize * self.height as usize * self.bytes_per_pixel() as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

/// Decoded colour maps of a model, keyed by the filename in the material.
#[derive(Clone, Debug, Default)]
pub struct ModelTextures {
    textures: HashMap<String, TextureData>,
}

impl ModelTextures {
    /// Load every distinct colour map once, resolving names against
    /// `texture_dir`. Maps that fail to load are logged and left out; their
    /// materials render untextured.
    pub fn load_for_materials(materials: &[Material], texture_dir: &Path) -> Self {
        let mut textures = HashMap::new();
        let mut failed: Vec<&str> = Vec::new();

        for material in materials.iter().filter(|m| m.has_color_map()) {
            let name = material.color_map.as_str();
            if textures.contains_key(name) || failed.contains(&name) {
                continue;
            }
            match TextureData::load(texture_dir.join(name)) {
                Ok(texture) => {
                    textures.insert(name.to_owned(), texture);
                }
                Err(err) => {
                    log::warn!("Colour map '{}' unavailable: {:#}", name, err);
                    failed.push(name);
                }
            }
        }

        Self { textures }
    }

    pub fn get(&self, color_map: &str) -> Option<&TextureData> {
        self.textures.get(color_map)
    }

    /// Texture bound for `material`, if it has one that loaded.
    pub fn for_material(&self, material: &Material) -> Option<&TextureData> {
        if material.has_color_map() {
            self.get(&material.color_map)
        } else {
            None
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        img.save(dir.join(name)).expect("write png");
    }

    fn with_map(name: &str) -> Material {
        Material {
            color_map: name.to_owned(),
            ..Material::fallback()
        }
    }

    #[test]
    fn rgba8_size_is_checked() {
        assert!(TextureData::new_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(TextureData::new_rgba8(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn loads_png_as_rgba8() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "a.png", 3, 2);
        let tex = TextureData::load(dir.path().join("a.png")).expect("load");
        assert_eq!((tex.width, tex.height), (3, 2));
        assert!(tex.is_valid());
        assert_eq!(&tex.data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn shared_maps_load_once_and_missing_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "hull.png", 4, 4);

        let materials = vec![
            Material::fallback(),
            with_map("hull.png"),
            with_map("hull.png"),
            with_map("missing.png"),
        ];
        let textures = ModelTextures::load_for_materials(&materials, dir.path());

        assert_eq!(textures.len(), 1);
        assert!(textures.get("hull.png").is_some());
        assert!(textures.get("missing.png").is_none());
        assert!(textures.for_material(&materials[0]).is_none());
        assert!(textures.for_material(&materials[2]).is_some());
    }
}
