//! Entry point for objview.
//! Imports an OBJ model, normalizes it, loads its colour maps and logs the
//! draw list a renderer would submit.

mod config;

use anyhow::{Context, Result};
use asset::{load_obj_with_options, texture::ModelTextures};

use crate::config::ViewerConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = ViewerConfig::from_args(std::env::args().skip(1))?;
    log::info!(
        "Starting objview. Model: {}, strategy: {:?}, rebuild_normals={}",
        cfg.model.display(),
        cfg.import.strategy,
        cfg.import.rebuild_normals
    );

    let mut model = load_obj_with_options(&cfg.model, &cfg.import)
        .with_context(|| format!("Failed to import {}", cfg.model.display()))?;

    if let Some(scale_to) = cfg.scale_to {
        let t = model.normalize(scale_to, cfg.center);
        log::info!(
            "Normalized to radius {} (scale {:.5}, offset {:?})",
            scale_to,
            t.scale,
            t.offset
        );
    }
    if cfg.reverse_winding {
        model.reverse_winding();
        log::info!("Reversed triangle winding");
    }

    let [cx, cy, cz] = model.center();
    log::info!(
        "Bounds: center ({:.3}, {:.3}, {:.3}), size {:.3} x {:.3} x {:.3}",
        cx,
        cy,
        cz,
        model.width(),
        model.height(),
        model.length()
    );
    log::info!(
        "Buffers: {} vertices ({} bytes), {} indices ({} bytes), texcoords={}, normals={}",
        model.vertex_count(),
        model.vertex_bytes().len(),
        model.index_count(),
        model.index_bytes().len(),
        model.has_tex_coords(),
        model.has_vertex_normals()
    );

    let texture_dir = cfg.texture_dir();
    let textures = ModelTextures::load_for_materials(model.materials(), &texture_dir);
    log::info!(
        "{} colour map(s) loaded from {}",
        textures.len(),
        texture_dir.display()
    );

    for (i, draw) in model.draw_ranges().enumerate() {
        let texture = textures
            .for_material(draw.material)
            .map(|t| format!("{}x{}", t.width, t.height))
            .unwrap_or_else(|| "none".to_owned());
        log::info!(
            "Draw {}: material {} indices {:?} ({} triangles), diffuse {:?}, texture {}",
            i,
            draw.mesh.material_index,
            draw.mesh.index_range(),
            draw.mesh.triangle_count,
            draw.material.diffuse,
            texture
        );
    }

    log::info!("Done.");
    Ok(())
}
