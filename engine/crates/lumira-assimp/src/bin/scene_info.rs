//! 导入一个模型文件并打印场景概要
//!
//! 用法：`scene_info <model-file>`，库路径可用 `LUMIRA_ASSIMP_PATH` 覆盖

use anyhow::Context;
use lumira_assimp::{AssimpLibrary, PostProcessFlags};

fn main() -> anyhow::Result<()> {
    lumira_crate_tools::init_log::init_log();

    let path = std::env::args().nth(1).context("usage: scene_info <model-file>")?;

    let lib = AssimpLibrary::get();
    lib.load_default().context("failed to load native import library")?;
    lib.attach_log_forwarding()?;

    let (major, minor, revision) = lib.version()?;
    log::info!("native importer {}.{}.{}", major, minor, revision);

    let scene = lib
        .import(&path, PostProcessFlags::TRIANGULATE | PostProcessFlags::GEN_BOUNDING_BOXES)
        .with_context(|| format!("failed to import {path}"))?;

    log::info!(
        "{path}: {} meshes, {} materials, {} animations, {} textures, {} lights, {} cameras",
        scene.meshes.len(),
        scene.materials.len(),
        scene.animations.len(),
        scene.textures.len(),
        scene.lights.len(),
        scene.cameras.len(),
    );
    for mesh in &scene.meshes {
        log::info!(
            "  mesh '{}': {} vertices, {} faces, {} bones",
            mesh.name,
            mesh.vertices.len(),
            mesh.faces.len(),
            mesh.bones.len(),
        );
    }
    if let Some(root) = &scene.root {
        log::info!("  root node '{}' with {} children", root.name, root.children.len());
    }

    lib.unload();
    Ok(())
}
