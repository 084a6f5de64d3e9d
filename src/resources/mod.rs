//! Loading and decoding of level assets.
//!
//! A level named `L` consists of a mesh stream at `L/L.mshs` and a scene
//! descriptor at `L/L.hie`, both relative to an asset root. Texture images
//! live next to them as `L/<name>.tx.png`.
//!
//! - `binary`: bounds-checked little-endian reads
//! - `mesh`: the `.mshs` geometry record decoder
//! - `script`: lexer and typed value reader for the descriptor language
//! - `hierarchy`: the `.hie` scene descriptor parser
//! - `fetch`: file (native) and HTTP (wasm) byte loading

use std::path::PathBuf;

use anyhow::Context;

use crate::{
    data_structures::{
        geometry::{Geometry, MeshFormat},
        render_node::SceneDescriptor,
        scene_graph::{MaterialProvider, PlacementCommand, assemble_scene},
    },
    error,
};

pub mod binary;
pub mod fetch;
pub mod hierarchy;
pub mod mesh;
pub mod script;

/// Environment variable overriding [`LoadOptions::asset_root`].
pub const ASSET_ROOT_ENV: &str = "HIE_ASSET_ROOT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Directory (native) or origin-relative path (wasm) holding the levels.
    pub asset_root: PathBuf,
    pub mesh_format: MeshFormat,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            mesh_format: MeshFormat::Extended,
        }
    }
}

impl LoadOptions {
    /// Defaults, with the asset root taken from `HIE_ASSET_ROOT` when set.
    pub fn from_env() -> Self {
        let options = Self::default();
        match std::env::var_os(ASSET_ROOT_ENV) {
            Some(root) if !root.is_empty() => options.with_asset_root(root),
            _ => options,
        }
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_mesh_format(mut self, format: MeshFormat) -> Self {
        self.mesh_format = format;
        self
    }
}

pub fn mesh_stream_path(level: &str) -> String {
    format!("{level}/{level}.mshs")
}

pub fn descriptor_path(level: &str) -> String {
    format!("{level}/{level}.hie")
}

pub fn texture_path(level: &str, texture: &str) -> String {
    format!("{level}/{texture}.tx.png")
}

/// A decoded level: its geometries and the descriptor that places them.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub geometries: Vec<Geometry>,
    pub descriptor: SceneDescriptor,
}

impl Level {
    /// Decodes a level from already fetched file contents.
    pub fn decode(
        name: impl Into<String>,
        mesh_stream: &[u8],
        descriptor_text: &str,
        format: MeshFormat,
    ) -> anyhow::Result<Self> {
        let name = name.into();
        let geometries = mesh::decode_mesh_stream(mesh_stream, format)
            .with_context(|| format!("could not decode {}", mesh_stream_path(&name)))?;
        let descriptor = hierarchy::parse_scene_descriptor(descriptor_text)
            .with_context(|| format!("could not parse {}", descriptor_path(&name)))?;

        log::info!(
            "level {}: {} geometries, {} render nodes, {} textures, {} transforms, {} cull nodes",
            name,
            geometries.len(),
            descriptor.render_nodes.len(),
            descriptor.texture_names.len(),
            descriptor.transforms.len(),
            descriptor.cull_nodes.len()
        );
        for (code, max) in descriptor.max_index_by_type() {
            log::debug!("level {}: node type {} references index up to {}", name, code, max);
        }
        if descriptor.mesh_count != geometries.len() {
            log::warn!(
                "level {}: descriptor declares {} meshes but the stream holds {}",
                name,
                descriptor.mesh_count,
                geometries.len()
            );
        }

        Ok(Self {
            name,
            geometries,
            descriptor,
        })
    }

    /// Runs scene assembly over this level with a fresh material cache.
    pub fn assemble<P: MaterialProvider>(
        &self,
        provider: &mut P,
    ) -> error::Result<Vec<PlacementCommand<'_, P::Material>>> {
        assemble_scene(&self.descriptor, &self.geometries, provider)
    }
}

/// Fetches both files of `level` concurrently and decodes them.
pub async fn load_level(level: &str, options: &LoadOptions) -> anyhow::Result<Level> {
    let mesh_file = mesh_stream_path(level);
    let descriptor_file = descriptor_path(level);
    let (mesh_stream, descriptor_text) = futures::try_join!(
        fetch::load_binary(&options.asset_root, &mesh_file),
        fetch::load_string(&options.asset_root, &descriptor_file),
    )
    .with_context(|| format!("could not load level {level}"))?;

    Level::decode(level, &mesh_stream, &descriptor_text, options.mesh_format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_paths() {
        assert_eq!(mesh_stream_path("Town"), "Town/Town.mshs");
        assert_eq!(descriptor_path("Town"), "Town/Town.hie");
        assert_eq!(texture_path("Town", "road"), "Town/road.tx.png");
    }

    #[test]
    fn options_builders() {
        let options = LoadOptions::default()
            .with_asset_root("/srv/levels")
            .with_mesh_format(MeshFormat::Legacy);
        assert_eq!(options.asset_root, PathBuf::from("/srv/levels"));
        assert_eq!(options.mesh_format, MeshFormat::Legacy);
        assert_eq!(LoadOptions::default().asset_root, PathBuf::from("assets"));
    }

    #[test]
    fn decode_errors_name_the_file() {
        let err = Level::decode("Town", &[], "\"Version\" 4", MeshFormat::Extended).unwrap_err();
        assert!(format!("{err:#}").contains("Town/Town.hie"));
        assert!(err.downcast_ref::<error::DecodeError>().is_some());
    }
}
