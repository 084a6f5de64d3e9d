//! hie-ngin
//!
//! Decoders for a legacy game's level assets, usable natively and from WASM.
//! A level is a binary mesh stream (`.mshs`) holding raw geometry records and
//! a textual scene descriptor (`.hie`) that arranges those geometries in a
//! hierarchy of transforms, textures and cull regions. Decoding both and
//! walking the hierarchy yields a flat list of placement commands a renderer
//! can draw directly.
//!
//! High-level modules
//! - `error`: the typed error every decoder returns
//! - `data_structures`: geometries, descriptor tables and scene assembly
//! - `resources`: byte/text loading and the file format decoders
//!

pub mod data_structures;
pub mod error;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use data_structures::{
    geometry::{Geometry, MeshFormat},
    render_node::{NodeType, RenderNode, SceneDescriptor},
    scene_graph::{MaterialProvider, PlacementCommand, SceneGraphAssembler, TextureMaterial, TexturePathMaterials},
};
pub use error::DecodeError;
pub use resources::{Level, LoadOptions, load_level};

/// Installs the platform logger: `env_logger` natively (configured through
/// `RUST_LOG`), the browser console on wasm.
///
/// Calling it more than once is harmless.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen::prelude::wasm_bindgen)]
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::warn!("Could not initialize logger: {}", e);
        }
    }
}
