//! Decoded level data.
//!
//! - `geometry` holds recentered meshes and their per-face attributes
//! - `render_node` holds the scene descriptor tables and the render-node arena
//! - `scene_graph` walks the render nodes and emits placement commands

pub mod geometry;
pub mod render_node;
pub mod scene_graph;
