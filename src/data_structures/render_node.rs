//! Scene descriptor tables and the flat render-node arena.
//!
//! Render nodes form an n-ary tree encoded as first-child/next-sibling links
//! into a flat array. Node 0 is the root. Links are plain indices so the tree
//! can be walked without any shared ownership.

use std::collections::BTreeMap;

use cgmath::Matrix4;

use crate::error::{DecodeError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Applies `transforms[index]` to its subtree.
    Group,
    /// Selects the material for `texture_names[index]` for its subtree.
    Texture,
    /// Places `geometries[index]`.
    Mesh,
    /// Parsed but has no effect on its subtree.
    Material,
    /// Tags its subtree with cull region `index`.
    Cull,
    /// A type code this crate does not know. Rejected during assembly.
    Other(i64),
}

impl NodeType {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => NodeType::Group,
            2 => NodeType::Texture,
            3 => NodeType::Mesh,
            5 => NodeType::Material,
            8 => NodeType::Cull,
            other => NodeType::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            NodeType::Group => 1,
            NodeType::Texture => 2,
            NodeType::Mesh => 3,
            NodeType::Material => 5,
            NodeType::Cull => 8,
            NodeType::Other(code) => code,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderNode {
    pub node_type: NodeType,
    pub index: usize,
    pub child: Option<usize>,
    pub sibling: Option<usize>,
}

impl RenderNode {
    pub fn new(node_type: NodeType, index: usize, child: Option<usize>, sibling: Option<usize>) -> Self {
        Self {
            node_type,
            index,
            child,
            sibling,
        }
    }
}

/// Spatial culling record. The ten values are kept as read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CullNode(pub [f64; 10]);

/// Material record. The five values are kept as read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MaterialRecord(pub [f64; 5]);

/// Everything a scene descriptor (`.hie`) declares.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescriptor {
    pub cull_nodes: Vec<CullNode>,
    pub texture_names: Vec<String>,
    pub materials: Vec<MaterialRecord>,
    /// Column-major local transforms referenced by group nodes.
    pub transforms: Vec<Matrix4<f32>>,
    /// Number of geometries the descriptor expects in its mesh stream.
    pub mesh_count: usize,
    pub mesh_stream_filename: String,
    pub render_nodes: Vec<RenderNode>,
}

impl SceneDescriptor {
    pub fn node(&self, index: usize) -> Result<&RenderNode> {
        self.render_nodes.get(index).ok_or(DecodeError::OutOfRange {
            table: "render node",
            index,
            len: self.render_nodes.len(),
        })
    }

    pub fn transform(&self, index: usize) -> Result<&Matrix4<f32>> {
        self.transforms.get(index).ok_or(DecodeError::OutOfRange {
            table: "transform",
            index,
            len: self.transforms.len(),
        })
    }

    /// The texture name a texture node refers to, `None` when the index has no
    /// entry or the entry is empty.
    pub fn texture_name(&self, index: usize) -> Option<&str> {
        self.texture_names
            .get(index)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Largest `index` referenced by nodes of each type code.
    pub fn max_index_by_type(&self) -> BTreeMap<i64, usize> {
        let mut max = BTreeMap::new();
        for node in &self.render_nodes {
            max.entry(node.node_type.code())
                .and_modify(|m: &mut usize| *m = (*m).max(node.index))
                .or_insert(node.index);
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(nodes: Vec<RenderNode>) -> SceneDescriptor {
        SceneDescriptor {
            cull_nodes: Vec::new(),
            texture_names: vec!["road".into(), String::new()],
            materials: Vec::new(),
            transforms: Vec::new(),
            mesh_count: 0,
            mesh_stream_filename: "level.mshs".into(),
            render_nodes: nodes,
        }
    }

    #[test]
    fn type_codes_round_trip() {
        for code in [1, 2, 3, 5, 8, 4, -1] {
            assert_eq!(NodeType::from_code(code).code(), code);
        }
        assert_eq!(NodeType::from_code(4), NodeType::Other(4));
    }

    #[test]
    fn max_index_per_type() {
        let scene = descriptor(vec![
            RenderNode::new(NodeType::Group, 0, Some(1), None),
            RenderNode::new(NodeType::Mesh, 7, None, Some(2)),
            RenderNode::new(NodeType::Mesh, 3, None, None),
        ]);
        let max = scene.max_index_by_type();
        assert_eq!(max.get(&1), Some(&0));
        assert_eq!(max.get(&3), Some(&7));
        assert_eq!(max.get(&8), None);
    }

    #[test]
    fn lookups_report_the_table() {
        let scene = descriptor(Vec::new());
        assert_eq!(
            scene.node(0),
            Err(DecodeError::OutOfRange {
                table: "render node",
                index: 0,
                len: 0
            })
        );
        assert!(scene.transform(2).is_err());
        assert_eq!(scene.texture_name(0), Some("road"));
        assert_eq!(scene.texture_name(1), None);
        assert_eq!(scene.texture_name(9), None);
    }
}
