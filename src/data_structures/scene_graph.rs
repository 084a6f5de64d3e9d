//! Scene graph assembly.
//!
//! Walks the render-node tree of a [`SceneDescriptor`] depth-first from the
//! root and turns every mesh node into a [`PlacementCommand`]: which geometry
//! to draw, where, and with which material. Group, texture and cull nodes only
//! change the [`TraversalContext`] their subtree sees.
//!
//! Materials are opaque to this module. They come from a [`MaterialProvider`]
//! supplied by the renderer, and each distinct texture name is resolved once
//! per assembly.

use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix};

use crate::{
    data_structures::{
        geometry::Geometry,
        render_node::{NodeType, SceneDescriptor},
    },
    error::{DecodeError, Result},
    resources::texture_path,
};

/// The renderer side of material creation.
pub trait MaterialProvider {
    type Material: Clone;

    /// Material for geometry outside any texture node, or whose texture has
    /// no name.
    fn default_material(&self) -> Self::Material;

    fn material_for_texture(&mut self, name: &str) -> Self::Material;
}

/// State inherited from ancestors while walking the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TraversalContext<M> {
    pub transform: Matrix4<f32>,
    pub material: M,
    pub cull_id: Option<usize>,
}

impl<M> TraversalContext<M> {
    pub fn root(material: M) -> Self {
        Self {
            transform: Matrix4::identity(),
            material,
            cull_id: None,
        }
    }
}

/// One mesh placement, the output of assembly.
#[derive(Clone, Debug)]
pub struct PlacementCommand<'a, M> {
    /// The render node that emitted this command.
    pub node: usize,
    pub geometry_index: usize,
    pub geometry: &'a Geometry,
    /// Accumulated group transforms times the geometry's original offset.
    pub world_transform: Matrix4<f32>,
    pub material: M,
    pub cull_id: Option<usize>,
}

struct Visit<M> {
    node: usize,
    context: TraversalContext<M>,
    follow_sibling: bool,
}

pub struct SceneGraphAssembler<'a, 'p, P: MaterialProvider> {
    descriptor: &'a SceneDescriptor,
    geometries: &'a [Geometry],
    provider: &'p mut P,
    materials: HashMap<String, P::Material>,
}

impl<'a, 'p, P: MaterialProvider> SceneGraphAssembler<'a, 'p, P> {
    pub fn new(descriptor: &'a SceneDescriptor, geometries: &'a [Geometry], provider: &'p mut P) -> Self {
        Self {
            descriptor,
            geometries,
            provider,
            materials: HashMap::new(),
        }
    }

    /// Walks the tree from node 0 in preorder: a node, then its first child's
    /// subtree, then the child's siblings in order. The root's own sibling
    /// link is not followed.
    ///
    /// Any malformed node fails the whole assembly; no commands are returned
    /// in that case.
    pub fn assemble(mut self) -> Result<Vec<PlacementCommand<'a, P::Material>>> {
        let node_count = self.descriptor.render_nodes.len();
        let mut visited = vec![false; node_count];
        let mut commands = Vec::new();
        let mut stack = vec![Visit {
            node: 0,
            context: TraversalContext::root(self.provider.default_material()),
            follow_sibling: false,
        }];

        while let Some(Visit {
            node: index,
            context,
            follow_sibling,
        }) = stack.pop()
        {
            let node = *self.descriptor.node(index)?;
            if std::mem::replace(&mut visited[index], true) {
                return Err(DecodeError::CycleDetected { node: index });
            }

            if follow_sibling {
                if let Some(sibling) = node.sibling {
                    stack.push(Visit {
                        node: sibling,
                        context: context.clone(),
                        follow_sibling: true,
                    });
                }
            }

            let child_context = match node.node_type {
                NodeType::Group => {
                    let local = *self.descriptor.transform(node.index)?;
                    TraversalContext {
                        transform: context.transform * local,
                        ..context
                    }
                }
                NodeType::Texture => {
                    let material = self.resolve(node.index);
                    TraversalContext { material, ..context }
                }
                NodeType::Mesh => {
                    let geometry = self.geometries.get(node.index).ok_or(DecodeError::OutOfRange {
                        table: "geometry",
                        index: node.index,
                        len: self.geometries.len(),
                    })?;
                    commands.push(PlacementCommand {
                        node: index,
                        geometry_index: node.index,
                        geometry,
                        world_transform: context.transform * geometry.placement_offset(),
                        material: context.material.clone(),
                        cull_id: context.cull_id,
                    });
                    context
                }
                NodeType::Cull => TraversalContext {
                    cull_id: Some(node.index),
                    ..context
                },
                // material records are parsed but never change what is drawn
                NodeType::Material => context,
                NodeType::Other(code) => return Err(DecodeError::UnknownNodeType { node: index, code }),
            };

            if let Some(child) = node.child {
                stack.push(Visit {
                    node: child,
                    context: child_context,
                    follow_sibling: true,
                });
            }
        }

        log::debug!(
            "assembled {} placement commands from {} render nodes ({} textures resolved)",
            commands.len(),
            node_count,
            self.materials.len()
        );
        Ok(commands)
    }

    fn resolve(&mut self, texture_index: usize) -> P::Material {
        let descriptor = self.descriptor;
        let Some(name) = descriptor.texture_name(texture_index) else {
            if texture_index >= descriptor.texture_names.len() {
                log::warn!(
                    "texture node refers to texture {} but only {} are declared, using the default material",
                    texture_index,
                    descriptor.texture_names.len()
                );
            }
            return self.provider.default_material();
        };
        if let Some(material) = self.materials.get(name) {
            return material.clone();
        }
        let material = self.provider.material_for_texture(name);
        self.materials.insert(name.to_string(), material.clone());
        material
    }
}

/// Assembles a scene with a fresh material cache.
pub fn assemble_scene<'a, P: MaterialProvider>(
    descriptor: &'a SceneDescriptor,
    geometries: &'a [Geometry],
    provider: &mut P,
) -> Result<Vec<PlacementCommand<'a, P::Material>>> {
    SceneGraphAssembler::new(descriptor, geometries, provider).assemble()
}

/// Material handle that names the texture image to use.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureMaterial {
    Default,
    Texture { name: String, path: String },
}

/// A [`MaterialProvider`] that maps texture names to image paths of a level
/// without loading anything.
#[derive(Clone, Debug)]
pub struct TexturePathMaterials {
    level: String,
}

impl TexturePathMaterials {
    pub fn new(level: impl Into<String>) -> Self {
        Self { level: level.into() }
    }
}

impl MaterialProvider for TexturePathMaterials {
    type Material = TextureMaterial;

    fn default_material(&self) -> TextureMaterial {
        TextureMaterial::Default
    }

    fn material_for_texture(&mut self, name: &str) -> TextureMaterial {
        TextureMaterial::Texture {
            name: name.to_string(),
            path: texture_path(&self.level, name),
        }
    }
}
