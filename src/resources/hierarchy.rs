//! Scene descriptor (`.hie`) parsing.
//!
//! The descriptor is read front to back in a fixed field order. Every literal
//! the format requires is checked as soon as it is read and the first
//! mismatch aborts the parse; there is no partial result.

use cgmath::Matrix4;

use crate::{
    data_structures::render_node::{CullNode, MaterialRecord, NodeType, RenderNode, SceneDescriptor},
    error::{DecodeError, Result},
    resources::script::{ConstantEnvironment, ScriptEvaluator},
};

pub const VERSION: i64 = 3;

pub struct SceneDescriptorParser<'a> {
    script: ScriptEvaluator<'a>,
}

impl<'a> SceneDescriptorParser<'a> {
    pub fn new(text: &'a str, env: &'a ConstantEnvironment) -> Self {
        Self {
            script: ScriptEvaluator::new(text, env),
        }
    }

    pub fn parse(mut self) -> Result<SceneDescriptor> {
        self.header()?;

        let cull_count = self.count("cull node count")?;
        let cull_nodes = (0..cull_count)
            .map(|_| self.numbers().map(CullNode))
            .collect::<Result<Vec<_>>>()?;

        self.expect_zero("collision mesh count")?;
        self.expect_zero("line count")?;

        let texture_count = self.count("texture count")?;
        let texture_names = (0..texture_count)
            .map(|_| self.script.next_string())
            .collect::<Result<Vec<_>>>()?;

        let material_count = self.count("material count")?;
        let materials = (0..material_count)
            .map(|_| self.numbers().map(MaterialRecord))
            .collect::<Result<Vec<_>>>()?;

        let transform_count = self.count("transform count")?;
        let mut transforms = Vec::new();
        for _ in 0..transform_count {
            transforms.push(self.transform()?);
            let name = self.script.next_string()?;
            if name != "NONE" {
                return Err(DecodeError::format("transform name", "\"NONE\"", format!("{name:?}")));
            }
        }

        let mesh_count = self.count("mesh count")?;
        let mesh_stream_filename = self.script.next_string()?;
        self.expect_zero("expression count")?;

        let node_count = self.count("render node count")?;
        let render_nodes = (0..node_count)
            .map(|_| self.render_node())
            .collect::<Result<Vec<_>>>()?;

        Ok(SceneDescriptor {
            cull_nodes,
            texture_names,
            materials,
            transforms,
            mesh_count,
            mesh_stream_filename,
            render_nodes,
        })
    }

    fn header(&mut self) -> Result<()> {
        let magic = self.script.next_string()?;
        if magic != "Version" {
            return Err(DecodeError::format("version header", "\"Version\"", format!("{magic:?}")));
        }
        let version = self.script.next_int()?;
        if version != VERSION {
            return Err(DecodeError::format("version number", VERSION, version));
        }
        Ok(())
    }

    fn count(&mut self, field: &'static str) -> Result<usize> {
        let value = self.script.next_int()?;
        usize::try_from(value).map_err(|_| DecodeError::format(field, "a non-negative count", value))
    }

    fn expect_zero(&mut self, field: &'static str) -> Result<()> {
        match self.script.next_int()? {
            0 => Ok(()),
            other => Err(DecodeError::format(field, 0, other)),
        }
    }

    fn numbers<const N: usize>(&mut self) -> Result<[f64; N]> {
        let mut out = [0.0; N];
        for value in out.iter_mut() {
            *value = self.script.next_number()?;
        }
        Ok(out)
    }

    /// Sixteen values, the first four being the first column.
    fn transform(&mut self) -> Result<Matrix4<f32>> {
        let m = self.numbers::<16>()?.map(|v| v as f32);
        Ok(Matrix4::new(
            m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8], m[9], m[10], m[11], m[12], m[13], m[14], m[15],
        ))
    }

    fn render_node(&mut self) -> Result<RenderNode> {
        let node_type = NodeType::from_code(self.script.next_int()?);
        let index = self.count("render node index")?;
        let child = self.link("render node child")?;
        let sibling = self.link("render node sibling")?;
        Ok(RenderNode::new(node_type, index, child, sibling))
    }

    fn link(&mut self, field: &'static str) -> Result<Option<usize>> {
        self.script
            .next_int_or_null()?
            .map(|value| usize::try_from(value).map_err(|_| DecodeError::format(field, "a node index or NULL", value)))
            .transpose()
    }
}

/// Parses a scene descriptor with the default constants.
pub fn parse_scene_descriptor(text: &str) -> Result<SceneDescriptor> {
    let env = ConstantEnvironment::default();
    SceneDescriptorParser::new(text, &env).parse()
}
