use std::path::Path;

/// Builds one `.mshs` geometry record.
pub(crate) struct MeshRecord {
    vertices: Vec<([f32; 3], [f32; 3], [f32; 2])>,
    faces: Vec<[u32; 3]>,
}

impl MeshRecord {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// `rgb` is written blue first and `uv.v` flipped, as the stream stores them.
    pub fn vertex(mut self, position: [f32; 3], rgb: [f32; 3], uv: [f32; 2]) -> Self {
        self.vertices.push((position, rgb, uv));
        self
    }

    pub fn face(mut self, indices: [u32; 3]) -> Self {
        self.faces.push(indices);
        self
    }

    /// A single colored triangle whose bounding box is centered on `center`.
    pub fn triangle_at(center: [f32; 3]) -> Self {
        let [x, y, z] = center;
        Self::new()
            .vertex([x - 1.0, y - 1.0, z], [1.0, 0.0, 0.0], [0.0, 0.0])
            .vertex([x + 1.0, y - 1.0, z], [0.0, 1.0, 0.0], [1.0, 0.0])
            .vertex([x, y + 1.0, z], [0.0, 0.0, 1.0], [0.5, 1.0])
            .face([0, 1, 2])
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        let mut header = [0u8; 24];
        header[0..2].copy_from_slice(&(self.faces.len() as u16).to_le_bytes());
        header[20..24].copy_from_slice(&(self.vertices.len() as u32).to_le_bytes());
        out.extend_from_slice(&header);

        for (position, [r, g, b], [u, v]) in &self.vertices {
            let values = [position[0], position[1], position[2], *b, *g, *r, 0.0, *u, 1.0 - *v];
            for value in values {
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
        for face in &self.faces {
            for index in face {
                out.extend_from_slice(&index.to_le_bytes());
            }
        }
    }
}

pub(crate) fn mesh_stream(records: &[MeshRecord]) -> Vec<u8> {
    let mut out = Vec::new();
    for record in records {
        record.write_to(&mut out);
    }
    out
}

/// Builds the text of a `.hie` scene descriptor.
pub(crate) struct Descriptor {
    cull_nodes: Vec<[f64; 10]>,
    textures: Vec<String>,
    transforms: Vec<[f32; 16]>,
    mesh_count: usize,
    nodes: Vec<(i64, usize, Option<usize>, Option<usize>)>,
}

impl Descriptor {
    pub fn new(mesh_count: usize) -> Self {
        Self {
            cull_nodes: Vec::new(),
            textures: Vec::new(),
            transforms: Vec::new(),
            mesh_count,
            nodes: Vec::new(),
        }
    }

    pub fn cull_node(mut self, values: [f64; 10]) -> Self {
        self.cull_nodes.push(values);
        self
    }

    pub fn texture(mut self, name: &str) -> Self {
        self.textures.push(name.to_string());
        self
    }

    pub fn translation(mut self, x: f32, y: f32, z: f32) -> Self {
        #[rustfmt::skip]
        let transform = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            x,   y,   z,   1.0,
        ];
        self.transforms.push(transform);
        self
    }

    pub fn node(mut self, code: i64, index: usize, child: Option<usize>, sibling: Option<usize>) -> Self {
        self.nodes.push((code, index, child, sibling));
        self
    }

    pub fn build(&self) -> String {
        fn link(link: Option<usize>) -> String {
            link.map_or_else(|| "NULL".to_string(), |i| i.to_string())
        }
        fn join<T: ToString>(values: &[T]) -> String {
            values.iter().map(T::to_string).collect::<Vec<_>>().join(" ")
        }

        let mut text = String::from("// generated level\n\"Version\" 3\n");
        text += &format!("{}\n", self.cull_nodes.len());
        for cull in &self.cull_nodes {
            text += &format!("{};\n", join(cull));
        }
        text += "0 0\n";
        text += &format!("{}", self.textures.len());
        for name in &self.textures {
            text += &format!(" \"{name}\"");
        }
        text += "\n0\n";
        text += &format!("{}\n", self.transforms.len());
        for transform in &self.transforms {
            text += &format!("{} \"NONE\"\n", join(transform));
        }
        text += &format!("{} \"level.mshs\" 0\n", self.mesh_count);
        text += &format!("{}\n", self.nodes.len());
        for (code, index, child, sibling) in &self.nodes {
            text += &format!("{code} {index} {} {}\n", link(*child), link(*sibling));
        }
        text
    }
}

/// Writes `<root>/<level>/<level>.{mshs,hie}`.
pub(crate) fn write_level(root: &Path, level: &str, mesh_stream: &[u8], descriptor: &str) {
    let dir = root.join(level);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{level}.mshs")), mesh_stream).unwrap();
    std::fs::write(dir.join(format!("{level}.hie")), descriptor).unwrap();
}
