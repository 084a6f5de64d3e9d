//! Decoded mesh geometry.
//!
//! A [`Geometry`] is one record of a mesh stream after decoding: vertices
//! recentered around the origin, faces indexing into those vertices, and the
//! per-face attribute arrays a vertex-colored renderer wants. The center that
//! was subtracted is kept in [`Geometry::original_center`] and re-applied as a
//! translation when the geometry is placed in the world.

use cgmath::{Matrix4, Vector3};

/// One vertex as stored after decoding.
///
/// The layout is plain old data so renderers can hand the slice straight to a
/// vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GeometryVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// A triangle referencing three vertices of the same geometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Face {
    pub indices: [u32; 3],
}

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Bounding box of a set of points, `None` when there are no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut points = points.into_iter();
        let first: Vector3<f32> = points.next()?.into();
        let bounds = points.fold(Aabb { min: first, max: first }, |acc, p| Aabb {
            min: Vector3::new(acc.min.x.min(p[0]), acc.min.y.min(p[1]), acc.min.z.min(p[2])),
            max: Vector3::new(acc.max.x.max(p[0]), acc.max.y.max(p[1]), acc.max.z.max(p[2])),
        });
        Some(bounds)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Which vertex attributes a mesh stream carries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MeshFormat {
    /// Positions, colors and texture coordinates.
    #[default]
    Extended,
    /// Positions and colors only; texture coordinates are left zeroed.
    Legacy,
}

impl MeshFormat {
    pub fn has_tex_coords(self) -> bool {
        matches!(self, MeshFormat::Extended)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub format: MeshFormat,
    pub vertices: Vec<GeometryVertex>,
    pub faces: Vec<Face>,
    /// The colors of each face's three corners, parallel to `faces`.
    pub face_colors: Vec<[[f32; 3]; 3]>,
    /// The texture coordinates of each face's three corners. Empty for
    /// [`MeshFormat::Legacy`].
    pub face_tex_coords: Vec<[[f32; 2]; 3]>,
    /// Bounds of the recentered vertices, `None` for an empty geometry.
    pub bounding_box: Option<Aabb>,
    pub original_center: Vector3<f32>,
}

impl Geometry {
    /// Builds a geometry from raw decoded data: copies the referenced vertex
    /// attributes onto each face and moves the vertices so the bounding box is
    /// centered on the origin.
    ///
    /// Face indices must already be validated against `vertices`.
    pub(crate) fn new(format: MeshFormat, mut vertices: Vec<GeometryVertex>, faces: Vec<Face>) -> Self {
        let corners = |face: &Face| face.indices.map(|i| vertices[i as usize]);
        let face_colors = faces
            .iter()
            .map(|face| corners(face).map(|v| v.color))
            .collect();
        let face_tex_coords = if format.has_tex_coords() {
            faces
                .iter()
                .map(|face| corners(face).map(|v| v.tex_coords))
                .collect()
        } else {
            Vec::new()
        };

        let original_center = Aabb::from_points(vertices.iter().map(|v| v.position))
            .map_or(Vector3::new(0.0, 0.0, 0.0), |bounds| bounds.center());
        for vertex in vertices.iter_mut() {
            let moved = Vector3::from(vertex.position) - original_center;
            vertex.position = moved.into();
        }
        let bounding_box = Aabb::from_points(vertices.iter().map(|v| v.position));

        Self {
            format,
            vertices,
            faces,
            face_colors,
            face_tex_coords,
            bounding_box,
            original_center,
        }
    }

    /// The translation that puts the recentered vertices back where the
    /// stream had them.
    pub fn placement_offset(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.original_center)
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
