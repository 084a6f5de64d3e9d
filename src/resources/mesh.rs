//! Mesh stream (`.mshs`) decoding.
//!
//! A mesh stream is a plain concatenation of geometry records, little-endian
//! and without padding:
//!
//! ```text
//! header   24 bytes   u16 triangle count @0, u32 vertex count @20
//! vertex   36 bytes   f32 x,y,z @0/4/8, f32 b,g,r @12/16/20, f32 u,v @28/32
//! face     12 bytes   u32 i0,i1,i2
//! ```
//!
//! Texture v is stored flipped and decoded as `1 - v`.

use crate::{
    data_structures::geometry::{Face, Geometry, GeometryVertex, MeshFormat},
    error::{DecodeError, Result},
    resources::binary::BinaryView,
};

pub const HEADER_SIZE: usize = 24;
pub const VERTEX_SIZE: usize = 36;
pub const FACE_SIZE: usize = 12;

/// Counts from a geometry record header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    pub triangle_count: u16,
    pub vertex_count: u32,
}

impl RecordHeader {
    /// Total size of the record in bytes, header included.
    ///
    /// `None` if the size does not fit in `usize`.
    pub fn record_len(&self) -> Option<usize> {
        let vertices = (self.vertex_count as usize).checked_mul(VERTEX_SIZE)?;
        let faces = self.triangle_count as usize * FACE_SIZE;
        HEADER_SIZE.checked_add(vertices)?.checked_add(faces)
    }
}

pub struct MeshStreamDecoder<'a> {
    data: BinaryView<'a>,
    format: MeshFormat,
    cursor: usize,
}

impl<'a> MeshStreamDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_format(data, MeshFormat::default())
    }

    pub fn with_format(data: &'a [u8], format: MeshFormat) -> Self {
        Self {
            data: BinaryView::new(data),
            format,
            cursor: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.data.len()
    }

    /// Reads the header at the cursor and checks the whole record fits in the
    /// remaining buffer.
    fn next_record(&self) -> Result<(RecordHeader, usize)> {
        let available = self.data.len().saturating_sub(self.cursor);
        let truncated = |needed: usize| DecodeError::TruncatedStream {
            offset: self.cursor,
            needed,
            available,
        };
        if available < HEADER_SIZE {
            return Err(truncated(HEADER_SIZE));
        }
        let header = RecordHeader {
            triangle_count: self.data.get_u16(self.cursor)?,
            vertex_count: self.data.get_u32(self.cursor + 20)?,
        };
        let len = header.record_len().ok_or_else(|| truncated(usize::MAX))?;
        if len > available {
            return Err(truncated(len));
        }
        Ok((header, len))
    }

    pub fn skip_geometry(&mut self) -> Result<RecordHeader> {
        let (header, len) = self.next_record()?;
        self.cursor += len;
        Ok(header)
    }

    pub fn skip_geometries(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.skip_geometry()?;
        }
        Ok(())
    }

    pub fn read_geometry(&mut self) -> Result<Geometry> {
        let (header, len) = self.next_record()?;
        let start = self.cursor;
        let vertex_count = header.vertex_count as usize;

        let mut offset = start + HEADER_SIZE;
        let mut vertices = Vec::with_capacity(vertex_count);
        for _ in 0..vertex_count {
            vertices.push(self.read_vertex(offset)?);
            offset += VERTEX_SIZE;
        }

        let mut faces = Vec::with_capacity(header.triangle_count as usize);
        for face in 0..header.triangle_count as usize {
            let indices = [
                self.data.get_u32(offset)?,
                self.data.get_u32(offset + 4)?,
                self.data.get_u32(offset + 8)?,
            ];
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(DecodeError::InvalidFaceIndex {
                    offset: start,
                    face,
                    index,
                    vertex_count,
                });
            }
            faces.push(Face { indices });
            offset += FACE_SIZE;
        }
        debug_assert_eq!(offset - start, len);

        self.cursor = start + len;
        Ok(Geometry::new(self.format, vertices, faces))
    }

    fn read_vertex(&self, offset: usize) -> Result<GeometryVertex> {
        let f = |at: usize| self.data.get_f32(offset + at);
        let tex_coords = if self.format.has_tex_coords() {
            [f(28)?, 1.0 - f(32)?]
        } else {
            [0.0, 0.0]
        };
        Ok(GeometryVertex {
            position: [f(0)?, f(4)?, f(8)?],
            // channels are stored blue first
            color: [f(20)?, f(16)?, f(12)?],
            tex_coords,
        })
    }

    pub fn read_geometries(&mut self, count: usize) -> Result<Vec<Geometry>> {
        (0..count).map(|_| self.read_geometry()).collect()
    }

    pub fn read_all_geometries(&mut self) -> Result<Vec<Geometry>> {
        let mut geometries = Vec::new();
        while self.has_next() {
            geometries.push(self.read_geometry()?);
        }
        Ok(geometries)
    }
}

/// Decodes every geometry of a mesh stream.
pub fn decode_mesh_stream(data: &[u8], format: MeshFormat) -> Result<Vec<Geometry>> {
    MeshStreamDecoder::with_format(data, format).read_all_geometries()
}
