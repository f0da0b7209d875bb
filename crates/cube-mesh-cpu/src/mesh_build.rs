use cube_blocks::{Face, TileUv};

/// Triangle indices, narrowed to 16 bits whenever the vertex count allows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Default for IndexBuffer {
    fn default() -> Self {
        IndexBuffer::U16(Vec::new())
    }
}

impl IndexBuffer {
    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U16(v) => v.len(),
            IndexBuffer::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_wide(&self) -> bool {
        matches!(self, IndexBuffer::U32(_))
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            IndexBuffer::U16(v) => v.get(i).map(|&x| u32::from(x)),
            IndexBuffer::U32(v) => v.get(i).copied(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

/// Finished geometry for one chunk, positions relative to the chunk origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    /// RGBA8 per vertex; empty in atlas mode.
    pub col: Vec<u8>,
    /// Atlas UVs per vertex; empty in vertex-color mode.
    pub uv: Vec<f32>,
    pub idx: IndexBuffer,
}

impl ChunkMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertex_count() / 4
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }
}

/// Growable quad buffers; indices stay 32-bit until [`MeshBuild::finish`].
#[derive(Default, Clone)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub col: Vec<u8>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    /// Appends four corners in the given order plus the two triangles
    /// `0,1,2` and `0,2,3`. Corners must already wind counter-clockwise
    /// around `face`'s normal.
    pub fn add_quad(&mut self, corners: [[f32; 3]; 4], face: Face, shade: QuadShade) {
        let base = self.vertex_count() as u32;
        let n = face.normal();
        for (i, c) in corners.iter().enumerate() {
            self.pos.extend_from_slice(c);
            self.norm.extend_from_slice(&n);
            match shade {
                QuadShade::Color(rgba) => self.col.extend_from_slice(&rgba),
                QuadShade::Tile(t, order) => {
                    let (u, v) = order[i];
                    self.uv.push(if u { t.u1 } else { t.u0 });
                    self.uv.push(if v { t.v1 } else { t.v0 });
                }
            }
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn finish(self) -> ChunkMesh {
        let idx = if self.vertex_count() > u16::MAX as usize {
            IndexBuffer::U32(self.idx)
        } else {
            IndexBuffer::U16(self.idx.into_iter().map(|i| i as u16).collect())
        };
        ChunkMesh {
            pos: self.pos,
            norm: self.norm,
            col: self.col,
            uv: self.uv,
            idx,
        }
    }
}

/// Per-quad surface data: one flat color, or an atlas tile with the
/// `(u_high, v_high)` corner selection for each of the four vertices.
#[derive(Clone, Copy, Debug)]
pub enum QuadShade {
    Color([u8; 4]),
    Tile(TileUv, [(bool, bool); 4]),
}
