use std::time::Instant;

use cube_blocks::{BlockKind, Face, face_color, tile_uv};
use cube_chunk::VoxelGrid;
use cube_world::{CHUNK_SIZE, ChunkCoord};

use crate::mesh_build::{ChunkMesh, MeshBuild, QuadShade};
use crate::neighbors::NeighborLookup;
use crate::SurfaceMode;

const S: usize = CHUNK_SIZE;

/// Corner selection for atlas UVs, matching the two winding orders below.
const FRONT_UV: [(bool, bool); 4] = [(false, false), (true, false), (true, true), (false, true)];
const BACK_UV: [(bool, bool); 4] = [(false, false), (false, true), (true, true), (true, false)];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub quads: usize,
    /// Visible unit faces before merging.
    pub faces: usize,
    pub quads_per_face: [usize; 6],
    pub micros: u64,
}

impl MeshStats {
    /// Unit faces covered per emitted quad.
    pub fn merge_ratio(&self) -> f32 {
        if self.quads == 0 {
            0.0
        } else {
            self.faces as f32 / self.quads as f32
        }
    }
}

pub struct GreedyMesher<'a> {
    grid: &'a VoxelGrid,
    neighbors: Option<&'a dyn NeighborLookup>,
    base: (i32, i32, i32),
    surface: SurfaceMode,
    mask: Vec<i16>,
    out: MeshBuild,
    stats: MeshStats,
}

impl<'a> GreedyMesher<'a> {
    pub fn new(
        grid: &'a VoxelGrid,
        coord: ChunkCoord,
        neighbors: Option<&'a dyn NeighborLookup>,
        surface: SurfaceMode,
    ) -> Self {
        Self {
            grid,
            neighbors,
            base: coord.base_block(),
            surface,
            mask: vec![0; S * S],
            out: MeshBuild::default(),
            stats: MeshStats::default(),
        }
    }

    #[inline]
    fn sample(&self, p: [i32; 3]) -> BlockKind {
        if VoxelGrid::in_bounds(p[0], p[1], p[2]) {
            self.grid.get(p[0], p[1], p[2])
        } else {
            match self.neighbors {
                Some(n) => n.block_at_local(p[0], p[1], p[2]),
                None => BlockKind::Air,
            }
        }
    }

    pub fn run(mut self) -> (ChunkMesh, MeshStats) {
        let start = Instant::now();
        if self.grid.has_non_air() {
            for axis in 0..3 {
                for slice in -1..S as i32 {
                    self.fill_mask(axis, slice);
                    self.merge_mask(axis, slice);
                }
            }
        }
        self.stats.micros = start.elapsed().as_micros() as u64;
        (self.out.finish(), self.stats)
    }

    /// Positive ids face `+axis`, negative ids face `-axis`. Faces owned by a
    /// voxel outside this chunk stay zero.
    fn fill_mask(&mut self, axis: usize, slice: i32) {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        let s = S as i32;
        let mut n = 0;
        for j in 0..s {
            for i in 0..s {
                let mut a = [0i32; 3];
                a[axis] = slice;
                a[u] = i;
                a[v] = j;
                let mut b = a;
                b[axis] = slice + 1;
                let ka = self.sample(a);
                let kb = self.sample(b);
                self.mask[n] = match (ka.is_opaque(), kb.is_opaque()) {
                    (true, false) if slice >= 0 => i16::from(ka.id()),
                    (false, true) if slice + 1 < s => -i16::from(kb.id()),
                    _ => 0,
                };
                if self.mask[n] != 0 {
                    self.stats.faces += 1;
                }
                n += 1;
            }
        }
    }

    fn merge_mask(&mut self, axis: usize, slice: i32) {
        let mut n = 0;
        for j in 0..S {
            let mut i = 0;
            while i < S {
                let c = self.mask[n];
                if c == 0 {
                    i += 1;
                    n += 1;
                    continue;
                }
                let mut w = 1;
                while i + w < S && self.mask[n + w] == c {
                    w += 1;
                }
                let mut h = 1;
                'grow: while j + h < S {
                    for k in 0..w {
                        if self.mask[n + k + h * S] != c {
                            break 'grow;
                        }
                    }
                    h += 1;
                }
                self.emit(axis, slice, i, j, w, h, c);
                for l in 0..h {
                    self.mask[n + l * S..n + l * S + w].fill(0);
                }
                i += w;
                n += w;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(&mut self, axis: usize, slice: i32, i: usize, j: usize, w: usize, h: usize, c: i16) {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        let back = c < 0;
        let kind = BlockKind::from_id(c.unsigned_abs() as u8)
            .unwrap_or_else(|| panic!("mask holds {c}, which is not a block id"));
        let face = Face::from_axis(axis, back);

        let mut o = [0.0f32; 3];
        o[axis] = (slice + 1) as f32;
        o[u] = i as f32;
        o[v] = j as f32;
        let mut du = [0.0f32; 3];
        du[u] = w as f32;
        let mut dv = [0.0f32; 3];
        dv[v] = h as f32;
        let add = |a: [f32; 3], b: [f32; 3]| [a[0] + b[0], a[1] + b[1], a[2] + b[2]];
        let corners = if back {
            [o, add(o, dv), add(add(o, du), dv), add(o, du)]
        } else {
            [o, add(o, du), add(add(o, du), dv), add(o, dv)]
        };

        let shade = match self.surface {
            SurfaceMode::VertexColor => {
                let mut center = [0i32; 3];
                center[axis] = slice + 1;
                center[u] = (i + w / 2) as i32;
                center[v] = (j + h / 2) as i32;
                let color = face_color(
                    kind,
                    face,
                    self.base.0 + center[0],
                    self.base.1 + center[1],
                    self.base.2 + center[2],
                );
                QuadShade::Color(color.to_rgba8())
            }
            SurfaceMode::Atlas => {
                QuadShade::Tile(tile_uv(kind, face), if back { BACK_UV } else { FRONT_UV })
            }
        };
        self.out.add_quad(corners, face, shade);
        self.stats.quads += 1;
        self.stats.quads_per_face[face.index()] += 1;
    }
}
