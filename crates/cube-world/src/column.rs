use crate::{CHUNK_SIZE, ChunkCoord};

const BORDERED: usize = CHUNK_SIZE + 2;

/// Per-column terrain heights for one chunk footprint, with a one-column
/// border so slopes at the chunk edge see their outside neighbors.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnPlan {
    base_x: i32,
    base_z: i32,
    heights: Vec<i32>,
    sinkholes: Vec<f32>,
}

impl ColumnPlan {
    pub(crate) fn build(
        coord: ChunkCoord,
        mut height_at: impl FnMut(i32, i32) -> i32,
        mut sinkhole_at: impl FnMut(i32, i32) -> f32,
    ) -> Self {
        let (base_x, _, base_z) = coord.base_block();
        let mut heights = Vec::with_capacity(BORDERED * BORDERED);
        for bz in 0..BORDERED as i32 {
            for bx in 0..BORDERED as i32 {
                heights.push(height_at(base_x + bx - 1, base_z + bz - 1));
            }
        }
        let mut sinkholes = Vec::with_capacity(CHUNK_SIZE * CHUNK_SIZE);
        for z in 0..CHUNK_SIZE as i32 {
            for x in 0..CHUNK_SIZE as i32 {
                sinkholes.push(sinkhole_at(base_x + x, base_z + z));
            }
        }
        Self {
            base_x,
            base_z,
            heights,
            sinkholes,
        }
    }

    #[inline]
    fn bordered(&self, bx: usize, bz: usize) -> i32 {
        self.heights[bz * BORDERED + bx]
    }

    /// Surface height of local column `(x, z)`; `-1` and `CHUNK_SIZE` address the border.
    #[inline]
    pub fn height(&self, x: i32, z: i32) -> i32 {
        let bx = (x + 1).clamp(0, BORDERED as i32 - 1) as usize;
        let bz = (z + 1).clamp(0, BORDERED as i32 - 1) as usize;
        self.bordered(bx, bz)
    }

    /// Largest height step to the four axis neighbors.
    pub fn slope(&self, x: usize, z: usize) -> i32 {
        let (x, z) = (x as i32, z as i32);
        let h = self.height(x, z);
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(|(dx, dz)| (h - self.height(x + dx, z + dz)).abs())
            .max()
            .unwrap_or(0)
    }

    #[inline]
    pub(crate) fn sinkhole(&self, x: usize, z: usize) -> f32 {
        self.sinkholes[z * CHUNK_SIZE + x]
    }

    /// World-space block column of local `(x, z)`.
    #[inline]
    pub fn world_column(&self, x: usize, z: usize) -> (i32, i32) {
        (self.base_x + x as i32, self.base_z + z as i32)
    }

    /// Interior column heights, row-major by z then x.
    pub fn interior_heights(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(CHUNK_SIZE * CHUNK_SIZE);
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                out.push(self.bordered(x + 1, z + 1));
            }
        }
        out
    }

    pub fn max_height(&self) -> i32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }
}
