//! Chunk addressing, terrain parameters, and seeded terrain sampling.
#![forbid(unsafe_code)]

mod column;
mod noise;
pub mod terrain;
pub mod worldgen;

pub use column::ColumnPlan;
pub use terrain::{SeedOffsets, TerrainGenerator};
pub use worldgen::{WorldGenConfig, WorldGenMode, load_config_from_path};

use serde::{Deserialize, Serialize};

/// Edge length of a chunk in voxels.
pub const CHUNK_SIZE: usize = 16;
pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn with_y(self, cy: i32) -> Self {
        Self { cy, ..self }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// World-space block position of the chunk's `(0,0,0)` voxel.
    #[inline]
    pub fn base_block(self) -> (i32, i32, i32) {
        (
            self.cx * CHUNK_SIZE_I32,
            self.cy * CHUNK_SIZE_I32,
            self.cz * CHUNK_SIZE_I32,
        )
    }

    #[inline]
    pub fn world_origin(self) -> [f32; 3] {
        let (x, y, z) = self.base_block();
        [x as f32, y as f32, z as f32]
    }

    /// Chunk containing the world-space position (floored per axis).
    #[inline]
    pub fn from_world_pos(x: f32, y: f32, z: f32) -> Self {
        let s = CHUNK_SIZE as f32;
        Self::new(
            (x / s).floor() as i32,
            (y / s).floor() as i32,
            (z / s).floor() as i32,
        )
    }

    /// Chunk containing the world-space block, plus the block's local position.
    #[inline]
    pub fn split_block(wx: i32, wy: i32, wz: i32) -> (Self, (i32, i32, i32)) {
        let coord = Self::new(
            wx.div_euclid(CHUNK_SIZE_I32),
            wy.div_euclid(CHUNK_SIZE_I32),
            wz.div_euclid(CHUNK_SIZE_I32),
        );
        let local = (
            wx.rem_euclid(CHUNK_SIZE_I32),
            wy.rem_euclid(CHUNK_SIZE_I32),
            wz.rem_euclid(CHUNK_SIZE_I32),
        );
        (coord, local)
    }

    /// Horizontal squared distance, ignoring the vertical layer.
    #[inline]
    pub fn horizontal_distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.cx, self.cy, self.cz)
    }
}
