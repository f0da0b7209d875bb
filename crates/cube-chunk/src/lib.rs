//! Voxel grid storage and per-chunk terrain generation.
#![forbid(unsafe_code)]

use std::time::{Duration, Instant};

use cube_blocks::BlockKind;
use cube_world::{CHUNK_SIZE, CHUNK_VOLUME, ChunkCoord, TerrainGenerator};

/// Fixed `CHUNK_SIZE`³ block storage, linearized as `(y * S + z) * S + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    blocks: Box<[BlockKind]>,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VoxelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelGrid")
            .field("non_air", &self.count_non_air())
            .finish()
    }
}

impl VoxelGrid {
    pub const SIZE: usize = CHUNK_SIZE;

    /// All-air grid.
    pub fn new() -> Self {
        Self {
            blocks: vec![BlockKind::Air; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    pub fn filled(kind: BlockKind) -> Self {
        Self {
            blocks: vec![kind; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Wraps a linearized block vector; panics unless it holds exactly one chunk.
    pub fn from_blocks(blocks: Vec<BlockKind>) -> Self {
        assert_eq!(
            blocks.len(),
            CHUNK_VOLUME,
            "voxel grid needs {CHUNK_VOLUME} blocks, got {}",
            blocks.len()
        );
        Self {
            blocks: blocks.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        (y * CHUNK_SIZE + z) * CHUNK_SIZE + x
    }

    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        let s = CHUNK_SIZE as i32;
        (0..s).contains(&x) && (0..s).contains(&y) && (0..s).contains(&z)
    }

    /// Reads outside the grid yield `Air`.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockKind {
        if !Self::in_bounds(x, y, z) {
            return BlockKind::Air;
        }
        self.blocks[Self::idx(x as usize, y as usize, z as usize)]
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockKind {
        self.blocks[Self::idx(x, y, z)]
    }

    /// Writes outside the grid are ignored. Returns whether a cell changed.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) -> bool {
        if !Self::in_bounds(x, y, z) {
            return false;
        }
        let i = Self::idx(x as usize, y as usize, z as usize);
        let changed = self.blocks[i] != kind;
        self.blocks[i] = kind;
        changed
    }

    pub fn fill(&mut self, kind: BlockKind) {
        self.blocks.fill(kind);
    }

    pub fn clear(&mut self) {
        self.fill(BlockKind::Air);
    }

    pub fn as_slice(&self) -> &[BlockKind] {
        &self.blocks
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_air())
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }

    pub fn count_non_air(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }

    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkGenerateResult {
    pub coord: ChunkCoord,
    pub grid: VoxelGrid,
    pub occupancy: ChunkOccupancy,
    /// Interior column heights, row-major by z then x.
    pub heights: Vec<i32>,
    pub elapsed: Duration,
}

/// Fills a fresh grid for `coord`. Pure with respect to `terrain`.
pub fn generate_chunk_grid(terrain: &TerrainGenerator, coord: ChunkCoord) -> ChunkGenerateResult {
    let start = Instant::now();
    let plan = terrain.plan_columns(coord);
    let (_, base_y, _) = coord.base_block();
    let mut blocks = vec![BlockKind::Air; CHUNK_VOLUME];
    let mut has_blocks = false;
    // Whole chunk above the tallest column in its footprint stays air.
    if base_y <= plan.max_height() {
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                for y in 0..CHUNK_SIZE {
                    let wy = base_y + y as i32;
                    let block = terrain.block_at(&plan, x, z, wy);
                    if !block.is_air() {
                        has_blocks = true;
                    }
                    blocks[VoxelGrid::idx(x, y, z)] = block;
                }
            }
        }
    }
    ChunkGenerateResult {
        coord,
        grid: VoxelGrid::from_blocks(blocks),
        occupancy: if has_blocks {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        },
        heights: plan.interior_heights(),
        elapsed: start.elapsed(),
    }
}
