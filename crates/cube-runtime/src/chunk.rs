use cube_blocks::BlockKind;
use cube_chunk::{ChunkOccupancy, VoxelGrid};
use cube_mesh_cpu::{
    ChunkMesh, MeshStats, NeighborLookup, SurfaceMode, build_chunk_mesh_with_stats,
};
use cube_world::ChunkCoord;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Pooled; grid cleared, no geometry.
    Free,
    /// Taken from the pool and bound to a coordinate while its finished grid
    /// is installed. Coordinates still being generated live in the
    /// streamer's pending set and own no shell.
    Generating,
    /// Grid and geometry installed.
    Ready,
}

pub struct Chunk<E> {
    coord: ChunkCoord,
    state: ChunkState,
    grid: VoxelGrid,
    mesh: ChunkMesh,
    mesh_stats: MeshStats,
    occupancy: ChunkOccupancy,
    dirty: bool,
    pub(crate) entity: Option<E>,
}

impl<E> Default for Chunk<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Chunk<E> {
    pub fn new() -> Self {
        Self {
            coord: ChunkCoord::default(),
            state: ChunkState::Free,
            grid: VoxelGrid::new(),
            mesh: ChunkMesh::default(),
            mesh_stats: MeshStats::default(),
            occupancy: ChunkOccupancy::Empty,
            dirty: false,
            entity: None,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    #[inline]
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    #[inline]
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    pub fn mesh_stats(&self) -> MeshStats {
        self.mesh_stats
    }

    pub fn occupancy(&self) -> ChunkOccupancy {
        self.occupancy
    }

    pub fn entity(&self) -> Option<&E> {
        self.entity.as_ref()
    }

    /// True after an edit that the current geometry does not reflect yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockKind {
        self.grid.get(x, y, z)
    }

    /// Out-of-range writes are ignored.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) -> bool {
        let changed = self.grid.set(x, y, z, kind);
        if changed {
            self.dirty = true;
            if !kind.is_air() {
                self.occupancy = ChunkOccupancy::Populated;
            }
        }
        changed
    }

    pub(crate) fn begin(&mut self, coord: ChunkCoord) {
        debug_assert_eq!(self.state, ChunkState::Free);
        self.coord = coord;
        self.state = ChunkState::Generating;
    }

    pub(crate) fn install(&mut self, grid: VoxelGrid, occupancy: ChunkOccupancy) {
        self.grid = grid;
        self.occupancy = occupancy;
        self.state = ChunkState::Ready;
    }

    /// Rebuilds geometry from the current grid.
    pub fn rebuild_mesh(
        &mut self,
        neighbors: Option<&dyn NeighborLookup>,
        surface: SurfaceMode,
    ) -> &ChunkMesh {
        let (mesh, stats) = build_chunk_mesh_with_stats(&self.grid, self.coord, neighbors, surface);
        self.mesh = mesh;
        self.mesh_stats = stats;
        self.dirty = false;
        &self.mesh
    }

    /// Returns the chunk to its pooled state. The host entity is kept.
    pub(crate) fn clear(&mut self) {
        self.grid.clear();
        self.mesh = ChunkMesh::default();
        self.mesh_stats = MeshStats::default();
        self.occupancy = ChunkOccupancy::Empty;
        self.dirty = false;
        self.state = ChunkState::Free;
    }
}
