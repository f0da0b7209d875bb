//! CPU meshing crate: greedy mesher turning voxel grids into quad geometry.
#![forbid(unsafe_code)]

mod greedy;
mod mesh_build;
mod neighbors;

pub use greedy::{GreedyMesher, MeshStats};
pub use mesh_build::{ChunkMesh, IndexBuffer, MeshBuild, QuadShade};
pub use neighbors::{NeighborGrids, NeighborLookup};

use cube_chunk::VoxelGrid;
use cube_world::ChunkCoord;
use serde::Deserialize;

/// How quads carry their surface appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceMode {
    /// Shaded, jittered RGBA8 per vertex.
    #[default]
    VertexColor,
    /// Texture-atlas UVs per vertex.
    Atlas,
}

/// Builds geometry for `grid` at `coord`. Without `neighbors`, every block
/// outside the chunk reads as air.
pub fn build_chunk_mesh(
    grid: &VoxelGrid,
    coord: ChunkCoord,
    neighbors: Option<&dyn NeighborLookup>,
    surface: SurfaceMode,
) -> ChunkMesh {
    build_chunk_mesh_with_stats(grid, coord, neighbors, surface).0
}

pub fn build_chunk_mesh_with_stats(
    grid: &VoxelGrid,
    coord: ChunkCoord,
    neighbors: Option<&dyn NeighborLookup>,
    surface: SurfaceMode,
) -> (ChunkMesh, MeshStats) {
    let (mesh, stats) = GreedyMesher::new(grid, coord, neighbors, surface).run();
    log::trace!(
        target: "perf",
        "mesh {} quads={} faces={} ratio={:.2} us={}",
        coord,
        stats.quads,
        stats.faces,
        stats.merge_ratio(),
        stats.micros
    );
    (mesh, stats)
}
