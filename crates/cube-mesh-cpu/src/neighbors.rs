use cube_blocks::{BlockKind, Face};
use cube_chunk::VoxelGrid;
use cube_world::CHUNK_SIZE_I32;

/// Resolves blocks just outside the chunk being meshed. Coordinates are
/// local to that chunk and have at least one component outside `[0, SIZE)`.
pub trait NeighborLookup {
    fn block_at_local(&self, x: i32, y: i32, z: i32) -> BlockKind;
}

impl<F> NeighborLookup for F
where
    F: Fn(i32, i32, i32) -> BlockKind,
{
    #[inline]
    fn block_at_local(&self, x: i32, y: i32, z: i32) -> BlockKind {
        self(x, y, z)
    }
}

/// The six face-adjacent grids, indexed by [`Face`]. Missing neighbors and
/// positions outside every loaded neighbor read as air.
#[derive(Clone, Copy, Default)]
pub struct NeighborGrids<'a> {
    grids: [Option<&'a VoxelGrid>; 6],
}

impl<'a> NeighborGrids<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_fn(mut f: impl FnMut(Face) -> Option<&'a VoxelGrid>) -> Self {
        let mut grids = [None; 6];
        for face in Face::ALL {
            grids[face.index()] = f(face);
        }
        Self { grids }
    }

    pub fn with(mut self, face: Face, grid: &'a VoxelGrid) -> Self {
        self.grids[face.index()] = Some(grid);
        self
    }

    pub fn loaded(&self) -> usize {
        self.grids.iter().filter(|g| g.is_some()).count()
    }
}

impl NeighborLookup for NeighborGrids<'_> {
    fn block_at_local(&self, x: i32, y: i32, z: i32) -> BlockKind {
        let s = CHUNK_SIZE_I32;
        let step = |c: i32| -> Option<i32> {
            if c < 0 {
                Some(-1)
            } else if c >= s {
                Some(1)
            } else {
                None
            }
        };
        let face = match (step(x), step(y), step(z)) {
            (Some(d), None, None) => Face::from_axis(0, d < 0),
            (None, Some(d), None) => Face::from_axis(1, d < 0),
            (None, None, Some(d)) => Face::from_axis(2, d < 0),
            _ => return BlockKind::Air,
        };
        match self.grids[face.index()] {
            Some(g) => g.get(x.rem_euclid(s), y.rem_euclid(s), z.rem_euclid(s)),
            None => BlockKind::Air,
        }
    }
}
