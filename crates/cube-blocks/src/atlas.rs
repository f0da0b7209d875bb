//! Tile lookup for the 4x4 block atlas. Tiles are addressed as
//! `(column, row)` counted from the bottom-left corner of the atlas.

use crate::face::Face;
use crate::kind::BlockKind;

pub const ATLAS_SIZE: u32 = 4;
pub const TILE_SIZE: f32 = 1.0 / ATLAS_SIZE as f32;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileUv {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

pub fn tile_position(kind: BlockKind, face: Face) -> (u32, u32) {
    match kind {
        BlockKind::Grass if face.is_top() => (0, 3),
        BlockKind::Grass if face.is_bottom() => (1, 3),
        BlockKind::Grass => (0, 2),
        BlockKind::Dirt => (1, 3),
        BlockKind::Stone => (2, 3),
        BlockKind::Sand => (3, 3),
        BlockKind::Snow => (0, 1),
        BlockKind::Water => (1, 1),
        BlockKind::Wood if face.is_top() || face.is_bottom() => (3, 2),
        BlockKind::Wood => (2, 2),
        BlockKind::Leaves => (1, 2),
        BlockKind::Air => (0, 0),
    }
}

pub fn tile_uv(kind: BlockKind, face: Face) -> TileUv {
    let (col, row) = tile_position(kind, face);
    let u0 = col as f32 * TILE_SIZE;
    let v0 = row as f32 * TILE_SIZE;
    TileUv {
        u0,
        v0,
        u1: u0 + TILE_SIZE,
        v1: v0 + TILE_SIZE,
    }
}
