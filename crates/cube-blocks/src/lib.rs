//! Block kinds, face conventions, and the static block palette.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod face;
pub mod kind;
pub mod palette;

pub use atlas::{ATLAS_SIZE, TILE_SIZE, TileUv, tile_position, tile_uv};
pub use face::Face;
pub use kind::BlockKind;
pub use palette::{Color, color_for, face_color, face_shade, position_jitter};
