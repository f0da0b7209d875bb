//! Chunk lifecycle, background generation and viewer-driven streaming.
#![forbid(unsafe_code)]

mod chunk;
mod config;
mod host;
mod streamer;
mod workers;

pub use chunk::{Chunk, ChunkState};
pub use config::StreamConfig;
pub use host::{NullHost, RenderHost};
pub use streamer::{
    DrainReport, ReconcileReport, StreamStats, Streamer, TickReport, needed_coords,
};
pub use workers::GenWorkers;
