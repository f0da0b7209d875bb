use std::error::Error;

use cube_mesh_cpu::SurfaceMode;
use cube_world::CHUNK_SIZE;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct StreamConfig {
    /// Horizontal radius in chunks; the needed set is the disc `dx²+dz² ≤ r²`.
    #[serde(default = "default_render_radius")]
    pub render_radius: i32,
    /// Vertical layers `0..vertical_chunks` loaded for every column.
    #[serde(default = "default_vertical_chunks")]
    pub vertical_chunks: i32,
    #[serde(default = "default_chunks_per_tick")]
    pub chunks_per_tick: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Generation threads; `0` generates inline on the ticking thread.
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub rebuild_neighbors: bool,
    #[serde(default)]
    pub surface: SurfaceMode,
    #[serde(default = "default_material")]
    pub material: String,
}

fn default_render_radius() -> i32 {
    8
}
fn default_vertical_chunks() -> i32 {
    8
}
fn default_chunks_per_tick() -> usize {
    4
}
fn default_chunk_size() -> usize {
    CHUNK_SIZE
}
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(2)
}
fn default_material() -> String {
    "chunk".to_string()
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            render_radius: default_render_radius(),
            vertical_chunks: default_vertical_chunks(),
            chunks_per_tick: default_chunks_per_tick(),
            chunk_size: default_chunk_size(),
            workers: default_workers(),
            rebuild_neighbors: false,
            surface: SurfaceMode::default(),
            material: default_material(),
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.chunk_size != CHUNK_SIZE {
            return Err(format!(
                "stream.chunk_size must be {CHUNK_SIZE}, got {}",
                self.chunk_size
            )
            .into());
        }
        if self.render_radius < 0 {
            return Err(format!(
                "stream.render_radius must not be negative, got {}",
                self.render_radius
            )
            .into());
        }
        if self.vertical_chunks < 1 {
            return Err("stream.vertical_chunks must be at least 1".into());
        }
        if self.chunks_per_tick == 0 {
            return Err("stream.chunks_per_tick must be at least 1".into());
        }
        Ok(())
    }
}
