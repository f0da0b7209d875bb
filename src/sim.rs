use std::sync::Arc;
use std::time::Instant;

use cube_mesh_cpu::ChunkMesh;
use cube_runtime::{RenderHost, StreamStats, Streamer};
use cube_world::{ChunkCoord, TerrainGenerator};

use crate::config::AppConfig;

/// Headless host that tracks what a renderer would hold.
#[derive(Debug, Default)]
pub struct StatsHost {
    next_id: u32,
    pub live: usize,
    pub visible: usize,
    pub uploads: usize,
    pub vertices: usize,
    pub triangles: usize,
}

impl RenderHost for StatsHost {
    type Entity = u32;

    fn create_entity(&mut self, _coord: ChunkCoord) -> u32 {
        self.next_id += 1;
        self.live += 1;
        self.next_id
    }

    fn set_mesh(&mut self, _entity: &u32, mesh: &ChunkMesh, _material: &str) {
        self.uploads += 1;
        self.vertices += mesh.vertex_count();
        self.triangles += mesh.triangle_count();
    }

    fn set_position(&mut self, _entity: &u32, _origin: [f32; 3]) {}

    fn set_active(&mut self, _entity: &u32, active: bool) {
        if active {
            self.visible += 1;
        } else {
            self.visible = self.visible.saturating_sub(1);
        }
    }

    fn destroy_entity(&mut self, _entity: u32) {
        self.live = self.live.saturating_sub(1);
    }
}

/// Straight-line fly-through starting above the origin.
#[derive(Clone, Copy, Debug)]
pub struct ViewerPath {
    pub start: [f32; 3],
    pub step: [f32; 3],
}

impl ViewerPath {
    pub fn along_x(speed: f32) -> Self {
        Self {
            start: [8.0, 80.0, 8.0],
            step: [speed, 0.0, 0.0],
        }
    }

    pub fn at(&self, tick: u64) -> [f32; 3] {
        let t = tick as f32;
        [
            self.start[0] + self.step[0] * t,
            self.start[1] + self.step[1] * t,
            self.start[2] + self.step[2] * t,
        ]
    }
}

#[derive(Debug)]
pub struct SimSummary {
    pub ticks: u64,
    pub stats: StreamStats,
    pub host: StatsHost,
    pub millis: u128,
}

pub fn run(
    cfg: &AppConfig,
    path: ViewerPath,
    ticks: u64,
) -> Result<SimSummary, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let terrain = Arc::new(TerrainGenerator::new(&cfg.world));
    let mut streamer = Streamer::new(cfg.stream.clone(), terrain, StatsHost::default())?;
    for t in 0..ticks {
        let report = streamer.tick(path.at(t));
        if report.viewer_changed {
            log::info!(
                target: "events",
                "[tick {}] ViewCenterChanged {} dispatched={} evicted={}",
                report.tick,
                report.viewer,
                report.dispatched.len(),
                report.evicted.len()
            );
        }
        if report.tick % 120 == 0 {
            let s = streamer.stats();
            log::info!(
                target: "events",
                "[tick {}] active={} pending={} queued={} free={} stale={}",
                report.tick,
                s.active,
                s.pending,
                s.queued,
                s.free,
                s.stale
            );
        }
    }
    let stats = streamer.stats();
    let host = streamer.shutdown();
    Ok(SimSummary {
        ticks,
        stats,
        host,
        millis: start.elapsed().as_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_fly_through_streams_and_recycles() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [world]
            mode = "flat"
            [stream]
            render_radius = 2
            vertical_chunks = 1
            chunks_per_tick = 64
            workers = 0
        "#,
        )
        .unwrap();
        let summary = run(&cfg, ViewerPath::along_x(16.0), 8).unwrap();
        assert_eq!(summary.stats.active, 13);
        assert!(summary.stats.recycled > 0);
        assert!(summary.stats.pool_reused > 0);
        assert_eq!(summary.host.live, 0);
        assert!(summary.host.triangles > 0);
    }
}
