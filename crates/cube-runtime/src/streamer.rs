use std::collections::VecDeque;
use std::error::Error;
use std::sync::Arc;

use cube_blocks::{BlockKind, Face};
use cube_chunk::ChunkGenerateResult;
use cube_mesh_cpu::NeighborGrids;
use cube_world::{CHUNK_SIZE_I32, ChunkCoord, TerrainGenerator};
use hashbrown::{HashMap, HashSet};

use crate::chunk::Chunk;
use crate::config::StreamConfig;
use crate::host::RenderHost;
use crate::workers::GenWorkers;

/// Coordinates within `radius` of `center` on the horizontal disc, crossed
/// with vertical layers `0..layers`.
pub fn needed_coords(center: ChunkCoord, radius: i32, layers: i32) -> HashSet<ChunkCoord> {
    let r2 = i64::from(radius) * i64::from(radius);
    let mut out = HashSet::new();
    for dz in -radius..=radius {
        for dx in -radius..=radius {
            if i64::from(dx * dx + dz * dz) > r2 {
                continue;
            }
            for cy in 0..layers {
                out.insert(ChunkCoord::new(center.cx + dx, cy, center.cz + dz));
            }
        }
    }
    out
}

#[derive(Clone, Debug, Default)]
pub struct ReconcileReport {
    pub dispatched: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
}

#[derive(Clone, Debug, Default)]
pub struct DrainReport {
    pub installed: Vec<ChunkCoord>,
    pub stale: Vec<ChunkCoord>,
}

#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub tick: u64,
    pub viewer: ChunkCoord,
    pub viewer_changed: bool,
    pub dispatched: Vec<ChunkCoord>,
    pub installed: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
    pub stale: Vec<ChunkCoord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub ticks: u64,
    pub dispatched: u64,
    pub installed: u64,
    pub stale: u64,
    pub recycled: u64,
    pub pool_reused: u64,
    pub created: u64,
    pub rebuilds: u64,
    pub neighbor_rebuilds: u64,
    pub queued: usize,
    /// Jobs still running on the worker pool.
    pub inflight: usize,
    pub pending: usize,
    pub active: usize,
    pub free: usize,
}

/// Keeps the chunks around a moving viewer loaded. Owns every piece of
/// streaming state; workers only see the shared terrain generator.
pub struct Streamer<H: RenderHost> {
    cfg: StreamConfig,
    host: H,
    workers: GenWorkers,
    active: HashMap<ChunkCoord, Chunk<H::Entity>>,
    pending: HashSet<ChunkCoord>,
    needed: HashSet<ChunkCoord>,
    free: VecDeque<Chunk<H::Entity>>,
    viewer: Option<ChunkCoord>,
    tick: u64,
    stats: StreamStats,
}

impl<H: RenderHost> Streamer<H> {
    pub fn new(
        cfg: StreamConfig,
        terrain: Arc<TerrainGenerator>,
        host: H,
    ) -> Result<Self, Box<dyn Error>> {
        cfg.validate()?;
        let workers = GenWorkers::new(terrain, cfg.workers)?;
        log::info!(
            target: "stream",
            "streamer ready radius={} layers={} per_tick={} workers={} surface={:?}",
            cfg.render_radius,
            cfg.vertical_chunks,
            cfg.chunks_per_tick,
            workers.threads(),
            cfg.surface
        );
        Ok(Self {
            cfg,
            host,
            workers,
            active: HashMap::new(),
            pending: HashSet::new(),
            needed: HashSet::new(),
            free: VecDeque::new(),
            viewer: None,
            tick: 0,
            stats: StreamStats::default(),
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.cfg
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn viewer_chunk(&self) -> Option<ChunkCoord> {
        self.viewer
    }

    pub fn needed(&self) -> &HashSet<ChunkCoord> {
        &self.needed
    }

    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn active_chunk_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.active.keys().copied()
    }

    pub fn free_pool_len(&self) -> usize {
        self.free.len()
    }

    /// Pooled chunks, oldest first.
    pub fn free_pool(&self) -> impl Iterator<Item = &Chunk<H::Entity>> {
        self.free.iter()
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk<H::Entity>> {
        self.active.get(&coord)
    }

    /// Direct access for edits; follow with [`Streamer::rebuild_chunk`].
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk<H::Entity>> {
        self.active.get_mut(&coord)
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            queued: self.workers.queued(),
            inflight: self.workers.inflight(),
            pending: self.pending.len(),
            active: self.active.len(),
            free: self.free.len(),
            ..self.stats
        }
    }

    pub fn recompute_needed(&self, viewer: ChunkCoord) -> HashSet<ChunkCoord> {
        needed_coords(viewer, self.cfg.render_radius, self.cfg.vertical_chunks)
    }

    /// Dispatches generation for needed coordinates that are neither active
    /// nor pending, and evicts active coordinates that are no longer needed.
    pub fn reconcile(&mut self, needed: HashSet<ChunkCoord>) -> ReconcileReport {
        self.needed = needed;
        let mut report = ReconcileReport::default();

        let mut to_dispatch: Vec<ChunkCoord> = self
            .needed
            .iter()
            .copied()
            .filter(|c| !self.active.contains_key(c) && !self.pending.contains(c))
            .collect();
        // Nearest first so the area around the viewer fills in early.
        if let Some(v) = self.viewer {
            to_dispatch.sort_by_key(|c| (c.horizontal_distance_sq(v), c.cy, c.cx, c.cz));
        }
        for coord in to_dispatch {
            self.pending.insert(coord);
            self.stats.dispatched += 1;
            log::trace!(target: "stream", "[tick {}] ChunkDispatched {}", self.tick, coord);
            self.workers.submit(coord);
            report.dispatched.push(coord);
        }

        let to_evict: Vec<ChunkCoord> = self
            .active
            .keys()
            .copied()
            .filter(|c| !self.needed.contains(c))
            .collect();
        for coord in to_evict {
            if self.recycle(coord) {
                report.evicted.push(coord);
            }
        }
        report
    }

    /// Pops up to `max` finished grids. Results for coordinates no longer
    /// needed are dropped but still count toward `max`.
    pub fn drain_completions(&mut self, max: usize) -> DrainReport {
        let mut report = DrainReport::default();
        for _ in 0..max {
            let Some(result) = self.workers.try_recv() else {
                break;
            };
            let coord = result.coord;
            let was_pending = self.pending.remove(&coord);
            assert!(was_pending, "completion for {coord} that was never dispatched");
            if !self.needed.contains(&coord) || self.active.contains_key(&coord) {
                self.stats.stale += 1;
                log::trace!(target: "stream", "[tick {}] StaleCompletion {}", self.tick, coord);
                report.stale.push(coord);
                continue;
            }
            self.install(result);
            report.installed.push(coord);
        }
        report
    }

    fn take_shell(&mut self, coord: ChunkCoord) -> Chunk<H::Entity> {
        let mut chunk = match self.free.pop_front() {
            Some(c) => {
                self.stats.pool_reused += 1;
                c
            }
            None => {
                self.stats.created += 1;
                Chunk::new()
            }
        };
        chunk.begin(coord);
        chunk
    }

    fn install(&mut self, result: ChunkGenerateResult) {
        let ChunkGenerateResult {
            coord,
            grid,
            occupancy,
            elapsed,
            ..
        } = result;
        let mut chunk = self.take_shell(coord);
        chunk.install(grid, occupancy);
        let neighbors = {
            let lookup = self.neighbor_grids(coord);
            chunk.rebuild_mesh(Some(&lookup), self.cfg.surface);
            lookup.loaded()
        };
        let entity = match chunk.entity.take() {
            Some(e) => e,
            None => self.host.create_entity(coord),
        };
        self.host.set_position(&entity, coord.world_origin());
        self.host.set_mesh(&entity, chunk.mesh(), &self.cfg.material);
        self.host.set_active(&entity, true);
        chunk.entity = Some(entity);

        log::debug!(
            target: "stream",
            "[tick {}] ChunkInstalled {} quads={} neighbors={} gen_us={}",
            self.tick,
            coord,
            chunk.mesh_stats().quads,
            neighbors,
            elapsed.as_micros()
        );
        self.active.insert(coord, chunk);
        self.stats.installed += 1;

        if self.cfg.rebuild_neighbors {
            for face in Face::ALL {
                let (dx, dy, dz) = face.delta();
                let n = coord.offset(dx, dy, dz);
                if self.remesh(n) {
                    self.stats.neighbor_rebuilds += 1;
                }
            }
        }
    }

    fn neighbor_grids(&self, coord: ChunkCoord) -> NeighborGrids<'_> {
        NeighborGrids::from_fn(|face| {
            let (dx, dy, dz) = face.delta();
            self.active.get(&coord.offset(dx, dy, dz)).map(|c| c.grid())
        })
    }

    fn remesh(&mut self, coord: ChunkCoord) -> bool {
        let Some(mut chunk) = self.active.remove(&coord) else {
            return false;
        };
        {
            let lookup = self.neighbor_grids(coord);
            chunk.rebuild_mesh(Some(&lookup), self.cfg.surface);
        }
        if let Some(entity) = chunk.entity.as_ref() {
            self.host.set_mesh(entity, chunk.mesh(), &self.cfg.material);
        }
        self.active.insert(coord, chunk);
        true
    }

    /// Clears the chunk at `coord`, hides its entity and returns it to the pool.
    pub fn recycle(&mut self, coord: ChunkCoord) -> bool {
        let Some(mut chunk) = self.active.remove(&coord) else {
            return false;
        };
        chunk.clear();
        if let Some(entity) = chunk.entity.as_ref() {
            self.host.set_active(entity, false);
        }
        self.free.push_back(chunk);
        self.stats.recycled += 1;
        log::trace!(target: "stream", "[tick {}] ChunkRecycled {}", self.tick, coord);
        true
    }

    /// Sets the viewer chunk and reconciles when it changed.
    pub fn update_viewer(&mut self, viewer: ChunkCoord) -> Option<ReconcileReport> {
        if self.viewer == Some(viewer) {
            return None;
        }
        log::debug!(target: "stream", "[tick {}] ViewCenterChanged {}", self.tick, viewer);
        self.viewer = Some(viewer);
        let needed = self.recompute_needed(viewer);
        Some(self.reconcile(needed))
    }

    pub fn tick(&mut self, viewer_pos: [f32; 3]) -> TickReport {
        self.tick += 1;
        self.stats.ticks += 1;
        let viewer =
            ChunkCoord::from_world_pos(viewer_pos[0], viewer_pos[1], viewer_pos[2]).with_y(0);
        let mut report = TickReport {
            tick: self.tick,
            viewer,
            ..TickReport::default()
        };
        if let Some(r) = self.update_viewer(viewer) {
            report.viewer_changed = true;
            report.dispatched = r.dispatched;
            report.evicted = r.evicted;
        }
        let drained = self.drain_completions(self.cfg.chunks_per_tick);
        report.installed = drained.installed;
        report.stale = drained.stale;
        if !report.dispatched.is_empty() || !report.evicted.is_empty() {
            log::debug!(
                target: "stream",
                "[tick {}] Reconciled dispatched={} evicted={} pending={} active={}",
                self.tick,
                report.dispatched.len(),
                report.evicted.len(),
                self.pending.len(),
                self.active.len()
            );
        }
        report
    }

    /// Re-meshes an active chunk from its current grid.
    pub fn rebuild_chunk(&mut self, coord: ChunkCoord) -> bool {
        let done = self.remesh(coord);
        if done {
            self.stats.rebuilds += 1;
        }
        done
    }

    pub fn block_world(&self, wx: i32, wy: i32, wz: i32) -> BlockKind {
        let (coord, (lx, ly, lz)) = ChunkCoord::split_block(wx, wy, wz);
        self.active
            .get(&coord)
            .map_or(BlockKind::Air, |c| c.get_block(lx, ly, lz))
    }

    /// Edits an active chunk and rebuilds it, plus any active neighbor whose
    /// shared face the edit touches. Returns false when the chunk is not loaded
    /// or the block already had that kind.
    pub fn set_block_world(&mut self, wx: i32, wy: i32, wz: i32, kind: BlockKind) -> bool {
        let (coord, (lx, ly, lz)) = ChunkCoord::split_block(wx, wy, wz);
        let Some(chunk) = self.active.get_mut(&coord) else {
            return false;
        };
        if !chunk.set_block(lx, ly, lz, kind) {
            return false;
        }
        self.rebuild_chunk(coord);
        let last = CHUNK_SIZE_I32 - 1;
        for (axis, l) in [lx, ly, lz].into_iter().enumerate() {
            let side = if l == 0 {
                Some(Face::from_axis(axis, true))
            } else if l == last {
                Some(Face::from_axis(axis, false))
            } else {
                None
            };
            if let Some(face) = side {
                let (dx, dy, dz) = face.delta();
                if self.remesh(coord.offset(dx, dy, dz)) {
                    self.stats.neighbor_rebuilds += 1;
                }
            }
        }
        true
    }

    /// Stops the workers, destroys every entity and hands the host back.
    pub fn shutdown(self) -> H {
        let Streamer {
            mut host,
            workers,
            active,
            free,
            stats,
            ..
        } = self;
        drop(workers);
        let mut destroyed = 0usize;
        for chunk in active.into_values().chain(free) {
            if let Some(entity) = chunk.entity {
                host.destroy_entity(entity);
                destroyed += 1;
            }
        }
        log::info!(
            target: "stream",
            "streamer shut down installed={} recycled={} stale={} entities={}",
            stats.installed,
            stats.recycled,
            stats.stale,
            destroyed
        );
        host
    }
}
