use std::sync::Arc;
use std::time::{Duration, Instant};

use cube_blocks::{BlockKind, Face};
use cube_mesh_cpu::ChunkMesh;
use cube_runtime::{
    ChunkState, NullHost, RenderHost, StreamConfig, Streamer, needed_coords,
};
use cube_world::{CHUNK_SIZE, ChunkCoord, TerrainGenerator, WorldGenConfig, WorldGenMode};
use hashbrown::HashSet;

fn flat_terrain() -> Arc<TerrainGenerator> {
    let cfg = WorldGenConfig {
        mode: WorldGenMode::Flat,
        ..WorldGenConfig::default()
    };
    Arc::new(TerrainGenerator::new(&cfg))
}

fn inline_config(radius: i32, per_tick: usize) -> StreamConfig {
    StreamConfig {
        render_radius: radius,
        vertical_chunks: 1,
        chunks_per_tick: per_tick,
        workers: 0,
        ..StreamConfig::default()
    }
}

fn center_of(cx: i32, cz: i32) -> [f32; 3] {
    let s = CHUNK_SIZE as f32;
    [cx as f32 * s + s / 2.0, 40.0, cz as f32 * s + s / 2.0]
}

#[derive(Debug, PartialEq, Eq)]
enum HostEvent {
    Created(ChunkCoord),
    Mesh(u32),
    Active(u32, bool),
    Destroyed(u32),
}

#[derive(Default)]
struct RecordingHost {
    next: u32,
    events: Vec<HostEvent>,
}

impl RenderHost for RecordingHost {
    type Entity = u32;

    fn create_entity(&mut self, coord: ChunkCoord) -> u32 {
        self.next += 1;
        self.events.push(HostEvent::Created(coord));
        self.next
    }

    fn set_mesh(&mut self, entity: &u32, _mesh: &ChunkMesh, material: &str) {
        assert_eq!(material, "chunk");
        self.events.push(HostEvent::Mesh(*entity));
    }

    fn set_position(&mut self, _entity: &u32, _origin: [f32; 3]) {}

    fn set_active(&mut self, entity: &u32, active: bool) {
        self.events.push(HostEvent::Active(*entity, active));
    }

    fn destroy_entity(&mut self, entity: u32) {
        self.events.push(HostEvent::Destroyed(entity));
    }
}

#[test]
fn radius_two_disc_has_thirteen_chunks() {
    let needed = needed_coords(ChunkCoord::new(0, 0, 0), 2, 1);
    assert_eq!(needed.len(), 13);
    for c in &needed {
        assert_eq!(c.cy, 0);
        assert!(c.cx * c.cx + c.cz * c.cz <= 4);
    }
    assert!(!needed.contains(&ChunkCoord::new(1, 0, 2)));
    assert_eq!(needed_coords(ChunkCoord::new(3, 0, -3), 2, 3).len(), 39);
}

#[test]
fn first_tick_loads_the_disc() {
    let mut s = Streamer::new(inline_config(2, 64), flat_terrain(), NullHost::default()).unwrap();
    let report = s.tick(center_of(0, 0));
    assert!(report.viewer_changed);
    assert_eq!(report.dispatched.len(), 13);
    assert_eq!(report.installed.len(), 13);
    assert_eq!(s.active_chunk_count(), 13);
    assert_eq!(s.pending_count(), 0);
    assert_eq!(s.host().live, 13);
    for c in s.active_coords() {
        assert_eq!(s.chunk(c).map(|c| c.state()), Some(ChunkState::Ready));
    }

    // Standing still changes nothing.
    let again = s.tick(center_of(0, 0));
    assert!(!again.viewer_changed);
    assert!(again.dispatched.is_empty() && again.installed.is_empty());
}

#[test]
fn moving_away_evicts_into_the_pool_and_reuses_it() {
    let mut s = Streamer::new(inline_config(2, 64), flat_terrain(), NullHost::default()).unwrap();
    s.tick(center_of(0, 0));
    let before: HashSet<ChunkCoord> = s.active_coords().collect();

    let report = s
        .update_viewer(ChunkCoord::new(5, 0, 0))
        .expect("viewer moved");
    let evicted: HashSet<ChunkCoord> = report.evicted.iter().copied().collect();
    assert_eq!(evicted, before);
    assert_eq!(s.free_pool_len(), 13);
    for pooled in s.free_pool() {
        assert_eq!(pooled.state(), ChunkState::Free);
        assert!(pooled.grid().is_all_air());
        assert!(pooled.mesh().is_empty());
    }

    // Every new coordinate is pending, none active yet, none dispatched twice.
    let dispatched: HashSet<ChunkCoord> = report.dispatched.iter().copied().collect();
    assert_eq!(dispatched.len(), report.dispatched.len());
    assert_eq!(&dispatched, s.needed());
    for c in &dispatched {
        assert!(s.is_pending(*c));
        assert!(s.chunk(*c).is_none());
    }

    let drained = s.drain_completions(64);
    assert_eq!(drained.installed.len(), 13);
    assert!(drained.stale.is_empty());
    for c in &dispatched {
        assert!(!s.is_pending(*c));
        assert_eq!(s.chunk(*c).map(|c| c.state()), Some(ChunkState::Ready));
    }
    let stats = s.stats();
    assert_eq!(stats.pool_reused, 13);
    assert_eq!(stats.created, 13);
    assert_eq!(stats.recycled, 13);
    assert_eq!(s.free_pool_len(), 0);
}

#[test]
fn results_for_abandoned_coordinates_are_discarded() {
    let mut s = Streamer::new(inline_config(1, 64), flat_terrain(), NullHost::default()).unwrap();
    let first = s.update_viewer(ChunkCoord::new(0, 0, 0)).expect("initial viewer");
    assert_eq!(first.dispatched.len(), 5);
    let second = s.update_viewer(ChunkCoord::new(10, 0, 0)).expect("moved");
    assert_eq!(second.dispatched.len(), 5);
    assert!(second.evicted.is_empty());
    assert_eq!(s.pending_count(), 10);

    let drained = s.drain_completions(64);
    assert_eq!(drained.stale.len(), 5);
    assert_eq!(drained.installed.len(), 5);
    assert_eq!(s.pending_count(), 0);
    assert_eq!(s.stats().stale, 5);
    for c in drained.installed {
        assert!(c.horizontal_distance_sq(ChunkCoord::new(10, 0, 0)) <= 1);
    }
}

#[test]
fn stale_results_count_toward_the_drain_limit() {
    let mut s = Streamer::new(inline_config(2, 64), flat_terrain(), NullHost::default()).unwrap();
    s.update_viewer(ChunkCoord::new(0, 0, 0)).expect("initial viewer");
    s.update_viewer(ChunkCoord::new(100, 0, 0)).expect("moved");
    assert_eq!(s.stats().queued, 26);

    let drained = s.drain_completions(2);
    assert_eq!(drained.stale.len() + drained.installed.len(), 2);
    assert_eq!(drained.stale.len(), 2);
    assert_eq!(s.stats().queued, 24);
    assert_eq!(s.pending_count(), 24);

    let mut rounds = 1;
    while s.stats().queued > 0 {
        let d = s.drain_completions(2);
        assert!(d.stale.len() + d.installed.len() <= 2);
        rounds += 1;
    }
    assert_eq!(rounds, 13);
    assert_eq!(s.stats().stale, 13);
    assert_eq!(s.active_chunk_count(), 13);
    assert_eq!(s.pending_count(), 0);
}

#[test]
fn install_rate_is_bounded_per_tick() {
    let mut s = Streamer::new(inline_config(2, 4), flat_terrain(), NullHost::default()).unwrap();
    let r1 = s.tick(center_of(0, 0));
    assert_eq!(r1.dispatched.len(), 13);
    assert_eq!(r1.installed.len(), 4);
    assert_eq!(s.stats().queued, 9);
    let r2 = s.tick(center_of(0, 0));
    assert!(r2.dispatched.is_empty());
    assert_eq!(r2.installed.len(), 4);
    s.tick(center_of(0, 0));
    let r4 = s.tick(center_of(0, 0));
    assert_eq!(r4.installed.len(), 1);
    assert_eq!(s.active_chunk_count(), 13);
}

#[test]
fn pending_coordinate_is_not_dispatched_twice() {
    let mut s = Streamer::new(inline_config(1, 64), flat_terrain(), NullHost::default()).unwrap();
    s.update_viewer(ChunkCoord::new(0, 0, 0));
    s.update_viewer(ChunkCoord::new(1, 0, 0)).expect("moved");
    // Back to the start before anything drained: all five are still in flight.
    let back = s.update_viewer(ChunkCoord::new(0, 0, 0)).expect("moved back");
    let overlap = back
        .dispatched
        .iter()
        .filter(|c| c.horizontal_distance_sq(ChunkCoord::new(0, 0, 0)) <= 1)
        .count();
    assert_eq!(overlap, 0);
    let drained = s.drain_completions(64);
    assert_eq!(s.active_chunk_count(), 5);
    assert_eq!(drained.installed.len() + drained.stale.len(), s.stats().dispatched as usize);
}

fn side_quads(s: &Streamer<NullHost>, coord: ChunkCoord) -> usize {
    let stats = s.chunk(coord).expect("active").mesh_stats();
    [Face::PosX, Face::NegX, Face::PosZ, Face::NegZ]
        .into_iter()
        .map(|f| stats.quads_per_face[f.index()])
        .sum()
}

#[test]
fn seams_stay_until_neighbors_are_rebuilt() {
    let origin = ChunkCoord::new(0, 0, 0);

    let mut plain =
        Streamer::new(inline_config(1, 64), flat_terrain(), NullHost::default()).unwrap();
    plain.tick(center_of(0, 0));
    // Center installed first with no neighbors: stone, dirt and grass bands on four sides.
    assert_eq!(side_quads(&plain, origin), 12);
    plain.rebuild_chunk(origin);
    assert_eq!(side_quads(&plain, origin), 0);

    let cfg = StreamConfig {
        rebuild_neighbors: true,
        ..inline_config(1, 64)
    };
    let mut eager = Streamer::new(cfg, flat_terrain(), NullHost::default()).unwrap();
    eager.tick(center_of(0, 0));
    assert_eq!(side_quads(&eager, origin), 0);
    assert!(eager.stats().neighbor_rebuilds >= 4);
}

#[test]
fn world_space_edits_rebuild_the_chunk() {
    let mut s = Streamer::new(inline_config(1, 64), flat_terrain(), NullHost::default()).unwrap();
    s.tick(center_of(0, 0));
    assert_eq!(s.block_world(3, 5, 3), BlockKind::Grass);
    assert_eq!(s.block_world(-1, 5, 0), BlockKind::Grass);
    assert_eq!(s.block_world(-1, 5, -1), BlockKind::Air);

    let before = s.chunk(ChunkCoord::new(0, 0, 0)).map(|c| c.mesh().quad_count());
    assert!(s.set_block_world(3, 6, 3, BlockKind::Wood));
    assert_eq!(s.block_world(3, 6, 3), BlockKind::Wood);
    assert!(!s.set_block_world(3, 6, 3, BlockKind::Wood));
    let chunk = s.chunk(ChunkCoord::new(0, 0, 0)).expect("active");
    assert!(!chunk.is_dirty());
    assert_ne!(Some(chunk.mesh().quad_count()), before);
    assert_eq!(s.stats().rebuilds, 1);

    assert!(!s.set_block_world(1000, 5, 0, BlockKind::Stone));
}

#[test]
fn direct_edits_need_an_explicit_rebuild() {
    let mut s = Streamer::new(inline_config(0, 64), flat_terrain(), NullHost::default()).unwrap();
    s.tick(center_of(0, 0));
    let coord = ChunkCoord::new(0, 0, 0);
    let chunk = s.chunk_mut(coord).expect("active");
    assert!(chunk.set_block(8, 10, 8, BlockKind::Snow));
    assert!(chunk.is_dirty());
    assert!(s.rebuild_chunk(coord));
    assert!(!s.chunk(coord).expect("active").is_dirty());
    assert!(!s.rebuild_chunk(ChunkCoord::new(9, 0, 9)));
}

#[test]
fn host_sees_entities_hidden_and_reused() {
    let mut s =
        Streamer::new(inline_config(0, 64), flat_terrain(), RecordingHost::default()).unwrap();
    s.tick(center_of(0, 0));
    s.tick(center_of(3, 0));
    let host = s.shutdown();
    assert_eq!(
        host.events,
        vec![
            HostEvent::Created(ChunkCoord::new(0, 0, 0)),
            HostEvent::Mesh(1),
            HostEvent::Active(1, true),
            HostEvent::Active(1, false),
            HostEvent::Mesh(1),
            HostEvent::Active(1, true),
            HostEvent::Destroyed(1),
        ]
    );
}

#[test]
fn background_workers_fill_the_disc() {
    let cfg = StreamConfig {
        workers: 2,
        ..inline_config(1, 64)
    };
    let mut s = Streamer::new(cfg, flat_terrain(), NullHost::default()).unwrap();
    let deadline = Instant::now() + Duration::from_secs(10);
    while s.active_chunk_count() < 5 && Instant::now() < deadline {
        s.tick(center_of(0, 0));
        std::thread::sleep(Duration::from_millis(2));
    }
    assert_eq!(s.active_chunk_count(), 5);
    assert_eq!(s.pending_count(), 0);
    let host = s.shutdown();
    assert_eq!(host.live, 0);
}

#[test]
fn invalid_chunk_size_is_rejected() {
    let cfg = StreamConfig {
        chunk_size: 8,
        ..inline_config(1, 1)
    };
    assert!(Streamer::new(cfg, flat_terrain(), NullHost::default()).is_err());
}
