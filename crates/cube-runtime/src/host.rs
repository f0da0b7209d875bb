use cube_mesh_cpu::ChunkMesh;
use cube_world::ChunkCoord;

/// Scene-side capabilities the streamer drives. Entities are opaque handles
/// owned by the host; a pooled chunk keeps its entity while deactivated.
pub trait RenderHost {
    type Entity;

    fn create_entity(&mut self, coord: ChunkCoord) -> Self::Entity;
    fn set_mesh(&mut self, entity: &Self::Entity, mesh: &ChunkMesh, material: &str);
    fn set_position(&mut self, entity: &Self::Entity, origin: [f32; 3]);
    fn set_active(&mut self, entity: &Self::Entity, active: bool);
    fn destroy_entity(&mut self, entity: Self::Entity);
}

/// Headless host that hands out sequential ids and keeps simple totals.
#[derive(Debug, Default)]
pub struct NullHost {
    next_id: u32,
    pub live: usize,
    pub uploads: usize,
    pub uploaded_vertices: usize,
}

impl RenderHost for NullHost {
    type Entity = u32;

    fn create_entity(&mut self, _coord: ChunkCoord) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.live += 1;
        id
    }

    fn set_mesh(&mut self, _entity: &u32, mesh: &ChunkMesh, _material: &str) {
        self.uploads += 1;
        self.uploaded_vertices += mesh.vertex_count();
    }

    fn set_position(&mut self, _entity: &u32, _origin: [f32; 3]) {}

    fn set_active(&mut self, _entity: &u32, _active: bool) {}

    fn destroy_entity(&mut self, _entity: u32) {
        self.live = self.live.saturating_sub(1);
    }
}
