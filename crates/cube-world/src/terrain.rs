use cube_blocks::BlockKind;

use crate::column::ColumnPlan;
use crate::noise::NoiseField;
use crate::worldgen::{Fractal, WorldGenConfig, WorldGenMode};
use crate::ChunkCoord;

const OFFSET_RANGE: std::ops::Range<i32> = -100_000..100_000;

/// World-space offsets derived from the seed so different seeds sample
/// unrelated regions of each noise field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedOffsets {
    pub height_x: i32,
    pub height_z: i32,
    pub cave: i32,
    pub entrance: i32,
    pub sinkhole: i32,
    pub tunnel: i32,
}

impl SeedOffsets {
    pub fn from_seed(seed: i32) -> Self {
        let mut rng = fastrand::Rng::with_seed(u64::from(seed as u32));
        Self {
            height_x: rng.i32(OFFSET_RANGE),
            height_z: rng.i32(OFFSET_RANGE),
            cave: rng.i32(OFFSET_RANGE),
            entrance: rng.i32(OFFSET_RANGE),
            sinkhole: rng.i32(OFFSET_RANGE),
            tunnel: rng.i32(OFFSET_RANGE),
        }
    }
}

/// Immutable terrain sampler. Built once from a [`WorldGenConfig`] and shared
/// between generation workers; every method is a pure function of its inputs.
pub struct TerrainGenerator {
    cfg: WorldGenConfig,
    offsets: SeedOffsets,
    height: NoiseField,
    caves: NoiseField,
    entrances: NoiseField,
    sinkholes: NoiseField,
    tunnels: NoiseField,
}

impl TerrainGenerator {
    pub fn new(cfg: &WorldGenConfig) -> Self {
        let offsets = SeedOffsets::from_seed(cfg.seed);
        let seed = cfg.seed;
        let field = |salt: i32, fractal: &Fractal, offset: i32| {
            NoiseField::new(seed, salt, fractal, offset, offset)
        };
        Self {
            height: NoiseField::new(
                seed,
                0,
                &cfg.height.fractal(),
                offsets.height_x,
                offsets.height_z,
            ),
            caves: field(0x0C4E, &cfg.caves.fractal(), offsets.cave),
            entrances: field(0x3E17, &cfg.entrances.fractal(), offsets.entrance),
            sinkholes: field(0x5A4C, &cfg.sinkholes.fractal(), offsets.sinkhole),
            tunnels: field(0x7B3D, &cfg.tunnels.fractal(), offsets.tunnel),
            cfg: cfg.clone(),
            offsets,
        }
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.cfg
    }

    pub fn offsets(&self) -> SeedOffsets {
        self.offsets
    }

    /// Terrain surface height of the world column `(wx, wz)`.
    pub fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        match self.cfg.mode {
            WorldGenMode::Flat => 5,
            WorldGenMode::Normal => {
                let h = &self.cfg.height;
                let n = self.height.sample2(wx, wz);
                let lo = h.min_height as f32;
                let hi = h.max_height as f32;
                (lo + (hi - lo) * n).round() as i32
            }
        }
    }

    pub fn plan_columns(&self, coord: ChunkCoord) -> ColumnPlan {
        let sinkholes_on = self.cfg.sinkholes.enable && self.cfg.mode == WorldGenMode::Normal;
        ColumnPlan::build(
            coord,
            |wx, wz| self.surface_height(wx, wz),
            |wx, wz| {
                if sinkholes_on {
                    self.sinkholes.sample2(wx, wz)
                } else {
                    0.0
                }
            },
        )
    }

    /// Block at local column `(lx, lz)` of `plan` and world height `wy`.
    pub fn block_at(&self, plan: &ColumnPlan, lx: usize, lz: usize, wy: i32) -> BlockKind {
        if self.cfg.mode == WorldGenMode::Flat {
            return flat_block(wy);
        }
        let surface = plan.height(lx as i32, lz as i32);
        if wy > surface {
            return BlockKind::Air;
        }
        let depth = surface - wy;
        let (wx, wz) = plan.world_column(lx, lz);
        if wy > self.cfg.caves.min_y && self.carved(plan, lx, lz, wx, wy, wz, depth) {
            return BlockKind::Air;
        }
        let s = &self.cfg.surface;
        if wy <= s.bedrock_y {
            s.bedrock
        } else if depth == 0 {
            s.top
        } else if depth < s.topsoil_depth {
            s.subsoil
        } else {
            s.deep
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn carved(
        &self,
        plan: &ColumnPlan,
        lx: usize,
        lz: usize,
        wx: i32,
        wy: i32,
        wz: i32,
        depth: i32,
    ) -> bool {
        let c = &self.cfg;
        if c.caves.enable
            && depth >= c.caves.min_depth
            && self.caves.sample3(wx, wy, wz) > c.caves.threshold
        {
            return true;
        }
        if c.entrances.enable
            && depth < c.entrances.max_depth
            && plan.slope(lx, lz) > c.entrances.min_slope
            && self.entrances.sample3(wx, wy, wz) > c.entrances.threshold
        {
            return true;
        }
        if c.sinkholes.enable
            && depth < c.sinkholes.max_depth
            && plan.sinkhole(lx, lz) > c.sinkholes.threshold
        {
            return true;
        }
        c.tunnels.enable
            && wy.rem_euclid(c.tunnels.band_period) < c.tunnels.band_thickness
            && self.tunnels.sample3(wx, wy, wz) > c.tunnels.threshold
    }
}

fn flat_block(wy: i32) -> BlockKind {
    if wy < 0 {
        BlockKind::Air
    } else if wy < 2 {
        BlockKind::Stone
    } else if wy < 5 {
        BlockKind::Dirt
    } else if wy == 5 {
        BlockKind::Grass
    } else {
        BlockKind::Air
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CHUNK_SIZE;

    fn quiet_config() -> WorldGenConfig {
        let mut cfg = WorldGenConfig::default();
        cfg.caves.enable = false;
        cfg.entrances.enable = false;
        cfg.sinkholes.enable = false;
        cfg.tunnels.enable = false;
        cfg
    }

    #[test]
    fn offsets_follow_the_seed() {
        let a = SeedOffsets::from_seed(42);
        assert_eq!(a, SeedOffsets::from_seed(42));
        assert_ne!(a, SeedOffsets::from_seed(43));
        for v in [a.height_x, a.height_z, a.cave, a.tunnel] {
            assert!(OFFSET_RANGE.contains(&v));
        }
    }

    #[test]
    fn heights_stay_within_configured_range() {
        let tg = TerrainGenerator::new(&WorldGenConfig::default());
        for i in -50..50 {
            let h = tg.surface_height(i * 37, i * -91);
            assert!((5..=100).contains(&h), "height {h}");
        }
    }

    #[test]
    fn uncarved_column_is_layered_by_depth() {
        let tg = TerrainGenerator::new(&quiet_config());
        let plan = tg.plan_columns(ChunkCoord::new(0, 0, 0));
        let h = plan.height(3, 4);
        assert_eq!(tg.block_at(&plan, 3, 4, h + 1), BlockKind::Air);
        assert_eq!(tg.block_at(&plan, 3, 4, h), BlockKind::Grass);
        assert_eq!(tg.block_at(&plan, 3, 4, h - 1), BlockKind::Dirt);
        assert_eq!(tg.block_at(&plan, 3, 4, h - 3), BlockKind::Dirt);
        assert_eq!(tg.block_at(&plan, 3, 4, h - 4), BlockKind::Stone);
        assert_eq!(tg.block_at(&plan, 3, 4, 1), BlockKind::Stone);
        assert_eq!(tg.block_at(&plan, 3, 4, 0), BlockKind::Stone);
    }

    #[test]
    fn nothing_carves_at_or_below_cave_floor() {
        let mut cfg = WorldGenConfig::default();
        cfg.height.min_height = 20;
        cfg.caves.threshold = -1.0;
        cfg.tunnels.threshold = -1.0;
        let tg = TerrainGenerator::new(&cfg);
        let plan = tg.plan_columns(ChunkCoord::new(2, 0, -1));
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                for wy in 0..=cfg.caves.min_y {
                    assert!(tg.block_at(&plan, x, z, wy).is_solid());
                }
                assert!(tg.block_at(&plan, x, z, cfg.caves.min_y + 1).is_air());
            }
        }
    }

    /// Checks every block of one chunk footprint up to its surface: air exactly
    /// where `carves(depth, slope, wy)` holds above the cave floor.
    fn assert_carving(cfg: &WorldGenConfig, carves: impl Fn(i32, i32, i32) -> bool) -> usize {
        let tg = TerrainGenerator::new(cfg);
        let plan = tg.plan_columns(ChunkCoord::new(1, 0, -2));
        let mut carved = 0;
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let surface = plan.height(x as i32, z as i32);
                let slope = plan.slope(x, z);
                for wy in 0..=surface {
                    let expected = wy > cfg.caves.min_y && carves(surface - wy, slope, wy);
                    let air = tg.block_at(&plan, x, z, wy).is_air();
                    assert_eq!(air, expected, "column ({x}, {z}) y={wy} surface={surface}");
                    carved += usize::from(air);
                }
            }
        }
        carved
    }

    #[test]
    fn entrances_open_only_on_steep_shallow_ground() {
        let mut cfg = quiet_config();
        cfg.height.min_height = 20;
        cfg.entrances.enable = true;
        cfg.entrances.threshold = -1.0;
        let (max_depth, min_slope) = (cfg.entrances.max_depth, cfg.entrances.min_slope);
        assert_carving(&cfg, |depth, slope, _| depth < max_depth && slope > min_slope);

        // Every column counts as steep: the top `max_depth` layers go.
        cfg.entrances.min_slope = -1;
        let carved = assert_carving(&cfg, |depth, _, _| depth < max_depth);
        assert_eq!(carved, CHUNK_SIZE * CHUNK_SIZE * max_depth as usize);

        cfg.entrances.min_slope = i32::MAX;
        assert_eq!(assert_carving(&cfg, |_, _, _| false), 0);

        cfg.entrances.min_slope = -1;
        cfg.entrances.threshold = 2.0;
        assert_eq!(assert_carving(&cfg, |_, _, _| false), 0);
    }

    #[test]
    fn sinkholes_stay_within_their_depth_band() {
        let mut cfg = quiet_config();
        cfg.height.min_height = 20;
        cfg.sinkholes.enable = true;
        cfg.sinkholes.threshold = -1.0;
        cfg.sinkholes.max_depth = 5;
        let carved = assert_carving(&cfg, |depth, _, _| depth < 5);
        assert_eq!(carved, CHUNK_SIZE * CHUNK_SIZE * 5);

        cfg.sinkholes.threshold = 2.0;
        assert_eq!(assert_carving(&cfg, |_, _, _| false), 0);
    }

    #[test]
    fn tunnels_follow_the_y_bands() {
        let mut cfg = quiet_config();
        cfg.height.min_height = 40;
        cfg.tunnels.enable = true;
        cfg.tunnels.threshold = -1.0;
        cfg.tunnels.band_period = 10;
        cfg.tunnels.band_thickness = 2;
        assert_carving(&cfg, |_, _, wy| wy.rem_euclid(10) < 2);
        let tg = TerrainGenerator::new(&cfg);
        let plan = tg.plan_columns(ChunkCoord::new(1, 0, -2));
        for wy in [10, 11, 20, 21, 30, 31] {
            assert!(tg.block_at(&plan, 0, 0, wy).is_air(), "band at {wy}");
        }
        for wy in [9, 12, 19, 22, 29, 32] {
            assert!(tg.block_at(&plan, 0, 0, wy).is_solid(), "gap at {wy}");
        }

        cfg.tunnels.threshold = 2.0;
        assert_eq!(assert_carving(&cfg, |_, _, _| false), 0);
    }

    #[test]
    fn flat_mode_layers() {
        let mut cfg = WorldGenConfig::default();
        cfg.mode = WorldGenMode::Flat;
        let tg = TerrainGenerator::new(&cfg);
        let plan = tg.plan_columns(ChunkCoord::new(-3, 0, 7));
        let column: Vec<_> = (0..7).map(|y| tg.block_at(&plan, 0, 0, y)).collect();
        assert_eq!(
            column,
            vec![
                BlockKind::Stone,
                BlockKind::Stone,
                BlockKind::Dirt,
                BlockKind::Dirt,
                BlockKind::Dirt,
                BlockKind::Grass,
                BlockKind::Air,
            ]
        );
    }
}
