use serde::{Deserialize, Serialize};

/// Closed set of voxel kinds. The discriminant is the stable numeric id
/// stored in grids and used as the greedy-mesh mask value.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    Sand = 4,
    Snow = 5,
    Water = 6,
    Wood = 7,
    Leaves = 8,
}

impl BlockKind {
    pub const COUNT: usize = 9;

    pub const ALL: [BlockKind; Self::COUNT] = [
        BlockKind::Air,
        BlockKind::Grass,
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Sand,
        BlockKind::Snow,
        BlockKind::Water,
        BlockKind::Wood,
        BlockKind::Leaves,
    ];

    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_id(id: u8) -> Option<BlockKind> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Air => "air",
            BlockKind::Grass => "grass",
            BlockKind::Dirt => "dirt",
            BlockKind::Stone => "stone",
            BlockKind::Sand => "sand",
            BlockKind::Snow => "snow",
            BlockKind::Water => "water",
            BlockKind::Wood => "wood",
            BlockKind::Leaves => "leaves",
        }
    }

    pub fn from_name(name: &str) -> Option<BlockKind> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Everything except air occupies its cell.
    #[inline]
    pub const fn is_solid(self) -> bool {
        !matches!(self, BlockKind::Air)
    }

    /// Solidity as seen by face culling: water neither emits nor hides faces.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        !matches!(self, BlockKind::Air | BlockKind::Water)
    }

    #[inline]
    pub const fn is_air(self) -> bool {
        matches!(self, BlockKind::Air)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
