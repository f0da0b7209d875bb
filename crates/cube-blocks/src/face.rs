/// Cube faces, numbered `axis * 2 + back` so the index doubles as a
/// palette/atlas key: 0=+X, 1=-X, 2=+Y, 3=-Y, 4=+Z, 5=-Z.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `Face` value.
    /// Falls back to `PosY` for out-of-range indices.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        match i {
            0 => Face::PosX,
            1 => Face::NegX,
            2 => Face::PosY,
            3 => Face::NegY,
            4 => Face::PosZ,
            5 => Face::NegZ,
            _ => Face::PosY,
        }
    }

    /// Face on the sweep `axis` (0=X, 1=Y, 2=Z); `back` selects the negative side.
    #[inline]
    pub fn from_axis(axis: usize, back: bool) -> Face {
        debug_assert!(axis < 3);
        Face::from_index(axis * 2 + usize::from(back))
    }

    #[inline]
    pub fn axis(self) -> usize {
        self.index() / 2
    }

    #[inline]
    pub fn is_back(self) -> bool {
        self.index() % 2 == 1
    }

    /// Returns the unit normal for this face.
    #[inline]
    pub fn normal(self) -> [f32; 3] {
        let (dx, dy, dz) = self.delta();
        [dx as f32, dy as f32, dz as f32]
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn is_top(self) -> bool {
        matches!(self, Face::PosY)
    }

    #[inline]
    pub fn is_bottom(self) -> bool {
        matches!(self, Face::NegY)
    }
}
