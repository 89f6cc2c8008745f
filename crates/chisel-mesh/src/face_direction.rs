//! The six face directions of a micro-voxel and the fixed per-direction tables
//! used by the mesher and the quad emitter.

/// One of the six directions a voxel face can point.
///
/// The discriminant is the box-side index used by [`crate::BoxFaces`]:
/// Up, North, South, West, East, Down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    /// +Y.
    Up = 0,
    /// −Z.
    North = 1,
    /// +Z.
    South = 2,
    /// −X.
    West = 3,
    /// +X.
    East = 4,
    /// −Y.
    Down = 5,
}

/// The three axis groups swept by the mesher, in sweep order, each with its
/// two directions in sweep order.
pub const AXIS_PASSES: [[Direction; 2]; 3] = [
    [Direction::East, Direction::West],
    [Direction::Up, Direction::Down],
    [Direction::South, Direction::North],
];

impl Direction {
    /// All six directions in box-side order.
    pub const ALL: [Direction; 6] = [
        Self::Up,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
        Self::Down,
    ];

    /// Returns the sweep axes `(layer_axis, row_axis, col_axis)`, each 0=X, 1=Y, 2=Z.
    ///
    /// `layer_axis` is the face normal; rows are extended first, then columns.
    pub fn sweep_axes(self) -> (usize, usize, usize) {
        match self {
            Self::East | Self::West => (0, 1, 2), // layer=X, rows=Y, cols=Z
            Self::Up | Self::Down => (1, 0, 2),   // layer=Y, rows=X, cols=Z
            Self::South | Self::North => (2, 0, 1), // layer=Z, rows=X, cols=Y
        }
    }

    /// Axis (0=X, 1=Y, 2=Z) and sign of the face normal.
    pub fn normal_axis(self) -> (usize, i32) {
        match self {
            Self::East => (0, 1),
            Self::West => (0, -1),
            Self::Up => (1, 1),
            Self::Down => (1, -1),
            Self::South => (2, 1),
            Self::North => (2, -1),
        }
    }

    /// Unit normal.
    pub fn normal(self) -> [f64; 3] {
        let (axis, sign) = self.normal_axis();
        let mut n = [0.0; 3];
        n[axis] = f64::from(sign);
        n
    }

    /// The cell one step in this direction, or `None` when it lies outside a
    /// `size`³ volume.
    pub fn step(self, x: usize, y: usize, z: usize, size: usize) -> Option<(usize, usize, usize)> {
        let (axis, sign) = self.normal_axis();
        let mut coords = [x, y, z];
        let c = coords[axis];
        coords[axis] = if sign > 0 {
            if c + 1 >= size {
                return None;
            }
            c + 1
        } else {
            c.checked_sub(1)?
        };
        Some((coords[0], coords[1], coords[2]))
    }

    /// Returns the opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Box-side index (0–5).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Draw-side flags with only this direction set.
    pub fn draw_sides(self) -> [bool; 6] {
        DRAW_SIDES[self.index()]
    }
}

/// Draw-side flags per direction, in box-side order.
pub const DRAW_SIDES: [[bool; 6]; 6] = [
    [true, false, false, false, false, false],
    [false, true, false, false, false, false],
    [false, false, true, false, false, false],
    [false, false, false, true, false, false],
    [false, false, false, false, true, false],
    [false, false, false, false, false, true],
];
