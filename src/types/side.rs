//! Sides of a rectangular block

/// Grid axis
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Axis {
    /// Rows, indexed by `i`
    I,
    /// Columns, indexed by `j`
    J,
}

impl Axis {
    /// Position of the axis in `[i, j]` pairs
    pub fn index(&self) -> usize {
        match self {
            Axis::I => 0,
            Axis::J => 1,
        }
    }
}

/// One of the four sides of a block.
///
/// North is the side of row 0 (the top edge of the global domain), south the side of the last
/// row, west the side of column 0 and east the side of the last column.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Side {
    /// Towards smaller `i`
    North,
    /// Towards larger `i`
    South,
    /// Towards smaller `j`
    West,
    /// Towards larger `j`
    East,
}

impl Side {
    /// All four sides
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::West, Side::East];

    /// The axis this side is perpendicular to
    pub fn axis(&self) -> Axis {
        match self {
            Side::North | Side::South => Axis::I,
            Side::West | Side::East => Axis::J,
        }
    }

    /// The side facing this one
    pub fn opposite(&self) -> Side {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
            Side::West => Side::East,
            Side::East => Side::West,
        }
    }

    /// Step from a coordinate towards this side: -1 or +1
    pub fn direction(&self) -> isize {
        match self {
            Side::North | Side::West => -1,
            Side::South | Side::East => 1,
        }
    }
}
