//! Local fields with a one cell halo
use crate::types::{RealScalar, Side};
use itertools::Itertools;

/// A local block of temperatures surrounded by a one cell halo.
///
/// The data is stored row-major with shape `(nx + 2, ny + 2)`. Rows and columns `1..=nx` and
/// `1..=ny` are owned interior cells; row/column `0` and `nx + 1`/`ny + 1` are halo.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T: RealScalar> {
    data: Vec<T>,
    nx: usize,
    ny: usize,
}

impl<T: RealScalar> Field<T> {
    /// Create a field with every cell (halo included) set to `value`
    pub fn new(nx: usize, ny: usize, value: T) -> Self {
        Self {
            data: vec![value; (nx + 2) * (ny + 2)],
            nx,
            ny,
        }
    }

    /// Number of interior rows
    pub fn nx(&self) -> usize {
        self.nx
    }
    /// Number of interior columns
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Row stride
    pub fn stride(&self) -> usize {
        self.ny + 2
    }

    /// Raw data including the halo
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Value at `(i, j)`, counting the halo as index 0
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.stride() + j]
    }

    /// Set the value at `(i, j)`, counting the halo as index 0
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let stride = self.stride();
        self.data[i * stride + j] = value;
    }

    /// Set every interior cell from a function of its interior index (starting at 0)
    pub fn fill_interior(&mut self, f: impl Fn(usize, usize) -> T) {
        for i in 0..self.nx {
            for j in 0..self.ny {
                self.set(i + 1, j + 1, f(i, j));
            }
        }
    }

    /// Interior cells in row-major order
    pub fn interior(&self) -> Vec<T> {
        let stride = self.stride();
        (1..=self.nx)
            .flat_map(|i| self.data[i * stride + 1..i * stride + 1 + self.ny].iter().copied())
            .collect_vec()
    }

    /// Length of the edge next to `side`, not counting corners
    pub fn edge_len(&self, side: Side) -> usize {
        match side {
            Side::North | Side::South => self.ny,
            Side::West | Side::East => self.nx,
        }
    }

    // Row or column holding the last owned cells before the halo on `side`.
    fn edge_line(&self, side: Side) -> usize {
        match side {
            Side::North | Side::West => 1,
            Side::South => self.nx,
            Side::East => self.ny,
        }
    }

    // Row or column of the halo on `side`.
    fn halo_line(&self, side: Side) -> usize {
        match side {
            Side::North | Side::West => 0,
            Side::South => self.nx + 1,
            Side::East => self.ny + 1,
        }
    }

    /// Copy the owned cells adjacent to `side` into `buffer`
    pub fn copy_edge(&self, side: Side, buffer: &mut [T]) {
        debug_assert_eq!(buffer.len(), self.edge_len(side));
        let line = self.edge_line(side);
        match side {
            Side::North | Side::South => {
                let start = line * self.stride() + 1;
                buffer.copy_from_slice(&self.data[start..start + self.ny]);
            }
            Side::West | Side::East => {
                for (i, value) in buffer.iter_mut().enumerate() {
                    *value = self.get(i + 1, line);
                }
            }
        }
    }

    /// Write `values` into the halo on `side`, leaving the corners untouched
    pub fn write_halo(&mut self, side: Side, values: &[T]) {
        debug_assert_eq!(values.len(), self.edge_len(side));
        let line = self.halo_line(side);
        match side {
            Side::North | Side::South => {
                let start = line * self.stride() + 1;
                self.data[start..start + self.ny].copy_from_slice(values);
            }
            Side::West | Side::East => {
                for (i, value) in values.iter().enumerate() {
                    self.set(i + 1, line, *value);
                }
            }
        }
    }

    /// Set the whole halo row or column on `side`, corners included, to `value`
    pub fn fill_halo(&mut self, side: Side, value: T) {
        let line = self.halo_line(side);
        match side {
            Side::North | Side::South => {
                let stride = self.stride();
                self.data[line * stride..(line + 1) * stride].fill(value);
            }
            Side::West | Side::East => {
                for i in 0..self.nx + 2 {
                    self.set(i, line, value);
                }
            }
        }
    }

    /// The halo on `side`, not counting corners
    pub fn halo(&self, side: Side) -> Vec<T> {
        let line = self.halo_line(side);
        match side {
            Side::North | Side::South => (1..=self.ny).map(|j| self.get(line, j)).collect_vec(),
            Side::West | Side::East => (1..=self.nx).map(|i| self.get(i, line)).collect_vec(),
        }
    }
}

/// Two fields whose roles alternate every step.
///
/// Swapping toggles which field is current. No data moves and neither field ever leaves the pair.
#[derive(Debug, Clone)]
pub struct FieldPair<T: RealScalar> {
    fields: [Field<T>; 2],
    current: usize,
}

impl<T: RealScalar> FieldPair<T> {
    /// Create a pair from two fields of the same shape. The first one is current
    pub fn new(current: Field<T>, next: Field<T>) -> Self {
        debug_assert_eq!((current.nx, current.ny), (next.nx, next.ny));
        Self {
            fields: [current, next],
            current: 0,
        }
    }

    /// The field holding the latest state
    pub fn current(&self) -> &Field<T> {
        &self.fields[self.current]
    }
    /// The field holding the latest state
    pub fn current_mut(&mut self) -> &mut Field<T> {
        &mut self.fields[self.current]
    }
    /// The secondary buffer (after a swap: the previous state)
    pub fn next(&self) -> &Field<T> {
        &self.fields[1 - self.current]
    }

    /// Both fields mutably, current first
    pub fn both_mut(&mut self) -> [&mut Field<T>; 2] {
        let [a, b] = &mut self.fields;
        if self.current == 0 {
            [a, b]
        } else {
            [b, a]
        }
    }

    /// The current field to read from and the secondary field to write into
    pub fn split(&mut self) -> (&Field<T>, &mut Field<T>) {
        let [current, next] = self.both_mut();
        (&*current, next)
    }

    /// Exchange the roles of the two fields
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn numbered(nx: usize, ny: usize) -> Field<f64> {
        let mut f = Field::new(nx, ny, -1.0);
        f.fill_interior(|i, j| (10 * i + j) as f64);
        f
    }

    #[test]
    fn test_interior_excludes_halo() {
        let f = numbered(2, 3);
        assert_eq!(f.interior(), vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(f.get(0, 0), -1.0);
        assert_eq!(f.get(3, 4), -1.0);
        assert_eq!(f.data().len(), 4 * 5);
    }

    #[test]
    fn test_copy_edges() {
        let f = numbered(3, 2);
        let mut row = vec![0.0; 2];
        let mut col = vec![0.0; 3];
        f.copy_edge(Side::North, &mut row);
        assert_eq!(row, vec![0.0, 1.0]);
        f.copy_edge(Side::South, &mut row);
        assert_eq!(row, vec![20.0, 21.0]);
        f.copy_edge(Side::West, &mut col);
        assert_eq!(col, vec![0.0, 10.0, 20.0]);
        f.copy_edge(Side::East, &mut col);
        assert_eq!(col, vec![1.0, 11.0, 21.0]);
    }

    #[test]
    fn test_write_halo_leaves_corners() {
        let mut f = numbered(3, 2);
        f.write_halo(Side::South, &[5.0, 6.0]);
        f.write_halo(Side::East, &[7.0, 8.0, 9.0]);
        assert_eq!(f.halo(Side::South), vec![5.0, 6.0]);
        assert_eq!(f.halo(Side::East), vec![7.0, 8.0, 9.0]);
        assert_eq!(f.get(4, 3), -1.0);
        assert_eq!(f.get(4, 1), 5.0);
        assert_eq!(f.get(1, 3), 7.0);
    }

    #[test]
    fn test_fill_halo_includes_corners() {
        let mut f = numbered(2, 2);
        f.fill_halo(Side::West, 3.0);
        for i in 0..4 {
            assert_eq!(f.get(i, 0), 3.0);
        }
        f.fill_halo(Side::North, 4.0);
        for j in 0..4 {
            assert_eq!(f.get(0, j), 4.0);
        }
        assert_eq!(f.interior(), vec![0.0, 1.0, 10.0, 11.0]);
    }

    #[test]
    fn test_swap_moves_no_data() {
        let mut pair = FieldPair::new(numbered(2, 2), Field::new(2, 2, 0.0));
        let current = pair.current().data().as_ptr();
        pair.split().1.set(1, 1, 42.0);
        pair.swap();
        assert_eq!(pair.current().get(1, 1), 42.0);
        assert_eq!(pair.next().data().as_ptr(), current);
        pair.swap();
        assert_eq!(pair.current().data().as_ptr(), current);
        assert_eq!(pair.current().get(2, 2), 11.0);
    }
}
