use std::fmt;

use rand::Rng;

use crate::engine::Move;
use crate::event::TileEvent;
use crate::values::ValueGenerator;

/// Zero-based cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("shape mismatch: grid is {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    ShapeMismatch { expected_rows: usize, expected_cols: usize, rows: usize, cols: usize },
    #[error("invalid tile value {value} at {at}: must be 0 or a power of two")]
    InvalidValue { at: Coord, value: u32 },
}

/// Rows×cols value matrix plus the per-cell merge flags of the move in progress.
///
/// Values are stored row-major; 0 marks an empty cell and every other value
/// is a power of two. Dimensions are fixed at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<u32>,
    merged: Vec<bool>,
}

impl Grid {
    /// An all-empty grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid { rows, cols, values: vec![0; rows * cols], merged: vec![false; rows * cols] }
    }

    /// Build a grid shaped like `matrix`, which must be rectangular.
    ///
    /// ```
    /// use grid_2048::grid::{Coord, Grid};
    /// let g = Grid::from_matrix(&[[0, 2], [4, 0]]).unwrap();
    /// assert_eq!(g.get(Coord::new(1, 0)), 4);
    /// assert_eq!(g.highest_value(), 4);
    /// ```
    pub fn from_matrix<M: AsRef<[u32]>>(matrix: &[M]) -> Result<Self, GridError> {
        let cols = matrix.first().map_or(0, |r| r.as_ref().len());
        let mut grid = Grid::new(matrix.len(), cols);
        grid.load_matrix(matrix)?;
        Ok(grid)
    }

    #[inline]
    pub fn rows(&self) -> usize { self.rows }

    #[inline]
    pub fn cols(&self) -> usize { self.cols }

    /// Number of cells.
    #[inline]
    pub fn size(&self) -> usize { self.rows * self.cols }

    #[inline]
    fn index(&self, at: Coord) -> usize {
        assert!(at.row < self.rows && at.col < self.cols, "cell {at} outside {}x{} grid", self.rows, self.cols);
        at.row * self.cols + at.col
    }

    /// Value at `at` (0 if empty). Panics when `at` is out of bounds.
    #[inline]
    pub fn get(&self, at: Coord) -> u32 {
        self.values[self.index(at)]
    }

    #[inline]
    pub(crate) fn set(&mut self, at: Coord, value: u32) {
        let idx = self.index(at);
        self.values[idx] = value;
    }

    /// Whether `at` already received a merge during the current move.
    #[inline]
    pub fn is_merged(&self, at: Coord) -> bool {
        self.merged[self.index(at)]
    }

    #[inline]
    pub(crate) fn mark_merged(&mut self, at: Coord) {
        let idx = self.index(at);
        self.merged[idx] = true;
    }

    /// Clear every merge flag so the grid is ready for the next move.
    pub fn reset_merge_flags(&mut self) {
        self.merged.iter_mut().for_each(|m| *m = false);
    }

    /// The in-bounds cell one step from `at` in `dir`, if any.
    #[inline]
    pub fn neighbor(&self, at: Coord, dir: Move) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        let row = at.row.checked_add_signed(dr)?;
        let col = at.col.checked_add_signed(dc)?;
        (row < self.rows && col < self.cols).then_some(Coord { row, col })
    }

    /// Every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Coord { row, col }))
    }

    /// Empty coordinates in row-major order. Each call starts a fresh pass.
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(move |&c| self.get(c) == 0)
    }

    #[inline]
    pub fn count_empty(&self) -> usize {
        self.values.iter().filter(|&&v| v == 0).count()
    }

    /// Highest tile on the grid; 0 when empty.
    #[inline]
    pub fn highest_value(&self) -> u32 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns the placement event, or `None` when the grid is full.
    ///
    /// ```
    /// use grid_2048::grid::Grid;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut g = Grid::new(4, 4);
    /// let ev = g.spawn_random_value(&mut rng).unwrap();
    /// assert_eq!(g.get(ev.to), ev.value);
    /// assert_eq!(g.count_empty(), 15);
    /// ```
    pub fn spawn_random_value<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TileEvent> {
        let empty = self.count_empty();
        if empty == 0 {
            return None;
        }
        let pick = rng.gen_range(0..empty);
        let at = self.empty_cells().nth(pick)?;
        let value = ValueGenerator::generate(rng);
        self.set(at, value);
        Some(TileEvent::spawned(at, value))
    }

    /// Replace all values with `matrix`. Merge flags are left as they are.
    ///
    /// The matrix must match the grid's dimensions and hold only zeros and
    /// powers of two; otherwise the grid is left unchanged.
    pub fn load_matrix<M: AsRef<[u32]>>(&mut self, matrix: &[M]) -> Result<(), GridError> {
        let mismatch = |cols: usize| GridError::ShapeMismatch {
            expected_rows: self.rows,
            expected_cols: self.cols,
            rows: matrix.len(),
            cols,
        };
        if matrix.len() != self.rows {
            return Err(mismatch(matrix.first().map_or(0, |r| r.as_ref().len())));
        }
        for row in matrix {
            let row = row.as_ref();
            if row.len() != self.cols {
                return Err(mismatch(row.len()));
            }
        }
        for (r, row) in matrix.iter().enumerate() {
            for (c, &value) in row.as_ref().iter().enumerate() {
                if value != 0 && !value.is_power_of_two() {
                    return Err(GridError::InvalidValue { at: Coord::new(r, c), value });
                }
            }
        }
        self.values.clear();
        self.values.extend(matrix.iter().flat_map(|row| row.as_ref().iter().copied()));
        Ok(())
    }

    /// Snapshot of the values as nested rows.
    pub fn to_matrix(&self) -> Vec<Vec<u32>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.values.chunks(self.cols).map(<[u32]>::to_vec).collect()
    }

    /// Merge flags as nested rows.
    pub fn merge_flags(&self) -> Vec<Vec<bool>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.merged.chunks(self.cols).map(<[bool]>::to_vec).collect()
    }

    /// Return true if no tile can move or merge in any direction.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        crate::engine::is_terminal(self)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("values", &self.to_matrix())
            .finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.cols * 8);
        for r in 0..self.rows {
            if r > 0 {
                writeln!(f, "{rule}")?;
            }
            let line: Vec<String> = (0..self.cols).map(|c| format_val(self.get(Coord::new(r, c)))).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: u32) -> String {
    match val {
        0 => String::from("       "),
        x => {
            let mut x = x.to_string();
            while x.len() < 7 {
                match x.len() {
                    6 => x = format!(" {}", x),
                    _ => x = format!(" {} ", x),
                }
            }
            x
        }
    }
}
