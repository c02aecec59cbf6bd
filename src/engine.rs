use log::trace;

use crate::event::TileEvent;
use crate::grid::{Coord, Grid};

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Unit step as (Δrow, Δcol).
    #[inline]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    /// Parse a key name: browser key codes (`ArrowUp`), words (`up`),
    /// WASD and vi keys. Anything else is `None`.
    ///
    /// ```
    /// use grid_2048::engine::Move;
    /// assert_eq!(Move::from_key("ArrowLeft"), Some(Move::Left));
    /// assert_eq!(Move::from_key("k"), Some(Move::Up));
    /// assert_eq!(Move::from_key("Enter"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<Move> {
        match key.trim().to_ascii_lowercase().as_str() {
            "arrowup" | "up" | "w" | "k" => Some(Move::Up),
            "arrowdown" | "down" | "s" | "j" => Some(Move::Down),
            "arrowleft" | "left" | "a" | "h" => Some(Move::Left),
            "arrowright" | "right" | "d" | "l" => Some(Move::Right),
            _ => None,
        }
    }
}

/// Where a tile can go when it slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The farthest empty cell before the boundary or an obstruction.
    Empty(Coord),
    /// An equal tile that can still absorb a merge this move.
    Merge(Coord),
}

impl Destination {
    #[inline]
    pub fn coord(self) -> Coord {
        match self {
            Destination::Empty(c) | Destination::Merge(c) => c,
        }
    }
}

/// Find where the tile at `from` would land when sliding in `dir`.
///
/// Returns `None` for an empty origin, or when the tile is already against
/// the boundary or an obstruction it cannot merge with. A tile that already
/// received a merge this move blocks further merges.
///
/// ```
/// use grid_2048::engine::{find_next_possible_cell, Destination, Move};
/// use grid_2048::grid::{Coord, Grid};
/// let g = Grid::from_matrix(&[[0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0]]).unwrap();
/// let dest = find_next_possible_cell(&g, Coord::new(2, 0), Move::Up);
/// assert_eq!(dest, Some(Destination::Empty(Coord::new(0, 0))));
/// ```
pub fn find_next_possible_cell(grid: &Grid, from: Coord, dir: Move) -> Option<Destination> {
    scan(grid, from, dir, true)
}

fn scan(grid: &Grid, from: Coord, dir: Move, honor_merge_flags: bool) -> Option<Destination> {
    let value = grid.get(from);
    if value == 0 {
        return None;
    }
    let mut last_empty = None;
    let mut cur = from;
    while let Some(next) = grid.neighbor(cur, dir) {
        let other = grid.get(next);
        if other == 0 {
            last_empty = Some(next);
            cur = next;
            continue;
        }
        let mergeable = other == value
            && value.checked_mul(2).is_some()
            && !(honor_merge_flags && grid.is_merged(next));
        if mergeable {
            return Some(Destination::Merge(next));
        }
        break;
    }
    last_empty.map(Destination::Empty)
}

/// Order in which one axis is visited: the edge tiles slide toward goes first.
fn axis_order(len: usize, step: isize) -> Vec<usize> {
    if step > 0 { (0..len).rev().collect() } else { (0..len).collect() }
}

/// Slide and merge every tile toward `dir`, mutating `grid` in place.
///
/// Merge flags are read and set but never cleared here; callers reset them
/// between moves. Returns one event per tile that moved or merged, in
/// processing order.
///
/// ```
/// use grid_2048::engine::{collapse, Move};
/// use grid_2048::grid::Grid;
/// let mut g = Grid::from_matrix(&[[2, 2, 2, 2]]).unwrap();
/// let events = collapse(&mut g, Move::Right);
/// assert_eq!(g.to_matrix(), vec![vec![0, 0, 4, 4]]);
/// assert_eq!(events.iter().filter(|e| e.was_merge()).count(), 2);
/// ```
pub fn collapse(grid: &mut Grid, dir: Move) -> Vec<TileEvent> {
    let (dr, dc) = dir.delta();
    let rows = axis_order(grid.rows(), dr);
    let cols = axis_order(grid.cols(), dc);
    let mut events = Vec::new();
    for &row in &rows {
        for &col in &cols {
            let from = Coord::new(row, col);
            let value = grid.get(from);
            if value == 0 {
                continue;
            }
            let event = match find_next_possible_cell(grid, from, dir) {
                None => continue,
                Some(Destination::Empty(to)) => {
                    grid.set(to, value);
                    TileEvent::moved(from, to, value)
                }
                Some(Destination::Merge(to)) => {
                    let doubled = value * 2;
                    grid.set(to, doubled);
                    grid.mark_merged(to);
                    TileEvent::merged(from, to, doubled)
                }
            };
            grid.set(from, 0);
            trace!("{:?} {} -> {} value {}", event.kind, event.from, event.to, event.value);
            events.push(event);
        }
    }
    events
}

/// Return true if no tile can slide or merge in any direction.
///
/// Merge flags are ignored and the grid is not modified. An empty cell with
/// any neighbor keeps the grid open, so only full grids (or a lone empty
/// 1x1 cell) can be terminal.
pub fn is_terminal(grid: &Grid) -> bool {
    let open = grid
        .empty_cells()
        .any(|at| Move::ALL.iter().any(|&dir| grid.neighbor(at, dir).is_some()));
    !open
        && grid
            .coords()
            .all(|at| Move::ALL.iter().all(|&dir| scan(grid, at, dir, false).is_none()))
}

/// Directions that would change the grid, in `Move::ALL` order.
pub fn legal_moves(grid: &Grid) -> Vec<Move> {
    Move::ALL
        .into_iter()
        .filter(|&dir| grid.coords().any(|at| scan(grid, at, dir, false).is_some()))
        .collect()
}
