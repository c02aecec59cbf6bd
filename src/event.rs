//! Tile events handed to renderers so they can replay a move.

use crate::grid::Coord;

/// What happened to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Slid into an empty cell.
    Move,
    /// Slid into an equal tile and doubled it.
    Merge,
    /// Placed by the settle step.
    Spawn,
}

/// One tile that moved, merged or appeared.
///
/// `value` is the tile value at `to` once the event is applied, so merges
/// carry the doubled value. Spawns have `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileEvent {
    pub from: Coord,
    pub to: Coord,
    pub value: u32,
    pub kind: EventKind,
}

impl TileEvent {
    #[inline]
    pub fn moved(from: Coord, to: Coord, value: u32) -> Self {
        TileEvent { from, to, value, kind: EventKind::Move }
    }

    #[inline]
    pub fn merged(from: Coord, to: Coord, value: u32) -> Self {
        TileEvent { from, to, value, kind: EventKind::Merge }
    }

    #[inline]
    pub fn spawned(at: Coord, value: u32) -> Self {
        TileEvent { from: at, to: at, value, kind: EventKind::Spawn }
    }

    #[inline]
    pub fn was_merge(&self) -> bool {
        self.kind == EventKind::Merge
    }
}
