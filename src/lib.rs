//! grid-2048: the sliding/merging core of a 2048-style puzzle
//!
//! This crate provides:
//! - A rows×cols `Grid` with per-cell merge flags (`grid` module)
//! - The directional collapse, slide-destination search and terminal check (`engine` module)
//! - A `GameSession` that orchestrates moves, settling and observers (`session` module)
//! - TOML-backed `SessionConfig` (`config` module)
//!
//! Rendering and input live outside the crate: front ends call
//! `GameSession::apply_move` and replay the returned `TileEvent`s.
//!
//! Quick start:
//! ```
//! use grid_2048::engine::Move;
//! use grid_2048::session::{GameSession, SessionStatus};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic session with a seeded RNG
//! let mut session = GameSession::with_rng(4, 4, StdRng::seed_from_u64(42));
//! session.start();
//!
//! let mut moves = 0;
//! while session.status() == SessionStatus::Playing && moves < 8 {
//!     let outcome = session.apply_move(Move::ALL[moves % 4]);
//!     for ev in &outcome.events {
//!         assert_ne!(session.grid().get(ev.to), 0);
//!     }
//!     moves += 1;
//! }
//! assert!(session.highest_value() >= 2);
//! ```
//!
//! Working on a grid directly, without a session:
//! ```
//! use grid_2048::engine::{self as GameEngine, Move};
//! use grid_2048::grid::Grid;
//!
//! let mut g = Grid::from_matrix(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
//! assert!(GameEngine::is_terminal(&g));
//! assert!(GameEngine::collapse(&mut g, Move::Left).is_empty());
//! ```

pub mod config;
pub mod engine;
pub mod event;
pub mod grid;
pub mod session;
pub mod values;

pub use config::{SessionConfig, SettlePolicy};
pub use engine::Move;
pub use event::{EventKind, TileEvent};
pub use grid::{Coord, Grid, GridError};
pub use session::{GameSession, MoveOutcome, SessionObserver, SessionStatus};
