//! Move orchestration: collapse, notify, settle, terminal check.
//!
//! A [`GameSession`] owns the [`Grid`] and the random source. Every move
//! runs the collapse to completion and hands its events to the registered
//! [`SessionObserver`]s before anything else touches the grid. The settle
//! step (spawn one value, then clear merge flags) follows either right away
//! or when the caller asks for it, depending on the [`SettlePolicy`].
//!
//! ```
//! use grid_2048::engine::Move;
//! use grid_2048::session::GameSession;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut session = GameSession::with_rng(4, 4, StdRng::seed_from_u64(3));
//! session.load_matrix(&[[0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]]).unwrap();
//! let outcome = session.apply_move(Move::Up);
//! assert_eq!(session.grid().get((0, 0).into()), 4);
//! assert!(outcome.spawned.is_some());
//! assert_eq!(session.highest_value(), 4);
//! ```

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::{ConfigError, SessionConfig, SettlePolicy};
use crate::engine::{self, Move};
use crate::event::TileEvent;
use crate::grid::{Grid, GridError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Playing,
    GameOver,
}

/// Hooks a front end implements to mirror the grid.
///
/// Callbacks for one move always arrive in order: `on_move` with every
/// move/merge event, then (once settled) `on_spawn`, then `on_status`.
pub trait SessionObserver {
    fn on_move(&mut self, _direction: Move, _events: &[TileEvent], _grid: &Grid) {}
    fn on_spawn(&mut self, _event: &TileEvent, _grid: &Grid) {}
    /// Fired whenever the status is recomputed; `highest` is the score to show.
    fn on_status(&mut self, _status: SessionStatus, _highest: u32) {}
}

/// Result of one move request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// `None` when the input did not name a direction.
    pub direction: Option<Move>,
    pub events: Vec<TileEvent>,
    /// Placement made by an immediate settle.
    pub spawned: Option<TileEvent>,
}

impl MoveOutcome {
    #[inline]
    pub fn changed(&self) -> bool {
        !self.events.is_empty()
    }
}

pub struct GameSession<R = StdRng> {
    grid: Grid,
    rng: R,
    policy: SettlePolicy,
    initial_tiles: usize,
    pending_settle: bool,
    status: SessionStatus,
    moves: u64,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl GameSession<StdRng> {
    /// Build an unstarted session from validated config.
    pub fn from_config(cfg: &SessionConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = GameSession::with_rng(cfg.rows, cfg.cols, rng).with_policy(cfg.settle.policy);
        session.initial_tiles = cfg.initial_tiles;
        Ok(session)
    }
}

impl<R: Rng> GameSession<R> {
    /// Empty grid, immediate settling, two starting tiles.
    pub fn with_rng(rows: usize, cols: usize, rng: R) -> Self {
        GameSession {
            grid: Grid::new(rows, cols),
            rng,
            policy: SettlePolicy::Immediate,
            initial_tiles: 2,
            pending_settle: false,
            status: SessionStatus::Playing,
            moves: 0,
            observers: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: SettlePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn add_observer<O: SessionObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    #[inline]
    pub fn grid(&self) -> &Grid { &self.grid }

    #[inline]
    pub fn status(&self) -> SessionStatus { self.status }

    #[inline]
    pub fn policy(&self) -> SettlePolicy { self.policy }

    /// Moves that changed the grid.
    #[inline]
    pub fn moves_made(&self) -> u64 { self.moves }

    #[inline]
    pub fn settle_pending(&self) -> bool { self.pending_settle }

    /// The score: highest tile on the grid.
    #[inline]
    pub fn highest_value(&self) -> u32 { self.grid.highest_value() }

    #[inline]
    pub fn is_terminal(&self) -> bool { engine::is_terminal(&self.grid) }

    /// Place the starting tiles and report them to observers.
    pub fn start(&mut self) -> Vec<TileEvent> {
        let mut placed = Vec::with_capacity(self.initial_tiles);
        for _ in 0..self.initial_tiles {
            let Some(ev) = self.grid.spawn_random_value(&mut self.rng) else { break };
            for obs in self.observers.iter_mut() {
                obs.on_spawn(&ev, &self.grid);
            }
            placed.push(ev);
        }
        debug!("started {}x{} session with {} tiles", self.grid.rows(), self.grid.cols(), placed.len());
        self.refresh_status();
        placed
    }

    /// Collapse the grid toward `direction`.
    ///
    /// A settle left pending by an earlier deferred move runs first. Moves
    /// that change nothing emit no events and spawn nothing.
    pub fn apply_move(&mut self, direction: Move) -> MoveOutcome {
        if self.pending_settle {
            debug!("flushing pending settle before {:?}", direction);
            self.settle();
        }
        self.grid.reset_merge_flags();
        let events = engine::collapse(&mut self.grid, direction);
        debug!("move {:?}: {} events", direction, events.len());
        for obs in self.observers.iter_mut() {
            obs.on_move(direction, &events, &self.grid);
        }

        let mut outcome = MoveOutcome { direction: Some(direction), events, spawned: None };
        if !outcome.changed() {
            self.refresh_status();
            return outcome;
        }
        self.moves += 1;
        self.pending_settle = true;
        if self.policy == SettlePolicy::Immediate {
            outcome.spawned = self.settle();
        }
        outcome
    }

    /// Apply the direction named by `key`; unknown keys are ignored.
    pub fn process_key(&mut self, key: &str) -> MoveOutcome {
        match Move::from_key(key) {
            Some(direction) => self.apply_move(direction),
            None => {
                debug!("ignoring key {key:?}");
                MoveOutcome::default()
            }
        }
    }

    /// Finish the last move: spawn one value, clear merge flags, recheck status.
    ///
    /// Does nothing unless a move is waiting to be settled.
    pub fn settle(&mut self) -> Option<TileEvent> {
        if !self.pending_settle {
            return None;
        }
        self.pending_settle = false;
        let spawned = self.grid.spawn_random_value(&mut self.rng);
        self.grid.reset_merge_flags();
        if let Some(ev) = &spawned {
            for obs in self.observers.iter_mut() {
                obs.on_spawn(ev, &self.grid);
            }
        }
        self.refresh_status();
        spawned
    }

    /// Replace the grid contents. Discards any pending settle.
    pub fn load_matrix<M: AsRef<[u32]>>(&mut self, matrix: &[M]) -> Result<(), GridError> {
        self.grid.load_matrix(matrix)?;
        self.pending_settle = false;
        self.refresh_status();
        Ok(())
    }

    fn refresh_status(&mut self) {
        let status = if self.is_terminal() { SessionStatus::GameOver } else { SessionStatus::Playing };
        if status == SessionStatus::GameOver && self.status != status {
            info!("game over after {} moves, highest tile {}", self.moves, self.highest_value());
        }
        self.status = status;
        let highest = self.highest_value();
        for obs in self.observers.iter_mut() {
            obs.on_status(status, highest);
        }
    }
}
