//! Depth-first knight path search over an explicit frame stack.
//!
//! Each frame owns its own board snapshot, so backtracking is a pop and
//! branching never aliases state. Candidate moves are ordered lazily the
//! first time a frame is expanded, using Warnsdorff scoring with
//! look-ahead tie refinement. Two mechanisms keep the search out of
//! hopeless regions: a closed-tour prune that unwinds as soon as every
//! square adjacent to the start is occupied, and a widening valve that
//! unwinds to a receding level once ordinary backtracking has failed
//! `backup_limit` times.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::board::{Board, BoardError, Loc, Piece};

use super::control::SearchControl;
use super::ordering::{self, TieTally};
use super::stats::SearchStats;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Board(#[from] BoardError),
    /// The wall-clock budget ran out. Raised and recovered inside the
    /// search; callers observe [`SearchStatus::TimedOut`] instead.
    #[error("search time budget exceeded")]
    Timeout,
}

/// Where a search currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Searching,
    /// A complete path was found (open search).
    FoundPath,
    /// A complete closed tour was found.
    FoundTour,
    /// Every alternative was tried, or the search was stopped or capped.
    Exhausted,
    TimedOut,
}

/// Configuration for one search.
#[derive(Clone, Debug)]
pub struct SearchParams {
    pub rows: usize,
    pub cols: usize,
    pub start: Loc,
    /// Accept only paths whose last square is a knight's move from the
    /// first.
    pub closed: bool,
    /// Wall-clock budget, checked once per iteration. None runs without
    /// a deadline.
    pub budget: Option<Duration>,
    /// Total Warnsdorff scoring levels. 0 leaves candidates unordered.
    pub look_ahead: u32,
    /// Backtracks tolerated before the widening valve triggers.
    pub backup_limit: u64,
    /// Dead ends tolerated before giving up. None means no cap.
    pub max_dead_ends: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            start: Loc::new(0, 0),
            closed: false,
            budget: Some(Duration::from_secs(1)),
            look_ahead: 5,
            backup_limit: 500,
            max_dead_ends: None,
        }
    }
}

/// One ply of the search.
#[derive(Clone, Debug)]
struct Frame {
    loc: Loc,
    board: Board,
    /// Remaining candidates, best first. None until the frame is first
    /// expanded.
    untried: Option<Vec<Loc>>,
}

pub struct Searcher {
    params: SearchParams,
    stack: Vec<Frame>,
    /// Squares a knight's move from the start; a closed tour must end on
    /// one of these.
    closing_squares: Vec<Loc>,
    status: SearchStatus,
    started: Option<Instant>,
    deadline: Option<Instant>,
    stats: SearchStats,
    tally: TieTally,
    best: Option<Vec<Loc>>,
    dead_ends: u64,
    backups_since_widen: u64,
    widen_level: usize,
    control: Option<Arc<SearchControl>>,
}

impl Searcher {
    /// Set up a search. Fails fast when the starting square is off the
    /// board.
    pub fn new(params: SearchParams) -> Result<Self, SearchError> {
        let mut board = Board::new(params.cols, params.rows);
        if !board.in_bounds(params.start) {
            return Err(BoardError::InvalidLocation(format!(
                "start {} is off the {}x{} board",
                board.desc(params.start),
                params.cols,
                params.rows
            ))
            .into());
        }
        board.place(Piece::Knight, params.start)?;
        let closing_squares = board.knight_moves(params.start);
        let mut stats = SearchStats::default();
        stats.min_depth = (params.rows * params.cols) as u64;
        stats.moves = 1;
        Ok(Self {
            stack: vec![Frame {
                loc: params.start,
                board,
                untried: None,
            }],
            closing_squares,
            status: SearchStatus::Searching,
            started: None,
            deadline: None,
            stats,
            tally: TieTally::default(),
            best: None,
            dead_ends: 0,
            backups_since_widen: 0,
            widen_level: 1,
            control: None,
            params,
        })
    }

    pub fn with_control(
        params: SearchParams,
        control: Arc<SearchControl>,
    ) -> Result<Self, SearchError> {
        let mut searcher = Self::new(params)?;
        searcher.control = Some(control);
        Ok(searcher)
    }

    /// Search until a complete path turns up or the search concludes.
    ///
    /// `Ok(None)` means exhausted, timed out, or stopped; consult
    /// [`Searcher::status`]. Calling again after a find backtracks once
    /// and resumes, so repeated calls enumerate distinct completions.
    pub fn next_path(&mut self) -> Result<Option<Vec<Loc>>, SearchError> {
        if self.started.is_none() {
            let now = Instant::now();
            self.started = Some(now);
            self.deadline = self.params.budget.map(|budget| now + budget);
        }
        if matches!(
            self.status,
            SearchStatus::FoundPath | SearchStatus::FoundTour
        ) {
            self.backtrack();
            self.status = SearchStatus::Searching;
        }
        let outcome = self.run();
        if let Some(started) = self.started {
            self.stats.elapsed_secs = started.elapsed().as_secs_f64();
        }
        match outcome {
            Ok(true) => Ok(Some(self.path())),
            Ok(false) => Ok(None),
            Err(SearchError::Timeout) => {
                self.status = SearchStatus::TimedOut;
                log::debug!(
                    "search from {} timed out after {:.3}s",
                    self.start_desc(),
                    self.stats.elapsed_secs
                );
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Counters so far. Tie accounting is folded in on the way out.
    pub fn stats(&self) -> SearchStats {
        let mut stats = self.stats;
        stats.tie_checks = self.tally.invocations;
        stats.ties = self.tally.ties;
        stats
    }

    /// The path currently on the stack, start first.
    pub fn path(&self) -> Vec<Loc> {
        self.stack.iter().map(|frame| frame.loc).collect()
    }

    /// Longest path seen, complete ones preferred. None until the first
    /// dead end or completion.
    pub fn best_path(&self) -> Option<&[Loc]> {
        self.best.as_deref()
    }

    /// Board at the top of the stack. None once the stack is exhausted.
    pub fn board(&self) -> Option<&Board> {
        self.stack.last().map(|frame| &frame.board)
    }

    fn run(&mut self) -> Result<bool, SearchError> {
        let full = self.params.rows * self.params.cols;
        loop {
            self.check_deadline()?;
            if let Some(control) = &self.control {
                if !control.checkpoint() {
                    log::debug!("search from {} stopped", self.start_desc());
                    self.status = SearchStatus::Exhausted;
                    return Ok(false);
                }
            }
            let depth = self.stack.len();
            if depth == 0 {
                self.status = SearchStatus::Exhausted;
                return Ok(false);
            }
            if depth == full {
                self.stats.complete_paths += 1;
                if !self.params.closed {
                    self.status = SearchStatus::FoundPath;
                    return Ok(true);
                }
                let first = self.stack[0].loc;
                let last = self.stack[depth - 1].loc;
                if self.stack[depth - 1].board.is_neighbor(last, first) {
                    self.status = SearchStatus::FoundTour;
                    return Ok(true);
                }
                self.best = Some(self.path());
                log::trace!("complete path from {} does not close", self.start_desc());
                self.widen();
                continue;
            }
            if self.params.closed {
                self.prune_not_closed();
                if self.stack.is_empty() {
                    self.status = SearchStatus::Exhausted;
                    return Ok(false);
                }
            }
            match self.pop_candidate() {
                Some(next) => self.push_move(next)?,
                None => {
                    self.dead_ends += 1;
                    if let Some(cap) = self.params.max_dead_ends {
                        if self.dead_ends > cap {
                            log::debug!(
                                "search from {} gave up after {} dead ends",
                                self.start_desc(),
                                self.dead_ends
                            );
                            self.status = SearchStatus::Exhausted;
                            return Ok(false);
                        }
                    }
                    self.note_dead_end();
                    self.widen();
                }
            }
        }
    }

    /// Lazily order the top frame's follow-on moves and take the best
    /// remaining one.
    fn pop_candidate(&mut self) -> Option<Loc> {
        let look_ahead = self.params.look_ahead;
        let tally = &mut self.tally;
        let frame = self.stack.last_mut()?;
        if frame.untried.is_none() {
            let candidates = frame.board.knight_moves(frame.loc);
            let ordered = ordering::order_moves(&frame.board, &candidates, look_ahead, tally);
            frame.untried = Some(ordered);
        }
        match frame.untried.as_mut() {
            Some(untried) if !untried.is_empty() => Some(untried.remove(0)),
            _ => None,
        }
    }

    fn push_move(&mut self, loc: Loc) -> Result<(), SearchError> {
        let top = self
            .stack
            .last()
            .expect("push_move requires a frame to extend");
        let mut board = top.board.clone();
        board.place(Piece::Knight, loc)?;
        self.stack.push(Frame {
            loc,
            board,
            untried: None,
        });
        self.stats.moves += 1;
        Ok(())
    }

    fn backtrack(&mut self) {
        if self.stack.pop().is_some() {
            self.stats.backtracks += 1;
            self.backups_since_widen += 1;
        }
    }

    /// Unwind after a dead end. Normally one frame pops; once
    /// `backup_limit` backtracks have accumulated, unwind to the widen
    /// level instead, which recedes one frame further each time it fires.
    fn widen(&mut self) {
        if self.backups_since_widen < self.params.backup_limit {
            self.backtrack();
            return;
        }
        let before = self.stack.len();
        while self.stack.len() > self.widen_level {
            self.backtrack();
        }
        if self.stack.len() == before {
            self.backtrack();
        }
        log::debug!(
            "widening search from {}: depth {} -> {}, level {}",
            self.start_desc(),
            before,
            self.stack.len(),
            self.widen_level
        );
        self.backups_since_widen = 0;
        self.widen_level += 1;
    }

    /// A closed tour must end next to the start, so once every closing
    /// square is occupied nothing below this frame can succeed. Unwind
    /// until one frees up.
    fn prune_not_closed(&mut self) {
        if self.stack.len() == self.params.rows * self.params.cols
            || self.has_open_closing_square()
        {
            return;
        }
        self.stats.prunes += 1;
        while self.stack.len() > 1 {
            self.backtrack();
            if self.has_open_closing_square() {
                break;
            }
        }
    }

    fn has_open_closing_square(&self) -> bool {
        match self.stack.last() {
            Some(frame) => self
                .closing_squares
                .iter()
                .any(|&loc| frame.board.is_empty(loc)),
            None => false,
        }
    }

    fn note_dead_end(&mut self) {
        let depth = self.stack.len() as u64;
        if depth <= self.stats.min_depth {
            self.stats.min_depth = depth;
            log::trace!("dead end at depth {depth}");
        }
        let path = self.path();
        if self.best.as_ref().map_or(true, |best| path.len() > best.len()) {
            self.best = Some(path);
        }
    }

    fn check_deadline(&self) -> Result<(), SearchError> {
        match self.deadline {
            Some(deadline) if Instant::now() > deadline => Err(SearchError::Timeout),
            _ => Ok(()),
        }
    }

    fn start_desc(&self) -> String {
        crate::board::loc::format_loc(self.params.start, self.params.cols, self.params.rows)
    }
}
