//! Occupancy board for knight path search.
//!
//! The board tracks piece placement only; rendering lives with whatever
//! front end consumes it, so these operations stay cheap enough to clone
//! on every search branch.

pub mod loc;

pub use loc::Loc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid location: {0}")]
    InvalidLocation(String),
    #[error("occupied square: {0}")]
    OccupiedSquare(String),
}

/// Piece codes. Only the knight moves today; the enum is the seam for
/// other pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Piece {
    Knight,
}

impl Piece {
    pub fn code(self) -> char {
        match self {
            Piece::Knight => 'N',
        }
    }
}

// Candidate generation walks this table in order, which fixes the tie
// layout the move ordering sees.
const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
];

/// A cols x rows grid of optionally occupied squares.
///
/// `Clone` yields a fully independent board; search branches never alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    squares: Vec<Option<Piece>>,
    empty: usize,
}

impl Board {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            squares: vec![None; cols * rows],
            empty: cols * rows,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn square_count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn in_bounds(&self, loc: Loc) -> bool {
        loc.col < self.cols && loc.row < self.rows
    }

    /// Piece on the square, if any. Out-of-range squares read as empty.
    pub fn piece_at(&self, loc: Loc) -> Option<Piece> {
        if self.in_bounds(loc) {
            self.squares[self.index(loc)]
        } else {
            None
        }
    }

    /// True when the square is on the board and unoccupied.
    pub fn is_empty(&self, loc: Loc) -> bool {
        self.in_bounds(loc) && self.squares[self.index(loc)].is_none()
    }

    pub fn is_full(&self) -> bool {
        self.empty == 0
    }

    pub fn empty_squares(&self) -> usize {
        self.empty
    }

    /// Place a piece. Fails on off-board or already occupied squares.
    pub fn place(&mut self, piece: Piece, loc: Loc) -> Result<(), BoardError> {
        if !self.in_bounds(loc) {
            return Err(BoardError::InvalidLocation(format!(
                "{} is off the {}x{} board",
                self.desc(loc),
                self.cols,
                self.rows
            )));
        }
        let index = self.index(loc);
        if self.squares[index].is_some() {
            return Err(BoardError::OccupiedSquare(format!(
                "cannot place {} on {}",
                piece.code(),
                self.desc(loc)
            )));
        }
        self.squares[index] = Some(piece);
        self.empty -= 1;
        Ok(())
    }

    /// Remove whatever occupies the square. Clearing an empty or off-board
    /// square is a no-op.
    pub fn clear(&mut self, loc: Loc) {
        if !self.in_bounds(loc) {
            return;
        }
        let index = self.index(loc);
        if self.squares[index].take().is_some() {
            self.empty += 1;
        }
    }

    /// Squares a knight on `loc` can move to, in table order.
    pub fn knight_moves(&self, loc: Loc) -> Vec<Loc> {
        self.knight_moves_filtered(loc, false)
    }

    /// Knight moves from `loc`, optionally restricted to empty squares.
    pub fn knight_moves_filtered(&self, loc: Loc, only_empty: bool) -> Vec<Loc> {
        let mut moves = Vec::with_capacity(8);
        for &(dc, dr) in &KNIGHT_OFFSETS {
            let col = loc.col as i64 + dc as i64;
            let row = loc.row as i64 + dr as i64;
            if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
                continue;
            }
            let to = Loc::new(col as usize, row as usize);
            if only_empty && !self.is_empty(to) {
                continue;
            }
            moves.push(to);
        }
        moves
    }

    /// True when `b` is one knight move from `a`.
    pub fn is_neighbor(&self, a: Loc, b: Loc) -> bool {
        self.knight_moves(a).contains(&b)
    }

    pub fn parse_loc(&self, text: &str) -> Result<Loc, BoardError> {
        loc::parse_loc(text, self.cols, self.rows)
    }

    pub fn desc(&self, loc: Loc) -> String {
        loc::format_loc(loc, self.cols, self.rows)
    }

    pub fn path_desc(&self, path: &[Loc]) -> String {
        loc::path_desc(path, self.cols, self.rows)
    }

    fn index(&self, loc: Loc) -> usize {
        loc.row * self.cols + loc.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_count_tracks_place_and_clear() {
        let mut board = Board::new(3, 3);
        assert_eq!(board.empty_squares(), 9);
        board.place(Piece::Knight, Loc::new(1, 1)).unwrap();
        assert_eq!(board.empty_squares(), 8);
        board.clear(Loc::new(1, 1));
        board.clear(Loc::new(1, 1));
        assert_eq!(board.empty_squares(), 9);
    }

    #[test]
    fn place_rejects_occupied_and_off_board() {
        let mut board = Board::new(4, 4);
        board.place(Piece::Knight, Loc::new(0, 0)).unwrap();
        assert!(matches!(
            board.place(Piece::Knight, Loc::new(0, 0)),
            Err(BoardError::OccupiedSquare(_))
        ));
        assert!(matches!(
            board.place(Piece::Knight, Loc::new(4, 0)),
            Err(BoardError::InvalidLocation(_))
        ));
    }

    #[test]
    fn corner_and_center_move_counts() {
        let board = Board::new(8, 8);
        assert_eq!(board.knight_moves(Loc::new(0, 0)).len(), 2);
        assert_eq!(board.knight_moves(Loc::new(3, 3)).len(), 8);
    }
}
