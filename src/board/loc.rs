//! Square locations and the text notations that name them.
//!
//! Boards up to 8x8 use algebraic notation ("a1" .. "h8"). Larger boards
//! fall back to an explicit column/row form ("C9R10", 1-based). Parsing
//! accepts both forms on any board as long as the square is in range.

use serde::{Deserialize, Serialize};

use super::BoardError;

/// A square on the board: column and row indices, both zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loc {
    pub col: usize,
    pub row: usize,
}

impl Loc {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Parse a single square, algebraic ("c4") or explicit ("C3R4").
pub fn parse_loc(text: &str, cols: usize, rows: usize) -> Result<Loc, BoardError> {
    let bytes = text.as_bytes();
    if bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1].is_ascii_digit() {
        let file = bytes[0].to_ascii_lowercase();
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&bytes[1]) {
            return Err(BoardError::InvalidLocation(format!(
                "{text}: algebraic squares run a1 through h8"
            )));
        }
        let loc = Loc::new((file - b'a') as usize, (bytes[1] - b'1') as usize);
        return check_range(loc, text, cols, rows);
    }
    if let Some(loc) = parse_explicit(text) {
        return check_range(loc, text, cols, rows);
    }
    Err(BoardError::InvalidLocation(format!(
        "{text}: expected algebraic (a1) or explicit (C1R1) notation"
    )))
}

/// Format a square in the canonical notation for a board of the given size.
pub fn format_loc(loc: Loc, cols: usize, rows: usize) -> String {
    if cols <= 8 && rows <= 8 && loc.col < 8 && loc.row < 8 {
        let file = (b'a' + loc.col as u8) as char;
        let rank = (b'1' + loc.row as u8) as char;
        format!("{file}{rank}")
    } else {
        format!("C{}R{}", loc.col + 1, loc.row + 1)
    }
}

/// Expand a vertical range such as "a1-8" or "C2R1-12" into its squares.
///
/// The left side names the first square; the part after the final '-' is
/// the 1-based row the range runs to, inclusive. Descending ranges are
/// allowed ("a8-1").
pub fn parse_range(text: &str, cols: usize, rows: usize) -> Result<Vec<Loc>, BoardError> {
    let (head, tail) = match text.rsplit_once('-') {
        Some(parts) => parts,
        None => {
            return Err(BoardError::InvalidLocation(format!(
                "{text}: a range needs a '-', as in a1-8"
            )))
        }
    };
    let first = parse_loc(head, cols, rows)?;
    let end_row = tail
        .parse::<usize>()
        .ok()
        .filter(|&r| r >= 1 && r <= rows)
        .ok_or_else(|| {
            BoardError::InvalidLocation(format!(
                "{text}: range end must be a row between 1 and {rows}"
            ))
        })?
        - 1;
    let locs = if end_row >= first.row {
        (first.row..=end_row)
            .map(|row| Loc::new(first.col, row))
            .collect()
    } else {
        (end_row..=first.row)
            .rev()
            .map(|row| Loc::new(first.col, row))
            .collect()
    };
    Ok(locs)
}

/// Space-separated description of a whole path.
pub fn path_desc(path: &[Loc], cols: usize, rows: usize) -> String {
    path.iter()
        .map(|&loc| format_loc(loc, cols, rows))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of repeated squares in a path (occurrences beyond the first).
pub fn duplicate_squares(path: &[Loc]) -> usize {
    let mut seen = std::collections::HashSet::with_capacity(path.len());
    path.iter().filter(|&&loc| !seen.insert(loc)).count()
}

fn parse_explicit(text: &str) -> Option<Loc> {
    let rest = text.strip_prefix('C').or_else(|| text.strip_prefix('c'))?;
    let split = rest.find(['R', 'r'])?;
    let col: usize = rest[..split].parse().ok()?;
    let row: usize = rest[split + 1..].parse().ok()?;
    if col == 0 || row == 0 {
        return None;
    }
    Some(Loc::new(col - 1, row - 1))
}

fn check_range(loc: Loc, text: &str, cols: usize, rows: usize) -> Result<Loc, BoardError> {
    if loc.col < cols && loc.row < rows {
        Ok(loc)
    } else {
        Err(BoardError::InvalidLocation(format!(
            "{text} is off the {cols}x{rows} board"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_round_trip() {
        for col in 0..8 {
            for row in 0..8 {
                let loc = Loc::new(col, row);
                let text = format_loc(loc, 8, 8);
                assert_eq!(parse_loc(&text, 8, 8).unwrap(), loc);
            }
        }
    }

    #[test]
    fn explicit_round_trip_on_large_board() {
        let loc = Loc::new(9, 11);
        let text = format_loc(loc, 10, 12);
        assert_eq!(text, "C10R12");
        assert_eq!(parse_loc(&text, 10, 12).unwrap(), loc);
    }

    #[test]
    fn algebraic_accepted_on_large_board() {
        assert_eq!(parse_loc("a1", 10, 12).unwrap(), Loc::new(0, 0));
    }

    #[test]
    fn explicit_accepted_on_small_board() {
        assert_eq!(parse_loc("C3R4", 8, 8).unwrap(), Loc::new(2, 3));
    }

    #[test]
    fn rejects_malformed_and_out_of_range() {
        for bad in ["", "a", "a0", "a9", "z9", "i1", "99", "C0R1", "C1R0", "CxRy"] {
            assert!(parse_loc(bad, 8, 8).is_err(), "{bad} should not parse");
        }
        assert!(parse_loc("h8", 5, 5).is_err());
        assert!(parse_loc("C9R1", 8, 8).is_err());
    }

    #[test]
    fn range_expansion() {
        let locs = parse_range("a1-8", 8, 8).unwrap();
        assert_eq!(locs.len(), 8);
        assert_eq!(locs[0], Loc::new(0, 0));
        assert_eq!(locs[7], Loc::new(0, 7));

        let down = parse_range("b3-1", 8, 8).unwrap();
        assert_eq!(
            down,
            vec![Loc::new(1, 2), Loc::new(1, 1), Loc::new(1, 0)]
        );

        let tall = parse_range("C2R1-12", 3, 12).unwrap();
        assert_eq!(tall.len(), 12);
        assert_eq!(tall[11], Loc::new(1, 11));
    }

    #[test]
    fn range_rejects_bad_ends() {
        assert!(parse_range("a1", 8, 8).is_err());
        assert!(parse_range("a1-9", 8, 8).is_err());
        assert!(parse_range("a1-0", 8, 8).is_err());
    }

    #[test]
    fn path_description_and_duplicates() {
        let path = vec![Loc::new(0, 0), Loc::new(1, 2), Loc::new(0, 0)];
        assert_eq!(path_desc(&path, 8, 8), "a1 b3 a1");
        assert_eq!(duplicate_squares(&path), 1);
        assert_eq!(duplicate_squares(&path[..2]), 0);
    }
}
