//! Independent tour validation.
//!
//! Nothing here reuses the engine's move generation: knight adjacency is
//! re-derived from coordinate deltas and coverage from set arithmetic, so
//! the checker and the searcher cannot share a blind spot.

use std::collections::HashSet;

use crate::board::Loc;

/// True when `b` is one knight move from `a`: the coordinate deltas are
/// 1 and 2 in some order.
pub fn knight_adjacent(a: Loc, b: Loc) -> bool {
    let dc = (a.col as i64 - b.col as i64).abs();
    let dr = (a.row as i64 - b.row as i64).abs();
    dc * dr == 2
}

/// Every consecutive pair of squares is a knight move; for `closed`, the
/// last square must also reach the first.
pub fn all_moves_legal(path: &[Loc], closed: bool) -> bool {
    if path.len() < 2 {
        return !closed;
    }
    if !path.windows(2).all(|pair| knight_adjacent(pair[0], pair[1])) {
        return false;
    }
    !closed || knight_adjacent(path[path.len() - 1], path[0])
}

/// `path` visits every square of `universe` exactly once and nothing else.
pub fn covers_exactly_once(path: &[Loc], universe: &[Loc]) -> bool {
    let mut seen = HashSet::with_capacity(path.len());
    for &loc in path {
        if !seen.insert(loc) {
            return false;
        }
    }
    seen.len() == universe.len() && universe.iter().all(|loc| seen.contains(loc))
}

/// Full tour check: exact coverage plus legal, optionally closing, moves.
pub fn is_valid_tour(path: &[Loc], universe: &[Loc], closed: bool) -> bool {
    covers_exactly_once(path, universe) && all_moves_legal(path, closed)
}

/// Every square of a cols x rows board.
pub fn board_universe(cols: usize, rows: usize) -> Vec<Loc> {
    let mut universe = Vec::with_capacity(cols * rows);
    for col in 0..cols {
        for row in 0..rows {
            universe.push(Loc::new(col, row));
        }
    }
    universe
}

/// Group indices of paths that are the same circuit: identical up to
/// rotation, reversal, or both. Groups of one are omitted.
pub fn find_duplicate_paths(paths: &[Vec<Loc>]) -> Vec<Vec<usize>> {
    let mut remaining: Vec<usize> = (0..paths.len()).collect();
    let mut groups = Vec::new();
    while let Some((&first, rest)) = remaining.split_first() {
        let mut group = vec![first];
        let mut unmatched = Vec::new();
        for &index in rest {
            if same_circuit(&paths[first], &paths[index]) {
                group.push(index);
            } else {
                unmatched.push(index);
            }
        }
        remaining = unmatched;
        if group.len() > 1 {
            groups.push(group);
        }
    }
    groups
}

fn same_circuit(p1: &[Loc], p2: &[Loc]) -> bool {
    if p1.len() != p2.len() {
        return false;
    }
    if p1.is_empty() {
        return true;
    }
    if rotated_eq(p1, p2) {
        return true;
    }
    let mut reversed = p2.to_vec();
    reversed.reverse();
    rotated_eq(p1, &reversed)
}

// Rotate p2 so its copy of p1's first square lines up, then compare.
fn rotated_eq(p1: &[Loc], p2: &[Loc]) -> bool {
    let pivot = match p2.iter().position(|&loc| loc == p1[0]) {
        Some(pivot) => pivot,
        None => return false,
    };
    p2[pivot..].iter().chain(p2[..pivot].iter()).eq(p1.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_is_symmetric_and_strict() {
        let a = Loc::new(1, 0);
        let b = Loc::new(0, 2);
        assert!(knight_adjacent(a, b));
        assert!(knight_adjacent(b, a));
        assert!(!knight_adjacent(a, a));
        assert!(!knight_adjacent(a, Loc::new(3, 2)));
    }

    #[test]
    fn rotation_alignment_requires_shared_start() {
        let p1 = vec![Loc::new(0, 0), Loc::new(1, 2)];
        let p2 = vec![Loc::new(5, 5), Loc::new(1, 2)];
        assert!(!rotated_eq(&p1, &p2));
    }
}
