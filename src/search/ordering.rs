//! Warnsdorff move ordering with look-ahead tie refinement.
//!
//! Candidates are ranked by how few empty onward squares they leave, the
//! classic Warnsdorff rule. Ties are re-scored one level deeper: the tied
//! candidate is placed on a scratch board and the empty moves reachable
//! from its frontier are counted, repeating until the configured depth or
//! until no ties remain. Scores after a refinement round are effective
//! scores, rebased so the whole list stays non-decreasing while tied
//! groups keep their refined order.

use crate::board::{Board, Loc, Piece};

/// Tie accounting for one search, fed by every refining ordering call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TieTally {
    /// Ordering calls that refined two or more candidates.
    pub invocations: u64,
    /// Candidates left tied after refinement, beyond the first of each
    /// tied score.
    pub ties: u64,
}

struct Scored {
    score: usize,
    loc: Loc,
    /// Squares backing the score; the next refinement round digs one
    /// level past these.
    frontier: Vec<Loc>,
}

/// Rank `candidates` best-first for a knight standing on their common
/// origin. Occupied candidates are dropped. `look_ahead` is the total
/// number of scoring levels; 0 returns the empty candidates unranked.
pub fn order_moves(
    board: &Board,
    candidates: &[Loc],
    look_ahead: u32,
    tally: &mut TieTally,
) -> Vec<Loc> {
    if look_ahead == 0 {
        return candidates
            .iter()
            .copied()
            .filter(|&loc| board.is_empty(loc))
            .collect();
    }
    let mut scored = level_scores(board, candidates);
    if scored.len() > 1 {
        scored.sort_by_key(|entry| entry.score);
        enforce_order(&mut scored, "level-1");
        if look_ahead >= 2 {
            for _ in 1..look_ahead {
                if !refine_ties(board, &mut scored) {
                    break;
                }
            }
            enforce_order(&mut scored, "refined");
            record_ties(&scored, tally);
        }
    }
    scored.into_iter().map(|entry| entry.loc).collect()
}

/// First-level scores: each empty candidate scored by its count of empty
/// onward knight moves.
fn level_scores(board: &Board, candidates: &[Loc]) -> Vec<Scored> {
    let mut scored = Vec::with_capacity(candidates.len());
    for &loc in candidates {
        if !board.is_empty(loc) {
            continue;
        }
        let frontier = board.knight_moves_filtered(loc, true);
        scored.push(Scored {
            score: frontier.len(),
            loc,
            frontier,
        });
    }
    scored
}

/// One refinement round over the current list. Returns false when the
/// list held no ties, in which case it is left unchanged.
fn refine_ties(board: &Board, scored: &mut Vec<Scored>) -> bool {
    let mut groups: Vec<Vec<Scored>> = Vec::new();
    for entry in std::mem::take(scored) {
        match groups.last_mut() {
            Some(group) if group[0].score == entry.score => group.push(entry),
            _ => groups.push(vec![entry]),
        }
    }
    if groups.iter().all(|group| group.len() == 1) {
        *scored = groups.into_iter().flatten().collect();
        return false;
    }
    let mut rebuilt: Vec<Scored> = Vec::new();
    for group in groups {
        if group.len() == 1 {
            for mut entry in group {
                entry.score = rebuilt.last().map_or(1, |prev| prev.score + 1);
                rebuilt.push(entry);
            }
            continue;
        }
        let mut deeper = rescore_group(board, group);
        deeper.sort_by_key(|entry| entry.score);
        for mut entry in deeper {
            entry.score = match rebuilt.last() {
                Some(prev) => prev.score + entry.score,
                None => entry.score + 1,
            };
            rebuilt.push(entry);
        }
    }
    *scored = rebuilt;
    true
}

/// Score a tied group one level deeper. Each candidate is placed on a
/// scratch board and the empty moves onward from its frontier are
/// gathered; the new frontier's size is the refined score.
fn rescore_group(board: &Board, group: Vec<Scored>) -> Vec<Scored> {
    let mut rescored = Vec::with_capacity(group.len());
    for entry in group {
        let mut scratch = board.clone();
        if scratch.place(Piece::Knight, entry.loc).is_err() {
            continue;
        }
        let mut next_frontier = Vec::new();
        for &reach in &entry.frontier {
            if !scratch.is_empty(reach) {
                continue;
            }
            next_frontier.extend(scratch.knight_moves_filtered(reach, true));
        }
        rescored.push(Scored {
            score: next_frontier.len(),
            loc: entry.loc,
            frontier: next_frontier,
        });
    }
    rescored
}

fn enforce_order(scored: &mut [Scored], stage: &str) {
    let ordered = scored
        .windows(2)
        .all(|pair| pair[0].score <= pair[1].score);
    if !ordered {
        log::warn!("{stage} warnsdorff scores out of order, re-sorting");
        scored.sort_by_key(|entry| entry.score);
    }
}

fn record_ties(scored: &[Scored], tally: &mut TieTally) {
    tally.invocations += 1;
    let mut index = 0;
    while index < scored.len() {
        let mut run = index + 1;
        while run < scored.len() && scored[run].score == scored[index].score {
            run += 1;
        }
        tally.ties += (run - index - 1) as u64;
        index = run;
    }
}
