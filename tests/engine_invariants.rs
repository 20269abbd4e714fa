use std::time::Duration;

use springer::board::{loc, Loc};
use springer::search::engine::{SearchParams, SearchStatus, Searcher};
use springer::validate;

#[test]
fn timed_out_search_leaves_board_and_stack_in_agreement() {
    // Big enough that a millisecond cannot finish it; the search must
    // stop mid-descent with a coherent snapshot.
    let mut searcher = Searcher::new(SearchParams {
        rows: 40,
        cols: 40,
        start: Loc::new(0, 0),
        budget: Some(Duration::from_millis(1)),
        ..SearchParams::default()
    })
    .unwrap();
    assert_eq!(searcher.next_path().unwrap(), None);
    assert_eq!(searcher.status(), SearchStatus::TimedOut);

    let path = searcher.path();
    assert!(!path.is_empty());
    assert_eq!(path[0], Loc::new(0, 0));
    assert_eq!(loc::duplicate_squares(&path), 0);
    assert!(validate::all_moves_legal(&path, false));

    // Occupied squares are exactly the squares on the stack.
    let board = searcher.board().expect("stack is not empty");
    assert_eq!(board.empty_squares(), 40 * 40 - path.len());
    for &square in &path {
        assert!(!board.is_empty(square), "{square:?} should be occupied");
    }

    let stats = searcher.stats();
    assert!(stats.moves >= path.len() as u64);

    // A later call under the same spent budget stays timed out.
    assert_eq!(searcher.next_path().unwrap(), None);
    assert_eq!(searcher.status(), SearchStatus::TimedOut);
}

#[test]
fn exhausted_search_has_no_board_left() {
    // A 2x2 board has no knight moves at all.
    let mut searcher = Searcher::new(SearchParams {
        rows: 2,
        cols: 2,
        start: Loc::new(0, 0),
        budget: None,
        ..SearchParams::default()
    })
    .unwrap();
    assert_eq!(searcher.next_path().unwrap(), None);
    assert_eq!(searcher.status(), SearchStatus::Exhausted);
    assert!(searcher.board().is_none());
    assert!(searcher.path().is_empty());

    let stats = searcher.stats();
    assert_eq!(stats.moves, 1);
    assert_eq!(stats.backtracks, 1);
    assert_eq!(stats.complete_paths, 0);
    assert_eq!(stats.min_depth, 1);
    assert_eq!(searcher.best_path().map(|best| best.len()), Some(1));
}

#[test]
fn partial_best_path_is_a_legal_prefix() {
    let mut searcher = Searcher::new(SearchParams {
        rows: 4,
        cols: 4,
        start: Loc::new(1, 1),
        budget: None,
        ..SearchParams::default()
    })
    .unwrap();
    assert_eq!(searcher.next_path().unwrap(), None);
    let best = searcher.best_path().expect("dead ends record a best path");
    assert_eq!(best[0], Loc::new(1, 1));
    assert_eq!(loc::duplicate_squares(best), 0);
    assert!(validate::all_moves_legal(best, false));
    assert!(best.len() < 16);
}
