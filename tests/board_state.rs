use springer::board::{Board, BoardError, Loc, Piece};

#[test]
fn place_clear_and_counters_agree() {
    let mut board = Board::new(4, 4);
    assert_eq!(board.square_count(), 16);
    assert_eq!(board.empty_squares(), 16);
    assert!(!board.is_full());

    let loc = Loc::new(2, 1);
    board.place(Piece::Knight, loc).unwrap();
    assert_eq!(board.piece_at(loc), Some(Piece::Knight));
    assert!(!board.is_empty(loc));
    assert_eq!(board.empty_squares(), 15);

    board.clear(loc);
    assert!(board.is_empty(loc));
    assert_eq!(board.empty_squares(), 16);
}

#[test]
fn double_place_is_an_occupied_error() {
    let mut board = Board::new(4, 4);
    let loc = Loc::new(0, 0);
    board.place(Piece::Knight, loc).unwrap();
    let err = board.place(Piece::Knight, loc).unwrap_err();
    assert!(matches!(err, BoardError::OccupiedSquare(_)), "got {err:?}");
    // The failed placement must not corrupt the empty counter.
    assert_eq!(board.empty_squares(), 15);
}

#[test]
fn off_board_place_is_an_invalid_location() {
    let mut board = Board::new(4, 4);
    let err = board.place(Piece::Knight, Loc::new(4, 0)).unwrap_err();
    assert!(matches!(err, BoardError::InvalidLocation(_)), "got {err:?}");
    assert_eq!(board.empty_squares(), 16);
}

#[test]
fn board_fills_up() {
    let mut board = Board::new(2, 2);
    for col in 0..2 {
        for row in 0..2 {
            board.place(Piece::Knight, Loc::new(col, row)).unwrap();
        }
    }
    assert!(board.is_full());
    assert_eq!(board.empty_squares(), 0);
}

#[test]
fn clones_do_not_alias() {
    let mut original = Board::new(5, 5);
    original.place(Piece::Knight, Loc::new(2, 2)).unwrap();
    let mut branch = original.clone();
    branch.place(Piece::Knight, Loc::new(0, 0)).unwrap();
    branch.clear(Loc::new(2, 2));

    assert!(original.is_empty(Loc::new(0, 0)));
    assert!(!original.is_empty(Loc::new(2, 2)));
    assert_eq!(original.empty_squares(), 24);
    assert_eq!(branch.empty_squares(), 24);
}

#[test]
fn out_of_range_reads_are_empty_handed() {
    let board = Board::new(3, 3);
    let outside = Loc::new(9, 9);
    assert!(!board.in_bounds(outside));
    assert_eq!(board.piece_at(outside), None);
    assert!(!board.is_empty(outside));
    assert!(board.knight_moves(outside).is_empty());
}
