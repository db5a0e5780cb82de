//! Chess move generation module.
//!
//! Moves are produced in two stages. Each piece kind first yields its
//! *preliminary* (pseudo-legal) moves, which follow the movement rules but
//! ignore whether the mover's own king is left in check. [`legal_moves`]
//! then simulates every preliminary move on a cloned board and keeps only
//! those after which the mover is not in check. That filter is the single
//! place where self-check is enforced.

use crate::analyzer;
use crate::board::Board;
use crate::chess_move::{Move, MoveKind};
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

impl CastlingSide {
    /// File of the rook taking part in this castle.
    const fn rook_file(self) -> i8 {
        match self {
            CastlingSide::Kingside => 7,
            CastlingSide::Queenside => 0,
        }
    }

    /// Files the king stands on or crosses, destination included.
    const fn king_path(self) -> (i8, i8) {
        match self {
            CastlingSide::Kingside => (4, 6),
            CastlingSide::Queenside => (2, 4),
        }
    }

    const fn king_target(self) -> i8 {
        match self {
            CastlingSide::Kingside => 6,
            CastlingSide::Queenside => 2,
        }
    }

    const fn rook_target(self) -> i8 {
        match self {
            CastlingSide::Kingside => 5,
            CastlingSide::Queenside => 3,
        }
    }
}

/// Pseudo-legal moves of the piece on `square`, castling included.
///
/// Returns an empty list for an empty or invalid square.
pub fn preliminary_moves(board: &Board, square: Square) -> Vec<Move> {
    let mut moves = Vec::with_capacity(16);
    if let Some(piece) = board.piece(square) {
        generate(board, square, piece, true, &mut moves);
    }
    moves
}

/// Pseudo-legal moves without castling candidates.
///
/// Used by the in-check query: castling never captures, and leaving it out
/// keeps castling validation (which itself asks for check) from recursing.
pub fn attack_moves(board: &Board, square: Square) -> Vec<Move> {
    let mut moves = Vec::with_capacity(16);
    if let Some(piece) = board.piece(square) {
        generate(board, square, piece, false, &mut moves);
    }
    moves
}

fn generate(board: &Board, from: Square, piece: &Piece, castles: bool, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, piece, moves),
        PieceKind::Knight => generate_knight_moves(board, from, piece, moves),
        PieceKind::Bishop => generate_sliding_moves(board, from, piece, &BISHOP_DIRECTIONS, moves),
        PieceKind::Rook => generate_sliding_moves(board, from, piece, &ROOK_DIRECTIONS, moves),
        PieceKind::Queen => generate_sliding_moves(board, from, piece, &QUEEN_DIRECTIONS, moves),
        PieceKind::King => {
            generate_king_steps(board, from, piece, moves);
            if castles && !piece.has_moved {
                generate_castles(board, from, piece, moves);
            }
        }
    }
}

/// The square is on the board and either empty or held by an enemy.
fn can_be_moved_to(board: &Board, square: Square, color: Color) -> bool {
    square.is_valid() && board.piece(square).map_or(true, |p| p.color != color)
}

fn holds_enemy(board: &Board, square: Square, color: Color) -> bool {
    board.piece(square).is_some_and(|p| p.color != color)
}

/// Casts a ray from `from` along each direction, one square at a time.
///
/// A ray stops when it leaves the board, after a square holding an enemy
/// piece (which is included as a capture), or before a square holding a
/// friendly piece.
fn generate_sliding_moves(
    board: &Board,
    from: Square,
    piece: &Piece,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dx, dy) in directions {
        let mut to = from.offset(dx, dy);
        while to.is_valid() {
            match board.piece(to) {
                None => moves.push(Move::new(from, to)),
                Some(other) => {
                    if other.color != piece.color {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            to = to.offset(dx, dy);
        }
    }
}

/// Knight targets are the squares at squared distance exactly 5 (2^2 + 1^2).
fn generate_knight_moves(board: &Board, from: Square, piece: &Piece, moves: &mut Vec<Move>) {
    for dx in -2..=2 {
        for dy in -2..=2 {
            let to = from.offset(dx, dy);
            if from.squared_distance(to) == 5 && can_be_moved_to(board, to, piece.color) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

fn generate_king_steps(board: &Board, from: Square, piece: &Piece, moves: &mut Vec<Move>) {
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let to = from.offset(dx, dy);
            if can_be_moved_to(board, to, piece.color) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

fn generate_castles(board: &Board, from: Square, piece: &Piece, moves: &mut Vec<Move>) {
    let row = piece.color.home_rank();
    if from != Square::new(4, row) {
        return;
    }
    for side in [CastlingSide::Queenside, CastlingSide::Kingside] {
        if can_castle(board, piece.color, side) {
            moves.push(Move::with_kind(
                from,
                Square::new(side.king_target(), row),
                MoveKind::Castle {
                    rook_from: Square::new(side.rook_file(), row),
                    rook_to: Square::new(side.rook_target(), row),
                },
            ));
        }
    }
}

/// Checks whether `color` may castle on `side` right now.
///
/// The king and the rook must both be unmoved and on their home squares, the
/// squares between them empty, and the king must not be in check on its
/// current square or on any square it crosses, destination included. The
/// last condition is tested by walking the king along its path on a cloned
/// board and asking for check at every step.
pub fn can_castle(board: &Board, color: Color, side: CastlingSide) -> bool {
    let row = color.home_rank();
    let king_square = Square::new(4, row);
    let king_ready = board
        .piece(king_square)
        .is_some_and(|p| p.is(PieceKind::King, color) && !p.has_moved);
    let rook_file = side.rook_file();
    let rook_ready = board
        .piece(Square::new(rook_file, row))
        .is_some_and(|p| p.is(PieceKind::Rook, color) && !p.has_moved);
    if !king_ready || !rook_ready {
        return false;
    }

    let (low, high) = if rook_file < 4 { (rook_file + 1, 4) } else { (5, rook_file) };
    if (low..high).any(|x| !board.is_empty(Square::new(x, row))) {
        return false;
    }

    let (first, last) = side.king_path();
    (first..=last).all(|x| {
        let mut sim = board.clone();
        sim.move_piece(king_square, Square::new(x, row));
        !analyzer::in_check(&sim, color)
    })
}

fn pawn_move(from: Square, to: Square, color: Color) -> Move {
    if to.y() == color.promotion_rank() {
        Move::with_kind(from, to, MoveKind::Promotion)
    } else {
        Move::new(from, to)
    }
}

fn generate_pawn_moves(board: &Board, from: Square, piece: &Piece, moves: &mut Vec<Move>) {
    let color = piece.color;
    let dir = color.sign();
    let start_rank = color.home_rank() + dir;
    // fifth rank counted from the pawn's own side
    let en_passant_rank = color.home_rank() + 4 * dir;

    let forward = from.offset(0, dir);
    if board.is_empty(forward) {
        moves.push(pawn_move(from, forward, color));

        let two_forward = from.offset(0, 2 * dir);
        if from.y() == start_rank && board.is_empty(two_forward) {
            moves.push(Move::with_kind(from, two_forward, MoveKind::DoublePush));
        }
    }

    for dx in [-1, 1] {
        let to = from.offset(dx, dir);
        if from.y() == en_passant_rank {
            if let Some(mv) = en_passant(board, from, to, color) {
                moves.push(mv);
            }
        }
        if holds_enemy(board, to, color) {
            moves.push(pawn_move(from, to, color));
        }
    }
}

/// An en passant capture onto `to`, if the pawn beside `from` on the
/// target file just advanced two squares and `to` is empty.
fn en_passant(board: &Board, from: Square, to: Square, color: Color) -> Option<Move> {
    let side = Square::new(to.x(), from.y());
    let victim = board.piece(side)?;
    if victim.is(PieceKind::Pawn, color.opponent())
        && victim.en_passant_vulnerable
        && board.is_empty(to)
    {
        Some(Move::with_kind(from, to, MoveKind::EnPassant { captured: side }))
    } else {
        None
    }
}

/// True if playing `mv` does not leave `color`'s king in check.
fn is_legal(board: &Board, mv: &Move, color: Color) -> bool {
    let mut sim = board.clone();
    mv.execute(&mut sim);
    !analyzer::in_check(&sim, color)
}

/// Legal moves of the piece on `square`. Empty for an empty square.
pub fn legal_moves_from(board: &Board, square: Square) -> Vec<Move> {
    let Some(color) = board.piece(square).map(|p| p.color) else {
        return Vec::new();
    };
    preliminary_moves(board, square)
        .into_iter()
        .filter(|mv| is_legal(board, mv, color))
        .collect()
}

/// All legal moves for `color`, in board order (rank 8 first, files a to h).
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    board
        .pieces_of(color)
        .flat_map(|(square, _)| legal_moves_from(board, square))
        .collect()
}

/// True as soon as one legal move for `color` is found.
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board.pieces_of(color).any(|(square, _)| {
        preliminary_moves(board, square)
            .iter()
            .any(|mv| is_legal(board, mv, color))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sq(name: &str) -> Square {
        name.parse().expect("valid square")
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).expect("valid FEN").0
    }

    fn destinations(moves: &[Move]) -> Vec<String> {
        let mut targets: Vec<String> = moves.iter().map(|mv| mv.to().to_string()).collect();
        targets.sort();
        targets
    }

    #[test]
    fn test_legal_moves_initial_position() {
        let board = Board::standard();
        assert_eq!(legal_moves(&board, Color::White).len(), 20);
        assert_eq!(legal_moves(&board, Color::Black).len(), 20);
    }

    #[test_case("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1", "d4", 27; "queen open board")]
    #[test_case("4k3/8/8/8/3R4/8/8/4K3 w - - 0 1", "d4", 14; "rook open board")]
    #[test_case("4k3/8/8/8/3B4/8/8/4K3 w - - 0 1", "d4", 13; "bishop open board")]
    #[test_case("4k3/8/8/8/8/8/8/N3K3 w - - 0 1", "a1", 2; "knight in corner")]
    #[test_case("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1", "d4", 8; "knight centre")]
    fn test_preliminary_move_counts(fen: &str, square: &str, expected: usize) {
        assert_eq!(preliminary_moves(&board(fen), sq(square)).len(), expected);
    }

    #[test]
    fn test_slider_stops_at_pieces() {
        // friendly pawn on d6 blocks, enemy pawn on f4 is captured
        let b = board("4k3/8/3P4/8/3R1p2/8/8/4K3 w - - 0 1");
        let targets = destinations(&preliminary_moves(&b, sq("d4")));
        assert!(targets.contains(&"d5".to_string()));
        assert!(!targets.contains(&"d6".to_string()));
        assert!(targets.contains(&"f4".to_string()));
        assert!(!targets.contains(&"g4".to_string()));
    }

    #[test]
    fn test_pawn_double_push_blocked() {
        let b = board("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        let targets = destinations(&preliminary_moves(&b, sq("e2")));
        assert_eq!(targets, vec!["e3"]);

        let b = board("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(preliminary_moves(&b, sq("e2")).is_empty());
    }

    #[test]
    fn test_pawn_captures() {
        let b = board("4k3/8/8/8/8/3p1N2/4P3/4K3 w - - 0 1");
        let targets = destinations(&preliminary_moves(&b, sq("e2")));
        assert_eq!(targets, vec!["d3", "e3", "e4"]);
    }

    #[test]
    fn test_black_pawn_moves_down() {
        let b = board("4k3/3p4/8/8/8/8/8/4K3 b - - 0 1");
        let moves = preliminary_moves(&b, sq("d7"));
        assert_eq!(destinations(&moves), vec!["d5", "d6"]);
        assert!(moves.iter().any(|mv| mv.kind() == MoveKind::DoublePush));
    }

    #[test]
    fn test_en_passant_generated() {
        let b = board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let moves = legal_moves_from(&b, sq("e5"));
        let ep: Vec<&Move> = moves.iter().filter(|mv| mv.is_en_passant()).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to(), sq("d6"));
        assert_eq!(ep[0].kind(), MoveKind::EnPassant { captured: sq("d5") });
    }

    #[test]
    fn test_en_passant_needs_flag() {
        let b = board("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1");
        assert!(!legal_moves_from(&b, sq("e5")).iter().any(|mv| mv.is_en_passant()));
    }

    #[test]
    fn test_en_passant_window_is_one_move() {
        let mut b = board("4k3/3p4/8/4P3/8/8/8/R3K3 b - - 0 1");
        Move::with_kind(sq("d7"), sq("d5"), MoveKind::DoublePush).execute(&mut b);
        b.finish_turn(Color::Black);
        assert!(legal_moves_from(&b, sq("e5")).iter().any(|mv| mv.is_en_passant()));

        // White declines, Black replies: the window has closed.
        Move::new(sq("a1"), sq("a2")).execute(&mut b);
        b.finish_turn(Color::White);
        Move::new(sq("e8"), sq("f8")).execute(&mut b);
        b.finish_turn(Color::Black);
        assert!(!legal_moves_from(&b, sq("e5")).iter().any(|mv| mv.is_en_passant()));
    }

    #[test]
    fn test_promotion_moves_tagged() {
        let b = board("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = legal_moves_from(&b, sq("a7"));
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|mv| mv.is_promotion()));
    }

    #[test]
    fn test_castling_both_sides() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles: Vec<Move> = legal_moves_from(&b, sq("e1"))
            .into_iter()
            .filter(|mv| mv.is_castle())
            .collect();
        assert_eq!(destinations(&castles), vec!["c1", "g1"]);
    }

    #[test]
    fn test_castling_blocked_by_piece() {
        let b = board("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1");
        assert!(!can_castle(&b, Color::White, CastlingSide::Kingside));
        assert!(!can_castle(&b, Color::White, CastlingSide::Queenside));
    }

    #[test_case("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", true, true; "free")]
    #[test_case("4k3/8/8/8/8/5r2/8/R3K2R w KQ - 0 1", false, true; "f1 attacked")]
    #[test_case("4k3/8/8/8/8/3r4/8/R3K2R w KQ - 0 1", true, false; "d1 attacked")]
    #[test_case("4k3/8/8/8/8/4r3/8/R3K2R w KQ - 0 1", false, false; "king in check")]
    #[test_case("4k3/8/8/8/8/1r6/8/R3K2R w KQ - 0 1", true, true; "b1 may be attacked")]
    #[test_case("4k3/8/8/8/8/8/8/R3K2R w - - 0 1", false, false; "no rights")]
    fn test_castling_conditions(fen: &str, kingside: bool, queenside: bool) {
        let b = board(fen);
        assert_eq!(can_castle(&b, Color::White, CastlingSide::Kingside), kingside);
        assert_eq!(can_castle(&b, Color::White, CastlingSide::Queenside), queenside);
    }

    #[test]
    fn test_king_move_revokes_castling() {
        let mut b = board("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        Move::new(sq("e1"), sq("f1")).execute(&mut b);
        Move::new(sq("f1"), sq("e1")).execute(&mut b);
        assert!(!legal_moves_from(&b, sq("e1")).iter().any(|mv| mv.is_castle()));
    }

    #[test]
    fn test_rook_move_revokes_castling() {
        let mut b = board("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        Move::new(sq("h1"), sq("h2")).execute(&mut b);
        Move::new(sq("h2"), sq("h1")).execute(&mut b);
        assert!(!can_castle(&b, Color::White, CastlingSide::Kingside));
        assert!(can_castle(&b, Color::White, CastlingSide::Queenside));
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let b = board("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(legal_moves_from(&b, sq("e2")).is_empty());
        assert!(!preliminary_moves(&b, sq("e2")).is_empty());
    }

    #[test]
    fn test_has_legal_move_matches_list() {
        let b = Board::standard();
        assert!(has_legal_move(&b, Color::White));

        // queen on e2 is defended by the black king
        let mated = board("8/8/8/8/8/4k3/4q3/4K3 w - - 0 1");
        assert!(!has_legal_move(&mated, Color::White));
        assert!(legal_moves(&mated, Color::White).is_empty());
    }
}
