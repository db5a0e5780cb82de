//! Stateless queries about a board: check, checkmate, stalemate.
//!
//! These are plain functions over a board and a color. Check detection uses
//! the opponent's attack moves, never legal moves: legality filtering is
//! itself built on `in_check`.

use crate::board::Board;
use crate::movegeneration::{attack_moves, has_legal_move};
use crate::piece::Color;

/// True if any opposing piece could move onto `color`'s king square.
pub fn in_check(board: &Board, color: Color) -> bool {
    let king = board.king_square(color);
    board
        .pieces_of(color.opponent())
        .any(|(square, _)| attack_moves(board, square).iter().any(|mv| mv.to() == king))
}

/// True if no piece of `color` has a legal move.
pub fn no_legal_moves(board: &Board, color: Color) -> bool {
    !has_legal_move(board, color)
}

pub fn checkmate(board: &Board, color: Color) -> bool {
    in_check(board, color) && no_legal_moves(board, color)
}

pub fn stalemate(board: &Board, color: Color) -> bool {
    !in_check(board, color) && no_legal_moves(board, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_move::Move;
    use crate::movegeneration::legal_moves;
    use crate::square::Square;
    use test_case::test_case;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).expect("valid FEN").0
    }

    fn sq(name: &str) -> Square {
        name.parse().expect("valid square")
    }

    #[test]
    fn test_start_position_is_quiet() {
        let b = Board::standard();
        for color in [Color::White, Color::Black] {
            assert!(!in_check(&b, color));
            assert!(!checkmate(&b, color));
            assert!(!stalemate(&b, color));
            assert!(!no_legal_moves(&b, color));
        }
    }

    #[test]
    fn test_defended_queen_mates() {
        let b = board("8/8/8/8/8/4k3/4q3/4K3 w - - 0 1");
        assert!(in_check(&b, Color::White));
        assert!(checkmate(&b, Color::White));
        assert!(!stalemate(&b, Color::White));
        assert!(legal_moves(&b, Color::White).is_empty());
    }

    #[test]
    fn test_undefended_queen_can_be_taken() {
        let b = board("4k3/8/8/8/8/8/4q3/4K3 w - - 0 1");
        assert!(in_check(&b, Color::White));
        assert!(!checkmate(&b, Color::White));
        let moves = legal_moves(&b, Color::White);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to(), sq("e2"));
    }

    #[test]
    fn test_fools_mate() {
        let mut b = Board::standard();
        Move::new(sq("f2"), sq("f3")).execute(&mut b);
        Move::new(sq("e7"), sq("e5")).execute(&mut b);
        Move::new(sq("g2"), sq("g4")).execute(&mut b);
        Move::new(sq("d8"), sq("h4")).execute(&mut b);
        assert!(checkmate(&b, Color::White));
        assert!(!checkmate(&b, Color::Black));
    }

    #[test]
    fn test_stalemate() {
        let b = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(!in_check(&b, Color::Black));
        assert!(stalemate(&b, Color::Black));
        assert!(!checkmate(&b, Color::Black));
    }

    #[test]
    fn test_check_by_each_piece() {
        assert!(in_check(&board("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1"), Color::White));
        assert!(in_check(&board("4k3/8/8/8/8/5n2/8/4K3 w - - 0 1"), Color::White));
        assert!(in_check(&board("4k3/8/8/8/8/8/8/r3K3 w - - 0 1"), Color::White));
        assert!(in_check(&board("4k3/8/8/8/7b/8/8/4K3 w - - 0 1"), Color::White));
        // a pawn does not give check straight ahead
        assert!(!in_check(&board("4k3/8/8/8/8/8/4p3/4K3 w - - 0 1"), Color::White));
    }

    #[test_case("8/8/8/8/8/4k3/4q3/4K3 w - - 0 1"; "mate")]
    #[test_case("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"; "stalemate")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"; "start")]
    #[test_case("4k3/8/8/8/8/8/4q3/4K3 w - - 0 1"; "check")]
    #[test_case("k7/8/1Q6/8/8/8/8/4K3 b - - 0 1"; "cornered king")]
    fn test_terminal_states_are_exclusive(fen: &str) {
        let b = board(fen);
        for color in [Color::White, Color::Black] {
            let mate = checkmate(&b, color);
            let stale = stalemate(&b, color);
            assert!(!(mate && stale));
            if mate || stale {
                assert!(no_legal_moves(&b, color));
            }
        }
    }
}
