//! Moves and how they change a board.

use std::fmt;

use crate::board::Board;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// Side effect carried by a move beyond relocating the moving piece.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MoveKind {
    /// Captures whatever stands on the destination, if anything.
    Plain,
    /// Pawn advancing two squares; leaves it open to en passant.
    DoublePush,
    /// King move that also carries the rook across.
    Castle { rook_from: Square, rook_to: Square },
    /// Pawn capture that removes the pawn beside it rather than on `to`.
    EnPassant { captured: Square },
    /// Pawn arriving on the last rank; marks it for replacement.
    Promotion,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Move {
    from: Square,
    to: Square,
    kind: MoveKind,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Move {
        Move::with_kind(from, to, MoveKind::Plain)
    }

    pub const fn with_kind(from: Square, to: Square, kind: MoveKind) -> Move {
        Move { from, to, kind }
    }

    pub const fn from(&self) -> Square {
        self.from
    }

    pub const fn to(&self) -> Square {
        self.to
    }

    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::Castle { .. })
    }

    pub fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant { .. })
    }

    pub fn is_promotion(&self) -> bool {
        self.kind == MoveKind::Promotion
    }

    /// True if executing this move on `board` would remove an enemy piece.
    pub fn is_capture(&self, board: &Board) -> bool {
        self.is_en_passant() || board.piece(self.to).is_some()
    }

    /// Plays the move on `board` and returns the piece it removed.
    ///
    /// The moving piece is marked as moved, relocated, and then the side
    /// effect is applied. Nothing here checks that the move is legal.
    pub fn execute(&self, board: &mut Board) -> Option<Piece> {
        if let Some(piece) = board.piece_mut(self.from) {
            piece.has_moved = true;
        }
        let captured = board.move_piece(self.from, self.to);

        match self.kind {
            MoveKind::Plain => captured,
            MoveKind::DoublePush => {
                if let Some(pawn) = board.piece_mut(self.to) {
                    pawn.en_passant_vulnerable = true;
                }
                captured
            }
            MoveKind::Castle { rook_from, rook_to } => {
                board.move_piece(rook_from, rook_to);
                if let Some(rook) = board.piece_mut(rook_to) {
                    rook.has_moved = true;
                }
                if let Some(king) = board.piece_mut(self.to) {
                    king.castled = true;
                }
                captured
            }
            MoveKind::EnPassant { captured: side } => board.remove(side),
            MoveKind::Promotion => {
                if let Some(pawn) = board.piece_mut(self.to) {
                    pawn.promotion_pending = true;
                }
                captured
            }
        }
    }

    /// Plays a whole turn for `mover`: executes the move, replaces a
    /// promoted pawn with `promote_to`, and closes the opponent's en passant
    /// window. Simulations use this so they follow the same turn rules as a
    /// live game.
    pub fn play_turn(
        &self,
        board: &mut Board,
        mover: Color,
        promote_to: PieceKind,
    ) -> Option<Piece> {
        let captured = self.execute(board);
        if self.is_promotion() {
            board.promote(self.to, promote_to);
        }
        board.finish_turn(mover);
        captured
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
