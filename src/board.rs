//! The board: an 8x8 grid of optional pieces.
//!
//! The board owns its pieces outright. Cloning a board produces an
//! independent copy, so simulated moves on a clone never touch the original.
//! Placement and removal here are raw operations: they do not check any
//! chess rule. Rules live in [`crate::movegeneration`] and
//! [`crate::analyzer`].

use std::fmt;

use bitflags::bitflags;

use crate::error::FenError;
use crate::piece::{Color, Piece, PieceId, PieceKind};
use crate::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

bitflags! {
    pub struct CastlingRights: u8 {
        const NONE = 0;
        const WHITEKINGSIDE = 1 << 0;
        const WHITEQUEENSIDE = 1 << 1;
        const BLACKKINGSIDE = 1 << 2;
        const BLACKQUEENSIDE = 1 << 3;
        const ALL =
            Self::WHITEKINGSIDE.bits
            | Self::WHITEQUEENSIDE.bits
            | Self::BLACKKINGSIDE.bits
            | Self::BLACKQUEENSIDE.bits;
    }
}

impl CastlingRights {
    fn kingside(color: Color) -> CastlingRights {
        match color {
            Color::White => CastlingRights::WHITEKINGSIDE,
            Color::Black => CastlingRights::BLACKKINGSIDE,
        }
    }

    fn queenside(color: Color) -> CastlingRights {
        match color {
            Color::White => CastlingRights::WHITEQUEENSIDE,
            Color::Black => CastlingRights::BLACKQUEENSIDE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Indexed `[y][x]`, rank 1 first.
    grid: [[Option<Piece>; 8]; 8],
    next_id: u16,
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Board {
        Board {
            grid: [[None; 8]; 8],
            next_id: 0,
        }
    }

    /// The standard starting position.
    pub fn standard() -> Board {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            let home = color.home_rank();
            let pawns = home + color.sign();
            for (x, kind) in BACK_RANK.iter().enumerate() {
                board.place(Square::new(x as i8, home), Piece::new(*kind, color));
                board.place(Square::new(x as i8, pawns), Piece::new(PieceKind::Pawn, color));
            }
        }
        board
    }

    /// Returns the piece on a square, or `None` if it is empty or invalid.
    pub fn piece(&self, square: Square) -> Option<&Piece> {
        if !square.is_valid() {
            return None;
        }
        self.grid[square.y() as usize][square.x() as usize].as_ref()
    }

    pub fn piece_mut(&mut self, square: Square) -> Option<&mut Piece> {
        if !square.is_valid() {
            return None;
        }
        self.grid[square.y() as usize][square.x() as usize].as_mut()
    }

    /// True if the square is on the board and holds no piece.
    pub fn is_empty(&self, square: Square) -> bool {
        square.is_valid() && self.piece(square).is_none()
    }

    /// Places a piece, giving it a fresh identity. Any piece already on the
    /// square is dropped. Invalid squares are ignored.
    pub fn place(&mut self, square: Square, mut piece: Piece) -> PieceId {
        piece.id = PieceId(self.next_id);
        self.next_id += 1;
        self.set(square, Some(piece));
        piece.id
    }

    /// Takes the piece off a square.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        if !square.is_valid() {
            return None;
        }
        self.grid[square.y() as usize][square.x() as usize].take()
    }

    /// Moves whatever is on `from` to `to`, returning the piece that was on
    /// `to` before.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.remove(from);
        let captured = self.remove(to);
        self.set(to, moving);
        captured
    }

    fn set(&mut self, square: Square, piece: Option<Piece>) {
        if square.is_valid() {
            self.grid[square.y() as usize][square.x() as usize] = piece;
        }
    }

    /// Finds the square a piece stands on, or [`Square::INVALID`].
    pub fn square_of(&self, id: PieceId) -> Square {
        self.pieces()
            .find(|(_, piece)| piece.id == id)
            .map(|(square, _)| square)
            .unwrap_or(Square::INVALID)
    }

    /// All pieces on the board, rank 8 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        Square::all().filter_map(move |square| self.piece(square).map(|piece| (square, piece)))
    }

    /// All pieces of one color, rank 8 first.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Square of the king of `color`, or [`Square::INVALID`] if it is missing.
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
            .unwrap_or(Square::INVALID)
    }

    /// Closes the en passant window of `mover`'s opponent once `mover` has
    /// played.
    pub fn finish_turn(&mut self, mover: Color) {
        for row in self.grid.iter_mut() {
            for piece in row.iter_mut().flatten() {
                if piece.color != mover && piece.kind == PieceKind::Pawn {
                    piece.en_passant_vulnerable = false;
                }
            }
        }
    }

    /// Replaces the pawn on `square` with a new piece of `kind`.
    /// Does nothing if there is no pawn there.
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Option<PieceId> {
        let pawn = self.piece(square).filter(|piece| piece.kind == PieceKind::Pawn)?;
        let mut promoted = Piece::new(kind, pawn.color);
        promoted.has_moved = true;
        Some(self.place(square, promoted))
    }

    /// Square of a promotion-pending pawn of `color`, if any.
    pub fn pending_promotion(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.promotion_pending)
            .map(|(square, _)| square)
    }

    /// Castling rights implied by unmoved kings and rooks on their home squares.
    pub fn castling_rights(&self) -> CastlingRights {
        let mut rights = CastlingRights::NONE;
        for color in [Color::White, Color::Black] {
            let home = color.home_rank();
            let king_home = self
                .piece(Square::new(4, home))
                .is_some_and(|p| p.is(PieceKind::King, color) && !p.has_moved);
            if !king_home {
                continue;
            }
            let rook_home = |x: i8| {
                self.piece(Square::new(x, home))
                    .is_some_and(|p| p.is(PieceKind::Rook, color) && !p.has_moved)
            };
            if rook_home(7) {
                rights |= CastlingRights::kingside(color);
            }
            if rook_home(0) {
                rights |= CastlingRights::queenside(color);
            }
        }
        rights
    }

    /// Reads a position in Forsyth-Edwards Notation. Returns the board and
    /// the side to move. Clock fields are optional and ignored.
    pub fn from_fen(fen: &str) -> Result<(Board, Color), FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let rows: Vec<&str> = parts[0].split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::WrongRankCount(rows.len()));
        }

        let mut board = Board::empty();
        for (i, row) in rows.iter().enumerate() {
            let y = 7 - i as i8;
            let mut x = 0i8;
            for ch in row.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if skip == 0 || x as u32 + skip > 8 {
                        return Err(FenError::BadRankLength { rank: y as usize + 1 });
                    }
                    x += skip as i8;
                    continue;
                }
                let kind = PieceKind::from_letter(ch).ok_or(FenError::BadPiece(ch))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if x >= 8 {
                    return Err(FenError::BadRankLength { rank: y as usize + 1 });
                }
                board.place(Square::new(x, y), Piece::new(kind, color));
                x += 1;
            }
            if x != 8 {
                return Err(FenError::BadRankLength { rank: y as usize + 1 });
            }
        }

        let to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadActiveColor(other.to_string())),
        };

        let mut rights = CastlingRights::NONE;
        for ch in parts.get(2).copied().unwrap_or("-").chars() {
            match ch {
                'K' => rights |= CastlingRights::WHITEKINGSIDE,
                'Q' => rights |= CastlingRights::WHITEQUEENSIDE,
                'k' => rights |= CastlingRights::BLACKKINGSIDE,
                'q' => rights |= CastlingRights::BLACKQUEENSIDE,
                '-' => (),
                other => return Err(FenError::BadCastling(other)),
            }
        }

        for color in [Color::White, Color::Black] {
            let count = board
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            if count != 1 {
                return Err(FenError::KingCount { color: color.name(), count });
            }
        }

        board.apply_moved_flags(rights);

        if let Some(field) = parts.get(3).filter(|field| **field != "-") {
            let target: Square = field.parse()?;
            let pushed = target.offset(0, -to_move.sign());
            let opponent = to_move.opponent();
            if let Some(pawn) = board
                .piece_mut(pushed)
                .filter(|piece| piece.is(PieceKind::Pawn, opponent))
            {
                pawn.en_passant_vulnerable = true;
            }
        }

        Ok((board, to_move))
    }

    /// Derives "has moved" flags from a FEN castling field and pawn ranks.
    fn apply_moved_flags(&mut self, rights: CastlingRights) {
        for square in Square::all() {
            let Some(piece) = self.piece_mut(square) else {
                continue;
            };
            let color = piece.color;
            let home = color.home_rank();
            piece.has_moved = match piece.kind {
                PieceKind::Pawn => square.y() != home + color.sign(),
                PieceKind::King => {
                    square != Square::new(4, home)
                        || !rights.intersects(
                            CastlingRights::kingside(color) | CastlingRights::queenside(color),
                        )
                }
                PieceKind::Rook if square == Square::new(7, home) => {
                    !rights.contains(CastlingRights::kingside(color))
                }
                PieceKind::Rook if square == Square::new(0, home) => {
                    !rights.contains(CastlingRights::queenside(color))
                }
                PieceKind::Rook => true,
                _ => false,
            };
        }
    }

    /// Writes the position as FEN with zeroed clocks.
    pub fn to_fen(&self, to_move: Color) -> String {
        let mut placement = String::new();
        for y in (0..8i8).rev() {
            let mut gap = 0;
            for x in 0..8i8 {
                match self.piece(Square::new(x, y)) {
                    Some(piece) => {
                        if gap > 0 {
                            placement.push_str(&gap.to_string());
                            gap = 0;
                        }
                        placement.push(piece.letter());
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                placement.push_str(&gap.to_string());
            }
            if y > 0 {
                placement.push('/');
            }
        }

        let rights = self.castling_rights();
        let mut castling = String::new();
        for (flag, ch) in [
            (CastlingRights::WHITEKINGSIDE, 'K'),
            (CastlingRights::WHITEQUEENSIDE, 'Q'),
            (CastlingRights::BLACKKINGSIDE, 'k'),
            (CastlingRights::BLACKQUEENSIDE, 'q'),
        ] {
            if rights.contains(flag) {
                castling.push(ch);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .pieces_of(to_move.opponent())
            .find(|(_, piece)| piece.kind == PieceKind::Pawn && piece.en_passant_vulnerable)
            .map(|(square, _)| square.offset(0, to_move.sign()).to_string())
            .unwrap_or_else(|| "-".to_string());

        let side = match to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{placement} {side} {castling} {en_passant} 0 1")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..8i8).rev() {
            write!(f, "{} ", y + 1)?;
            for x in 0..8i8 {
                match self.piece(Square::new(x, y)) {
                    Some(piece) => write!(f, "{} ", piece.letter())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
