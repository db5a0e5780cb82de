//! A complete chess rules engine with a minimax opponent.
//!
//! The board is an 8x8 grid of optional pieces. Moves are generated per
//! piece, filtered for legality by simulating each one on a cloned board,
//! and searched with fixed-depth alpha-beta minimax extended through
//! captures and check evasions.
//!
//! ```no_run
//! use chess_engine::{Color, Game, RandomPlayer, SearchConfig, SearchPlayer};
//!
//! let mut game = Game::new(
//!     Box::new(SearchPlayer::new(Color::White, SearchConfig::default())),
//!     Box::new(RandomPlayer::new(Color::Black)),
//! );
//! println!("{}", game.run());
//! ```

pub mod analyzer;
pub mod board;
pub mod chess_move;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movegeneration;
pub mod perft;
pub mod piece;
pub mod player;
pub mod search;
pub mod square;

pub use board::{Board, CastlingRights, STARTING_FEN};
pub use chess_move::{Move, MoveKind};
pub use error::{FenError, SquareParseError};
pub use game::{Game, Outcome};
pub use piece::{Color, Piece, PieceKind};
pub use player::{Player, RandomPlayer, SearchPlayer};
pub use search::{Search, SearchConfig, SearchResult};
pub use square::Square;
