//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! Scores are absolute: White maximises, Black minimises. Every candidate
//! move is simulated on its own clone of the board, so the board passed in
//! is never modified. Lines that end in a capture, or that were played out
//! of check, are searched past the nominal depth until they settle, the
//! depth floor is hit, or the time budget runs out. When the budget runs
//! out mid-search the best move found so far is returned; it may be based
//! on a partially explored tree.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::analyzer::in_check;
use crate::board::Board;
use crate::chess_move::Move;
use crate::evaluation::evaluate;
use crate::movegeneration::legal_moves;
use crate::piece::{Color, PieceKind};

const MAX_SCORE: i32 = i32::MAX;
const MIN_SCORE: i32 = -i32::MAX;

const DEFAULT_DEPTH: i32 = 3;
const DEFAULT_DEPTH_FLOOR: i32 = -4;
const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(30);

/// Tunable limits of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Nominal depth in plies.
    pub depth: i32,
    /// Remaining depth at which extensions stop, whatever the position.
    pub depth_floor: i32,
    /// Wall-clock budget for one call to [`Search::find_best_move`].
    pub time_budget: Duration,
    /// Disable to search the full minimax tree.
    pub pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_DEPTH,
            depth_floor: DEFAULT_DEPTH_FLOOR,
            time_budget: DEFAULT_TIME_BUDGET,
            pruning: true,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_depth_floor(mut self, depth_floor: i32) -> Self {
        self.depth_floor = depth_floor;
        self
    }

    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn without_pruning(mut self) -> Self {
        self.pruning = false;
        self
    }
}

/// Outcome of one root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// `None` only if the side to move had no legal move.
    pub best_move: Option<Move>,
    pub score: i32,
    /// Deepest ply reached, extensions included.
    pub max_depth: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub timed_out: bool,
}

#[derive(Debug, Clone)]
pub struct Search {
    config: SearchConfig,
    nodes_searched: u64,
    start_time: Instant,
    max_depth: i32,
    best_move: Option<Move>,
    timed_out: bool,
}

impl Default for Search {
    fn default() -> Self {
        Search::new(SearchConfig::default())
    }
}

impl Search {
    /// # Panics
    ///
    /// If `config.depth` is below 1 or `config.depth_floor` is not below it;
    /// such a search would stop at the root without choosing a move.
    pub fn new(config: SearchConfig) -> Self {
        assert!(config.depth >= 1, "search depth must be at least 1, got {}", config.depth);
        assert!(
            config.depth_floor < config.depth,
            "depth floor {} must be below search depth {}",
            config.depth_floor,
            config.depth
        );
        Self {
            config,
            nodes_searched: 0,
            start_time: Instant::now(),
            max_depth: 0,
            best_move: None,
            timed_out: false,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_max_time(&mut self, time_budget: Duration) {
        self.config.time_budget = time_budget;
    }

    /// Searches for the best move for `color` on `board`.
    ///
    /// Ties go to the first move, in move generation order, that reaches the
    /// best score.
    pub fn find_best_move(&mut self, board: &Board, color: Color) -> SearchResult {
        self.nodes_searched = 0;
        self.max_depth = 0;
        self.best_move = None;
        self.timed_out = false;
        self.start_time = Instant::now();

        let score = self.minimax(board, color, self.config.depth, MIN_SCORE, MAX_SCORE, false);

        let result = SearchResult {
            best_move: self.best_move,
            score,
            max_depth: self.max_depth,
            nodes: self.nodes_searched,
            elapsed: self.start_time.elapsed(),
            timed_out: self.timed_out,
        };
        info!(
            %color,
            score = result.score,
            max_depth = result.max_depth,
            nodes = result.nodes,
            elapsed_ms = result.elapsed.as_millis() as u64,
            best_move = %result.best_move.map_or_else(|| "none".to_string(), |mv| mv.to_string()),
            "search finished"
        );
        result
    }

    /// Recursive minimax with alpha-beta pruning.
    ///
    /// `alpha` is the best score White is already assured of, `beta` the
    /// best Black is assured of. `extended` is set when the move leading
    /// here was a capture or was played out of check, which lets the search
    /// continue past depth zero.
    fn minimax(
        &mut self,
        board: &Board,
        color: Color,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        extended: bool,
    ) -> i32 {
        self.nodes_searched += 1;

        let out_of_time = self.start_time.elapsed() > self.config.time_budget;
        if out_of_time && !self.timed_out {
            self.timed_out = true;
            debug!(
                budget_ms = self.config.time_budget.as_millis() as u64,
                nodes = self.nodes_searched,
                "search deadline exceeded, unwinding"
            );
        }
        if depth <= self.config.depth_floor || (depth <= 0 && !extended) || out_of_time {
            return self.leaf(board, depth);
        }

        let moves = legal_moves(board, color);
        if moves.is_empty() {
            return self.leaf(board, depth);
        }

        let is_root = depth == self.config.depth;
        let in_check_now = in_check(board, color);
        let maximizing = color == Color::White;
        let mut best = if maximizing { MIN_SCORE } else { MAX_SCORE };

        for mv in moves {
            let extend = in_check_now || mv.is_capture(board);
            let mut sim = board.clone();
            mv.play_turn(&mut sim, color, PieceKind::Queen);

            let score = self.minimax(&sim, color.opponent(), depth - 1, alpha, beta, extend);

            let improved = if maximizing { score > best } else { score < best };
            if improved {
                best = score;
                if is_root {
                    self.best_move = Some(mv);
                }
            }
            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }

            if (self.config.pruning && alpha >= beta) || self.timed_out {
                break;
            }
        }

        best
    }

    fn leaf(&mut self, board: &Board, depth: i32) -> i32 {
        self.max_depth = self.max_depth.max(self.config.depth - depth);
        evaluate(board)
    }
}
