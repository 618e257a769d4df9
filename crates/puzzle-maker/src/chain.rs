//! Analysis chain: one link per applied move, extended forward with the
//! engine's best moves until the line stops being forced.

use chess_core::position::{self, board_diagram, fullmove_string};
use chess_core::{material_count, material_difference, normalize_score, Score};
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move, Position};
use tracing::debug;

use crate::candidate::{AmbiguityPolicy, CandidateMove, ScoreGapPolicy};
use crate::completeness::{material_gain_qualifies, MaterialOutcome, MaterialThresholds};
use crate::config::DEFAULT_MAX_LINKS;
use crate::engine::{AnalysisEngine, MultiPvSession};
use crate::error::PuzzleError;

/// Most candidate moves examined per link
pub const MAX_CANDIDATES: usize = 3;

/// Puzzle classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Mate,
    Material,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Mate => write!(f, "Mate"),
            Category::Material => write!(f, "Material"),
        }
    }
}

/// The engine's choice at a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMove {
    pub uci: String,
    /// Score of the principal line, side to move's perspective
    pub evaluation: Option<Score>,
}

/// Position reached after one move
#[derive(Debug, Clone)]
pub struct AnalysisLink {
    preceding_position: Chess,
    incoming_move: Move,
    position: Chess,
    side_being_tested: bool,
    strict: bool,
    best_move: Option<BestMove>,
    candidate_moves: Vec<CandidateMove>,
    next: Option<usize>,
}

impl AnalysisLink {
    /// Copy `preceding_position` and play `incoming_move` on it
    pub fn new(
        preceding_position: &Chess,
        incoming_move: Move,
        side_being_tested: bool,
        strict: bool,
    ) -> Result<Self, PuzzleError> {
        let position = preceding_position
            .clone()
            .play(incoming_move.clone())
            .map_err(|_| PuzzleError::IllegalMove {
                uci: incoming_move.to_uci(shakmaty::CastlingMode::Standard).to_string(),
                fen: position::fen(preceding_position),
            })?;

        Ok(Self {
            preceding_position: preceding_position.clone(),
            incoming_move,
            position,
            side_being_tested,
            strict,
            best_move: None,
            candidate_moves: Vec::new(),
            next: None,
        })
    }

    pub fn preceding_position(&self) -> &Chess {
        &self.preceding_position
    }

    pub fn incoming_move(&self) -> &Move {
        &self.incoming_move
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// True when the puzzle solver is to move in this link's position
    pub fn side_being_tested(&self) -> bool {
        self.side_being_tested
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn best_move(&self) -> Option<&BestMove> {
        self.best_move.as_ref()
    }

    pub fn evaluation(&self) -> Option<Score> {
        self.best_move.as_ref().and_then(|best| best.evaluation)
    }

    pub fn candidate_moves(&self) -> &[CandidateMove] {
        &self.candidate_moves
    }

    /// Index of the successor link in the owning chain
    pub fn next(&self) -> Option<usize> {
        self.next
    }

    pub fn material_difference(&self) -> i32 {
        material_difference(self.position.board())
    }

    fn log_position(&self) {
        debug!(
            "After {} {}",
            fullmove_string(&self.preceding_position),
            position::san(&self.preceding_position, &self.incoming_move)
        );
        debug!(fen = %position::fen(&self.position), "\n{}", board_diagram(self.position.board()));
        debug!(
            material_difference = self.material_difference(),
            legal_moves = self.position.legal_moves().len()
        );
    }

    fn log_move(&self, mv: &Move, uci: &str, score: Score) {
        debug!(
            "{}{} ({})   {}",
            fullmove_string(&self.position),
            position::san(&self.position, mv),
            uci,
            normalize_score(&self.position, score)
        );
    }
}

/// Links of one puzzle line, root at index 0. Links only ever point forward.
#[derive(Debug, Clone)]
pub struct AnalysisChain<P = ScoreGapPolicy> {
    links: Vec<AnalysisLink>,
    policy: P,
    max_links: usize,
    require_checkmate: bool,
    thresholds: MaterialThresholds,
    generated: bool,
}

impl AnalysisChain<ScoreGapPolicy> {
    /// Chain with the default ambiguity policy; the solver moves first
    pub fn new(position: &Chess, initial_move: Move, strict: bool) -> Result<Self, PuzzleError> {
        Self::with_policy(position, initial_move, strict, ScoreGapPolicy::default())
    }
}

impl<P: AmbiguityPolicy> AnalysisChain<P> {
    pub fn with_policy(
        position: &Chess,
        initial_move: Move,
        strict: bool,
        policy: P,
    ) -> Result<Self, PuzzleError> {
        let root = AnalysisLink::new(position, initial_move, true, strict)?;
        Ok(Self {
            links: vec![root],
            policy,
            max_links: DEFAULT_MAX_LINKS,
            require_checkmate: false,
            thresholds: MaterialThresholds::default(),
            generated: false,
        })
    }

    /// Stop generating once the chain holds this many links
    pub fn max_links(mut self, max_links: usize) -> Self {
        self.max_links = max_links.max(1);
        self
    }

    /// Mate puzzles must end in checkmate rather than any game over
    pub fn require_checkmate(mut self, require: bool) -> Self {
        self.require_checkmate = require;
        self
    }

    pub fn thresholds(mut self, thresholds: MaterialThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn links(&self) -> &[AnalysisLink] {
        &self.links
    }

    pub fn root(&self) -> &AnalysisLink {
        &self.links[0]
    }

    pub fn link(&self, index: usize) -> Option<&AnalysisLink> {
        self.links.get(index)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn tail_index(&self) -> usize {
        self.links.len() - 1
    }

    /// Extend the chain from its root, querying the engine at `depth`.
    /// Runs once; later calls leave the chain as it is.
    pub fn generate<E: AnalysisEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        depth: u32,
    ) -> Result<(), PuzzleError> {
        if self.generated {
            debug!(links = self.links.len(), "Chain already generated");
            return Ok(());
        }
        self.generated = true;

        let mut index = 0;
        while self.extend(index, engine, depth)? {
            index = self.links[index].next.ok_or(PuzzleError::MissingSuccessor(index))?;
            if self.links.len() >= self.max_links {
                debug!(links = self.links.len(), "Not going deeper: chain length limit");
                break;
            }
        }
        Ok(())
    }

    /// Populate one link; returns whether generation should continue with its successor
    fn extend<E: AnalysisEngine + ?Sized>(
        &mut self,
        index: usize,
        engine: &mut E,
        depth: u32,
    ) -> Result<bool, PuzzleError> {
        self.links[index].log_position();

        if self.links[index].position.legal_moves().is_empty() {
            debug!("Not going deeper: no legal moves");
            return Ok(false);
        }
        if !self.evaluate_best(index, engine, depth)? {
            debug!("Not going deeper: game over");
            return Ok(false);
        }
        self.evaluate_candidate_moves(index, engine, depth)?;

        if !self.links[index].side_being_tested {
            debug!("Going deeper...");
            return Ok(true);
        }
        if self.is_ambiguous(index) {
            debug!("Not going deeper: ambiguous");
            Ok(false)
        } else if self.game_over(index)? {
            debug!("Not going deeper: game over");
            Ok(false)
        } else {
            debug!("Going deeper...");
            Ok(true)
        }
    }

    /// Ask the engine for the best move and append the successor link.
    /// Returns false when the engine has no move to offer.
    fn evaluate_best<E: AnalysisEngine + ?Sized>(
        &mut self,
        index: usize,
        engine: &mut E,
        depth: u32,
    ) -> Result<bool, PuzzleError> {
        debug!(depth, "Evaluating best move...");
        let link = &self.links[index];
        engine.set_position(&link.position)?;
        let result = engine.search(depth)?;

        let Some(uci) = result.best_move.clone() else {
            debug!("No best move!");
            return Ok(false);
        };
        let mv = engine_move(&link.position, &uci)?;
        let evaluation = result.score();
        if let Some(score) = evaluation {
            link.log_move(&mv, &uci, score);
        }

        let next = AnalysisLink::new(&link.position, mv, !link.side_being_tested, link.strict)?;
        let next_index = self.links.len();
        self.links.push(next);

        let link = &mut self.links[index];
        link.best_move = Some(BestMove { uci, evaluation });
        link.next = Some(next_index);
        Ok(true)
    }

    /// Record the engine's top moves at this link for ambiguity checks
    fn evaluate_candidate_moves<E: AnalysisEngine + ?Sized>(
        &mut self,
        index: usize,
        engine: &mut E,
        depth: u32,
    ) -> Result<(), PuzzleError> {
        let link = &self.links[index];
        let multipv = MAX_CANDIDATES.min(link.position.legal_moves().len());
        if multipv == 0 {
            return Ok(());
        }
        debug!(multipv, depth, "Evaluating best moves...");

        let result = {
            let mut session = MultiPvSession::open(engine, multipv)?;
            session.analyse(&link.position, depth)?
        };

        let mut candidates = Vec::with_capacity(multipv);
        for line in result.lines.iter().take(multipv) {
            let (Some(uci), Some(score)) = (line.pv.first(), line.score) else {
                continue;
            };
            let mv = engine_move(&link.position, uci)?;
            link.log_move(&mv, uci, score);
            candidates.push(CandidateMove {
                move_uci: uci.clone(),
                move_san: position::san(&link.position, &mv),
                evaluation: score,
            });
        }
        self.links[index].candidate_moves = candidates;
        Ok(())
    }

    /// True if the link's candidate moves leave more than one good option
    pub fn is_ambiguous(&self, index: usize) -> bool {
        let evaluations: Vec<Score> = self.links[index]
            .candidate_moves
            .iter()
            .map(|candidate| candidate.evaluation)
            .collect();
        self.policy.is_ambiguous(&evaluations)
    }

    /// True if this link's position or its successor's is game over.
    /// The link must already have a successor.
    pub fn game_over(&self, index: usize) -> Result<bool, PuzzleError> {
        let link = &self.links[index];
        let next = link.next.ok_or(PuzzleError::MissingSuccessor(index))?;
        Ok(link.position.is_game_over() || self.links[next].position.is_game_over())
    }

    /// Mate if the line ends in a finished game, otherwise Material
    pub fn category(&self) -> Category {
        let tail = &self.links[self.tail_index()];
        if tail.position.is_game_over() {
            Category::Mate
        } else {
            Category::Material
        }
    }

    /// Best moves from the root up to the first ambiguous or finished successor
    pub fn move_list(&self) -> Vec<String> {
        self.move_list_from(0)
    }

    /// Best moves from `index` up to the first ambiguous or finished successor
    pub fn move_list_from(&self, index: usize) -> Vec<String> {
        let mut moves = Vec::new();
        let mut current = index;
        while let Some(link) = self.links.get(current) {
            let Some(best) = &link.best_move else {
                break;
            };
            moves.push(best.uci.clone());
            match link.next {
                Some(next)
                    if !self.is_ambiguous(next) && !self.links[next].position.is_game_over() =>
                {
                    current = next;
                }
                _ => break,
            }
        }
        moves
    }

    /// Does the generated line make a valid puzzle of `category`?
    pub fn is_complete(&self, category: Category, white_to_move: bool, initial_material_diff: f64) -> bool {
        self.is_complete_from(0, category, white_to_move, initial_material_diff)
    }

    pub fn is_complete_from(
        &self,
        index: usize,
        category: Category,
        white_to_move: bool,
        initial_material_diff: f64,
    ) -> bool {
        let mut current = index;
        loop {
            let link = &self.links[current];
            let advance = match (category, link.next) {
                (Category::Mate, Some(next)) if !self.is_ambiguous(current) => Some(next),
                (Category::Material, Some(next)) if self.links[next].next.is_some() => Some(next),
                _ => None,
            };
            match advance {
                Some(next) => current = next,
                None => break,
            }
        }

        let link = &self.links[current];
        match category {
            Category::Mate if self.require_checkmate => link.position.is_checkmate(),
            Category::Mate => link.position.is_game_over(),
            Category::Material => {
                let outcome = MaterialOutcome {
                    difference: f64::from(link.material_difference()),
                    piece_count: material_count(link.position.board()),
                    evaluation: link.evaluation(),
                };
                material_gain_qualifies(&outcome, white_to_move, initial_material_diff, &self.thresholds)
            }
        }
    }
}

/// Parse a move the engine suggested for `pos`
fn engine_move(pos: &Chess, uci: &str) -> Result<Move, PuzzleError> {
    position::parse_uci_move(pos, uci).map_err(|_| PuzzleError::IllegalMove {
        uci: uci.to_string(),
        fen: position::fen(pos),
    })
}
