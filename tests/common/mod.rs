#![allow(dead_code)]

use std::collections::HashMap;

use chess_core::position::{fen, parse_fen, play_uci};
use chess_core::Score;
use puzzle_maker::{AnalysisEngine, PuzzleError, PvLine, SearchResult};
use shakmaty::Chess;

/// Install a test log writer once; RUST_LOG=debug shows the chain traces.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parse a FEN that the test knows to be valid.
pub fn position(fen_str: &str) -> Chess {
    parse_fen(fen_str).unwrap_or_else(|e| panic!("bad test FEN: {e}"))
}

/// Play a sequence of UCI moves.
pub fn play(pos: &Chess, moves: &[&str]) -> Chess {
    moves.iter().fold(pos.clone(), |pos, uci| {
        play_uci(&pos, uci).unwrap_or_else(|e| panic!("bad test move: {e}"))
    })
}

/// Engine stand-in answering from ranked move lists keyed by FEN.
/// Unknown positions get no best move.
#[derive(Default)]
pub struct ScriptedEngine {
    scripts: HashMap<String, Vec<(String, Score)>>,
    current: Option<String>,
    multipv: usize,
    pub options: Vec<(String, String)>,
    pub searches: usize,
    pub depths: Vec<u32>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            multipv: 1,
            ..Default::default()
        }
    }

    /// Ranked engine moves for `pos`, best first.
    pub fn script(mut self, pos: &Chess, moves: &[(&str, Score)]) -> Self {
        let ranked = moves
            .iter()
            .map(|(uci, score)| (uci.to_string(), *score))
            .collect();
        self.scripts.insert(fen(pos), ranked);
        self
    }

    pub fn multipv_history(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|(name, _)| name == "MultiPV")
            .map(|(_, value)| value.clone())
            .collect()
    }

    pub fn current_multipv(&self) -> usize {
        self.multipv
    }
}

impl AnalysisEngine for ScriptedEngine {
    fn set_position(&mut self, position: &Chess) -> Result<(), PuzzleError> {
        self.current = Some(fen(position));
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), PuzzleError> {
        if name == "MultiPV" {
            self.multipv = value
                .parse()
                .map_err(|_| PuzzleError::Engine(format!("bad MultiPV value {value}")))?;
        }
        self.options.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn search(&mut self, depth: u32) -> Result<SearchResult, PuzzleError> {
        self.searches += 1;
        self.depths.push(depth);

        let ranked = self
            .current
            .as_ref()
            .and_then(|fen| self.scripts.get(fen))
            .cloned()
            .unwrap_or_default();

        let lines: Vec<PvLine> = ranked
            .iter()
            .take(self.multipv)
            .map(|(uci, score)| PvLine {
                pv: vec![uci.clone()],
                score: Some(*score),
            })
            .collect();

        Ok(SearchResult {
            best_move: ranked.first().map(|(uci, _)| uci.clone()),
            lines,
        })
    }
}

/// Black blunders with a7a6; white mates with Qg8+ Rxg8 Nf7#.
pub const SMOTHERED_MATE_FEN: &str = "5r1k/p5pp/7N/3Q4/8/8/6PP/6K1 b - - 0 1";

/// Black drops a knight on d4 with Nb5-d4; white collects it with Rxd4.
pub const HANGING_KNIGHT_FEN: &str = "4r1k1/5ppp/8/1n6/8/8/2B2PPP/3R2K1 b - - 0 1";

/// Black steps into the corner with Kh8; Qg6 stalemates.
pub const STALEMATE_FEN: &str = "8/5K1k/8/8/6Q1/8/8/8 b - - 0 1";

/// Engine scripted for the smothered mate line.
pub fn smothered_mate_engine() -> ScriptedEngine {
    let start = position(SMOTHERED_MATE_FEN);
    let root = play(&start, &["a7a6"]);
    ScriptedEngine::new()
        .script(&root, &[("d5g8", Score::Mate(2))])
        .script(&play(&root, &["d5g8"]), &[("f8g8", Score::Mate(-1))])
        .script(&play(&root, &["d5g8", "f8g8"]), &[("h6f7", Score::Mate(1))])
}

/// Engine scripted for the hanging knight line: two winning moves after the capture.
pub fn hanging_knight_engine() -> ScriptedEngine {
    let start = position(HANGING_KNIGHT_FEN);
    let root = play(&start, &["b5d4"]);
    ScriptedEngine::new()
        .script(&root, &[("d1d4", Score::Cp(300))])
        .script(&play(&root, &["d1d4"]), &[("g8f8", Score::Cp(-300))])
        .script(
            &play(&root, &["d1d4", "g8f8"]),
            &[("c2b3", Score::Cp(320)), ("g1f1", Score::Cp(310))],
        )
}
