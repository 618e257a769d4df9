//! UCI engine driver (Stockfish and compatibles) over blocking I/O

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use chess_core::{position, Score};
use shakmaty::Chess;
use tracing::debug;

use super::{AnalysisEngine, PvLine, SearchResult};
use crate::error::PuzzleError;

/// UCI engine session. Works over any line-oriented reader/writer pair;
/// `spawn` wires it to a local engine process.
pub struct UciEngine<R, W> {
    reader: R,
    writer: W,
    process: Option<Child>,
    /// Lines requested by the last `MultiPV` option; higher indices are ignored
    multipv: usize,
}

impl UciEngine<BufReader<ChildStdout>, ChildStdin> {
    /// Spawn an engine binary and complete the UCI handshake
    pub fn spawn(path: &str) -> Result<Self, PuzzleError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PuzzleError::Engine(format!("Failed to spawn engine at {path}: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| PuzzleError::Engine("Engine process has no stdin".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| PuzzleError::Engine("Engine process has no stdout".into()))?;

        let mut engine = Self {
            reader: BufReader::new(stdout),
            writer: stdin,
            process: Some(process),
            multipv: 1,
        };
        engine.handshake()?;
        Ok(engine)
    }
}

impl<R: BufRead, W: Write> UciEngine<R, W> {
    /// Wrap already-connected streams. Call `handshake` before searching.
    pub fn from_streams(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            process: None,
            multipv: 1,
        }
    }

    /// `uci`/`uciok` then `isready`/`readyok`
    pub fn handshake(&mut self) -> Result<(), PuzzleError> {
        self.send("uci")?;
        self.wait_for("uciok")?;
        self.send("isready")?;
        self.wait_for("readyok")
    }

    /// Send quit and wait for a spawned process to exit
    pub fn quit(&mut self) {
        let _ = self.send("quit");
        if let Some(mut process) = self.process.take() {
            let _ = process.wait();
        }
    }

    fn send(&mut self, cmd: &str) -> Result<(), PuzzleError> {
        debug!(cmd, "UCI <");
        writeln!(self.writer, "{cmd}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, PuzzleError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(PuzzleError::Engine("Engine closed its output".into()));
        }
        let trimmed = line.trim().to_string();
        debug!(line = %trimmed, "UCI >");
        Ok(trimmed)
    }

    fn wait_for(&mut self, expected: &str) -> Result<(), PuzzleError> {
        loop {
            if self.read_line()? == expected {
                return Ok(());
            }
        }
    }
}

impl<R: BufRead, W: Write> AnalysisEngine for UciEngine<R, W> {
    fn set_position(&mut self, position: &Chess) -> Result<(), PuzzleError> {
        self.send(&format!("position fen {}", position::fen(position)))
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), PuzzleError> {
        self.send(&format!("setoption name {name} value {value}"))?;
        if name.eq_ignore_ascii_case("MultiPV") {
            self.multipv = value.trim().parse::<usize>().unwrap_or(1).max(1);
        }
        Ok(())
    }

    fn search(&mut self, depth: u32) -> Result<SearchResult, PuzzleError> {
        self.send(&format!("go depth {depth}"))?;

        let mut lines: Vec<PvLine> = Vec::new();
        loop {
            let line = self.read_line()?;

            if line.starts_with("info") && line.contains(" pv ") {
                // Parse multipv index (1-based); later depths overwrite earlier ones
                let idx = parse_multipv_index(&line).unwrap_or(1).max(1) as usize - 1;
                if idx >= self.multipv {
                    debug!(idx, multipv = self.multipv, "Ignoring out-of-range multipv line");
                    continue;
                }
                if lines.len() <= idx {
                    lines.resize(idx + 1, PvLine::default());
                }
                let entry = &mut lines[idx];
                entry.score = Score::from_uci(parse_cp(&line), parse_mate(&line));
                entry.pv = parse_pv(&line);
            } else if line.starts_with("bestmove") {
                return Ok(SearchResult {
                    best_move: parse_bestmove(&line),
                    lines,
                });
            }
        }
    }
}

impl<R, W> Drop for UciEngine<R, W> {
    fn drop(&mut self) {
        if let Some(process) = self.process.as_mut() {
            let _ = process.kill();
        }
    }
}

/// Value following `key` in a whitespace-separated info line
fn parse_field<T: std::str::FromStr>(line: &str, key: &str) -> Option<T> {
    let mut parts = line.split_whitespace();
    while let Some(part) = parts.next() {
        if part == key {
            return parts.next().and_then(|v| v.parse().ok());
        }
    }
    None
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    parse_field(line, "cp")
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    parse_field(line, "mate")
}

/// Parse multipv index from info line
fn parse_multipv_index(line: &str) -> Option<u32> {
    parse_field(line, "multipv")
}

/// Parse PV moves from info line
fn parse_pv(line: &str) -> Vec<String> {
    line.split_whitespace()
        .skip_while(|part| *part != "pv")
        .skip(1)
        .take_while(|part| !part.starts_with("bmc") && *part != "string")
        .map(str::to_string)
        .collect()
}

/// Parse the move from a bestmove line; `(none)` and `0000` mean no move
fn parse_bestmove(line: &str) -> Option<String> {
    match line.split_whitespace().nth(1) {
        Some("(none)") | Some("0000") | None => None,
        Some(mv) => Some(mv.to_string()),
    }
}
