use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::{Color, Position};
use crate::chess_match::ChessMatch;
use crate::error::MatchError;
use crate::movegen::MoveSet;
use crate::notation::{parse_position, Square};
use crate::piece::Piece;
use crate::setup::Setup;

#[derive(Debug, Clone, Default)]
pub struct ConsoleOptions {
    pub setup: Setup,
    /// Side played by the computer, if any.
    pub computer: Option<Color>,
    /// Seed for the computer's move choice. Random when unset.
    pub seed: Option<u64>,
}

enum Flow {
    Continue,
    Quit,
}

pub fn render_board(chess_match: &ChessMatch, highlight: Option<&MoveSet>) -> String {
    let board = chess_match.board();
    let mut result = String::new();
    for row in 0..board.rows() {
        result.push_str(&format!("{} ", board.rows() - row));
        for column in 0..board.columns() {
            let pos = Position::new(row, column);
            let symbol = match chess_match.piece_at(pos) {
                Some(piece) => piece.symbol(),
                None if highlight.map_or(false, |moves| moves.contains(pos)) => '*',
                None => '-',
            };
            result.push(symbol);
            result.push(' ');
        }
        result.push('\n');
    }
    result.push_str("  ");
    for column in 0..board.columns() {
        result.push((b'a' + column) as char);
        result.push(' ');
    }
    result.push('\n');
    result
}

fn symbols(pieces: &[&Piece]) -> String {
    let symbols: Vec<String> = pieces.iter().map(|piece| piece.symbol().to_string()).collect();
    format!("[{}]", symbols.join(" "))
}

pub fn render_status(chess_match: &ChessMatch) -> String {
    let mut result = String::new();
    result.push_str("Captured pieces:\n");
    result.push_str(&format!("White: {}\n", symbols(&chess_match.captured_by_color(Color::White))));
    result.push_str(&format!("Black: {}\n", symbols(&chess_match.captured_by_color(Color::Black))));
    result.push_str(&format!("Turn: {}\n", chess_match.turn()));
    match chess_match.winner() {
        Some(winner) => {
            result.push_str("CHECKMATE!\n");
            result.push_str(&format!("Winner: {}\n", winner));
        }
        None => {
            result.push_str(&format!("Waiting for {}\n", chess_match.active_color()));
            if chess_match.in_check() {
                result.push_str("CHECK!\n");
            }
        }
    }
    result
}

pub struct Console<R, W> {
    chess_match: ChessMatch,
    reader: R,
    writer: W,
    computer: Option<Color>,
    rng: StdRng,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W, options: ConsoleOptions) -> Result<Self, MatchError> {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            chess_match: ChessMatch::with_setup(options.setup)?,
            reader,
            writer,
            computer: options.computer,
            rng,
        })
    }

    pub fn chess_match(&self) -> &ChessMatch {
        &self.chess_match
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            let screen = format!(
                "\n{}\n{}",
                render_board(&self.chess_match, None),
                render_status(&self.chess_match)
            );
            self.writer.write_all(screen.as_bytes())?;
            if self.chess_match.is_terminated() {
                break;
            }

            let flow = if self.computer == Some(self.chess_match.active_color()) {
                self.computer_turn()?
            } else {
                self.human_turn()?
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.writer, "{}", text)?;
        self.writer.flush()?;
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).context("failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn reject(&mut self, err: MatchError) -> Result<Flow> {
        if err.is_fatal() {
            return Err(err).context("the match cannot continue");
        }
        debug!(%err, "input rejected");
        writeln!(self.writer, "Error: {}", err)?;
        Ok(Flow::Continue)
    }

    fn read_position(&mut self, text: &str) -> Result<Option<String>> {
        match self.prompt(text)? {
            Some(input) if input.eq_ignore_ascii_case("quit") => Ok(None),
            other => Ok(other),
        }
    }

    fn human_turn(&mut self) -> Result<Flow> {
        let Some(input) = self.read_position("Origin: ")? else {
            return Ok(Flow::Quit);
        };
        let origin = match self.origin(&input) {
            Ok(origin) => origin,
            Err(err) => return self.reject(err),
        };

        let moves = match self.chess_match.possible_moves(origin) {
            Ok(moves) => moves,
            Err(err) => return self.reject(err),
        };
        let screen = format!("\n{}\n", render_board(&self.chess_match, Some(&moves)));
        self.writer.write_all(screen.as_bytes())?;

        let Some(input) = self.read_position("Destination: ")? else {
            return Ok(Flow::Quit);
        };
        match self.destination(origin, &input) {
            Ok(()) => Ok(Flow::Continue),
            Err(err) => self.reject(err),
        }
    }

    fn origin(&self, input: &str) -> Result<Position, MatchError> {
        let origin = parse_position(input, self.chess_match.board())?;
        self.chess_match.validate_origin(origin)?;
        Ok(origin)
    }

    fn destination(&mut self, origin: Position, input: &str) -> Result<(), MatchError> {
        let destination = parse_position(input, self.chess_match.board())?;
        self.chess_match.validate_destination(origin, destination)?;
        self.chess_match.play_move(origin, destination)
    }

    fn computer_turn(&mut self) -> Result<Flow> {
        let color = self.chess_match.active_color();
        let moves = match self.chess_match.legal_moves() {
            Ok(moves) => moves,
            Err(err) => return self.reject(err),
        };
        let Some(&(origin, destination)) = moves.choose(&mut self.rng) else {
            writeln!(self.writer, "No moves left for {}", color)?;
            return Ok(Flow::Quit);
        };

        let board = self.chess_match.board();
        let from = Square::from_position(origin, board).map(|s| s.to_string()).unwrap_or_default();
        let to = Square::from_position(destination, board).map(|s| s.to_string()).unwrap_or_default();
        info!(%color, %from, %to, "computer move");
        writeln!(self.writer, "Computer plays {} {}", from, to)?;

        match self.chess_match.play_move(origin, destination) {
            Ok(()) => Ok(Flow::Continue),
            Err(err) => self.reject(err),
        }
    }
}
