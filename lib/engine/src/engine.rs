/* 文本协议：一行一条命令，驱动 Game，供命令行或其他程序调用 */
use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::board::{Board, Color, Square};
use crate::error::NotationError;
use crate::check::attackers;
use crate::game::{CheckStatus, ClickOutcome, Game, GameConfig, MoveOutcome, Phase};
use crate::rules::legal_moves;

static POSITION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:fen (?P<fen>[pnbrqkPNBRQK1-8/]+)(?: (?P<turn>[wb]))?(?: [KQkq-]+ [a-h1-8-]+ \d+ \d+)?|(?P<startpos>startpos))(?: moves (?P<moves>[a-h][1-8][a-h][1-8](?: [a-h][1-8][a-h][1-8])*))?$"#,
    )
    .expect("position regex is valid")
});

/// Parses a move in coordinate notation, e.g. `e2e4`.
pub fn parse_move(m: &str) -> Result<(Square, Square), NotationError> {
    if m.len() != 4 || !m.is_ascii() {
        return Err(NotationError::InvalidMove(m.to_owned()));
    }
    let (from_str, to_str) = m.split_at(2);
    let from: Square = from_str
        .parse()
        .map_err(|_| NotationError::InvalidMove(m.to_owned()))?;
    let to: Square = to_str
        .parse()
        .map_err(|_| NotationError::InvalidMove(m.to_owned()))?;
    Ok((from, to))
}

// 裁判：保存当前对局，逐行执行命令
pub struct Referee {
    pub game: Game,
    config: GameConfig,
}

impl Referee {
    pub fn new(config: GameConfig) -> Self {
        Referee {
            game: Game::new(config),
            config,
        }
    }

    pub fn start<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if !self.execute(line.trim(), output)? {
                break;
            }
            output.flush()?;
        }
        Ok(())
    }

    /// Runs one command. Returns `false` once `quit` was received.
    pub fn execute<W: Write>(&mut self, cmd: &str, out: &mut W) -> io::Result<bool> {
        if cmd.is_empty() {
            return Ok(true);
        }
        debug!(cmd, "command");
        let mut token = cmd.splitn(2, ' ');
        let name = token.next().unwrap_or_default();
        let arg = token.next().map(str::trim);
        match (name, arg) {
            ("quit", _) => {
                writeln!(out, "bye")?;
                return Ok(false);
            }
            ("isready", _) => writeln!(out, "readyok")?,
            ("position", Some(param)) => self.position(param, out)?,
            ("move", Some(m)) => self.play(m, out)?,
            ("click", Some(pos)) => self.click(pos, out)?,
            ("undo", _) => match self.game.undo() {
                Some(record) => writeln!(out, "undo {record} turn {}", self.game.current_turn())?,
                None => writeln!(out, "nothing to undo")?,
            },
            ("redo", _) => match self.game.redo() {
                Some(record) => writeln!(out, "redo {record} turn {}", self.game.current_turn())?,
                None => writeln!(out, "nothing to redo")?,
            },
            ("board", _) => write!(out, "{}", self.game.board())?,
            ("fen", _) => writeln!(out, "{} {}", self.game.board().to_fen(), turn_char(self.game.current_turn()))?,
            ("legal", arg) => self.legal(arg, out)?,
            ("status", _) => self.status(out)?,
            _ => {
                warn!(cmd, "unsupported command");
                writeln!(out, "not support: {cmd}")?;
            }
        }
        Ok(true)
    }

    fn position<W: Write>(&mut self, param: &str, out: &mut W) -> io::Result<()> {
        let Some(captures) = POSITION_REGEX.captures(param) else {
            return writeln!(out, "error invalid position: {param}");
        };
        if let Some(fen) = captures.name("fen") {
            let board = match Board::from_fen(fen.as_str()) {
                Ok(board) => board,
                Err(err) => return writeln!(out, "error {err}"),
            };
            let turn = match captures.name("turn").map(|t| t.as_str()) {
                Some("b") => Color::Black,
                _ => Color::White,
            };
            self.game = Game::from_board(board, turn, self.config);
        }
        if captures.name("startpos").is_some() {
            self.game = Game::new(self.config);
        }
        if let Some(moves) = captures.name("moves") {
            for m in moves.as_str().split(' ') {
                // 遇到非法走子就停下，后面的不再执行
                if let Some(reason) = self.play_quietly(m) {
                    return writeln!(out, "rejected {m} {reason}");
                }
            }
        }
        Ok(())
    }

    fn play_quietly(&mut self, m: &str) -> Option<String> {
        match parse_move(m) {
            Ok((from, to)) => match self.game.attempt_move(from, to) {
                MoveOutcome::Accepted { .. } => None,
                MoveOutcome::Rejected(reason) => Some(reason.to_string()),
            },
            Err(err) => Some(err.to_string()),
        }
    }

    fn play<W: Write>(&mut self, m: &str, out: &mut W) -> io::Result<()> {
        match parse_move(m) {
            Ok((from, to)) => {
                let outcome = self.game.attempt_move(from, to);
                write_outcome(out, &outcome)
            }
            Err(err) => writeln!(out, "error {err}"),
        }
    }

    fn click<W: Write>(&mut self, pos: &str, out: &mut W) -> io::Result<()> {
        let square: Square = match pos.parse() {
            Ok(square) => square,
            Err(err) => return writeln!(out, "error {err}"),
        };
        match self.game.click(square) {
            ClickOutcome::Selected(square) => writeln!(out, "selected {square}"),
            ClickOutcome::Cleared => writeln!(out, "cleared"),
            ClickOutcome::Ignored => writeln!(out, "ignored {square}"),
            ClickOutcome::Moved(outcome) => write_outcome(out, &outcome),
        }
    }

    fn legal<W: Write>(&mut self, arg: Option<&str>, out: &mut W) -> io::Result<()> {
        let moves: Vec<String> = match arg {
            Some(pos) => {
                let from: Square = match pos.parse() {
                    Ok(square) => square,
                    Err(err) => return writeln!(out, "error {err}"),
                };
                self.game
                    .legal_targets(from)
                    .into_iter()
                    .map(|to| format!("{from}{to}"))
                    .collect()
            }
            None if self.game.is_over() => vec![],
            None => legal_moves(self.game.board(), self.game.current_turn())
                .into_iter()
                .map(|(from, to)| format!("{from}{to}"))
                .collect(),
        };
        if moves.is_empty() {
            writeln!(out, "legal none")
        } else {
            writeln!(out, "legal {}", moves.join(" "))
        }
    }

    fn status<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let turn = self.game.current_turn();
        let mut line = match self.game.phase() {
            Phase::GameOver { mated } => return writeln!(out, "gameover {mated} mated"),
            _ => format!("turn {turn} {}", self.game.status()),
        };
        // 被将军时列出攻击王的棋子
        if self.game.status() == CheckStatus::Check {
            let squares: Vec<String> = attackers(self.game.board(), turn)
                .iter()
                .map(Square::to_string)
                .collect();
            line.push_str(&format!(" attackers {}", squares.join(" ")));
        }
        if let Some(square) = self.game.selected() {
            line.push_str(&format!(" selected {square}"));
        }
        writeln!(out, "{line}")
    }
}

impl Default for Referee {
    fn default() -> Self {
        Referee::new(GameConfig::default())
    }
}

fn turn_char(color: Color) -> char {
    if color == Color::Black {
        'b'
    } else {
        'w'
    }
}

fn write_outcome<W: Write>(out: &mut W, outcome: &MoveOutcome) -> io::Result<()> {
    match outcome {
        MoveOutcome::Accepted { record, turn, status } => {
            writeln!(out, "accepted {record} turn {turn} {status}")
        }
        MoveOutcome::Rejected(reason) => writeln!(out, "rejected {reason}"),
    }
}
