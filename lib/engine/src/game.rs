/*
 * 对局控制（走棋方、两次点击选子/落子、悔棋与重做）
 *
 * 状态机
 * - WaitingForSelection: 点击己方棋子 -> PieceSelected
 * - PieceSelected: 点击己方另一枚棋子则改选，点击同一格取消，否则尝试走子
 * - GameOver: 一方被将死，之后的走子全部拒绝（悔棋可以回到对局中）
 *
 * Game 独占棋盘与历史记录，棋盘只通过 apply_move / revert_move / History 修改
 */
use std::fmt;

use tracing::{debug, info};

use crate::board::{Board, Color, Square};
use crate::check::{attackers, is_checkmate, is_in_check};
use crate::constant::HISTORY_CAPACITY;
use crate::error::MoveError;
use crate::history::{apply_move, revert_move, History, MoveRecord};
use crate::rules::{check_move, legal_targets};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub history_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForSelection,
    PieceSelected(Square),
    GameOver { mated: Color },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Normal,
    Check,
    Checkmate,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Normal => write!(f, "normal"),
            CheckStatus::Check => write!(f, "check"),
            CheckStatus::Checkmate => write!(f, "checkmate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted {
        record: MoveRecord,
        turn: Color, // 走完之后轮到的一方
        status: CheckStatus,
    },
    Rejected(MoveError),
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Square),
    Cleared,
    Ignored,
    Moved(MoveOutcome),
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: History,
    turn: Color, // 当前走棋方只会是白或黑
    phase: Phase,
}

impl Game {
    pub fn init() -> Self {
        Game::new(GameConfig::default())
    }

    pub fn new(config: GameConfig) -> Self {
        Game::from_board(Board::init(), Color::White, config)
    }

    pub fn from_board(board: Board, turn: Color, config: GameConfig) -> Self {
        let turn = if turn == Color::None { Color::White } else { turn };
        let mut game = Game {
            board,
            history: History::new(config.history_capacity),
            turn,
            phase: Phase::WaitingForSelection,
        };
        game.refresh_phase();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_turn(&self) -> Color {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> Option<Square> {
        match self.phase {
            Phase::PieceSelected(square) => Some(square),
            _ => None,
        }
    }

    pub fn status(&self) -> CheckStatus {
        status_of(&self.board, self.turn)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        if self.is_over() {
            return vec![];
        }
        legal_targets(&self.board, self.turn, from)
    }

    // 点击棋盘上的一个格子
    pub fn click(&mut self, pos: Square) -> ClickOutcome {
        match self.phase {
            Phase::GameOver { .. } => ClickOutcome::Ignored,
            Phase::WaitingForSelection => {
                if self.select(pos) {
                    ClickOutcome::Selected(pos)
                } else {
                    ClickOutcome::Ignored
                }
            }
            Phase::PieceSelected(from) => {
                if from == pos {
                    self.phase = Phase::WaitingForSelection;
                    ClickOutcome::Cleared
                } else if self.select(pos) {
                    ClickOutcome::Selected(pos)
                } else {
                    ClickOutcome::Moved(self.attempt_move(from, pos))
                }
            }
        }
    }

    fn select(&mut self, pos: Square) -> bool {
        if self.board.piece_at(pos).belong_to(self.turn) {
            self.phase = Phase::PieceSelected(pos);
            return true;
        }
        false
    }

    /// Validates and plays `from -> to` for the side to move. On rejection
    /// the board and the turn are left exactly as they were.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> MoveOutcome {
        if self.is_over() {
            return self.reject(from, to, MoveError::GameOver);
        }
        self.phase = Phase::WaitingForSelection;

        if let Err(reason) = check_move(&self.board, self.turn, from, to) {
            return self.reject(from, to, reason);
        }

        let record = apply_move(&mut self.board, from, to);
        // 再确认一次走子后己方王是否安全
        if is_in_check(&self.board, self.turn) {
            revert_move(&mut self.board, &record);
            return self.reject(from, to, MoveError::LeavesKingInCheck);
        }

        self.history.push(record);
        self.turn = self.turn.next(); // 改变走棋方
        let status = self.refresh_phase();
        match status {
            CheckStatus::Checkmate => info!(%record, mated = %self.turn, "checkmate"),
            CheckStatus::Check => {
                info!(%record, turn = %self.turn, attackers = ?attackers(&self.board, self.turn), "check")
            }
            CheckStatus::Normal => info!(%record, turn = %self.turn, "move accepted"),
        }
        MoveOutcome::Accepted {
            record,
            turn: self.turn,
            status,
        }
    }

    // 悔棋：撤回最后一步，轮到走这一步的一方重新走
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.undo(&mut self.board)?;
        self.turn = record.player();
        self.refresh_phase();
        debug!(%record, turn = %self.turn, "undo");
        Some(record)
    }

    pub fn redo(&mut self) -> Option<MoveRecord> {
        let record = self.history.redo(&mut self.board)?;
        self.turn = record.player().next();
        self.refresh_phase();
        debug!(%record, turn = %self.turn, "redo");
        Some(record)
    }

    fn reject(&mut self, from: Square, to: Square, reason: MoveError) -> MoveOutcome {
        if !self.is_over() {
            self.phase = Phase::WaitingForSelection;
        }
        debug!(%from, %to, turn = %self.turn, %reason, "move rejected");
        MoveOutcome::Rejected(reason)
    }

    fn refresh_phase(&mut self) -> CheckStatus {
        let status = status_of(&self.board, self.turn);
        self.phase = if status == CheckStatus::Checkmate {
            Phase::GameOver { mated: self.turn }
        } else {
            Phase::WaitingForSelection
        };
        status
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::init()
    }
}

fn status_of(board: &Board, color: Color) -> CheckStatus {
    if is_checkmate(board, color) {
        CheckStatus::Checkmate
    } else if is_in_check(board, color) {
        CheckStatus::Check
    } else {
        CheckStatus::Normal
    }
}
