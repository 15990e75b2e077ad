/* 走子被拒绝的原因，以及记谱文本的解析错误 */
use thiserror::Error;

/// 非法走子的分类。所有错误都只是"拒绝"，不会改变棋盘。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("square is off the board")]
    OutOfBounds,
    #[error("destination holds a piece of the same color")]
    SelfCapture,
    #[error("piece cannot move that way")]
    GeometricallyIllegal,
    #[error("move would leave the king in check")]
    LeavesKingInCheck,
    #[error("no piece of the side to move on the source square")]
    EmptySelection,
    #[error("game is already over")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid square: {0}")]
    InvalidSquare(String),
    #[error("invalid move: {0}")]
    InvalidMove(String),
    #[error("invalid FEN placement: {0}")]
    InvalidFen(String),
}
