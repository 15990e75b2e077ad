/*
 * 走法合法性判定
 *
 * 两个层次的判断，互不递归：
 * - can_reach: 只看几何走法与路径阻挡（以及不能吃己方棋子），用于将军检测
 * - check_move / is_legal_move: can_reach + 走子后己方王不能被将军
 *
 * 走子模拟都在棋盘副本上进行，调用方的棋盘不会被修改
 */
use crate::board::{in_board, Board, Color, Piece, PieceKind, Square};
use crate::check::is_in_check;
use crate::error::MoveError;
use crate::history::apply_move;

/// Geometry, path and no-self-capture only. Does not look at whether the
/// mover's own king ends up attacked.
pub fn can_reach(board: &Board, from: Square, to: Square) -> bool {
    reach(board, from, to).is_ok()
}

pub fn is_legal_move(board: &Board, color: Color, from: Square, to: Square) -> bool {
    check_move(board, color, from, to).is_ok()
}

// 检查走子是否合法（包括规则和将军检查），返回拒绝原因
pub fn check_move(board: &Board, color: Color, from: Square, to: Square) -> Result<(), MoveError> {
    if !in_board(from) || !in_board(to) {
        return Err(MoveError::OutOfBounds);
    }
    // 起手位置必须是走棋方的棋子
    if !board.piece_at(from).belong_to(color) {
        return Err(MoveError::EmptySelection);
    }
    reach(board, from, to)?;

    // 走子后是否被将军，若将军则不合法
    let mut temp_board = board.clone();
    apply_move(&mut temp_board, from, to);
    if is_in_check(&temp_board, color) {
        return Err(MoveError::LeavesKingInCheck);
    }
    Ok(())
}

pub fn legal_targets(board: &Board, color: Color, from: Square) -> Vec<Square> {
    if !board.piece_at(from).belong_to(color) {
        return vec![];
    }
    Square::all()
        .filter(|&to| is_legal_move(board, color, from, to))
        .collect()
}

pub fn legal_moves(board: &Board, color: Color) -> Vec<(Square, Square)> {
    board
        .pieces(color)
        .flat_map(|(from, _)| {
            legal_targets(board, color, from)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

fn reach(board: &Board, from: Square, to: Square) -> Result<(), MoveError> {
    if !in_board(from) || !in_board(to) {
        return Err(MoveError::OutOfBounds);
    }
    let piece = board.piece_at(from);
    if piece.is_empty() {
        return Err(MoveError::EmptySelection);
    }
    if from == to {
        return Err(MoveError::GeometricallyIllegal);
    }
    // 目标格子若有同色棋子则不可走
    if board.piece_at(to).belong_to(piece.color) {
        return Err(MoveError::SelfCapture);
    }
    if is_move_valid_for_piece(board, piece, from, to) {
        Ok(())
    } else {
        Err(MoveError::GeometricallyIllegal)
    }
}

fn is_move_valid_for_piece(board: &Board, piece: Piece, from: Square, to: Square) -> bool {
    let row_diff = (to.row - from.row).abs();
    let col_diff = (to.col - from.col).abs();
    match piece.kind {
        PieceKind::Empty => false,
        PieceKind::Pawn => is_pawn_move_valid(board, piece.color, from, to),
        PieceKind::Knight => (row_diff == 2 && col_diff == 1) || (row_diff == 1 && col_diff == 2),
        PieceKind::Bishop => is_diagonal_clear(board, from, to),
        PieceKind::Rook => is_line_clear(board, from, to),
        PieceKind::Queen => is_line_clear(board, from, to) || is_diagonal_clear(board, from, to),
        PieceKind::King => row_diff <= 1 && col_diff <= 1,
    }
}

fn is_diagonal_clear(board: &Board, from: Square, to: Square) -> bool {
    (to.row - from.row).abs() == (to.col - from.col).abs() && !board.has_piece_between(from, to)
}

fn is_line_clear(board: &Board, from: Square, to: Square) -> bool {
    ((from.row == to.row) != (from.col == to.col)) && !board.has_piece_between(from, to)
}

// 兵：向前一步到空格；起始行可以向前两步（中间与终点都为空）；斜前一步只能吃子
fn is_pawn_move_valid(board: &Board, color: Color, from: Square, to: Square) -> bool {
    let forward = color.pawn_direction();
    let row_step = to.row - from.row;
    let col_diff = (to.col - from.col).abs();
    let target = board.piece_at(to);

    match (row_step, col_diff) {
        (r, 0) if r == forward => target.is_empty(),
        (r, 0) if r == 2 * forward => {
            color.pawn_start_row() == Some(from.row)
                && board.piece_at(from.offset(forward, 0)).is_empty()
                && target.is_empty()
        }
        (r, 1) if r == forward => target.is_enemy_of(color),
        _ => false,
    }
}
