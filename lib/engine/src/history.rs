/*
 * 走子执行与悔棋记录
 *
 * - apply_move 无条件地把起点的棋子移到终点（覆盖被吃的子），返回可以撤销的 MoveRecord
 * - revert_move 按记录把棋盘恢复到走子之前
 * - History 保存两个有容量上限的栈（undo / redo），新走子会清空 redo 栈，
 *   超过容量时丢弃最早的一条 undo 记录
 *
 * 这里不做任何合法性判断，调用方（Game）负责先校验
 */
use std::collections::VecDeque;
use std::fmt;

use tracing::warn;

use crate::board::{Board, Color, Piece, Square};
use crate::constant::HISTORY_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub moved_piece: Piece,    // 走的子
    pub from: Square,          // 起手位置
    pub to: Square,            // 落子位置
    pub captured_piece: Piece, // 这一步吃的子，可能是空
}

impl MoveRecord {
    pub fn player(&self) -> Color {
        self.moved_piece.color
    }

    pub fn is_capture(&self) -> bool {
        !self.captured_piece.is_empty()
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

pub fn apply_move(board: &mut Board, from: Square, to: Square) -> MoveRecord {
    let moved_piece = board.piece_at(from);
    let captured_piece = board.piece_at(to);
    board.clear(from);
    board.set_piece(to, moved_piece);
    MoveRecord {
        moved_piece,
        from,
        to,
        captured_piece,
    }
}

pub fn revert_move(board: &mut Board, record: &MoveRecord) {
    board.set_piece(record.from, record.moved_piece);
    board.set_piece(record.to, record.captured_piece);
}

fn replay_move(board: &mut Board, record: &MoveRecord) {
    board.clear(record.from);
    board.set_piece(record.to, record.moved_piece);
}

#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<MoveRecord>,
    redo_stack: VecDeque<MoveRecord>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        History {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity,
        }
    }

    /// Records a freshly played move. Any redo history is discarded; when the
    /// undo stack is full the oldest record is dropped.
    pub fn push(&mut self, record: MoveRecord) {
        self.redo_stack.clear();
        Self::push_bounded(&mut self.undo_stack, record, self.capacity);
    }

    pub fn undo(&mut self, board: &mut Board) -> Option<MoveRecord> {
        let record = self.undo_stack.pop_back()?;
        revert_move(board, &record);
        Self::push_bounded(&mut self.redo_stack, record, self.capacity);
        Some(record)
    }

    pub fn redo(&mut self, board: &mut Board) -> Option<MoveRecord> {
        let record = self.redo_stack.pop_back()?;
        replay_move(board, &record);
        Self::push_bounded(&mut self.undo_stack, record, self.capacity);
        Some(record)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn last(&self) -> Option<&MoveRecord> {
        self.undo_stack.back()
    }

    // 从最早到最近
    pub fn moves(&self) -> impl Iterator<Item = &MoveRecord> {
        self.undo_stack.iter()
    }

    fn push_bounded(stack: &mut VecDeque<MoveRecord>, record: MoveRecord, capacity: usize) {
        stack.push_back(record);
        while stack.len() > capacity {
            if let Some(evicted) = stack.pop_front() {
                warn!(%evicted, capacity, "move history full, dropping oldest record");
            }
        }
    }
}

impl Default for History {
    fn default() -> Self {
        History::new(HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use crate::board::*;
    use crate::history::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_apply_and_revert() {
        let mut board = Board::from_fen("4k3/8/8/3p4/4N3/8/8/4K3").unwrap();
        let before = board.clone();
        let record = apply_move(&mut board, sq("e4"), sq("d5"));
        assert_eq!(record.moved_piece, Piece::new(PieceKind::Knight, Color::White));
        assert_eq!(record.captured_piece, Piece::new(PieceKind::Pawn, Color::Black));
        assert!(record.is_capture());
        assert_eq!(record.to_string(), "e4d5");
        assert!(!board.is_occupied(sq("e4")));
        assert_eq!(board.piece_at(sq("d5")).kind, PieceKind::Knight);

        revert_move(&mut board, &record);
        assert_eq!(board, before);
    }

    #[test]
    fn test_undo_redo() {
        let mut board = Board::init();
        let mut history = History::default();
        let start = board.clone();

        history.push(apply_move(&mut board, sq("e2"), sq("e4")));
        history.push(apply_move(&mut board, sq("e7"), sq("e5")));
        let after = board.clone();

        assert_eq!(history.undo(&mut board).map(|r| r.to_string()), Some("e7e5".to_owned()));
        assert_eq!(history.undo(&mut board).map(|r| r.to_string()), Some("e2e4".to_owned()));
        assert_eq!(board, start);
        assert!(history.undo(&mut board).is_none());
        assert_eq!(board, start);

        history.redo(&mut board);
        history.redo(&mut board);
        assert_eq!(board, after);
        assert!(history.redo(&mut board).is_none());
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut board = Board::init();
        let mut history = History::default();
        history.push(apply_move(&mut board, sq("e2"), sq("e4")));
        history.undo(&mut board);
        assert!(history.can_redo());

        history.push(apply_move(&mut board, sq("d2"), sq("d4")));
        assert!(!history.can_redo());
        assert!(history.redo(&mut board).is_none());
        assert_eq!(history.last().map(|r| r.from), Some(sq("d2")));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3").unwrap();
        let mut history = History::new(HISTORY_CAPACITY);
        // 车在 a1/a2 之间来回走，推入 257 条记录
        for i in 0..=HISTORY_CAPACITY {
            let (from, to) = if i % 2 == 0 { (sq("a1"), sq("a2")) } else { (sq("a2"), sq("a1")) };
            history.push(apply_move(&mut board, from, to));
        }
        assert_eq!(history.undo_len(), HISTORY_CAPACITY);
        // 最早的 a1a2 被丢弃，现在最早的是 a2a1
        assert_eq!(history.moves().next().map(|r| r.from), Some(sq("a2")));

        let mut undone = 0;
        while history.undo(&mut board).is_some() {
            undone += 1;
        }
        assert_eq!(undone, HISTORY_CAPACITY);
        assert_eq!(history.redo_len(), HISTORY_CAPACITY);
        // 无法再回到最初局面，车停在 a2
        assert_eq!(board.piece_at(sq("a2")).kind, PieceKind::Rook);
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut board = Board::init();
        let mut history = History::new(0);
        history.push(apply_move(&mut board, sq("e2"), sq("e4")));
        assert!(!history.can_undo());
        assert!(history.undo(&mut board).is_none());
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut board = Board::init();
        let mut history = History::new(usize::MAX);
        history.push(apply_move(&mut board, sq("e2"), sq("e4")));
        assert_eq!(history.undo_len(), 1);
        assert!(history.undo(&mut board).is_some());
        assert_eq!(board, Board::init());
    }
}
