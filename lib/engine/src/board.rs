/*
 * 国际象棋棋盘模块（Board 与棋子表示）
 *
 * 设计要点
 * - 棋盘尺寸为 8 x 8，第 0 行是白方底线，第 7 行是黑方底线
 * - 白方兵从第 1 行出发向上走，黑方兵从第 6 行出发向下走
 * - 棋子用 Piece { kind, color } 表示；PieceKind::Empty + Color::None 表示空格
 * - 每个格子 Cell 记录自己的坐标、是否有子以及棋子本身；occupied 与
 *   piece.kind != Empty 必须始终一致，只有 set_piece 能修改格子
 * - Square 是棋盘坐标 (row, col)，文本形式为 "e2"（列 a..h，行 1..8）
 *
 * 主要功能
 * - 空棋盘、标准开局、从 FEN 棋子布局字段加载局面
 * - 按坐标读写棋子、查找王的位置、判断两点之间是否有阻挡
 */

use std::fmt;
use std::str::FromStr;

use crate::constant::{BACK_RANK, BLACK_PAWN_ROW, BOARD_SIZE, FEN_MAP, WHITE_PAWN_ROW};
use crate::error::NotationError;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PieceKind {
    Empty,
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    // FEN 中的小写字母，空格没有对应字母
    pub fn fen_char(&self) -> Option<char> {
        match self {
            PieceKind::Empty => None,
            PieceKind::Pawn => Some('p'),
            PieceKind::Knight => Some('n'),
            PieceKind::Bishop => Some('b'),
            PieceKind::Rook => Some('r'),
            PieceKind::Queen => Some('q'),
            PieceKind::King => Some('k'),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    None,
    White,
    Black,
}

impl Color {
    pub fn next(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            Color::None => Color::None,
        }
    }

    // 兵前进的方向：白方 +1，黑方 -1
    pub fn pawn_direction(&self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
            Color::None => 0,
        }
    }

    pub fn pawn_start_row(&self) -> Option<i32> {
        match self {
            Color::White => Some(WHITE_PAWN_ROW),
            Color::Black => Some(BLACK_PAWN_ROW),
            Color::None => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
            Color::None => write!(f, "none"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const EMPTY: Piece = Piece {
        kind: PieceKind::Empty,
        color: Color::None,
    };

    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == PieceKind::Empty
    }

    pub fn belong_to(&self, color: Color) -> bool {
        !self.is_empty() && color != Color::None && self.color == color
    }

    pub fn is_enemy_of(&self, color: Color) -> bool {
        !self.is_empty() && color != Color::None && self.color == color.next()
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn fen_char(&self) -> Option<char> {
        let c = self.kind.fen_char()?;
        match self.color {
            Color::White => Some(c.to_ascii_uppercase()),
            Color::Black => Some(c),
            Color::None => None,
        }
    }
}

impl Default for Piece {
    fn default() -> Self {
        Piece::EMPTY
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Square {
    pub row: i32,
    pub col: i32,
}

impl Square {
    pub const fn new(row: i32, col: i32) -> Self {
        Square { row, col }
    }

    pub fn offset(&self, delta_row: i32, delta_col: i32) -> Self {
        Square::new(self.row + delta_row, self.col + delta_col)
    }

    /// All 64 squares, row by row starting from a1.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
    }
}

// 坐标是否在棋盘内
pub fn in_board(pos: Square) -> bool {
    pos.row >= 0 && pos.row < BOARD_SIZE && pos.col >= 0 && pos.col < BOARD_SIZE
}

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mb = s.as_bytes();
        if mb.len() != 2 || !(b'a'..=b'h').contains(&mb[0]) || !(b'1'..=b'8').contains(&mb[1]) {
            return Err(NotationError::InvalidSquare(s.to_owned()));
        }
        Ok(Square::new((mb[1] - b'1') as i32, (mb[0] - b'a') as i32))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !in_board(*self) {
            return write!(f, "({},{})", self.row, self.col);
        }
        write!(f, "{}{}", (b'a' + self.col as u8) as char, (b'1' + self.row as u8) as char)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub square: Square,
    pub occupied: bool,
    pub piece: Piece,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    // 8×8 的棋盘，cells[row][col]
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    pub fn empty() -> Self {
        let mut cells = [[Cell {
            square: Square::new(0, 0),
            occupied: false,
            piece: Piece::EMPTY,
        }; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for square in Square::all() {
            cells[square.row as usize][square.col as usize].square = square;
        }
        Board { cells }
    }

    // 初始化标准国际象棋开局局面
    pub fn init() -> Self {
        let mut board = Board::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            let col = col as i32;
            board.set_piece(Square::new(0, col), Piece::new(*kind, Color::White));
            board.set_piece(Square::new(WHITE_PAWN_ROW, col), Piece::new(PieceKind::Pawn, Color::White));
            board.set_piece(Square::new(BLACK_PAWN_ROW, col), Piece::new(PieceKind::Pawn, Color::Black));
            board.set_piece(Square::new(BOARD_SIZE - 1, col), Piece::new(*kind, Color::Black));
        }
        board
    }

    /// Loads the piece-placement field of a FEN string (anything after the
    /// first space is ignored). The first rank listed is rank 8, i.e. row 7.
    pub fn from_fen(fen: &str) -> Result<Self, NotationError> {
        let invalid = || NotationError::InvalidFen(fen.to_owned());
        let placement = fen.split(' ').next().ok_or_else(invalid)?;
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(invalid());
        }

        let mut board = Board::empty();
        for (i, rank) in ranks.iter().enumerate() {
            let row = BOARD_SIZE - 1 - i as i32;
            let mut col = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 || skip > BOARD_SIZE as u32 {
                        return Err(invalid());
                    }
                    col += skip as i32;
                } else {
                    let piece = FEN_MAP.get(&c).ok_or_else(invalid)?;
                    if col >= BOARD_SIZE {
                        return Err(invalid());
                    }
                    board.set_piece(Square::new(row, col), *piece);
                    col += 1;
                }
            }
            if col != BOARD_SIZE {
                return Err(invalid());
            }
        }
        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(BOARD_SIZE as usize);
        for row in (0..BOARD_SIZE).rev() {
            let mut rank = String::new();
            let mut gap = 0;
            for col in 0..BOARD_SIZE {
                match self.piece_at(Square::new(row, col)).fen_char() {
                    Some(c) => {
                        if gap > 0 {
                            rank.push_str(&gap.to_string());
                            gap = 0;
                        }
                        rank.push(c);
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                rank.push_str(&gap.to_string());
            }
            ranks.push(rank);
        }
        ranks.join("/")
    }

    pub fn cell(&self, pos: Square) -> Option<&Cell> {
        if in_board(pos) {
            Some(&self.cells[pos.row as usize][pos.col as usize])
        } else {
            None
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flat_map(|row| row.iter())
    }

    // 棋盘外的坐标视为空格
    pub fn piece_at(&self, pos: Square) -> Piece {
        self.cell(pos).map(|cell| cell.piece).unwrap_or(Piece::EMPTY)
    }

    pub fn is_occupied(&self, pos: Square) -> bool {
        self.cell(pos).map(|cell| cell.occupied).unwrap_or(false)
    }

    // 唯一修改格子的入口，同时维护 occupied 标记
    pub fn set_piece(&mut self, pos: Square, piece: Piece) {
        debug_assert!(in_board(pos), "set_piece outside the board: {pos:?}");
        let cell = &mut self.cells[pos.row as usize][pos.col as usize];
        cell.piece = if piece.is_empty() { Piece::EMPTY } else { piece };
        cell.occupied = !piece.is_empty();
    }

    pub fn clear(&mut self, pos: Square) {
        self.set_piece(pos, Piece::EMPTY);
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells()
            .filter(move |cell| cell.piece.belong_to(color))
            .map(|cell| (cell.square, cell.piece))
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        let mut kings = self
            .pieces(color)
            .filter(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square);
        let king = kings.next();
        debug_assert!(kings.next().is_none(), "more than one {color} king on the board");
        king
    }

    // 两点之间（不含端点）是否有棋子；只对同行、同列或同一斜线有意义
    pub fn has_piece_between(&self, posa: Square, posb: Square) -> bool {
        let delta_row = posb.row - posa.row;
        let delta_col = posb.col - posa.col;
        let aligned = delta_row == 0 || delta_col == 0 || delta_row.abs() == delta_col.abs();
        if !aligned || posa == posb {
            return false;
        }
        let step_row = delta_row.signum();
        let step_col = delta_col.signum();
        let mut pos = posa.offset(step_row, step_col);
        while pos != posb {
            if self.is_occupied(pos) {
                return true;
            }
            pos = pos.offset(step_row, step_col);
        }
        false
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::init()
    }
}

// 第 8 行在上，空格用 '.'
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..BOARD_SIZE).rev() {
            write!(f, "{}", row + 1)?;
            for col in 0..BOARD_SIZE {
                let c = self.piece_at(Square::new(row, col)).fen_char().unwrap_or('.');
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::board::*;
    use crate::constant::START_FEN;

    #[test]
    fn test_empty_board() {
        let board = Board::empty();
        for cell in board.cells() {
            assert!(!cell.occupied);
            assert_eq!(cell.piece, Piece::EMPTY);
        }
        assert_eq!(board.cell(Square::new(3, 5)).map(|c| c.square), Some(Square::new(3, 5)));
        assert_eq!(board.cells().count(), 64);
    }

    #[test]
    fn test_init() {
        let board = Board::init();
        assert_eq!(board.piece_at("e1".parse().unwrap()), Piece::new(PieceKind::King, Color::White));
        assert_eq!(board.piece_at("d8".parse().unwrap()), Piece::new(PieceKind::Queen, Color::Black));
        assert_eq!(board.piece_at(Square::new(6, 0)), Piece::new(PieceKind::Pawn, Color::Black));
        assert_eq!(board.pieces(Color::White).count(), 16);
        assert_eq!(board.pieces(Color::Black).count(), 16);
        assert_eq!(board.to_fen(), START_FEN);
        assert_eq!(Board::from_fen(START_FEN).unwrap(), board);
    }

    #[test]
    fn test_occupied_flag_follows_piece() {
        let mut board = Board::init();
        let e2 = Square::new(1, 4);
        board.clear(e2);
        assert!(!board.is_occupied(e2));
        board.set_piece(e2, Piece::new(PieceKind::Knight, Color::Black));
        assert!(board.is_occupied(e2));
        // 颜色不为 None 的空子也会被归一化
        board.set_piece(e2, Piece::new(PieceKind::Empty, Color::White));
        assert_eq!(board.cell(e2).copied().map(|c| (c.occupied, c.piece)), Some((false, Piece::EMPTY)));
    }

    #[test]
    fn test_square_notation() {
        let sq: Square = "e2".parse().unwrap();
        assert_eq!(sq, Square::new(1, 4));
        assert_eq!(sq.to_string(), "e2");
        assert_eq!(Square::new(7, 0).to_string(), "a8");
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
        assert!(!in_board(Square::new(8, 0)));
        assert!(!in_board(Square::new(0, -1)));
    }

    #[test]
    fn test_from_fen_rejects_garbage() {
        assert!(Board::from_fen("8/8/8").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("ppppppppp/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("x7/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("7/8/8/8/8/8/8/8").is_err());
    }

    #[test]
    fn test_find_king() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w").unwrap();
        assert_eq!(board.find_king(Color::White), Some(Square::new(0, 4)));
        assert_eq!(board.find_king(Color::Black), Some(Square::new(7, 4)));
        assert_eq!(Board::empty().find_king(Color::White), None);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_duplicate_king_fails_fast() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/K3K3").unwrap();
        board.find_king(Color::White);
    }

    #[test]
    fn test_has_piece_between() {
        let board = Board::init();
        let a1 = Square::new(0, 0);
        assert!(board.has_piece_between(a1, Square::new(7, 0)));
        assert!(!board.has_piece_between(a1, Square::new(1, 0)));
        assert!(board.has_piece_between(Square::new(0, 2), Square::new(2, 4)));
        assert!(!board.has_piece_between(Square::new(1, 2), Square::new(5, 6)));
        // 不共线时不判断
        assert!(!board.has_piece_between(a1, Square::new(2, 1)));
    }

    #[test]
    fn test_display() {
        let text = Board::init().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "8 r n b q k b n r");
        assert_eq!(lines[4], "4 . . . . . . . .");
        assert_eq!(lines[7], "1 R N B Q K B N R");
        assert_eq!(lines[8], "  a b c d e f g h");
    }
}
