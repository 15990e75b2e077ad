use crate::board::{Color, Piece, PieceKind};
use std::{collections::HashMap, sync::LazyLock};

pub const BOARD_SIZE: i32 = 8;
pub const WHITE_PAWN_ROW: i32 = 1;
pub const BLACK_PAWN_ROW: i32 = 6;
pub const HISTORY_CAPACITY: usize = 256;

// 底线棋子排列，黑白双方相同（后在 d 列，王在 e 列）
pub const BACK_RANK: [PieceKind; BOARD_SIZE as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

pub static FEN_MAP: LazyLock<HashMap<char, Piece>> = LazyLock::new(|| {
    HashMap::from([
        ('k', Piece::new(PieceKind::King, Color::Black)),
        ('q', Piece::new(PieceKind::Queen, Color::Black)),
        ('r', Piece::new(PieceKind::Rook, Color::Black)),
        ('b', Piece::new(PieceKind::Bishop, Color::Black)),
        ('n', Piece::new(PieceKind::Knight, Color::Black)),
        ('p', Piece::new(PieceKind::Pawn, Color::Black)),
        ('K', Piece::new(PieceKind::King, Color::White)),
        ('Q', Piece::new(PieceKind::Queen, Color::White)),
        ('R', Piece::new(PieceKind::Rook, Color::White)),
        ('B', Piece::new(PieceKind::Bishop, Color::White)),
        ('N', Piece::new(PieceKind::Knight, Color::White)),
        ('P', Piece::new(PieceKind::Pawn, Color::White)),
    ])
});
