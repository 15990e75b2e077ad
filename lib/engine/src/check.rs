/*
 * 将军与将死检测
 *
 * - is_in_check 只用 can_reach（几何 + 阻挡）判断对方棋子能否走到王的位置，
 *   不会再回到自将检查，所以与 rules 之间不存在递归
 * - is_checkmate 穷举己方所有走法，在棋盘副本上模拟后撤销，找到一个解将的走法就返回
 */
use crate::board::{Board, Color, Square};
use crate::history::{apply_move, revert_move};
use crate::rules::{can_reach, is_legal_move};

// 没有王的一方视为未被将军
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.find_king(color) else {
        return false;
    };
    board
        .pieces(color.next())
        .any(|(from, _)| can_reach(board, from, king))
}

/// Enemy squares whose piece can reach the king of `color`.
pub fn attackers(board: &Board, color: Color) -> Vec<Square> {
    let Some(king) = board.find_king(color) else {
        return vec![];
    };
    board
        .pieces(color.next())
        .filter(|&(from, _)| can_reach(board, from, king))
        .map(|(from, _)| from)
        .collect()
}

pub fn is_checkmate(board: &Board, color: Color) -> bool {
    if !is_in_check(board, color) {
        return false;
    }
    let mut scratch = board.clone();
    let origins: Vec<Square> = board.pieces(color).map(|(from, _)| from).collect();
    for from in origins {
        for to in Square::all() {
            if !is_legal_move(&scratch, color, from, to) {
                continue;
            }
            let record = apply_move(&mut scratch, from, to);
            let escaped = !is_in_check(&scratch, color);
            revert_move(&mut scratch, &record);
            if escaped {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use crate::board::*;
    use crate::check::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_is_checked() {
        let board = Board::init();
        assert!(!is_in_check(&board, Color::White));
        assert!(!is_in_check(&board, Color::Black));

        let board = Board::from_fen("4k3/8/8/8/8/8/8/r3K3").unwrap();
        assert!(is_in_check(&board, Color::White));
        assert_eq!(attackers(&board, Color::White), vec![sq("a1")]);
        assert!(!is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_blocked_attack_is_not_check() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/r1N1K3").unwrap();
        assert!(!is_in_check(&board, Color::White));
        // 马和王不受阻挡影响
        let board = Board::from_fen("4k3/8/8/8/8/3n4/3PPP2/3PKP2").unwrap();
        assert!(is_in_check(&board, Color::White));
    }

    #[test]
    fn test_pawn_attacks_diagonally_only() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4p3/4K3").unwrap();
        assert!(!is_in_check(&board, Color::White));
        let board = Board::from_fen("4k3/8/8/8/8/8/3p4/4K3").unwrap();
        assert!(is_in_check(&board, Color::White));
        let board = Board::from_fen("4k3/3P4/8/8/8/8/8/4K3").unwrap();
        assert!(is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_double_check() {
        let board = Board::from_fen("4k3/8/8/8/8/5n2/8/r3K3").unwrap();
        let mut found = attackers(&board, Color::White);
        found.sort_by_key(|s| (s.row, s.col));
        assert_eq!(found, vec![sq("a1"), sq("f3")]);
    }

    #[test]
    fn test_missing_king_is_not_in_check() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/r7").unwrap();
        assert!(!is_in_check(&board, Color::White));
        assert!(!is_checkmate(&board, Color::White));
        assert!(attackers(&board, Color::White).is_empty());
    }

    #[test]
    fn test_back_rank_mate() {
        let board = Board::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1").unwrap();
        assert!(is_in_check(&board, Color::Black));
        assert!(is_checkmate(&board, Color::Black));

        // 移走攻击者就不再是将死
        let mut board = board;
        board.clear(sq("d8"));
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_check_with_escape_is_not_mate() {
        // 王可以走到 h7
        let board = Board::from_fen("3R2k1/5pp1/8/8/8/8/8/6K1").unwrap();
        assert!(is_in_check(&board, Color::Black));
        assert!(!is_checkmate(&board, Color::Black));
        // 可以用马挡住
        let board = Board::from_fen("3R2k1/5ppp/6n1/8/8/8/8/6K1").unwrap();
        assert!(!is_checkmate(&board, Color::Black));
        // 可以吃掉攻击者
        let board = Board::from_fen("3R2k1/5ppp/8/8/8/8/8/3r2K1").unwrap();
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_stalemate_is_not_checkmate() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8").unwrap();
        assert!(!is_in_check(&board, Color::Black));
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_checkmate_leaves_board_untouched() {
        let board = Board::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1").unwrap();
        let before = board.clone();
        is_checkmate(&board, Color::Black);
        assert_eq!(board, before);
    }
}
