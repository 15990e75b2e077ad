/**
 * 国际象棋规则引擎入口
 *
 * 说明
 * - board: 棋盘、棋子、坐标
 * - rules: 走法合法性（几何、阻挡、自将检查）
 * - check: 将军与将死检测
 * - history: 走子执行、悔棋/重做记录
 * - game: 对局控制（走棋方、选子、走子结果）
 * - engine: 文本命令协议
 */
pub mod board;
pub mod check;
pub mod constant;
pub mod engine;
pub mod error;
pub mod game;
pub mod history;
pub mod rules;
