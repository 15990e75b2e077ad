use std::{cell::RefCell, rc::Rc};

use engine::board::{in_board, Color as Side, Piece, PieceKind, Square};
use engine::constant::BOARD_SIZE;
use engine::game::{CheckStatus, ClickOutcome, Game, MoveOutcome, Phase};
use fltk::{app, button::Button, draw, enums::*, frame::Frame, prelude::*, window::*};
use tracing::debug;

const SQUARE_SIZE: i32 = 72;
const BOARD_PIXELS: i32 = SQUARE_SIZE * BOARD_SIZE;
const PANEL_WIDTH: i32 = 120;
const STATUS_HEIGHT: i32 = 30;

// 棋子图案由界面自己管理，规则层只认 (kind, color)
const GLYPHS: [(PieceKind, &str, &str); 6] = [
    (PieceKind::King, "♔", "♚"),
    (PieceKind::Queen, "♕", "♛"),
    (PieceKind::Rook, "♖", "♜"),
    (PieceKind::Bishop, "♗", "♝"),
    (PieceKind::Knight, "♘", "♞"),
    (PieceKind::Pawn, "♙", "♟"),
];

fn glyph(piece: Piece) -> Option<&'static str> {
    GLYPHS
        .iter()
        .find(|(kind, _, _)| *kind == piece.kind)
        .and_then(|(_, white, black)| match piece.color {
            Side::White => Some(*white),
            Side::Black => Some(*black),
            Side::None => None,
        })
}

// 白方在下：第 0 行画在最底部
fn square_origin(frame_x: i32, frame_y: i32, square: Square) -> (i32, i32) {
    (
        frame_x + square.col * SQUARE_SIZE,
        frame_y + (BOARD_SIZE - 1 - square.row) * SQUARE_SIZE,
    )
}

fn square_at(frame_x: i32, frame_y: i32, (x, y): (i32, i32)) -> Option<Square> {
    if x < frame_x || y < frame_y {
        return None;
    }
    let square = Square::new(
        BOARD_SIZE - 1 - (y - frame_y) / SQUARE_SIZE,
        (x - frame_x) / SQUARE_SIZE,
    );
    in_board(square).then_some(square)
}

fn fill_color(square: Square, selected: Option<Square>, targets: &[Square]) -> Color {
    if Some(square) == selected {
        Color::from_rgb(246, 246, 105)
    } else if targets.contains(&square) {
        Color::from_rgb(186, 202, 68)
    } else if (square.row + square.col) % 2 == 0 {
        Color::from_rgb(181, 136, 99)
    } else {
        Color::from_rgb(240, 217, 181)
    }
}

fn draw_board(f: &Frame, game: &Game) {
    let selected = game.selected();
    let targets = selected
        .map(|from| game.legal_targets(from))
        .unwrap_or_default();
    draw::set_font(Font::Helvetica, SQUARE_SIZE * 3 / 4);
    for square in Square::all() {
        let (x, y) = square_origin(f.x(), f.y(), square);
        draw::draw_rect_fill(x, y, SQUARE_SIZE, SQUARE_SIZE, fill_color(square, selected, &targets));
        if let Some(text) = glyph(game.board().piece_at(square)) {
            draw::set_draw_color(Color::Black);
            draw::draw_text2(text, x, y, SQUARE_SIZE, SQUARE_SIZE, Align::Center);
        }
    }
}

fn turn_text(game: &Game) -> String {
    match game.phase() {
        Phase::GameOver { mated } => format!("checkmate, {} wins", mated.next()),
        _ if game.status() == CheckStatus::Check => format!("{} to move, in check", game.current_turn()),
        _ => format!("{} to move", game.current_turn()),
    }
}

fn describe(game: &Game, outcome: &ClickOutcome) -> String {
    match outcome {
        ClickOutcome::Selected(square) => format!("{} selected {square}", game.current_turn()),
        ClickOutcome::Cleared | ClickOutcome::Ignored => turn_text(game),
        ClickOutcome::Moved(MoveOutcome::Accepted { record, .. }) => format!("{record}: {}", turn_text(game)),
        ClickOutcome::Moved(MoveOutcome::Rejected(reason)) => format!("rejected: {reason}"),
    }
}

pub fn ui(game: Game) -> anyhow::Result<()> {
    let app = app::App::default().with_scheme(app::Scheme::Gleam);
    let game = Rc::new(RefCell::new(game));

    let mut top_window = Window::new(
        100,
        100,
        BOARD_PIXELS + PANEL_WIDTH,
        BOARD_PIXELS + STATUS_HEIGHT,
        "Chess",
    );

    let mut board_frame = Frame::new(0, 0, BOARD_PIXELS, BOARD_PIXELS, "");
    let mut status = Frame::new(0, BOARD_PIXELS, BOARD_PIXELS + PANEL_WIDTH, STATUS_HEIGHT, "");
    status.set_frame(FrameType::FlatBox);
    status.set_align(Align::Left | Align::Inside);
    status.set_label(&turn_text(&game.borrow()));

    {
        let game = game.clone();
        board_frame.draw(move |f| draw_board(f, &game.borrow()));
    }
    {
        // 点击棋盘：像素坐标换算成格子后交给 Game
        let game = game.clone();
        let mut status = status.clone();
        board_frame.handle(move |f, event| {
            if event != Event::Push {
                return false;
            }
            let Some(square) = square_at(f.x(), f.y(), app::event_coords()) else {
                return false;
            };
            let mut game = game.borrow_mut();
            let outcome = game.click(square);
            debug!(%square, ?outcome, "click");
            status.set_label(&describe(&game, &outcome));
            status.redraw();
            f.redraw();
            true
        });
    }

    let mut undo_button = Button::new(BOARD_PIXELS + 10, 10, PANEL_WIDTH - 20, 40, "Undo");
    undo_button.set_shortcut(Shortcut::Ctrl | 'z');
    let mut redo_button = Button::new(BOARD_PIXELS + 10, 60, PANEL_WIDTH - 20, 40, "Redo");
    redo_button.set_shortcut(Shortcut::Ctrl | 'y');
    for (button, undo) in [(&mut undo_button, true), (&mut redo_button, false)] {
        let game = game.clone();
        let mut status = status.clone();
        let mut frame = board_frame.clone();
        button.set_callback(move |_| {
            let mut game = game.borrow_mut();
            let record = if undo { game.undo() } else { game.redo() };
            let text = match record {
                Some(record) => format!("{} {record}, {}", if undo { "undo" } else { "redo" }, turn_text(&game)),
                None => turn_text(&game),
            };
            status.set_label(&text);
            status.redraw();
            frame.redraw();
        });
    }

    top_window.end();
    top_window.show();
    app.run()?;
    Ok(())
}
