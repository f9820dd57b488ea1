use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::games::{memory_recall, shape_match, GameVariant};
use crate::session::{InputEvent, SessionController, SessionState};

pub const TOP_BAR_HEIGHT: u16 = 3;
const MENU_WIDTH: u16 = 50;
const MENU_ITEM_HEIGHT: u16 = 3;
const CHOICE_BOX_WIDTH: u16 = 20;
const CHOICE_BOX_HEIGHT: u16 = 7;
const CHOICE_GAP: u16 = 8;
const MAX_CELL_WIDTH: u16 = 14;
const MAX_CELL_HEIGHT: u16 = 5;
const BUTTON_WIDTH: u16 = 12;
const BUTTON_GAP: u16 = 4;

/// Top bar and game body
pub fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(TOP_BAR_HEIGHT), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Instruction lines and the board below them
pub fn board(body: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(body);
    (chunks[0], chunks[1])
}

pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Rules dialog, both before a session and as the in-game overlay
pub fn rules_modal(area: Rect) -> Rect {
    centered(area, 70, 14)
}

pub fn game_over_panel(area: Rect) -> Rect {
    centered(area, 56, 13)
}

/// Confirm and cancel buttons on the last inner row of a bordered dialog
pub fn dialog_buttons(dialog: Rect) -> [Rect; 2] {
    let y = dialog.bottom().saturating_sub(2).max(dialog.y);
    let width = BUTTON_WIDTH.min(dialog.width / 2);
    let total = width * 2 + BUTTON_GAP;
    let x = dialog.x + dialog.width.saturating_sub(total) / 2;
    [
        Rect::new(x, y, width, 1).intersection(dialog),
        Rect::new(x + width + BUTTON_GAP, y, width, 1).intersection(dialog),
    ]
}

/// Title row, one row per variant, footer row
pub fn menu(area: Rect) -> (Rect, [Rect; 3], Rect) {
    let height = 3 + MENU_ITEM_HEIGHT * 3 + 2;
    let list = centered(area, MENU_WIDTH, height);
    let item = |i: u16| {
        Rect::new(
            list.x,
            (list.y + 3 + i * MENU_ITEM_HEIGHT).min(area.bottom()),
            list.width,
            MENU_ITEM_HEIGHT,
        )
        .intersection(area)
    };
    let title = Rect::new(list.x, list.y, list.width, 2.min(list.height));
    let footer = Rect::new(list.x, list.bottom().saturating_sub(1), list.width, 1).intersection(area);
    (title, [item(0), item(1), item(2)], footer)
}

pub fn choice_boxes(board: Rect) -> [Rect; 2] {
    let row = centered(board, CHOICE_BOX_WIDTH * 2 + CHOICE_GAP, CHOICE_BOX_HEIGHT);
    let width = row.width.saturating_sub(CHOICE_GAP) / 2;
    [
        Rect::new(row.x, row.y, width, row.height),
        Rect::new(row.right().saturating_sub(width), row.y, width, row.height),
    ]
}

pub fn grid_cells(board: Rect, rows: u16, cols: u16) -> Vec<Rect> {
    let cell_w = (board.width / cols).min(MAX_CELL_WIDTH);
    let cell_h = (board.height / rows).min(MAX_CELL_HEIGHT);
    let grid = centered(board, cell_w * cols, cell_h * rows);
    (0..rows)
        .flat_map(|r| {
            (0..cols).map(move |c| Rect::new(grid.x + c * cell_w, grid.y + r * cell_h, cell_w, cell_h))
        })
        .collect()
}

/// Clickable regions of the active game, indexed like its inputs
pub fn game_targets(variant: GameVariant, board: Rect) -> Vec<Rect> {
    match variant {
        GameVariant::Choice => choice_boxes(board).to_vec(),
        GameVariant::ShapeMatch => grid_cells(
            board,
            shape_match::GRID_SIZE as u16,
            shape_match::GRID_SIZE as u16,
        ),
        GameVariant::MemoryRecall => grid_cells(
            board,
            memory_recall::ROWS as u16,
            memory_recall::COLS as u16,
        ),
    }
}

/// `[?]` rules and `[s]` sound buttons at the right end of the top bar
pub fn top_bar_buttons(top: Rect) -> (Rect, Rect) {
    let y = top.y + top.height / 2;
    let rules = Rect::new(top.right().saturating_sub(12), y, 3, 1).intersection(top);
    let mute = Rect::new(top.right().saturating_sub(7), y, 5, 1).intersection(top);
    (rules, mute)
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn position_in(rects: &[Rect], column: u16, row: u16) -> Option<usize> {
    rects.iter().position(|r| contains(*r, column, row))
}

fn dialog_click(dialog: Rect, column: u16, row: u16) -> Option<InputEvent> {
    match position_in(&dialog_buttons(dialog), column, row)? {
        0 => Some(InputEvent::Confirm),
        _ => Some(InputEvent::Cancel),
    }
}

/// Map a click on the rendered screen to an input event
pub fn hit_test(area: Rect, ctl: &SessionController, column: u16, row: u16) -> Option<InputEvent> {
    match ctl.state() {
        SessionState::Menu => {
            let (_, items, _) = menu(area);
            position_in(&items, column, row).map(InputEvent::PointerSelect)
        }
        SessionState::Playing(variant) => {
            let (top, body) = split(area);
            let (rules, mute) = top_bar_buttons(top);
            if contains(mute, column, row) {
                return Some(InputEvent::ToggleMute);
            }
            if contains(rules, column, row) {
                return Some(if ctl.rules_open() {
                    InputEvent::Confirm
                } else {
                    InputEvent::ShowRules
                });
            }
            if ctl.rules_open() {
                let [resume, _] = dialog_buttons(rules_modal(area));
                return contains(resume, column, row).then_some(InputEvent::Confirm);
            }
            let (_, board) = board(body);
            position_in(&game_targets(variant, board), column, row).map(InputEvent::PointerSelect)
        }
        SessionState::Rules(_) => dialog_click(rules_modal(area), column, row),
        SessionState::GameOver { .. } => dialog_click(game_over_panel(area), column, row),
    }
}
