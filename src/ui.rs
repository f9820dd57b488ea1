pub mod layout;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::games::{
    choice::{ChoiceGame, Side},
    memory_recall::{self, MemoryRecallGame, Phase},
    shape_match::{Cell, Shape, ShapeColor, ShapeMatchGame},
    Engine, GameVariant,
};
use crate::session::SessionController;

const TIPS: [&str; 5] = [
    "Tip: Focus on accuracy over speed!",
    "Tip: Take a deep breath before starting.",
    "Tip: Practice makes perfect!",
    "Tip: Stay calm and maintain focus.",
    "Tip: Try to remember patterns, not individual items.",
];

/// Keys shown on memory cells, row-major
const MEMORY_KEYS: [&str; memory_recall::CELL_COUNT] =
    ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "="];

/// Render the current screen
pub fn draw(ctl: &SessionController, f: &mut Frame) {
    screen::current_screen(&ctl.state()).render(ctl, f);
}

pub fn tip_for(final_score: i64) -> &'static str {
    TIPS[final_score.unsigned_abs() as usize % TIPS.len()]
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}

fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// One line of text centered vertically inside `area`
fn render_centered_line(f: &mut Frame, area: Rect, line: Line) {
    if area.height == 0 {
        return;
    }
    let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
}

pub fn render_menu(ctl: &SessionController, f: &mut Frame) {
    let area = f.area();
    let (title, items, footer) = layout::menu(area);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            "MindGym",
            bold().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(Span::styled("30-second brain workouts", dim())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(heading, title);

    for (idx, (variant, rect)) in GameVariant::ALL.iter().zip(items).enumerate() {
        let selected = idx == ctl.menu_cursor();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected {
                BorderType::Double
            } else {
                BorderType::Rounded
            })
            .border_style(if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        let best = ctl.high_scores().best(*variant);
        let line = Line::from(vec![
            Span::styled(format!("[{}] ", idx + 1), bold().fg(Color::Yellow)),
            Span::styled(variant.to_string(), if selected { bold() } else { Style::default() }),
            Span::styled(format!("   best: {best}"), dim()),
        ]);
        let inner = block.inner(rect);
        f.render_widget(block, rect);
        render_centered_line(f, inner, line);
    }

    let sound = if ctl.sound_enabled() { "on" } else { "off" };
    let hint = Paragraph::new(Span::styled(
        format!("↑/↓ choose  ENTER play  1-3 quick start  (s)ound: {sound}  (q)uit"),
        dim().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(hint, footer);
}

/// Button row of a dialog; an empty label leaves that slot blank
fn render_dialog_buttons(f: &mut Frame, dialog: Rect, labels: [&str; 2]) {
    let styles = [
        bold().fg(Color::Black).bg(Color::Green),
        bold().fg(Color::Black).bg(Color::Gray),
    ];
    let buttons = layout::dialog_buttons(dialog);
    for ((rect, label), style) in buttons.into_iter().zip(labels).zip(styles) {
        if label.is_empty() {
            continue;
        }
        f.render_widget(
            Paragraph::new(Span::styled(label, style))
                .style(style)
                .alignment(Alignment::Center),
            rect,
        );
    }
}

fn render_rules_modal(f: &mut Frame, variant: GameVariant, in_game: bool) {
    let area = layout::rules_modal(f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(format!(" {variant}: how to play "), bold()))
        .title_alignment(Alignment::Center);

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(
        variant
            .rules()
            .iter()
            .map(|rule| Line::from(format!("• {rule}"))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "You have 30 seconds. Good luck!",
        bold().fg(Color::Cyan),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        if in_game {
            "ENTER resume   ESC resume"
        } else {
            "ENTER start   ESC back"
        },
        dim(),
    )));

    let body = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(body, area);
    let buttons = if in_game {
        ["Resume", ""]
    } else {
        ["Start", "Back"]
    };
    render_dialog_buttons(f, area, buttons);
}

pub fn render_rules(variant: GameVariant, f: &mut Frame) {
    render_rules_modal(f, variant, false);
}

fn render_top_bar(ctl: &SessionController, variant: GameVariant, f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(variant.to_string(), bold())),
        chunks[0],
    );

    let progress = ctl.time_progress().unwrap_or(0.0).clamp(0.0, 1.0);
    let secs = ctl.time_left().map_or(0, |d| d.as_secs_f64().ceil() as u64);
    let gauge = Gauge::default()
        .ratio(progress)
        .label(format_clock(secs))
        .gauge_style(Style::default().fg(if progress > 0.3 {
            Color::Green
        } else {
            Color::Red
        }));
    f.render_widget(gauge, chunks[1]);

    let score = Paragraph::new(Span::styled(
        format!("Score: {}", ctl.score().unwrap_or(0)),
        bold(),
    ));
    f.render_widget(score, chunks[2]);

    let (rules, mute) = layout::top_bar_buttons(area);
    f.render_widget(
        Paragraph::new(Span::styled("[?]", bold().fg(Color::Yellow))),
        rules,
    );
    let sound = if ctl.sound_enabled() { "[on] " } else { "[off]" };
    f.render_widget(Paragraph::new(Span::styled(sound, dim())), mute);
}

pub fn render_playing(ctl: &SessionController, variant: GameVariant, f: &mut Frame) {
    let (top, body) = layout::split(f.area());
    render_top_bar(ctl, variant, f, top);

    let (instructions, board) = layout::board(body);
    match ctl.engine() {
        Some(Engine::Choice(game)) => render_choice(game, f, instructions, board),
        Some(Engine::ShapeMatch(game)) => render_shape_match(game, f, instructions, board),
        Some(Engine::MemoryRecall(game)) => render_memory(game, f, instructions, board),
        None => {}
    }

    if ctl.rules_open() {
        render_rules_modal(f, variant, true);
    }
}

fn render_instructions(f: &mut Frame, area: Rect, title: Line, hint: &str) {
    let text = Paragraph::new(vec![title, Line::from(Span::styled(hint.to_string(), dim()))])
        .alignment(Alignment::Center);
    f.render_widget(text, area);
}

fn render_choice(game: &ChoiceGame, f: &mut Frame, instructions: Rect, board: Rect) {
    render_instructions(
        f,
        instructions,
        Line::from(Span::styled("Select the larger number", bold())),
        "Use LEFT/RIGHT arrows or click to select",
    );

    let (left, right) = game.values();
    let feedback = game.feedback();
    for (side, value, rect) in [
        (Side::Left, left, layout::choice_boxes(board)[0]),
        (Side::Right, right, layout::choice_boxes(board)[1]),
    ] {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick);
        if let Some(fb) = feedback.filter(|fb| fb.picked == side) {
            let color = if fb.correct { Color::Green } else { Color::Red };
            block = block.style(Style::default().bg(color));
        }
        let inner = block.inner(rect);
        f.render_widget(block, rect);
        render_centered_line(f, inner, Line::from(Span::styled(value.to_string(), bold())));
    }
}

fn shape_glyph(cell: &Cell) -> &'static str {
    match cell.shape {
        Shape::Circle => "●",
        Shape::Square => "■",
        Shape::Star => "★",
        Shape::Diamond => "◆",
        Shape::Triangle => match cell.rotation {
            90 => "▶",
            180 => "▼",
            270 => "◀",
            _ => "▲",
        },
    }
}

fn shape_color(color: ShapeColor) -> Color {
    match color {
        ShapeColor::Red => Color::Red,
        ShapeColor::Blue => Color::Blue,
        ShapeColor::Green => Color::Green,
        ShapeColor::Yellow => Color::Yellow,
        ShapeColor::Purple => Color::Magenta,
    }
}

/// Horizontal jitter for a decaying shake magnitude
fn shake_offset(shake: u8) -> i32 {
    if shake == 0 {
        0
    } else if shake % 2 == 0 {
        i32::from(shake.div_ceil(4))
    } else {
        -i32::from(shake.div_ceil(4))
    }
}

fn shifted(rect: Rect, dx: i32, bounds: Rect) -> Rect {
    let x = (i32::from(rect.x) + dx).clamp(
        i32::from(bounds.x),
        i32::from(bounds.right().saturating_sub(rect.width)),
    );
    Rect {
        x: u16::try_from(x).unwrap_or(rect.x),
        ..rect
    }
}

fn render_shape_match(game: &ShapeMatchGame, f: &mut Frame, instructions: Rect, board: Rect) {
    let target = game.target();
    let style = if target.color_constrained {
        bold().fg(shape_color(target.color))
    } else {
        bold()
    };
    render_instructions(
        f,
        instructions,
        Line::from(Span::styled(target.describe(), style)),
        "Press 1-9 or click on the matching shape",
    );

    let dx = shake_offset(game.shake());
    let feedback = game.feedback();
    let rects = layout::game_targets(GameVariant::ShapeMatch, board);
    for (idx, (cell, rect)) in game.cells().iter().zip(rects).enumerate() {
        let rect = shifted(rect, dx, board);
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled((idx + 1).to_string(), dim()));
        if let Some(fb) = feedback.filter(|fb| fb.cell == idx) {
            let color = if fb.correct { Color::Green } else { Color::Red };
            block = block
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(color));
        }
        let inner = block.inner(rect);
        f.render_widget(block, rect);
        render_centered_line(
            f,
            inner,
            Line::from(Span::styled(
                shape_glyph(cell),
                bold().fg(shape_color(cell.color)),
            )),
        );
    }
}

fn render_memory(game: &MemoryRecallGame, f: &mut Frame, instructions: Rect, board: Rect) {
    let (title, hint) = match game.phase() {
        Phase::Showing => ("Remember the highlighted squares", "Get ready..."),
        Phase::Selecting => (
            "Select the squares you saw highlighted",
            "Toggle with 1-9, 0, -, = or click. ENTER to submit",
        ),
    };
    render_instructions(f, instructions, Line::from(Span::styled(title, bold())), hint);

    let rects = layout::game_targets(GameVariant::MemoryRecall, board);
    for (idx, rect) in rects.into_iter().enumerate() {
        let pos = (idx / memory_recall::COLS, idx % memory_recall::COLS);
        let fill = match game.phase() {
            Phase::Showing if game.highlighted().contains(&pos) => Some(Color::Yellow),
            Phase::Selecting if game.selected().contains(&pos) => Some(Color::Blue),
            _ => None,
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(MEMORY_KEYS[idx], dim()));
        if let Some(color) = fill {
            block = block.style(Style::default().bg(color));
        }
        f.render_widget(block, rect);
    }
}

pub fn render_game_over(
    ctl: &SessionController,
    variant: GameVariant,
    final_score: i64,
    f: &mut Frame,
) {
    let area = layout::game_over_panel(f.area());
    let best = ctl.high_scores().best(variant);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .title(Span::styled(format!(" {variant} "), bold()))
        .title_alignment(Alignment::Center);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Game Over!", bold().fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled(format!("Your Score: {final_score}"), bold())),
        Line::from(format!("Best Score: {best}")),
    ];
    if ctl.is_new_best() {
        lines.push(Line::from(Span::styled(
            "New best!",
            bold().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(tip_for(final_score), dim())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(r)eplay   (m)enu   (q)uit",
        bold().fg(Color::Green),
    )));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
    render_dialog_buttons(f, area, ["Replay", "Menu"]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::{HighScores, MemoryHighScoreStore};
    use crate::session::{InputEvent, SessionSettings};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn controller() -> SessionController {
        SessionController::with_seed(
            Box::new(MemoryHighScoreStore::with_scores(HighScores {
                two_choice: 42,
                ..HighScores::default()
            })),
            SessionSettings::default(),
            99,
        )
    }

    fn rendered(ctl: &SessionController) -> String {
        let backend = TestBackend::new(100, 32);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(ctl, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_menu_lists_games_and_best_scores() {
        let content = rendered(&controller());
        assert!(content.contains("MindGym"));
        assert!(content.contains("Pick the Bigger"));
        assert!(content.contains("Find the Shape"));
        assert!(content.contains("Memory Recall"));
        assert!(content.contains("best: 42"));
    }

    #[test]
    fn test_rules_screen() {
        let mut ctl = controller();
        ctl.handle(InputEvent::KeySelect(1));
        let content = rendered(&ctl);
        assert!(content.contains("how to play"));
        assert!(content.contains("ENTER start"));
        assert!(content.contains("Start"));
        assert!(content.contains("Back"));
    }

    #[test]
    fn test_playing_screens_render() {
        for idx in 0..3 {
            let mut ctl = controller();
            ctl.handle(InputEvent::KeySelect(idx));
            ctl.handle(InputEvent::Confirm);
            let content = rendered(&ctl);
            assert!(content.contains("Score: 0"));
            assert!(content.contains("00:30"));
        }
    }

    #[test]
    fn test_memory_instructions_follow_phase() {
        let mut ctl = controller();
        ctl.handle(InputEvent::KeySelect(2));
        ctl.handle(InputEvent::Confirm);
        assert!(rendered(&ctl).contains("Remember the highlighted squares"));
        ctl.tick(Duration::from_secs(2));
        assert!(rendered(&ctl).contains("Select the squares you saw highlighted"));
    }

    #[test]
    fn test_rules_overlay_in_game() {
        let mut ctl = controller();
        ctl.handle(InputEvent::KeySelect(0));
        ctl.handle(InputEvent::Confirm);
        ctl.handle(InputEvent::ShowRules);
        assert!(rendered(&ctl).contains("ENTER resume"));
    }

    #[test]
    fn test_game_over_screen() {
        let mut ctl = controller();
        ctl.handle(InputEvent::KeySelect(0));
        ctl.handle(InputEvent::Confirm);
        ctl.tick(Duration::from_secs(31));
        let content = rendered(&ctl);
        assert!(content.contains("Game Over!"));
        assert!(content.contains("Your Score: 0"));
        assert!(content.contains("Best Score: 42"));
    }

    fn pick_matching_shape(ctl: &mut SessionController) {
        let idx = match ctl.engine() {
            Some(Engine::ShapeMatch(game)) => game
                .cells()
                .iter()
                .position(|c| game.target().matches(c))
                .unwrap(),
            other => panic!("expected shape engine, got {other:?}"),
        };
        ctl.handle(InputEvent::PointerSelect(idx));
        ctl.tick(Duration::from_millis(800));
    }

    #[test]
    fn test_new_best_banner_needs_a_strict_improvement() {
        let mut ctl = SessionController::with_seed(
            Box::new(MemoryHighScoreStore::with_scores(HighScores {
                shape_grid: 15,
                ..HighScores::default()
            })),
            SessionSettings::default(),
            5,
        );
        ctl.handle(InputEvent::KeySelect(1));
        ctl.handle(InputEvent::Confirm);
        pick_matching_shape(&mut ctl);
        ctl.tick(Duration::from_secs(31));
        let content = rendered(&ctl);
        assert!(content.contains("Your Score: 15"));
        assert!(!content.contains("New best!"));
        assert!(content.contains("Replay"));
        assert!(content.contains("Menu"));

        ctl.handle(InputEvent::Confirm);
        pick_matching_shape(&mut ctl);
        pick_matching_shape(&mut ctl);
        ctl.tick(Duration::from_secs(31));
        let content = rendered(&ctl);
        assert!(content.contains("Your Score: 30"));
        assert!(content.contains("New best!"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut ctl = controller();
        ctl.handle(InputEvent::KeySelect(1));
        ctl.handle(InputEvent::Confirm);
        let backend = TestBackend::new(12, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&ctl, f)).unwrap();
    }

    #[test]
    fn test_helpers() {
        assert_eq!(format_clock(30), "00:30");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(shake_offset(0), 0);
        assert_eq!(shake_offset(10), 3);
        assert_eq!(shake_offset(9), -3);
        assert_eq!(tip_for(-3), TIPS[3]);
    }
}
