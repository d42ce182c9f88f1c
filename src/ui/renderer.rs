use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::constants::GRID_HEIGHT;
use crate::game::{Game, Phase, TableSize};

pub fn ui(f: &mut Frame, game: &Game, status: Option<&str>) {
    let size = f.size();

    let board_height = GRID_HEIGHT as u16 + 2; // rows + borders
    let board_width = game.width() as u16 * 2 + 2; // 2 chars per cell + borders

    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(board_height),
            Constraint::Min(1),
        ])
        .split(size);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(board_width),
            Constraint::Length(26), // Info panel
            Constraint::Min(1),
        ])
        .split(vertical_chunks[1]);

    let board_area = horizontal_chunks[1];
    let info_area = horizontal_chunks[2];

    render_board(f, game, board_area);
    render_info(f, game, status, info_area);

    match game.phase() {
        Phase::Paused => render_paused_overlay(f, board_area),
        Phase::GameOver => render_game_over_overlay(f, game, board_area),
        _ => {}
    }
}

/// Settled color code to terminal color; matches the classic palette.
fn cell_color(code: u8) -> Option<Color> {
    match code {
        1 => Some(Color::Magenta),     // T
        2 => Some(Color::LightYellow), // L
        3 => Some(Color::Green),       // S
        4 => Some(Color::Yellow),      // O
        5 => Some(Color::Red),         // Z
        6 => Some(Color::Blue),        // J
        7 => Some(Color::Cyan),        // I
        _ => None,
    }
}

fn render_board(f: &mut Frame, game: &Game, area: Rect) {
    let mut board_lines = Vec::new();

    for (row, codes) in game.table().iter().enumerate() {
        let mut line_spans = Vec::new();
        for (col, &code) in codes.iter().enumerate() {
            match cell_color(code) {
                Some(color) => {
                    line_spans.push(Span::styled("██", Style::default().fg(color)));
                }
                None => {
                    // Checkerboard pattern for empty cells
                    if (row + col) % 2 == 0 {
                        line_spans.push(Span::styled("░░", Style::default().fg(Color::DarkGray)));
                    } else {
                        line_spans.push(Span::raw("  "));
                    }
                }
            }
        }
        board_lines.push(Line::from(line_spans));
    }

    let board_widget = Paragraph::new(board_lines)
        .block(Block::default().borders(Borders::ALL).title("blockfall"));

    f.render_widget(board_widget, area);
}

fn render_info(f: &mut Frame, game: &Game, status: Option<&str>, area: Rect) {
    let size_text = match game.table_size() {
        TableSize::Small => "small",
        TableSize::Medium => "medium",
        TableSize::Large => "large",
    };

    let mut info_text = vec![
        Line::from(vec![Span::styled(
            format!("{}s", game.elapsed_secs()),
            Style::default().fg(Color::Cyan),
        )]),
        Line::from(vec![Span::raw(format!("table: {}", size_text))]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::raw("←/→/↓ move   ↑ rotate")]),
        Line::from(vec![Span::raw("p pause      n new game")]),
        Line::from(vec![Span::raw("1/2/3 table size")]),
        Line::from(vec![Span::raw("s save       l load")]),
        Line::from(vec![Span::raw("q quit")]),
    ];

    if let Some(message) = status {
        info_text.push(Line::from(vec![Span::raw("")]));
        info_text.push(Line::from(vec![Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        )]));
    }

    let info_widget = Paragraph::new(info_text)
        .block(Block::default().borders(Borders::ALL).title("Info"))
        .alignment(Alignment::Left);

    f.render_widget(info_widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn render_paused_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(80, 30, area);
    f.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled(
            "PAUSED",
            Style::default().fg(Color::Yellow),
        )]),
        Line::from(vec![Span::raw("")]),
    ];

    let paused_widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    f.render_widget(paused_widget, popup_area);
}

fn render_game_over_overlay(f: &mut Frame, game: &Game, area: Rect) {
    let popup_area = centered_rect(90, 45, area);
    f.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red),
        )]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::raw(format!("{}s survived", game.elapsed_secs()))]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::raw("n for a new game")]),
    ];

    let game_over_widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    f.render_widget(game_over_widget, popup_area);
}
