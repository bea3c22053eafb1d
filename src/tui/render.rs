use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::tui::scene::CellBuffer;

/// Everything the chrome needs besides the scene itself.
#[derive(Debug)]
pub struct ChromeData<'a> {
    pub mode_label: &'a str,
    pub hints: &'a str,
    pub message: Option<&'a str>,
    pub hud: &'a str,
    pub show_help: bool,
}

/// The cell region the scene occupies for a given frame area. The run loop
/// uses this to size the viewport before drawing, so it must match the
/// splits in `draw` exactly.
pub fn canvas_area(area: Rect) -> Rect {
    let [canvas_outer, _status] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(4)]).areas(area);
    Block::default().borders(Borders::ALL).inner(canvas_outer)
}

pub fn draw(frame: &mut Frame, scene: Option<&CellBuffer>, data: &ChromeData<'_>) {
    let area = frame.area();
    let [canvas_outer, status_area] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(4)]).areas(area);

    let title = Line::from(vec![
        Span::styled("graphos", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
    ]);
    let canvas_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    let canvas_inner = canvas_block.inner(canvas_outer);
    frame.render_widget(canvas_block, canvas_outer);

    if let Some(cells) = scene {
        let rows = cells.rows().min(canvas_inner.height);
        let cols = cells.cols().min(canvas_inner.width);
        for row in 0..rows {
            for col in 0..cols {
                let Some(cell) = cells.get(col, row) else {
                    continue;
                };
                if let Some(target) = frame
                    .buffer_mut()
                    .cell_mut((canvas_inner.x + col, canvas_inner.y + row))
                {
                    target.set_char(cell.ch);
                    target.set_fg(cell.color);
                }
            }
        }
    }

    let mut top_spans = vec![
        Span::styled(
            data.mode_label.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(data.hud.to_string(), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(msg) = data.message {
        top_spans.push(Span::raw("  "));
        top_spans.push(Span::styled(
            msg.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }
    let status = Paragraph::new(vec![
        Line::from(top_spans),
        Line::from(Span::styled(
            data.hints.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(status, status_area);

    if data.show_help {
        render_help_overlay(frame);
    }
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 70, 70);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(vec![
        Line::from("POINTER"),
        Line::from("  click node      select"),
        Line::from("  drag from node  draw an edge; release on a node to connect"),
        Line::from("  drag empty      pan the view"),
        Line::from("  click empty     deselect"),
        Line::from("  scroll          zoom"),
        Line::from(""),
        Line::from("KEYS"),
        Line::from("  arrows  pan      +/-  zoom      Tab  cycle selection"),
        Line::from("  n  new node      e  edit label  p  pin/unpin"),
        Line::from("  d  delete node   x  delete edge under pointer"),
        Line::from("  w  save          q  quit        Esc  deselect/cancel"),
        Line::from(""),
        Line::from("Pinned nodes hold their place; the layout keeps settling"),
        Line::from("around them."),
    ])
    .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, area);
}

pub fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}

/// A single input line with a block caret at the cursor position.
pub fn line_with_cursor(text: &str, cursor: usize) -> Line<'static> {
    let text_style = Style::default().fg(Color::White);
    let caret_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK);

    let char_len = text.chars().count();
    let clamped = cursor.min(char_len);
    if char_len == 0 {
        return Line::from(Span::styled("▌", caret_style));
    }

    let split = byte_index_for_cursor(text, clamped);
    let (left, right) = text.split_at(split);
    let mut spans = Vec::new();
    if !left.is_empty() {
        spans.push(Span::styled(left.to_string(), text_style));
    }
    spans.push(Span::styled("▌", caret_style));
    if !right.is_empty() {
        spans.push(Span::styled(right.to_string(), text_style));
    }
    Line::from(spans)
}

pub fn byte_index_for_cursor(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
