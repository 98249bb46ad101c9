//! Drawing of the controller's [`Screen`] with ratatui

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use s3nav_core::nav::{Geometry, HotkeyInfo, ModalFrame, SearchBar};
use s3nav_core::Screen;

/// Hotkeys per header column
const HOTKEY_ROWS: usize = 4;
const HOTKEY_WIDTH: usize = 24;

pub fn draw(frame: &mut Frame, screen: &Screen) {
    let header_height = screen
        .connection
        .len()
        .max(screen.hotkeys.len().min(HOTKEY_ROWS))
        .max(1) as u16;

    let mut constraints = vec![Constraint::Length(header_height)];
    if screen.search.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(3));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    draw_header(frame, chunks[0], screen);
    if let Some(search) = &screen.search {
        draw_search(frame, chunks[1], search);
    }
    draw_table(frame, chunks[chunks.len() - 1], screen);

    for modal in &screen.modals {
        draw_modal(frame, modal);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, screen: &Screen) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let label_style = Style::default().fg(Color::Yellow);
    let connection: Vec<Line> = screen
        .connection
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label}: "), label_style),
                Span::raw(value.clone()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(connection), halves[0]);
    frame.render_widget(Paragraph::new(hotkey_lines(&screen.hotkeys)), halves[1]);
}

/// Hotkeys laid out column by column, [`HOTKEY_ROWS`] per column
fn hotkey_lines(hotkeys: &[HotkeyInfo]) -> Vec<Line<'static>> {
    let rows = hotkeys.len().min(HOTKEY_ROWS);
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    (0..rows)
        .map(|row| {
            let spans = hotkeys
                .iter()
                .skip(row)
                .step_by(rows)
                .flat_map(|hotkey| {
                    let chord = format!("<{}> ", hotkey.chord);
                    let pad = HOTKEY_WIDTH.saturating_sub(chord.len() + hotkey.title.len());
                    [
                        Span::styled(chord, key_style),
                        Span::raw(format!("{}{}", hotkey.title, " ".repeat(pad))),
                    ]
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

fn draw_search(frame: &mut Frame, area: Rect, search: &SearchBar) {
    let mut spans = vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(search.term.clone()),
    ];
    if search.active {
        let cursor = Style::default().add_modifier(Modifier::SLOW_BLINK);
        spans.push(Span::styled("_", cursor));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_table(frame: &mut Frame, area: Rect, screen: &Screen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", screen.title));

    let body = &screen.body;
    if body.columns.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    let header = Row::new(body.columns.iter().map(|c| Cell::from(c.clone())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = body
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.clone()))));
    let widths = vec![Constraint::Fill(1); body.columns.len()];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(body.selected);
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_modal(frame: &mut Frame, modal: &ModalFrame) {
    let area = modal_area(modal.geometry, frame.area());
    frame.render_widget(Clear, area);

    let view = &modal.view;
    let border = if view.error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", view.title));

    let focused = Style::default().add_modifier(Modifier::REVERSED);
    let mut lines: Vec<Line> = view
        .text
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    if !view.fields.is_empty() {
        lines.push(Line::from(""));
    }
    for field in &view.fields {
        let value = if field.focused {
            Span::styled(format!("{}_", field.value), focused)
        } else {
            Span::raw(field.value.clone())
        };
        let label = Span::raw(format!("{}: ", field.label));
        lines.push(Line::from(vec![label, value]));
    }
    if !view.buttons.is_empty() {
        lines.push(Line::from(""));
        let buttons: Vec<Span> = view
            .buttons
            .iter()
            .flat_map(|button| {
                let style = if button.focused { focused } else { Style::default() };
                [
                    Span::styled(format!("[ {} ]", button.label), style),
                    Span::raw(" "),
                ]
            })
            .collect();
        lines.push(Line::from(buttons));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// The requested modal size centered in `area`, shrunk to fit
fn modal_area(geometry: Geometry, area: Rect) -> Rect {
    let width = geometry.width.min(area.width);
    let height = geometry.height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
