use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, InputMode, Page};

pub fn render_books_page(f: &mut Frame, area: Rect, app: &mut AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    super::render_heading(f, rows[0], app, Page::Books);

    let search = match app.input_mode {
        InputMode::SearchBooks => format!("Search: {}_", app.search_query),
        _ if !app.search_query.is_empty() => format!("Filter: {}  (/ to change)", app.search_query),
        _ => "/ to search by title, author or ISBN".to_string(),
    };
    f.render_widget(
        Paragraph::new(search).style(Style::default().fg(app.theme.muted)),
        rows[1],
    );

    render_books_table(f, rows[2], app);
}

fn render_books_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }
    if app.selected_book_index >= app.books.len() {
        app.selected_book_index = app.books.len().saturating_sub(1);
    }

    let start = (app.selected_book_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.books.len());
    let slice = &app.books[start..end];

    let rows = slice.iter().enumerate().map(|(i, b)| {
        let style = if start + i == app.selected_book_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(b.title.clone()),
            Cell::from(b.author.clone()),
            Cell::from(b.isbn.clone()),
            Cell::from(b.id.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Length(16),
        Constraint::Min(6),
    ];
    let header = Row::new(vec!["TITLE", "AUTHOR", "ISBN", "ID"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );
    let title = format!("Books ({})", app.books.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
