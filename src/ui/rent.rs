use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::rent::{DateInput, RentField, SelectInput};
use crate::app::{AppState, Page, Theme};

pub fn render_rent_page(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(area);

    super::render_heading(f, rows[0], app, Page::Rent);

    let page = &app.rent;
    let selects = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_select(f, selects[0], &app.theme, "User", &page.form.user, page.focus == RentField::User);
    render_select(f, selects[1], &app.theme, "Book", &page.form.book, page.focus == RentField::Book);

    let dates = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Length(24), Constraint::Min(0)])
        .split(rows[2]);
    render_date(f, dates[0], &app.theme, "Start date", &page.form.initial_date, page.focus == RentField::InitialDate);
    render_date(f, dates[1], &app.theme, "End date", &page.form.final_date, page.focus == RentField::FinalDate);

    render_submit(f, rows[3], app);
}

fn field_block<'a>(theme: &Theme, title: &'a str, focused: bool) -> Block<'a> {
    let border = if focused { theme.focus } else { theme.border };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn render_select(f: &mut Frame, area: Rect, theme: &Theme, title: &str, input: &SelectInput, focused: bool) {
    let cursor = input.cursor();
    let mut items = Vec::with_capacity(input.options().len() + 1);
    let placeholder_style = if cursor.is_none() {
        Style::default().fg(theme.highlight_fg).add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(theme.muted)
    };
    items.push(ListItem::new(input.placeholder).style(placeholder_style));
    for (i, opt) in input.options().iter().enumerate() {
        let style = if cursor == Some(i) {
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme.text)
        };
        items.push(ListItem::new(opt.label.clone()).style(style));
    }

    // Keep the selected row on screen.
    let visible = area.height.saturating_sub(2) as usize;
    let selected_row = cursor.map(|i| i + 1).unwrap_or(0);
    let skip = if visible > 0 && selected_row >= visible { selected_row + 1 - visible } else { 0 };
    let items: Vec<ListItem> = items.into_iter().skip(skip).collect();

    f.render_widget(List::new(items).block(field_block(theme, title, focused)), area);
}

fn render_date(f: &mut Frame, area: Rect, theme: &Theme, title: &str, input: &DateInput, focused: bool) {
    let line = if input.text().is_empty() {
        Line::from(Span::styled("e.g. 2021-04-02", Style::default().fg(theme.muted)))
    } else {
        let style = if input.date().is_some() {
            Style::default().fg(theme.text)
        } else {
            Style::default().fg(theme.error)
        };
        let mut spans = vec![Span::styled(input.text().to_string(), style)];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(theme.focus)));
        }
        Line::from(spans)
    };
    let hint = Line::from(Span::styled("YYYY-MM-DD", Style::default().fg(theme.muted)));
    f.render_widget(
        Paragraph::new(vec![line, hint]).block(field_block(theme, title, focused)),
        area,
    );
}

fn render_submit(f: &mut Frame, area: Rect, app: &AppState) {
    let page = &app.rent;
    let focused = page.focus == RentField::Submit;
    let (label, style) = if page.is_submitting() {
        ("RENTING...", Style::default().fg(app.theme.muted))
    } else if page.submit_enabled() {
        (
            "RENT",
            Style::default().fg(app.theme.button).add_modifier(Modifier::BOLD),
        )
    } else {
        ("RENT", Style::default().fg(app.theme.muted).add_modifier(Modifier::DIM))
    };
    let style = if focused { style.add_modifier(Modifier::REVERSED) } else { style };
    let rect = Rect {
        width: area.width.min(16),
        ..area
    };
    let p = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(field_block(&app.theme, "", focused));
    f.render_widget(p, rect);
}
