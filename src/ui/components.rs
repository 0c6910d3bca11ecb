//! Shared UI components: header, sidebar, status bar, toasts and the help modal.
//!
//! Static chrome only; nothing here changes application state.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, Page};
use crate::notify::ToastStatus;

pub const APP_NAME: &str = "LibManager";

/// Window-style title for a page, e.g. "LibManager | Rent".
pub fn page_title(page: Page) -> String {
    format!("{APP_NAME} | {}", page.title())
}

pub fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new(Line::from(vec![
        Span::styled(
            page_title(app.active_page),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   ?: help  [ ]: switch page  q: quit"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

pub fn render_sidebar(f: &mut Frame, area: Rect, app: &AppState) {
    let items: Vec<ListItem> = Page::ALL
        .iter()
        .map(|p| {
            if *p == app.active_page {
                ListItem::new(format!("> {}", p.title())).style(
                    Style::default()
                        .fg(app.theme.highlight_fg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ListItem::new(format!("  {}", p.title())).style(Style::default().fg(app.theme.text))
            }
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title("Menu")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(list, area);
}

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::SearchBooks => "SEARCH",
        InputMode::Help => "HELP",
    };
    let pending = if app.rent.is_submitting() { "  renting..." } else { "" };
    let mut msg = format!(
        "mode: {mode}  users:{}  books:{}/{}",
        app.users.len(),
        app.books.len(),
        app.books_all.len(),
    );
    if !app.api_label.is_empty() {
        msg.push_str(&format!("  api:{}", app.api_label));
    }
    msg.push_str(pending);
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Draw the visible toast in the bottom-right corner of `area`.
pub fn render_toast(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(toast) = app.toasts.current() else {
        return;
    };
    let (title, color) = match toast.status {
        ToastStatus::Success => ("Success", app.theme.success),
        ToastStatus::Error => ("Error", app.theme.error),
    };
    let width = 44u16.min(area.width);
    let inner_w = width.saturating_sub(2).max(1) as usize;
    let lines = toast.message.chars().count().div_ceil(inner_w).max(1) as u16;
    let height = (lines + 2).min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    };
    let mut block_title = title.to_string();
    if toast.closable {
        block_title.push_str(" (Esc)");
    }
    let p = Paragraph::new(toast.message.clone())
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .title(block_title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let keys = |a: KeyAction| app.keymap.keys_for(a).join(" / ");
    let row = |label: &str, a: KeyAction| {
        Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(keys(a), Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let section = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)))
    };

    let lines: Vec<Line> = vec![
        section("General"),
        row("Next page", KeyAction::NextPage),
        row("Previous page", KeyAction::PrevPage),
        row("Close notification", KeyAction::DismissToast),
        row("Quit", KeyAction::Quit),
        Line::raw(""),
        section("Rent page"),
        row("Next field", KeyAction::NextField),
        row("Previous field", KeyAction::PrevField),
        row("Change selection", KeyAction::MoveDown),
        row("Submit", KeyAction::Submit),
        Line::raw("Dates are typed as YYYY-MM-DD"),
        Line::raw(""),
        section("Books page"),
        row("Search", KeyAction::StartSearch),
        row("Scroll", KeyAction::MoveDown),
        Line::raw(""),
        Line::raw("Close help: Esc / Enter"),
    ];

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
