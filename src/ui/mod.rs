pub mod books;
pub mod components;
pub mod create_user;
pub mod rent;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, InputMode, Page};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(18), Constraint::Min(20)].as_ref())
        .split(root[1]);

    components::render_header(f, root[0], app);
    components::render_sidebar(f, body[0], app);

    let main = inset(body[1]);
    match app.active_page {
        Page::Rent => rent::render_rent_page(f, main, app),
        Page::Books => books::render_books_page(f, main, app),
        Page::CreateUser => create_user::render_create_user_page(f, main, app),
    }

    components::render_status_bar(f, root[2], app);
    components::render_toast(f, root[1], app);

    if app.input_mode == InputMode::Help {
        components::render_help_modal(f, f.area(), app);
    }
}

/// Page heading, the first line of every page body.
pub fn render_heading(f: &mut Frame, area: Rect, app: &AppState, page: Page) {
    let p = Paragraph::new(page.heading()).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(p, area);
}

fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    }
}
