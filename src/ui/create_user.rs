use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{AppState, Page};

/// The user registration screen has no form yet: heading only.
pub fn render_create_user_page(f: &mut Frame, area: Rect, app: &AppState) {
    super::render_heading(f, area, app, Page::CreateUser);
}
