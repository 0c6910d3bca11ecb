use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use crate::app::keymap::KeyAction;
use crate::app::rent::RentField;
use crate::app::{AppState, InputMode, Page};
use crate::search::apply_search;
use crate::ui;

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()> {
    info!(page = app.active_page.title(), "event loop started");
    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(app, key) {
                    break;
                }
            }
        }

        tick(app, Instant::now());
    }
    info!(uptime_secs = app.started_at.elapsed().as_secs(), "event loop finished");
    Ok(())
}

/// Work done once per loop iteration regardless of input.
pub fn tick(app: &mut AppState, now: Instant) {
    app.rent.poll_submission(&mut app.toasts);
    app.toasts.tick(now);
}

/// Apply one key press. Returns `false` when the application should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.input_mode = InputMode::Normal;
            }
            true
        }
        InputMode::SearchBooks => {
            match key.code {
                KeyCode::Enter => {
                    apply_search(app);
                    app.input_mode = InputMode::Normal;
                }
                KeyCode::Esc => {
                    app.search_query.clear();
                    apply_search(app);
                    app.input_mode = InputMode::Normal;
                }
                KeyCode::Backspace => {
                    app.search_query.pop();
                }
                KeyCode::Char(c) => app.search_query.push(c),
                _ => {}
            }
            true
        }
        InputMode::Normal => match app.keymap.resolve(&key) {
            Some(KeyAction::Quit) => false,
            Some(action) => {
                handle_action(app, action);
                true
            }
            None => {
                if app.active_page == Page::Rent {
                    match key.code {
                        KeyCode::Char(c) => app.rent.input_char(c),
                        KeyCode::Backspace => app.rent.backspace(),
                        _ => {}
                    }
                }
                true
            }
        },
    }
}

fn handle_action(app: &mut AppState, action: KeyAction) {
    match action {
        KeyAction::OpenHelp => app.input_mode = InputMode::Help,
        KeyAction::NextPage => app.active_page = app.active_page.next(),
        KeyAction::PrevPage => app.active_page = app.active_page.prev(),
        KeyAction::DismissToast => {
            app.toasts.dismiss();
        }
        KeyAction::Quit | KeyAction::Ignore => {}
        _ => match app.active_page {
            Page::Rent => handle_rent_action(app, action),
            Page::Books => handle_books_action(app, action),
            Page::CreateUser => {}
        },
    }
}

fn handle_rent_action(app: &mut AppState, action: KeyAction) {
    let page = &mut app.rent;
    match action {
        KeyAction::NextField => page.focus = page.focus.next(),
        KeyAction::PrevField => page.focus = page.focus.prev(),
        KeyAction::MoveUp => page.move_up(),
        KeyAction::MoveDown => page.move_down(),
        KeyAction::Activate if page.focus != RentField::Submit => page.focus = page.focus.next(),
        KeyAction::Activate | KeyAction::Submit => {
            page.submit(Arc::clone(&app.api));
        }
        _ => {}
    }
}

fn handle_books_action(app: &mut AppState, action: KeyAction) {
    let last = app.books.len().saturating_sub(1);
    let rpp = app.rows_per_page.max(1);
    match action {
        KeyAction::StartSearch => {
            app.search_query.clear();
            app.input_mode = InputMode::SearchBooks;
        }
        KeyAction::MoveUp => app.selected_book_index = app.selected_book_index.saturating_sub(1),
        KeyAction::MoveDown => app.selected_book_index = (app.selected_book_index + 1).min(last),
        KeyAction::PageUp => app.selected_book_index = app.selected_book_index.saturating_sub(rpp),
        KeyAction::PageDown => app.selected_book_index = (app.selected_book_index + rpp).min(last),
        _ => {}
    }
}
