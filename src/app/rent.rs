//! Rent-book page state: two selects, two date inputs and the submission.
//!
//! The page owns its form exclusively. A submission runs on a worker thread
//! and its outcome is picked up by [`RentPage::poll_submission`] from the UI
//! loop, which turns it into exactly one toast.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{Book, LibraryApi, RentRequest, User};
use crate::error::ApiError;
use crate::notify::ToastQueue;

pub const RENT_SUCCESS_MESSAGE: &str = "Book rented successfully!";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One entry of a select input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
}

/// A drop-down style input. `cursor == None` is the placeholder (unset).
#[derive(Clone, Debug)]
pub struct SelectInput {
    pub placeholder: &'static str,
    options: Vec<SelectOption>,
    cursor: Option<usize>,
}

impl SelectInput {
    pub fn new(placeholder: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            placeholder,
            options,
            cursor: None,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected(&self) -> Option<&SelectOption> {
        self.cursor.and_then(|i| self.options.get(i))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected().map(|o| o.id.as_str())
    }

    /// Select by id; `None` or an unknown id goes back to the placeholder.
    pub fn select_id(&mut self, id: Option<&str>) {
        self.cursor = id.and_then(|id| self.options.iter().position(|o| o.id == id));
    }

    /// Move down the list; wraps from the last option back to the placeholder.
    pub fn next(&mut self) {
        self.cursor = match self.cursor {
            None if !self.options.is_empty() => Some(0),
            Some(i) if i + 1 < self.options.len() => Some(i + 1),
            _ => None,
        };
    }

    /// Move up the list; wraps from the placeholder to the last option.
    pub fn prev(&mut self) {
        self.cursor = match self.cursor {
            None => self.options.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }
}

/// A `YYYY-MM-DD` text field. Its date is set only while the text parses.
#[derive(Clone, Debug, Default)]
pub struct DateInput {
    buffer: String,
}

impl DateInput {
    const MAX_LEN: usize = 10;

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.buffer, DATE_FORMAT).ok()
    }

    /// Accept digits and `-` only. Returns whether the character was taken.
    pub fn push(&mut self, c: char) -> bool {
        if (c.is_ascii_digit() || c == '-') && self.buffer.len() < Self::MAX_LEN {
            self.buffer.push(c);
            true
        } else {
            false
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn set(&mut self, date: Option<NaiveDate>) {
        self.buffer = date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
    }
}

/// The four pieces of state behind the rent form.
#[derive(Clone, Debug)]
pub struct RentForm {
    pub user: SelectInput,
    pub book: SelectInput,
    pub initial_date: DateInput,
    pub final_date: DateInput,
}

impl RentForm {
    /// Build the selects from the fetched lists, keeping their order.
    pub fn new(users: &[User], books: &[Book]) -> Self {
        let user_opts = users
            .iter()
            .map(|u| SelectOption {
                id: u.id.clone(),
                label: u.name.clone(),
            })
            .collect();
        let book_opts = books
            .iter()
            .map(|b| SelectOption {
                id: b.id.clone(),
                label: b.title.clone(),
            })
            .collect();
        Self {
            user: SelectInput::new("Select a user", user_opts),
            book: SelectInput::new("Select a book", book_opts),
            initial_date: DateInput::default(),
            final_date: DateInput::default(),
        }
    }

    pub fn selected_user(&self) -> Option<&str> {
        self.user.selected_id().filter(|id| !id.is_empty())
    }

    pub fn selected_book(&self) -> Option<&str> {
        self.book.selected_id().filter(|id| !id.is_empty())
    }

    pub fn select_user(&mut self, id: Option<&str>) {
        self.user.select_id(id);
    }

    pub fn select_book(&mut self, id: Option<&str>) {
        self.book.select_id(id);
    }

    pub fn set_initial_date(&mut self, date: Option<NaiveDate>) {
        self.initial_date.set(date);
    }

    pub fn set_final_date(&mut self, date: Option<NaiveDate>) {
        self.final_date.set(date);
    }

    pub fn can_submit(&self) -> bool {
        self.to_request().is_some()
    }

    /// The request this form would send, if every field is set.
    pub fn to_request(&self) -> Option<RentRequest> {
        Some(RentRequest {
            user_id: self.selected_user()?.to_string(),
            book_id: self.selected_book()?.to_string(),
            initial_date: self.initial_date.date()?,
            final_date: self.final_date.date()?,
        })
    }
}

/// Focus order of the rent page.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RentField {
    User,
    Book,
    InitialDate,
    FinalDate,
    Submit,
}

impl RentField {
    pub fn next(self) -> Self {
        match self {
            RentField::User => RentField::Book,
            RentField::Book => RentField::InitialDate,
            RentField::InitialDate => RentField::FinalDate,
            RentField::FinalDate => RentField::Submit,
            RentField::Submit => RentField::User,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            RentField::User => RentField::Submit,
            RentField::Book => RentField::User,
            RentField::InitialDate => RentField::Book,
            RentField::FinalDate => RentField::InitialDate,
            RentField::Submit => RentField::FinalDate,
        }
    }
}

type SubmitOutcome = Result<Value, ApiError>;

pub struct RentPage {
    pub form: RentForm,
    pub focus: RentField,
    pending: Option<Receiver<SubmitOutcome>>,
}

impl RentPage {
    pub fn new(users: &[User], books: &[Book]) -> Self {
        Self {
            form: RentForm::new(users, books),
            focus: RentField::User,
            pending: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the submit button is enabled right now.
    pub fn submit_enabled(&self) -> bool {
        !self.is_submitting() && self.form.can_submit()
    }

    /// Start sending the rental request. Returns `false` when the button is
    /// disabled and nothing was sent.
    pub fn submit(&mut self, api: Arc<dyn LibraryApi>) -> bool {
        if self.is_submitting() {
            return false;
        }
        let Some(req) = self.form.to_request() else {
            return false;
        };
        info!(user = %req.user_id, book = %req.book_id, "submitting rental");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = api.create_rent(&req);
            // The page may be gone by now; nobody left to tell.
            let _ = tx.send(outcome);
        });
        self.pending = Some(rx);
        true
    }

    /// Collect a finished submission, if any, and report it as a toast.
    /// Returns whether a submission completed.
    pub fn poll_submission(&mut self, toasts: &mut ToastQueue) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                warn!("rental worker exited without a result");
                toasts.error("The rental request was interrupted");
                return true;
            }
        };
        self.pending = None;
        report_outcome(outcome, toasts);
        true
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            RentField::InitialDate => {
                self.form.initial_date.push(c);
            }
            RentField::FinalDate => {
                self.form.final_date.push(c);
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            RentField::InitialDate => self.form.initial_date.backspace(),
            RentField::FinalDate => self.form.final_date.backspace(),
            _ => {}
        }
    }

    pub fn move_up(&mut self) {
        match self.focus {
            RentField::User => self.form.user.prev(),
            RentField::Book => self.form.book.prev(),
            _ => {}
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            RentField::User => self.form.user.next(),
            RentField::Book => self.form.book.next(),
            _ => {}
        }
    }
}

fn report_outcome(outcome: SubmitOutcome, toasts: &mut ToastQueue) {
    match outcome {
        Ok(body) => {
            debug!(%body, "rental created");
            toasts.success(RENT_SUCCESS_MESSAGE);
        }
        Err(err) => {
            warn!(error = %err, status = ?err.status(), "rental request failed");
            toasts.error(err.message());
        }
    }
}
