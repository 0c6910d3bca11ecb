//! Transient notifications ("toasts") reporting the outcome of an action.
//!
//! Toasts are shown one at a time in arrival order. The one at the front is
//! stamped when it first becomes visible and expires after its duration, or
//! earlier if the user dismisses it.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastStatus {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub status: ToastStatus,
    pub message: String,
    pub duration: Duration,
    pub closable: bool,
    shown_at: Option<Instant>,
}

impl Toast {
    pub fn new(status: ToastStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            duration: TOAST_DURATION,
            closable: true,
            shown_at: None,
        }
    }

    fn expired(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|t| now.saturating_duration_since(t) >= self.duration)
    }
}

#[derive(Debug, Default)]
pub struct ToastQueue {
    queue: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        self.queue.push_back(toast);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Toast::new(ToastStatus::Success, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Toast::new(ToastStatus::Error, message));
    }

    /// The toast currently on screen, if any.
    pub fn current(&self) -> Option<&Toast> {
        self.queue.front()
    }

    /// Advance the clock: stamp the front toast if it was never shown and
    /// drop it once its duration has elapsed.
    pub fn tick(&mut self, now: Instant) {
        while let Some(front) = self.queue.front_mut() {
            if front.shown_at.is_none() {
                front.shown_at = Some(now);
                break;
            }
            if !front.expired(now) {
                break;
            }
            self.queue.pop_front();
        }
    }

    /// Close the visible toast. Returns whether anything was closed.
    pub fn dismiss(&mut self) -> bool {
        match self.queue.front() {
            Some(t) if t.closable => {
                self.queue.pop_front();
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }
}
