//! Library crate for libmanager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Backend client and record types (`api`)
//! - Application state, pages and the update loop (`app`)
//! - Error and result types (`error`)
//! - Toast notifications (`notify`)
//! - In-memory book search (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `libmanager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod error;
pub mod notify;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{ApiError, DynError, Result};
