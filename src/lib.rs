//! Library crate for user-directory.
//!
//! This crate exposes the building blocks of the TUI:
//! - Screen state machine and event loop (`app`)
//! - Command-line arguments (`cli`)
//! - Request layer running GraphQL operations off the UI thread (`client`)
//! - Error and result types (`error`)
//! - GraphQL operations and the HTTP data source (`gql`)
//! - Tracing setup (`logging`)
//! - UI rendering (`ui`)
//!
//! It is used by the `user-directory` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod cli;
pub mod client;
pub mod error;
pub mod gql;
pub mod logging;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
