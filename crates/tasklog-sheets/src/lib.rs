//! Google Sheets store for tasklog.
//!
//! Talks to the Sheets v4 REST API with service-account tokens and
//! exposes the spreadsheet through [`tasklog_core::SheetStore`].

#![forbid(unsafe_code)]

pub mod client;
mod wire;

pub use client::{DEFAULT_BASE_URL, SheetsClient, SheetsClientBuilder};
