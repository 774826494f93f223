//! Todoist source adapter for tasklog.
//!
//! Reads projects from the REST API and completed tasks from the sync
//! API's `completed/get_all` endpoint, and exposes both through
//! [`tasklog_core::TaskSource`].

#![forbid(unsafe_code)]

pub mod client;
mod wire;

pub use client::{
    DEFAULT_REST_BASE_URL, DEFAULT_SYNC_BASE_URL, DEFAULT_TASK_LIMIT, TodoistClient,
    TodoistClientBuilder,
};
