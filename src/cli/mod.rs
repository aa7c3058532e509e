//! CLI command handlers
//!
//! Each subcommand of the feedback-portal CLI has its own module with a
//! single `handle` function.

pub mod ask;
pub mod config;
pub mod export;
pub mod helpers;
pub mod list;
pub mod submit;
pub mod suggest;
pub mod summary;
