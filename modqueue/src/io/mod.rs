//! I/O helpers for modqueue commands.

pub mod api;
pub mod config;
pub mod http;
