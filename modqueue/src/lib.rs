//! Moderation report aggregator and resolver.
//!
//! This crate fetches three independently paginated report collections
//! (comment, post and private-message reports), tracks each collection's
//! request lifecycle on its own, merges them into one chronological feed on
//! read, and patches a single report in place after it is resolved. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (request states, normalization,
//!   merge ordering, in-place patching, the collection store). No I/O.
//! - **[`io`]**: Side-effecting operations (remote report API, config files).
//!   Isolated behind the [`io::api::ReportsApi`] trait so tests can script it.
//!
//! Orchestration modules ([`view`], [`session`]) coordinate core logic with
//! I/O to implement the CLI commands and the UI server handlers.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod view;
