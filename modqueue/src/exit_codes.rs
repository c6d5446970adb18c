//! Stable exit codes for modqueue CLI commands.

/// Command succeeded and every requested report collection loaded.
pub const OK: i32 = 0;
/// Command failed due to invalid config, arguments, or a failed resolve.
pub const INVALID: i32 = 1;
/// No session token is available; the caller must log in first.
pub const NOT_AUTHENTICATED: i32 = 2;
/// `modqueue list` printed a feed, but at least one collection failed to load.
pub const PARTIAL: i32 = 3;
