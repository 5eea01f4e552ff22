//! Process exit codes.

/// The run finished normally.
pub const OK: i32 = 0;
/// The difficulty selection was not 0, 1 or 2.
pub const INVALID_SELECTION: i32 = 1;
/// Capture, input or terminal I/O failed.
pub const FAILURE: i32 = 2;
