//! Process exit codes. Consumers rely on the status alone, never on output.

pub const OK: i32 = 0;
/// Any error finding, missing mode inputs, or a fatal setup error.
pub const VALIDATION_FAILED: i32 = 1;
