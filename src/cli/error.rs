// Exit codes for CLI automation
pub const SUCCESS: i32 = 0;
pub const ERROR: i32 = 1;
pub const NOT_FOUND: i32 = 2;
pub const INVALID_INPUT: i32 = 3;
pub const CONFLICT: i32 = 4;
