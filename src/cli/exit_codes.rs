//! exit codes for gsq commands
//!
//! `check` follows `test(1)`: 0 when the query is true, 1 when it is false.
//! everything else is an error code that scripts can tell apart from a
//! false result.

/// command completed successfully, or the checked query is true
pub const SUCCESS: i32 = 0;

/// the checked query evaluated to false
pub const QUERY_FALSE: i32 = 1;

/// general or unknown error
pub const ERROR: i32 = 2;

/// the query references an unknown key or alias
pub const INVALID_QUERY: i32 = 3;

/// configuration file error
pub const CONFIG_ERROR: i32 = 4;

/// state file missing or malformed
pub const STATE_ERROR: i32 = 5;

/// exit code for a `check` result
pub fn for_check(result: bool) -> i32 {
    if result {
        SUCCESS
    } else {
        QUERY_FALSE
    }
}
