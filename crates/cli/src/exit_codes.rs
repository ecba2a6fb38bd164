//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | Internal error (not caused by the input)  |
//! | 2    | Usage error (bad args, unknown format)    |
//! | 3    | Input payload could not be read or parsed |
//! | 4    | Configuration invalid or unreadable       |
//! | 5    | Export or output write failed             |
//! | 6    | Search handle not found (unknown/expired) |

use scholar_io::IoError;

use crate::service::ServiceError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - internal failure not caused by input, config or output.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input file missing, unreadable, or not valid for its format.
pub const EXIT_INPUT: u8 = 3;

/// Config file unreadable, unparsable, or out of range.
pub const EXIT_CONFIG: u8 = 4;

/// Export encoding or output write failed.
pub const EXIT_EXPORT: u8 = 5;

/// Search handle unknown, expired, or evicted.
pub const EXIT_NOT_FOUND: u8 = 6;

/// Map an I/O layer error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Read { .. } | IoError::Parse { .. } => EXIT_INPUT,
        IoError::Write { .. } | IoError::Export(_) => EXIT_EXPORT,
    }
}

pub fn service_exit_code(err: &ServiceError) -> u8 {
    match err {
        ServiceError::NotFound(_) => EXIT_NOT_FOUND,
        ServiceError::Export(e) => io_exit_code(e),
    }
}
