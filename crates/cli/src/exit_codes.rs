//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                           |
//! |------|---------------------------------------------------|
//! | 0    | Success (including "no common values found")      |
//! | 1    | General error (unspecified)                       |
//! | 2    | Usage error (bad arguments)                       |
//! | 3    | Load failure (workbook or sheet missing/unreadable) |
//! | 4    | Export failure (destination could not be written) |
//! | 5    | Invalid config file                               |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, duplicate sheets, invalid sheet name.
pub const EXIT_USAGE: u8 = 2;

/// Source workbook or a requested sheet is missing or unreadable.
pub const EXIT_LOAD: u8 = 3;

/// Report could not be written (xlsx, csv or json destination).
pub const EXIT_EXPORT: u8 = 4;

/// Config file could not be read, parsed or validated.
pub const EXIT_INVALID_CONFIG: u8 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_LOAD, EXIT_EXPORT, EXIT_INVALID_CONFIG];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
