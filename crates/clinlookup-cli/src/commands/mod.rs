//! CLI command implementations.

pub mod batch;
pub mod interactive;
pub mod single;

/// Exit status when a query resolves to no record.
pub const EXIT_UNRESOLVED: u8 = 2;
