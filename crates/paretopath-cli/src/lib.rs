//! Paretopath CLI library.
//!
//! Logging setup and text rendering shared by the `paretopath` binary and its
//! tests.

pub mod logging;
pub mod output;
