//! Library components of the `mojimap` command line.

pub mod config;
pub mod logging;
pub mod processor;
pub mod summary;
