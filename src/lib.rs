//! Mibae - halftone tone-pattern filter
//!
//! Host side of the filter: configuration, PNG I/O, the async filter service
//! and run reports. The filter itself lives in `mibae-filter`.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
