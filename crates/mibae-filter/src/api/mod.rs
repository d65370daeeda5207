//! Public API for the mibae-filter crate.
//!
//! This module provides the high-level API: [`MibaeFilter`] builder and
//! [`FilterError`] unified error type.

mod builder;
mod error;

pub use builder::MibaeFilter;
pub use error::FilterError;
