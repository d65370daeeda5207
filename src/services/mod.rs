pub mod filter_service;
pub mod report;

pub use filter_service::{FilterService, RunHandle};
pub use report::{fingerprint, RunReport, Size};
