//! Utility modules.

pub mod datetime;

pub use datetime::{format_millis_rfc3339, now_millis};
