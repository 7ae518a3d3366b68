pub mod log_redact;
pub mod time_utils;

pub use log_redact::{redact_address, SensitiveRedact};
pub use time_utils::current_timestamp_ms;
