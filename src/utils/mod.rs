pub mod logging;

pub use logging::{redact_key, truncate_text};
