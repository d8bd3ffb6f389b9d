pub mod extraction_flow;

pub use extraction_flow::{ExtractionFlow, ExtractionState};
