pub mod gemini;
pub mod messages;
pub mod summary;
pub mod transcript;

pub use gemini::GenerateContentRequest;
pub use messages::{PanelEvent, PanelRequest, TranscriptReply};
pub use summary::{SummaryRequest, SummaryResult};
pub use transcript::{ExtractionResult, Transcript};
