// Best-effort parsing of free-text model output into display segments.
// Nothing here fails: input that does not follow the expected convention
// degrades to a single unsegmented block.

pub mod links;
pub mod sections;
pub mod suggestions;
pub mod transcript;

pub use links::{collect_links, split_links, Inline};
pub use sections::{segment_sections, Section};
pub use suggestions::{parse_suggestions, SuggestionList};
pub use transcript::{parse_transcript, TranscriptLine};
