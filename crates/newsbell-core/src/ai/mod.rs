pub mod providers;
mod summarizer;

pub use providers::TextGenerator;
pub use summarizer::Summarizer;
