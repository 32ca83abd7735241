pub mod export_writer;
pub mod generation;
pub mod llm_service;

pub use export_writer::ExportWriter;
pub use generation::{ContentGenerator, GenerationService};
pub use llm_service::LlmService;
