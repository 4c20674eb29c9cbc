pub mod document_exporter;
pub mod llm_service;
pub mod prompt_builder;
pub mod response_splitter;
pub mod topic_matcher;

pub use document_exporter::{export_bundle, export_document, ExportBundle, ExportRequest};
pub use llm_service::{LlmService, TextGenerator};
pub use prompt_builder::{build_prompt, OperationKind, PromptPair, PromptRequest};
pub use response_splitter::{join_units, split_response, SplitMode};
pub use topic_matcher::{find_matches, style_references, DifficultyBuckets};
