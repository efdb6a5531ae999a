// Interview question sets: generation, owner-scoped storage and CSV export.
// All LLM calls go through llm_client.

pub mod export;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod store;
