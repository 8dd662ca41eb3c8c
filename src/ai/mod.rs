//! AI Integration Layer
//!
//! LLM access for synonym generation, webification, name rating and search
//! result evaluation.

pub mod provider;
pub mod timeout;
pub mod validation;

pub use provider::{
    LlmProvider, LlmResponse, OpenAiCompatibleProvider, ResponseSchema, SharedProvider,
    TokenUsage,
};
pub use timeout::{TimeoutConfig, with_timeout, with_timeout_map};
pub use validation::{JsonRepairer, extract_json_from_response};
