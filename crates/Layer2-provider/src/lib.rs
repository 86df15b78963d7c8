//! # trimctx-provider
//!
//! Network scorers for trimctx.
//!
//! ## Features
//! - Prompt logprobs from OpenAI-compatible `/completions` endpoints
//! - Automatic retry with exponential backoff for transient failures
//! - Provider errors mapped onto the foundation error taxonomy

pub mod error;
pub mod providers;
pub mod retry;

// Error and retry
pub use error::ProviderError;
pub use retry::{with_retry, RetryClassification, RetryConfig, RetryableError};

// Scorer implementations
pub use providers::openai::{OpenAiCompatScorer, DEFAULT_BASE_URL, DEFAULT_MODEL};
