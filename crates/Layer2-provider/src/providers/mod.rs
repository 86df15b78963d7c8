//! Scorer implementations backed by remote language models

pub mod openai;

pub use openai::{parse_prompt_logprobs, OpenAiCompatScorer, PromptLogprobs};
