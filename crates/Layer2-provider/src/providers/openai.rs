//! OpenAI-compatible surprisal scorer
//!
//! Scores a sentence with the legacy `/completions` endpoint: the prompt is
//! echoed back with the logprob of every prompt token.
//! Works with OpenAI-compatible servers that support `echo` with `logprobs`
//! (vLLM, llama.cpp server, text-generation-webui, ...).

use crate::error::ProviderError;
use crate::retry::{with_retry, RetryConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use trimctx_foundation::{
    Result as TrimResult, ScoredSentence, ScoredToken, ScorerSettings, SelfInfoScorer,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/v1";
pub const DEFAULT_MODEL: &str = "gpt2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Scorer backed by an OpenAI-compatible completions endpoint
pub struct OpenAiCompatScorer {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    retry: RetryConfig,
}

impl OpenAiCompatScorer {
    /// Create a scorer for `model` on the default base URL
    pub fn new(model: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            api_key: None,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryConfig::default(),
        })
    }

    /// Create from settings; the API key falls back to `OPENAI_API_KEY`
    pub fn from_settings(settings: &ScorerSettings) -> Result<Self, ProviderError> {
        let model = settings
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "scorer model must not be empty".to_string(),
            ));
        }

        let mut scorer = Self::new(model)?
            .with_timeout(Duration::from_secs(
                settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))?;

        if let Some(base_url) = &settings.base_url {
            scorer = scorer.with_base_url(base_url);
        }
        if let Some(max_retries) = settings.max_retries {
            scorer = scorer.with_retry(RetryConfig::default().with_max_retries(max_retries));
        }

        let api_key = settings
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.is_empty());
        if let Some(key) = api_key {
            scorer = scorer.with_api_key(key);
        }

        Ok(scorer)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// API base URL, e.g. `https://api.openai.com/v1`
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ProviderError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: 1,
            echo: true,
            logprobs: 0,
            temperature: 0.0,
        }
    }

    /// Score a sentence, retrying transient failures
    pub async fn score_sentence(&self, sentence: &str) -> Result<ScoredSentence, ProviderError> {
        let logprobs = with_retry(&self.retry, "score", || self.request_logprobs(sentence)).await?;
        parse_prompt_logprobs(sentence, logprobs)
    }

    /// One request, no retry
    async fn request_logprobs(&self, prompt: &str) -> Result<PromptLogprobs, ProviderError> {
        let mut request = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&self.build_request(prompt));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error_response(status.as_u16(), &body));
        }

        let api_response: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.logprobs)
            .ok_or_else(|| {
                ProviderError::InvalidResponse("response has no prompt logprobs".to_string())
            })
    }
}

#[async_trait]
impl SelfInfoScorer for OpenAiCompatScorer {
    fn name(&self) -> &str {
        "openai"
    }

    async fn score(&self, sentence: &str) -> TrimResult<ScoredSentence> {
        let scored = self.score_sentence(sentence).await?;
        debug!(
            model = %self.model,
            tokens = scored.tokens().len(),
            "scored sentence"
        );
        Ok(scored)
    }
}

fn build_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))
}

/// Map an error body to a provider error
fn parse_error_response(status: u16, body: &str) -> ProviderError {
    if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(body) {
        let message = error_response.error.message;

        return match error_response.error.code.as_deref() {
            Some("rate_limit_exceeded") => ProviderError::RateLimited {
                retry_after_ms: None,
            },
            Some("context_length_exceeded") => ProviderError::ContextLengthExceeded(message),
            Some("invalid_api_key") => ProviderError::Authentication(message),
            Some("insufficient_quota") => ProviderError::QuotaExceeded(message),
            Some("model_not_found") => ProviderError::ModelNotFound(message),
            _ => ProviderError::from_http_status(status, &message),
        };
    }

    ProviderError::from_http_status(status, body)
}

// ============================================================================
// Logprobs parsing
// ============================================================================

/// Decoded text of a byte-level token that ends inside a multi-byte char
const REPLACEMENT: char = '\u{FFFD}';

/// A prompt token with its text taken from the prompt itself
#[derive(Debug, Clone, PartialEq)]
struct PromptPiece {
    text: String,
    logprob: Option<f64>,
}

impl PromptPiece {
    /// Join two pieces of one char; the surprisal of the whole is the sum
    fn merge(self, next: PromptPiece) -> PromptPiece {
        let logprob = match (self.logprob, next.logprob) {
            (Some(a), Some(b)) => Some(a + b),
            _ => None,
        };
        PromptPiece {
            text: self.text + &next.text,
            logprob,
        }
    }
}

/// Turn echoed prompt logprobs into a scored sentence.
///
/// Token texts come from the prompt, not from the decoded strings: pieces of
/// a char split by a byte-level tokenizer decode to U+FFFD and are merged
/// into one token. Tokens past the end of the prompt (the completion) are
/// dropped. Leading tokens without a logprob form the unscored head; a
/// missing logprob after that is an invalid response.
pub fn parse_prompt_logprobs(
    prompt: &str,
    logprobs: PromptLogprobs,
) -> Result<ScoredSentence, ProviderError> {
    let PromptLogprobs {
        tokens,
        token_logprobs,
        text_offset,
    } = logprobs;

    if tokens.len() != token_logprobs.len() {
        return Err(ProviderError::InvalidResponse(format!(
            "{} tokens but {} logprobs",
            tokens.len(),
            token_logprobs.len()
        )));
    }

    let chars: Vec<char> = prompt.chars().collect();
    let by_offsets = text_offset
        .as_deref()
        .and_then(|offsets| slice_by_offsets(&chars, &tokens, &token_logprobs, offsets));
    let pieces = match by_offsets {
        Some(pieces) => pieces,
        None => {
            if text_offset.is_some() {
                debug!("text_offset disagrees with token texts, aligning by text");
            }
            align_to_prompt(&chars, &tokens, &token_logprobs)?
        }
    };

    let mut scored = Vec::with_capacity(pieces.len());
    let mut in_head = true;

    for piece in pieces {
        match piece.logprob {
            None if in_head => continue,
            None => {
                return Err(ProviderError::InvalidResponse(format!(
                    "token {:?} has no logprob",
                    piece.text
                )))
            }
            Some(lp) => {
                in_head = false;
                // Float noise can push a logprob slightly above zero
                scored.push(ScoredToken::new(piece.text, (-lp).max(0.0)));
            }
        }
    }

    ScoredSentence::new(prompt, scored).map_err(|e| match e {
        trimctx_foundation::Error::Scoring(message) => ProviderError::InvalidResponse(message),
        other => ProviderError::InvalidResponse(other.to_string()),
    })
}

/// Cut the prompt at the reported char offsets.
///
/// Returns `None` when the offsets cannot be trusted: they go backwards, a
/// plain token does not match its slice, or a U+FFFD piece covers only ASCII.
fn slice_by_offsets(
    prompt: &[char],
    tokens: &[String],
    logprobs: &[Option<f64>],
    offsets: &[usize],
) -> Option<Vec<PromptPiece>> {
    if offsets.len() != tokens.len() {
        return None;
    }

    let keep = offsets.iter().take_while(|&&o| o < prompt.len()).count();
    let mut pieces: Vec<PromptPiece> = Vec::with_capacity(keep);
    let mut pending: Option<PromptPiece> = None;

    for i in 0..keep {
        let start = offsets[i];
        let end = if i + 1 < keep { offsets[i + 1] } else { prompt.len() };
        if end < start {
            return None;
        }

        let text: String = prompt[start..end].iter().collect();
        if tokens[i].contains(REPLACEMENT) {
            if !text.is_empty() && text.is_ascii() {
                return None;
            }
        } else if text != tokens[i] {
            return None;
        }

        let piece = PromptPiece {
            text,
            logprob: logprobs[i],
        };
        let piece = match pending.take() {
            Some(before) => before.merge(piece),
            None => piece,
        };
        if piece.text.is_empty() {
            pending = Some(piece);
        } else {
            pieces.push(piece);
        }
    }

    if let Some(rest) = pending {
        match pieces.pop() {
            Some(last) => pieces.push(last.merge(rest)),
            None => return None,
        }
    }

    Some(pieces)
}

/// Walk the prompt with the decoded token texts.
///
/// A run of U+FFFD tokens covers the prompt up to where the next plain token
/// matches, or up to the end of the prompt when it never does. Tokens left once the prompt is
/// covered belong to the completion.
fn align_to_prompt(
    prompt: &[char],
    tokens: &[String],
    logprobs: &[Option<f64>],
) -> Result<Vec<PromptPiece>, ProviderError> {
    let matches_at = |at: usize, token: &str| {
        let mut rest = prompt[at..].iter();
        token.chars().all(|c| rest.next() == Some(&c))
    };

    let mut pieces = Vec::with_capacity(tokens.len());
    let mut cursor = 0;
    let mut i = 0;

    while i < tokens.len() && cursor < prompt.len() {
        if !tokens[i].contains(REPLACEMENT) {
            if !matches_at(cursor, &tokens[i]) {
                return Err(ProviderError::InvalidResponse(format!(
                    "token {:?} does not match the prompt at char {}",
                    tokens[i], cursor
                )));
            }
            let len = tokens[i].chars().count();
            pieces.push(PromptPiece {
                text: prompt[cursor..cursor + len].iter().collect(),
                logprob: logprobs[i],
            });
            cursor += len;
            i += 1;
            continue;
        }

        let run_end = (i..tokens.len())
            .find(|&j| !tokens[j].contains(REPLACEMENT))
            .unwrap_or(tokens.len());
        let end = match tokens.get(run_end) {
            // No match: the next token is already part of the completion
            Some(next) => (cursor + 1..=prompt.len())
                .find(|&at| matches_at(at, next))
                .unwrap_or(prompt.len()),
            None => prompt.len(),
        };

        let logprob = logprobs[i..run_end]
            .iter()
            .copied()
            .try_fold(0.0, |sum, lp| lp.map(|lp| sum + lp));
        pieces.push(PromptPiece {
            text: prompt[cursor..end].iter().collect(),
            logprob,
        });
        cursor = end;
        i = run_end;
    }

    if cursor < prompt.len() {
        return Err(ProviderError::InvalidResponse(format!(
            "tokens cover {} of {} prompt chars",
            cursor,
            prompt.len()
        )));
    }

    Ok(pieces)
}

// ============================================================================
// API types
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    echo: bool,
    logprobs: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    logprobs: Option<PromptLogprobs>,
}

/// `choices[0].logprobs` of a completions response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PromptLogprobs {
    pub tokens: Vec<String>,
    pub token_logprobs: Vec<Option<f64>>,
    #[serde(default)]
    pub text_offset: Option<Vec<usize>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> PromptLogprobs {
        let body = r#"{
            "id": "cmpl-1",
            "object": "text_completion",
            "choices": [{
                "index": 0,
                "text": "Bella is happy. She",
                "logprobs": {
                    "tokens": ["Bella", " is", " happy", ".", " She"],
                    "token_logprobs": [null, -1.5, -4.0, -0.5, -2.0],
                    "text_offset": [0, 5, 8, 14, 15],
                    "top_logprobs": null
                },
                "finish_reason": "length"
            }]
        }"#;
        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        response.choices.into_iter().next().unwrap().logprobs.unwrap()
    }

    #[test]
    fn test_parse_prompt_logprobs() {
        let scored = parse_prompt_logprobs("Bella is happy.", fixture()).unwrap();

        assert_eq!(scored.head(), "Bella");
        assert_eq!(
            pairs(&scored),
            vec![(" is", 1.5), (" happy", 4.0), (".", 0.5)]
        );
    }

    #[test]
    fn test_parse_without_offsets() {
        let mut logprobs = fixture();
        logprobs.text_offset = None;

        let scored = parse_prompt_logprobs("Bella is happy.", logprobs).unwrap();
        assert_eq!(scored.tokens().len(), 3);
    }

    #[test]
    fn test_parse_rejects_inner_null() {
        let mut logprobs = fixture();
        logprobs.token_logprobs[2] = None;

        let err = parse_prompt_logprobs("Bella is happy.", logprobs).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_rejects_mismatched_text() {
        let err = parse_prompt_logprobs("Bella was happy.", fixture()).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    fn split_emoji(text_offset: Option<Vec<usize>>) -> PromptLogprobs {
        PromptLogprobs {
            tokens: vec![
                "I".into(),
                " love".into(),
                " \u{FFFD}".into(),
                "\u{FFFD}".into(),
                ".".into(),
            ],
            token_logprobs: vec![None, Some(-2.0), Some(-5.0), Some(-1.0), Some(-0.5)],
            text_offset,
        }
    }

    fn pairs(scored: &ScoredSentence) -> Vec<(&str, f64)> {
        scored
            .tokens()
            .iter()
            .map(|t| (t.text.as_str(), t.surprisal))
            .collect()
    }

    #[test]
    fn test_parse_split_char_without_offsets() {
        let scored = parse_prompt_logprobs("I love 😀.", split_emoji(None)).unwrap();

        assert_eq!(scored.head(), "I");
        assert_eq!(
            pairs(&scored),
            vec![(" love", 2.0), (" 😀", 6.0), (".", 0.5)]
        );
    }

    #[test]
    fn test_parse_split_char_with_shared_offset() {
        let logprobs = split_emoji(Some(vec![0, 1, 6, 6, 8]));
        let scored = parse_prompt_logprobs("I love 😀.", logprobs).unwrap();

        assert_eq!(
            pairs(&scored),
            vec![(" love", 2.0), (" 😀", 6.0), (".", 0.5)]
        );
    }

    #[test]
    fn test_parse_split_char_with_drifting_offsets() {
        // Offsets counted over the decoded strings run past the prompt
        let logprobs = split_emoji(Some(vec![0, 1, 6, 8, 9]));
        let scored = parse_prompt_logprobs("I love 😀.", logprobs).unwrap();

        assert_eq!(
            pairs(&scored),
            vec![(" love", 2.0), (" 😀", 6.0), (".", 0.5)]
        );
    }

    #[test]
    fn test_parse_split_char_at_end_of_prompt() {
        let mut logprobs = split_emoji(None);
        logprobs.tokens[4] = "\n".into();

        let scored = parse_prompt_logprobs("I love 😀", logprobs).unwrap();
        assert_eq!(pairs(&scored), vec![(" love", 2.0), (" 😀", 6.0)]);
    }

    #[test]
    fn test_invalid_surprisal_message_is_not_wrapped_twice() {
        let mut logprobs = fixture();
        logprobs.token_logprobs[2] = Some(f64::NEG_INFINITY);

        match parse_prompt_logprobs("Bella is happy.", logprobs).unwrap_err() {
            ProviderError::InvalidResponse(message) => {
                assert!(message.starts_with("token \" happy\" has invalid surprisal"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_request_body() {
        let scorer = OpenAiCompatScorer::new("gpt2").unwrap();
        let json = serde_json::to_value(scorer.build_request("Hi there.")).unwrap();

        assert_eq!(json["model"], "gpt2");
        assert_eq!(json["prompt"], "Hi there.");
        assert_eq!(json["echo"], true);
        assert_eq!(json["logprobs"], 0);
        assert_eq!(json["max_tokens"], 1);
    }

    #[test]
    fn test_endpoint_and_settings() {
        let settings = ScorerSettings {
            base_url: Some("https://api.example.com/v1/".into()),
            model: Some("davinci-002".into()),
            api_key: Some("sk-test".into()),
            max_retries: Some(1),
            ..Default::default()
        };
        let scorer = OpenAiCompatScorer::from_settings(&settings).unwrap();

        assert_eq!(scorer.endpoint(), "https://api.example.com/v1/completions");
        assert_eq!(scorer.model(), "davinci-002");
        assert_eq!(scorer.api_key.as_deref(), Some("sk-test"));
        assert_eq!(scorer.retry.max_retries, 1);
    }

    #[test]
    fn test_empty_model_is_not_configured() {
        let settings = ScorerSettings {
            model: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(
            OpenAiCompatScorer::from_settings(&settings),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"error": {"message": "too many tokens", "code": "context_length_exceeded"}}"#;
        assert!(matches!(
            parse_error_response(400, body),
            ProviderError::ContextLengthExceeded(_)
        ));
        assert!(matches!(
            parse_error_response(502, "bad gateway"),
            ProviderError::ServerError(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_scoring_error() {
        let scorer = OpenAiCompatScorer::new("gpt2")
            .unwrap()
            .with_base_url("http://127.0.0.1:9")
            .with_retry(RetryConfig::no_retry());

        let err = scorer.score("Bella is happy.").await.unwrap_err();
        assert!(matches!(err, trimctx_foundation::Error::Scoring(_)));
    }
}
