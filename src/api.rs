//! Gemini API interaction with fixed-count retry logic.
//!
//! This module wraps the Gemini `generateContent` REST endpoint behind a
//! small trait so the summarizer (and its tests) never talk to the network
//! directly:
//! - [`GenerateText`]: core trait for prompt-in, text-out generation
//! - [`GeminiClient`]: concrete REST client
//! - [`RetryGenerate`]: decorator adding bounded retries with linear backoff
//!
//! # Retry strategy
//!
//! - At most 3 attempts per prompt
//! - Linear backoff: `base_delay * attempt_number` between attempts
//! - An empty response body counts as a failure and is retried

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Trait for prompt-in, text-out generation.
pub trait GenerateText {
    /// Send a prompt to the model and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

impl<G: GenerateText> GenerateText for &G {
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        (**self).generate(prompt).await
    }
}

/// Gemini `generateContent` REST client.
///
/// Holds the shared HTTP client plus the fixed generation parameters
/// (model, token limit, temperature) from the run configuration.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_output_tokens: u32,
    temperature: f32,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        model: String,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            max_output_tokens,
            temperature,
        }
    }
}

impl GenerateText for GeminiClient {
    #[instrument(level = "debug", skip_all, fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let url = format!(
            "{GEMINI_API_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
                temperature: self.temperature,
            },
        };

        let t0 = Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body: GenerateResponse = response.json().await?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Gemini call completed");

        let text = body
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(text)
    }
}

/// Decorator adding bounded retries with linear backoff to any
/// [`GenerateText`] implementation.
///
/// An `Ok` result whose text is blank is treated the same as an error: the
/// call is retried and, once attempts are exhausted, reported as a failure.
pub struct RetryGenerate<G> {
    inner: G,
    max_attempts: usize,
    base_delay: Duration,
}

impl<G: GenerateText> RetryGenerate<G> {
    pub fn new(inner: G, max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_attempts,
            base_delay,
        }
    }
}

impl<G: GenerateText> GenerateText for RetryGenerate<G> {
    #[instrument(level = "debug", skip_all)]
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();

        for attempt in 1..=self.max_attempts {
            let outcome = match self.inner.generate(prompt).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text.trim().to_string()),
                Ok(_) => Err::<String, Box<dyn Error>>("empty response from model".into()),
                Err(e) => Err(e),
            };

            let e = outcome.unwrap_err();
            if attempt == self.max_attempts {
                warn!(
                    attempt,
                    max = self.max_attempts,
                    elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                    error = %e,
                    "generate() exhausted attempts"
                );
                return Err(e);
            }

            let delay = self.base_delay * attempt as u32;
            warn!(
                attempt,
                max = self.max_attempts,
                ?delay,
                error = %e,
                "generate() attempt failed; backing off"
            );
            sleep(delay).await;
        }

        Err("no generation attempts configured".into())
    }
}
