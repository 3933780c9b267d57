//! Batch summarization of foreign-language items through Gemini.
//!
//! Items are processed strictly one at a time, with a fixed delay between
//! calls to stay inside the API's rate limits. A failed item degrades to
//! "no synopsis" rather than failing the batch.

use crate::api::{GeminiClient, GenerateText, RetryGenerate};
use crate::config::Config;
use crate::models::SummaryTask;
use crate::utils::truncate_for_log;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

const MAX_ATTEMPTS: usize = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);
const INTER_ITEM_DELAY: Duration = Duration::from_millis(500);

/// Summarizes English text into three lines of professional-register
/// Japanese via a [`GenerateText`] backend.
pub struct Summarizer<G> {
    generator: G,
    max_attempts: usize,
    retry_base_delay: Duration,
    inter_item_delay: Duration,
}

impl Summarizer<GeminiClient> {
    /// Build a Gemini-backed summarizer from the run configuration.
    ///
    /// Returns `None` when no API key is configured; the caller is expected
    /// to skip the summarization stage in that case.
    pub fn from_config(config: &Config, client: reqwest::Client) -> Option<Self> {
        let api_key = config.gemini_api_key.clone()?;
        let generator = GeminiClient::new(
            client,
            api_key,
            config.gemini_model.clone(),
            config.gemini_max_tokens,
            config.gemini_temperature,
        );
        Some(Self {
            generator,
            max_attempts: MAX_ATTEMPTS,
            retry_base_delay: RETRY_BASE_DELAY,
            inter_item_delay: INTER_ITEM_DELAY,
        })
    }
}

impl<G: GenerateText> Summarizer<G> {
    /// Construct with an explicit backend and timing parameters.
    pub fn with_generator(
        generator: G,
        max_attempts: usize,
        retry_base_delay: Duration,
        inter_item_delay: Duration,
    ) -> Self {
        Self {
            generator,
            max_attempts,
            retry_base_delay,
            inter_item_delay,
        }
    }

    /// Summarize one text, with the item title as optional context.
    ///
    /// Returns `None` for blank input (without calling the API) and after
    /// retries are exhausted.
    #[instrument(level = "debug", skip_all)]
    pub async fn summarize(&self, text: &str, title: &str) -> Option<String> {
        if text.trim().is_empty() {
            warn!("Nothing to summarize; input text is empty");
            return None;
        }

        let prompt = build_prompt(text, title);
        let retrying = RetryGenerate::new(&self.generator, self.max_attempts, self.retry_base_delay);

        match retrying.generate(&prompt).await {
            Ok(summary) => {
                debug!("Summary generated");
                Some(summary)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    text_preview = %truncate_for_log(text, 100),
                    "Summarization failed; item keeps no synopsis"
                );
                None
            }
        }
    }

    /// Summarize a batch of tasks sequentially.
    ///
    /// Every task is returned, in order, whether or not a synopsis could be
    /// generated.
    #[instrument(level = "info", skip_all, fields(count = tasks.len()))]
    pub async fn summarize_batch(&self, tasks: Vec<SummaryTask>) -> Vec<SummaryTask> {
        let total = tasks.len();
        let mut results = Vec::with_capacity(total);

        for (i, mut task) in tasks.into_iter().enumerate() {
            if task.text.trim().is_empty() {
                warn!(index = i, source = %task.key.source, "Skipping task with empty text");
                task.summary_jp = None;
                results.push(task);
                continue;
            }

            debug!(index = i, total, source = %task.key.source, "Summarizing item");
            task.summary_jp = self.summarize(&task.text, &task.title).await;
            results.push(task);

            sleep(self.inter_item_delay).await;
        }

        let succeeded = results.iter().filter(|t| t.summary_jp.is_some()).count();
        info!(total, succeeded, "Batch summarization finished");
        results
    }
}

/// Prompt asking for a 3-line professional-engineer-register Japanese
/// summary, optionally prefixed with the item's title as context.
fn build_prompt(text: &str, title: &str) -> String {
    let context = if title.is_empty() {
        String::new()
    } else {
        format!("タイトル: {title}\n\n")
    };

    format!(
        "以下の英語のテキストを、3行のプロエンジニア風日本語で要約してください。\n\
         技術的な内容を正確に伝えつつ、簡潔で読みやすい形式にしてください。\n\n\
         {context}テキスト:\n{text}\n\n要約（3行のプロエンジニア風日本語）:"
    )
}
