//! Generative Language API client
//!
//! Submits the selected media as an inline base64 part together with a
//! transcription prompt and parses the structured JSON transcript the
//! model returns.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde_json::json;

use crate::session::TranscriptSource;
use crate::transcript::LyricLine;

static BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Transcribing a whole music video is slow; allow several minutes
const TIMEOUT: u64 = 300;

const PROMPT: &str = "Transcribe this music video. Return a JSON object with a \
\"subtitles\" array; each entry has \"id\" (string, unique), \"startTime\" and \
\"endTime\" (seconds, numbers), \"originalWords\" (array of {\"text\", \
\"startTime\", \"endTime\"} covering every sung word), \"translation\" \
(Vietnamese translation of the line) and \"phonetic\" (Vietnamese phonetic \
rendering). Lines must be ordered by startTime.";

/// Transcript-generation client backed by the Generative Language API
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    /// Create a client for the default model
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create a client for a specific model
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Submit one media payload and parse the returned transcript
    async fn process_media(&self, payload: &str, mime_type: &str) -> Result<Vec<LyricLine>> {
        let url = format!("{}/{}:generateContent", BASE_URL, self.model);
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": mime_type, "data": payload } },
                    { "text": PROMPT },
                ]
            }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        tracing::debug!(model = %self.model, mime_type, "submitting transcription request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("transcription request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("transcription service returned {status}");
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .context("malformed transcription response")?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| anyhow!("empty transcription response"))?;

        let payload: TranscriptPayload =
            serde_json::from_str(&text).context("malformed transcript JSON")?;

        tracing::debug!(lines = payload.subtitles.len(), "transcription response parsed");
        Ok(payload.subtitles)
    }
}

impl TranscriptSource for GeminiClient {
    fn transcribe(
        &self,
        payload: String,
        mime_type: String,
    ) -> BoxFuture<'_, Result<Vec<LyricLine>>> {
        Box::pin(async move { self.process_media(&payload, &mime_type).await })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// The structured document the model is instructed to produce
#[derive(Debug, Deserialize)]
struct TranscriptPayload {
    subtitles: Vec<LyricLine>,
}
