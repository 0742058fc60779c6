// Adapter for an external scoring service exposing a Gradio-style predict
// endpoint. Requests are sent one at a time with a fixed inter-request
// delay; every failure is recoverable and the batch loop falls back to the
// local classifier for that item.
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use thiserror::Error;

use super::classifier::{Classification, Sentiment};
use super::lexicon::DEFAULT_THEME;

const PREDICT_PATH: &str = "/run/predict";
const DEFAULT_INTER_REQUEST_DELAY: Duration = Duration::from_millis(500);

// The service grades each verbatim on a three-level satisfaction scale.
const SENTIMENT_LABELS: [(&str, Sentiment); 3] = [
    ("insatisfait", Sentiment::Negative),
    ("mitigé", Sentiment::Neutral),
    ("satisfait", Sentiment::Positive),
];

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unknown sentiment label {0:?}")]
    UnknownLabel(String),
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    data: (&'a str, &'a str),
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    data: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    sentiment: String,
    theme: Option<String>,
}

pub struct RemoteClassifier {
    client: Client,
    base_url: String,
    delay: Duration,
}

impl RemoteClassifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            delay: DEFAULT_INTER_REQUEST_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Classify one text remotely. The theme hint is the comma-separated
    /// list of theme codes the service may answer with.
    pub fn classify(&self, text: &str, theme_hint: &str) -> Result<Classification, RemoteError> {
        let url = format!("{}{}", self.base_url, PREDICT_PATH);
        let outcome = self
            .client
            .post(&url)
            .json(&PredictRequest {
                data: (text, theme_hint),
            })
            .send();

        // Fixed pacing between requests, applied whether or not the call
        // succeeded: the service rate limit does not care about our errors.
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let response = outcome?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let payload: PredictResponse = response
            .json()
            .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;
        let prediction = payload
            .data
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::MalformedResponse("empty data array".to_string()))?;

        let sentiment = map_sentiment(&prediction.sentiment)?;
        let theme = prediction
            .theme
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_THEME.to_string());

        Ok(Classification { sentiment, theme })
    }
}

fn map_sentiment(label: &str) -> Result<Sentiment, RemoteError> {
    let needle = label.trim().to_lowercase();
    SENTIMENT_LABELS
        .iter()
        .find(|(known, _)| *known == needle)
        .map(|(_, sentiment)| *sentiment)
        .ok_or_else(|| RemoteError::UnknownLabel(label.to_string()))
}
