//! AI narrative generation via the Gemini API
//!
//! Turns the period's records and summary metrics into a client-facing
//! analysis in Portuguese. Success and failure travel as a tagged result;
//! presentation decides how each is formatted.

use crate::types::{CampaignRecord, DateRange, LeadtrackError, Result, SummaryMetrics};
use serde::{Deserialize, Serialize};

/// Gemini generateContent endpoint (model baked into the path)
const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// At most this many records are inlined into the prompt
const PROMPT_SAMPLE_ROWS: usize = 10;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
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

/// Request failure, split so only transient failures are retried
enum RequestError {
    /// Network-level failure; worth one retry
    Transport(String),
    /// The API answered and said no; retrying won't help
    Api(String),
}

/// Narrative generator backed by the Gemini API
#[derive(Debug)]
pub struct InsightsService {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl InsightsService {
    /// Create a generator for the given API key.
    /// A blank key is rejected up front so the UI can prompt for one.
    pub fn new(api_key: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(LeadtrackError::Insights(
                "API key not configured; set it with `leadtrack config --api-key`".into(),
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LeadtrackError::Insights(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
        })
    }

    /// Generate a markdown narrative for the period.
    /// Transport failures are retried once; API rejections are not.
    pub fn generate(
        &self,
        records: &[CampaignRecord],
        metrics: &SummaryMetrics,
        range: &DateRange,
    ) -> Result<String> {
        let prompt = build_prompt(records, metrics, range);

        match self.request_once(&prompt) {
            Ok(text) => Ok(text),
            Err(RequestError::Api(message)) => Err(LeadtrackError::Insights(message)),
            Err(RequestError::Transport(first)) => self
                .request_once(&prompt)
                .map_err(|_| LeadtrackError::Insights(first)),
        }
    }

    fn request_once(&self, prompt: &str) -> std::result::Result<String, RequestError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(GEMINI_ENDPOINT)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| RequestError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Api(format!(
                "Gemini API returned {}",
                status
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| RequestError::Api(format!("Invalid API response: {}", e)))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(RequestError::Api("API response carried no text".into()));
        }

        Ok(text)
    }
}

/// Build the analysis prompt from the period's metrics and a record sample
pub fn build_prompt(
    records: &[CampaignRecord],
    metrics: &SummaryMetrics,
    range: &DateRange,
) -> String {
    let sample = &records[..records.len().min(PROMPT_SAMPLE_ROWS)];
    let sample_json = serde_json::to_string_pretty(sample).unwrap_or_else(|_| "[]".into());

    format!(
        "Analyze the following Meta Ads campaign performance data and provide \
         a concise, insightful summary in Portuguese for a client.\n\
         The summary should be easy to understand, avoiding technical jargon \
         where possible.\n\
         Focus on key trends, potential wins, and areas for improvement.\n\
         Structure the output in markdown.\n\
         \n\
         Period: {} to {}\n\
         \n\
         Summary Metrics:\n\
         - Total Contacts: {}\n\
         - Qualified Contacts: {}\n\
         - Disqualified Contacts: {}\n\
         - Total Cost: R$ {:.2}\n\
         - Average Cost per Lead: R$ {:.2}\n\
         - Qualification Rate: {:.1}%\n\
         \n\
         Detailed Daily Data (sample):\n\
         {}\n\
         \n\
         Please generate the analysis based on the full dataset provided.",
        range.start,
        range.end,
        metrics.total_contacts,
        metrics.total_qualified,
        metrics.total_disqualified,
        metrics.total_cost,
        metrics.avg_cpl,
        metrics.qualification_rate,
        sample_json,
    )
}
