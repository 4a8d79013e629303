//! AI-delegated fact matcher.
//!
//! Sends the location's canonical facts plus the extracted page text to an
//! OpenAI-compatible chat-completions endpoint and parses the structured
//! verdict it returns. The matcher never trusts the responder blindly: the
//! match-implies-found invariant is re-imposed on the parsed verdict, and a
//! digit-pattern fallback re-validates phone "no match" verdicts against
//! the raw page text.

use std::time::Duration;

use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use sitecheck_core::{FactCheck, FactStatus, Location};

use super::FactReport;
use crate::error::VerifierError;
use crate::normalize::{full_address, normalize_phone};
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Low temperature: the task is classification, not generation.
const MATCHER_TEMPERATURE: f32 = 0.2;

/// External semantic matcher speaking the chat-completions wire format.
pub struct AiMatcher {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl AiMatcher {
    /// Creates a matcher client with configured timeout and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for transient errors (429, network errors). Set to `0` to
    /// disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`VerifierError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, VerifierError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.to_string(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Point the matcher at a different endpoint (test doubles, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Check all three facts against the page text.
    ///
    /// Request failures and unparseable responses degrade to undetermined
    /// facts with a descriptive error — recoverable conditions, never fatal
    /// to the batch.
    pub async fn check(&self, location: &Location, page_text: &str) -> FactReport {
        let verdict = match self.request_verdict(location, page_text).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(
                    business = %location.business_name,
                    error = %e,
                    "matcher request failed"
                );
                return FactReport::undetermined(&format!("matcher request failed: {e}"));
            }
        };

        let error = verdict.error;
        let mut report = FactReport {
            address: FactCheck::from_flags(
                verdict.address.is_found,
                verdict.address.is_match,
                error.clone(),
            ),
            hours: FactCheck::from_flags(
                verdict.hours.is_found,
                verdict.hours.is_match,
                error.clone(),
            ),
            phone: FactCheck::from_flags(verdict.phone.is_found, verdict.phone.is_match, error),
        };

        // The responder tends to under-match phone numbers whose punctuation
        // differs from the listing. If the target digits appear anywhere in
        // the page text, that overrides a non-match verdict.
        if report.phone.status != FactStatus::Matched {
            let digits = location
                .primary_phone
                .as_deref()
                .map(normalize_phone)
                .unwrap_or_default();
            if phone_digits_in_text(&digits, page_text) {
                tracing::debug!(
                    business = %location.business_name,
                    "target phone digits present in page text — overriding matcher verdict"
                );
                report.phone = FactCheck::matched();
            }
        }

        report
    }

    /// One matcher round-trip, with backoff retries on transient failures.
    async fn request_verdict(
        &self,
        location: &Location,
        page_text: &str,
    ) -> Result<MatcherVerdict, VerifierError> {
        let prompt = build_prompt(location, page_text);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: MATCHER_TEMPERATURE,
        };
        let url = format!("{}/chat/completions", self.base_url);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let request = &request;
            let url = url.clone();
            async move {
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(request)
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(30);
                    return Err(VerifierError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(VerifierError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                let completion =
                    serde_json::from_str::<ChatResponse>(&body).map_err(|e| {
                        VerifierError::Deserialize {
                            context: "chat completion envelope".to_string(),
                            source: e,
                        }
                    })?;

                let content = completion
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or(VerifierError::EmptyResponse)?;

                Ok(parse_verdict(&content))
            }
        })
        .await
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// The verdict schema the responder is required to produce.
#[derive(Debug, Default, Deserialize)]
struct MatcherVerdict {
    #[serde(default)]
    address: FactFlags,
    #[serde(default)]
    hours: FactFlags,
    #[serde(default)]
    phone: FactFlags,
    #[serde(default)]
    error: Option<String>,
}

/// Nullable found/match flag pair for one fact.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FactFlags {
    #[serde(default)]
    is_found: Option<bool>,
    #[serde(default)]
    is_match: Option<bool>,
}

// ---------------------------------------------------------------------------
// Prompt and verdict parsing
// ---------------------------------------------------------------------------

fn build_prompt(location: &Location, page_text: &str) -> String {
    let target_address = full_address(location);
    let target_hours =
        serde_json::to_string(&location.regular_hours).unwrap_or_else(|_| "[]".to_string());
    let target_phone = location
        .primary_phone
        .as_deref()
        .map(normalize_phone)
        .unwrap_or_default();

    format!(
        r#"Analyze this website text to find address, business hours, and phone information.

TARGET ADDRESS: "{target_address}"
TARGET HOURS: {target_hours}
TARGET PHONE: "{target_phone}"

TASK: Compare website content with target data and respond with exact JSON format.

ADDRESS ANALYSIS:
- isFound: true if ANY address appears on website, false if NO address found
- isMatch: true if found address matches target address (same street, city, ZIP), false if different

HOURS ANALYSIS:
- isFound: true if ANY business hours appear on website, false if NO hours found
- isMatch: true if found hours match target hours (same days/times), false if different
- Note: an empty open/close time object means midnight; "hours": 24 means end-of-day

PHONE ANALYSIS:
- isFound: true if ANY phone number appears on website, false if NO phone found
- isMatch: true if a found phone has the same digits as the target, ignoring formatting

MATCHING RULES:
- Address: Consider variations like "St/Street", "Ave/Avenue", partial matches OK if core address same
- Hours: Allow format differences (9 AM = 09:00 = 9:00), common variations OK
- Be flexible with minor formatting differences but strict on actual values

REQUIRED JSON RESPONSE:
{{"address": {{"isFound": boolean, "isMatch": boolean}}, "hours": {{"isFound": boolean, "isMatch": boolean}}, "phone": {{"isFound": boolean, "isMatch": boolean}}, "error": null}}

If any errors occur, set "error" to brief description.

WEBSITE TEXT:
{page_text}"#
    )
}

/// Parse the responder's content into a verdict.
///
/// The content may arrive wrapped in a fenced code block; fences are
/// stripped first. Content that still does not parse as the required schema
/// yields an all-null verdict with a descriptive error — a recoverable
/// condition for the caller.
fn parse_verdict(content: &str) -> MatcherVerdict {
    let stripped = strip_code_fences(content);
    match serde_json::from_str::<MatcherVerdict>(stripped) {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::warn!(error = %e, "matcher response did not parse as verdict schema");
            MatcherVerdict {
                error: Some("failed to parse matcher response".to_string()),
                ..MatcherVerdict::default()
            }
        }
    }
}

/// Strip a markdown code fence from a response.
fn strip_code_fences(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Whether the target phone's digits appear in the text, allowing arbitrary
/// non-digit separators between each digit.
fn phone_digits_in_text(digits: &str, page_text: &str) -> bool {
    if digits.is_empty() {
        return false;
    }
    let pattern = digits
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(r"\D*");
    Regex::new(&pattern)
        .map(|re| re.is_match(page_text))
        .unwrap_or(false)
}
