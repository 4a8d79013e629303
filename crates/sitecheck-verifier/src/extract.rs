//! Page fetching and visible-text extraction.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::Client;
use scraper::{Html, Node};

use crate::error::VerifierError;

const MAX_REDIRECTS: usize = 5;

/// Fetches a page and reduces its HTML to normalized visible text.
///
/// The request carries a browser-like signature — many sites serve empty
/// shells or challenge pages to obviously non-browser clients.
pub struct TextExtractor {
    client: Client,
}

impl TextExtractor {
    /// Creates an extractor with the configured fetch timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`VerifierError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, VerifierError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and return the page's visible text.
    ///
    /// Returns `None` on any fetch failure — the caller's signal to mark
    /// fact checks undetermined. A successfully fetched page with no visible
    /// text returns `Some("")`, which is a different outcome: matching
    /// proceeds and reports the facts as not found.
    pub async fn extract(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url, error = %e, "page fetch failed");
                return None;
            }
        };

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            tracing::debug!(url, status = status.as_u16(), "page fetch rejected");
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(url, error = %e, "page body read failed");
                return None;
            }
        };

        let text = html_to_text(&body);
        tracing::debug!(url, chars = text.len(), "extracted page text");
        Some(text)
    }
}

/// Reduce an HTML document to its visible text.
///
/// Walks the DOM in document order collecting text nodes, skipping
/// `script`, `style`, and `noscript` subtrees, then collapses whitespace
/// runs to single spaces.
pub(crate) fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(text) => {
                raw.push_str(text);
                continue;
            }
            Node::Element(element) => {
                if matches!(element.name(), "script" | "style" | "noscript") {
                    continue;
                }
            }
            _ => {}
        }
        // Children are pushed in reverse so the stack pops them in
        // document order.
        let children: Vec<_> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }

    collapse_whitespace(&raw)
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
