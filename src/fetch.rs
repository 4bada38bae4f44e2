//! Mention fetching against the Twitter recent-search API.
//!
//! The provider is a trait so the scanner can run against fixtures in tests.
//! Failures (rate limit included) surface as `Err`; the scanner decides what
//! a failed fetch means for the overall scan.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use metrics::counter;
use serde::Deserialize;
use std::time::Duration;

const SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";

/// Free-tier ceilings: combine at most two terms per query and cap results.
const MAX_QUERY_TERMS: usize = 2;
const MAX_RESULTS: u32 = 10;

/// Pause after every request to respect the rate limit.
const REQUEST_DELAY: Duration = Duration::from_secs(2);

/// Counts matching items for a set of search terms over a lookback window.
#[async_trait]
pub trait MentionProvider: Send + Sync {
    async fn count_mentions(&self, keywords: &[String], hours_ago: u64) -> Result<u64>;
    fn name(&self) -> &'static str;
}

/// Combine terms into one OR query, excluding reposts, English only.
/// Only the first `MAX_QUERY_TERMS` terms are used to stay within free-tier
/// query-length limits.
pub fn build_query(keywords: &[String]) -> String {
    let parts: Vec<String> = keywords
        .iter()
        .take(MAX_QUERY_TERMS)
        .map(|kw| format!("\"{kw}\""))
        .collect();
    format!("({}) -is:retweet lang:en", parts.join(" OR "))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    meta: Option<SearchMeta>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    #[allow(dead_code)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct SearchMeta {
    result_count: Option<u64>,
}

pub struct TwitterMentionProvider {
    client: reqwest::Client,
    bearer_token: String,
    delay: Duration,
}

impl TwitterMentionProvider {
    pub fn new(bearer_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            bearer_token,
            delay: REQUEST_DELAY,
        }
    }

    /// Test hook: skip the inter-request pause.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl MentionProvider for TwitterMentionProvider {
    async fn count_mentions(&self, keywords: &[String], hours_ago: u64) -> Result<u64> {
        let start_time = (Utc::now() - ChronoDuration::hours(hours_ago as i64))
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let query = build_query(keywords);
        let max_results = MAX_RESULTS.to_string();

        let resp = self
            .client
            .get(SEARCH_URL)
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", query.as_str()),
                ("start_time", start_time.as_str()),
                ("max_results", max_results.as_str()),
                ("tweet.fields", "created_at"),
            ])
            .send()
            .await;

        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = ?e, provider = self.name(), "search http error");
                counter!("fetch_errors_total").increment(1);
                return Err(e).context("twitter search get()");
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(provider = self.name(), "rate limit hit");
            counter!("fetch_errors_total").increment(1);
            return Err(anyhow!("twitter search rate limited"));
        }
        if !resp.status().is_success() {
            counter!("fetch_errors_total").increment(1);
            return Err(anyhow!("twitter search returned {}", resp.status()));
        }

        let body: SearchResponse = resp.json().await.context("parsing search response")?;
        let count = body
            .meta
            .and_then(|m| m.result_count)
            .unwrap_or(body.data.len() as u64);

        // Small delay to respect rate limits before the next window's query.
        tokio::time::sleep(self.delay).await;

        Ok(count)
    }

    fn name(&self) -> &'static str {
        "Twitter"
    }
}
