//! HTTP client for a subreddit's public `new.json` listing.
//!
//! No OAuth: the public listing endpoint only requires a descriptive
//! User-Agent. Non-2xx statuses raise immediately; retrying is the caller's
//! decision, not this layer's.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::RedditError;

const DEFAULT_BASE_URL: &str = "https://www.reddit.com/";

/// Listing envelope: `{ "data": { "children": [...], "after": ... } }`.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RedditPost,
}

/// One post from a subreddit listing. Ephemeral; exists only during one
/// fetch cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditPost {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
}

/// Client for the public subreddit listing endpoint.
pub struct RedditClient {
    client: Client,
    base_url: Url,
}

impl RedditClient {
    /// Creates a client pointed at reddit.com.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, RedditError> {
        Self::with_base_url(user_agent, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] if the client cannot be constructed or
    /// [`RedditError::UnexpectedStatus`] if `base_url` does not parse.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, RedditError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| RedditError::UnexpectedStatus {
            status: 0,
            url: format!("invalid base URL: {e}"),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches one page of a subreddit's newest posts, optionally resuming
    /// from an `after` cursor. Returns the posts plus the next cursor.
    ///
    /// # Errors
    ///
    /// - [`RedditError::UnexpectedStatus`] on any non-2xx response.
    /// - [`RedditError::Http`] on network failure.
    /// - [`RedditError::Deserialize`] if the listing body does not parse.
    pub async fn fetch_new_posts(
        &self,
        subreddit: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<(Vec<RedditPost>, Option<String>), RedditError> {
        let mut url = self
            .base_url
            .join(&format!("r/{subreddit}/new.json"))
            .map_err(|e| RedditError::UnexpectedStatus {
                status: 0,
                url: format!("invalid subreddit path: {e}"),
            })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &limit.to_string());
            pairs.append_pair("raw_json", "1");
            if let Some(cursor) = after {
                pairs.append_pair("after", cursor);
            }
        }

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RedditError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let listing: Listing =
            serde_json::from_str(&body).map_err(|e| RedditError::Deserialize {
                context: format!("r/{subreddit}/new.json"),
                source: e,
            })?;

        let posts = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .collect();

        Ok((posts, listing.data.after))
    }
}
