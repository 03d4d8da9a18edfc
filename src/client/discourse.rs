//! `reqwest`-backed [`DiscourseClient`] implementation.
//!
//! Applies Discourse's header-based API-key authentication and retries
//! `429 Too Many Requests` with exponential backoff capped at ten minutes
//! (§5), surfacing the retry budget to callers as a single blocking call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::Page;

use super::DiscourseClient;

/// Maximum total time spent retrying 429 responses, per §5.
const MAX_BACKOFF: Duration = Duration::from_secs(10 * 60);
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

pub struct HttpDiscourseClient {
    client: Client,
    host: String,
    api_username: String,
    api_key: String,
}

impl HttpDiscourseClient {
    pub fn new(host: impl Into<String>, api_username: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::ServerError {
                path: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            host: host.into(),
            api_username: api_username.into(),
            api_key: api_key.into(),
        })
    }

    fn topic_endpoint(&self, suffix: &str) -> String {
        format!("https://{}{}", self.host, suffix)
    }

    /// Send `req` through the retry-with-backoff loop, treating any
    /// non-429 response (success or terminal failure) as final.
    async fn send_with_retry(&self, build: impl Fn() -> reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let mut backoff = INITIAL_BACKOFF;
        let mut elapsed = Duration::ZERO;

        loop {
            let response = build()
                .header("Api-Key", &self.api_key)
                .header("Api-Username", &self.api_username)
                .send()
                .await
                .map_err(Error::from)?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS || elapsed >= MAX_BACKOFF {
                return Ok(response);
            }

            tokio::time::sleep(backoff).await;
            elapsed += backoff;
            backoff = (backoff * 2).min(MAX_BACKOFF - elapsed);
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopicResponse {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    slug: String,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    raw: String,
}

#[async_trait]
impl DiscourseClient for HttpDiscourseClient {
    async fn create_topic(&self, title: &str, content: &str, category_id: u64) -> Result<Page> {
        let body = serde_json::json!({
            "title": title,
            "raw": content,
            "category": category_id,
        });

        let response = self
            .send_with_retry(|| self.client.post(self.topic_endpoint("/posts.json")).json(&body))
            .await?;

        if !response.status().is_success() {
            return Err(Error::ServerError {
                path: title.to_string(),
                message: format!("create_topic failed with status {}", response.status()),
            });
        }

        let parsed: TopicResponse = response.json().await.map_err(Error::from)?;
        Ok(Page {
            url: self.topic_endpoint(&format!("/t/{}/{}", parsed.slug, parsed.id)),
            content: content.to_string(),
        })
    }

    async fn update_topic(&self, url: &str, content: &str) -> Result<()> {
        let post_id = first_post_id(url);
        let body = serde_json::json!({ "post": { "raw": content } });

        let response = self
            .send_with_retry(|| {
                self.client
                    .put(self.topic_endpoint(&format!("/posts/{post_id}.json")))
                    .json(&body)
            })
            .await?;

        if !response.status().is_success() {
            return Err(Error::ServerError {
                path: url.to_string(),
                message: format!("update_topic failed with status {}", response.status()),
            });
        }
        Ok(())
    }

    async fn retrieve_topic(&self, url: &str) -> Result<Page> {
        let post_id = first_post_id(url);
        let response = self
            .send_with_retry(|| self.client.get(self.topic_endpoint(&format!("/posts/{post_id}.json"))))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::ServerError {
                path: url.to_string(),
                message: "topic not found".to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Error::ServerError {
                path: url.to_string(),
                message: format!("retrieve_topic failed with status {}", response.status()),
            });
        }

        let parsed: PostResponse = response.json().await.map_err(Error::from)?;
        Ok(Page {
            url: url.to_string(),
            content: parsed.raw,
        })
    }

    async fn delete_topic(&self, url: &str) -> Result<()> {
        let topic_id = first_post_id(url);
        let response = self
            .send_with_retry(|| self.client.delete(self.topic_endpoint(&format!("/t/{topic_id}.json"))))
            .await?;

        if !response.status().is_success() {
            return Err(Error::ServerError {
                path: url.to_string(),
                message: format!("delete_topic failed with status {}", response.status()),
            });
        }
        Ok(())
    }

    async fn check_topic_permissions(&self, url: &str) -> Result<bool> {
        match self.retrieve_topic(url).await {
            Ok(_) => Ok(true),
            Err(Error::ServerError { message, .. }) if message.contains("403") => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn head(&self, url: &str) -> Result<u16> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(Error::from)?;
        Ok(response.status().as_u16())
    }
}

/// Extract the trailing numeric id from a Discourse topic/post URL, e.g.
/// `https://host/t/slug/42` -> `42`.
fn first_post_id(url: &str) -> String {
    url.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_post_id_extraction() {
        assert_eq!(first_post_id("https://discourse.example.com/t/getting-started/12"), "12");
        assert_eq!(first_post_id("https://discourse.example.com/t/getting-started/12/"), "12");
    }
}
