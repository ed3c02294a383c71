//! HTTP adapter for a JSON "posts" collection endpoint.
//!
//! Each post's `title` becomes quote text; every candidate gets the configured
//! server category.

use crate::logging::sanitize_message;
use crate::model::quote::Quote;
use crate::sync::remote::{RemoteSource, SyncSettings, TransportError};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Wire shape of one remote post.
#[derive(Debug, Clone, Deserialize)]
pub struct RemotePost {
    pub id: u64,
    #[serde(default)]
    pub title: String,
}

pub struct HttpRemoteSource {
    endpoint: String,
    server_category: String,
    client: Client,
}

impl HttpRemoteSource {
    pub fn new(settings: &SyncSettings) -> Result<Self, TransportError> {
        let endpoint = settings.endpoint.trim();
        if endpoint.is_empty() {
            return Err(TransportError::Request(
                "sync endpoint must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::Request(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            server_category: settings.server_category.clone(),
            client,
        })
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    fn source_id(&self) -> &str {
        "http"
    }

    async fn fetch_candidates(&self, limit: usize) -> Result<Vec<Quote>, TransportError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        let posts: Vec<RemotePost> =
            serde_json::from_str(&body).map_err(|err| TransportError::Decode(err.to_string()))?;
        let candidates = posts_to_candidates(&posts, limit, &self.server_category);
        debug!(
            "event=remote_fetch module=sync status=ok source={} posts={} candidates={}",
            self.source_id(),
            posts.len(),
            candidates.len()
        );
        Ok(candidates)
    }

    async fn post_quote(&self, quote: &Quote) -> Result<String, TransportError> {
        // `json` sets the `Content-Type: application/json` header.
        let response = self
            .client
            .post(&self.endpoint)
            .json(quote)
            .send()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        info!(
            "event=remote_post module=sync status=ok source={} http_status={} bytes={}",
            self.source_id(),
            status.as_u16(),
            body.len()
        );
        Ok(body)
    }
}

/// Non-success response with the body flattened and capped for logs and notices.
fn status_error(status: u16, body: &str) -> TransportError {
    TransportError::Status {
        status,
        body: sanitize_message(body, MAX_ERROR_BODY_CHARS),
    }
}

/// Maps the first `limit` posts to server-origin quotes.
///
/// Posts with a blank title are dropped after the limit is applied, so a
/// batch may hold fewer than `limit` candidates.
pub fn posts_to_candidates(posts: &[RemotePost], limit: usize, category: &str) -> Vec<Quote> {
    posts
        .iter()
        .take(limit)
        .filter_map(|post| Quote::from_remote(post.id, &post.title, category).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{posts_to_candidates, status_error, HttpRemoteSource, RemotePost};
    use crate::sync::remote::{SyncSettings, TransportError};

    fn post(id: u64, title: &str) -> RemotePost {
        RemotePost {
            id,
            title: title.to_string(),
        }
    }

    #[test]
    fn takes_first_batch_and_assigns_server_category() {
        let posts: Vec<RemotePost> = (1..=8).map(|id| post(id, &format!("title {id}"))).collect();
        let candidates = posts_to_candidates(&posts, 5, "Server");

        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[0].text, "title 1");
        assert_eq!(candidates[0].category, "Server");
        assert_eq!(candidates[4].id, Some(5));
    }

    #[test]
    fn blank_titles_are_dropped() {
        let posts = vec![post(1, "  "), post(2, "kept")];
        let candidates = posts_to_candidates(&posts, 5, "Server");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "kept");
    }

    #[test]
    fn posts_decode_from_placeholder_shape() {
        let body = r#"[{"userId":1,"id":1,"title":"sunt aut","body":"quia"}]"#;
        let posts: Vec<RemotePost> = serde_json::from_str(body).unwrap();
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[0].title, "sunt aut");
    }

    #[test]
    fn status_error_body_is_flattened_and_capped() {
        let body = format!("<html>\n{}</html>", "x".repeat(5_000));
        let err = status_error(503, &body);

        let TransportError::Status { status, body } = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(*status, 503);
        assert!(!body.contains('\n'));
        assert_eq!(body.chars().count(), 203);
        assert!(body.ends_with("..."));
        assert!(err.to_string().len() < 260);
    }

    #[test]
    fn short_status_body_is_kept() {
        let err = status_error(404, "not found");
        assert_eq!(err.to_string(), "endpoint returned 404: not found");
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let settings = SyncSettings {
            endpoint: "  ".to_string(),
            ..SyncSettings::default()
        };
        let err = HttpRemoteSource::new(&settings).err().unwrap();
        assert!(matches!(err, TransportError::Request(_)));
    }
}
