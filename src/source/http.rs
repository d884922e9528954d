//! HTTP item source.
//!
//! Fetches `GET {base_url}/{resource}?page={p}&per_page={n}` and decodes the
//! JSON array body into [`FeedItem`]s.  The same type serves every paged
//! resource of the API (`articles`, `services`); only the resource name and
//! label differ.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{FeedItem, FetchError, ItemSource};

/// Longest server error body kept in a [`FetchError::Server`].
const MAX_ERROR_BODY: usize = 200;

/// A paged JSON collection served over HTTP.
pub struct HttpSource {
    client: reqwest::Client,
    /// API root, without trailing slash (e.g. `http://localhost:3000/api/v1`).
    base_url: String,
    /// Collection path segment (e.g. `articles`).
    resource: String,
    /// Human-readable label shown in status messages.
    label: String,
}

impl HttpSource {
    /// Create a source for `resource` under `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` — API root, trailing slashes are ignored.
    /// * `resource` — collection name appended to the root.
    /// * `label` — short name for logs and the status bar.
    /// * `timeout` — per-request timeout.
    pub fn new(
        base_url: &str,
        resource: impl Into<String>,
        label: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("clinic-feed/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            resource: resource.into(),
            label: label.into(),
        })
    }

    /// URL of one page of this collection.
    pub fn page_url(&self, page: u32, per_page: u32) -> String {
        format!(
            "{}/{}?page={page}&per_page={per_page}",
            self.base_url, self.resource
        )
    }

    /// Decode a response body into records.
    ///
    /// Pure function (no I/O) so that tests can exercise decoding without a
    /// server.  Anything other than a JSON array of objects carrying an `id`
    /// is [`FetchError::Malformed`].
    pub fn parse_items(body: &[u8]) -> Result<Vec<FeedItem>, FetchError> {
        serde_json::from_slice(body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ItemSource for HttpSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<FeedItem>, FetchError> {
        let url = self.page_url(page, per_page);
        debug!(%url, "GET page");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            warn!(%url, status = status.as_u16(), "page request rejected");
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        let items = Self::parse_items(&body)?;
        debug!(%url, count = items.len(), "page decoded");
        Ok(items)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source() -> HttpSource {
        HttpSource::new(
            "http://localhost:3000/api/v1/",
            "articles",
            "Articles",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn page_url_carries_page_and_size() {
        let src = source();
        assert_eq!(
            src.page_url(3, 10),
            "http://localhost:3000/api/v1/articles?page=3&per_page=10"
        );
    }

    #[test]
    fn parse_items_keeps_array_order() {
        let body = br#"[
            {"id": 1, "title": "First", "description": "d1"},
            {"id": 2, "title": "Second", "url": "https://example.com/2"}
        ]"#;

        let items = HttpSource::parse_items(body).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_str(), "1");
        assert_eq!(items[0].description.as_deref(), Some("d1"));
        assert_eq!(items[1].title, "Second");
        assert_eq!(items[1].url.as_deref(), Some("https://example.com/2"));
    }

    #[test]
    fn empty_array_is_an_empty_page() {
        let items = HttpSource::parse_items(b"[]").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn object_body_is_malformed() {
        let err = HttpSource::parse_items(br#"{"error": "nope"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn record_without_id_is_malformed() {
        let err = HttpSource::parse_items(br#"[{"title": "no id"}]"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn null_title_does_not_reject_the_page() {
        let body = br#"[{"id": 1, "title": "ok"}, {"id": 2, "title": null, "description": "d"}]"#;

        let items = HttpSource::parse_items(body).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "");
        assert_eq!(items[1].description.as_deref(), Some("d"));
    }

    #[test]
    fn name_returns_label() {
        assert_eq!(source().name(), "Articles");
    }

    // -- transport boundary --------------------------------------------------

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    async fn serve(template: ResponseTemplate) -> (MockServer, HttpSource) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/articles"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "10"))
            .respond_with(template)
            .mount(&server)
            .await;
        let src = HttpSource::new(
            &format!("{}/api/v1", server.uri()),
            "articles",
            "Articles",
            Duration::from_secs(5),
        )
        .unwrap();
        (server, src)
    }

    #[tokio::test]
    async fn array_body_decodes_into_items() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let (_server, src) =
            serve(ResponseTemplate::new(200).set_body_string(r#"[{"id": 11, "title": "Hi"}]"#)).await;

        let items = src.fetch_page(2, 10).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "11");
    }

    #[tokio::test]
    async fn empty_array_body_is_an_empty_page() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let (_server, src) = serve(ResponseTemplate::new(200).set_body_string("[]")).await;

        let items = src.fetch_page(2, 10).await.unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_a_server_error() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let (_server, src) =
            serve(ResponseTemplate::new(500).set_body_string("database unavailable")).await;

        let err = src.fetch_page(2, 10).await.unwrap_err();

        assert_eq!(
            err,
            FetchError::Server {
                status: 500,
                body: "database unavailable".into(),
            }
        );
    }

    #[tokio::test]
    async fn server_error_body_is_capped() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let (_server, src) = serve(ResponseTemplate::new(503).set_body_string("e".repeat(1000))).await;

        match src.fetch_page(2, 10).await.unwrap_err() {
            FetchError::Server { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body.chars().count(), MAX_ERROR_BODY);
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn object_body_from_server_is_malformed() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let (_server, src) = serve(ResponseTemplate::new(200).set_body_string("{}")).await;

        let err = src.fetch_page(2, 10).await.unwrap_err();

        assert!(matches!(err, FetchError::Malformed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_failure() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        // Grab a free port, then close it so nothing is listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let src = HttpSource::new(
            &format!("http://127.0.0.1:{port}/api/v1"),
            "articles",
            "Articles",
            Duration::from_secs(5),
        )
        .unwrap();

        let err = src.fetch_page(1, 10).await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }
}
