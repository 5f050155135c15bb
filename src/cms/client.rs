//! HTTP client for the content service
//!
//! Built explicitly from an [`ApiConfig`] and handed to whoever needs it;
//! there is no process-wide client.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::{CmsError, CmsResult};
use super::predicate::{build_query, Predicate};
use super::types::{ApiInfo, SearchResponse};
use super::PageSource;
use crate::config::ApiConfig;

/// Longest error body kept in [`CmsError::HttpStatus`]
const MAX_ERROR_BODY: usize = 512;

/// Options of a search query
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub page_size: Option<u32>,
    pub orderings: Option<String>,
}

impl QueryOptions {
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn orderings(mut self, orderings: impl Into<String>) -> Self {
        self.orderings = Some(orderings.into());
        self
    }
}

/// Content service client
#[derive(Debug, Clone)]
pub struct ContentClient {
    endpoint: Url,
    access_token: Option<String>,
    http: Client,
}

impl ContentClient {
    /// Create a client for the configured repository endpoint
    pub fn new(config: &ApiConfig) -> CmsResult<Self> {
        let endpoint = config.endpoint.trim();
        if endpoint.is_empty() {
            return Err(CmsError::config(
                "api.endpoint is not set (or PRISMIC_API_ENDPOINT)",
            ));
        }
        let endpoint = Url::parse(endpoint)?;
        if endpoint.cannot_be_a_base() {
            return Err(CmsError::config(format!(
                "api.endpoint is not a base URL: {}",
                endpoint
            )));
        }

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(format!("spacetraveling/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint,
            access_token: config.access_token.clone(),
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Look up the master ref of the repository
    pub async fn master_ref(&self) -> CmsResult<String> {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }

        let info: ApiInfo = self.get_json(url).await?;
        info.master_ref()
            .map(str::to_string)
            .ok_or_else(|| CmsError::MissingMasterRef {
                endpoint: self.endpoint.to_string(),
            })
    }

    /// Run a search against the master ref
    pub async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> CmsResult<SearchResponse> {
        let master_ref = self.master_ref().await?;
        let url = self.search_url(&master_ref, predicates, options);
        self.get_json(url).await
    }

    /// Follow a pagination cursor
    ///
    /// Absolute cursors are fetched as-is. A cursor starting with `/` is
    /// taken from the host root; any other relative cursor resolves under
    /// the endpoint, so `documents/search?page=2` on `.../api/v2` becomes
    /// `.../api/v2/documents/search?page=2`.
    pub async fn get_page(&self, cursor: &str) -> CmsResult<SearchResponse> {
        let url = self.page_url(cursor)?;
        self.get_json(url).await
    }

    fn page_url(&self, cursor: &str) -> CmsResult<Url> {
        let mut base = self.endpoint.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(cursor.trim())?)
    }

    fn search_url(&self, master_ref: &str, predicates: &[Predicate], options: &QueryOptions) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("documents").push("search");
        }

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", master_ref);
            if !predicates.is_empty() {
                query.append_pair("q", &build_query(predicates));
            }
            if let Some(page_size) = options.page_size {
                query.append_pair("pageSize", &page_size.to_string());
            }
            if let Some(orderings) = &options.orderings {
                query.append_pair("orderings", orderings);
            }
            if let Some(token) = &self.access_token {
                query.append_pair("access_token", token);
            }
        }

        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> CmsResult<T> {
        debug!(url = %redact(&url), "GET");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(CmsError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(CmsError::decode)
    }
}

#[async_trait]
impl PageSource for ContentClient {
    async fn fetch_page(&self, cursor: &str) -> CmsResult<SearchResponse> {
        self.get_page(cursor).await
    }
}

/// URL with the access token hidden, for logs
fn redact(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "access_token") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_token" {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> ApiConfig {
        ApiConfig {
            endpoint: endpoint.to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_requires_endpoint() {
        let err = ContentClient::new(&config("  ")).unwrap_err();
        assert!(matches!(err, CmsError::Config { .. }));

        let err = ContentClient::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, CmsError::InvalidUrl(_)));
    }

    #[test]
    fn test_search_url() {
        let mut api = config("https://repo.cdn.prismic.io/api/v2");
        api.access_token = Some("tok".to_string());
        let client = ContentClient::new(&api).unwrap();

        let url = client.search_url(
            "MASTER",
            &[Predicate::document_type("posts")],
            &QueryOptions::default().page_size(1),
        );

        assert_eq!(url.path(), "/api/v2/documents/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("ref".to_string(), "MASTER".to_string()),
                ("q".to_string(), r#"[[at(document.type, "posts")]]"#.to_string()),
                ("pageSize".to_string(), "1".to_string()),
                ("access_token".to_string(), "tok".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_with_trailing_slash() {
        let client = ContentClient::new(&config("https://repo.cdn.prismic.io/api/v2/")).unwrap();
        let url = client.search_url("R", &[], &QueryOptions::default());
        assert_eq!(url.path(), "/api/v2/documents/search");
    }

    #[test]
    fn test_page_url_resolution() {
        let client = ContentClient::new(&config("https://repo.cdn.prismic.io/api/v2")).unwrap();

        let url = client.page_url("documents/search?ref=R&page=2").unwrap();
        assert_eq!(
            url.as_str(),
            "https://repo.cdn.prismic.io/api/v2/documents/search?ref=R&page=2"
        );

        let url = client.page_url("/other/search?page=3").unwrap();
        assert_eq!(url.as_str(), "https://repo.cdn.prismic.io/other/search?page=3");

        let url = client.page_url("https://cdn.example.io/search?page=4").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.io/search?page=4");
    }

    #[test]
    fn test_redact_hides_token() {
        let url = Url::parse("https://x.io/api?ref=a&access_token=secret").unwrap();
        let shown = redact(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("ref=a"));
    }
}
