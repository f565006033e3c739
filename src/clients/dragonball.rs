//! Client for the Dragon Ball REST API.
//!
//! The client is an explicit value built once from [`ApiConfig`] and handed to
//! whoever issues fetches. It never retries; callers decide what a failure
//! means for them.

use crate::config::ApiConfig;
use crate::models::{Character, Page, Planet};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Build(reqwest::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dragon Ball API error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i32 },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    fn or_not_found(self, resource: &'static str, id: i32) -> Self {
        match self {
            Self::Status { status, .. } if status == StatusCode::NOT_FOUND => {
                Self::NotFound { resource, id }
            }
            other => other,
        }
    }
}

/// The fetch operations the roster loader depends on.
#[async_trait::async_trait]
pub trait DragonBallApi: Send + Sync {
    async fn fetch_characters(&self) -> Result<Vec<Character>, ClientError>;

    async fn fetch_planets(&self) -> Result<Vec<Planet>, ClientError>;

    async fn fetch_character(&self, id: i32) -> Result<Character, ClientError>;
}

#[derive(Clone)]
pub struct DragonBallClient {
    client: Client,
    base_url: Url,
    page_size: u32,
    max_pages: u32,
}

impl DragonBallClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
            page_size: config.page_size.max(1),
            max_pages: config.max_pages.max(1),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// First page of `characters`.
    pub async fn fetch_characters(&self) -> Result<Vec<Character>, ClientError> {
        let page: Page<Character> = self.get_json(self.endpoint("characters")?).await?;
        Ok(page.items)
    }

    /// First page of `planets`.
    pub async fn fetch_planets(&self) -> Result<Vec<Planet>, ClientError> {
        let page: Page<Planet> = self.get_json(self.endpoint("planets")?).await?;
        Ok(page.items)
    }

    pub async fn fetch_character(&self, id: i32) -> Result<Character, ClientError> {
        self.get_json(self.endpoint(&format!("characters/{id}"))?)
            .await
            .map_err(|e| e.or_not_found("Character", id))
    }

    pub async fn fetch_planet(&self, id: i32) -> Result<Planet, ClientError> {
        self.get_json(self.endpoint(&format!("planets/{id}"))?)
            .await
            .map_err(|e| e.or_not_found("Planet", id))
    }

    pub async fn fetch_characters_page(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Page<Character>, ClientError> {
        self.get_json(self.paged_endpoint("characters", page, limit)?)
            .await
    }

    pub async fn fetch_planets_page(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Page<Planet>, ClientError> {
        self.get_json(self.paged_endpoint("planets", page, limit)?)
            .await
    }

    pub async fn fetch_all_characters(&self) -> Result<Vec<Character>, ClientError> {
        self.fetch_all("characters").await
    }

    pub async fn fetch_all_planets(&self) -> Result<Vec<Planet>, ClientError> {
        self.fetch_all("planets").await
    }

    async fn fetch_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let response: Page<T> = self
                .get_json(self.paged_endpoint(path, page, self.page_size)?)
                .await?;

            if response.items.is_empty() {
                break;
            }

            all_items.extend(response.items);

            if !response.meta.has_next() || page >= self.max_pages {
                break;
            }

            page += 1;
        }

        debug!("Fetched {} {} across {} page(s)", all_items.len(), path, page);
        Ok(all_items)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    fn paged_endpoint(&self, path: &str, page: u32, limit: u32) -> Result<Url, ClientError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait::async_trait]
impl DragonBallApi for DragonBallClient {
    async fn fetch_characters(&self) -> Result<Vec<Character>, ClientError> {
        Self::fetch_characters(self).await
    }

    async fn fetch_planets(&self) -> Result<Vec<Planet>, ClientError> {
        Self::fetch_planets(self).await
    }

    async fn fetch_character(&self, id: i32) -> Result<Character, ClientError> {
        Self::fetch_character(self, id).await
    }
}

/// Adapter that serves every page of the list endpoints instead of the first.
#[derive(Clone)]
pub struct Paginated(pub DragonBallClient);

#[async_trait::async_trait]
impl DragonBallApi for Paginated {
    async fn fetch_characters(&self) -> Result<Vec<Character>, ClientError> {
        self.0.fetch_all_characters().await
    }

    async fn fetch_planets(&self) -> Result<Vec<Planet>, ClientError> {
        self.0.fetch_all_planets().await
    }

    async fn fetch_character(&self, id: i32) -> Result<Character, ClientError> {
        self.0.fetch_character(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> DragonBallClient {
        DragonBallClient::new(&ApiConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = client_for("https://dragonball-api.com/api");
        assert_eq!(client.base_url().as_str(), "https://dragonball-api.com/api/");
        assert_eq!(
            client.endpoint("characters/1").unwrap().as_str(),
            "https://dragonball-api.com/api/characters/1"
        );
    }

    #[test]
    fn paged_endpoint_carries_query() {
        let client = client_for("https://dragonball-api.com/api/");
        let url = client.paged_endpoint("planets", 2, 10).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dragonball-api.com/api/planets?page=2&limit=10"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = DragonBallClient::new(&ApiConfig::default().with_base_url("::nope"));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn unusable_user_agent_fails_to_build() {
        let mut config = ApiConfig::default();
        config.user_agent = "dbroster\n0.1".to_string();
        let result = DragonBallClient::new(&config);
        assert!(matches!(result, Err(ClientError::Build(_))));
    }

    #[test]
    fn not_found_mapping_only_touches_404() {
        let err = ClientError::Status {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        }
        .or_not_found("Character", 7);
        assert_eq!(err.to_string(), "Character 7 not found");

        let err = ClientError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream".to_string(),
        }
        .or_not_found("Character", 7);
        assert!(matches!(err, ClientError::Status { .. }));
    }
}
