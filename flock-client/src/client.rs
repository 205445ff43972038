//! Typed client for the social-graph API.
//!
//! Three endpoint families are consumed: the two cursored identifier
//! listings (`friends/ids`, `followers/ids`) and the batch profile lookup
//! (`users/lookup`). The client maps response statuses onto [`ApiError`]
//! variants and leaves all retry behavior to the executor.

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, Result};

/// Where and how to reach the API. The bearer token is always supplied by
/// the caller (flag or environment), never embedded here.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub bearer_token: String,
    /// Identifiers requested per listing page. The server caps this at 5000.
    pub page_size: usize,
}

impl ClientConfig {
    pub fn new(base_url: Url, bearer_token: impl Into<String>) -> Self {
        Self {
            base_url,
            bearer_token: bearer_token.into(),
            page_size: 5000,
        }
    }
}

/// A reference to one user, by screen name or by numeric id.
///
/// Public entry points take the two forms as a mutually exclusive option
/// pair; [`UserRef::from_options`] rejects both-or-neither before any
/// request goes out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Name(String),
    Id(u64),
}

impl UserRef {
    pub fn from_options(screen_name: Option<&str>, user_id: Option<u64>) -> Result<Self> {
        match (screen_name, user_id) {
            (Some(name), None) => Ok(UserRef::Name(name.to_string())),
            (None, Some(id)) => Ok(UserRef::Id(id)),
            (Some(_), Some(_)) => Err(ApiError::InvalidArgument(
                "supply a screen name or a user id, not both".to_string(),
            )),
            (None, None) => Err(ApiError::InvalidArgument(
                "supply a screen name or a user id".to_string(),
            )),
        }
    }

    fn query_param(&self) -> (&'static str, String) {
        match self {
            UserRef::Name(name) => ("screen_name", name.clone()),
            UserRef::Id(id) => ("user_id", id.to_string()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            UserRef::Name(name) => name.clone(),
            UserRef::Id(id) => id.to_string(),
        }
    }
}

/// One page of a cursored identifier listing. `next_cursor` of 0 means the
/// listing is exhausted.
#[derive(Debug, Clone, Deserialize)]
pub struct IdPage {
    pub ids: Vec<u64>,
    pub next_cursor: i64,
}

/// Profile attributes for one user. `followers_count` is the ranking metric
/// the crawler trims by.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    pub id: u64,
    pub screen_name: String,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub friends_count: u64,
}

pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("flock/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Outgoing connections ("friends") of `user`, one page.
    pub async fn friends_ids(&self, user: &UserRef, cursor: i64) -> Result<IdPage> {
        self.id_page("friends/ids.json", user, cursor).await
    }

    /// Incoming connections ("followers") of `user`, one page.
    pub async fn followers_ids(&self, user: &UserRef, cursor: i64) -> Result<IdPage> {
        self.id_page("followers/ids.json", user, cursor).await
    }

    async fn id_page(&self, path: &str, user: &UserRef, cursor: i64) -> Result<IdPage> {
        let url = self.endpoint(path)?;
        let (key, value) = user.query_param();
        debug!("GET {} {}={} cursor={}", url, key, value, cursor);

        let cursor = cursor.to_string();
        let count = self.config.page_size.to_string();
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.config.bearer_token)
            .query(&[
                (key, value.as_str()),
                ("cursor", cursor.as_str()),
                ("count", count.as_str()),
            ])
            .send()
            .await?;

        let body = Self::successful_body(response, &url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Batch profile lookup. `key` is the reference form (`screen_name` or
    /// `user_id`); `joined` is the comma-separated batch, at most 100 wide.
    pub async fn users_lookup(&self, key: &'static str, joined: &str) -> Result<Vec<ProfileRecord>> {
        let url = self.endpoint("users/lookup.json")?;
        debug!("GET {} {}={}", url, key, joined);

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.config.bearer_token)
            .query(&[(key, joined)])
            .send()
            .await?;

        let body = Self::successful_body(response, &url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidArgument(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn successful_body(response: Response, url: &Url) -> Result<String> {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized {
                url: url.to_string(),
            }),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound {
                url: url.to_string(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited {
                url: url.to_string(),
            }),
            s if matches!(s.as_u16(), 500 | 502 | 503 | 504) => Err(ApiError::ServerError {
                status: s.as_u16(),
                url: url.to_string(),
            }),
            s if s.is_success() => Ok(response.text().await?),
            s => Err(ApiError::UnexpectedStatus {
                status: s.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}
