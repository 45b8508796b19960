//! HTTP adapter for the Charms profile API.
//!
//! # API Endpoints
//!
//! - Primary profile: `GET {base}/api/user_info?user_id={id}`
//! - Secondary sources: `GET {base}/api/inspect_user?user_id={id}`
//! - Avatar write-back: `POST {base}/api/user_info` with `{"user_id", "avatar"}`
//!
//! Request timeouts live here; the resolver itself never times out.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ResolutionError;
use crate::models::{
    AvatarUrl, IdentityId, PrimaryProfile, SecondaryLookupResponse, SecondarySources,
    PRIMARY_LOOKUP, SECONDARY_LOOKUP,
};
use crate::resolver::{AvatarWriter, PrimaryLookup, SecondaryLookup};

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const USER_INFO_PATH: &str = "/api/user_info";
const INSPECT_USER_PATH: &str = "/api/inspect_user";

#[derive(Debug, Serialize)]
struct PersistAvatarRequest<'a> {
    user_id: &'a str,
    avatar: &'a str,
}

/// Client for the profile API. Implements all three lookup seams.
///
/// # Example
///
/// ```ignore
/// let api = Arc::new(HttpProfileApi::new("https://charms.example"));
/// let resolver = AvatarResolver::new(api.clone(), api.clone(), api);
/// ```
#[derive(Clone)]
pub struct HttpProfileApi {
    client: Client,
    base_url: String,
}

impl HttpProfileApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn lookup_url(&self, path: &str, identity: &str) -> String {
        format!(
            "{}{}?user_id={}",
            self.base_url,
            path,
            urlencoding::encode(identity)
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        lookup: &'static str,
        url: &str,
    ) -> Result<T, ResolutionError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolutionError::Transport {
                lookup,
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ResolutionError::Status {
                lookup,
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolutionError::Transport {
                lookup,
                message: e.to_string(),
            })?;

        serde_json::from_str(&body).map_err(|e| ResolutionError::Parse {
            lookup,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PrimaryLookup for HttpProfileApi {
    async fn fetch_primary(
        &self,
        identity: &IdentityId,
    ) -> Result<PrimaryProfile, ResolutionError> {
        let url = self.lookup_url(USER_INFO_PATH, identity);
        self.get_json(PRIMARY_LOOKUP, &url).await
    }
}

#[async_trait]
impl SecondaryLookup for HttpProfileApi {
    async fn fetch_secondary(
        &self,
        identity: &IdentityId,
    ) -> Result<SecondarySources, ResolutionError> {
        let url = self.lookup_url(INSPECT_USER_PATH, identity);
        let response: SecondaryLookupResponse = self.get_json(SECONDARY_LOOKUP, &url).await?;
        response.into_sources()
    }
}

#[async_trait]
impl AvatarWriter for HttpProfileApi {
    async fn persist_avatar(
        &self,
        identity: &IdentityId,
        avatar: &AvatarUrl,
    ) -> Result<(), ResolutionError> {
        let url = format!("{}{}", self.base_url, USER_INFO_PATH);
        let body = PersistAvatarRequest {
            user_id: identity,
            avatar: avatar.as_str(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ResolutionError::Persistence {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ResolutionError::Persistence {
                message: format!("HTTP error: {}", response.status()),
            });
        }

        Ok(())
    }
}
