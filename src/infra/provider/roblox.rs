//! Roblox economy and thumbnails client.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use moka::future::Cache as MokaCache;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use serde::Deserialize;
use tracing::instrument;

use super::{CatalogProvider, ProviderError, RetryPolicy};
use crate::config::{
    ProviderConfig, IMAGE_CACHE_CAPACITY, IMAGE_CACHE_TTL_SECONDS, PROVIDER_ORIGIN,
    PROVIDER_REFERER, PROVIDER_USER_AGENT, THUMBNAIL_SIZE,
};
use crate::domain::ItemMetadata;

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_IMAGE: &str = "image/*";

/// Asset details as returned by the economy API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssetDetails {
    name: Option<String>,
    description: Option<String>,
    price_in_robux: Option<i64>,
    asset_type_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ThumbnailResponse {
    #[serde(default)]
    data: Vec<Thumbnail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Thumbnail {
    image_url: Option<String>,
}

/// HTTP gateway to the Roblox public APIs.
///
/// Metadata lookups retry with backoff under a total deadline. Thumbnail
/// lookups make a single attempt and degrade to `None`; successful
/// downloads are kept in an in-process cache.
#[derive(Clone)]
pub struct RobloxGateway {
    client: reqwest::Client,
    economy_base_url: String,
    thumbnails_base_url: String,
    retry: RetryPolicy,
    deadline: Duration,
    images: MokaCache<String, Bytes>,
}

impl RobloxGateway {
    /// Build the gateway and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(PROVIDER_USER_AGENT));
        headers.insert(REFERER, HeaderValue::from_static(PROVIDER_REFERER));
        headers.insert(ORIGIN, HeaderValue::from_static(PROVIDER_ORIGIN));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let images = MokaCache::builder()
            .max_capacity(IMAGE_CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(IMAGE_CACHE_TTL_SECONDS))
            .build();

        let retry = RetryPolicy::new(config.max_attempts, config.base_delay);
        if !retry.fits_within(config.deadline) {
            tracing::warn!(
                backoff = ?retry.total_backoff(),
                deadline = ?config.deadline,
                "Provider deadline is shorter than the retry backoff; late attempts will never run"
            );
        }

        Ok(Self {
            client,
            economy_base_url: config.economy_base_url.trim_end_matches('/').to_string(),
            thumbnails_base_url: config.thumbnails_base_url.trim_end_matches('/').to_string(),
            retry,
            deadline: config.deadline,
            images,
        })
    }

    /// GET with retry on transport failure or non-success status.
    async fn get_with_retry(&self, url: &str, accept: &str) -> Result<reqwest::Response, ProviderError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let cause = match self.client.get(url).header(ACCEPT, accept).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => format!("status {}", response.status()),
                Err(e) => e.to_string(),
            };

            match self.retry.delay_after(attempt) {
                Some(delay) => {
                    tracing::warn!(%url, attempt, cause = %cause, ?delay, "Provider request failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::warn!(%url, attempt, cause = %cause, "Provider request failed, giving up");
                    return Err(ProviderError::FetchFailed {
                        attempts: attempt,
                        cause,
                    });
                }
            }
        }
    }

    /// Single-attempt GET, failing on anything but a success status.
    async fn get_once(&self, url: &str, accept: &str) -> Result<reqwest::Response, String> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(format!("status {}", response.status()))
        }
    }

    async fn download_image(&self, external_id: &str) -> Result<Bytes, String> {
        let lookup_url = format!(
            "{}/v1/assets?assetIds={}&size={}&format=Png",
            self.thumbnails_base_url, external_id, THUMBNAIL_SIZE
        );

        let thumbnails: ThumbnailResponse = self
            .get_once(&lookup_url, ACCEPT_JSON)
            .await?
            .json()
            .await
            .map_err(|e| e.to_string())?;

        let image_url = thumbnails
            .data
            .into_iter()
            .next()
            .and_then(|t| t.image_url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| "no thumbnail url".to_string())?;

        self.get_once(&image_url, ACCEPT_IMAGE)
            .await?
            .bytes()
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl CatalogProvider for RobloxGateway {
    #[instrument(skip(self))]
    async fn fetch_item_metadata(&self, external_id: &str) -> Result<ItemMetadata, ProviderError> {
        let url = format!("{}/v2/assets/{}/details", self.economy_base_url, external_id);

        let fetch = async {
            let response = self.get_with_retry(&url, ACCEPT_JSON).await?;
            response
                .json::<AssetDetails>()
                .await
                .map_err(|e| ProviderError::Decode(e.to_string()))
        };

        let details = tokio::time::timeout(self.deadline, fetch)
            .await
            .map_err(|_| ProviderError::DeadlineExceeded(self.deadline))??;

        Ok(ItemMetadata::from_provider(
            external_id,
            details.name,
            details.description,
            details.price_in_robux,
            details.asset_type_id,
        ))
    }

    #[instrument(skip(self))]
    async fn fetch_item_image(&self, external_id: &str) -> Option<Bytes> {
        if let Some(cached) = self.images.get(external_id).await {
            return Some(cached);
        }

        let bytes = match tokio::time::timeout(self.deadline, self.download_image(external_id)).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(reason)) => {
                tracing::info!(reason = %reason, "Thumbnail unavailable");
                return None;
            }
            Err(_) => {
                tracing::info!("Thumbnail fetch timed out");
                return None;
            }
        };

        self.images
            .insert(external_id.to_string(), bytes.clone())
            .await;
        Some(bytes)
    }
}
