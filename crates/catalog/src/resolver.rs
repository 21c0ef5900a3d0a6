use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_ION_API: &str = "https://api.cesium.com";

/// Streamable location of a hosted asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub asset_id: u64,
    pub url: String,
    /// Per-asset token to present when fetching `url`, if the host issues one.
    pub access_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no asset access token configured")]
    MissingToken,
    #[error("asset {asset_id} request failed: {source}")]
    Http {
        asset_id: u64,
        #[source]
        source: reqwest::Error,
    },
    #[error("asset {asset_id} rejected with status {status}")]
    Status { asset_id: u64, status: u16 },
}

/// Maps an asset id to a URL the host can stream from.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    async fn resolve(&self, asset_id: u64) -> Result<ResolvedAsset, ResolveError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointResponse {
    url: String,
    #[serde(default)]
    access_token: Option<String>,
}

/// Resolves assets through an ion-style REST endpoint
/// (`GET {base}/v1/assets/{id}/endpoint` with a bearer token).
#[derive(Debug, Clone)]
pub struct IonAssetResolver {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl IonAssetResolver {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn endpoint_url(&self, asset_id: u64) -> String {
        format!(
            "{}/v1/assets/{asset_id}/endpoint",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl AssetResolver for IonAssetResolver {
    async fn resolve(&self, asset_id: u64) -> Result<ResolvedAsset, ResolveError> {
        let token = self.token.as_deref().ok_or(ResolveError::MissingToken)?;
        let url = self.endpoint_url(asset_id);
        tracing::debug!(asset_id, %url, "resolving asset");

        let resp = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|source| ResolveError::Http { asset_id, source })?;
        if !resp.status().is_success() {
            return Err(ResolveError::Status {
                asset_id,
                status: resp.status().as_u16(),
            });
        }
        let body: EndpointResponse = resp
            .json()
            .await
            .map_err(|source| ResolveError::Http { asset_id, source })?;

        Ok(ResolvedAsset {
            asset_id,
            url: body.url,
            access_token: body.access_token,
        })
    }
}
