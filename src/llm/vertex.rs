// ABOUTME: Google Vertex AI ambient-credential support for the Gemini adapter
// ABOUTME: Regional endpoint construction and cached GCP access tokens from metadata server or gcloud
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Vertex AI
//!
//! In Vertex mode the Gemini adapter calls the regional Vertex endpoint with a
//! bearer token obtained through Application Default Credentials:
//! - In Cloud Run / GCE / GKE: the metadata server
//! - Locally: `gcloud auth application-default print-access-token`

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tokio::sync::RwLock;
use tracing::debug;
use workout_core::errors::ProviderError;

use crate::config::ProviderKind;

/// Default GCP region for Vertex AI
pub const DEFAULT_REGION: &str = "us-central1";

/// Lifetime of a GCP access token
const TOKEN_LIFETIME_SECS: u64 = 3600;

/// Token refresh buffer - refresh 5 minutes before expiry
const TOKEN_REFRESH_BUFFER_SECS: u64 = 300;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Project and region for Vertex AI calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexTarget {
    /// GCP project id
    pub project_id: String,
    /// GCP region
    pub region: String,
}

impl VertexTarget {
    /// Target in `region`, defaulting to `us-central1` when blank
    #[must_use]
    pub fn new(project_id: impl Into<String>, region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            project_id: project_id.into(),
            region: if region.trim().is_empty() {
                DEFAULT_REGION.to_owned()
            } else {
                region
            },
        }
    }

    /// `generateContent` URL for a model
    #[must_use]
    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "https://{region}-aiplatform.googleapis.com/v1/projects/{project}/locations/{region}/publishers/google/models/{model}:generateContent",
            region = self.region,
            project = self.project_id,
        )
    }
}

/// Cached access token with expiry tracking
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Response from GCP metadata server token endpoint
#[derive(Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
}

/// GCP access token provider using Application Default Credentials
#[derive(Clone)]
pub struct GcpAuth {
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    client: Client,
}

impl GcpAuth {
    /// Token source sharing the adapter's HTTP client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            cached_token: Arc::new(RwLock::new(None)),
            client,
        }
    }

    /// Get a valid access token, refreshing if necessary
    ///
    /// # Errors
    ///
    /// Returns `REQUEST_FAILED` when neither the metadata server nor gcloud
    /// yields a token.
    pub async fn access_token(&self) -> Result<String, ProviderError> {
        {
            let cache = self.cached_token.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.expires_at > Instant::now() {
                    return Ok(cached.token.clone());
                }
            }
        }

        let token = self.fetch_new_token().await?;

        {
            let mut cache = self.cached_token.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at: Instant::now()
                    + Duration::from_secs(TOKEN_LIFETIME_SECS - TOKEN_REFRESH_BUFFER_SECS),
            });
        }

        Ok(token)
    }

    async fn fetch_new_token(&self) -> Result<String, ProviderError> {
        if let Some(token) = self.fetch_from_metadata_server().await {
            debug!("Obtained GCP token from metadata server");
            return Ok(token);
        }

        if let Some(token) = Self::fetch_from_gcloud_cli().await {
            debug!("Obtained GCP token from gcloud CLI");
            return Ok(token);
        }

        Err(ProviderError::request_failed(
            ProviderKind::Gemini.as_str(),
            None,
            "Failed to obtain GCP access token. Locally, run: gcloud auth application-default login",
        ))
    }

    async fn fetch_from_metadata_server(&self) -> Option<String> {
        let response = self
            .client
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        response
            .json::<MetadataTokenResponse>()
            .await
            .ok()
            .map(|body| body.access_token)
            .filter(|token| !token.is_empty())
    }

    async fn fetch_from_gcloud_cli() -> Option<String> {
        let output = TokioCommand::new("gcloud")
            .args(["auth", "application-default", "print-access-token"])
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        (!token.is_empty()).then_some(token)
    }
}

impl Debug for GcpAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GcpAuth").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regional_url() {
        let target = VertexTarget::new("my-project", "europe-west4");
        assert_eq!(
            target.generate_url("gemini-2.5-flash"),
            "https://europe-west4-aiplatform.googleapis.com/v1/projects/my-project/locations/europe-west4/publishers/google/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_blank_region_defaults() {
        assert_eq!(VertexTarget::new("p", " ").region, DEFAULT_REGION);
    }
}
