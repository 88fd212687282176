//! Client for the Docker/OCI distribution HTTP API
//!
//! Translates registry operations into authenticated HTTP calls. Every
//! request funnels through [`AuthClient`](crate::auth::AuthClient) so the
//! caller never sees a 401. Fetch failures for a single tag are reported
//! as `None` and skipped; only auth negotiation failures abort the run.

use crate::auth::{AuthClient, Credentials};
use crate::constants::media_type;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT, LINK};
use serde::Deserialize;
use tracing::warn;

#[cfg(test)]
mod tests;

/// Digests needed to act on a single tag
#[derive(Debug, Clone)]
pub struct ManifestInfo {
    /// Digest of the image config blob, used to look up the creation time
    pub config_digest: String,
    /// Content digest of the manifest itself, the delete target
    pub manifest_digest: String,
}

#[derive(Deserialize)]
struct CatalogResponse {
    repositories: Vec<String>,
}

#[derive(Deserialize)]
struct TagListResponse {
    // The registry returns "tags": null for repositories with no tags.
    tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ManifestResponse {
    config: Descriptor,
}

#[derive(Deserialize)]
struct Descriptor {
    digest: String,
}

#[derive(Deserialize)]
struct ImageConfig {
    created: DateTime<Utc>,
}

pub struct RegistryClient {
    auth: AuthClient,
    base_url: String,
    follow_links: bool,
}

impl RegistryClient {
    pub fn new(base_url: &str, credentials: Option<Credentials>, follow_links: bool) -> Self {
        Self {
            auth: AuthClient::new(credentials),
            base_url: base_url.trim_end_matches('/').to_string(),
            follow_links,
        }
    }

    /// List repositories from the catalog endpoint, filtered by prefix
    pub async fn list_repositories(&mut self, prefix: &str) -> Result<Vec<String>> {
        let mut repos = Vec::new();
        let mut next = Some(format!("{}/v2/_catalog", self.base_url));

        while let Some(url) = next {
            let response = self.auth.get(&url).await?;
            next = self.next_page(response.headers());
            let catalog: CatalogResponse = response
                .json()
                .await
                .context("Invalid catalog response from registry")?;
            repos.extend(
                catalog
                    .repositories
                    .into_iter()
                    .filter(|repo| repo.starts_with(prefix)),
            );
        }
        Ok(repos)
    }

    /// List tags for a repository. An absent tag list means the repository
    /// has nothing to clean up, not that the call failed.
    pub async fn list_tags(&mut self, repo: &str) -> Result<Vec<String>> {
        let mut tags = Vec::new();
        let mut next = Some(format!("{}/v2/{}/tags/list", self.base_url, repo));

        while let Some(url) = next {
            let response = self.auth.get(&url).await?;
            next = self.next_page(response.headers());
            let list: TagListResponse = response
                .json()
                .await
                .with_context(|| format!("Invalid tag list response for {}", repo))?;
            tags.extend(list.tags.unwrap_or_default());
        }
        Ok(tags)
    }

    /// Fetch the manifest for a tag, returning the config digest from the
    /// body and the manifest digest from the Docker-Content-Digest header.
    /// Non-200 responses are logged and the tag is skipped.
    pub async fn fetch_manifest(&mut self, repo: &str, tag: &str) -> Result<Option<ManifestInfo>> {
        let url = format!("{}/v2/{}/manifests/{}", self.base_url, repo, tag);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, media_type::MANIFEST_V2.parse()?);

        let response = self.auth.get_with_headers(&url, headers).await?;
        if response.status() != reqwest::StatusCode::OK {
            warn!("{}: response status {}", tag, response.status());
            return Ok(None);
        }

        let manifest_digest = match response
            .headers()
            .get("Docker-Content-Digest")
            .and_then(|h| h.to_str().ok())
        {
            Some(digest) => digest.to_string(),
            None => {
                warn!("{}: missing Docker-Content-Digest header", tag);
                return Ok(None);
            }
        };

        let manifest: ManifestResponse = response
            .json()
            .await
            .with_context(|| format!("Invalid manifest response for {}:{}", repo, tag))?;

        Ok(Some(ManifestInfo {
            config_digest: manifest.config.digest,
            manifest_digest,
        }))
    }

    /// Fetch the image config blob to learn when the image was created.
    /// Non-200 responses are logged and the tag is skipped.
    pub async fn fetch_created_at(
        &mut self,
        repo: &str,
        config_digest: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let url = format!("{}/v2/{}/blobs/{}", self.base_url, repo, config_digest);
        let response = self.auth.get(&url).await?;
        if response.status() != reqwest::StatusCode::OK {
            warn!("{}: response status {}", config_digest, response.status());
            return Ok(None);
        }

        let config: ImageConfig = response
            .json()
            .await
            .with_context(|| format!("Invalid image config blob {}", config_digest))?;
        Ok(Some(config.created))
    }

    /// Delete a manifest by digest. A non-2xx status is logged but does
    /// not abort processing of the remaining tags.
    pub async fn delete_manifest(&mut self, repo: &str, digest: &str) -> Result<()> {
        let url = format!("{}/v2/{}/manifests/{}", self.base_url, repo, digest);
        let response = self.auth.delete(&url).await?;
        if !response.status().is_success() {
            warn!("{}: response status {}", digest, response.status());
        }
        Ok(())
    }

    /// Next page URL from a Link header, when pagination following is on
    fn next_page(&self, headers: &HeaderMap) -> Option<String> {
        if !self.follow_links {
            return None;
        }
        headers
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .and_then(|link| next_link(link, &self.base_url))
    }
}

/// Extract the rel="next" target from a Link header value, resolving
/// registry-relative paths against the base URL.
fn next_link(link: &str, base_url: &str) -> Option<String> {
    link.split(',')
        .find(|part| part.contains(r#"rel="next""#))
        .and_then(|part| part.split(';').next())
        .map(|url| {
            let url = url.trim().trim_matches('<').trim_matches('>');
            if url.starts_with('/') {
                format!("{}{}", base_url, url)
            } else {
                url.to_string()
            }
        })
}
