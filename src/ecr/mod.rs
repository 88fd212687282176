//! Client for AWS Elastic Container Registry
//!
//! Auth is handled by ambient SDK credentials, so the only work here is
//! pagination and batch deletion. Deletes are accumulated per repository
//! and issued as a single BatchDeleteImage call by the service layer.

use crate::constants;
use anyhow::{Context, Result};
use aws_sdk_ecr::types::ImageIdentifier;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// One image from DescribeImages, reduced to what the policy needs
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub tags: Vec<String>,
    pub digest: String,
    pub pushed_at: DateTime<Utc>,
}

pub struct EcrClient {
    client: aws_sdk_ecr::Client,
    registry_id: String,
}

impl EcrClient {
    pub async fn new() -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(constants::ecr::REGION))
            .load()
            .await;
        Self {
            client: aws_sdk_ecr::Client::new(&config),
            registry_id: constants::ecr::REGISTRY_ID.to_string(),
        }
    }

    /// List every repository name in the registry
    pub async fn list_repositories(&self) -> Result<Vec<String>> {
        let mut repos = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .describe_repositories()
                .registry_id(&self.registry_id);
            if let Some(token) = &next_token {
                request = request.next_token(token);
            }
            let response = request
                .send()
                .await
                .context("Failed to describe repositories")?;

            repos.extend(
                response
                    .repositories()
                    .iter()
                    .filter_map(|repo| repo.repository_name().map(str::to_string)),
            );

            next_token = response.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }
        Ok(repos)
    }

    /// List images in a repository. Images missing a digest or push time
    /// are skipped; tag-less images surface with an empty tag list and the
    /// policy layer treats them as nothing to do.
    pub async fn list_images(&self, repo: &str) -> Result<Vec<ImageRecord>> {
        let mut images = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .describe_images()
                .registry_id(&self.registry_id)
                .repository_name(repo);
            if let Some(token) = &next_token {
                request = request.next_token(token);
            }
            let response = request
                .send()
                .await
                .with_context(|| format!("Failed to describe images in {}", repo))?;

            for detail in response.image_details() {
                let (Some(digest), Some(pushed)) =
                    (detail.image_digest(), detail.image_pushed_at())
                else {
                    continue;
                };
                let Some(pushed_at) = DateTime::from_timestamp(pushed.secs(), 0) else {
                    warn!("{}: image {} has an invalid push time", repo, digest);
                    continue;
                };
                images.push(ImageRecord {
                    tags: detail.image_tags().to_vec(),
                    digest: digest.to_string(),
                    pushed_at,
                });
            }

            next_token = response.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }
        Ok(images)
    }

    /// Delete a batch of images by digest. Per-image failures are logged
    /// and do not abort the run.
    pub async fn batch_delete(&self, repo: &str, digests: &[String]) -> Result<()> {
        debug!("Batch deleting {} images from {}", digests.len(), repo);
        let image_ids: Vec<ImageIdentifier> = digests
            .iter()
            .map(|digest| ImageIdentifier::builder().image_digest(digest).build())
            .collect();

        let response = self
            .client
            .batch_delete_image()
            .registry_id(&self.registry_id)
            .repository_name(repo)
            .set_image_ids(Some(image_ids))
            .send()
            .await
            .with_context(|| format!("Failed to batch delete images in {}", repo))?;

        for failure in response.failures() {
            warn!(
                "{}: failed to delete {:?}: {:?} {}",
                repo,
                failure.image_id().and_then(|id| id.image_digest()),
                failure.failure_code(),
                failure.failure_reason().unwrap_or_default(),
            );
        }
        Ok(())
    }
}
