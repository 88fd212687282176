use crate::ecr::EcrClient;
use crate::policy::{format_age, Decision, RetentionPolicy};
use crate::registry::RegistryClient;
use anyhow::Result;
use chrono::Utc;
use tracing::info;

/// Counts of decisions taken during a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub deleted: usize,
    pub kept: usize,
    pub ignored: usize,
    /// Tags whose manifest or config could not be fetched
    pub skipped: usize,
}

impl SweepReport {
    fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Ignore => self.ignored += 1,
            Decision::Keep => self.kept += 1,
            Decision::Delete => self.deleted += 1,
        }
    }
}

/// Sweep an HTTP-API registry: per-tag manifest lookups, per-tag deletes
pub async fn sweep_registry(
    client: &mut RegistryClient,
    policy: &RetentionPolicy,
    prefix: &str,
    dry_run: bool,
) -> Result<SweepReport> {
    let now = Utc::now();
    let mut report = SweepReport::default();

    let repos = client.list_repositories(prefix).await?;
    for repo in &repos {
        println!("{}", repo);

        let tags = client.list_tags(repo).await?;
        for tag in &tags {
            let Some(manifest) = client.fetch_manifest(repo, tag).await? else {
                report.skipped += 1;
                continue;
            };
            let Some(created_at) = client.fetch_created_at(repo, &manifest.config_digest).await?
            else {
                report.skipped += 1;
                continue;
            };

            let (decision, age) = policy.decide(tag, created_at, now);
            report.record(decision);
            match decision {
                Decision::Ignore => {
                    info!("Ignoring tag {} (age: {})", tag, format_age(age));
                }
                Decision::Keep => {
                    info!(
                        "Not deleting manifest for tag {} (age: {})",
                        tag,
                        format_age(age)
                    );
                }
                Decision::Delete if dry_run => {
                    info!(
                        "(dry run) Deleting manifest for tag {} (age: {})",
                        tag,
                        format_age(age)
                    );
                }
                Decision::Delete => {
                    info!(
                        "Deleting manifest for tag {} (age: {})",
                        tag,
                        format_age(age)
                    );
                    client
                        .delete_manifest(repo, &manifest.manifest_digest)
                        .await?;
                }
            }
        }
    }
    Ok(report)
}

/// Sweep an ECR registry: decisions per image, one batch delete per
/// repository at the end of its iteration
pub async fn sweep_ecr(
    client: &EcrClient,
    policy: &RetentionPolicy,
    prefix: &str,
    dry_run: bool,
) -> Result<SweepReport> {
    let now = Utc::now();
    let mut report = SweepReport::default();

    let repos = client.list_repositories().await?;
    for repo in repos.iter().filter(|repo| repo.starts_with(prefix)) {
        println!("{}", repo);

        let mut digests_to_delete = Vec::new();
        for image in client.list_images(repo).await? {
            // An untagged image is nothing to do, not an error
            let Some(tag) = image.tags.first() else {
                continue;
            };

            let (decision, age) = policy.decide(tag, image.pushed_at, now);
            report.record(decision);
            match decision {
                Decision::Ignore => {
                    info!("Ignoring tag {} (age: {})", tag, format_age(age));
                }
                Decision::Keep => {
                    info!(
                        "Not deleting manifest for tag {} (age: {})",
                        tag,
                        format_age(age)
                    );
                }
                Decision::Delete if dry_run => {
                    info!(
                        "(dry run) Deleting manifest for tag {} (age: {})",
                        tag,
                        format_age(age)
                    );
                }
                Decision::Delete => {
                    info!(
                        "Deleting manifest for tag {} (age: {})",
                        tag,
                        format_age(age)
                    );
                    digests_to_delete.push(image.digest.clone());
                }
            }
        }

        if !digests_to_delete.is_empty() {
            client.batch_delete(repo, &digests_to_delete).await?;
        }
    }
    Ok(report)
}
