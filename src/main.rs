use anyhow::{Context, Result};
use clap::Parser;
use regsweep::{
    auth::Credentials,
    cli::{Cli, Commands},
    ecr::EcrClient,
    policy::RetentionPolicy,
    registry::RegistryClient,
    service::{sweep_ecr, sweep_registry, SweepReport},
};
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Registry {
            base_url,
            dry_run,
            keep_stable_days,
            keep_unstable_days,
            filter_prefix,
            ignore_tags,
            username,
            password,
            password_stdin,
            follow_pagination,
        } => {
            if dry_run {
                println!("Dry run, not deleting any tags");
            }

            let password = if password_stdin {
                let mut input = String::new();
                std::io::stdin()
                    .read_to_string(&mut input)
                    .context("Failed to read password from stdin")?;
                Some(input.trim_end_matches('\n').to_string())
            } else {
                password
            };
            let credentials = username
                .map(|username| Credentials::new(username, password.unwrap_or_default()));

            let policy = RetentionPolicy::new(keep_stable_days, keep_unstable_days, ignore_tags);
            let mut client = RegistryClient::new(&base_url, credentials, follow_pagination);

            let report = sweep_registry(&mut client, &policy, &filter_prefix, dry_run).await?;
            print_summary(&report, dry_run);
        }
        Commands::Ecr {
            dry_run,
            keep_stable_days,
            keep_unstable_days,
            filter_prefix,
            ignore_tags,
        } => {
            if dry_run {
                println!("Dry run, not deleting any tags");
            }

            let policy = RetentionPolicy::new(keep_stable_days, keep_unstable_days, ignore_tags);
            let client = EcrClient::new().await;

            let report = sweep_ecr(&client, &policy, &filter_prefix, dry_run).await?;
            print_summary(&report, dry_run);
        }
        Commands::Version => {
            println!("regsweep {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn print_summary(report: &SweepReport, dry_run: bool) {
    let action = if dry_run { "would delete" } else { "deleted" };
    println!(
        "{} {}, kept {}, ignored {}, skipped {}",
        action, report.deleted, report.kept, report.ignored, report.skipped
    );
}
