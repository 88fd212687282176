use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "regsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (prints every HTTP request)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete old tags from a registry speaking the distribution HTTP API
    Registry {
        /// Base URL of the registry, e.g. https://registry.example
        base_url: String,

        /// Dry run; print tags that would be deleted
        #[arg(long)]
        dry_run: bool,

        /// Days of stable tags to keep (all-digit, non per-build images)
        #[arg(long, default_value_t = 14)]
        keep_stable_days: i64,

        /// Days of unstable tags to keep (per-build images)
        #[arg(long, default_value_t = 1)]
        keep_unstable_days: i64,

        /// Only run cleanup for repositories with this prefix
        #[arg(long, required = true)]
        filter_prefix: String,

        /// Never clean up these tags (comma separated)
        #[arg(long, value_delimiter = ',')]
        ignore_tags: Vec<String>,

        /// Username to auth with the registry
        #[arg(long)]
        username: Option<String>,

        /// Password to auth with the registry
        #[arg(long)]
        password: Option<String>,

        /// Read the password from stdin (trailing newlines stripped)
        #[arg(long)]
        password_stdin: bool,

        /// Follow Link-header pagination on catalog and tag-list responses
        #[arg(long)]
        follow_pagination: bool,
    },

    /// Delete old tags from the fixed ECR registry
    Ecr {
        /// Dry run; print tags that would be deleted
        #[arg(long)]
        dry_run: bool,

        /// Days of stable tags to keep (all-digit, non per-build images)
        #[arg(long, default_value_t = 14)]
        keep_stable_days: i64,

        /// Days of unstable tags to keep (per-build images)
        #[arg(long, default_value_t = 1)]
        keep_unstable_days: i64,

        /// Only run cleanup for repositories with this prefix
        #[arg(long, default_value = "")]
        filter_prefix: String,

        /// Never clean up these tags (comma separated)
        #[arg(long, value_delimiter = ',')]
        ignore_tags: Vec<String>,
    },

    /// Show version information
    Version,
}
