//! Retention policy for image tags
//!
//! Classifies tags as stable (all-digit, i.e. a build number promoted to a
//! release) or unstable (everything else) and decides whether a tag is old
//! enough to delete. Pure decision logic; the service layer is responsible
//! for acting on it and for dry-run handling.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

#[cfg(test)]
mod tests;

/// Tag classification by naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// All-digit tag, kept on the longer window
    Stable,
    /// Per-build tag, kept on the shorter window
    Unstable,
}

/// Outcome of a retention decision for a single tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Tag is on the ignore list, never deleted
    Ignore,
    /// Tag is younger than its retention window
    Keep,
    /// Tag is eligible for deletion
    Delete,
}

/// Classify a tag. Stable iff the tag is nonempty and all ASCII digits.
pub fn classify(tag: &str) -> Classification {
    if !tag.is_empty() && tag.bytes().all(|b| b.is_ascii_digit()) {
        Classification::Stable
    } else {
        Classification::Unstable
    }
}

/// Immutable retention configuration for a run
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    stable_window: Duration,
    unstable_window: Duration,
    ignore: HashSet<String>,
}

impl RetentionPolicy {
    pub fn new<I>(stable_days: i64, unstable_days: i64, ignore_tags: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            stable_window: Duration::days(stable_days),
            unstable_window: Duration::days(unstable_days),
            // CSV parsing upstream can yield empty entries; they can never
            // match a real tag, so drop them here.
            ignore: ignore_tags.into_iter().filter(|t| !t.is_empty()).collect(),
        }
    }

    /// Retention window applied to the given classification
    pub fn window_for(&self, classification: Classification) -> Duration {
        match classification {
            Classification::Stable => self.stable_window,
            Classification::Unstable => self.unstable_window,
        }
    }

    /// Decide what to do with a tag, returning the decision together with
    /// the computed age for logging. Deterministic for identical inputs.
    pub fn decide(
        &self,
        tag: &str,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> (Decision, Duration) {
        let age = now - created_at;
        if self.ignore.contains(tag) {
            return (Decision::Ignore, age);
        }
        if age < self.window_for(classify(tag)) {
            return (Decision::Keep, age);
        }
        (Decision::Delete, age)
    }
}

/// Render an age for decision logs, e.g. "20d 5h"
pub fn format_age(age: Duration) -> String {
    let days = age.num_days();
    let hours = age.num_hours() - days * 24;
    format!("{}d {}h", days, hours)
}
