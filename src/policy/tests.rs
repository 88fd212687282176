//! Tests for tag classification and retention decisions

use super::*;
use chrono::TimeZone;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn days_ago(days: i64) -> DateTime<Utc> {
    fixed_now() - Duration::days(days)
}

#[test]
fn test_classify_all_digits_is_stable() {
    assert_eq!(classify("123"), Classification::Stable);
    assert_eq!(classify("0"), Classification::Stable);
    assert_eq!(classify("20240601"), Classification::Stable);
}

#[test]
fn test_classify_everything_else_is_unstable() {
    assert_eq!(classify("feature-x"), Classification::Unstable);
    assert_eq!(classify("v1.2.3"), Classification::Unstable);
    assert_eq!(classify("123a"), Classification::Unstable);
    assert_eq!(classify("1.0"), Classification::Unstable);
    // Python's "".isdigit() is false, so the empty string is unstable
    assert_eq!(classify(""), Classification::Unstable);
}

#[test]
fn test_window_follows_classification() {
    let policy = RetentionPolicy::new(14, 1, vec![]);
    assert_eq!(policy.window_for(Classification::Stable), Duration::days(14));
    assert_eq!(
        policy.window_for(Classification::Unstable),
        Duration::days(1)
    );
}

#[test]
fn test_decide_scenario_from_three_tags() {
    // stable window 14d, unstable window 1d
    let policy = RetentionPolicy::new(14, 1, vec![]);
    let now = fixed_now();

    // stable tag created 20 days ago: deleted
    let (decision, age) = policy.decide("123", days_ago(20), now);
    assert_eq!(decision, Decision::Delete);
    assert_eq!(age, Duration::days(20));

    // stable tag created 5 days ago: kept
    let (decision, _) = policy.decide("456", days_ago(5), now);
    assert_eq!(decision, Decision::Keep);

    // unstable tag created 2 days ago: deleted (exceeds 1-day window)
    let (decision, _) = policy.decide("feature-x", days_ago(2), now);
    assert_eq!(decision, Decision::Delete);
}

#[test]
fn test_decide_ignore_list_wins_regardless_of_age() {
    let policy = RetentionPolicy::new(14, 1, vec!["latest".to_string()]);
    let (decision, _) = policy.decide("latest", days_ago(365), fixed_now());
    assert_eq!(decision, Decision::Ignore);
}

#[test]
fn test_decide_age_equal_to_window_deletes() {
    let policy = RetentionPolicy::new(14, 1, vec![]);
    let (decision, _) = policy.decide("123", days_ago(14), fixed_now());
    assert_eq!(decision, Decision::Delete);

    let (decision, _) = policy.decide("feature-x", days_ago(1), fixed_now());
    assert_eq!(decision, Decision::Delete);
}

#[test]
fn test_empty_ignore_entries_are_dropped() {
    // Splitting an empty --ignore-tags value yields [""]
    let policy = RetentionPolicy::new(14, 1, vec!["".to_string()]);
    let (decision, _) = policy.decide("feature-x", days_ago(2), fixed_now());
    assert_eq!(decision, Decision::Delete);
}

#[test]
fn test_format_age() {
    assert_eq!(format_age(Duration::days(20)), "20d 0h");
    assert_eq!(format_age(Duration::hours(30)), "1d 6h");
    assert_eq!(format_age(Duration::minutes(90)), "0d 1h");
}
