use chrono::{DateTime, Utc};

use crate::models::{
    AnalysisSnapshot, ConcernChanges, MetricsOutcome, Observation, ProgressMetrics,
    TrackingPeriod, Trend,
};
use crate::severity::{distinct, round_to, severity_score};

pub fn calculate_progress_metrics(history: &[Observation]) -> MetricsOutcome {
    let (first, latest) = match history {
        [first, .., latest] => (first, latest),
        _ => return MetricsOutcome::InsufficientData,
    };

    let first_score = severity_score(&first.concerns);
    let latest_score = severity_score(&latest.concerns);
    let improvement = improvement_percentage(first_score, latest_score);

    let total: f64 = history.iter().map(|entry| severity_score(&entry.concerns)).sum();
    let average_severity = round_to(total / history.len() as f64, 2);

    MetricsOutcome::Success(ProgressMetrics {
        improvement_percentage: improvement,
        first_analysis: snapshot(first, first_score),
        latest_analysis: snapshot(latest, latest_score),
        concern_changes: concern_changes(&first.concerns, &latest.concerns),
        tracking_period: TrackingPeriod {
            days: tracking_days(first.timestamp, latest.timestamp),
            total_analyses: history.len(),
        },
        trend: classify_trend(improvement),
        average_severity,
    })
}

pub fn improvement_percentage(first_score: f64, latest_score: f64) -> f64 {
    if first_score > 0.0 {
        round_to((first_score - latest_score) / first_score * 100.0, 1)
    } else {
        0.0
    }
}

pub fn classify_trend(improvement: f64) -> Trend {
    if improvement > 20.0 {
        Trend::ExcellentImprovement
    } else if improvement > 10.0 {
        Trend::GoodImprovement
    } else if improvement > 5.0 {
        Trend::ModerateImprovement
    } else if improvement > 0.0 {
        Trend::MinimalImprovement
    } else if improvement == 0.0 {
        Trend::Stable
    } else {
        Trend::NeedsAttention
    }
}

/// Set algebra over the labels as stored; normalization only applies to scoring.
pub fn concern_changes(first: &[String], latest: &[String]) -> ConcernChanges {
    let first = distinct(first);
    let latest = distinct(latest);

    ConcernChanges {
        resolved: labels_where(&first, |label| !latest.contains(label)),
        new: labels_where(&latest, |label| !first.contains(label)),
        persistent: labels_where(&first, |label| latest.contains(label)),
    }
}

fn labels_where(labels: &[&str], keep: impl Fn(&&str) -> bool) -> Vec<String> {
    labels
        .iter()
        .filter(|label| keep(label))
        .map(|label| label.to_string())
        .collect()
}

/// Whole days elapsed, truncated. Zero when either side lacks a timestamp.
pub fn tracking_days(first: Option<DateTime<Utc>>, latest: Option<DateTime<Utc>>) -> i64 {
    match (first, latest) {
        (Some(first), Some(latest)) => (latest - first).num_days().max(0),
        _ => 0,
    }
}

fn snapshot(entry: &Observation, score: f64) -> AnalysisSnapshot {
    AnalysisSnapshot {
        date: entry.timestamp,
        concerns: distinct(&entry.concerns)
            .into_iter()
            .map(str::to_string)
            .collect(),
        severity_score: round_to(score, 2),
    }
}
