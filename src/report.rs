use std::fmt::Write;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, warn};

use crate::db::HistoryStore;
use crate::error::ProgressError;
use crate::insights::generate_progress_insights;
use crate::models::{
    AnalysisSnapshot, MetricsOutcome, Observation, ProgressReport, ProgressSummary, ReportStatus,
    SummaryTrend, TrendOutcome, UserProfile,
};
use crate::progress::{calculate_progress_metrics, improvement_percentage, tracking_days};
use crate::severity::{round_to, severity_score};
use crate::trends::analyze_concern_trends;

pub const DEFAULT_DAYS_BACK: i64 = 90;
pub const SUMMARY_DAYS_BACK: i64 = 30;

const NO_DATA_MESSAGE: &str =
    "No analysis history found. Start using the app to track your progress!";
const INSUFFICIENT_MESSAGE: &str = "Need at least 2 skin analyses to show progress. Keep tracking!";
const INSUFFICIENT_INSIGHT: &str = "Continue using the app regularly to track your skincare journey. \
     We recommend weekly analysis for best results.";
const SUCCESS_MESSAGE: &str = "Progress report generated successfully";
const RECOMMENDATION: &str = "Continue with regular skin analysis to track long-term progress.";
const REPORT_ERROR_MESSAGE: &str = "Unable to generate progress report at this time";
const SUMMARY_ERROR_MESSAGE: &str = "Unable to generate summary";

/// Full progress report over the last `days_back` days. Never fails; store and
/// computation faults are logged and reported as `error`.
pub async fn full_report<S: HistoryStore>(store: &S, email: &str, days_back: i64) -> ProgressReport {
    match build_full_report(store, email, days_back).await {
        Ok(report) => report,
        Err(err) => {
            error!(email, days_back, error = %err, "failed to generate progress report");
            ProgressReport::bare(ReportStatus::Error, REPORT_ERROR_MESSAGE)
        }
    }
}

/// Dashboard summary over the last 30 days.
pub async fn quick_summary<S: HistoryStore>(store: &S, email: &str) -> ProgressSummary {
    match build_summary(store, email).await {
        Ok(summary) => summary,
        Err(err) => {
            error!(email, error = %err, "failed to generate progress summary");
            ProgressSummary {
                status: ReportStatus::Error,
                total_analyses: None,
                improvement_percentage: None,
                improvement_trend: None,
                latest_concerns: None,
                tracking_days: None,
                message: Some(SUMMARY_ERROR_MESSAGE.to_string()),
            }
        }
    }
}

pub fn window_start(now: DateTime<Utc>, days_back: i64) -> DateTime<Utc> {
    now - Duration::days(days_back.max(1))
}

async fn load_history<S: HistoryStore>(
    store: &S,
    email: &str,
    days_back: i64,
) -> Result<Vec<Observation>, ProgressError> {
    let now = Utc::now();
    let mut history = store
        .fetch_history(email, window_start(now, days_back))
        .await
        .map_err(ProgressError::store)?;

    let fetched = history.len();
    history.retain(|entry| entry.timestamp.map_or(true, |ts| ts <= now));
    if history.len() < fetched {
        warn!(email, dropped = fetched - history.len(), "ignoring future-dated observations");
    }

    // Stable, so equal timestamps keep store order.
    history.sort_by_key(|entry| entry.timestamp);
    debug!(email, days_back, count = history.len(), "loaded history window");
    Ok(history)
}

async fn build_full_report<S: HistoryStore>(
    store: &S,
    email: &str,
    days_back: i64,
) -> Result<ProgressReport, ProgressError> {
    let history = load_history(store, email, days_back).await?;

    let latest = match history.as_slice() {
        [] => return Ok(ProgressReport::bare(ReportStatus::NoData, NO_DATA_MESSAGE)),
        [only] => {
            let mut report = ProgressReport::bare(ReportStatus::InsufficientData, INSUFFICIENT_MESSAGE);
            report.insights = Some(INSUFFICIENT_INSIGHT.to_string());
            report.current_analysis = Some(AnalysisSnapshot {
                date: only.timestamp,
                concerns: only.concerns.clone(),
                severity_score: round_to(severity_score(&only.concerns), 2),
            });
            return Ok(report);
        }
        [.., latest] => latest,
    };

    let metrics = calculate_progress_metrics(&history);
    if let MetricsOutcome::InsufficientData = metrics {
        return Err(ProgressError::ComputationFailure(format!(
            "no metrics for a window of {} observations",
            history.len()
        )));
    }

    let insights = generate_progress_insights(&metrics, latest.age, latest.skin_type.as_deref());
    let trend_analysis = analyze_concern_trends(&history);
    if let TrendOutcome::InsufficientData = trend_analysis {
        return Err(ProgressError::ComputationFailure(
            "trend analysis rejected a multi-entry window".to_string(),
        ));
    }

    Ok(ProgressReport {
        status: ReportStatus::Success,
        message: SUCCESS_MESSAGE.to_string(),
        progress_metrics: Some(metrics),
        insights: Some(insights),
        trend_analysis: Some(trend_analysis),
        user_profile: Some(UserProfile {
            age: latest.age,
            skin_type: latest.skin_type.clone(),
        }),
        recommendation: Some(RECOMMENDATION.to_string()),
        current_analysis: None,
    })
}

async fn build_summary<S: HistoryStore>(
    store: &S,
    email: &str,
) -> Result<ProgressSummary, ProgressError> {
    let history = load_history(store, email, SUMMARY_DAYS_BACK).await?;

    let (first, latest) = match history.as_slice() {
        [first, .., latest] => (first, latest),
        short => {
            return Ok(ProgressSummary {
                status: ReportStatus::InsufficientData,
                total_analyses: Some(short.len()),
                improvement_percentage: None,
                improvement_trend: None,
                latest_concerns: Some(
                    short
                        .first()
                        .map(|entry| entry.concerns.clone())
                        .unwrap_or_default(),
                ),
                tracking_days: None,
                message: Some(INSUFFICIENT_MESSAGE.to_string()),
            });
        }
    };

    let improvement = improvement_percentage(
        severity_score(&first.concerns),
        severity_score(&latest.concerns),
    );

    Ok(ProgressSummary {
        status: ReportStatus::Success,
        total_analyses: Some(history.len()),
        improvement_percentage: Some(improvement),
        improvement_trend: Some(summary_trend(improvement)),
        latest_concerns: Some(latest.concerns.clone()),
        tracking_days: Some(tracking_days(first.timestamp, latest.timestamp)),
        message: None,
    })
}

pub fn summary_trend(improvement: f64) -> SummaryTrend {
    if improvement > 0.0 {
        SummaryTrend::Improving
    } else if improvement == 0.0 {
        SummaryTrend::Stable
    } else {
        SummaryTrend::NeedsAttention
    }
}

pub fn render_markdown(email: &str, days_back: i64, report: &ProgressReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Skin Progress Report");
    let _ = writeln!(output, "Generated for {} (last {} days)", email, days_back);
    let _ = writeln!(output);
    let _ = writeln!(output, "{}", report.message);

    if let Some(current) = &report.current_analysis {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Current Analysis");
        let _ = writeln!(output, "- Concerns: {}", join_or_none(&current.concerns));
        let _ = writeln!(output, "- Severity score: {:.2}", current.severity_score);
    }

    if let Some(MetricsOutcome::Success(metrics)) = &report.progress_metrics {
        let changes = &metrics.concern_changes;
        let _ = writeln!(output);
        let _ = writeln!(output, "## Progress");
        let _ = writeln!(
            output,
            "- Improvement: {:.1}% ({})",
            metrics.improvement_percentage,
            metrics.trend.as_str()
        );
        let _ = writeln!(
            output,
            "- Severity: {:.2} -> {:.2} (window average {:.2})",
            metrics.first_analysis.severity_score,
            metrics.latest_analysis.severity_score,
            metrics.average_severity
        );
        let _ = writeln!(
            output,
            "- Tracked {} days across {} analyses",
            metrics.tracking_period.days, metrics.tracking_period.total_analyses
        );
        let _ = writeln!(output, "- Resolved: {}", join_or_none(&changes.resolved));
        let _ = writeln!(output, "- Persistent: {}", join_or_none(&changes.persistent));
        let _ = writeln!(output, "- New: {}", join_or_none(&changes.new));
    }

    if let Some(TrendOutcome::Success(analysis)) = &report.trend_analysis {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Timeline");
        for point in &analysis.timeline {
            let date = point
                .timestamp
                .map(|ts| ts.date_naive().to_string())
                .unwrap_or_else(|| "unknown date".to_string());
            let _ = writeln!(
                output,
                "- {}: score {:.2} ({})",
                date,
                point.score,
                join_or_none(&point.concerns)
            );
        }
    }

    if let Some(insights) = &report.insights {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Insights");
        let _ = writeln!(output, "{}", insights);
    }

    if let Some(recommendation) = &report.recommendation {
        let _ = writeln!(output);
        let _ = writeln!(output, "_{}_", recommendation);
    }

    output
}

fn join_or_none(labels: &[String]) -> String {
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}
