use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub timestamp: Option<DateTime<Utc>>,
    pub concerns: Vec<String>,
    pub age: Option<i32>,
    pub skin_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    ExcellentImprovement,
    GoodImprovement,
    ModerateImprovement,
    MinimalImprovement,
    Stable,
    NeedsAttention,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExcellentImprovement => "excellent_improvement",
            Self::GoodImprovement => "good_improvement",
            Self::ModerateImprovement => "moderate_improvement",
            Self::MinimalImprovement => "minimal_improvement",
            Self::Stable => "stable",
            Self::NeedsAttention => "needs_attention",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryTrend {
    Improving,
    Stable,
    NeedsAttention,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSnapshot {
    pub date: Option<DateTime<Utc>>,
    pub concerns: Vec<String>,
    pub severity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcernChanges {
    pub resolved: Vec<String>,
    pub new: Vec<String>,
    pub persistent: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackingPeriod {
    pub days: i64,
    pub total_analyses: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressMetrics {
    pub improvement_percentage: f64,
    pub first_analysis: AnalysisSnapshot,
    pub latest_analysis: AnalysisSnapshot,
    pub concern_changes: ConcernChanges,
    pub tracking_period: TrackingPeriod,
    pub trend: Trend,
    pub average_severity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricsOutcome {
    Success(ProgressMetrics),
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub concerns: Vec<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub timeline: Vec<TimelinePoint>,
    /// Raw concern label to the timestamps it was observed at, oldest first.
    pub concern_frequency: BTreeMap<String, Vec<Option<DateTime<Utc>>>>,
    pub total_analyses: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendOutcome {
    Success(TrendAnalysis),
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub age: Option<i32>,
    pub skin_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Success,
    NoData,
    InsufficientData,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub status: ReportStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_metrics: Option<MetricsOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_analysis: Option<TrendOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_analysis: Option<AnalysisSnapshot>,
}

impl ProgressReport {
    pub fn bare(status: ReportStatus, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            progress_metrics: None,
            insights: None,
            trend_analysis: None,
            user_profile: None,
            recommendation: None,
            current_analysis: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_analyses: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_trend: Option<SummaryTrend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_concerns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
