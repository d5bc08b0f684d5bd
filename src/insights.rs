use crate::models::{MetricsOutcome, Trend};

pub const KEEP_TRACKING_MESSAGE: &str = "Insufficient data to generate progress insights. \
     Please continue using the app to track your skincare journey.";

/// Main-assessment template families, one per trend bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightCategory {
    ExcellentProgress,
    GoodProgress,
    ModerateProgress,
    MinimalProgress,
    NoProgress,
    ConcernIncrease,
}

impl InsightCategory {
    pub fn for_trend(trend: Trend) -> Self {
        match trend {
            Trend::ExcellentImprovement => Self::ExcellentProgress,
            Trend::GoodImprovement => Self::GoodProgress,
            Trend::ModerateImprovement => Self::ModerateProgress,
            Trend::MinimalImprovement => Self::MinimalProgress,
            Trend::Stable => Self::NoProgress,
            Trend::NeedsAttention => Self::ConcernIncrease,
        }
    }

    pub fn templates(self) -> &'static [&'static str; 3] {
        match self {
            Self::ExcellentProgress => &[
                "Fantastic progress! Your skin is showing remarkable improvement.",
                "Outstanding results! Keep up the excellent skincare routine.",
                "Amazing transformation! Your dedication is paying off beautifully.",
            ],
            Self::GoodProgress => &[
                "Great job! Your skin is definitely improving.",
                "Solid progress! You're on the right track.",
                "Nice improvement! Your skincare routine is working well.",
            ],
            Self::ModerateProgress => &[
                "You're making steady progress. Consistency is key!",
                "Some positive changes are visible. Keep being patient.",
                "Progress is happening gradually. Stay consistent with your routine.",
            ],
            Self::MinimalProgress => &[
                "Small improvements are happening. Skincare takes time.",
                "Minor positive changes detected. Stay patient and consistent.",
                "Early signs of improvement. Give your routine more time to work.",
            ],
            Self::NoProgress => &[
                "Your skin appears stable. Consider adjusting your routine.",
                "No significant changes yet. You might need to modify your approach.",
                "Skin condition is maintaining. Consider consulting for routine updates.",
            ],
            Self::ConcernIncrease => &[
                "Some new concerns have appeared. This might be temporary.",
                "Slight increase in concerns detected. Consider reviewing your routine.",
                "New skin issues noticed. It might be time to reassess your skincare.",
            ],
        }
    }

    /// Selection is always the first template so output stays reproducible.
    pub fn headline(self) -> &'static str {
        self.templates()[0]
    }
}

pub fn generate_progress_insights(
    outcome: &MetricsOutcome,
    age: Option<i32>,
    skin_type: Option<&str>,
) -> String {
    let metrics = match outcome {
        MetricsOutcome::Success(metrics) => metrics,
        MetricsOutcome::InsufficientData => return KEEP_TRACKING_MESSAGE.to_string(),
    };

    let mut insights: Vec<String> = Vec::new();
    insights.push(InsightCategory::for_trend(metrics.trend).headline().to_string());

    let changes = &metrics.concern_changes;
    if !changes.resolved.is_empty() {
        insights.push(format!(
            "Great news! You've successfully addressed: {}.",
            changes.resolved.join(", ")
        ));
    }
    if !changes.persistent.is_empty() {
        insights.push(format!(
            "Areas still being worked on: {}. Keep maintaining your routine!",
            changes.persistent.join(", ")
        ));
    }
    if !changes.new.is_empty() {
        insights.push(format!(
            "New concerns detected: {}. Consider adjusting your routine or consulting a dermatologist.",
            changes.new.join(", ")
        ));
    }

    insights.push(tracking_commentary(metrics.tracking_period.days));

    if let (Some(age), Some(skin_type)) = (age, skin_type) {
        insights.extend(profile_tips(age, skin_type).into_iter().map(str::to_string));
    }

    if metrics.improvement_percentage < 5.0 {
        insights.push("Consider reviewing your routine - it might be time for adjustments.".to_string());
    } else {
        insights.push("Your current routine is working well. Stay consistent!".to_string());
    }

    insights.join(" ")
}

fn tracking_commentary(days: i64) -> String {
    if days > 60 {
        format!("You've been consistently tracking for {days} days - excellent commitment!")
    } else if days > 30 {
        format!("{days} days of tracking shows good consistency. Keep it up!")
    } else {
        format!("Early tracking stage ({days} days). Continue for better trend analysis.")
    }
}

/// Each rule is checked on its own, so several tips can apply.
fn profile_tips(age: i32, skin_type: &str) -> Vec<&'static str> {
    let mut tips = Vec::new();
    if age < 25 && skin_type == "oily" {
        tips.push("For young oily skin, focus on gentle cleansing and oil control products.");
    }
    if age > 35 {
        tips.push("At your age, incorporating anti-aging ingredients can be beneficial.");
    }
    if skin_type == "sensitive" {
        tips.push("For sensitive skin, always patch test new products and maintain a gentle routine.");
    }
    tips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisSnapshot, ConcernChanges, ProgressMetrics, TrackingPeriod};
    use crate::progress::classify_trend;

    fn metrics(improvement: f64, days: i64, changes: ConcernChanges) -> MetricsOutcome {
        let snapshot = AnalysisSnapshot {
            date: None,
            concerns: Vec::new(),
            severity_score: 0.0,
        };
        MetricsOutcome::Success(ProgressMetrics {
            improvement_percentage: improvement,
            first_analysis: snapshot.clone(),
            latest_analysis: snapshot,
            concern_changes: changes,
            tracking_period: TrackingPeriod {
                days,
                total_analyses: 2,
            },
            trend: classify_trend(improvement),
            average_severity: 0.0,
        })
    }

    fn no_changes() -> ConcernChanges {
        ConcernChanges {
            resolved: Vec::new(),
            new: Vec::new(),
            persistent: Vec::new(),
        }
    }

    #[test]
    fn insufficient_metrics_get_fixed_message() {
        let text = generate_progress_insights(&MetricsOutcome::InsufficientData, Some(40), Some("dry"));
        assert_eq!(text, KEEP_TRACKING_MESSAGE);
    }

    #[test]
    fn sections_follow_fixed_order() {
        let changes = ConcernChanges {
            resolved: vec!["acne".to_string()],
            new: vec!["scars".to_string()],
            persistent: vec!["dryness".to_string()],
        };
        let text = generate_progress_insights(&metrics(42.9, 10, changes), None, None);

        let headline = text.find("Fantastic progress!").unwrap();
        let resolved = text.find("addressed: acne.").unwrap();
        let persistent = text.find("worked on: dryness.").unwrap();
        let new = text.find("New concerns detected: scars.").unwrap();
        let tracking = text.find("Early tracking stage (10 days)").unwrap();
        let closing = text.find("Stay consistent!").unwrap();
        assert!(headline < resolved && resolved < persistent && persistent < new);
        assert!(new < tracking && tracking < closing);
    }

    #[test]
    fn headline_follows_trend_bucket() {
        let cases = [
            (25.0, "Fantastic progress!"),
            (15.0, "Great job!"),
            (7.5, "You're making steady progress."),
            (2.0, "Small improvements are happening."),
            (0.0, "Your skin appears stable."),
            (-12.0, "Some new concerns have appeared."),
        ];
        for (improvement, expected) in cases {
            let text = generate_progress_insights(&metrics(improvement, 3, no_changes()), None, None);
            assert!(text.starts_with(expected), "{improvement}: {text}");
        }
    }

    #[test]
    fn tracking_commentary_tiers() {
        assert!(tracking_commentary(61).contains("excellent commitment"));
        assert!(tracking_commentary(60).contains("good consistency"));
        assert!(tracking_commentary(31).contains("good consistency"));
        assert!(tracking_commentary(30).contains("Early tracking stage"));
    }

    #[test]
    fn profile_tips_need_age_and_skin_type() {
        let outcome = metrics(12.0, 40, no_changes());
        let without_type = generate_progress_insights(&outcome, Some(40), None);
        assert!(!without_type.contains("anti-aging"));

        let with_both = generate_progress_insights(&outcome, Some(40), Some("sensitive"));
        assert!(with_both.contains("anti-aging"));
        assert!(with_both.contains("patch test"));
    }

    #[test]
    fn profile_rules_fire_independently() {
        assert_eq!(profile_tips(22, "oily").len(), 1);
        assert_eq!(profile_tips(22, "sensitive").len(), 1);
        assert_eq!(profile_tips(45, "sensitive").len(), 2);
        assert!(profile_tips(30, "normal").is_empty());
    }

    #[test]
    fn closing_depends_on_improvement() {
        let low = generate_progress_insights(&metrics(4.9, 5, no_changes()), None, None);
        assert!(low.ends_with("it might be time for adjustments."));
        let high = generate_progress_insights(&metrics(5.0, 5, no_changes()), None, None);
        assert!(high.ends_with("Stay consistent!"));
    }

    #[test]
    fn generation_is_deterministic() {
        let outcome = metrics(-8.0, 45, no_changes());
        assert_eq!(
            generate_progress_insights(&outcome, Some(23), Some("oily")),
            generate_progress_insights(&outcome, Some(23), Some("oily"))
        );
    }
}
