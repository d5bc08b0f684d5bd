use std::collections::BTreeMap;

use crate::models::{Observation, TimelinePoint, TrendAnalysis, TrendOutcome};
use crate::severity::{distinct, severity_score};

/// Projects the history into a scored timeline and a per-concern sighting map.
pub fn analyze_concern_trends(history: &[Observation]) -> TrendOutcome {
    if history.len() < 2 {
        return TrendOutcome::InsufficientData;
    }

    let mut timeline = Vec::with_capacity(history.len());
    let mut concern_frequency: BTreeMap<String, Vec<_>> = BTreeMap::new();

    for entry in history {
        timeline.push(TimelinePoint {
            timestamp: entry.timestamp,
            concerns: entry.concerns.clone(),
            score: severity_score(&entry.concerns),
        });

        for concern in distinct(&entry.concerns) {
            concern_frequency
                .entry(concern.to_string())
                .or_default()
                .push(entry.timestamp);
        }
    }

    TrendOutcome::Success(TrendAnalysis {
        timeline,
        concern_frequency,
        total_analyses: history.len(),
    })
}
