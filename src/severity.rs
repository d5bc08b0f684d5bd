pub const DEFAULT_WEIGHT: u8 = 2;

/// Normalized concern key to severity weight, higher is more severe.
pub const SEVERITY_WEIGHTS: &[(&str, u8)] = &[
    ("acne", 5),
    ("severe_acne", 8),
    ("cystic_acne", 7),
    ("blackheads", 4),
    ("whiteheads", 4),
    ("blemishes", 3),
    ("dark_spots", 4),
    ("pigmentation", 4),
    ("melasma", 5),
    ("uneven_skin_tone", 3),
    ("scars", 4),
    ("sun_damage", 4),
    ("dryness", 2),
    ("dull_skin", 2),
    ("large_pores", 2),
    ("fine_lines", 3),
    ("wrinkles", 4),
    ("general_care", 1),
    ("oiliness", 2),
];

pub fn normalize_concern(label: &str) -> String {
    let lowered = label.to_lowercase();
    let trimmed = lowered.trim().trim_end_matches(',').trim_end();
    trimmed.split_whitespace().collect::<Vec<_>>().join("_")
}

pub fn concern_weight(label: &str) -> u8 {
    let key = normalize_concern(label);
    SEVERITY_WEIGHTS
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_WEIGHT)
}

/// Mean weight over the distinct labels in `concerns`; 0.0 when empty.
pub fn severity_score<S: AsRef<str>>(concerns: &[S]) -> f64 {
    let labels = distinct(concerns);
    if labels.is_empty() {
        return 0.0;
    }

    let total: u32 = labels.iter().map(|label| u32::from(concern_weight(label))).sum();
    f64::from(total) / labels.len() as f64
}

pub fn distinct<S: AsRef<str>>(concerns: &[S]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(concerns.len());
    for concern in concerns {
        let label = concern.as_ref();
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_scores_zero() {
        let empty: [&str; 0] = [];
        assert_eq!(severity_score(&empty), 0.0);
    }

    #[test]
    fn known_weights_are_averaged() {
        assert_eq!(severity_score(&["acne"]), 5.0);
        assert_eq!(severity_score(&["dryness", "oiliness"]), 2.0);
        assert_eq!(severity_score(&["acne", "dryness"]), 3.5);
    }

    #[test]
    fn score_ignores_label_order() {
        let forward = ["acne", "dark spots", "wrinkles", "mystery"];
        let backward = ["mystery", "wrinkles", "dark spots", "acne"];
        assert_eq!(severity_score(&forward), severity_score(&backward));
    }

    #[test]
    fn duplicate_labels_count_once() {
        assert_eq!(severity_score(&["acne", "acne", "dryness"]), 3.5);
    }

    #[test]
    fn labels_are_normalized_before_lookup() {
        assert_eq!(normalize_concern("  Dark   Spots, "), "dark_spots");
        assert_eq!(concern_weight("Severe Acne"), 8);
        assert_eq!(concern_weight("CYSTIC_ACNE,"), 7);
    }

    #[test]
    fn unknown_labels_use_default_weight() {
        assert_eq!(concern_weight("redness"), DEFAULT_WEIGHT);
        assert_eq!(severity_score(&["redness", "acne"]), 3.5);
    }

    #[test]
    fn weights_stay_within_scale() {
        assert!(SEVERITY_WEIGHTS
            .iter()
            .all(|(_, weight)| (1..=8).contains(weight)));
    }

    #[test]
    fn rounding_matches_reported_precision() {
        assert_eq!(round_to(42.857_142, 1), 42.9);
        assert_eq!(round_to(3.333_333, 2), 3.33);
    }
}
