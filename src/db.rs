use std::future::Future;

use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::Observation;

pub const SKIN_TYPES: &[&str] = &["oily", "dry", "combination", "normal", "sensitive", "all"];

/// Read side of the per-user observation log.
pub trait HistoryStore {
    /// Observations recorded between `since` and now, oldest first.
    fn fetch_history(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> impl Future<Output = anyhow::Result<Vec<Observation>>> + Send;
}

pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl HistoryStore for PgHistoryStore {
    async fn fetch_history(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Observation>> {
        let rows = sqlx::query(
            "SELECT concerns, age, skin_type, recorded_at \
             FROM skin_progress.observations \
             WHERE email = $1 AND recorded_at >= $2 AND recorded_at <= now() \
             ORDER BY recorded_at ASC",
        )
        .bind(email)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("failed to fetch history for {email}"))?;

        debug!(email, count = rows.len(), "fetched observation history");
        Ok(rows.iter().map(observation_from_row).collect())
    }
}

fn observation_from_row(row: &PgRow) -> Observation {
    Observation {
        timestamp: row.get("recorded_at"),
        concerns: row.get("concerns"),
        age: row.get("age"),
        skin_type: row.get("skin_type"),
    }
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Every stored observation for a user, oldest first.
pub async fn list_history(pool: &PgPool, email: &str) -> anyhow::Result<Vec<Observation>> {
    let rows = sqlx::query(
        "SELECT concerns, age, skin_type, recorded_at \
         FROM skin_progress.observations \
         WHERE email = $1 \
         ORDER BY recorded_at ASC NULLS FIRST",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(observation_from_row).collect())
}

/// Checks the optional profile fields and returns the lowercased skin type.
pub fn validate_profile(age: Option<i32>, skin_type: Option<&str>) -> anyhow::Result<Option<String>> {
    if let Some(age) = age {
        if !(13..=100).contains(&age) {
            bail!("age must be between 13 and 100, got {age}");
        }
    }

    match skin_type {
        None => Ok(None),
        Some(value) => {
            let lowered = value.trim().to_lowercase();
            if !SKIN_TYPES.contains(&lowered.as_str()) {
                bail!(
                    "invalid skin type {value:?}, must be one of: {}",
                    SKIN_TYPES.join(", ")
                );
            }
            Ok(Some(lowered))
        }
    }
}

pub fn validate_recorded_at(recorded_at: DateTime<Utc>, now: DateTime<Utc>) -> anyhow::Result<()> {
    if recorded_at > now {
        bail!("observation timestamp {recorded_at} is in the future");
    }
    Ok(())
}

pub async fn record_observation(
    pool: &PgPool,
    email: &str,
    concerns: &[String],
    age: Option<i32>,
    skin_type: Option<&str>,
    recorded_at: DateTime<Utc>,
) -> anyhow::Result<Uuid> {
    validate_recorded_at(recorded_at, Utc::now())?;
    let skin_type = validate_profile(age, skin_type)?;
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO skin_progress.observations
        (id, email, concerns, age, skin_type, recorded_at, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(concerns)
    .bind(age)
    .bind(skin_type)
    .bind(recorded_at)
    .bind(format!("record-{id}"))
    .execute(pool)
    .await
    .context("failed to record observation")?;

    info!(email, %id, concerns = concerns.len(), "recorded observation");
    Ok(id)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let now = Utc::now();
    let observations = vec![
        ("seed-001", "maya.chen@example.com", vec!["acne", "blackheads", "dryness"], 84, Some(22), Some("oily")),
        ("seed-002", "maya.chen@example.com", vec!["acne", "dryness"], 56, Some(22), Some("oily")),
        ("seed-003", "maya.chen@example.com", vec!["dryness", "large pores"], 21, Some(22), Some("oily")),
        ("seed-004", "maya.chen@example.com", vec!["dryness"], 3, Some(22), Some("oily")),
        ("seed-005", "jon.okafor@example.com", vec!["fine lines", "dark spots"], 40, Some(41), Some("sensitive")),
        ("seed-006", "jon.okafor@example.com", vec!["fine lines", "dark spots", "wrinkles"], 9, Some(41), Some("sensitive")),
        ("seed-007", "lena.park@example.com", vec!["dull skin"], 12, None, Some("normal")),
    ];

    for (source_key, email, concerns, days_ago, age, skin_type) in observations {
        let concerns: Vec<String> = concerns.into_iter().map(str::to_string).collect();
        sqlx::query(
            r#"
            INSERT INTO skin_progress.observations
            (id, email, concerns, age, skin_type, recorded_at, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(&concerns)
        .bind(age)
        .bind(skin_type)
        .bind(now - Duration::days(days_ago))
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Splits a `;`-separated concern cell into labels, dropping blanks.
pub fn parse_concerns(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        email: String,
        recorded_at: DateTime<Utc>,
        concerns: String,
        age: Option<i32>,
        skin_type: Option<String>,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid CSV record {}", line + 1))?;
        validate_recorded_at(row.recorded_at, Utc::now())
            .with_context(|| format!("invalid CSV record {}", line + 1))?;
        let skin_type = validate_profile(row.age, row.skin_type.as_deref())
            .with_context(|| format!("invalid CSV record {}", line + 1))?;
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO skin_progress.observations
            (id, email, concerns, age, skin_type, recorded_at, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.email)
        .bind(parse_concerns(&row.concerns))
        .bind(row.age)
        .bind(skin_type)
        .bind(row.recorded_at)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_accepts_known_skin_types() {
        assert_eq!(
            validate_profile(Some(30), Some(" Oily ")).unwrap(),
            Some("oily".to_string())
        );
        assert_eq!(validate_profile(None, None).unwrap(), None);
    }

    #[test]
    fn profile_rejects_out_of_range_age() {
        assert!(validate_profile(Some(12), None).is_err());
        assert!(validate_profile(Some(101), Some("dry")).is_err());
        assert!(validate_profile(Some(13), None).is_ok());
        assert!(validate_profile(Some(100), None).is_ok());
    }

    #[test]
    fn profile_rejects_unknown_skin_type() {
        let err = validate_profile(None, Some("scaly")).unwrap_err();
        assert!(err.to_string().contains("invalid skin type"));
    }

    #[test]
    fn future_timestamps_are_rejected() {
        let now = Utc::now();
        assert!(validate_recorded_at(now, now).is_ok());
        assert!(validate_recorded_at(now - Duration::days(3), now).is_ok());
        let err = validate_recorded_at(now + Duration::minutes(1), now).unwrap_err();
        assert!(err.to_string().contains("in the future"));
    }

    #[test]
    fn concern_cells_split_on_semicolons() {
        assert_eq!(
            parse_concerns("acne; dark spots;;  dryness "),
            vec!["acne".to_string(), "dark spots".to_string(), "dryness".to_string()]
        );
        assert!(parse_concerns("  ").is_empty());
    }
}
