use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::warn;
use uuid::Uuid;

use crate::intake;
use crate::models::{Proposal, Signature, WeeklyCount};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

// One-time startup seed for the ballot measure slate, gated by an explicit
// emptiness check so restarts never duplicate reference data.
pub async fn seed_if_empty(pool: &PgPool) -> anyhow::Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM gaia_commons.proposals")
        .fetch_one(pool)
        .await?;
    let existing: i64 = row.get("total");
    if existing > 0 {
        return Ok(false);
    }

    let proposals = vec![
        (
            Uuid::parse_str("7b1c3d58-52d4-4f0e-9a41-8c3c2f1d6e90")?,
            "Measure GC-1: Charter the Gaia Commons Council",
            "Establishes the council as steward of the commons endowment and \
             sets its reporting obligations.",
            60_000i64,
            48_210i64,
            12_455i64,
        ),
        (
            Uuid::parse_str("2f8e9a14-6b7d-4c25-b3d0-5a91e47c8f13")?,
            "Measure GC-2: School Greenhouse Construction Bond",
            "Authorizes bond funding for greenhouse construction at every \
             participating public school.",
            60_000i64,
            51_876i64,
            9_034i64,
        ),
        (
            Uuid::parse_str("c4d51b72-0e39-4a86-9f27-d16b3a84e5c2")?,
            "Measure GC-3: Endowment Draw Rate Cap",
            "Caps the annual endowment draw so the corpus outlasts the \
             fifty-year projection horizon.",
            45_000i64,
            39_402i64,
            15_210i64,
        ),
    ];

    for (id, title, description, quorum_required, votes_for, votes_against) in proposals {
        sqlx::query(
            r#"
            INSERT INTO gaia_commons.proposals
            (id, title, description, quorum_required, votes_for, votes_against)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(quorum_required)
        .bind(votes_for)
        .bind(votes_against)
        .execute(pool)
        .await?;
    }

    Ok(true)
}

// Returns the raw sqlx error; the intake layer inspects it for the unique
// violation that signals a duplicate email.
pub async fn insert_signature(
    pool: &PgPool,
    name: &str,
    email: &str,
) -> Result<Signature, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO gaia_commons.signatures (id, name, email, submitted_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, submitted_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(Signature {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        submitted_at: row.get("submitted_at"),
    })
}

pub async fn count_signatures(pool: &PgPool) -> anyhow::Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM gaia_commons.signatures")
        .fetch_one(pool)
        .await?;
    Ok(row.get("total"))
}

pub async fn count_unique_voters(pool: &PgPool) -> anyhow::Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(DISTINCT lower(email)) AS total FROM gaia_commons.signatures",
    )
    .fetch_one(pool)
    .await?;
    Ok(row.get("total"))
}

pub async fn fetch_proposals(pool: &PgPool) -> anyhow::Result<Vec<Proposal>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, description, quorum_required, votes_for, votes_against
        FROM gaia_commons.proposals
        ORDER BY title
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut proposals = Vec::new();
    for row in rows {
        proposals.push(Proposal {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            quorum_required: row.get("quorum_required"),
            votes_for: row.get("votes_for"),
            votes_against: row.get("votes_against"),
        });
    }

    Ok(proposals)
}

pub async fn fetch_recent_signatures(
    pool: &PgPool,
    limit: i64,
) -> anyhow::Result<Vec<Signature>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, email, submitted_at
        FROM gaia_commons.signatures
        ORDER BY submitted_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut signatures = Vec::new();
    for row in rows {
        signatures.push(Signature {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            submitted_at: row.get("submitted_at"),
        });
    }

    Ok(signatures)
}

pub async fn fetch_weekly_counts(pool: &PgPool, weeks: i32) -> anyhow::Result<Vec<WeeklyCount>> {
    let rows = sqlx::query(
        r#"
        SELECT date_trunc('week', submitted_at)::date AS week_start,
               COUNT(*) AS signatures
        FROM gaia_commons.signatures
        WHERE submitted_at >= now() - make_interval(weeks => $1)
        GROUP BY week_start
        ORDER BY week_start
        "#,
    )
    .bind(weeks)
    .fetch_all(pool)
    .await?;

    let mut trends = Vec::new();
    for row in rows {
        trends.push(WeeklyCount {
            week_start: row.get("week_start"),
            signatures: row.get("signatures"),
        });
    }

    Ok(trends)
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

pub async fn import_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
) -> anyhow::Result<ImportSummary> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        name: String,
        email: String,
        submitted_at: Option<DateTime<Utc>>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut summary = ImportSummary::default();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;

        let (name, email) = match intake::validate_submission(&row.name, &row.email) {
            Ok(fields) => fields,
            Err(err) => {
                warn!("skipping row for {:?}: {err}", row.email);
                summary.invalid += 1;
                continue;
            }
        };

        let outcome = sqlx::query(
            r#"
            INSERT INTO gaia_commons.signatures (id, name, email, submitted_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (lower(email)) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&name)
        .bind(&email)
        .bind(row.submitted_at.unwrap_or_else(Utc::now))
        .execute(pool)
        .await?;

        if outcome.rows_affected() > 0 {
            summary.inserted += 1;
        } else {
            summary.duplicates += 1;
        }
    }

    Ok(summary)
}
