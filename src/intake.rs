use chrono::{DateTime, TimeZone, Utc};
use sqlx::PgPool;

use crate::db;
use crate::error::AppError;
use crate::models::{CampaignStats, Signature};

pub const SIGNATURE_GOAL: i64 = 120_000;

pub fn filing_deadline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2027, 7, 6, 0, 0, 0)
        .single()
        .expect("filing deadline is a valid timestamp")
}

// Mirrors the dashboard's submission pattern: no whitespace, a single '@'
// with a non-empty local part, and a domain containing an interior dot.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn validate_submission(name: &str, email: &str) -> Result<(String, String), AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if !is_valid_email(email) {
        return Err(AppError::Validation(
            "Please provide a valid email address".to_string(),
        ));
    }

    Ok((name.to_string(), email.to_string()))
}

// Uniqueness is enforced by the schema's unique index over the lower-cased
// email; the losing side of a racing submission gets the constraint
// violation, reported here as a duplicate.
pub async fn submit_signature(
    pool: &PgPool,
    name: &str,
    email: &str,
) -> Result<Signature, AppError> {
    let (name, email) = validate_submission(name, email)?;

    match db::insert_signature(pool, &name, &email).await {
        Ok(signature) => Ok(signature),
        Err(err) if is_unique_violation(&err) => Err(AppError::DuplicateSignature),
        Err(err) => Err(err.into()),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub async fn campaign_stats(pool: &PgPool, now: DateTime<Utc>) -> Result<CampaignStats, AppError> {
    let total_signatures = db::count_signatures(pool).await?;
    let unique_voters = db::count_unique_voters(pool).await?;
    let active_proposals = db::fetch_proposals(pool).await?;
    let deadline = filing_deadline();

    Ok(CampaignStats {
        total_signatures,
        unique_voters,
        signature_goal: SIGNATURE_GOAL,
        goal_percentage: goal_percentage(total_signatures),
        days_remaining: days_remaining(deadline, now),
        filing_deadline: deadline,
        active_proposals,
    })
}

pub fn goal_percentage(total_signatures: i64) -> f64 {
    total_signatures as f64 / SIGNATURE_GOAL as f64 * 100.0
}

// Signed: goes negative once the filing deadline has passed.
pub fn days_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (deadline - now).num_seconds();
    (seconds as f64 / 86_400.0).ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(is_valid_email("VOTER@EXAMPLE.COM"));
        assert!(is_valid_email("a@b.c"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@dot"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("leading@.com"));
        assert!(!is_valid_email("trailing@com."));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaced name@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn validation_trims_and_requires_both_fields() {
        let (name, email) = validate_submission("  Ada Marsh  ", "ada@example.com").unwrap();
        assert_eq!(name, "Ada Marsh");
        assert_eq!(email, "ada@example.com");

        assert!(matches!(
            validate_submission("   ", "ada@example.com"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_submission("Ada Marsh", ""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_submission("Ada Marsh", "not-an-email"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn goal_percentage_is_unclamped() {
        assert_eq!(goal_percentage(0), 0.0);
        assert_eq!(goal_percentage(120_000), 100.0);
        assert_eq!(goal_percentage(240_000), 200.0);
    }

    #[test]
    fn days_remaining_rounds_up_partial_days() {
        let deadline = Utc.with_ymd_and_hms(2027, 7, 6, 0, 0, 0).unwrap();

        let two_days_out = Utc.with_ymd_and_hms(2027, 7, 4, 0, 0, 0).unwrap();
        assert_eq!(days_remaining(deadline, two_days_out), 2);

        let day_and_a_half_out = Utc.with_ymd_and_hms(2027, 7, 4, 12, 0, 0).unwrap();
        assert_eq!(days_remaining(deadline, day_and_a_half_out), 2);
    }

    #[test]
    fn days_remaining_goes_negative_after_deadline() {
        let deadline = Utc.with_ymd_and_hms(2027, 7, 6, 0, 0, 0).unwrap();

        let day_and_a_half_past = Utc.with_ymd_and_hms(2027, 7, 7, 12, 0, 0).unwrap();
        assert_eq!(days_remaining(deadline, day_and_a_half_past), -1);

        let ten_days_past = Utc.with_ymd_and_hms(2027, 7, 16, 0, 0, 0).unwrap();
        assert_eq!(days_remaining(deadline, ten_days_past), -10);
    }
}
