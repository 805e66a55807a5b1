use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub quorum_required: i64,
    pub votes_for: i64,
    pub votes_against: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub total_signatures: i64,
    pub unique_voters: i64,
    pub signature_goal: i64,
    pub goal_percentage: f64,
    pub days_remaining: i64,
    pub filing_deadline: DateTime<Utc>,
    pub active_proposals: Vec<Proposal>,
}

// Fields are optional so a missing name or email surfaces as intake
// validation feedback rather than a body deserialization rejection.
// Unknown extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct SignatureRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WeeklyCount {
    pub week_start: NaiveDate,
    pub signatures: i64,
}
