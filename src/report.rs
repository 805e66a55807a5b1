use std::fmt::Write;

use crate::models::{CampaignStats, Signature, WeeklyCount};

pub fn build_report(
    stats: &CampaignStats,
    trends: &[WeeklyCount],
    recent: &[Signature],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Gaia Commons Council Petition Report");
    let _ = writeln!(
        output,
        "{} of {} signatures collected ({:.1}% of goal)",
        stats.total_signatures, stats.signature_goal, stats.goal_percentage
    );
    if stats.days_remaining >= 0 {
        let _ = writeln!(
            output,
            "{} days until the filing deadline ({})",
            stats.days_remaining,
            stats.filing_deadline.date_naive()
        );
    } else {
        let _ = writeln!(
            output,
            "Filing deadline ({}) passed {} days ago",
            stats.filing_deadline.date_naive(),
            -stats.days_remaining
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Momentum");

    if trends.is_empty() {
        let _ = writeln!(output, "No signatures recorded in this window.");
    } else {
        for week in trends.iter() {
            let _ = writeln!(
                output,
                "- week of {}: {} signatures",
                week.week_start, week.signatures
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Ballot Measures");

    if stats.active_proposals.is_empty() {
        let _ = writeln!(output, "No ballot measures seeded.");
    } else {
        for proposal in stats.active_proposals.iter() {
            let _ = writeln!(
                output,
                "- {}: {} for / {} against (quorum {})",
                proposal.title, proposal.votes_for, proposal.votes_against,
                proposal.quorum_required
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Signatures");

    if recent.is_empty() {
        let _ = writeln!(output, "No signatures recorded yet.");
    } else {
        for signature in recent.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} ({}) on {}",
                signature.name,
                signature.email,
                signature.submitted_at.date_naive()
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn empty_stats() -> CampaignStats {
        CampaignStats {
            total_signatures: 0,
            unique_voters: 0,
            signature_goal: 120_000,
            goal_percentage: 0.0,
            days_remaining: 334,
            filing_deadline: Utc.with_ymd_and_hms(2027, 7, 6, 0, 0, 0).unwrap(),
            active_proposals: Vec::new(),
        }
    }

    #[test]
    fn empty_store_renders_fallback_lines() {
        let report = build_report(&empty_stats(), &[], &[]);

        assert!(report.contains("0 of 120000 signatures collected (0.0% of goal)"));
        assert!(report.contains("No signatures recorded in this window."));
        assert!(report.contains("No ballot measures seeded."));
        assert!(report.contains("No signatures recorded yet."));
    }

    #[test]
    fn passed_deadline_is_reported_in_days_ago() {
        let mut stats = empty_stats();
        stats.days_remaining = -12;

        let report = build_report(&stats, &[], &[]);
        assert!(report.contains("passed 12 days ago"));
    }

    #[test]
    fn sections_list_measures_and_signatures() {
        let mut stats = empty_stats();
        stats.total_signatures = 2;
        stats.active_proposals.push(crate::models::Proposal {
            id: Uuid::new_v4(),
            title: "Measure GC-1".to_string(),
            description: "Charter the council".to_string(),
            quorum_required: 60_000,
            votes_for: 48_210,
            votes_against: 12_455,
        });

        let recent = vec![Signature {
            id: Uuid::new_v4(),
            name: "Ada Marsh".to_string(),
            email: "ada@example.com".to_string(),
            submitted_at: Utc.with_ymd_and_hms(2026, 8, 1, 9, 30, 0).unwrap(),
        }];

        let report = build_report(&stats, &[], &recent);
        assert!(report.contains("- Measure GC-1: 48210 for / 12455 against (quorum 60000)"));
        assert!(report.contains("- Ada Marsh (ada@example.com) on 2026-08-01"));
    }
}
