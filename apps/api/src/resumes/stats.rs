//! Summary numbers and the dashboard activity timeline, computed over the
//! engagement rows of one owner's documents.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{EngagementRow, ResumeStatus};
use crate::store::ResumeStore;

pub const DASHBOARD_ACTIVITY_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResumeStats {
    pub total_resumes: i64,
    pub total_views: i64,
    pub total_downloads: i64,
    pub active_resumes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub resumes_updated: i64,
}

/// Zeroed stats for an owner with no documents.
pub fn compute_stats(rows: &[EngagementRow]) -> ResumeStats {
    rows.iter().fold(ResumeStats::default(), |mut stats, row| {
        stats.total_resumes += 1;
        stats.total_views += row.views;
        stats.total_downloads += row.downloads;
        if row.status == ResumeStatus::Active {
            stats.active_resumes += 1;
        }
        stats
    })
}

/// Documents updated within the trailing `window_days`, counted per UTC
/// calendar date, oldest date first.
pub fn recent_activity(
    rows: &[EngagementRow],
    now: DateTime<Utc>,
    window_days: i64,
) -> Vec<ActivityDay> {
    if window_days <= 0 {
        return Vec::new();
    }
    let since = now - Duration::days(window_days);

    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.updated_at >= since) {
        *per_day.entry(row.updated_at.date_naive()).or_default() += 1;
    }

    per_day
        .into_iter()
        .map(|(date, resumes_updated)| ActivityDay {
            date,
            resumes_updated,
        })
        .collect()
}

pub async fn stats_for(store: &dyn ResumeStore, owner: Uuid) -> Result<ResumeStats, AppError> {
    Ok(compute_stats(&store.engagement(owner).await?))
}

pub async fn activity_for(
    store: &dyn ResumeStore,
    owner: Uuid,
    window_days: i64,
) -> Result<Vec<ActivityDay>, AppError> {
    let rows = store.engagement(owner).await?;
    Ok(recent_activity(&rows, Utc::now(), window_days))
}
