//! Trend aggregation over the current story set.
//!
//! # Responsibility
//! - Count stories per status.
//! - Sum allotted hours per assignee.
//! - Project stories onto a timeline.
//!
//! # Invariants
//! - Pure functions of the input slice; no storage access.
//! - An empty input yields `Trends::NoData`, never an empty or zero series.

use crate::model::story::{Story, StoryId, StoryStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of stories holding one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: StoryStatus,
    pub count: u64,
}

/// Total allotted hours for one assignee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssigneeHours {
    pub assignee: String,
    pub hours: u64,
    /// Share of all allotted hours, in `0.0..=1.0`.
    pub share: f64,
}

/// One bar of the timeline chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub id: StoryId,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: StoryStatus,
}

/// Aggregated series for a non-empty story set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub total_stories: usize,
    pub status_counts: Vec<StatusCount>,
    pub time_by_assignee: Vec<AssigneeHours>,
    pub timeline: Vec<TimelineEntry>,
}

/// Aggregation result; `NoData` means there is nothing to chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trends {
    NoData,
    Report(TrendReport),
}

/// Builds every trend series, or `NoData` for an empty board.
pub fn build_trends(stories: &[Story]) -> Trends {
    if stories.is_empty() {
        return Trends::NoData;
    }

    Trends::Report(TrendReport {
        total_stories: stories.len(),
        status_counts: status_counts(stories),
        time_by_assignee: time_by_assignee(stories),
        timeline: timeline(stories),
    })
}

/// Counts per status present, largest first; ties keep board column order.
///
/// Statuses with no stories are omitted.
pub fn status_counts(stories: &[Story]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<StoryStatus, u64> = BTreeMap::new();
    for story in stories {
        *counts.entry(story.status).or_default() += 1;
    }

    let mut series: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();
    series.sort_by(|a, b| b.count.cmp(&a.count).then(a.status.cmp(&b.status)));
    series
}

/// Sums hours per assignee, ordered by assignee name.
pub fn time_by_assignee(stories: &[Story]) -> Vec<AssigneeHours> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for story in stories {
        *totals.entry(story.assignee.as_str()).or_default() += u64::from(story.time_allotted);
    }

    let grand_total: u64 = totals.values().sum();
    totals
        .into_iter()
        .map(|(assignee, hours)| AssigneeHours {
            assignee: assignee.to_string(),
            hours,
            share: if grand_total == 0 {
                0.0
            } else {
                hours as f64 / grand_total as f64
            },
        })
        .collect()
}

/// Timeline bars ordered by start date, then title.
pub fn timeline(stories: &[Story]) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = stories
        .iter()
        .map(|story| TimelineEntry {
            id: story.id,
            title: story.title.clone(),
            start_date: story.start_date,
            end_date: story.end_date,
            status: story.status,
        })
        .collect();
    entries.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.title.cmp(&b.title))
    });
    entries
}
