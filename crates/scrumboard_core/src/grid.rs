//! Story grid projection and column filters.
//!
//! # Responsibility
//! - Filter a story listing the way the dashboard grid's column filters do.
//! - Format rows for fixed-width text display.
//!
//! # Invariants
//! - Filtering keeps input order and never drops a row that matches.
//! - An empty filter matches every story.

use crate::model::story::{Story, StoryStatus};
use chrono::NaiveDate;

const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";
const HEADERS: [&str; 7] = [
    "id",
    "title",
    "assignee",
    "time_allotted",
    "start_date",
    "end_date",
    "status",
];

/// Per-column grid filters. `None` fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryFilter {
    /// Case-insensitive substring of the title.
    pub title_contains: Option<String>,
    /// Case-insensitive substring of the assignee.
    pub assignee_contains: Option<String>,
    pub status: Option<StoryStatus>,
    /// Inclusive lower bound on `time_allotted`.
    pub min_hours: Option<u32>,
    /// Inclusive upper bound on `time_allotted`.
    pub max_hours: Option<u32>,
    /// Keep stories whose date range contains this day.
    pub active_on: Option<NaiveDate>,
}

impl StoryFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, story: &Story) -> bool {
        if let Some(needle) = &self.title_contains {
            if !contains_ignore_case(&story.title, needle) {
                return false;
            }
        }
        if let Some(needle) = &self.assignee_contains {
            if !contains_ignore_case(&story.assignee, needle) {
                return false;
            }
        }
        if self.status.is_some_and(|status| status != story.status) {
            return false;
        }
        if self.min_hours.is_some_and(|min| story.time_allotted < min) {
            return false;
        }
        if self.max_hours.is_some_and(|max| story.time_allotted > max) {
            return false;
        }
        if self.active_on.is_some_and(|day| !story.is_active_on(day)) {
            return false;
        }
        true
    }

    pub fn apply(&self, stories: Vec<Story>) -> Vec<Story> {
        if self.is_empty() {
            return stories;
        }
        stories
            .into_iter()
            .filter(|story| self.matches(story))
            .collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || haystack.to_lowercase().contains(&needle)
}

/// Display projection of one story, with dates as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub cells: [String; 7],
}

impl From<&Story> for GridRow {
    fn from(story: &Story) -> Self {
        Self {
            cells: [
                story.id.to_string(),
                story.title.clone(),
                story.assignee.clone(),
                story.time_allotted.to_string(),
                story.start_date.format(DISPLAY_DATE_FORMAT).to_string(),
                story.end_date.format(DISPLAY_DATE_FORMAT).to_string(),
                story.status.label().to_string(),
            ],
        }
    }
}

/// Renders stories as a text table with a header and a separator line.
///
/// Column widths fit the widest cell; numeric columns are right-aligned.
pub fn render_table(stories: &[Story]) -> String {
    let rows: Vec<GridRow> = stories.iter().map(GridRow::from).collect();
    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&separator.join("-+-"));
    out.push('\n');
    for row in &rows {
        push_line(&mut out, &row.cells, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let rendered: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(index, (cell, width))| {
            let pad = width.saturating_sub(cell.chars().count());
            if index == 0 || index == 3 {
                format!("{}{cell}", " ".repeat(pad))
            } else {
                format!("{cell}{}", " ".repeat(pad))
            }
        })
        .collect();
    out.push_str(rendered.join(" | ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::{render_table, GridRow, StoryFilter};
    use crate::model::story::{Story, StoryId, StoryStatus};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn story(id: i64, title: &str, assignee: &str, hours: u32, status: StoryStatus) -> Story {
        Story {
            id: StoryId(id),
            title: title.to_string(),
            assignee: assignee.to_string(),
            time_allotted: hours,
            start_date: day(1),
            end_date: day(10),
            status,
        }
    }

    fn sample() -> Vec<Story> {
        vec![
            story(1, "Login page", "Ana", 3, StoryStatus::ToDo),
            story(2, "Logout flow", "Ben", 8, StoryStatus::InProgress),
            story(3, "Billing export", "ana", 5, StoryStatus::Completed),
        ]
    }

    fn ids(stories: &[Story]) -> Vec<i64> {
        stories.iter().map(|story| story.id.get()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let filter = StoryFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(sample())), vec![1, 2, 3]);
    }

    #[test]
    fn text_filters_are_case_insensitive_substrings() {
        let filter = StoryFilter {
            title_contains: Some("LOG".to_string()),
            ..StoryFilter::default()
        };
        assert_eq!(ids(&filter.apply(sample())), vec![1, 2]);

        let filter = StoryFilter {
            assignee_contains: Some("ana".to_string()),
            ..StoryFilter::default()
        };
        assert_eq!(ids(&filter.apply(sample())), vec![1, 3]);
    }

    #[test]
    fn status_and_hour_range_combine() {
        let filter = StoryFilter {
            min_hours: Some(4),
            max_hours: Some(8),
            ..StoryFilter::default()
        };
        assert_eq!(ids(&filter.apply(sample())), vec![2, 3]);

        let filter = StoryFilter {
            status: Some(StoryStatus::Completed),
            min_hours: Some(4),
            ..StoryFilter::default()
        };
        assert_eq!(ids(&filter.apply(sample())), vec![3]);
    }

    #[test]
    fn active_on_uses_inclusive_date_range() {
        let mut stories = sample();
        stories[1].start_date = day(20);
        stories[1].end_date = day(25);
        let filter = StoryFilter {
            active_on: Some(day(10)),
            ..StoryFilter::default()
        };
        assert_eq!(ids(&filter.apply(stories)), vec![1, 3]);
    }

    #[test]
    fn grid_row_formats_dates() {
        let row = GridRow::from(&sample()[0]);
        assert_eq!(row.cells[4], "2024-05-01");
        assert_eq!(row.cells[5], "2024-05-10");
        assert_eq!(row.cells[6], "To Do");
    }

    #[test]
    fn render_table_has_header_separator_and_rows() {
        let table = render_table(&sample());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("id | title"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[3].contains("Logout flow"));
        assert!(lines[4].ends_with("Completed"));
    }
}
