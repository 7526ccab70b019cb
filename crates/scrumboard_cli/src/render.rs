//! Text rendering for the grid and trend charts.

use scrumboard_core::{render_table, Story, TrendReport, Trends};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn grid(stories: &[Story]) -> String {
    if stories.is_empty() {
        return "No stories match.\n".to_string();
    }
    format!("Current Stories\n\n{}", render_table(stories))
}

pub fn trends(trends: &Trends) -> Result<String, std::fmt::Error> {
    match trends {
        Trends::NoData => Ok("No stories available. Create stories first.\n".to_string()),
        Trends::Report(report) => report_charts(report),
    }
}

fn report_charts(report: &TrendReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "Number of Stories by Status")?;
    let max_count = report
        .status_counts
        .iter()
        .map(|entry| entry.count)
        .max()
        .unwrap_or(1);
    for entry in &report.status_counts {
        writeln!(
            out,
            "  {:<12} {} {}",
            entry.status.label(),
            bar(entry.count, max_count),
            entry.count
        )?;
    }

    writeln!(out, "\nTime Allotted by Assignee")?;
    let name_width = report
        .time_by_assignee
        .iter()
        .map(|entry| entry.assignee.chars().count())
        .max()
        .unwrap_or(0);
    for entry in &report.time_by_assignee {
        writeln!(
            out,
            "  {:<width$} {:>5}h {:>5.1}%",
            entry.assignee,
            entry.hours,
            entry.share * 100.0,
            width = name_width
        )?;
    }

    writeln!(out, "\nStory Timelines")?;
    for entry in &report.timeline {
        writeln!(
            out,
            "  {} .. {}  [{}] {}",
            entry.start_date.format(DATE_FORMAT),
            entry.end_date.format(DATE_FORMAT),
            entry.status.label(),
            entry.title
        )?;
    }

    Ok(out)
}

fn bar(value: u64, max: u64) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
    };
    "#".repeat(filled.max(1))
}
