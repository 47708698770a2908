use crate::models::{BroadcastState, RpmSource, VideoRecord};
use std::fmt::Write;

const NOT_AVAILABLE: &str = "N/A";
const HEADER: &str = "| Thumbnail | Title | Published | Views | Likes | Comments | Monetization | RPM | Live |\n\
                      |---|---|---|---:|---:|---:|---|---:|---|\n";

/// Renders records as a markdown table, one row per record in order.
///
/// Unknown values print as `N/A`. RPM is rounded to two decimals here and
/// nowhere else; mock values are marked with `(mock)`.
pub fn render_markdown_table(records: &[VideoRecord]) -> String {
    let mut table = String::from(HEADER);
    for record in records {
        // writing into a String cannot fail
        let _ = writeln!(
            table,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            thumbnail_cell(record),
            escape_cell(record.title.as_deref().unwrap_or(NOT_AVAILABLE)),
            record
                .published_at
                .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            count_cell(record.view_count),
            count_cell(record.like_count),
            count_cell(record.comment_count),
            escape_cell(record.monetization_status.as_deref().unwrap_or(NOT_AVAILABLE)),
            rpm_cell(record),
            live_cell(record.broadcast),
        );
    }
    table
}

fn thumbnail_cell(record: &VideoRecord) -> String {
    match &record.thumbnail_url {
        Some(url) => format!("![{}]({})", escape_cell(&record.id), url),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn count_cell(count: Option<u64>) -> String {
    count.map(|c| c.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn rpm_cell(record: &VideoRecord) -> String {
    match (record.rpm, record.rpm_source) {
        (Some(rpm), RpmSource::Mock) => format!("{:.2} (mock)", rpm),
        (Some(rpm), _) => format!("{:.2}", rpm),
        (None, _) => NOT_AVAILABLE.to_string(),
    }
}

fn live_cell(broadcast: Option<BroadcastState>) -> &'static str {
    match broadcast {
        Some(BroadcastState::Live) => "live",
        Some(BroadcastState::Upcoming) => "upcoming",
        Some(BroadcastState::Offline) => "no",
        None => NOT_AVAILABLE,
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}
