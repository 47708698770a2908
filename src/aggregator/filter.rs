use crate::models::VideoRecord;

/// Records with at least `threshold` views, in input order. Records whose
/// view count is unknown never qualify.
pub fn filter_by_views(records: &[VideoRecord], threshold: u64) -> Vec<VideoRecord> {
    records
        .iter()
        .filter(|record| record.view_count.is_some_and(|views| views >= threshold))
        .cloned()
        .collect()
}
