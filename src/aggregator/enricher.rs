use crate::error::ProviderError;
use crate::models::{VideoDetails, VideoRecord};
use crate::providers::DetailsProvider;
use std::collections::HashMap;
use tracing::debug;

/// Fetches details for `ids` in batches of `batch_limit` and returns one
/// record per id the provider knows about, in `ids` order.
///
/// A failing batch fails the whole call; records from earlier batches are
/// dropped with it.
pub async fn enrich(
    ids: &[String],
    provider: &dyn DetailsProvider,
    batch_limit: usize,
) -> Result<Vec<VideoRecord>, ProviderError> {
    let batch_limit = batch_limit.max(1);
    let mut records = Vec::with_capacity(ids.len());

    for (batch_index, batch) in ids.chunks(batch_limit).enumerate() {
        debug!(batch_index, batch_len = batch.len(), "fetching video details");
        let details = provider.get_details(batch, batch_limit).await?;

        let mut by_id: HashMap<String, VideoDetails> = HashMap::with_capacity(details.len());
        for detail in details {
            by_id.entry(detail.id.clone()).or_insert(detail);
        }

        for id in batch {
            match by_id.remove(id) {
                Some(detail) => records.push(VideoRecord::from(detail)),
                None => debug!(video_id = %id, "no details returned, skipping"),
            }
        }
    }

    Ok(records)
}
