use crate::{execute_get, GoogleAPIRequestFields, HttpClient, YouTubeError};
use chrono::SecondsFormat;
use serde::Deserialize;
use crate::models::SearchFilter;

/// search.list never returns more than this many items per page.
pub const MAX_SEARCH_RESULTS_PER_PAGE: u32 = 50;

pub struct SearchVideosRequest<'a> {
    pub client: &'a HttpClient,
    pub base: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub filter: SearchFilter,
    pub max_results: u32,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for SearchVideosRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    id: ItemId,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

impl<'a> SearchVideosRequest<'a> {
    fn page_url(&self, page_size: u32, page_token: Option<&str>) -> String {
        let mut url = format!(
            "{}/youtube/v3/search?part=id&type=video&order=date&channelId={}&maxResults={}",
            self.base,
            urlencoding::encode(&self.filter.channel_id),
            page_size
        );

        if let Some(published_after) = self.filter.published_after {
            let published_after = published_after.to_rfc3339_opts(SecondsFormat::Secs, true);
            url.push_str(&format!("&publishedAfter={}", urlencoding::encode(&published_after)));
        }

        if let Some(event_type) = self.filter.event_type {
            url.push_str(&format!("&eventType={}", event_type.as_str()));
        }

        if let Some(page_token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(page_token)));
        }

        url
    }

    /// Returns up to `max_results` video ids, most recent first, following
    /// page tokens as needed.
    pub async fn send(self) -> Result<Vec<String>, YouTubeError> {
        let mut video_ids = Vec::new();
        let mut page_token: Option<String> = None;

        while (video_ids.len() as u32) < self.max_results {
            let remaining = self.max_results - video_ids.len() as u32;
            let page_size = remaining.min(MAX_SEARCH_RESULTS_PER_PAGE);
            let url = self.page_url(page_size, page_token.as_deref());

            let body_bytes = execute_get(self.client, url, &self.fields).await?;
            let api_response: ApiResponse = serde_json::from_slice(&body_bytes)?;

            let page_len = api_response.items.len();
            tracing::debug!(
                channel_id = %self.filter.channel_id,
                page_len,
                has_next = api_response.next_page_token.is_some(),
                "search page fetched"
            );

            video_ids.extend(api_response.items.into_iter().filter_map(|item| item.id.video_id));

            match api_response.next_page_token {
                Some(token) if page_len > 0 => page_token = Some(token),
                _ => break,
            }
        }

        video_ids.truncate(self.max_results as usize);
        Ok(video_ids)
    }
}
