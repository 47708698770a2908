use crate::{execute_get, GoogleAPIRequestFields, HttpClient, YouTubeError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use crate::models::*;

/// The videos endpoint accepts at most this many ids per call.
pub const MAX_VIDEO_IDS_PER_REQUEST: usize = 50;

pub struct ListVideosRequest<'a> {
    pub client: &'a HttpClient,
    pub base: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub video_ids: Vec<String>,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for ListVideosRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    items: Option<Vec<ApiVideo>>
}

#[derive(Debug, Deserialize)]
struct ApiVideo {
    id: String,
    snippet: Option<VideoSnippet>,
    status: Option<VideoStatus>,
    statistics: Option<VideoStatistics>
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    title: Option<String>,
    thumbnails: Option<Thumbnails>,
    #[serde(rename = "liveBroadcastContent")]
    live_broadcast_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>
}

#[derive(Debug, Deserialize)]
struct VideoStatus {
    #[serde(rename = "monetizationStatus")]
    monetization_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>
}

impl ApiVideo {
    fn into_details(self) -> VideoDetails {
        // counts arrive as decimal strings; anything unparseable is unknown, not zero
        let parse_count = |s: Option<&String>| -> Option<u64> {
            s.and_then(|s| s.parse::<u64>().ok())
        };

        let statistics = self.statistics.as_ref();
        let view_count = parse_count(statistics.and_then(|s| s.view_count.as_ref()));
        let like_count = parse_count(statistics.and_then(|s| s.like_count.as_ref()));
        let comment_count = parse_count(statistics.and_then(|s| s.comment_count.as_ref()));

        let snippet = self.snippet;

        let published_at = snippet
            .as_ref()
            .and_then(|s| s.published_at.as_ref())
            .and_then(|dt| DateTime::parse_from_rfc3339(dt).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let broadcast = snippet
            .as_ref()
            .and_then(|s| s.live_broadcast_content.as_deref())
            .and_then(BroadcastState::from_api);

        let thumbnail_url = snippet
            .as_ref()
            .and_then(|s| s.thumbnails.as_ref())
            .and_then(|t| {
                [&t.high, &t.medium, &t.default]
                    .into_iter()
                    .flatten()
                    .find_map(|thumbnail| thumbnail.url.clone())
            });

        VideoDetails {
            id: self.id,
            title: snippet.and_then(|s| s.title),
            published_at,
            view_count,
            like_count,
            comment_count,
            monetization_status: self.status.and_then(|s| s.monetization_status),
            broadcast,
            thumbnail_url,
        }
    }
}

impl<'a> ListVideosRequest<'a> {
    /// Returns details in requested-id order. Ids the API does not return
    /// (deleted or private videos) are left out.
    pub async fn send(self) -> Result<Vec<VideoDetails>, YouTubeError> {
        if self.video_ids.is_empty() {
            return Ok(Vec::new());
        }

        if self.video_ids.len() > MAX_VIDEO_IDS_PER_REQUEST {
            return Err(YouTubeError::TooManyIds {
                count: self.video_ids.len(),
                limit: MAX_VIDEO_IDS_PER_REQUEST,
            });
        }

        let url = format!(
            "{}/youtube/v3/videos?part=snippet%2Cstatistics%2Cstatus&id={}",
            self.base,
            urlencoding::encode(&self.video_ids.join(","))
        );

        let body_bytes = execute_get(self.client, url, &self.fields).await?;
        let api_response: ApiResponse = serde_json::from_slice(&body_bytes)?;

        let mut by_id: HashMap<String, ApiVideo> = HashMap::new();
        for api_video in api_response.items.unwrap_or_default() {
            by_id.entry(api_video.id.clone()).or_insert(api_video);
        }

        let mut videos = Vec::with_capacity(by_id.len());
        for video_id in &self.video_ids {
            match by_id.remove(video_id) {
                Some(api_video) => videos.push(api_video.into_details()),
                None => tracing::debug!(video_id = %video_id, "video not returned by videos.list"),
            }
        }

        Ok(videos)
    }
}
