use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// One video as reported by the details endpoint. Counts the API did not
/// report stay `None`; zero is a real observation.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub id: String,
    pub title: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub monetization_status: Option<String>,
    pub broadcast: Option<BroadcastState>,
    pub thumbnail_url: Option<String>,
}

impl VideoDetails {
    pub fn new(id: impl Into<String>) -> Self {
        VideoDetails {
            id: id.into(),
            title: None,
            published_at: None,
            view_count: None,
            like_count: None,
            comment_count: None,
            monetization_status: None,
            broadcast: None,
            thumbnail_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastState {
    Live,
    Upcoming,
    Offline,
}

impl BroadcastState {
    pub fn from_api(value: &str) -> Option<Self> {
        match value {
            "live" => Some(BroadcastState::Live),
            "upcoming" => Some(BroadcastState::Upcoming),
            "none" => Some(BroadcastState::Offline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RpmSource {
    Reported,
    Mock,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub monetization_status: Option<String>,
    pub estimated_revenue: Option<f64>,
    pub rpm: Option<f64>,
    pub rpm_source: RpmSource,
    pub broadcast: Option<BroadcastState>,
    pub thumbnail_url: Option<String>,
}

impl VideoRecord {
    pub fn is_live(&self) -> bool {
        self.broadcast == Some(BroadcastState::Live)
    }
}

impl From<VideoDetails> for VideoRecord {
    fn from(details: VideoDetails) -> Self {
        VideoRecord {
            id: details.id,
            title: details.title,
            published_at: details.published_at,
            view_count: details.view_count,
            like_count: details.like_count,
            comment_count: details.comment_count,
            monetization_status: details.monetization_status,
            estimated_revenue: None,
            rpm: None,
            rpm_source: RpmSource::Unknown,
            broadcast: details.broadcast,
            thumbnail_url: details.thumbnail_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSample {
    pub id: String,
    pub estimated_revenue: f64,
    pub view_count: u64,
}

impl RevenueSample {
    pub fn rpm(&self) -> f64 {
        rpm(self.estimated_revenue, self.view_count)
    }
}

/// Revenue per thousand views. Zero views yields zero rather than a division.
pub fn rpm(estimated_revenue: f64, view_count: u64) -> f64 {
    if view_count == 0 {
        return 0.0;
    }
    estimated_revenue / view_count as f64 * 1000.0
}

/// The channel an analytics report or search is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelScope(String);

impl ChannelScope {
    pub fn new(channel_id: impl Into<String>) -> Self {
        ChannelScope(channel_id.into())
    }

    pub fn channel_id(&self) -> &str {
        &self.0
    }

    /// The `ids` value of an analytics report query.
    pub fn as_report_ids(&self) -> String {
        format!("channel=={}", self.0)
    }
}

/// Inclusive date range of an analytics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    pub fn trailing_days(now: DateTime<Utc>, days: u32) -> Self {
        ReportWindow {
            start: (now - Duration::days(i64::from(days))).date_naive(),
            end: now.date_naive(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Live,
    Upcoming,
    Completed,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Live => "live",
            EventType::Upcoming => "upcoming",
            EventType::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub channel_id: String,
    pub published_after: Option<DateTime<Utc>>,
    pub event_type: Option<EventType>,
}

impl SearchFilter {
    pub fn uploads(channel_id: impl Into<String>, published_after: DateTime<Utc>) -> Self {
        SearchFilter {
            channel_id: channel_id.into(),
            published_after: Some(published_after),
            event_type: None,
        }
    }

    pub fn live(channel_id: impl Into<String>) -> Self {
        SearchFilter {
            channel_id: channel_id.into(),
            published_after: None,
            event_type: Some(EventType::Live),
        }
    }
}
