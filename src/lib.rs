use std::error::Error;
use hyper::body::Bytes;
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use http_body_util::{BodyExt, Empty};
use hyper::{Method, Request, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use native_tls::TlsConnector;
use hyper_util::rt::TokioExecutor;


pub mod aggregator;
pub mod analytics;
pub mod channels;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod providers;
pub mod report;
pub mod search;
pub mod videos;

pub use aggregator::{
    collect, enrich, fetch_recent, fetch_today, filter_by_views, join, resolve_channel_scope,
    FetchContext, MetricsReport, RevenueQuery, RevenueStatus,
};
pub use analytics::RevenueReportRequest;
pub use channels::ListMyChannelsRequest;
pub use crate::config::{AggregatorConfig, MockFallback};
pub use error::{ConfigurationError, MetricsError, ProviderError, RevenueUnavailable};
pub use models::{
    BroadcastState, ChannelScope, EventType, ReportWindow, RevenueSample, RpmSource, SearchFilter,
    VideoDetails, VideoRecord,
};
pub use providers::{
    ChannelProvider, Credentials, DetailsProvider, RevenueProvider, SearchProvider, YouTubeProvider,
};
pub use search::SearchVideosRequest;
pub use videos::ListVideosRequest;

pub const YOUTUBE_DATA_API: &str = "https://youtube.googleapis.com";
pub const YOUTUBE_ANALYTICS_API: &str = "https://youtubeanalytics.googleapis.com";

pub type HttpClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("TLS error: {0}")]
    TlsError(#[from] native_tls::Error),
}

pub fn initialize_client() -> Result<HttpClient, ClientError> {
    let mut http = HttpConnector::new();
    // https is negotiated by the TLS wrapper; plain http stays allowed for local endpoints
    http.enforce_http(false);

    let tls = TlsConnector::builder().build()?;
    let https = HttpsConnector::from((http, tls.into()));

    let client = Client::builder(TokioExecutor::new())
        .build::<_, Empty<Bytes>>(https);

    Ok(client)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GoogleAPIRequestFields<'a> {
    pub bearer_token: Option<&'a str>,
    pub key: Option<&'a str>,
    pub referrer: Option<&'a str>,
}

pub trait GoogleAPIRequest<'a> {
    fn bearer_token(&mut self) -> &mut Option<&'a str>;

    fn key(&mut self) -> &mut Option<&'a str>;

    fn referrer(&mut self) -> &mut Option<&'a str>;

    fn with_bearer_token(mut self, bearer_token: &'a str) -> Self
    where
        Self: Sized,
    {
        *self.bearer_token() = Some(bearer_token);
        self
    }

    fn with_key(mut self, key: &'a str) -> Self
    where
        Self: Sized,
    {
        *self.key() = Some(key);
        self
    }

    fn with_referrer(mut self, referrer: &'a str) -> Self
    where
        Self: Sized,
    {
        *self.referrer() = Some(referrer);
        self
    }
}

impl<'a, T> GoogleAPIRequest<'a> for T
where
    T: AsMut<GoogleAPIRequestFields<'a>>,
{
    fn bearer_token(&mut self) -> &mut Option<&'a str> {
        &mut self.as_mut().bearer_token
    }

    fn key(&mut self) -> &mut Option<&'a str> {
        &mut self.as_mut().key
    }

    fn referrer(&mut self) -> &mut Option<&'a str> {
        &mut self.as_mut().referrer
    }
}

#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Ratelimited: {0}")]
    Ratelimited(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Internal server error")]
    InternalServerError,
    #[error("Unknown status code: {0}")]
    UnknownStatusCode(StatusCode),
    #[error("Too many ids in one request: {count} (limit {limit})")]
    TooManyIds { count: usize, limit: usize },
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("HTTP error: {0}")]
    HttpError(#[from] hyper::Error),
    #[error("Legacy HTTP error: {0}")]
    LegacyHttpError(#[from] hyper_util::client::legacy::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Other error: {0}")]
    Other(Box<dyn Error + Send + Sync>),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    reason: Option<String>,
}

const QUOTA_MESSAGE_PREFIX: &str = "The request cannot be completed because you have exceeded your";
const QUOTA_REASONS: [&str; 4] = ["quotaExceeded", "rateLimitExceeded", "dailyLimitExceeded", "userRateLimitExceeded"];

impl ApiError {
    fn is_quota_exhausted(&self) -> bool {
        self.message.starts_with(QUOTA_MESSAGE_PREFIX)
            || self.errors.iter().any(|detail| {
                detail.reason.as_deref().is_some_and(|reason| QUOTA_REASONS.contains(&reason))
            })
    }
}

/// Issues a GET against a Google API endpoint and returns the body of a 200 response.
///
/// Every other status is mapped to a [`YouTubeError`] carrying the vendor's
/// `error.message` when the body has one, or the raw body otherwise.
pub(crate) async fn execute_get(
    client: &HttpClient,
    url: String,
    fields: &GoogleAPIRequestFields<'_>,
) -> Result<Bytes, YouTubeError> {
    let mut request_builder = Request::builder()
        .method(Method::GET)
        .uri(url);

    if let Some(key) = fields.key {
        request_builder = request_builder.header("X-Goog-Api-Key", key);
    }

    if let Some(bearer_token) = fields.bearer_token {
        request_builder = request_builder.header("Authorization", format!("Bearer {}", bearer_token));
    }

    if let Some(referrer) = fields.referrer {
        request_builder = request_builder.header("Referer", referrer);
    }

    let req = request_builder
        .body(Empty::new())
        .map_err(|e| YouTubeError::Other(Box::new(e)))?;

    let resp = client.request(req).await?;
    let status = resp.status();
    let body_bytes = resp.into_body().collect().await?.to_bytes();

    if status == StatusCode::OK {
        return Ok(body_bytes);
    }

    let (message, quota_exhausted) = match serde_json::from_slice::<ErrorResponse>(&body_bytes) {
        Ok(error_response) => {
            let quota_exhausted = error_response.error.is_quota_exhausted();
            (error_response.error.message, quota_exhausted)
        },
        Err(_) => (String::from_utf8_lossy(&body_bytes).into_owned(), false),
    };

    let err = match status {
        StatusCode::BAD_REQUEST => YouTubeError::BadRequest(message),
        StatusCode::UNAUTHORIZED => YouTubeError::Unauthorized(message),
        StatusCode::FORBIDDEN if quota_exhausted => YouTubeError::Ratelimited(message),
        StatusCode::FORBIDDEN => YouTubeError::Forbidden(message),
        StatusCode::NOT_FOUND => YouTubeError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => YouTubeError::Ratelimited(message),
        StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => YouTubeError::InternalServerError,
        status => {
            tracing::warn!(status = status.as_u16(), body = %message, "unexpected status from Google API");
            YouTubeError::UnknownStatusCode(status)
        },
    };

    Err(err)
}

pub struct YouTubeDataV3Client {
    client: HttpClient,
    data_api_base: String,
    analytics_api_base: String,
}

impl YouTubeDataV3Client {
    pub fn new(client: HttpClient) -> Self {
        Self::with_endpoints(client, YOUTUBE_DATA_API, YOUTUBE_ANALYTICS_API)
    }

    pub fn with_endpoints(
        client: HttpClient,
        data_api_base: impl Into<String>,
        analytics_api_base: impl Into<String>,
    ) -> Self {
        let trim = |base: String| base.trim_end_matches('/').to_string();
        YouTubeDataV3Client {
            client,
            data_api_base: trim(data_api_base.into()),
            analytics_api_base: trim(analytics_api_base.into()),
        }
    }

    pub fn list_videos(&self, video_ids: Vec<String>) -> ListVideosRequest<'_> {
        ListVideosRequest {
            client: &self.client,
            base: &self.data_api_base,
            fields: GoogleAPIRequestFields::default(),
            video_ids,
        }
    }

    pub fn search_videos(&self, filter: SearchFilter, max_results: u32) -> SearchVideosRequest<'_> {
        SearchVideosRequest {
            client: &self.client,
            base: &self.data_api_base,
            fields: GoogleAPIRequestFields::default(),
            filter,
            max_results,
        }
    }

    pub fn list_my_channels(&self) -> ListMyChannelsRequest<'_> {
        ListMyChannelsRequest {
            client: &self.client,
            base: &self.data_api_base,
            fields: GoogleAPIRequestFields::default(),
        }
    }

    pub fn query_revenue_report(
        &self,
        scope: ChannelScope,
        video_ids: Vec<String>,
        window: ReportWindow,
    ) -> RevenueReportRequest<'_> {
        RevenueReportRequest {
            client: &self.client,
            base: &self.analytics_api_base,
            fields: GoogleAPIRequestFields::default(),
            scope,
            video_ids,
            window,
        }
    }
}
