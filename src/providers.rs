use crate::error::ProviderError;
use crate::models::*;
use crate::videos::MAX_VIDEO_IDS_PER_REQUEST;
use crate::{GoogleAPIRequest, YouTubeDataV3Client};
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Video ids matching `filter`, most recent first.
    async fn search(&self, filter: &SearchFilter, max_results: u32) -> Result<Vec<String>, ProviderError>;
}

#[async_trait]
pub trait DetailsProvider: Send + Sync {
    /// Details for at most `batch_limit` ids. Unknown or deleted ids are
    /// omitted from the result rather than reported as errors.
    async fn get_details(&self, ids: &[String], batch_limit: usize) -> Result<Vec<VideoDetails>, ProviderError>;
}

#[async_trait]
pub trait RevenueProvider: Send + Sync {
    /// May legitimately return an empty map, e.g. when the caller cannot see
    /// revenue for the channel.
    async fn get_revenue(
        &self,
        scope: &ChannelScope,
        ids: &[String],
        window: ReportWindow,
    ) -> Result<HashMap<String, RevenueSample>, ProviderError>;
}

#[async_trait]
pub trait ChannelProvider: Send + Sync {
    /// The channel owned by the authenticated user, if any.
    async fn my_channel_id(&self) -> Result<Option<String>, ProviderError>;
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
}

pub struct YouTubeProvider {
    client: YouTubeDataV3Client,
    credentials: Credentials,
}

impl YouTubeProvider {
    pub fn new(client: YouTubeDataV3Client, credentials: Credentials) -> Self {
        YouTubeProvider { client, credentials }
    }

    /// Analytics and `mine=true` lookups need OAuth; an API key is not enough.
    pub fn has_bearer_token(&self) -> bool {
        self.credentials.bearer_token.is_some()
    }

    fn authorize<'a, R>(&'a self, mut request: R) -> R
    where
        R: GoogleAPIRequest<'a>,
    {
        if let Some(key) = self.credentials.api_key.as_deref() {
            request = request.with_key(key);
        }
        if let Some(bearer_token) = self.credentials.bearer_token.as_deref() {
            request = request.with_bearer_token(bearer_token);
        }
        request
    }
}

#[async_trait]
impl SearchProvider for YouTubeProvider {
    async fn search(&self, filter: &SearchFilter, max_results: u32) -> Result<Vec<String>, ProviderError> {
        let request = self.authorize(self.client.search_videos(filter.clone(), max_results));
        Ok(request.send().await?)
    }
}

#[async_trait]
impl DetailsProvider for YouTubeProvider {
    async fn get_details(&self, ids: &[String], batch_limit: usize) -> Result<Vec<VideoDetails>, ProviderError> {
        let batch_limit = batch_limit.clamp(1, MAX_VIDEO_IDS_PER_REQUEST);
        let mut details = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(batch_limit) {
            let request = self.authorize(self.client.list_videos(chunk.to_vec()));
            details.extend(request.send().await?);
        }
        Ok(details)
    }
}

#[async_trait]
impl RevenueProvider for YouTubeProvider {
    async fn get_revenue(
        &self,
        scope: &ChannelScope,
        ids: &[String],
        window: ReportWindow,
    ) -> Result<HashMap<String, RevenueSample>, ProviderError> {
        let request = self.authorize(self.client.query_revenue_report(scope.clone(), ids.to_vec(), window));
        Ok(request.send().await?)
    }
}

#[async_trait]
impl ChannelProvider for YouTubeProvider {
    async fn my_channel_id(&self) -> Result<Option<String>, ProviderError> {
        let request = self.authorize(self.client.list_my_channels());
        let channel_ids = request.send().await?;
        Ok(channel_ids.into_iter().next())
    }
}
