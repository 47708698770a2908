//! The fetch pipeline: search ids, merge them, enrich with details, join
//! revenue, and split out the popular sub-view.

mod collector;
mod enricher;
mod filter;
mod revenue;

pub use collector::collect;
pub use enricher::enrich;
pub use filter::filter_by_views;
pub use revenue::{apply_revenue, join, lookup_revenue, Joined, RevenueLookup, RevenueQuery, RevenueStatus};

use crate::config::AggregatorConfig;
use crate::error::{ConfigurationError, MetricsError};
use crate::models::{ChannelScope, SearchFilter, VideoRecord};
use crate::providers::{ChannelProvider, DetailsProvider, RevenueProvider, SearchProvider};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;
use tracing::info;

/// Everything one fetch needs. Built per operation and dropped afterwards.
pub struct FetchContext<'a> {
    pub search: &'a dyn SearchProvider,
    pub details: &'a dyn DetailsProvider,
    pub revenue: Option<&'a dyn RevenueProvider>,
    pub channel_scope: Option<ChannelScope>,
    pub config: &'a AggregatorConfig,
    pub now: DateTime<Utc>,
}

impl<'a> FetchContext<'a> {
    pub fn new(
        search: &'a dyn SearchProvider,
        details: &'a dyn DetailsProvider,
        config: &'a AggregatorConfig,
    ) -> Self {
        FetchContext {
            search,
            details,
            revenue: None,
            channel_scope: None,
            config,
            now: Utc::now(),
        }
    }

    pub fn with_revenue(mut self, revenue: Option<&'a dyn RevenueProvider>) -> Self {
        self.revenue = revenue;
        self
    }

    pub fn with_channel_scope(mut self, scope: ChannelScope) -> Self {
        self.channel_scope = Some(scope);
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    fn scope(&self) -> Result<&ChannelScope, ConfigurationError> {
        self.channel_scope.as_ref().ok_or(ConfigurationError::MissingChannelScope)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub records: Vec<VideoRecord>,
    /// Subset of `records` at or above the popular threshold.
    pub popular: Vec<VideoRecord>,
    #[serde(skip)]
    pub revenue: RevenueStatus,
}

impl MetricsReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Uploads from the last `lookback_days`.
pub async fn fetch_recent(ctx: &FetchContext<'_>) -> Result<MetricsReport, MetricsError> {
    let scope = ctx.scope()?;
    let since = ctx.now - Duration::days(i64::from(ctx.config.lookback_days));
    let searches = vec![(
        SearchFilter::uploads(scope.channel_id(), since),
        ctx.config.recent_max_results,
    )];
    run(ctx, scope, "recent", searches).await
}

/// Uploads since midnight UTC plus whatever is live right now.
pub async fn fetch_today(ctx: &FetchContext<'_>) -> Result<MetricsReport, MetricsError> {
    let scope = ctx.scope()?;
    let midnight = ctx.now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let searches = vec![
        (SearchFilter::uploads(scope.channel_id(), midnight), ctx.config.today_max_results),
        (SearchFilter::live(scope.channel_id()), ctx.config.live_max_results),
    ];
    run(ctx, scope, "today", searches).await
}

async fn run(
    ctx: &FetchContext<'_>,
    scope: &ChannelScope,
    label: &'static str,
    searches: Vec<(SearchFilter, u32)>,
) -> Result<MetricsReport, MetricsError> {
    ctx.config.validate()?;

    let mut result_sets = Vec::with_capacity(searches.len());
    for (filter, max_results) in &searches {
        result_sets.push(ctx.search.search(filter, *max_results).await?);
    }
    let ids = collect(result_sets);

    let records = enrich(&ids, ctx.details, ctx.config.details_batch_limit).await?;

    let query = ctx.revenue.map(|provider| RevenueQuery {
        provider,
        scope,
        window: ctx.config.report_window(ctx.now),
    });
    let Joined { records, status } = join(records, &ids, query, &ctx.config.mock).await;

    let popular = filter_by_views(&records, ctx.config.popular_threshold);

    info!(
        fetch = label,
        channel_id = scope.channel_id(),
        ids = ids.len(),
        records = records.len(),
        popular = popular.len(),
        revenue = ?status,
        "fetch complete"
    );

    Ok(MetricsReport { records, popular, revenue: status })
}

/// Uses `explicit` when given, otherwise asks `provider` for the signed-in
/// user's channel.
pub async fn resolve_channel_scope(
    explicit: Option<String>,
    provider: Option<&dyn ChannelProvider>,
) -> Result<ChannelScope, MetricsError> {
    if let Some(channel_id) = explicit {
        return Ok(ChannelScope::new(channel_id));
    }

    let provider = provider.ok_or(ConfigurationError::MissingChannelScope)?;
    match provider.my_channel_id().await? {
        Some(channel_id) => Ok(ChannelScope::new(channel_id)),
        None => Err(ConfigurationError::MissingChannelScope.into()),
    }
}
