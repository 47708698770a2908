use crate::config::MockFallback;
use crate::error::RevenueUnavailable;
use crate::models::{ChannelScope, ReportWindow, RevenueSample, RpmSource, VideoRecord};
use crate::providers::RevenueProvider;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Where and over which dates to ask for revenue.
#[derive(Clone, Copy)]
pub struct RevenueQuery<'a> {
    pub provider: &'a dyn RevenueProvider,
    pub scope: &'a ChannelScope,
    pub window: ReportWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevenueLookup {
    Samples(HashMap<String, RevenueSample>),
    Unavailable(RevenueUnavailable),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevenueStatus {
    /// `matched` of the joined records had a revenue sample.
    Joined { matched: usize },
    Unavailable(RevenueUnavailable),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
    pub records: Vec<VideoRecord>,
    pub status: RevenueStatus,
}

/// Asks the provider once for every id. Failures and empty answers are
/// reported as [`RevenueUnavailable`] instead of errors.
pub async fn lookup_revenue(query: Option<RevenueQuery<'_>>, ids: &[String]) -> RevenueLookup {
    let Some(query) = query else {
        return RevenueLookup::Unavailable(RevenueUnavailable::NotConfigured);
    };

    if ids.is_empty() {
        return RevenueLookup::Samples(HashMap::new());
    }

    match query.provider.get_revenue(query.scope, ids, query.window).await {
        Ok(samples) if samples.is_empty() => {
            warn!(
                channel_id = query.scope.channel_id(),
                requested = ids.len(),
                "revenue report returned no rows, falling back"
            );
            RevenueLookup::Unavailable(RevenueUnavailable::NoData)
        },
        Ok(samples) => {
            debug!(requested = ids.len(), returned = samples.len(), "revenue report fetched");
            RevenueLookup::Samples(samples)
        },
        Err(err) => {
            warn!(error = %err, "revenue report failed, falling back");
            RevenueLookup::Unavailable(RevenueUnavailable::ProviderFailed(err.message))
        },
    }
}

/// Attaches revenue to each record, or the mock fallback where no sample
/// exists. Record count and order are unchanged.
pub fn apply_revenue(records: Vec<VideoRecord>, lookup: &RevenueLookup, fallback: &MockFallback) -> Vec<VideoRecord> {
    let samples = match lookup {
        RevenueLookup::Samples(samples) => Some(samples),
        RevenueLookup::Unavailable(_) => None,
    };

    records
        .into_iter()
        .map(|mut record| {
            match samples.and_then(|samples| samples.get(&record.id)) {
                Some(sample) => {
                    record.estimated_revenue = Some(sample.estimated_revenue);
                    record.rpm = Some(sample.rpm());
                    record.rpm_source = RpmSource::Reported;
                },
                None => {
                    record.estimated_revenue = None;
                    record.rpm = fallback.rpm;
                    record.rpm_source = match fallback.rpm {
                        Some(_) => RpmSource::Mock,
                        None => RpmSource::Unknown,
                    };
                },
            }

            // an observed status always wins over the mock
            if record.monetization_status.is_none() {
                record.monetization_status = fallback.monetization.clone();
            }

            record
        })
        .collect()
}

pub async fn join(
    records: Vec<VideoRecord>,
    ids: &[String],
    query: Option<RevenueQuery<'_>>,
    fallback: &MockFallback,
) -> Joined {
    let lookup = lookup_revenue(query, ids).await;
    let records = apply_revenue(records, &lookup, fallback);

    let status = match lookup {
        RevenueLookup::Samples(_) => RevenueStatus::Joined {
            matched: records.iter().filter(|r| r.rpm_source == RpmSource::Reported).count(),
        },
        RevenueLookup::Unavailable(reason) => RevenueStatus::Unavailable(reason),
    };

    Joined { records, status }
}
