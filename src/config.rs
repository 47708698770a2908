use crate::error::ConfigurationError;
use crate::models::ReportWindow;
use crate::videos::MAX_VIDEO_IDS_PER_REQUEST;
use crate::{YOUTUBE_ANALYTICS_API, YOUTUBE_DATA_API};
use chrono::{DateTime, Utc};
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "YT_METRICS";

/// Values substituted when a video has no reported revenue or monetization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockFallback {
    pub rpm: Option<f64>,
    pub monetization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Minimum views for a video to appear in the popular sub-view.
    pub popular_threshold: u64,
    /// Window for the recent-uploads search and the revenue report.
    pub lookback_days: u32,
    pub details_batch_limit: usize,
    pub recent_max_results: u32,
    pub today_max_results: u32,
    pub live_max_results: u32,
    pub mock: MockFallback,
    pub data_api_base: String,
    pub analytics_api_base: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorConfig {
            popular_threshold: 1000,
            lookback_days: 7,
            details_batch_limit: MAX_VIDEO_IDS_PER_REQUEST,
            recent_max_results: 10,
            today_max_results: 15,
            live_max_results: 5,
            mock: MockFallback::default(),
            data_api_base: YOUTUBE_DATA_API.to_string(),
            analytics_api_base: YOUTUBE_ANALYTICS_API.to_string(),
        }
    }
}

impl AggregatorConfig {
    /// Layers an optional TOML file and then `YT_METRICS_*` environment
    /// variables over the defaults. Nested keys use `__`, e.g.
    /// `YT_METRICS_MOCK__RPM=2.5`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        Self::from_builder(builder)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigurationError> {
        let builder = Config::builder().add_source(File::from_str(contents, FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigurationError> {
        let config: AggregatorConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigurationError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.details_batch_limit == 0 || self.details_batch_limit > MAX_VIDEO_IDS_PER_REQUEST {
            return Err(ConfigurationError::InvalidValue {
                field: "details_batch_limit",
                reason: format!("must be between 1 and {}", MAX_VIDEO_IDS_PER_REQUEST),
            });
        }

        if self.lookback_days == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "lookback_days",
                reason: "must be at least 1".to_string(),
            });
        }

        if let Some(rpm) = self.mock.rpm {
            if !rpm.is_finite() || rpm < 0.0 {
                return Err(ConfigurationError::InvalidValue {
                    field: "mock.rpm",
                    reason: format!("{} is not a non-negative number", rpm),
                });
            }
        }

        Ok(())
    }

    pub fn report_window(&self, now: DateTime<Utc>) -> ReportWindow {
        ReportWindow::trailing_days(now, self.lookback_days)
    }
}
