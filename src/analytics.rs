use crate::{execute_get, GoogleAPIRequestFields, HttpClient, YouTubeError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use crate::models::*;

const METRICS: &str = "estimatedRevenue,views";

pub struct RevenueReportRequest<'a> {
    pub client: &'a HttpClient,
    pub base: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub scope: ChannelScope,
    pub video_ids: Vec<String>,
    pub window: ReportWindow,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for RevenueReportRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "columnHeaders", default)]
    column_headers: Vec<ColumnHeader>,
    rows: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Deserialize)]
struct ColumnHeader {
    name: String,
}

struct Columns {
    video: usize,
    revenue: usize,
    views: usize,
}

impl Columns {
    fn locate(headers: &[ColumnHeader]) -> Result<Self, YouTubeError> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header.name == name)
                .ok_or_else(|| YouTubeError::ParseError(format!("report is missing the `{}` column", name)))
        };

        Ok(Columns {
            video: position("video")?,
            revenue: position("estimatedRevenue")?,
            views: position("views")?,
        })
    }

    fn sample(&self, row: &[Value]) -> Option<RevenueSample> {
        let id = row.get(self.video)?.as_str()?.to_string();
        let estimated_revenue = row.get(self.revenue)?.as_f64().filter(|v| v.is_finite() && *v >= 0.0)?;
        let views = row.get(self.views)?;
        // integer metrics occasionally come back as floats
        let view_count = views
            .as_u64()
            .or_else(|| views.as_f64().filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as u64))?;

        Some(RevenueSample { id, estimated_revenue, view_count })
    }
}

impl<'a> RevenueReportRequest<'a> {
    /// Returns one sample per video that has data in the window. Videos
    /// without data are simply absent from the map.
    pub async fn send(self) -> Result<HashMap<String, RevenueSample>, YouTubeError> {
        if self.video_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!(
            "{}/v2/reports?ids={}&startDate={}&endDate={}&metrics={}&dimensions=video&filters={}&maxResults={}",
            self.base,
            urlencoding::encode(&self.scope.as_report_ids()),
            self.window.start.format("%Y-%m-%d"),
            self.window.end.format("%Y-%m-%d"),
            urlencoding::encode(METRICS),
            urlencoding::encode(&format!("video=={}", self.video_ids.join(","))),
            self.video_ids.len()
        );

        let body_bytes = execute_get(self.client, url, &self.fields).await?;
        let api_response: ApiResponse = serde_json::from_slice(&body_bytes)?;

        let rows = match api_response.rows {
            Some(rows) if !rows.is_empty() => rows,
            _ => return Ok(HashMap::new()),
        };

        let columns = Columns::locate(&api_response.column_headers)?;

        let mut samples = HashMap::with_capacity(rows.len());
        for row in &rows {
            match columns.sample(row) {
                Some(sample) => {
                    samples.entry(sample.id.clone()).or_insert(sample);
                },
                None => tracing::debug!(?row, "skipping malformed analytics row"),
            }
        }

        Ok(samples)
    }
}
