use crate::{execute_get, GoogleAPIRequestFields, HttpClient, YouTubeError};
use serde::Deserialize;

/// channels.list with `mine=true`; only meaningful with a bearer token.
pub struct ListMyChannelsRequest<'a> {
    pub client: &'a HttpClient,
    pub base: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for ListMyChannelsRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    items: Option<Vec<ApiChannel>>
}

#[derive(Debug, Deserialize)]
struct ApiChannel {
    id: String,
}

impl<'a> ListMyChannelsRequest<'a> {
    pub async fn send(self) -> Result<Vec<String>, YouTubeError> {
        let url = format!("{}/youtube/v3/channels?part=id&mine=true", self.base);

        let body_bytes = execute_get(self.client, url, &self.fields).await?;
        let api_response: ApiResponse = serde_json::from_slice(&body_bytes)?;

        Ok(api_response
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|channel| channel.id)
            .collect())
    }
}
