use crate::domain::model::MovieDetails;
use crate::domain::ports::MetadataLookup;
use crate::utils::error::{MovieNightError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Title lookup against an OMDb-compatible endpoint
/// (`GET <endpoint>?t=<title>&plot=short&apikey=<key>`).
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbClient {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl MetadataLookup for OmdbClient {
    async fn describe(&self, title: &str) -> Result<MovieDetails> {
        tracing::debug!("Looking up '{}' at {}", title, self.endpoint);

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("t", title), ("plot", "short")]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apikey", key)]);
        }

        let response = request.send().await?;
        tracing::debug!("Metadata response status: {}", response.status());

        if !response.status().is_success() {
            return Err(MovieNightError::MetadataError {
                message: format!("HTTP {}", response.status()),
            });
        }

        let body: OmdbResponse = response.json().await?;
        if !body.response.eq_ignore_ascii_case("true") {
            return Err(MovieNightError::MetadataError {
                message: body.error.unwrap_or_else(|| "no match".to_string()),
            });
        }

        let known = |v: Option<String>| v.filter(|s| s != "N/A");
        Ok(MovieDetails {
            title: known(body.title).unwrap_or_else(|| title.to_string()),
            year: known(body.year),
            plot: known(body.plot),
        })
    }
}
