use std::time::Duration;

use reqwest::Client;

use crate::error::{Error, Result};

use super::remote::RemoteSource;
use super::types::*;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(format!("could not build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn get_posts(&self) -> Result<Vec<RemotePost>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let resp = check_status(resp).await?;

        resp.json::<Vec<RemotePost>>()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }

    pub async fn post_quote(&self, req: &NewPostRequest) -> Result<RemotePost> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(req)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let resp = check_status(resp).await?;

        resp.json::<RemotePost>()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }
}

impl RemoteSource for ApiClient {
    async fn fetch_posts(&self) -> Result<Vec<RemotePost>> {
        self.get_posts().await
    }

    async fn create_post(&self, req: &NewPostRequest) -> Result<RemotePost> {
        self.post_quote(req).await
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Remote {
        status: status.as_u16(),
        message: extract_error(&body),
    })
}

fn extract_error(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| body.to_string())
}
