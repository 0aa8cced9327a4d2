use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::{IpResolver, Ipv4Literal};
use crate::error::{Error, Result};

/// Asks a single "what is my IP" service for the public address.
pub struct ExternalIpResolver {
    client: Client,
    url: String,
}

impl ExternalIpResolver {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl IpResolver for ExternalIpResolver {
    async fn resolve(&self) -> Result<Ipv4Literal> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "error getting outside ip address from {} ({})",
                self.url,
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !is_plain_text(&content_type) {
            return Err(Error::Transport(format!(
                "unknown content type '{}' for getting outside ip address",
                content_type
            )));
        }

        let body = response.text().await?;
        tracing::debug!("{} answered {:?}", self.url, body);

        Ipv4Literal::parse(&body)
    }
}

/// The echo service must declare exactly `text/plain`, with no parameters.
fn is_plain_text(content_type: &str) -> bool {
    content_type == "text/plain"
}
