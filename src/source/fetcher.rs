use crate::model::{PageRequest, SourceError};
use crate::source::PageSource;

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self, req: &PageRequest) -> Result<String, SourceError> {
        debug!("GET {}", req.input);
        let response = self.client.get(&req.input).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::InvalidResponse {
                url: req.input.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
