use crate::utils::error::{Result, SitemapError};
use reqwest::{Client, Response};
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Turns a non-2xx response into [`SitemapError::HttpStatus`].
pub fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status from {}: {}", response.url(), status);

    if status.is_success() {
        Ok(response)
    } else {
        Err(SitemapError::HttpStatus {
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }
}
