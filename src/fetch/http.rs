//! reqwest-backed [`Transport`].

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Url};

use super::traits::{HttpResponse, Transport};
use crate::error::NetworkError;
use crate::{ProdcatError, Result};

const DEFAULT_USER_AGENT: &str = concat!("prodcat/", env!("CARGO_PKG_VERSION"));

/// HTTP transport over a shared [`reqwest::Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build a client that asks for JSON.
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ProdcatError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Use an existing client as-is.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn get(&self, url: &Url) -> std::result::Result<HttpResponse, NetworkError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout
    } else {
        NetworkError::Unknown(err.to_string())
    }
}
