// reqwest-backed HTTP transport
use crate::application::http_transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::domain::error::ClientError;
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str = concat!("mcstatus-monitor/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ClientError::NetworkUnavailable(e.to_string()))?;

        Ok(Self { client })
    }

    fn map_error(error: reqwest::Error, timeout: Duration) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout(timeout)
        } else {
            ClientError::NetworkUnavailable(error.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        tracing::debug!("{} {}", method, request.url);

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout)
            .header("Accept", "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(e, request.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(e, request.timeout))?;

        Ok(HttpResponse { status, body })
    }
}
