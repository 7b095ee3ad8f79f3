use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::time::Duration;

use crate::domain::{Method, RequestDescriptor, Transport, TransportError, TransportResponse};

// The clients defined here are reqwest clients that talk to the fitness backend.
// Thin transport: builds the request, sends it once, hands back status + bytes.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
    pub base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> Result<reqwest::Url, TransportError> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        reqwest::Url::parse(&joined)
            .map_err(|err| TransportError::InvalidRequest(format!("invalid url '{joined}': {err}")))
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

// Sort reqwest failures into "never got a response" vs "worth another try".
fn classify_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Unreachable(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        let mut builder = self
            .http
            .request(to_reqwest(request.method), url)
            .header(ACCEPT, "application/json");

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &request.options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = builder.send().await.map_err(classify_send_error)?;
        let status = res.status().as_u16();

        // Status is known at this point, so a failed body read is transient, not a network error.
        let body = res.bytes().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::TimedOut(err.to_string())
            } else {
                TransportError::Interrupted(err.to_string())
            }
        })?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
