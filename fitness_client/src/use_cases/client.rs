use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{
    ApiError, Method, RequestDescriptor, RequestOptions, TokenStore, Transport, TransportError,
    TransportResponse,
};
use crate::use_cases::retry::{Failure, RetryPolicy};

// Resilient REST client: injects the bearer token, unwraps bodies,
// clears the token on 401/403 and retries everything else per `RetryPolicy`.
#[derive(Clone)]
pub struct ApiClient {
    // Arc<dyn Trait> keeps the client cheap to clone and independent of reqwest.
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// How a single attempt ended.
enum Attempt {
    Success(Value),
    Network(String),
    Unauthorized(u16),
    Failed(Failure),
    Fatal(ApiError),
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            tokens,
            retry,
        }
    }

    pub fn tokens(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.tokens)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with(path, RequestOptions::default()).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request = RequestDescriptor::new(Method::Get, path).with_options(options);
        self.send(request).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post_with(path, body, RequestOptions::default()).await
    }

    pub async fn post_with<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = RequestDescriptor::new(Method::Post, path)
            .with_body(encode(body)?)
            .with_options(options);
        self.send(request).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.put_with(path, body, RequestOptions::default()).await
    }

    pub async fn put_with<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = RequestDescriptor::new(Method::Put, path)
            .with_body(encode(body)?)
            .with_options(options);
        self.send(request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.delete_with(path, RequestOptions::default()).await
    }

    pub async fn delete_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request = RequestDescriptor::new(Method::Delete, path).with_options(options);
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<T, ApiError> {
        let body = self.execute(&request).await?;
        serde_json::from_value(body).map_err(|err| {
            tracing::error!(
                method = %request.method,
                path = %request.path,
                error = %err,
                "response did not match the expected shape."
            );
            ApiError::Other(format!("failed to decode response: {err}"))
        })
    }

    // Runs one logical call to a terminal outcome. Every attempt re-reads the
    // token and is classified before any retry decision is made.
    #[tracing::instrument(
        name = "api_request",
        skip_all,
        fields(method = %request.method, path = %request.path)
    )]
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<Value, ApiError> {
        let mut retries_left = self.retry.max_retries;
        let mut attempt: u32 = 1;

        loop {
            let token = self.current_token().await;
            let outcome = self.transport.send(request, token.as_deref()).await;

            match classify(outcome) {
                Attempt::Success(body) => {
                    tracing::debug!(attempt, "request succeeded.");
                    return Ok(body);
                }
                Attempt::Network(err) => {
                    tracing::error!(error = %err, "network error.");
                    return Err(ApiError::Network);
                }
                Attempt::Unauthorized(status) => {
                    tracing::error!(status, "unauthorized response; clearing stored token.");
                    // A failed delete must not hide the auth failure from the caller.
                    if let Err(err) = self.tokens.delete().await {
                        tracing::warn!(error = %err, "failed to clear stored token.");
                    }
                    return Err(ApiError::Unauthorized);
                }
                Attempt::Fatal(err) => {
                    tracing::error!(error = %err, "request could not be sent.");
                    return Err(err);
                }
                Attempt::Failed(failure) => {
                    if !self.retry.is_retryable(&failure) {
                        tracing::error!(%failure, "request failed.");
                        return Err(passthrough(failure));
                    }
                    if retries_left == 0 {
                        tracing::error!(attempt, %failure, "request failed after multiple retries.");
                        return Err(ApiError::Exhausted);
                    }

                    tracing::warn!(attempt, retries_left, %failure, "request failed; retrying.");
                    tokio::time::sleep(self.retry.delay).await;
                    retries_left -= 1;
                    attempt += 1;
                }
            }
        }
    }

    async fn current_token(&self) -> Option<String> {
        match self.tokens.get().await {
            Ok(token) => token,
            Err(err) => {
                // Treat an unreadable store as "logged out" and let the server decide.
                tracing::warn!(error = %err, "failed to read stored token.");
                None
            }
        }
    }
}

fn classify(outcome: Result<TransportResponse, TransportError>) -> Attempt {
    let response = match outcome {
        Ok(response) => response,
        Err(TransportError::Unreachable(err)) => return Attempt::Network(err),
        Err(TransportError::TimedOut(err)) => return Attempt::Failed(Failure::TimedOut(err)),
        Err(TransportError::Interrupted(err)) => {
            return Attempt::Failed(Failure::Interrupted(err));
        }
        Err(TransportError::InvalidRequest(err)) => return Attempt::Fatal(ApiError::Other(err)),
    };

    if matches!(response.status, 401 | 403) {
        return Attempt::Unauthorized(response.status);
    }

    if !response.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .map(|payload| payload.message);
        return Attempt::Failed(Failure::Status {
            status: response.status,
            message,
        });
    }

    match unwrap_body(&response.body) {
        Ok(body) => Attempt::Success(body),
        Err(err) => Attempt::Failed(Failure::Malformed(err.to_string())),
    }
}

// Empty bodies (e.g. 204 No Content) unwrap to JSON null.
fn unwrap_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

fn passthrough(failure: Failure) -> ApiError {
    match failure {
        Failure::Status {
            message: Some(message),
            ..
        } => ApiError::Other(message),
        other => ApiError::Other(other.to_string()),
    }
}

// Turns a null list/record response into the error a UI shows for it.
pub(crate) fn require_data<T>(value: Option<T>, failure: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| {
        tracing::error!("{failure}, response data is missing.");
        ApiError::Other(format!("{failure}, response data is missing"))
    })
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|err| ApiError::Other(format!("failed to encode request body: {err}")))
}
