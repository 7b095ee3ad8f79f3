// Shared helpers for standing up mock backends in integration tests.
use axum::Router;
use fitness_client::interface_adapters::{InMemoryTokenStore, ReqwestTransport};
use fitness_client::{ApiClient, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

// Serve `app` on an ephemeral port for the rest of the test and return its base URL.
pub async fn spawn_backend(app: Router) -> String {
    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend failed");
    });
    format!("http://{addr}")
}

// Base URL of a port that was just released, so connections are refused.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn client(base_url: &str, store: &InMemoryTokenStore, retry: RetryPolicy) -> ApiClient {
    let transport =
        ReqwestTransport::new(base_url, Duration::from_secs(5)).expect("build http client");
    ApiClient::new(Arc::new(transport), Arc::new(store.clone()), retry)
}

// Default policy with a short delay so retry-heavy tests stay quick.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        delay: Duration::from_millis(20),
        ..RetryPolicy::default()
    }
}
