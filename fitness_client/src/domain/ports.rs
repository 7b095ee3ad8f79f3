use async_trait::async_trait;

use crate::domain::errors::TransportError;
use crate::domain::request::RequestDescriptor;

// Fixed key the credential token lives under in the key-value store.
pub const TOKEN_KEY: &str = "token";

// Port for the persisted credential token. At most one token exists at a time.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Result<Option<String>, String>;
    async fn set(&self, token: String) -> Result<(), String>;
    async fn delete(&self) -> Result<(), String>;
}

// Raw response as seen by the client before unwrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Port for the HTTP transport. The client depends on this trait, not on reqwest.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<TransportResponse, TransportError>;
}
