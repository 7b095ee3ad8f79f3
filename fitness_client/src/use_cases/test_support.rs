use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{RequestDescriptor, TokenStore, Transport, TransportError, TransportResponse};

type Outcome = Result<TransportResponse, TransportError>;

// What the client handed to the transport on one attempt.
#[derive(Clone, Debug)]
pub(crate) struct SentRequest {
    pub request: RequestDescriptor,
    pub bearer: Option<String>,
}

// Transport fake that replays a fixed script of outcomes and records every send.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Outcome>>>,
    sent: Arc<Mutex<Vec<SentRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: Value) -> Self {
        self.respond_raw(status, &body.to_string())
    }

    pub(crate) fn respond_raw(self, status: u16, body: &str) -> Self {
        self.push(Ok(TransportResponse {
            status,
            body: body.as_bytes().to_vec(),
        }))
    }

    pub(crate) fn fail(self, err: TransportError) -> Self {
        self.push(Err(err))
    }

    fn push(self, outcome: Outcome) -> Self {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .push_back(outcome);
        self
    }

    pub(crate) fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().expect("sent mutex poisoned").clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.sent.lock().expect("sent mutex poisoned").len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<TransportResponse, TransportError> {
        self.sent
            .lock()
            .expect("sent mutex poisoned")
            .push(SentRequest {
                request: request.clone(),
                bearer: bearer.map(str::to_string),
            });

        self.script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::InvalidRequest("script exhausted".into())))
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub get: bool,
    pub set: bool,
    pub delete: bool,
}

// Token store fake that counts deletions and can simulate storage failures.
#[derive(Clone, Default)]
pub(crate) struct RecordingTokenStore {
    token: Arc<Mutex<Option<String>>>,
    deletes: Arc<AtomicUsize>,
    failures: FailureFlags,
}

impl RecordingTokenStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_token(self, token: impl Into<String>) -> Self {
        *self.token.lock().expect("token mutex poisoned") = Some(token.into());
        self
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.token.lock().expect("token mutex poisoned").clone()
    }

    pub(crate) fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for RecordingTokenStore {
    async fn get(&self) -> Result<Option<String>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }
        Ok(self.token())
    }

    async fn set(&self, token: String) -> Result<(), String> {
        if self.failures.set {
            return Err("set failed".to_string());
        }
        *self.token.lock().expect("token mutex poisoned") = Some(token);
        Ok(())
    }

    async fn delete(&self) -> Result<(), String> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.failures.delete {
            return Err("delete failed".to_string());
        }
        *self.token.lock().expect("token mutex poisoned") = None;
        Ok(())
    }
}
