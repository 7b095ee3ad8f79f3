use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{ApiError, AuthPayload, Credentials, User};
use crate::use_cases::client::ApiClient;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";

// Who is signed in, shared by every clone of the service.
#[derive(Clone, Default)]
pub struct AuthSession {
    user: Arc<RwLock<Option<User>>>,
}

impl AuthSession {
    pub async fn is_logged_in(&self) -> bool {
        self.user.read().await.is_some()
    }

    pub async fn user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    async fn sign_in(&self, user: User) {
        *self.user.write().await = Some(user);
    }

    async fn sign_out(&self) {
        *self.user.write().await = None;
    }
}

// Login, registration and logout on top of the API client and token store.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    session: AuthSession,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            session: AuthSession::default(),
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    #[tracing::instrument(name = "login", skip_all, fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.authenticate(LOGIN_PATH, credentials, "Login").await
    }

    #[tracing::instrument(name = "register", skip_all, fields(username = %credentials.username))]
    pub async fn register(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.authenticate(REGISTER_PATH, credentials, "Registration")
            .await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.tokens().delete().await.map_err(|err| {
            tracing::error!(error = %err, "logout failed.");
            ApiError::Other(format!("Logout failed: {err}"))
        })?;
        self.session.sign_out().await;

        tracing::info!("logout successful.");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.sync_with_store().await;
        self.session.is_logged_in().await
    }

    pub async fn current_user(&self) -> Option<User> {
        self.sync_with_store().await;
        self.session.user().await
    }

    // A 401/403 on any service deletes the stored token; the session ends with it.
    // An unreadable store leaves the session as it is.
    async fn sync_with_store(&self) {
        if !self.session.is_logged_in().await {
            return;
        }
        if let Ok(None) = self.client.tokens().get().await {
            tracing::info!("stored token is gone, signing out.");
            self.session.sign_out().await;
        }
    }

    // True when a token is persisted, even if this process never logged in.
    pub async fn has_stored_token(&self) -> bool {
        matches!(self.client.tokens().get().await, Ok(Some(_)))
    }

    async fn authenticate(
        &self,
        path: &str,
        credentials: &Credentials,
        action: &str,
    ) -> Result<User, ApiError> {
        let payload = self
            .client
            .post::<Option<AuthPayload>, _>(path, credentials)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "{action} failed."))?;

        let Some(payload) = payload else {
            tracing::error!("{action} failed: response data missing.");
            return Err(ApiError::Other(format!(
                "{action} failed: Response data missing"
            )));
        };

        self.client
            .tokens()
            .set(payload.token)
            .await
            .map_err(|err| ApiError::Other(format!("{action} failed: {err}")))?;
        self.session.sign_in(payload.user.clone()).await;

        tracing::info!("{action} successful.");
        Ok(payload.user)
    }
}
