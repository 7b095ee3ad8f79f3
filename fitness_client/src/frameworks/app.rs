use std::sync::Arc;

use crate::frameworks::config::ClientConfig;
use crate::interface_adapters::{FileTokenStore, ReqwestTransport};
use crate::use_cases::{
    ApiClient, AuthService, GoalService, PostService, ProgressService, WorkoutService,
};

// Every service wired to one shared client (and therefore one token store).
#[derive(Clone)]
pub struct FitnessApp {
    pub client: ApiClient,
    pub auth: AuthService,
    pub goals: GoalService,
    pub workouts: WorkoutService,
    pub posts: PostService,
    pub progress: ProgressService,
}

impl FitnessApp {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            goals: GoalService::new(client.clone()),
            workouts: WorkoutService::new(client.clone()),
            posts: PostService::new(client.clone()),
            progress: ProgressService::new(client.clone()),
            client,
        }
    }

    // Production wiring: reqwest transport plus the on-disk token file.
    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new(config.base_url.clone(), config.timeout)?;
        let tokens = FileTokenStore::new(config.token_file.clone());
        let client = ApiClient::new(Arc::new(transport), Arc::new(tokens), config.retry);
        Ok(Self::new(client))
    }
}
