use serde_json::Value;

use crate::domain::{ApiError, Workout, WorkoutDraft};
use crate::use_cases::client::{ApiClient, require_data};

pub const WORKOUTS_PATH: &str = "/api/workouts";

// Workout log CRUD over the API client.
#[derive(Clone)]
pub struct WorkoutService {
    client: ApiClient,
}

impl WorkoutService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Workout>, ApiError> {
        let workouts = self.client.get::<Option<Vec<Workout>>>(WORKOUTS_PATH).await?;
        let workouts = require_data(workouts, "Failed to fetch workout logs")?;
        tracing::info!(count = workouts.len(), "workout logs fetched successfully.");
        Ok(workouts)
    }

    pub async fn create(&self, draft: WorkoutDraft) -> Result<Workout, ApiError> {
        let draft = draft.prepared()?;
        let workout = self
            .client
            .post::<Option<Workout>, _>(WORKOUTS_PATH, &draft)
            .await?;
        let workout = require_data(workout, "Failed to create workout")?;
        tracing::info!(workout_id = workout.id, "workout created successfully.");
        Ok(workout)
    }

    pub async fn update(&self, id: u64, draft: WorkoutDraft) -> Result<Workout, ApiError> {
        let draft = draft.prepared()?;
        let workout = self
            .client
            .put::<Option<Workout>, _>(&format!("{WORKOUTS_PATH}/{id}"), &draft)
            .await?;
        let workout = require_data(workout, "Failed to update workout")?;
        tracing::info!(workout_id = workout.id, "workout updated successfully.");
        Ok(workout)
    }

    // Any 2xx counts as deleted; the body (often empty) is ignored.
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.client
            .delete::<Value>(&format!("{WORKOUTS_PATH}/{id}"))
            .await?;
        tracing::info!(workout_id = id, "workout deleted successfully.");
        Ok(())
    }
}
