use crate::domain::{ApiError, Goal, GoalDraft};
use crate::use_cases::client::{ApiClient, require_data};

pub const GOALS_PATH: &str = "/api/goals";

// Goal CRUD over the API client.
#[derive(Clone)]
pub struct GoalService {
    client: ApiClient,
}

impl GoalService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Goal>, ApiError> {
        let goals = self.client.get::<Option<Vec<Goal>>>(GOALS_PATH).await?;
        let goals = require_data(goals, "Failed to fetch goals")?;
        tracing::info!(count = goals.len(), "goals fetched successfully.");
        Ok(goals)
    }

    pub async fn create(&self, draft: GoalDraft) -> Result<Goal, ApiError> {
        let goal = self
            .client
            .post::<Option<Goal>, _>(GOALS_PATH, &draft.trimmed())
            .await?;
        let goal = require_data(goal, "Failed to create goal")?;
        tracing::info!(goal_id = goal.id, "goal created successfully.");
        Ok(goal)
    }

    pub async fn update(&self, id: u64, draft: GoalDraft) -> Result<Goal, ApiError> {
        let goal = self
            .client
            .put::<Option<Goal>, _>(&format!("{GOALS_PATH}/{id}"), &draft.trimmed())
            .await?;
        let goal = require_data(goal, "Failed to update goal")?;
        tracing::info!(goal_id = goal.id, "goal updated successfully.");
        Ok(goal)
    }
}
