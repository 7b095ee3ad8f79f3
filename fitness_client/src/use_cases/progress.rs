use crate::domain::{ApiError, ProgressChart, ProgressPoint};
use crate::use_cases::client::{ApiClient, require_data};

pub const PROGRESS_PATH: &str = "/api/progress";

#[derive(Clone)]
pub struct ProgressService {
    client: ApiClient,
}

impl ProgressService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn fetch(&self) -> Result<Vec<ProgressPoint>, ApiError> {
        let points = self
            .client
            .get::<Option<Vec<ProgressPoint>>>(PROGRESS_PATH)
            .await?;
        let points = require_data(points, "Failed to fetch progress data")?;
        tracing::info!(count = points.len(), "progress data fetched successfully.");
        Ok(points)
    }

    pub async fn chart(&self) -> Result<ProgressChart, ApiError> {
        let points = self.fetch().await?;
        Ok(ProgressChart::from_points(&points))
    }
}
