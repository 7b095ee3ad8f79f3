use crate::domain::{ApiError, Post};
use crate::use_cases::client::{ApiClient, require_data};

pub const POSTS_PATH: &str = "/api/posts";

// Read-only social feed.
#[derive(Clone)]
pub struct PostService {
    client: ApiClient,
}

impl PostService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Post>, ApiError> {
        let posts = self.client.get::<Option<Vec<Post>>>(POSTS_PATH).await?;
        let posts = require_data(posts, "Failed to fetch posts")?;
        tracing::info!(count = posts.len(), "posts fetched successfully.");
        Ok(posts)
    }
}
