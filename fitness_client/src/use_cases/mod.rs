pub mod auth;
pub mod client;
pub mod goals;
pub mod posts;
pub mod progress;
pub mod retry;
pub mod workouts;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthService, AuthSession};
pub use client::ApiClient;
pub use goals::GoalService;
pub use posts::PostService;
pub use progress::ProgressService;
pub use retry::{RetryMode, RetryPolicy};
pub use workouts::WorkoutService;
