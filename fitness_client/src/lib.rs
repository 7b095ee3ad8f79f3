pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{ApiError, Credentials, RequestOptions};
pub use frameworks::app::FitnessApp;
pub use frameworks::config::ClientConfig;
pub use use_cases::{ApiClient, RetryMode, RetryPolicy};
