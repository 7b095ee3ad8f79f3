pub mod bmi;
pub mod dates;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod request;

// Re-export the domain boundary types and ports.
pub use bmi::calculate_bmi;
pub use dates::{INVALID_DATE_MESSAGE, format_date};
pub use entities::{
    AuthPayload, ChartDataset, Credentials, Goal, GoalDraft, Post, ProgressChart, ProgressPoint,
    User, Workout, WorkoutDraft,
};
pub use errors::{ApiError, TransportError};
pub use ports::{TOKEN_KEY, TokenStore, Transport, TransportResponse};
pub use request::{Method, RequestDescriptor, RequestOptions};
