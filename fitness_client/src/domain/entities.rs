use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::dates::{INVALID_DATE_MESSAGE, format_date};
use crate::domain::errors::ApiError;

// Username/password pair used by both login and registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// User record returned by the backend. Unknown fields are kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default)]
    pub username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Body of a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target: f64,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub unit: String,
}

// Goal fields sent on create/update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub target: f64,
    pub unit: String,
}

impl GoalDraft {
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            target: self.target,
            unit: self.unit.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: u64,
    // Calendar day as "YYYY-MM-DD".
    pub date: String,
    pub activity: String,
    pub duration: f64,
    pub calories: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDraft {
    pub date: String,
    pub activity: String,
    pub duration: f64,
    pub calories: f64,
}

impl WorkoutDraft {
    pub fn trimmed(self) -> Self {
        Self {
            date: self.date.trim().to_string(),
            activity: self.activity.trim().to_string(),
            duration: self.duration,
            calories: self.calories,
        }
    }

    // Trimmed, with the date normalised to YYYY-MM-DD; rejects unparseable dates.
    pub fn prepared(self) -> Result<Self, ApiError> {
        let draft = self.trimmed();
        let date =
            format_date(&draft.date).ok_or_else(|| ApiError::other(INVALID_DATE_MESSAGE))?;
        Ok(Self { date, ..draft })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: u64,
    pub author: String,
    pub content: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

// One bar of the progress chart: workouts completed on a given day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressPoint {
    pub date: String,
    pub workouts: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<u32>,
    pub background_color: Vec<String>,
    pub border_color: Vec<String>,
    pub border_width: u32,
}

// Bar chart data derived from the progress endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressChart {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ProgressChart {
    pub const LABEL: &'static str = "Workouts";
    pub const BACKGROUND: &'static str = "rgba(54, 162, 235, 0.5)";
    pub const BORDER: &'static str = "rgba(54, 162, 235, 1)";

    pub fn from_points(points: &[ProgressPoint]) -> Self {
        let labels: Vec<String> = points.iter().map(|point| point.date.clone()).collect();
        let data = points.iter().map(|point| point.workouts).collect();

        Self {
            datasets: vec![ChartDataset {
                label: Self::LABEL.to_string(),
                data,
                background_color: vec![Self::BACKGROUND.to_string(); labels.len()],
                border_color: vec![Self::BORDER.to_string(); labels.len()],
                border_width: 1,
            }],
            labels,
        }
    }
}
