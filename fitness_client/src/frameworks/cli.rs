use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Value, json};
use std::process::ExitCode;

use crate::domain::{ApiError, Credentials, GoalDraft, WorkoutDraft, calculate_bmi};
use crate::frameworks::app::FitnessApp;
use crate::frameworks::config::ClientConfig;
use crate::frameworks::telemetry;

#[derive(Parser, Debug)]
#[command(name = "fitness", version, about = "Command-line client for the fitness tracker API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the returned token
    Login(CredentialArgs),
    /// Create an account and store the returned token
    Register(CredentialArgs),
    /// Forget the stored token
    Logout,
    /// Report whether a token is stored
    Status,
    /// Manage fitness goals
    Goals {
        #[command(subcommand)]
        action: GoalAction,
    },
    /// Manage the workout log
    Workouts {
        #[command(subcommand)]
        action: WorkoutAction,
    },
    /// Show the social feed
    Posts,
    /// Show workout progress as chart data
    Progress {
        /// Print the raw progress points instead of chart data
        #[arg(long)]
        raw: bool,
    },
    /// Compute body mass index locally
    Bmi {
        /// Height in metres
        #[arg(long)]
        height: f64,
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
    },
    /// Raw GET against the API
    Get { path: String },
    /// Raw POST with an optional JSON body
    Post { path: String, body: Option<String> },
    /// Raw PUT with an optional JSON body
    Put { path: String, body: Option<String> },
    /// Raw DELETE against the API
    Delete { path: String },
}

#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[arg(short, long)]
    pub username: String,
    #[arg(short, long)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum GoalAction {
    List,
    Create(GoalArgs),
    Update {
        id: u64,
        #[command(flatten)]
        goal: GoalArgs,
    },
}

#[derive(Args, Debug)]
pub struct GoalArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub target: f64,
    #[arg(long, default_value = "")]
    pub unit: String,
}

impl From<GoalArgs> for GoalDraft {
    fn from(args: GoalArgs) -> Self {
        GoalDraft {
            title: args.title,
            description: args.description,
            target: args.target,
            unit: args.unit,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum WorkoutAction {
    List,
    Create(WorkoutArgs),
    Update {
        id: u64,
        #[command(flatten)]
        workout: WorkoutArgs,
    },
    Delete {
        id: u64,
    },
}

#[derive(Args, Debug)]
pub struct WorkoutArgs {
    /// Day of the workout, YYYY-MM-DD
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub activity: String,
    /// Minutes
    #[arg(long)]
    pub duration: f64,
    #[arg(long)]
    pub calories: f64,
}

impl From<WorkoutArgs> for WorkoutDraft {
    fn from(args: WorkoutArgs) -> Self {
        WorkoutDraft {
            date: args.date,
            activity: args.activity,
            duration: args.duration,
            calories: args.calories,
        }
    }
}

pub async fn start() -> ExitCode {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing("warn");

    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(base_url = %config.base_url, token_file = %config.token_file.display(), "api client configured.");

    let app = match FitnessApp::from_config(&config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "failed to build http client");
            eprintln!("failed to build http client: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &app).await {
        Ok(output) => {
            let rendered =
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string());
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

// Executes one command and returns what should be printed.
pub async fn run(command: Command, app: &FitnessApp) -> Result<Value, ApiError> {
    match command {
        Command::Login(args) => to_output(app.auth.login(&credentials(args)).await?),
        Command::Register(args) => to_output(app.auth.register(&credentials(args)).await?),
        Command::Logout => {
            app.auth.logout().await?;
            Ok(json!({ "loggedOut": true }))
        }
        Command::Status => Ok(json!({ "authenticated": app.auth.has_stored_token().await })),
        Command::Goals { action } => match action {
            GoalAction::List => to_output(app.goals.list().await?),
            GoalAction::Create(goal) => to_output(app.goals.create(goal.into()).await?),
            GoalAction::Update { id, goal } => to_output(app.goals.update(id, goal.into()).await?),
        },
        Command::Workouts { action } => match action {
            WorkoutAction::List => to_output(app.workouts.list().await?),
            WorkoutAction::Create(workout) => {
                to_output(app.workouts.create(workout.into()).await?)
            }
            WorkoutAction::Update { id, workout } => {
                to_output(app.workouts.update(id, workout.into()).await?)
            }
            WorkoutAction::Delete { id } => {
                app.workouts.delete(id).await?;
                Ok(json!({ "deleted": id }))
            }
        },
        Command::Posts => to_output(app.posts.list().await?),
        Command::Progress { raw: true } => to_output(app.progress.fetch().await?),
        Command::Progress { raw: false } => to_output(app.progress.chart().await?),
        Command::Bmi { height, weight } => match calculate_bmi(height, weight) {
            Some(bmi) => Ok(json!({ "bmi": bmi })),
            None => Err(ApiError::other("Invalid height or weight")),
        },
        Command::Get { path } => app.client.get(&path).await,
        Command::Post { path, body } => app.client.post(&path, &parse_body(body)?).await,
        Command::Put { path, body } => app.client.put(&path, &parse_body(body)?).await,
        Command::Delete { path } => app.client.delete(&path).await,
    }
}

fn credentials(args: CredentialArgs) -> Credentials {
    Credentials {
        username: args.username,
        password: args.password,
    }
}

fn parse_body(body: Option<String>) -> Result<Value, ApiError> {
    match body {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|err| ApiError::Other(format!("invalid JSON body: {err}"))),
        None => Ok(json!({})),
    }
}

fn to_output<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|err| ApiError::Other(err.to_string()))
}
