use fitness_client::frameworks::cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    cli::start().await
}
