mod cli;
mod infra;
mod routes;
mod server;

use releaf_rewards::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
