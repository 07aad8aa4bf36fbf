mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use showroom_leads::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
