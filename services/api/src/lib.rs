mod cli;
mod infra;
mod middleware;
mod report;
mod routes;
mod server;

use kundli::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
