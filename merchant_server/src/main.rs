use std::process::ExitCode;

use log::{error, info};
use merchant_server::{cli::handle_command_line_args, config::ServerConfig, server::run_server};

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();
    if handle_command_line_args() {
        return ExitCode::SUCCESS;
    }
    let config = ServerConfig::from_env_or_default();
    info!("🚀️ Merchant console listening on {}:{}", config.host, config.port);
    match run_server(config).await {
        Ok(()) => {
            info!("🚀️ Server stopped");
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("🚀️ Server failed. {e}");
            ExitCode::FAILURE
        },
    }
}
