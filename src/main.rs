use dotenv::dotenv;
use reviewbot::{
    config::{get_config, initialize_config},
    logging::{init_logging, log_dir},
    ui::run_ui,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    initialize_config()?;
    let config = get_config();

    let _logger = init_logging(&config.log_level)?;
    log::info!(
        "Starting reviewbot against {} ({:?} replies), logs in {}",
        config.server_url,
        config.response_mode,
        log_dir().display()
    );

    if let Err(e) = run_ui(config).await {
        log::error!("UI exited with error: {}", e);
        return Err(e.into());
    }

    log::info!("Session ended");
    Ok(())
}
