use hr_server::{AppState, Config, Server, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    tracing::info!("HR server starting...");

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize application state (work dir, database, JWT)
    let state = AppState::initialize(&config).await?;

    // 4. Run the HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
