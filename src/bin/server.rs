use keepalive::config::ServerConfig;
use keepalive::server::listener;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let mut cfg = ServerConfig::load()?;
    if let Some(port) = std::env::args().nth(1) {
        cfg.port = port.parse()?;
    }

    tokio::select! {
        res = listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
