use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::http::session::Session;
use crate::server::dispatch::Dispatcher;

pub async fn run(cfg: &ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", cfg.port)).await?;
    info!("Listening on port {}", cfg.port);
    serve(listener, cfg).await
}

/// Accept loop. The next connection is accepted only after the current one
/// has closed.
pub async fn serve(listener: TcpListener, cfg: &ServerConfig) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(cfg);
    let idle_timeout = cfg.idle_timeout();

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("accept failed: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let session = Session::new(socket, Some(idle_timeout));
        Connection::new(session, &dispatcher, peer.to_string())
            .run()
            .await;
    }
}
