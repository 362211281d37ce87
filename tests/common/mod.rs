#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use keepalive::config::ServerConfig;
use keepalive::server::listener;
use tokio::net::TcpListener;

/// A fresh directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("keepalive-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A small site: `index.html`, `a.txt`, `result.html` and a `docs/` directory.
pub fn site(name: &str) -> PathBuf {
    let dir = scratch_dir(name);
    std::fs::create_dir_all(dir.join("docs")).unwrap();
    std::fs::write(dir.join("index.html"), b"<h1>home</h1>").unwrap();
    std::fs::write(dir.join("a.txt"), b"alpha").unwrap();
    std::fs::write(dir.join("result.html"), b"<p>result</p>").unwrap();
    dir
}

/// Runs the accept loop on an ephemeral loopback port.
pub async fn start_server(cfg: ServerConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = listener::serve(listener, &cfg).await;
    });
    addr
}
