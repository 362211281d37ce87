use anyhow::Context;
use keepalive::client::Client;
use keepalive::config::{ClientConfig, Target};
use tokio::io::BufReader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().context("usage: client <host> <port>")?;
    let port = args
        .next()
        .context("usage: client <host> <port>")?
        .parse::<u16>()
        .context("port must be a number")?;

    let cfg = ClientConfig::load(Target::new(host, port));
    let mut client = Client::connect(cfg).await?;
    client.run(BufReader::new(tokio::io::stdin())).await
}
