use anyhow::Context;
use std::path::Path;
use zelo::domain::config::ApiConfig;
use zelo::kernel::config::{ConfigFile, load_config};
use zelo_logger::Logger;
use zelo_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig = load_config(ConfigFile::Optional(Path::new("server")))
        .context("Critical: Configuration is malformed")?;

    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    Server::builder().config(cfg).build().await?.run().await
}
