use anyhow::Context;
use atlas_kernel::config::load_config;
use atlas_kernel::domain::config::ApiConfig;
use atlas_logger::Logger;
use atlas_server::Server;
use std::path::Path;

#[atlas_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(None::<&Path>).context("Critical: Configuration is malformed")?;

    let _log = Logger::builder(env!("CARGO_PKG_NAME"))
        .level_name(&cfg.log.level)?
        .directory(cfg.log.directory.clone())
        .json(cfg.log.json)
        .env_filter(cfg.log.filter.clone())
        .init()?;

    Server::builder().config(cfg).build().await?.run().await
}
