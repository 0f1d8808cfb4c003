use std::sync::Arc;

use anyhow::Context;
use newpipe_bridge::{bridge, config::Config};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt::init();

  let config = Config::from_env()?;
  info!(
    piped_instance = %config.piped_instance,
    localization = %config.localization,
    "Listening on {}",
    config.bind_addr
  );

  let addr = config.bind_addr;
  let app = bridge::router(Arc::new(config));

  axum::Server::bind(&addr)
    .serve(app.into_make_service())
    .await
    .context("Failed to start server")?;

  Ok(())
}
