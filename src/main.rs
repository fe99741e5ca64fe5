// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Context as _;
use structopt::StructOpt;
use tracing::{error, info};

mod camera;
mod error;
mod frame;
mod pipeline;
mod render;
mod settings;
mod stream;

use crate::pipeline::Pipeline;
use crate::settings::{Args, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let args = Args::from_args();
    let settings = Settings::from_args(&args).context("Error loading configuration")?;
    let mut pipeline = Pipeline::new(settings).await?;
    info!("serving");
    tokio::select! {
        result = &mut pipeline => {
            error!(?result, "pipeline stopped unexpectedly");
            result
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Error waiting for interrupt signal")?;
            info!("interrupt received, shutting down");
            pipeline.shutdown().await;
            Ok(())
        }
    }
}
