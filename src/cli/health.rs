// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use camino::Utf8PathBuf;
use eyre::WrapErr;

use crate::{config, render::HttpRenderer};

#[derive(clap::Args)]
pub struct HealthCommand {
    /// Path to the configuration file (e.g., "Texk.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    pub config: Utf8PathBuf,
}

pub async fn health(command: &HealthCommand) -> eyre::Result<()> {
    let config = config::load_config(&command.config)?;
    let renderer = HttpRenderer::new(&config.renderer)?;
    renderer
        .health()
        .await
        .wrap_err_with(|| eyre::eyre!("renderer at `{}` is not healthy", renderer.endpoint()))?;
    color_print::cprintln!("<g>Renderer at `{}` is up.</>", renderer.endpoint());
    Ok(())
}
