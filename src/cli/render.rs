// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use camino::Utf8PathBuf;
use eyre::WrapErr;

use crate::{
    cli::DocumentArgs,
    config,
    host::HostFile,
    insert::direct::DirectStrategy,
    pipeline::{self, run_pass},
    progress::TerminalObserver,
    render::HttpRenderer,
};

#[derive(clap::Args)]
pub struct RenderCommand {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Path to the configuration file (e.g., "Texk.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    pub config: Utf8PathBuf,
}

/// Replace every math span with an embedded `data:` image.
pub async fn render(command: &RenderCommand) -> eyre::Result<()> {
    let args = &command.document;
    let config = config::load_config(&command.config)?;
    let renderer = HttpRenderer::new(&config.renderer)?;

    let mut file = HostFile::open(&args.file, args.fragment)?;
    let spans = pipeline::prepare(file.region_mut())?;

    let mut strategy = DirectStrategy::new(file.region_mut());
    let result = run_pass(&renderer, &mut strategy, &spans, &mut TerminalObserver::default()).await;

    // Converted spans are kept even when the pass stopped early.
    file.save_to(args.target())
        .wrap_err_with(|| eyre::eyre!("failed to save `{}`", args.target()))?;
    result.wrap_err_with(|| eyre::eyre!("render pass over `{}` stopped", args.file))?;
    Ok(())
}
