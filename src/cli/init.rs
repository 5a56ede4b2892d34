// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use camino::Utf8PathBuf;
use eyre::WrapErr;

use crate::config;

#[derive(clap::Args)]
pub struct InitCommand {
    /// Where to write the configuration file.
    #[arg(default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    pub path: Utf8PathBuf,
}

pub fn init(command: &InitCommand) -> eyre::Result<()> {
    let path = &command.path;
    if path.exists() {
        return Err(eyre::eyre!("Already exists: {}", path));
    }

    let toml = config::default_config_toml()?;
    std::fs::write(path, toml)
        .wrap_err_with(|| eyre::eyre!("failed to write configuration file `{}`", path))?;
    color_print::cprintln!("<g>Wrote default configuration to `{}`.</>", path);
    Ok(())
}
