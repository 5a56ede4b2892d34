// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

pub mod paste;
pub mod renderer;

use camino::Utf8Path;
use eyre::WrapErr;
use paste::PasteConfig;
use renderer::RendererConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "./Texk.toml";

#[derive(Deserialize, Debug, Default, Serialize)]
pub struct Config {
    #[serde(default)]
    pub renderer: RendererConfig,

    #[serde(default)]
    pub paste: PasteConfig,
}

/// Read the config file, or fall back to defaults when there is none.
pub fn load_config(toml_file: &Utf8Path) -> eyre::Result<Config> {
    if !toml_file.exists() {
        tracing::debug!("no configuration file at `{}`, using defaults", toml_file);
        return Ok(Config::default());
    }
    let toml = std::fs::read_to_string(toml_file)
        .wrap_err_with(|| eyre::eyre!("failed to read configuration file `{}`", toml_file))?;
    parse_config(&toml)
}

pub fn parse_config(config: &str) -> eyre::Result<Config> {
    let config: Config =
        toml::from_str(config).map_err(|e| eyre::eyre!("failed to parse config file: {}", e))?;
    Ok(config)
}

pub fn default_config_toml() -> eyre::Result<String> {
    toml::to_string_pretty(&Config::default())
        .map_err(|e| eyre::eyre!("failed to serialize default config: {}", e))
}
