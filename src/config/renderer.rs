// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8765/render";
pub const DEFAULT_DPI: u32 = 350;

#[derive(Deserialize, Debug, Clone, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RendererConfig {
    /// `POST` target of the renderer service.
    pub endpoint: Url,
    pub dpi: u32,
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            dpi: DEFAULT_DPI,
            timeout_secs: 30,
        }
    }
}
