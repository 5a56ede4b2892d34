// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PasteConfig {
    /// How long each span waits for the operator's paste.
    pub wait_ms: u64,

    /// Program that takes a PNG on stdin and puts it on the system clipboard.
    pub clipboard_command: Vec<String>,
}

impl PasteConfig {
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            wait_ms: 1600,
            clipboard_command: ["wl-copy", "--type", "image/png"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
