// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

pub mod health;
pub mod init;
pub mod paste;
pub mod render;
pub mod undo;

use camino::{Utf8Path, Utf8PathBuf};

#[derive(clap::Args)]
pub struct DocumentArgs {
    /// HTML file holding the message, e.g. a saved compose page.
    pub file: Utf8PathBuf,

    /// Treat the whole file as the editable region's content.
    #[arg(short, long, default_value_t = false)]
    pub fragment: bool,

    /// Write the result here instead of back into <FILE>.
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,
}

impl DocumentArgs {
    pub fn target(&self) -> &Utf8Path {
        self.output.as_deref().unwrap_or(&self.file)
    }
}
