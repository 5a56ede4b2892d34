// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

mod cli;
mod clipboard;
mod config;
mod dom;
mod error;
mod host;
mod insert;
mod metadata;
mod pipeline;
mod progress;
mod recovery;
mod region;
mod render;
mod span;
mod tokenizer;

use clap::Parser;

use crate::cli::{
    health::HealthCommand, init::InitCommand, paste::PasteCommand, render::RenderCommand,
    undo::UndoCommand,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replace `$...$` / `$$...$$` with embedded images (data URLs).
    ///
    /// Needs no interaction, but some mail servers strip such images on send.
    #[command(visible_alias = "r")]
    Render(RenderCommand),

    /// Replace `$...$` / `$$...$$` with images pasted from the clipboard.
    ///
    /// Each image is copied to the clipboard and you paste it right after the
    /// highlighted marker in <FILE>, then save, before the wait runs out.
    #[command(visible_alias = "p")]
    Paste(PasteCommand),

    /// Turn equation images back into `$...$` / `$$...$$`.
    #[command(visible_alias = "u")]
    Undo(UndoCommand),

    /// Check that the renderer service is reachable.
    #[command()]
    Health(HealthCommand),

    /// Write a default "Texk.toml".
    #[command(visible_alias = "i")]
    Init(InitCommand),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Render(command) => crate::cli::render::render(command).await?,
        Command::Paste(command) => crate::cli::paste::paste(command).await?,
        Command::Undo(command) => crate::cli::undo::undo(command)?,
        Command::Health(command) => crate::cli::health::health(command).await?,
        Command::Init(command) => crate::cli::init::init(command)?,
    };
    Ok(())
}
