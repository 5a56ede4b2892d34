// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::time::Duration;

use camino::Utf8PathBuf;
use eyre::WrapErr;

use crate::{
    cli::DocumentArgs,
    clipboard::{Clipboard, CommandClipboard},
    config,
    host::{FileHost, HostFile},
    insert::paste::{PasteHost, PasteStrategy},
    pipeline::{self, run_pass, PassReport},
    progress::TerminalObserver,
    render::{HttpRenderer, Renderer},
    tokenizer::PendingSpan,
};

#[derive(clap::Args)]
pub struct PasteCommand {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Path to the configuration file (e.g., "Texk.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    pub config: Utf8PathBuf,
}

/// Put each rendered image on the clipboard and wait for the operator to
/// paste it next to its marker in the target file.
pub async fn paste(command: &PasteCommand) -> eyre::Result<()> {
    let args = &command.document;
    let config = config::load_config(&command.config)?;
    let renderer = HttpRenderer::new(&config.renderer)?;

    let mut file = HostFile::open(&args.file, args.fragment)?;
    let spans = pipeline::prepare(file.region_mut())?;
    let target = args.target();
    if target != args.file.as_path() {
        file.save_to(target)?;
        file = HostFile::open(target, args.fragment)?;
    }

    let clipboard = CommandClipboard::new(config.paste.clipboard_command.clone());
    paste_into(&renderer, file, &spans, clipboard, config.paste.wait()).await?;
    Ok(())
}

/// Run a paste pass over `file` and save it afterwards, also when the pass
/// stopped early.
pub(crate) async fn paste_into<R: Renderer, C: Clipboard>(
    renderer: &R,
    file: HostFile,
    spans: &[PendingSpan],
    clipboard: C,
    wait: Duration,
) -> eyre::Result<PassReport> {
    let target = file.path().to_owned();
    let mut strategy = PasteStrategy::new(FileHost::new(file), clipboard, wait);
    let result = run_pass(renderer, &mut strategy, spans, &mut TerminalObserver::default()).await;

    let mut host = strategy.into_host();
    host.flush()
        .wrap_err_with(|| eyre::eyre!("failed to save `{}`", target))?;
    result.wrap_err_with(|| eyre::eyre!("paste pass over `{}` stopped", target))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        error::TexkError, insert::paste::tests::OnceClipboard, pipeline::tests::StubRenderer,
    };

    #[tokio::test(start_paused = true)]
    async fn test_stopped_pass_still_saves_the_file() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("body.html")).unwrap();
        fs::write(&path, "$a$ and $b$ and $c$").unwrap();

        let mut file = HostFile::open(&path, true).unwrap();
        let spans = pipeline::prepare(file.region_mut()).unwrap();
        let err = paste_into(
            &StubRenderer::default(),
            file,
            &spans,
            OnceClipboard::default(),
            Duration::from_millis(1600),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TexkError>(),
            Some(TexkError::ClipboardWriteBlocked(_))
        ));
        // The first marker was on disk during the wait; the final save reverts it.
        let saved = fs::read_to_string(&path).unwrap();
        assert_eq!(saved.matches(r#"class="texk-eqn""#).count(), 3);
        assert!(!saved.contains("texk-hl"));
    }
}
