// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use eyre::WrapErr;

use crate::{cli::DocumentArgs, host::HostFile, recovery};

#[derive(clap::Args)]
pub struct UndoCommand {
    #[command(flatten)]
    pub document: DocumentArgs,
}

/// Turn equation images back into `$...$` / `$$...$$`.
pub fn undo(command: &UndoCommand) -> eyre::Result<()> {
    let args = &command.document;
    let mut file = HostFile::open(&args.file, args.fragment)?;
    let report = recovery::restore_tex(file.region_mut());
    tracing::debug!(tier = %report.tier, "recovery finished");

    if report.skipped > 0 {
        color_print::ceprintln!(
            "<y>Warning: {} equation image(s) carry no TeX and were left in place.</>",
            report.skipped
        );
    }
    if report.restored == 0 {
        color_print::cprintln!("No TeX-like images found.");
        return Ok(());
    }

    file.save_to(args.target())
        .wrap_err_with(|| eyre::eyre!("failed to save `{}`", args.target()))?;
    color_print::cprintln!("<g>Restored {} equation(s) to TeX.</>", report.restored);
    Ok(())
}
