// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::{
    io::{ErrorKind, Write},
    process::{Command, ExitStatus, Stdio},
};

use thiserror::Error;

use crate::render::RasterImage;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard command configured")]
    NotConfigured,

    #[error("failed to run `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Rejected { program: String, status: ExitStatus },
}

/// Write-only access to the system clipboard. Reading back is the host's job.
pub trait Clipboard {
    fn write_image(&mut self, image: &RasterImage) -> Result<(), ClipboardError>;
}

/// Pipes the image into an external program such as `wl-copy` or `xclip`.
pub struct CommandClipboard {
    command: Vec<String>,
}

impl CommandClipboard {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Clipboard for CommandClipboard {
    fn write_image(&mut self, image: &RasterImage) -> Result<(), ClipboardError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or(ClipboardError::NotConfigured)?;
        let spawn_error = |source| ClipboardError::Spawn {
            program: program.clone(),
            source,
        };

        // `wl-copy` keeps a background process alive holding inherited pipes,
        // so only stdin is piped.
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&image.bytes) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(spawn_error(e)),
                _ => (),
            }
        }

        let status = child.wait().map_err(spawn_error)?;
        if !status.success() {
            return Err(ClipboardError::Rejected {
                program: program.clone(),
                status,
            });
        }
        tracing::debug!(bytes = image.bytes.len(), "image written to clipboard via `{}`", program);
        Ok(())
    }
}
