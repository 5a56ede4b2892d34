// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use thiserror::Error;

use crate::{clipboard::ClipboardError, render::RenderError};

/// Failures of a conversion or recovery pass.
///
/// The first two are reported before the document is touched. The next two
/// stop a pass midway and keep every span already converted.
#[derive(Debug, Error)]
pub enum TexkError {
    #[error("no editable region found, click in the message body first")]
    NoEditableRegionFound,

    #[error("no $…$ / $$…$$ found")]
    NoMathSpansFound,

    #[error("render failed for equation {index}: {cause}")]
    RenderFailure {
        /// 1-based position of the span in the pass.
        index: usize,
        #[source]
        cause: RenderError,
    },

    #[error("clipboard write blocked: {0}")]
    ClipboardWriteBlocked(#[source] ClipboardError),

    #[error("failed to access host document `{path}`")]
    Host {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
