// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

//! Pass sequencing: one render round trip per span, strictly in order.
//!
//! Nothing here knows about markup. The pass stops at the first failure and
//! keeps whatever was already converted.

use crate::{
    dom::Document,
    error::TexkError,
    render::{RasterImage, Renderer},
    tokenizer::{pending_spans, wrap_tex_in, PendingSpan},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub total: usize,
    pub converted: usize,
    pub unresolved: usize,
}

/// Progress of a pass. Indices are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum PassEvent {
    Started { strategy: &'static str, total: usize },
    Rendered { index: usize },
    AwaitingPaste { index: usize },
    Converted { index: usize },
    Unresolved { index: usize },
    Finished(PassReport),
}

pub trait PassObserver {
    fn notify(&mut self, event: &PassEvent);
}

impl PassObserver for Vec<PassEvent> {
    fn notify(&mut self, event: &PassEvent) {
        self.push(event.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Converted,
    /// The span is still pending, e.g. nothing was pasted in time.
    Unresolved,
}

/// Gets a rendered image into the document in place of a pending span.
#[allow(async_fn_in_trait)]
pub trait InsertionStrategy {
    fn name(&self) -> &'static str;

    async fn place(
        &mut self,
        index: usize,
        pending: &PendingSpan,
        image: RasterImage,
        observer: &mut dyn PassObserver,
    ) -> Result<Placement, TexkError>;
}

/// Tokenize the region and collect its pending spans.
pub fn prepare(doc: &mut Document) -> Result<Vec<PendingSpan>, TexkError> {
    if !wrap_tex_in(doc) {
        tracing::debug!("placeholders already present, resuming");
    }
    let spans = pending_spans(doc);
    if spans.is_empty() {
        return Err(TexkError::NoMathSpansFound);
    }
    Ok(spans)
}

pub async fn run_pass<R, S>(
    renderer: &R,
    strategy: &mut S,
    spans: &[PendingSpan],
    observer: &mut dyn PassObserver,
) -> Result<PassReport, TexkError>
where
    R: Renderer,
    S: InsertionStrategy,
{
    let mut report = PassReport {
        total: spans.len(),
        ..PassReport::default()
    };
    observer.notify(&PassEvent::Started {
        strategy: strategy.name(),
        total: report.total,
    });

    for (i, pending) in spans.iter().enumerate() {
        let index = i + 1;
        let image = renderer
            .render(&pending.span)
            .await
            .map_err(|cause| TexkError::RenderFailure { index, cause })?;
        observer.notify(&PassEvent::Rendered { index });

        match strategy.place(index, pending, image, observer).await? {
            Placement::Converted => {
                report.converted += 1;
                observer.notify(&PassEvent::Converted { index });
            }
            Placement::Unresolved => {
                report.unresolved += 1;
                tracing::warn!(index, tex = %pending.span.tex, "span left unresolved");
                observer.notify(&PassEvent::Unresolved { index });
            }
        }
    }

    tracing::info!(
        strategy = strategy.name(),
        converted = report.converted,
        unresolved = report.unresolved,
        "pass finished"
    );
    observer.notify(&PassEvent::Finished(report));
    Ok(report)
}
