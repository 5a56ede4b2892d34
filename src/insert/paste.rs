// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

//! Paste-mediated insertion.
//!
//! The image goes to the system clipboard and the operator pastes it next to
//! a visible marker. The host then uploads it the way it uploads any pasted
//! image, which survives sending where `data:` URLs may not.

use std::time::Duration;

use crate::{
    clipboard::Clipboard,
    dom::{Document, NodeId, NodeKind},
    error::TexkError,
    metadata::{WrapperRecord, MARKER_CLASS, PLACEHOLDER_CLASS, WRAPPER_CLASS},
    pipeline::{InsertionStrategy, PassEvent, PassObserver, Placement},
    render::RasterImage,
    tokenizer::{create_placeholder, PendingSpan},
};

use super::wrap_image;

pub const MARKER_TEXT: &str = "[paste image here]";

/// The document an operator is editing while a pass waits for a paste.
///
/// `reload` may re-parse the document, so node ids held across it are not
/// trusted.
pub trait PasteHost {
    fn document_mut(&mut self) -> &mut Document;
    fn place_caret_after(&mut self, node: NodeId);
    /// Make local edits visible to the operator.
    fn flush(&mut self) -> Result<(), TexkError>;
    /// Pick up the operator's edits.
    fn reload(&mut self) -> Result<(), TexkError>;
}

pub struct PasteStrategy<H, C> {
    host: H,
    clipboard: C,
    wait: Duration,
    /// Placeholders earlier in the document that were given back unresolved.
    kept: usize,
}

impl<H: PasteHost, C: Clipboard> PasteStrategy<H, C> {
    pub fn new(host: H, clipboard: C, wait: Duration) -> Self {
        Self {
            host,
            clipboard,
            wait,
            kept: 0,
        }
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Swap the current placeholder for a paste marker.
    fn mark(&mut self, index: usize, pending: &PendingSpan) -> Option<NodeId> {
        let doc = self.host.document_mut();
        let placeholders = doc.elements_by_class(doc.root(), Some("span"), PLACEHOLDER_CLASS);
        let Some(&placeholder) = placeholders.get(self.kept) else {
            tracing::warn!(index, "placeholder no longer in the document");
            return None;
        };

        let marker = doc.create_element("span");
        doc.set_attr(marker, "class", MARKER_CLASS);
        WrapperRecord::write(doc, marker, &pending.span);
        let text = doc.create_text(MARKER_TEXT);
        doc.append_child(marker, text);
        doc.replace_with(placeholder, marker);
        Some(marker)
    }
}

impl<H: PasteHost, C: Clipboard> InsertionStrategy for PasteStrategy<H, C> {
    fn name(&self) -> &'static str {
        "Auto-Paste"
    }

    async fn place(
        &mut self,
        index: usize,
        pending: &PendingSpan,
        image: RasterImage,
        observer: &mut dyn PassObserver,
    ) -> Result<Placement, TexkError> {
        self.clipboard
            .write_image(&image)
            .map_err(TexkError::ClipboardWriteBlocked)?;

        let Some(marker) = self.mark(index, pending) else {
            return Ok(Placement::Unresolved);
        };
        self.host.place_caret_after(marker);
        self.host.flush()?;

        observer.notify(&PassEvent::AwaitingPaste { index });
        tokio::time::sleep(self.wait).await;
        self.host.reload()?;

        let doc = self.host.document_mut();
        let Some(marker) = doc
            .elements_by_class(doc.root(), Some("span"), MARKER_CLASS)
            .first()
            .copied()
        else {
            tracing::warn!(index, "paste marker was removed by the operator");
            return Ok(Placement::Unresolved);
        };

        match nearest_pasted_image(doc, marker) {
            Some(img) => {
                let wrap = wrap_image(doc, img, &pending.span);
                if doc.is_inside(wrap, marker) {
                    doc.insert_after(marker, wrap);
                }
                doc.remove(marker);
                tracing::debug!(index, tex = %pending.span.tex, "pasted image tagged");
                Ok(Placement::Converted)
            }
            None => {
                let placeholder = create_placeholder(doc, &pending.span);
                doc.replace_with(marker, placeholder);
                self.kept += 1;
                Ok(Placement::Unresolved)
            }
        }
    }
}

/// Best guess at the image the operator just pasted for `marker`.
///
/// An `<img>` right next to the marker wins, whitespace skipped. Otherwise the
/// last unwrapped `<img>` in the marker's container is taken. Images already
/// inside a wrapper are never candidates. This is a heuristic: an unrelated
/// image pasted into the same container during the wait is indistinguishable
/// from the rendered one and will be tagged instead.
pub fn nearest_pasted_image(doc: &Document, marker: NodeId) -> Option<NodeId> {
    let is_candidate = |id: NodeId| {
        doc.is_tag(id, "img")
            && !doc
                .ancestors(id)
                .any(|a| doc.element(a).is_some_and(|e| e.has_class(WRAPPER_CLASS)))
    };
    let is_blank = |id: NodeId| matches!(doc.kind(id), NodeKind::Text(t) if t.trim().is_empty());

    let next = std::iter::successors(doc.next_sibling(marker), |&s| doc.next_sibling(s))
        .find(|&s| !is_blank(s));
    let previous =
        std::iter::successors(doc.previous_sibling(marker), |&s| doc.previous_sibling(s))
            .find(|&s| !is_blank(s));
    if let Some(adjacent) = next.into_iter().chain(previous).find(|&s| is_candidate(s)) {
        return Some(adjacent);
    }

    let scope = doc.parent(marker).unwrap_or(doc.root());
    doc.elements_by_tag(scope, "img")
        .into_iter()
        .rev()
        .find(|&img| is_candidate(img))
}
