// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use crate::{
    dom::Document,
    error::TexkError,
    pipeline::{InsertionStrategy, PassObserver, Placement},
    render::RasterImage,
    tokenizer::PendingSpan,
};

use super::wrap_image;

/// Embeds each image as a `data:` URL. Needs no operator, but some mail
/// servers strip such images on send.
pub struct DirectStrategy<'d> {
    doc: &'d mut Document,
}

impl<'d> DirectStrategy<'d> {
    pub fn new(doc: &'d mut Document) -> Self {
        Self { doc }
    }
}

impl InsertionStrategy for DirectStrategy<'_> {
    fn name(&self) -> &'static str {
        "Auto (data-URI)"
    }

    async fn place(
        &mut self,
        index: usize,
        pending: &PendingSpan,
        image: RasterImage,
        _observer: &mut dyn PassObserver,
    ) -> Result<Placement, TexkError> {
        let doc = &mut *self.doc;
        if !doc.is_connected(pending.node) {
            tracing::warn!(index, "placeholder no longer in the document");
            return Ok(Placement::Unresolved);
        }

        let img = doc.create_element("img");
        doc.set_attr(img, "src", image.to_data_url());
        let wrap = wrap_image(doc, img, &pending.span);
        doc.replace_with(pending.node, wrap);
        tracing::debug!(index, tex = %pending.span.tex, "embedded as data url");
        Ok(Placement::Converted)
    }
}
