// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

use crate::{
    dom::{Document, NodeId},
    metadata::{percent_encode, WrapperRecord, DISPLAY_ATTR, PLACEHOLDER_CLASS, TEX_ATTR},
    span::MathSpan,
};

/// `$$...$$`, shortest match, may span lines and markup.
static DISPLAY_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\$(.*?)\$\$").expect("display math pattern"));

/// `$...$` on one line whose content does not start with `$`. The leading
/// group keeps a `$` that closes a neighbouring span from opening this one.
///
/// Both patterns run over serialized markup, not text nodes only. A `$` inside
/// an attribute value such as `href="/$p"` can pair with a later `$` and the
/// markup between them is swallowed into the placeholder.
static INLINE_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^$])\$([^$\n]+)\$").expect("inline math pattern"));

/// A placeholder waiting for its image, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSpan {
    pub node: NodeId,
    pub span: MathSpan,
}

pub fn placeholder_html(span: &MathSpan) -> String {
    format!(
        r#"<span class="{}" {}="{}" {}="{}" contenteditable="false">[eqn]</span>"#,
        PLACEHOLDER_CLASS,
        TEX_ATTR,
        percent_encode(&span.tex),
        DISPLAY_ATTR,
        span.mode.attr_value(),
    )
}

/// Node form of [`placeholder_html`], detached.
pub fn create_placeholder(doc: &mut Document, span: &MathSpan) -> NodeId {
    let node = doc.create_element("span");
    doc.set_attr(node, "class", PLACEHOLDER_CLASS);
    WrapperRecord::write(doc, node, span);
    doc.set_attr(node, "contenteditable", "false");
    let text = doc.create_text("[eqn]");
    doc.append_child(node, text);
    node
}

/// The TeX text of a captured span: markup dropped, entities decoded, trimmed.
fn source_text(captured: &str) -> String {
    let fragment = Document::parse_fragment(captured);
    fragment.text_content(fragment.root()).trim().to_string()
}

/// Rewrite every `$$...$$` and then every `$...$` in serialized markup into a
/// placeholder. Text outside the spans is left byte-for-byte intact, and an
/// unmatched trailing `$` stays literal.
pub fn wrap_tex(html: &str) -> String {
    let displayed = DISPLAY_MATH.replace_all(html, |caps: &Captures| {
        placeholder_html(&MathSpan::display(source_text(&caps[1])))
    });

    let mut out = String::with_capacity(displayed.len());
    let mut last = 0;
    for caps in INLINE_MATH.captures_iter(&displayed) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if displayed[whole.end()..].starts_with('$') {
            continue;
        }
        out.push_str(&displayed[last..whole.start()]);
        out.push_str(&caps[1]);
        out.push_str(&placeholder_html(&MathSpan::inline(source_text(&caps[2]))));
        last = whole.end();
    }
    out.push_str(&displayed[last..]);
    out
}

/// Tokenize the region in place.
///
/// Returns `false` without touching anything when the region already holds
/// placeholders, e.g. from an earlier pass that stopped early.
pub fn wrap_tex_in(doc: &mut Document) -> bool {
    let root = doc.root();
    if !doc
        .elements_by_class(root, None, PLACEHOLDER_CLASS)
        .is_empty()
    {
        return false;
    }

    let html = doc.inner_html(root);
    let wrapped = wrap_tex(&html);
    if wrapped != html {
        doc.set_inner_html(root, &wrapped);
    }
    true
}

pub fn pending_spans(doc: &Document) -> Vec<PendingSpan> {
    doc.elements_by_class(doc.root(), Some("span"), PLACEHOLDER_CLASS)
        .into_iter()
        .map(|node| PendingSpan {
            node,
            span: WrapperRecord::read(doc, node).lossy(),
        })
        .collect()
}
