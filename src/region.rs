// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

//! Finding the editable region of a saved page, possibly inside `<iframe srcdoc>`.

use std::cmp::Reverse;

use crate::{
    dom::{Document, NodeId},
    error::TexkError,
};

/// Where a region lives. Each frame id is valid in the document parsed from
/// the previous frame's `srcdoc` (the first one in the page itself), and
/// `element` in the innermost one. Parsing is deterministic, so re-parsing the
/// same markup yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPath {
    pub frames: Vec<NodeId>,
    pub element: NodeId,
}

fn is_editable(doc: &Document, id: NodeId) -> bool {
    doc.attr(id, "contenteditable")
        .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true"))
}

pub fn resolve(page: &Document) -> Result<RegionPath, TexkError> {
    resolve_in(page).ok_or(TexkError::NoEditableRegionFound)
}

fn resolve_in(doc: &Document) -> Option<RegionPath> {
    let editables: Vec<NodeId> = doc
        .descendants(doc.root())
        .into_iter()
        .filter(|&id| is_editable(doc, id))
        .collect();

    let focused = editables
        .iter()
        .copied()
        .find(|&id| doc.attr(id, "autofocus").is_some());
    let widest = || {
        editables
            .iter()
            .copied()
            .min_by_key(|&id| Reverse(doc.inner_html(id).len()))
    };
    if let Some(element) = focused.or_else(widest) {
        return Some(RegionPath {
            frames: vec![],
            element,
        });
    }

    doc.elements_by_tag(doc.root(), "iframe")
        .into_iter()
        .find_map(|frame| {
            let inner = Document::parse_document(doc.attr(frame, "srcdoc")?);
            let mut path = resolve_in(&inner)?;
            path.frames.insert(0, frame);
            Some(path)
        })
}

/// The region's content as a standalone fragment.
pub fn extract(page: &Document, path: &RegionPath) -> Result<Document, TexkError> {
    let mut current = page.clone();
    for &frame in &path.frames {
        let srcdoc = current
            .attr(frame, "srcdoc")
            .ok_or(TexkError::NoEditableRegionFound)?;
        current = Document::parse_document(srcdoc);
    }
    if !current.is_connected(path.element) {
        return Err(TexkError::NoEditableRegionFound);
    }
    Ok(Document::parse_fragment(
        &current.inner_html(path.element),
    ))
}

/// Put `region` back where [`extract`] took it from, re-serializing every
/// enclosing `srcdoc`.
pub fn write_back(page: &mut Document, path: &RegionPath, region: &Document) {
    let html = region.inner_html(region.root());
    write_into(page, &path.frames, path.element, &html);
}

fn write_into(doc: &mut Document, frames: &[NodeId], element: NodeId, html: &str) {
    match frames.split_first() {
        None => doc.set_inner_html(element, html),
        Some((&frame, rest)) => {
            let Some(srcdoc) = doc.attr(frame, "srcdoc") else {
                return;
            };
            let mut inner = Document::parse_document(srcdoc);
            write_into(&mut inner, rest, element, html);
            doc.set_attr(frame, "srcdoc", inner.to_html());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn region_html(page: &str) -> Option<String> {
        let doc = Document::parse_document(page);
        let path = resolve(&doc).ok()?;
        let region = extract(&doc, &path).ok()?;
        Some(region.inner_html(region.root()))
    }

    #[test]
    fn test_autofocus_wins() {
        let page = concat!(
            r#"<div contenteditable="true">a much longer subject line</div>"#,
            r#"<div contenteditable="true" autofocus>body</div>"#
        );
        assert_eq!(region_html(page).as_deref(), Some("body"));
    }

    #[test]
    fn test_widest_then_first() {
        let page = concat!(
            r#"<div contenteditable="true">to</div>"#,
            r#"<div contenteditable>message body</div>"#,
            r#"<div contenteditable="true">message text</div>"#,
            r#"<div contenteditable="false">not editable at all, and long</div>"#
        );
        assert_eq!(region_html(page).as_deref(), Some("message body"));
    }

    #[test]
    fn test_nested_frames() {
        let inner = r#"<p contenteditable="true">deep $x$</p>"#;
        let middle = format!(
            r#"<iframe srcdoc="{}"></iframe>"#,
            htmlize::escape_attribute(inner)
        );
        let page = format!(
            r#"<p>chrome</p><iframe srcdoc="{}"></iframe>"#,
            htmlize::escape_attribute(&middle)
        );
        assert_eq!(region_html(&page).as_deref(), Some("deep $x$"));
    }

    #[test]
    fn test_no_region() {
        let doc = Document::parse_document("<p>read only</p><iframe src=\"x.html\"></iframe>");
        assert!(matches!(resolve(&doc), Err(TexkError::NoEditableRegionFound)));
    }

    #[test]
    fn test_write_back_through_frames() {
        let inner = r#"<div contenteditable="true">old</div>"#;
        let page_html = format!(
            r#"<iframe srcdoc="{}"></iframe>"#,
            htmlize::escape_attribute(inner)
        );
        let mut page = Document::parse_document(&page_html);
        let path = resolve(&page).unwrap();
        assert_eq!(path.frames.len(), 1);

        let mut region = extract(&page, &path).unwrap();
        let root = region.root();
        region.set_inner_html(root, "<b>new</b>");
        write_back(&mut page, &path, &region);

        let reparsed = Document::parse_document(&page.to_html());
        let again = resolve(&reparsed).unwrap();
        let region = extract(&reparsed, &again).unwrap();
        assert_eq!(region.inner_html(region.root()), "<b>new</b>");
    }
}
