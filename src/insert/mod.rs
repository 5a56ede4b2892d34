// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

pub mod direct;
pub mod paste;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::{
    dom::{Document, NodeId},
    metadata::{self, WrapperRecord, WRAPPER_CLASS},
    span::{MathMode, MathSpan},
};

/// Sizing shared by both strategies. Always wins over whatever the image had.
fn sizing(mode: MathMode) -> &'static [(&'static str, &'static str)] {
    match mode {
        MathMode::Display => &[
            ("height", "2.0em"),
            ("width", "auto"),
            ("max-width", "90%"),
            ("display", "block"),
            ("margin", "0.5em auto"),
            ("vertical-align", "middle"),
        ],
        MathMode::Inline => &[
            ("height", "1em"),
            ("width", "auto"),
            ("max-width", "none"),
            ("display", "inline-block"),
            ("vertical-align", "-0.15em"),
        ],
    }
}

fn parse_style(style: &str) -> IndexMap<String, String> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            (!name.is_empty()).then(|| (name, value.trim().to_string()))
        })
        .collect()
}

pub fn apply_image_style(doc: &mut Document, img: NodeId, mode: MathMode) {
    let mut style = parse_style(doc.attr(img, "style").unwrap_or_default());
    for (name, value) in sizing(mode) {
        style.insert(name.to_string(), value.to_string());
    }
    let style = style
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .join("; ");
    doc.set_attr(img, "style", style);
}

/// Style and tag `img`, then put it inside a fresh wrapper container.
///
/// An attached image is swapped for the wrapper in place. Returns the wrapper.
pub fn wrap_image(doc: &mut Document, img: NodeId, span: &MathSpan) -> NodeId {
    apply_image_style(doc, img, span.mode);
    doc.set_attr(img, "alt", metadata::encode(span));

    let wrap = doc.create_element("span");
    doc.set_attr(wrap, "class", WRAPPER_CLASS);
    WrapperRecord::write(doc, wrap, span);

    if doc.parent(img).is_some() {
        doc.replace_with(img, wrap);
    }
    doc.append_child(wrap, img);
    wrap
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_display_sizing() {
        let mut doc = Document::parse_fragment(r#"<img src="a.png">"#);
        let img = doc.elements_by_tag(doc.root(), "img")[0];
        apply_image_style(&mut doc, img, MathMode::Display);
        assert_eq!(
            doc.attr(img, "style"),
            Some("height: 2.0em; width: auto; max-width: 90%; display: block; margin: 0.5em auto; vertical-align: middle")
        );
    }

    #[test]
    fn test_sizing_overrides_host_style() {
        let mut doc =
            Document::parse_fragment(r#"<img style="border: 0; HEIGHT: 300px; width:120px">"#);
        let img = doc.elements_by_tag(doc.root(), "img")[0];
        apply_image_style(&mut doc, img, MathMode::Inline);
        assert_eq!(
            doc.attr(img, "style"),
            Some("border: 0; height: 1em; width: auto; max-width: none; display: inline-block; vertical-align: -0.15em")
        );
    }

    #[test]
    fn test_wrap_attached_image_in_place() {
        let mut doc = Document::parse_fragment(r#"a <img src="x.png"> b"#);
        let img = doc.elements_by_tag(doc.root(), "img")[0];
        let wrap = wrap_image(&mut doc, img, &MathSpan::inline("x<y"));

        assert_eq!(doc.parent(img), Some(wrap));
        assert_eq!(doc.parent(wrap), Some(doc.root()));
        assert_eq!(
            doc.inner_html(doc.root()),
            concat!(
                r#"a <span class="texk-png-wrap" data-tex="x%3Cy" data-display="false">"#,
                r#"<img src="x.png" style="height: 1em; width: auto; max-width: none; display: inline-block; vertical-align: -0.15em" alt="texk:i:x&lt;y">"#,
                "</span> b"
            )
        );
    }

    #[test]
    fn test_wrap_detached_image() {
        let mut doc = Document::default();
        let img = doc.create_element("img");
        let wrap = wrap_image(&mut doc, img, &MathSpan::display("a"));
        assert!(doc.parent(wrap).is_none());
        assert_eq!(doc.children(wrap), &[img]);
        assert_eq!(doc.attr(img, "alt"), Some("texk:d:a"));
    }
}
