// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

//! Undo: turn inserted equation images back into `$...$` / `$$...$$` text.

use std::fmt::Display;

use crate::{
    dom::{Document, NodeId},
    metadata::{self, WrapperRecord, WRAPPER_CLASS},
    span::{MathMode, MathSpan},
};

/// Which encoding a recovery pass read from. Exactly one per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Wrapper containers, falling back to their image's `alt` when degraded.
    Wrappers,
    /// No wrapper survived, so bare `<img>` elements with our `alt`.
    BareImages,
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Wrappers => write!(f, "wrappers"),
            Tier::BareImages => write!(f, "bare images"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryReport {
    pub tier: Tier,
    pub restored: usize,
    /// Wrappers left in place because no tex could be recovered from them.
    pub skipped: usize,
}

fn replace_with_source(doc: &mut Document, node: NodeId, span: &MathSpan) {
    let text = doc.create_text(span.to_source());
    doc.replace_with(node, text);
}

/// What a wrapper stands for, from its own record, its image's `alt`, or a
/// partial record, in that order.
fn wrapper_span(doc: &Document, wrap: NodeId) -> Option<MathSpan> {
    let record = WrapperRecord::read(doc, wrap);
    if let Some(span) = record.complete() {
        return Some(span);
    }

    let from_alt = doc
        .elements_by_tag(wrap, "img")
        .first()
        .and_then(|&img| doc.attr(img, "alt"))
        .and_then(metadata::decode);
    if from_alt.is_some() {
        return from_alt;
    }

    let tex = record.tex.filter(|t| !t.is_empty())?;
    Some(MathSpan::new(tex, record.mode.unwrap_or(MathMode::Inline)))
}

pub fn restore_tex(doc: &mut Document) -> RecoveryReport {
    let root = doc.root();
    let wraps = doc.elements_by_class(root, Some("span"), WRAPPER_CLASS);

    if !wraps.is_empty() {
        let mut report = RecoveryReport {
            tier: Tier::Wrappers,
            restored: 0,
            skipped: 0,
        };
        for wrap in wraps {
            // Nested wrappers go with their outer one.
            if !doc.is_connected(wrap) {
                continue;
            }
            match wrapper_span(doc, wrap) {
                Some(span) => {
                    replace_with_source(doc, wrap, &span);
                    report.restored += 1;
                }
                None => {
                    tracing::warn!(html = %doc.outer_html(wrap), "wrapper lost its tex, left in place");
                    report.skipped += 1;
                }
            }
        }
        return report;
    }

    let mut report = RecoveryReport {
        tier: Tier::BareImages,
        restored: 0,
        skipped: 0,
    };
    for img in doc.elements_by_tag(root, "img") {
        let Some(span) = doc.attr(img, "alt").and_then(metadata::decode) else {
            continue;
        };
        replace_with_source(doc, img, &span);
        report.restored += 1;
    }
    report
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn undo(html: &str) -> (RecoveryReport, String) {
        let mut doc = Document::parse_fragment(html);
        let report = restore_tex(&mut doc);
        (report, doc.inner_html(doc.root()))
    }

    #[test]
    fn test_wrappers_restore_with_delimiters() {
        let (report, html) = undo(concat!(
            r#"<p>A <span class="texk-png-wrap" data-tex="x%5E2" data-display="false"><img alt="texk:i:x^2"></span>"#,
            r#" B <span class="texk-png-wrap" data-tex="%5Cfrac%7B1%7D%7B2%7D" data-display="true"><img></span></p>"#
        ));
        assert_eq!(report.tier, Tier::Wrappers);
        assert_eq!(report.restored, 2);
        assert_eq!(html, r"<p>A $x^2$ B $$\frac{1}{2}$$</p>");
    }

    #[test]
    fn test_bare_images_only_without_wrappers() {
        let (report, html) = undo(r#"see <img src="cid:1" alt="texk:d:a+b"> here"#);
        assert_eq!(
            report,
            RecoveryReport {
                tier: Tier::BareImages,
                restored: 1,
                skipped: 0
            }
        );
        assert_eq!(html, "see $$a+b$$ here");
    }

    #[test]
    fn test_stray_image_survives_wrapper_tier() {
        let (report, html) = undo(concat!(
            r#"<span class="texk-png-wrap" data-tex="a" data-display="false"><img alt="texk:i:a"></span>"#,
            r#"<img src="cat.jpg" alt="a cat"><img src="cid:2" alt="texk:i:b">"#
        ));
        assert_eq!(report.tier, Tier::Wrappers);
        assert_eq!(report.restored, 1);
        assert_eq!(
            html,
            r#"$a$<img src="cat.jpg" alt="a cat"><img src="cid:2" alt="texk:i:b">"#
        );
    }

    #[test]
    fn test_wrapper_without_mode_uses_image_alt() {
        let (report, html) = undo(r#"<span class="texk-png-wrap" data-tex="y"><img alt="texk:d:y"></span>"#);
        assert_eq!(report.restored, 1);
        assert_eq!(html, "$$y$$");
    }

    #[test]
    fn test_partial_record_without_image_metadata() {
        let (report, html) = undo(r#"<span class="texk-png-wrap" data-tex="z"><img alt=""></span>"#);
        assert_eq!(report.restored, 1);
        assert_eq!(html, "$z$");
    }

    #[test]
    fn test_wrapper_with_nothing_left_is_skipped() {
        let (report, html) = undo(concat!(
            r#"<span class="texk-png-wrap"><img src="x.png"></span>"#,
            r#" <span class="texk-png-wrap" data-tex="k" data-display="true"><img></span>"#
        ));
        assert_eq!(
            report,
            RecoveryReport {
                tier: Tier::Wrappers,
                restored: 1,
                skipped: 1
            }
        );
        assert_eq!(
            html,
            r#"<span class="texk-png-wrap"><img src="x.png"></span> $$k$$"#
        );
    }

    #[test]
    fn test_nothing_to_restore() {
        let (report, html) = undo(r#"<p><img src="cat.jpg" alt="a cat"></p>"#);
        assert_eq!(report.tier, Tier::BareImages);
        assert_eq!(report.restored, 0);
        assert_eq!(html, r#"<p><img src="cat.jpg" alt="a cat"></p>"#);
    }
}
