// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

//! The two in-document encodings of a math span.
//!
//! The image `alt` carries `texk:<flag>:<tex>`, the wrapper container carries
//! `data-tex` (percent-encoded) and `data-display`. Sanitizers strip the two
//! independently, so both are always written.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{
    dom::{Document, NodeId},
    span::{MathMode, MathSpan},
};

pub const NAMESPACE: &str = "texk";

pub const PLACEHOLDER_CLASS: &str = "texk-eqn";
pub const MARKER_CLASS: &str = "texk-hl";
pub const WRAPPER_CLASS: &str = "texk-png-wrap";

pub const TEX_ATTR: &str = "data-tex";
pub const DISPLAY_ATTR: &str = "data-display";

/// The `encodeURIComponent` set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode a span as `texk:d:<tex>` or `texk:i:<tex>`.
///
/// The tex segment is last and unbounded, so it needs no escaping.
pub fn encode(span: &MathSpan) -> String {
    format!("{}:{}:{}", NAMESPACE, span.mode.flag(), span.tex)
}

/// Inverse of [`encode`]. Anything that is not exactly `texk:` followed by a
/// known flag and `:` is not ours and yields `None`.
pub fn decode(s: &str) -> Option<MathSpan> {
    let rest = s.strip_prefix(NAMESPACE)?.strip_prefix(':')?;
    let mut chars = rest.chars();
    let mode = MathMode::from_flag(chars.next()?)?;
    let tex = chars.as_str().strip_prefix(':')?;
    Some(MathSpan::new(tex, mode))
}

pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// `None` when the decoded bytes are not UTF-8.
pub fn percent_decode(s: &str) -> Option<String> {
    percent_decode_str(s)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// The `data-tex` / `data-display` pair on a wrapper, placeholder or paste marker.
///
/// Either half may have been stripped by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapperRecord {
    pub tex: Option<String>,
    pub mode: Option<MathMode>,
}

impl WrapperRecord {
    pub fn read(doc: &Document, node: NodeId) -> Self {
        let tex = doc.attr(node, TEX_ATTR).and_then(percent_decode);
        let mode = doc
            .attr(node, DISPLAY_ATTR)
            .map(|v| MathMode::from_display(v == "true"));
        Self { tex, mode }
    }

    pub fn write(doc: &mut Document, node: NodeId, span: &MathSpan) {
        doc.set_attr(node, TEX_ATTR, percent_encode(&span.tex));
        doc.set_attr(node, DISPLAY_ATTR, span.mode.attr_value());
    }

    /// Both halves present and the tex non-empty.
    pub fn complete(&self) -> Option<MathSpan> {
        match (&self.tex, self.mode) {
            (Some(tex), Some(mode)) if !tex.is_empty() => Some(MathSpan::new(tex.as_str(), mode)),
            _ => None,
        }
    }

    /// Whatever survived, with an empty tex and inline mode standing in for
    /// the missing halves.
    pub fn lossy(&self) -> MathSpan {
        MathSpan::new(
            self.tex.clone().unwrap_or_default(),
            self.mode.unwrap_or(MathMode::Inline),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_format() {
        assert_eq!(encode(&MathSpan::display("a")), "texk:d:a");
        assert_eq!(encode(&MathSpan::inline("x^2")), "texk:i:x^2");
    }

    #[test]
    fn test_roundtrip_awkward_tex() {
        let samples = [
            "",
            "$",
            "a $b$ c",
            "texk:d:x",
            "::",
            "line\nbreak\r\n",
            "\\frac{1}{2} < 3 & \"q\"",
            "α→β 💡",
        ];
        for tex in samples {
            for mode in [MathMode::Inline, MathMode::Display] {
                let span = MathSpan::new(tex, mode);
                assert_eq!(decode(&encode(&span)), Some(span));
            }
        }
    }

    #[test]
    fn test_decode_rejects_foreign_text() {
        for alt in [
            "",
            "texk",
            "texk:",
            "texk:d",
            "texk:x:a",
            "texk:dd:a",
            "TEXK:d:a",
            " texk:d:a",
            "xtexk:d:a",
            "a photo of a cat",
        ] {
            assert_eq!(decode(alt), None, "{alt:?}");
        }
    }

    #[test]
    fn test_percent_encoding_matches_uri_component() {
        assert_eq!(percent_encode("a b+c"), "a%20b%2Bc");
        assert_eq!(percent_encode("x_{1}"), "x_%7B1%7D");
        assert_eq!(percent_encode("(-_.!~*')"), "(-_.!~*')");
        assert_eq!(percent_encode("é"), "%C3%A9");
        assert_eq!(percent_decode("%C3%A9").as_deref(), Some("é"));
        assert_eq!(percent_decode("%FF"), None);
    }

    #[test]
    fn test_wrapper_record() {
        let mut doc = Document::parse_fragment("<span></span>");
        let node = doc.children(doc.root())[0];
        let span = MathSpan::display("\\sum_{i} x_i");
        WrapperRecord::write(&mut doc, node, &span);

        let record = WrapperRecord::read(&doc, node);
        assert_eq!(record.complete(), Some(span.clone()));

        doc.remove_attr(node, DISPLAY_ATTR);
        let record = WrapperRecord::read(&doc, node);
        assert_eq!(record.complete(), None);
        assert_eq!(record.lossy(), MathSpan::inline(span.tex));
    }
}
