// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

//! Arena-backed editable document.
//!
//! Node handles are plain indices into the arena. A replaced or removed node
//! is only detached from its parent, so every [`NodeId`] captured before a pass
//! stays valid for the whole lifetime of the [`Document`].

use std::fmt::Write;

use html5ever::{
    ns, parse_document, parse_fragment, tendril::TendrilSink, LocalName, ParseOpts, QualName,
};
use indexmap::IndexMap;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: [&str; 6] = ["script", "style", "xmp", "iframe", "noembed", "noframes"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Element(Element),
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: vec![],
            }],
            root: NodeId(0),
        }
    }
}

impl Document {
    /// Parse markup as the content of an editable element, e.g. a `<body>` or a
    /// `contenteditable` `<div>`.
    pub fn parse_fragment(html: &str) -> Document {
        let context = QualName::new(None, ns!(html), LocalName::from("body"));
        let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![], false)
            .one(html);
        let mut doc = Document::default();
        let root = doc.root;
        // The fragment sits under a synthetic `<html>` element.
        for context_root in dom.document.children.borrow().iter() {
            for child in context_root.children.borrow().iter() {
                doc.import_handle(root, child);
            }
        }
        doc
    }

    /// Parse a complete page, keeping its doctype and `<html>` element.
    pub fn parse_document(html: &str) -> Document {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        let mut doc = Document::default();
        let root = doc.root;
        for child in dom.document.children.borrow().iter() {
            doc.import_handle(root, child);
        }
        doc
    }

    fn import_handle(&mut self, parent: NodeId, handle: &Handle) {
        let kind = match &handle.data {
            NodeData::Element { name, attrs, .. } => NodeKind::Element(Element {
                tag: name.local.to_string(),
                attrs: attrs
                    .borrow()
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect(),
            }),
            NodeData::Text { contents } => NodeKind::Text(contents.borrow().to_string()),
            NodeData::Comment { contents } => NodeKind::Comment(contents.to_string()),
            NodeData::Doctype { name, .. } => NodeKind::Doctype(name.to_string()),
            _ => return,
        };
        let id = self.push(kind);
        self.append_child(parent, id);
        for child in handle.children.borrow().iter() {
            self.import_handle(id, child);
        }
    }

    fn import_from(&mut self, parent: NodeId, other: &Document, from: NodeId) {
        let id = self.push(other.node(from).kind.clone());
        self.append_child(parent, id);
        for &child in &other.node(from).children {
            self.import_from(id, other, child);
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: vec![],
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id).kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|e| e.attrs.get(name))
            .map(|s| s.as_str())
    }

    pub fn set_attr<V: Into<String>>(&mut self, id: NodeId, name: &str, value: V) {
        if let Some(e) = self.element_mut(id) {
            e.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)
            .and_then(|e| e.attrs.shift_remove(name))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    /// Whether the node is still reachable from the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    /// Parent, grandparent and so on, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_inside(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Descendants of `scope` in document order, `scope` excluded.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    pub fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.is_tag(id, tag))
            .collect()
    }

    pub fn elements_by_class(&self, scope: NodeId, tag: Option<&str>, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| {
                self.element(id).is_some_and(|e| {
                    e.has_class(class) && tag.is_none_or(|t| e.tag.eq_ignore_ascii_case(t))
                })
            })
            .collect()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Text(t) => t.clone(),
            NodeKind::Comment(_) | NodeKind::Doctype(_) => String::new(),
            _ => self
                .descendants(id)
                .into_iter()
                .filter_map(|d| match self.kind(d) {
                    NodeKind::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element {
            tag: tag.to_string(),
            attrs: IndexMap::new(),
        }))
    }

    pub fn create_text<S: Into<String>>(&mut self, text: S) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Detach a node from its parent. The node and its subtree stay in the arena.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn insert_at(&mut self, reference: NodeId, node: NodeId, offset: usize) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.remove(node);
        let siblings = &mut self.node_mut(parent).children;
        let pos = siblings
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(siblings.len());
        siblings.insert(pos + offset, node);
        self.node_mut(node).parent = Some(parent);
    }

    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        self.insert_at(reference, node, 0);
    }

    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        self.insert_at(reference, node, 1);
    }

    /// Put `new` where `old` is and detach `old`.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        if self.parent(old).is_none() || old == new {
            return;
        }
        self.insert_before(old, new);
        self.remove(old);
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Replace every child of `id` with the nodes parsed from `html`.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
        let fragment = Document::parse_fragment(html);
        for &child in fragment.children(fragment.root) {
            self.import_from(id, &fragment, child);
        }
    }

    /// Serialize the whole document, including doctype when present.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root)
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Root => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeKind::Text(text) => {
                let raw = self
                    .parent(id)
                    .and_then(|p| self.tag(p))
                    .is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&htmlize::escape_text(text).replace('\u{a0}', "&nbsp;"));
                }
            }
            NodeKind::Comment(text) => {
                let _ = write!(out, "<!--{}-->", text);
            }
            NodeKind::Doctype(name) => {
                let _ = write!(out, "<!DOCTYPE {}>", name);
            }
            NodeKind::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                for (name, value) in &e.attrs {
                    let value = htmlize::escape_attribute(value).replace('\u{a0}', "&nbsp;");
                    let _ = write!(out, r#" {}="{}""#, name, value);
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&e.tag.as_str()) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{}>", e.tag);
            }
        }
    }
}
