// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::{
    dom::{Document, NodeId},
    error::TexkError,
    insert::paste::PasteHost,
    region::{self, RegionPath},
};

enum Layout {
    /// The whole file is the region's content.
    Fragment,
    /// A saved page holding the region somewhere inside.
    Page { page: Document, path: RegionPath },
}

/// An HTML file on disk and the editable region inside it.
pub struct HostFile {
    path: Utf8PathBuf,
    layout: Layout,
    region: Document,
}

fn host_error(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> TexkError + '_ {
    move |source| TexkError::Host {
        path: path.to_string(),
        source,
    }
}

impl HostFile {
    pub fn open(path: &Utf8Path, fragment: bool) -> Result<Self, TexkError> {
        let html = fs::read_to_string(path).map_err(host_error(path))?;
        let (layout, region) = match fragment {
            true => (Layout::Fragment, Document::parse_fragment(&html)),
            false => {
                let page = Document::parse_document(&html);
                let path = region::resolve(&page)?;
                let region = region::extract(&page, &path)?;
                (Layout::Page { page, path }, region)
            }
        };
        tracing::debug!(file = %path, fragment, "host document opened");
        Ok(Self {
            path: path.to_owned(),
            layout,
            region,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.layout, Layout::Fragment)
    }

    pub fn region(&self) -> &Document {
        &self.region
    }

    pub fn region_mut(&mut self) -> &mut Document {
        &mut self.region
    }

    /// The file's content with the current region in place.
    pub fn to_html(&self) -> String {
        match &self.layout {
            Layout::Fragment => self.region.inner_html(self.region.root()),
            Layout::Page { page, path } => {
                let mut page = page.clone();
                region::write_back(&mut page, path, &self.region);
                page.to_html()
            }
        }
    }

    pub fn save(&self) -> Result<(), TexkError> {
        self.save_to(&self.path)
    }

    pub fn save_to(&self, path: &Utf8Path) -> Result<(), TexkError> {
        fs::write(path, self.to_html()).map_err(host_error(path))?;
        tracing::debug!(file = %path, "host document written");
        Ok(())
    }
}

/// A [`PasteHost`] backed by a file the operator edits in another program.
///
/// The region is written out before each wait and read back after it, so
/// whatever the editor saved in between is what the heuristic sees.
pub struct FileHost {
    file: HostFile,
}

impl FileHost {
    pub fn new(file: HostFile) -> Self {
        Self { file }
    }
}

impl PasteHost for FileHost {
    fn document_mut(&mut self) -> &mut Document {
        self.file.region_mut()
    }

    fn place_caret_after(&mut self, node: NodeId) {
        let doc = self.file.region();
        tracing::info!(
            file = %self.file.path(),
            marker = %doc.text_content(node),
            "paste the clipboard image right after the marker and save"
        );
    }

    fn flush(&mut self) -> Result<(), TexkError> {
        self.file.save()
    }

    fn reload(&mut self) -> Result<(), TexkError> {
        self.file = HostFile::open(self.file.path(), self.file.is_fragment())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_fragment_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "body.html", "<p>Let $x$ be</p>");
        let mut file = HostFile::open(&path, true).unwrap();

        let root = file.region().root();
        file.region_mut().set_inner_html(root, "<p>changed</p>");
        file.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>changed</p>");
    }

    #[test]
    fn test_fragment_save_keeps_leading_markup() {
        let dir = TempDir::new().unwrap();
        let content = "<!--[if mso]><style>p{margin:0}</style><![endif]-->\n<style>b{}</style><p>hi</p>";
        let path = write_file(&dir, "body.html", content);
        HostFile::open(&path, true).unwrap().save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_page_region_keeps_leading_markup() {
        let dir = TempDir::new().unwrap();
        let page = r#"<html><head></head><body><div contenteditable="true"><!-- sig --><style>p{}</style><p>$a$</p></div></body></html>"#;
        let path = write_file(&dir, "compose.html", page);
        let file = HostFile::open(&path, false).unwrap();
        assert_eq!(
            file.region().inner_html(file.region().root()),
            "<!-- sig --><style>p{}</style><p>$a$</p>"
        );
        assert_eq!(file.to_html(), page);
    }

    #[test]
    fn test_page_keeps_everything_outside_the_region() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "compose.html",
            r#"<!DOCTYPE html><html><head><title>Mail</title></head><body><div id="to">bob</div><div contenteditable="true">$a$</div></body></html>"#,
        );
        let mut file = HostFile::open(&path, false).unwrap();
        assert_eq!(file.region().inner_html(file.region().root()), "$a$");

        let root = file.region().root();
        file.region_mut().set_inner_html(root, "<b>a</b>");
        assert_eq!(
            file.to_html(),
            r#"<!DOCTYPE html><html><head><title>Mail</title></head><body><div id="to">bob</div><div contenteditable="true"><b>a</b></div></body></html>"#
        );
    }

    #[test]
    fn test_page_without_region() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "static.html", "<p>nothing editable</p>");
        assert!(matches!(
            HostFile::open(&path, false),
            Err(TexkError::NoEditableRegionFound)
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("gone.html")).unwrap();
        assert!(matches!(
            HostFile::open(&path, true),
            Err(TexkError::Host { .. })
        ));
    }

    #[test]
    fn test_file_host_sees_external_edits() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "body.html", "before");
        let mut host = FileHost::new(HostFile::open(&path, true).unwrap());

        host.flush().unwrap();
        fs::write(&path, r#"before<img src="cid:1">"#).unwrap();
        host.reload().unwrap();

        let doc = host.document_mut();
        assert_eq!(doc.elements_by_tag(doc.root(), "img").len(), 1);
    }
}
