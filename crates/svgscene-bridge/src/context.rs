// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use url::{Position, Url};

use crate::svgtree::{Document, SvgNode};
use crate::units::State;
use crate::{Error, Options};

/// A set of documents and options shared by all bridges during a single build.
///
/// External documents are never loaded implicitly. A reference to another file
/// can be resolved only when that document was registered via [`BridgeContext::add_document`].
#[derive(Debug)]
pub struct BridgeContext<'a> {
    doc: &'a Document,
    opt: &'a Options,
    external: Vec<&'a Document>,
}

impl<'a> BridgeContext<'a> {
    /// Creates a new context for the main document.
    pub fn new(doc: &'a Document, opt: &'a Options) -> Self {
        BridgeContext {
            doc,
            opt,
            external: Vec::new(),
        }
    }

    /// Registers an additional document that can be referenced by URL.
    pub fn add_document(&mut self, doc: &'a Document) {
        self.external.push(doc);
    }

    /// Returns the main document.
    #[inline]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Returns processing options.
    #[inline]
    pub fn options(&self) -> &'a Options {
        self.opt
    }

    /// Resolves a reference against the URL of the document that owns `node`.
    pub fn resolve_href(&self, node: SvgNode, href: &str) -> Result<Url, Error> {
        node.document()
            .url()
            .join(href)
            .map_err(|cause| Error::MalformedReference {
                href: href.to_string(),
                cause,
            })
    }

    /// Returns an element referenced by `url`.
    ///
    /// A URL without a fragment references the root element.
    pub fn referenced_element(&self, source: SvgNode<'a>, url: &Url) -> Result<SvgNode<'a>, Error> {
        let missing = || Error::MissingReference {
            href: url.to_string(),
        };

        let doc = if is_same_file(url, source.document().url()) {
            source.document()
        } else {
            std::iter::once(self.doc)
                .chain(self.external.iter().copied())
                .find(|doc| is_same_file(url, doc.url()))
                .ok_or_else(missing)?
        };

        match url.fragment() {
            Some(id) => doc.element_by_id(id).ok_or_else(missing),
            None => Ok(doc.root_element()),
        }
    }

    pub(crate) fn state(&self, doc: &Document) -> State {
        State::new(doc, self.opt)
    }
}

/// Checks that both URLs point to the same file, ignoring fragments.
pub fn is_same_file(a: &Url, b: &Url) -> bool {
    a[..Position::AfterQuery] == b[..Position::AfterQuery]
}

/// Checks that both URLs point to the same element of the same file.
pub fn is_same_reference(a: &Url, b: &Url) -> bool {
    is_same_file(a, b) && a.fragment() == b.fragment()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_file() {
        let a = Url::parse("file:///tmp/a.svg#f1").unwrap();
        let b = Url::parse("file:///tmp/a.svg#f2").unwrap();
        let c = Url::parse("file:///tmp/b.svg#f1").unwrap();
        assert!(is_same_file(&a, &b));
        assert!(!is_same_reference(&a, &b));
        assert!(!is_same_file(&a, &c));
        assert!(is_same_reference(&a, &a.clone()));
    }

    #[test]
    fn resolve_against_blank_document() {
        let doc = Document::from_str(
            "<svg xmlns='http://www.w3.org/2000/svg' id='root'/>",
            &Options::default(),
        )
        .unwrap();
        let opt = Options::default();
        let ctx = BridgeContext::new(&doc, &opt);
        let root = doc.root_element();

        let url = ctx.resolve_href(root, "#root").unwrap();
        assert_eq!(ctx.referenced_element(root, &url).unwrap(), root);

        match ctx.resolve_href(root, "other.svg#a") {
            Err(Error::MalformedReference { href, .. }) => assert_eq!(href, "other.svg#a"),
            _ => panic!("an error expected"),
        }
    }
}
