// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use simplecss::Declaration;
use url::Url;

use super::{AId, Attribute, Document, EId, NodeData, NodeId, NodeKind, ShortRange};
use crate::{Error, Options};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NAMESPACE_NS: &str = "http://www.w3.org/XML/1998/namespace";

impl Document {
    /// Parses a [`Document`] from an SVG data.
    ///
    /// Can contain an SVG string or a gzip compressed data.
    pub fn from_data(data: &[u8], opt: &Options) -> Result<Document, Error> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text, opt)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text, opt)
        }
    }

    /// Parses a [`Document`] from an SVG string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str, opt: &Options) -> Result<Document, Error> {
        let xml_opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let xml =
            roxmltree::Document::parse_with_options(text, xml_opt).map_err(Error::ParsingFailed)?;

        Self::parse_tree(&xml, opt.document_url(), opt.style_sheet.as_deref())
    }

    /// Parses a [`Document`] from a [`roxmltree::Document`].
    ///
    /// `style_sheet` is applied after the document's own style sheets.
    pub fn parse_tree(
        xml: &roxmltree::Document,
        url: Url,
        style_sheet: Option<&str>,
    ) -> Result<Document, Error> {
        parse(xml, url, style_sheet)
    }

    fn append(&mut self, parent_id: NodeId, kind: NodeKind) -> NodeId {
        let new_child_id = NodeId::from(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent_id),
            next_sibling: None,
            children: None,
            kind,
        });

        let last_child_id = self.nodes[parent_id.get_usize()].children.map(|(_, id)| id);

        if let Some(id) = last_child_id {
            self.nodes[id.get_usize()].next_sibling = Some(new_child_id);
        }

        self.nodes[parent_id.get_usize()].children = Some(
            if let Some((first_child_id, _)) = self.nodes[parent_id.get_usize()].children {
                (first_child_id, new_child_id)
            } else {
                (new_child_id, new_child_id)
            },
        );

        new_child_id
    }
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}

fn parse(xml: &roxmltree::Document, url: Url, user_css: Option<&str>) -> Result<Document, Error> {
    let mut doc = Document {
        nodes: Vec::new(),
        attrs: Vec::new(),
        links: HashMap::new(),
        url,
    };

    // Add a root node.
    doc.nodes.push(NodeData {
        parent: None,
        next_sibling: None,
        children: None,
        kind: NodeKind::Root,
    });

    let style_sheet = resolve_css(xml, user_css);

    parse_xml_node_children(xml.root(), doc.root().id, &style_sheet, 0, &mut doc)?;

    // Check that the root element is `svg`.
    match doc.root().first_element_child() {
        Some(child) => {
            if child.tag_name() != Some(EId::Svg) {
                return Err(Error::ParsingFailed(roxmltree::Error::NoRootNode));
            }
        }
        None => return Err(Error::ParsingFailed(roxmltree::Error::NoRootNode)),
    }

    // Collect all elements with `id` attribute.
    let mut links = HashMap::new();
    for node in doc.descendants() {
        if let Some(id) = node.raw_attribute(AId::Id) {
            links.insert(id.to_string(), node.id);
        }
    }
    doc.links = links;

    Ok(doc)
}

fn parse_tag_name(node: roxmltree::Node) -> Option<EId> {
    if !node.is_element() {
        return None;
    }

    if node.tag_name().namespace() != Some(SVG_NS) {
        return None;
    }

    EId::from_str(node.tag_name().name())
}

fn parse_xml_node_children(
    parent: roxmltree::Node,
    parent_id: NodeId,
    style_sheet: &simplecss::StyleSheet,
    depth: u32,
    doc: &mut Document,
) -> Result<(), Error> {
    for node in parent.children() {
        parse_xml_node(node, parent_id, style_sheet, depth, doc)?;
    }

    Ok(())
}

fn parse_xml_node(
    node: roxmltree::Node,
    parent_id: NodeId,
    style_sheet: &simplecss::StyleSheet,
    depth: u32,
    doc: &mut Document,
) -> Result<(), Error> {
    if depth > 1024 {
        return Err(Error::ElementsLimitReached);
    }

    let tag_name = match parse_tag_name(node) {
        Some(id) => id,
        None => return Ok(()),
    };

    if tag_name == EId::Style {
        return Ok(());
    }

    let node_id = parse_svg_element(node, parent_id, tag_name, style_sheet, doc)?;
    parse_xml_node_children(node, node_id, style_sheet, depth + 1, doc)
}

fn parse_svg_element(
    xml_node: roxmltree::Node,
    parent_id: NodeId,
    tag_name: EId,
    style_sheet: &simplecss::StyleSheet,
    doc: &mut Document,
) -> Result<NodeId, Error> {
    let attrs_start_idx = doc.attrs.len();

    // Copy presentational attributes first.
    for attr in xml_node.attributes() {
        match attr.namespace() {
            None | Some(SVG_NS) | Some(XLINK_NS) | Some(XML_NAMESPACE_NS) => {}
            _ => continue,
        }

        let aid = match AId::from_str(attr.name()) {
            Some(v) => v,
            None => continue,
        };

        // A plain `href` takes precedence over `xlink:href`.
        if aid == AId::Href
            && attr.namespace() == Some(XLINK_NS)
            && xml_node.has_attribute("href")
        {
            continue;
        }

        append_attribute(parent_id, aid, attr.value(), attrs_start_idx, doc);
    }

    let mut write_declaration = |declaration: &Declaration| {
        if let Some(aid) = AId::from_str(declaration.name) {
            // Parse only the presentation attributes.
            if aid.is_presentation() {
                append_attribute(parent_id, aid, declaration.value, attrs_start_idx, doc);
            }
        }
    };

    // Apply CSS.
    for rule in &style_sheet.rules {
        if rule.selector.matches(&XmlNode(xml_node)) {
            for declaration in &rule.declarations {
                write_declaration(declaration);
            }
        }
    }

    // Split a `style` attribute.
    if let Some(value) = xml_node.attribute("style") {
        for declaration in simplecss::DeclarationTokenizer::from(value) {
            write_declaration(&declaration);
        }
    }

    if doc.nodes.len() > 1_000_000 {
        return Err(Error::ElementsLimitReached);
    }

    let node_id = doc.append(
        parent_id,
        NodeKind::Element {
            tag_name,
            attributes: ShortRange::new(attrs_start_idx as u32, doc.attrs.len() as u32),
        },
    );

    Ok(node_id)
}

// Appends an attribute to the element that is being built,
// replacing a previous value of the same attribute.
fn append_attribute(
    parent_id: NodeId,
    aid: AId,
    value: &str,
    attrs_start_idx: usize,
    doc: &mut Document,
) {
    match aid {
        // The `style` attribute will be split into attributes, so we don't need it.
        AId::Style |
        // No need to copy a `class` attribute since CSS were already resolved.
        AId::Class => return,
        _ => {}
    }

    let value = if aid.is_presentation() && value.trim() == "inherit" {
        match resolve_inherit(parent_id, aid, doc) {
            Some(v) => v,
            None => return,
        }
    } else {
        value.to_string()
    };

    let existing = doc.attrs[attrs_start_idx..]
        .iter_mut()
        .find(|a| a.name == aid);

    match existing {
        Some(attr) => attr.value = value,
        None => doc.attrs.push(Attribute { name: aid, value }),
    }
}

fn resolve_inherit(parent_id: NodeId, aid: AId, doc: &Document) -> Option<String> {
    let parent = doc.get(parent_id);
    let node = if aid.is_inheritable() {
        // Inheritable attributes can inherit a value from an any ancestor.
        parent.ancestors().find(|n| n.has_attribute(aid))
    } else {
        // Non-inheritable attributes can inherit a value only from a direct parent.
        Some(parent).filter(|n| n.has_attribute(aid))
    };

    if let Some(value) = node.and_then(|n| n.raw_attribute(aid)) {
        return Some(value.to_string());
    }

    // Fallback to a default value if possible.
    let value = match aid {
        AId::Filter | AId::Stroke => "none",
        AId::Fill | AId::FloodColor => "black",
        AId::FillOpacity | AId::FloodOpacity | AId::Opacity | AId::StrokeOpacity => "1",
        AId::FillRule => "nonzero",
        AId::Display => "inline",
        AId::StrokeLinecap => "butt",
        AId::StrokeLinejoin => "miter",
        AId::StrokeMiterlimit => "4",
        AId::StrokeWidth => "1",
        AId::Visibility => "visible",
        _ => return None,
    };

    Some(value.to_string())
}

fn resolve_css<'a>(
    xml: &'a roxmltree::Document<'a>,
    user_css: Option<&'a str>,
) -> simplecss::StyleSheet<'a> {
    let mut sheet = simplecss::StyleSheet::new();

    for node in xml.descendants().filter(|n| n.has_tag_name("style")) {
        match node.attribute("type") {
            Some("text/css") => {}
            Some(_) => continue,
            None => {}
        }

        let text = match node.text() {
            Some(v) => v,
            None => continue,
        };

        sheet.parse_more(text);
    }

    if let Some(text) = user_css {
        sheet.parse_more(text);
    }

    sheet
}

struct XmlNode<'a, 'input: 'a>(roxmltree::Node<'a, 'input>);

impl simplecss::Element for XmlNode<'_, '_> {
    fn parent_element(&self) -> Option<Self> {
        self.0.parent_element().map(XmlNode)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.0.prev_sibling_element().map(XmlNode)
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.0.tag_name().name() == local_name
    }

    fn attribute_matches(&self, local_name: &str, operator: simplecss::AttributeOperator) -> bool {
        match self.0.attribute(local_name) {
            Some(value) => operator.matches(value),
            None => false,
        }
    }

    fn pseudo_class_matches(&self, class: simplecss::PseudoClass) -> bool {
        match class {
            simplecss::PseudoClass::FirstChild => self.prev_sibling_element().is_none(),
            // A static document has no dynamic state.
            _ => false,
        }
    }
}
