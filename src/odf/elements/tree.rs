//! Arena-backed XML tree for ODF parts.
//!
//! Every node of a parsed part lives in one `Vec` and is addressed by a
//! [`NodeId`]. Text is stored as separate child nodes, which gives the
//! mixed-content model ODF paragraphs need: an element's *text* is the text
//! node before its first child element, its *tail* is the text node that
//! directly follows it in its parent.
//!
//! Nodes that get detached stay in the arena; a tree is never compacted
//! while handles into it are alive.

use crate::common::xml::{escape_xml, unescape_xml};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const INDENT: &str = "  ";

/// Handle to a node inside one [`XmlTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Where a node is attached relative to a target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    /// Before the target's existing children
    FirstChild,
    /// After the target's existing children
    #[default]
    LastChild,
    /// Right after the target, under the target's parent
    NextSibling,
    /// Right before the target, under the target's parent
    PreviousSibling,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed XML document (or detached fragment) with a single root element.
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl XmlTree {
    /// Create a tree holding a single empty root element.
    pub fn with_root(name: &str) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.create_element(name);
        tree
    }

    /// Parse XML bytes into a tree.
    ///
    /// Comments, processing instructions and the XML declaration are not
    /// kept. Whitespace-only text containing a line break is treated as
    /// indentation and dropped, so pretty-printed input re-serializes
    /// cleanly.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(bytes)
            .map_err(|_| Error::InvalidFormat("Invalid UTF-8 in XML content".to_string()))?;
        Self::parse_str(content)
    }

    /// Parse an XML string into a tree.
    pub fn parse_str(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let id = tree.element_from_start(e)?;
                    if let Some(&parent) = stack.last() {
                        tree.attach(parent, id, None);
                    } else if root.is_none() {
                        root = Some(id);
                    } else {
                        return Err(Error::XmlError("multiple root elements".to_string()));
                    }
                    stack.push(id);
                },
                Event::Empty(ref e) => {
                    let id = tree.element_from_start(e)?;
                    if let Some(&parent) = stack.last() {
                        tree.attach(parent, id, None);
                    } else if root.is_none() {
                        root = Some(id);
                    } else {
                        return Err(Error::XmlError("multiple root elements".to_string()));
                    }
                },
                Event::End(_) => {
                    stack.pop();
                },
                Event::Text(ref t) => {
                    if let Some(&parent) = stack.last() {
                        let raw = String::from_utf8(t.to_vec())?;
                        tree.push_text(parent, &unescape_xml(&raw));
                    }
                },
                Event::CData(ref t) => {
                    if let Some(&parent) = stack.last() {
                        let raw = String::from_utf8(t.to_vec())?;
                        tree.push_text(parent, &raw);
                    }
                },
                Event::GeneralRef(ref r) => {
                    if let Some(&parent) = stack.last() {
                        let name = String::from_utf8(r.to_vec())?;
                        tree.push_text(parent, &unescape_xml(&format!("&{name};")));
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        if !stack.is_empty() {
            return Err(Error::XmlError("unexpected end of document".to_string()));
        }
        let root = root.ok_or_else(|| Error::XmlError("No root element found".to_string()))?;
        tree.root = root;
        tree.drop_indentation(root);
        Ok(tree)
    }

    fn element_from_start(&mut self, e: &BytesStart<'_>) -> Result<NodeId> {
        let name = String::from_utf8(e.name().as_ref().to_vec())?;
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())?;
            let value = String::from_utf8(attr.value.to_vec())?;
            attributes.push((key, unescape_xml(&value)));
        }
        Ok(self.push_node(NodeData::Element { name, attributes }))
    }

    // Adjacent text events (split around entity references) merge into one node.
    fn push_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last()
            && let NodeData::Text(existing) = &mut self.nodes[last.0].data
        {
            existing.push_str(text);
            return;
        }
        let id = self.push_node(NodeData::Text(text.to_string()));
        self.attach(parent, id, None);
    }

    fn drop_indentation(&mut self, id: NodeId) {
        let children = self.nodes[id.0].children.clone();
        let kept: Vec<NodeId> = children
            .into_iter()
            .filter(|child| match &self.nodes[child.0].data {
                NodeData::Text(t) => !(t.contains('\n') && t.trim().is_empty()),
                NodeData::Element { .. } => true,
            })
            .collect();
        for child in &kept {
            if self.is_element(*child) {
                self.drop_indentation(*child);
            }
        }
        self.nodes[id.0].children = kept;
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        match index {
            Some(i) if i <= children.len() => children.insert(i, child),
            _ => children.push(child),
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push_node(NodeData::Element {
            name: name.to_string(),
            attributes: Vec::new(),
        })
    }

    /// Root element of the tree.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!("node {} does not belong to this tree", id.0)))
        }
    }

    /// Whether the node is an element (as opposed to text).
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0).map(|n| &n.data), Some(NodeData::Element { .. }))
    }

    /// Qualified tag name of an element node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element { name, .. } => Some(name),
            NodeData::Text(_) => None,
        }
    }

    /// Parent of a node, `None` for the root and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    /// All attributes of an element in document order.
    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        match self.nodes.get(id.0).map(|n| &n.data) {
            Some(NodeData::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    /// Value of one attribute.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set (or replace) an attribute, keeping its original position.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.check(id)?;
        match &mut self.nodes[id.0].data {
            NodeData::Element { attributes, .. } => {
                if let Some(slot) = attributes.iter_mut().find(|(key, _)| key == name) {
                    slot.1 = value.to_string();
                } else {
                    attributes.push((name.to_string(), value.to_string()));
                }
                Ok(())
            },
            NodeData::Text(_) => Err(Error::InvalidArgument(
                "text nodes carry no attributes".to_string(),
            )),
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(Node {
            data: NodeData::Element { attributes, .. },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            attributes.retain(|(key, _)| key != name);
        }
    }

    /// Direct children (elements and text nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Direct child elements.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).iter().copied().filter(|c| self.is_element(*c))
    }

    /// Descendant elements in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.is_element(node) {
                out.push(node);
                stack.extend(self.children(node).iter().rev().copied());
            }
        }
        out
    }

    /// Leading text of an element: the text before its first child element.
    pub fn text(&self, id: NodeId) -> &str {
        match self.children(id).first().map(|c| &self.nodes[c.0].data) {
            Some(NodeData::Text(text)) => text,
            _ => "",
        }
    }

    /// Replace the leading text of an element. An empty string removes it.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.check(id)?;
        if !self.is_element(id) {
            return Err(Error::InvalidArgument("cannot set text on a text node".to_string()));
        }
        let first = self.nodes[id.0].children.first().copied();
        match first {
            Some(node) if !self.is_element(node) => {
                if text.is_empty() {
                    self.detach(node);
                } else {
                    self.nodes[node.0].data = NodeData::Text(text.to_string());
                }
            },
            _ if text.is_empty() => {},
            _ => {
                let node = self.push_node(NodeData::Text(text.to_string()));
                self.attach(id, node, Some(0));
            },
        }
        Ok(())
    }

    /// Text that directly follows an element inside its parent.
    pub fn tail(&self, id: NodeId) -> &str {
        let Some(parent) = self.parent(id) else {
            return "";
        };
        let siblings = self.children(parent);
        let next = siblings
            .iter()
            .position(|c| *c == id)
            .and_then(|i| siblings.get(i + 1));
        match next.map(|n| &self.nodes[n.0].data) {
            Some(NodeData::Text(text)) => text,
            _ => "",
        }
    }

    /// Replace the text that directly follows an attached element.
    pub fn set_tail(&mut self, id: NodeId, text: &str) -> Result<()> {
        let parent = self.parent(id).ok_or_else(|| {
            Error::InvalidArgument("a detached node has no tail text".to_string())
        })?;
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == id)
            .ok_or_else(|| Error::InvalidFormat("node missing from its parent".to_string()))?;
        let next = self.nodes[parent.0].children.get(index + 1).copied();
        match next {
            Some(node) if !self.is_element(node) => {
                if text.is_empty() {
                    self.detach(node);
                } else {
                    self.nodes[node.0].data = NodeData::Text(text.to_string());
                }
            },
            _ if text.is_empty() => {},
            _ => {
                let node = self.push_node(NodeData::Text(text.to_string()));
                self.attach(parent, node, Some(index + 1));
            },
        }
        Ok(())
    }

    /// All text below an element, concatenated in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.nodes.get(id.0).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element { .. }) => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            },
            None => {},
        }
    }

    /// Deep-copy a subtree of `source` into this arena, detached.
    pub fn graft(&mut self, source: &XmlTree, node: NodeId) -> NodeId {
        let copy = self.push_node(source.nodes[node.0].data.clone());
        for child in source.children(node) {
            let child_copy = self.graft(source, *child);
            self.attach(copy, child_copy, None);
        }
        copy
    }

    /// Attach a detached node relative to `target`.
    pub fn insert(&mut self, node: NodeId, target: NodeId, position: InsertPosition) -> Result<()> {
        self.check(node)?;
        self.check(target)?;
        if !self.is_element(target) {
            return Err(Error::InvalidArgument("insertion target must be an element".to_string()));
        }
        self.detach(node);
        match position {
            InsertPosition::FirstChild => self.attach(target, node, Some(0)),
            InsertPosition::LastChild => self.attach(target, node, None),
            InsertPosition::NextSibling | InsertPosition::PreviousSibling => {
                let parent = self.parent(target).ok_or_else(|| {
                    Error::InvalidArgument("the root element has no siblings".to_string())
                })?;
                let index = self.nodes[parent.0]
                    .children
                    .iter()
                    .position(|c| *c == target)
                    .ok_or_else(|| Error::InvalidFormat("node missing from its parent".to_string()))?;
                let at = if position == InsertPosition::NextSibling { index + 1 } else { index };
                self.attach(parent, node, Some(at));
            },
        }
        Ok(())
    }

    /// Serialize the whole tree, with the XML declaration.
    pub fn serialize(&self, pretty: bool) -> String {
        let mut out = String::with_capacity(self.nodes.len() * 32);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        self.write_node(self.root, &mut out, pretty, 0);
        if pretty {
            out.push('\n');
        }
        out
    }

    /// Serialize one subtree, without declaration.
    pub fn node_to_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out, false, 0);
        out
    }

    fn write_node(&self, id: NodeId, output: &mut String, pretty: bool, depth: usize) {
        let (name, attributes) = match &self.nodes[id.0].data {
            NodeData::Text(text) => {
                output.push_str(&escape_xml(text));
                return;
            },
            NodeData::Element { name, attributes } => (name, attributes),
        };

        output.push('<');
        output.push_str(name);
        for (key, value) in attributes {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape_xml(value));
            output.push('"');
        }

        let children = &self.nodes[id.0].children;
        if children.is_empty() {
            output.push_str("/>");
            return;
        }
        output.push('>');

        // Mixed content is written verbatim: indentation there would change text.
        let indent_children = pretty && children.iter().all(|c| self.is_element(*c));
        for child in children {
            if indent_children {
                output.push('\n');
                output.push_str(&INDENT.repeat(depth + 1));
            }
            self.write_node(*child, output, pretty, depth + 1);
        }
        if indent_children {
            output.push('\n');
            output.push_str(&INDENT.repeat(depth));
        }

        output.push_str("</");
        output.push_str(name);
        output.push('>');
    }
}

/// Read-only view of one element inside a tree.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    tree: &'a XmlTree,
    node: NodeId,
}

impl<'a> ElementView<'a> {
    pub(crate) fn new(tree: &'a XmlTree, node: NodeId) -> Self {
        Self { tree, node }
    }

    /// Node handle within the tree.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Qualified tag name, e.g. `text:p`.
    pub fn tag_name(&self) -> &'a str {
        self.tree.name(self.node).unwrap_or_default()
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.tree.attribute(self.node, name)
    }

    pub fn attributes(&self) -> &'a [(String, String)] {
        self.tree.attributes(self.node)
    }

    /// Leading text (before the first child element).
    pub fn text(&self) -> &'a str {
        self.tree.text(self.node)
    }

    /// Text following this element inside its parent.
    pub fn tail(&self) -> &'a str {
        self.tree.tail(self.node)
    }

    /// All descendant text concatenated.
    pub fn text_content(&self) -> String {
        self.tree.text_content(self.node)
    }

    /// Child elements, in order.
    pub fn children(&self) -> Vec<ElementView<'a>> {
        self.tree
            .child_elements(self.node)
            .map(|child| ElementView::new(self.tree, child))
            .collect()
    }

    /// First child element with the given tag.
    pub fn child(&self, tag: &str) -> Option<ElementView<'a>> {
        self.children().into_iter().find(|c| c.tag_name() == tag)
    }

    pub fn to_xml_string(&self) -> String {
        self.tree.node_to_string(self.node)
    }
}
