//! Detached ODF element fragments.
//!
//! The element factory produces [`Element`] values: small self-contained
//! trees that are not yet part of any document. Inserting one into a
//! document copies its nodes into the target part.

use super::tree::{ElementView, NodeId, XmlTree};
use crate::common::Result;

/// A detached ODF element with its subtree.
#[derive(Debug, Clone)]
pub struct Element {
    tree: XmlTree,
}

impl Element {
    /// Create a new empty element
    pub fn new(tag_name: &str) -> Self {
        Self {
            tree: XmlTree::with_root(tag_name),
        }
    }

    /// Create an element from a markup fragment
    pub fn from_xml(markup: &str) -> Result<Self> {
        Ok(Self {
            tree: XmlTree::parse_str(markup)?,
        })
    }

    /// Get the tag name of this element
    pub fn tag_name(&self) -> &str {
        self.tree.name(self.tree.root()).unwrap_or_default()
    }

    /// Get attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.tree.attribute(self.tree.root(), name)
    }

    /// Set attribute value
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        let root = self.tree.root();
        self.tree.set_attribute(root, name, value)
    }

    /// Leading text of the element
    pub fn text(&self) -> &str {
        self.tree.text(self.tree.root())
    }

    /// Set the leading text of the element
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        let root = self.tree.root();
        self.tree.set_text(root, text)
    }

    /// Append another fragment as the last child of this one
    pub fn append_element(&mut self, child: &Element) -> Result<()> {
        let root = self.tree.root();
        let copy = self.tree.graft(&child.tree, child.tree.root());
        self.tree.insert(copy, root, Default::default())
    }

    /// Read-only view of the root, for walking children
    pub fn view(&self) -> ElementView<'_> {
        ElementView::new(&self.tree, self.tree.root())
    }

    /// Serialize element to XML string
    pub fn to_xml_string(&self) -> String {
        self.tree.node_to_string(self.tree.root())
    }

    pub(crate) fn tree(&self) -> &XmlTree {
        &self.tree
    }

    pub(crate) fn root(&self) -> NodeId {
        self.tree.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_fragment() {
        let mut row = Element::new("table:table-row");
        let cell = Element::from_xml(r#"<table:table-cell office:value-type="string"/>"#).unwrap();
        row.append_element(&cell).unwrap();
        row.append_element(&cell).unwrap();
        row.set_attribute("table:style-name", "ro1").unwrap();

        assert_eq!(row.tag_name(), "table:table-row");
        assert_eq!(row.view().children().len(), 2);
        assert_eq!(
            row.to_xml_string(),
            r#"<table:table-row table:style-name="ro1"><table:table-cell office:value-type="string"/><table:table-cell office:value-type="string"/></table:table-row>"#
        );
    }

    #[test]
    fn test_text() {
        let mut p = Element::new("text:p");
        p.set_text("a < b").unwrap();
        assert_eq!(p.text(), "a < b");
        assert_eq!(p.to_xml_string(), "<text:p>a &lt; b</text:p>");
    }
}
