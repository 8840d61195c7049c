//! Query path builder.
//!
//! A [`QueryFilter`] describes the elements to find in semantic terms; it
//! renders to the path grammar understood by
//! [`XmlTree::select`](super::elements::XmlTree::select).
//!
//! Rendering is deterministic: attribute predicates always come out in
//! sorted key order, whatever order they were added in, so two equal
//! filters render to the same string.
//!
//! ```
//! use loquat::odf::query::QueryFilter;
//!
//! let path = QueryFilter::new("style:style")
//!     .style_name("Z")
//!     .attribute("style:family", "table")
//!     .to_path();
//! assert_eq!(path, r#"//style:style[@style:family="table"][@style:name="Z"]"#);
//! ```

use super::document::ElementRef;
use super::types::{NoteClass, StyleFamily};
use crate::common::xml::escape_xml;
use std::collections::BTreeMap;
use std::fmt;

/// Semantic description of the elements to find in one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    kind: String,
    attributes: BTreeMap<String, Option<String>>,
    position: Option<usize>,
    context: Option<ElementRef>,
}

impl QueryFilter {
    /// Filter on the qualified tag `kind`, e.g. `text:p`.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attributes: BTreeMap::new(),
            position: None,
            context: None,
        }
    }

    /// Require `key` to equal `value`.
    pub fn attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), Some(value.into()));
        self
    }

    /// Require `key` to be present, whatever its value.
    pub fn has_attribute(mut self, key: &str) -> Self {
        self.attributes.insert(key.to_string(), None);
        self
    }

    /// Merge a whole attribute map.
    pub fn attributes<I, K>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// `text:style-name`
    pub fn style(self, style: &str) -> Self {
        self.style_attribute("text:style-name", style)
    }

    /// `draw:style-name`
    pub fn frame_style(self, style: &str) -> Self {
        self.style_attribute("draw:style-name", style)
    }

    /// `table:style-name`, used by tables, rows and cells.
    pub fn table_style(self, style: &str) -> Self {
        self.style_attribute("table:style-name", style)
    }

    // An empty style name means no style filter.
    fn style_attribute(self, key: &str, style: &str) -> Self {
        if style.is_empty() {
            self
        } else {
            self.attribute(key, style)
        }
    }

    /// `draw:name`
    pub fn frame_name(self, name: &str) -> Self {
        self.attribute("draw:name", name)
    }

    /// `table:name`
    pub fn table_name(self, name: &str) -> Self {
        self.attribute("table:name", name)
    }

    /// `style:name`
    pub fn style_name(self, name: &str) -> Self {
        self.attribute("style:name", name)
    }

    /// `style:family`
    pub fn family(self, family: StyleFamily) -> Self {
        self.attribute("style:family", family.as_str())
    }

    /// `text:note-class`
    pub fn note_class(self, note_class: NoteClass) -> Self {
        self.attribute("text:note-class", note_class.as_str())
    }

    /// `text:id`
    pub fn text_id(self, id: &str) -> Self {
        self.attribute("text:id", id)
    }

    /// `text:outline-level`
    pub fn level(self, level: u32) -> Self {
        self.attribute("text:outline-level", level.to_string())
    }

    /// Keep only the n-th match (1-based).
    pub fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Search the children of `context` instead of the whole part.
    pub fn context(mut self, context: ElementRef) -> Self {
        self.context = Some(context);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn get_position(&self) -> Option<usize> {
        self.position
    }

    pub fn get_context(&self) -> Option<ElementRef> {
        self.context
    }

    /// Render the path string.
    ///
    /// Without a context the path starts with `//` and matches anywhere in
    /// the part; with one it is relative and the caller evaluates it from
    /// the context element.
    pub fn to_path(&self) -> String {
        let mut path = String::new();
        if self.context.is_none() {
            path.push_str("//");
        }
        path.push_str(&self.kind);
        for (key, value) in &self.attributes {
            match value {
                Some(value) => {
                    path.push_str(&format!(r#"[@{}="{}"]"#, key, escape_xml(value)));
                },
                None => path.push_str(&format!("[@{key}]")),
            }
        }
        if let Some(position) = self.position {
            path.push_str(&format!("[{position}]"));
        }
        path
    }
}

impl fmt::Display for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::elements::XmlTree;
    use crate::odf::types::PartName;

    #[test]
    fn test_sorted_predicates() {
        let a = QueryFilter::new("style:style")
            .attribute("style:family", "table")
            .attribute("style:name", "Z");
        let b = QueryFilter::new("style:style")
            .attribute("style:name", "Z")
            .attribute("style:family", "table");
        assert_eq!(a.to_path(), b.to_path());
        assert_eq!(
            a.to_path(),
            r#"//style:style[@style:family="table"][@style:name="Z"]"#
        );
    }

    #[test]
    fn test_convenience_fields() {
        let path = QueryFilter::new("text:h").level(2).style("Heading").position(3).to_path();
        assert_eq!(
            path,
            r#"//text:h[@text:outline-level="2"][@text:style-name="Heading"][3]"#
        );

        let path = QueryFilter::new("text:note")
            .note_class(NoteClass::Endnote)
            .text_id("n1")
            .to_path();
        assert_eq!(path, r#"//text:note[@text:id="n1"][@text:note-class="endnote"]"#);

        let path = QueryFilter::new("style:style").family(StyleFamily::TableCell).to_string();
        assert_eq!(path, r#"//style:style[@style:family="table-cell"]"#);
    }

    #[test]
    fn test_empty_style_adds_no_predicate() {
        for filter in [
            QueryFilter::new("text:p").style(""),
            QueryFilter::new("text:p").frame_style(""),
            QueryFilter::new("text:p").table_style(""),
        ] {
            assert_eq!(filter.to_path(), "//text:p");
        }
        assert_eq!(
            QueryFilter::new("table:table-cell").table_style("ce1").to_path(),
            r#"//table:table-cell[@table:style-name="ce1"]"#
        );
    }

    #[test]
    fn test_existence_and_escaping() {
        let path = QueryFilter::new("draw:frame")
            .has_attribute("draw:name")
            .frame_style("a\"b&c")
            .to_path();
        assert_eq!(path, r#"//draw:frame[@draw:name][@draw:style-name="a&quot;b&amp;c"]"#);

        let path = QueryFilter::new("x")
            .attributes([("k", None), ("j", Some("v".to_string()))])
            .to_path();
        assert_eq!(path, r#"//x[@j="v"][@k]"#);
    }

    #[test]
    fn test_context_is_relative() {
        let context = ElementRef::new(PartName::Content, XmlTree::with_root("r").root());
        let filter = QueryFilter::new("table:table-row").context(context).position(2);
        assert_eq!(filter.to_path(), "table:table-row[2]");
        assert_eq!(filter.get_context(), Some(context));
    }

    #[test]
    fn test_round_trip_through_tree() {
        let tree = XmlTree::parse_str(
            r#"<r><style:style style:name="Z" style:family="table"/><style:style style:name="a&quot;b" style:family="table"/></r>"#,
        )
        .unwrap();
        let path = QueryFilter::new("style:style").style_name("a\"b").to_path();
        assert_eq!(tree.select(&path, None).unwrap().len(), 1);
    }
}
