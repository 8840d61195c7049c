//! Evaluation of the path expressions produced by the query builder.
//!
//! Supported grammar:
//!
//! ```text
//! path      := axis qname predicate*
//! axis      := "//" | ".//" | ""
//! predicate := "[@" qname ( "=\"" value "\"" )? "]" | "[" digits "]"
//! ```
//!
//! `//` searches the whole tree, `.//` the descendants of the context and
//! the empty axis the context's children. A numeric predicate picks the
//! n-th node (1-based) of the list filtered so far, in document order.

use super::tree::{NodeId, XmlTree};
use crate::common::xml::unescape_xml;
use crate::common::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Anywhere,
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Attribute { name: String, value: Option<String> },
    Position(usize),
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    axis: Axis,
    name: String,
    predicates: Vec<Predicate>,
}

impl PathExpr {
    /// Parse a path string.
    pub fn parse(path: &str) -> Result<Self> {
        let malformed = || Error::InvalidArgument(format!("malformed path \"{path}\""));

        let (axis, rest) = if let Some(rest) = path.strip_prefix(".//") {
            (Axis::Descendant, rest)
        } else if let Some(rest) = path.strip_prefix("//") {
            (Axis::Anywhere, rest)
        } else {
            (Axis::Child, path)
        };

        let name_end = rest.find('[').unwrap_or(rest.len());
        let name = &rest[..name_end];
        if !is_qname(name) {
            return Err(malformed());
        }

        let mut predicates = Vec::new();
        let mut rest = &rest[name_end..];
        while !rest.is_empty() {
            rest = rest.strip_prefix('[').ok_or_else(malformed)?;
            if let Some(attr) = rest.strip_prefix('@') {
                let key_end = attr.find(['=', ']']).ok_or_else(malformed)?;
                let key = &attr[..key_end];
                if !is_qname(key) {
                    return Err(malformed());
                }
                let after_key = &attr[key_end..];
                if let Some(quoted) = after_key.strip_prefix("=\"") {
                    let value_end = quoted.find('"').ok_or_else(malformed)?;
                    predicates.push(Predicate::Attribute {
                        name: key.to_string(),
                        value: Some(unescape_xml(&quoted[..value_end])),
                    });
                    rest = quoted[value_end + 1..].strip_prefix(']').ok_or_else(malformed)?;
                } else {
                    predicates.push(Predicate::Attribute {
                        name: key.to_string(),
                        value: None,
                    });
                    rest = after_key.strip_prefix(']').ok_or_else(malformed)?;
                }
            } else {
                let end = rest.find(']').ok_or_else(malformed)?;
                let position: usize = rest[..end].parse().map_err(|_| malformed())?;
                if position == 0 {
                    return Err(malformed());
                }
                predicates.push(Predicate::Position(position));
                rest = &rest[end + 1..];
            }
        }

        Ok(Self {
            axis,
            name: name.to_string(),
            predicates,
        })
    }

    /// Evaluate the expression against a tree, relative to `context`
    /// (the root element when `None`).
    pub fn evaluate(&self, tree: &XmlTree, context: Option<NodeId>) -> Vec<NodeId> {
        let root = tree.root();
        let mut nodes: Vec<NodeId> = match (self.axis, context) {
            (Axis::Anywhere, _) => {
                let mut all = vec![root];
                all.extend(tree.descendants(root));
                all
            },
            (Axis::Descendant, Some(ctx)) => tree.descendants(ctx),
            (Axis::Descendant, None) => tree.descendants(root),
            (Axis::Child, Some(ctx)) => tree.child_elements(ctx).collect(),
            // Without a context the only child of the document is its root.
            (Axis::Child, None) => vec![root],
        };

        if self.name != "*" {
            nodes.retain(|n| tree.name(*n) == Some(self.name.as_str()));
        }

        for predicate in &self.predicates {
            match predicate {
                Predicate::Attribute { name, value: None } => {
                    nodes.retain(|n| tree.attribute(*n, name).is_some());
                },
                Predicate::Attribute {
                    name,
                    value: Some(expected),
                } => {
                    nodes.retain(|n| tree.attribute(*n, name) == Some(expected.as_str()));
                },
                Predicate::Position(position) => {
                    nodes = nodes.get(position - 1).copied().into_iter().collect();
                },
            }
        }
        nodes
    }
}

fn is_qname(name: &str) -> bool {
    name == "*"
        || (!name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, ':' | '-' | '_' | '.')))
}

impl XmlTree {
    /// List the elements matching `path`, in document order.
    pub fn select(&self, path: &str, context: Option<NodeId>) -> Result<Vec<NodeId>> {
        Ok(PathExpr::parse(path)?.evaluate(self, context))
    }

    /// First element matching `path`.
    pub fn select_first(&self, path: &str, context: Option<NodeId>) -> Result<Option<NodeId>> {
        Ok(self.select(path, context)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = concat!(
        r#"<office:document-content><office:body><office:text>"#,
        r#"<text:p text:style-name="A">one</text:p>"#,
        r#"<text:section text:style-name="Sect"><text:p text:style-name="B">two</text:p></text:section>"#,
        r#"<text:p text:style-name="A" text:id="x">three</text:p>"#,
        r#"</office:text></office:body></office:document-content>"#
    );

    fn texts(tree: &XmlTree, nodes: &[NodeId]) -> Vec<String> {
        nodes.iter().map(|n| tree.text(*n).to_string()).collect()
    }

    #[test]
    fn test_anywhere() {
        let tree = XmlTree::parse_str(DOC).unwrap();
        let all = tree.select("//text:p", None).unwrap();
        assert_eq!(texts(&tree, &all), ["one", "two", "three"]);

        let styled = tree.select(r#"//text:p[@text:style-name="A"]"#, None).unwrap();
        assert_eq!(texts(&tree, &styled), ["one", "three"]);

        let second = tree.select(r#"//text:p[@text:style-name="A"][2]"#, None).unwrap();
        assert_eq!(texts(&tree, &second), ["three"]);

        let with_id = tree.select("//text:p[@text:id]", None).unwrap();
        assert_eq!(texts(&tree, &with_id), ["three"]);

        assert!(tree.select("//text:p[4]", None).unwrap().is_empty());
        assert_eq!(tree.select("//office:document-content", None).unwrap().len(), 1);
    }

    #[test]
    fn test_relative() {
        let tree = XmlTree::parse_str(DOC).unwrap();
        let section = tree.select_first("//text:section", None).unwrap().unwrap();
        let children = tree.select("text:p", Some(section)).unwrap();
        assert_eq!(texts(&tree, &children), ["two"]);

        let body = tree.select_first("//office:body", None).unwrap().unwrap();
        assert!(tree.select("text:p", Some(body)).unwrap().is_empty());
        assert_eq!(tree.select(".//text:p", Some(body)).unwrap().len(), 3);
    }

    #[test]
    fn test_quoted_values_unescaped() {
        let tree = XmlTree::parse_str(r#"<r><a n="x&quot;y"/></r>"#).unwrap();
        assert_eq!(tree.select(r#"//a[@n="x&quot;y"]"#, None).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed() {
        for bad in ["", "//", "//a[", "//a[@]", "//a[@b=\"c]", "//a[0]", "//a[x]", "//a junk"] {
            assert!(PathExpr::parse(bad).is_err(), "{bad:?} should not parse");
        }
    }
}
