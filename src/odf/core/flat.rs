//! Flat (single XML file) packaging.
//!
//! A flat document is one `office:document` root whose children are the
//! top-level sections of the meta, settings, styles and content parts, in
//! the order the format prescribes. Sections present in two parts
//! (`office:font-face-decls`, `office:automatic-styles`) are merged into
//! one.
//!
//! Splitting routes the merged automatic styles back by use: page layouts
//! and styles named from `office:master-styles` go to the styles part, the
//! rest to the content part. Font faces are shared declarations; both parts
//! get all of them and joining drops repeated names.

use std::collections::HashSet;

use crate::common::{Error, Result};
use crate::odf::constants::{ODF_CONTENT, ODF_META, ODF_SETTINGS, ODF_STYLES};
use crate::odf::elements::{InsertPosition, NodeId, XmlTree};

const FLAT_ROOT: &str = "office:document";
const MIMETYPE_ATTRIBUTE: &str = "office:mimetype";
const FONT_FACE_DECLS: &str = "office:font-face-decls";
const AUTOMATIC_STYLES: &str = "office:automatic-styles";
const MASTER_STYLES: &str = "office:master-styles";
const PAGE_LAYOUT: &str = "style:page-layout";
const STYLE_NAME: &str = "style:name";

/// Top-level sections in output order, with the parts they come from.
const SECTIONS: [(&str, &[&str]); 8] = [
    ("office:meta", &[ODF_META]),
    ("office:settings", &[ODF_SETTINGS]),
    ("office:scripts", &[ODF_CONTENT]),
    (FONT_FACE_DECLS, &[ODF_STYLES, ODF_CONTENT]),
    ("office:styles", &[ODF_STYLES]),
    (AUTOMATIC_STYLES, &[ODF_STYLES, ODF_CONTENT]),
    (MASTER_STYLES, &[ODF_STYLES]),
    ("office:body", &[ODF_CONTENT]),
];

/// Parts rebuilt from a flat document, with their root tag.
const PARTS: [(&str, &str); 4] = [
    (ODF_CONTENT, "office:document-content"),
    (ODF_STYLES, "office:document-styles"),
    (ODF_META, "office:document-meta"),
    (ODF_SETTINGS, "office:document-settings"),
];

fn section_owner(part: &str, section: &str) -> bool {
    SECTIONS
        .iter()
        .any(|(tag, owners)| *tag == section && owners.contains(&part))
}

/// Merge the XML parts into one flat document.
///
/// `get` returns the bytes of a member if the package has it.
pub(crate) fn join<'a, F>(mimetype: &str, get: F, pretty: bool) -> Result<Vec<u8>>
where
    F: Fn(&str) -> Option<&'a [u8]>,
{
    let mut sources = Vec::new();
    for (path, _) in PARTS {
        if let Some(bytes) = get(path) {
            sources.push((path, XmlTree::parse(bytes)?));
        }
    }

    let mut flat = XmlTree::with_root(FLAT_ROOT);
    let root = flat.root();
    for (_, tree) in &sources {
        for (key, value) in tree.attributes(tree.root()) {
            flat.set_attribute(root, key, value)?;
        }
    }
    flat.set_attribute(root, MIMETYPE_ATTRIBUTE, mimetype)?;

    for (tag, owners) in SECTIONS {
        let found: Vec<(&XmlTree, NodeId)> = sources
            .iter()
            .filter(|(path, _)| owners.contains(path))
            .flat_map(|(_, tree)| {
                tree.child_elements(tree.root())
                    .filter(|child| tree.name(*child) == Some(tag))
                    .map(move |child| (tree, child))
                    .collect::<Vec<_>>()
            })
            .collect();

        match found.as_slice() {
            [] => {},
            [(tree, node)] => {
                let copy = flat.graft(tree, *node);
                flat.insert(copy, root, InsertPosition::LastChild)?;
            },
            [(first_tree, first), ..] => {
                let merged = flat.create_element(tag);
                for (key, value) in first_tree.attributes(*first) {
                    flat.set_attribute(merged, key, value)?;
                }
                let mut font_faces = HashSet::new();
                for (tree, node) in &found {
                    for child in tree.child_elements(*node) {
                        if tag == FONT_FACE_DECLS
                            && let Some(name) = tree.attribute(child, STYLE_NAME)
                            && !font_faces.insert(name)
                        {
                            continue;
                        }
                        let copy = flat.graft(tree, child);
                        flat.insert(copy, merged, InsertPosition::LastChild)?;
                    }
                }
                flat.insert(merged, root, InsertPosition::LastChild)?;
            },
        }
    }

    Ok(flat.serialize(pretty).into_bytes())
}

/// Split a flat document into its mimetype and XML parts.
///
/// Content, styles and meta parts are always produced, settings only when
/// the flat document has an `office:settings` section.
pub(crate) fn split(bytes: &[u8]) -> Result<(String, Vec<(String, Vec<u8>)>)> {
    let flat = XmlTree::parse(bytes)?;
    let root = flat.root();
    if flat.name(root) != Some(FLAT_ROOT) {
        return Err(Error::InvalidFormat(format!(
            "flat document root must be {FLAT_ROOT}"
        )));
    }
    let mimetype = flat
        .attribute(root, MIMETYPE_ATTRIBUTE)
        .ok_or_else(|| Error::InvalidFormat("flat document has no office:mimetype".to_string()))?
        .to_string();

    let referenced = master_references(&flat);
    let mut members = Vec::new();
    for (path, part_root) in PARTS {
        let sections: Vec<NodeId> = flat
            .child_elements(root)
            .filter(|child| {
                flat.name(*child)
                    .is_some_and(|name| section_owner(path, name))
            })
            .collect();
        if path == ODF_SETTINGS && sections.is_empty() {
            continue;
        }

        let mut part = XmlTree::with_root(part_root);
        let part_root = part.root();
        for (key, value) in flat.attributes(root) {
            if key != MIMETYPE_ATTRIBUTE {
                part.set_attribute(part_root, key, value)?;
            }
        }
        for section in sections {
            let copy = if flat.name(section) == Some(AUTOMATIC_STYLES) {
                let copy = part.create_element(AUTOMATIC_STYLES);
                for (key, value) in flat.attributes(section) {
                    part.set_attribute(copy, key, value)?;
                }
                for child in flat.child_elements(section) {
                    if used_by_styles(&flat, child, &referenced) == (path == ODF_STYLES) {
                        let style = part.graft(&flat, child);
                        part.insert(style, copy, InsertPosition::LastChild)?;
                    }
                }
                copy
            } else {
                part.graft(&flat, section)
            };
            part.insert(copy, part_root, InsertPosition::LastChild)?;
        }
        members.push((path.to_string(), part.serialize(false).into_bytes()));
    }

    Ok((mimetype, members))
}

/// Every attribute value under `office:master-styles`; style names used by
/// master pages are among them.
fn master_references(flat: &XmlTree) -> HashSet<&str> {
    flat.child_elements(flat.root())
        .filter(|section| flat.name(*section) == Some(MASTER_STYLES))
        .flat_map(move |section| flat.descendants(section))
        .flat_map(move |node| flat.attributes(node).iter().map(|(_, value)| value.as_str()))
        .collect()
}

fn used_by_styles(flat: &XmlTree, style: NodeId, referenced: &HashSet<&str>) -> bool {
    flat.name(style) == Some(PAGE_LAYOUT)
        || flat
            .attribute(style, STYLE_NAME)
            .is_some_and(|name| referenced.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CONTENT: &str = concat!(
        r#"<office:document-content xmlns:office="o" office:version="1.2">"#,
        r#"<office:font-face-decls><style:font-face style:name="Liberation Serif"/></office:font-face-decls>"#,
        r#"<office:automatic-styles><style:style style:name="P1"/></office:automatic-styles>"#,
        "<office:body><office:text><text:p>hi</text:p></office:text></office:body>",
        "</office:document-content>"
    );
    const STYLES: &str = concat!(
        r#"<office:document-styles xmlns:office="o" xmlns:style="s" office:version="1.2">"#,
        r#"<office:font-face-decls><style:font-face style:name="Liberation Serif"/>"#,
        r#"<style:font-face style:name="DejaVu Sans"/></office:font-face-decls>"#,
        r#"<office:styles><style:style style:name="Standard"/></office:styles>"#,
        r#"<office:automatic-styles><style:style style:name="MP1"/>"#,
        r#"<style:page-layout style:name="pm1"/></office:automatic-styles>"#,
        r#"<office:master-styles><style:master-page style:name="Standard" style:page-layout-name="pm1">"#,
        r#"<style:header><text:p text:style-name="MP1"/></style:header></style:master-page>"#,
        "</office:master-styles></office:document-styles>"
    );
    const META: &str = r#"<office:document-meta xmlns:office="o" office:version="1.2"><office:meta><dc:title>T</dc:title></office:meta></office:document-meta>"#;

    fn join_members(members: &[(&str, &[u8])]) -> Vec<u8> {
        let parts: HashMap<&str, &[u8]> = members.iter().copied().collect();
        join("application/vnd.oasis.opendocument.text", |p| parts.get(p).copied(), false).unwrap()
    }

    fn joined() -> Vec<u8> {
        join_members(&[
            (ODF_CONTENT, CONTENT.as_bytes()),
            (ODF_STYLES, STYLES.as_bytes()),
            (ODF_META, META.as_bytes()),
        ])
    }

    fn style_names(tree: &XmlTree, path: &str) -> Vec<String> {
        let section = tree.select_first(path, None).unwrap().unwrap();
        tree.child_elements(section)
            .filter_map(|child| tree.attribute(child, "style:name"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_join_orders_and_merges_sections() {
        let flat = XmlTree::parse(&joined()).unwrap();
        let root = flat.root();
        assert_eq!(flat.name(root), Some("office:document"));
        assert_eq!(
            flat.attribute(root, "office:mimetype"),
            Some("application/vnd.oasis.opendocument.text")
        );
        assert_eq!(flat.attribute(root, "xmlns:style"), Some("s"));

        let sections: Vec<&str> = flat
            .child_elements(root)
            .filter_map(|c| flat.name(c))
            .collect();
        assert_eq!(
            sections,
            [
                "office:meta",
                "office:font-face-decls",
                "office:styles",
                "office:automatic-styles",
                "office:master-styles",
                "office:body"
            ]
        );

        assert_eq!(
            style_names(&flat, "//office:automatic-styles"),
            ["P1", "MP1", "pm1"]
        );
        assert_eq!(
            style_names(&flat, "//office:font-face-decls"),
            ["Liberation Serif", "DejaVu Sans"]
        );
    }

    #[test]
    fn test_split_restores_parts() {
        let (mimetype, members) = split(&joined()).unwrap();
        assert_eq!(mimetype, "application/vnd.oasis.opendocument.text");
        let names: Vec<&str> = members.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, [ODF_CONTENT, ODF_STYLES, ODF_META]);

        let content = XmlTree::parse(&members[0].1).unwrap();
        assert_eq!(content.name(content.root()), Some("office:document-content"));
        assert!(content.attribute(content.root(), "office:mimetype").is_none());
        let p = content.select_first("//text:p", None).unwrap().unwrap();
        assert_eq!(content.text(p), "hi");
        assert!(content.select_first("//office:styles", None).unwrap().is_none());
        assert_eq!(style_names(&content, "//office:automatic-styles"), ["P1"]);
        assert!(content.select_first("//style:page-layout", None).unwrap().is_none());

        let styles = XmlTree::parse(&members[1].1).unwrap();
        assert_eq!(style_names(&styles, "//office:styles"), ["Standard"]);
        assert_eq!(style_names(&styles, "//office:automatic-styles"), ["MP1", "pm1"]);
        assert!(styles.select_first("//office:body", None).unwrap().is_none());

        let meta = XmlTree::parse(&members[2].1).unwrap();
        let title = meta.select_first("//dc:title", None).unwrap().unwrap();
        assert_eq!(meta.text(title), "T");
    }

    #[test]
    fn test_repeated_round_trips_are_stable() {
        let mut flat = joined();
        for _ in 0..2 {
            let (_, members) = split(&flat).unwrap();
            let members: Vec<(&str, &[u8])> = members
                .iter()
                .map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
                .collect();
            flat = join_members(&members);
        }
        let flat = XmlTree::parse(&flat).unwrap();
        assert_eq!(
            style_names(&flat, "//office:automatic-styles"),
            ["P1", "MP1", "pm1"]
        );
        assert_eq!(
            style_names(&flat, "//office:font-face-decls"),
            ["Liberation Serif", "DejaVu Sans"]
        );
    }

    #[test]
    fn test_split_rejects_non_flat() {
        assert!(matches!(split(CONTENT.as_bytes()), Err(Error::InvalidFormat(_))));
        assert!(split(br#"<office:document/>"#).is_err());
    }
}
