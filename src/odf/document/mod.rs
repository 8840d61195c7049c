//! The document facade.
//!
//! A [`Document`] owns a [`Container`] and parses its XML parts on first
//! use. Everything a caller finds comes back as an [`ElementRef`], a small
//! copyable handle that is read and written through the document again.
//! Fragments built by [`factory`](super::factory) are placed with
//! [`Document::insert_element`], which applies the structural insertion
//! policy of the element's tag.
//!
//! The per-category getters live in the submodules, one `impl Document`
//! block each.

mod annotation;
mod frame;
mod meta;
mod style;
mod table;
mod text;

use super::core::{Container, DocumentClass, SaveOptions};
use super::elements::{Element, ElementView, InsertPosition, NodeId, XmlTree};
use super::policy::InsertionPolicy;
use super::query::QueryFilter;
use super::types::PartName;
use crate::common::{Error, Result};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

/// Handle to an element living in one part of a [`Document`].
///
/// Handles stay valid for the lifetime of the document they came from.
/// Elements are never removed from a part, so inserting new content does
/// not invalidate existing handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    part: PartName,
    node: NodeId,
}

impl ElementRef {
    pub fn new(part: PartName, node: NodeId) -> Self {
        Self { part, node }
    }

    /// Part holding the element
    pub fn part(&self) -> PartName {
        self.part
    }

    /// Node of the element inside its part
    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// A parsed XML part.
#[derive(Debug)]
struct Part {
    name: PartName,
    tree: XmlTree,
}

/// An OpenDocument text, spreadsheet, presentation or drawing.
///
/// The document is the entry point for reading and editing. It keeps the
/// package in memory and parses `content.xml`, `styles.xml` and `meta.xml`
/// lazily, once each.
///
/// # Examples
///
/// ```no_run
/// use loquat::odf::{Document, DocumentClass, InsertPosition, SaveOptions, factory};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut doc = Document::new_from_class(DocumentClass::Text);
/// let paragraph = factory::create_paragraph("Standard", "Hello world")?;
/// let paragraph = doc.insert_element(&paragraph, None, InsertPosition::LastChild, 0)?;
///
/// let note = factory::create_note("1", Default::default(), None)?;
/// doc.insert_element(&note, Some(paragraph), InsertPosition::LastChild, 5)?;
///
/// doc.save(Some(Path::new("hello.odt")), &SaveOptions::default())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Document {
    /// Package members, updated from the parts on save
    container: Container,
    /// Parts parsed so far; at most one per name
    parts: HashMap<PartName, Part>,
}

impl Document {
    /// Wrap an already loaded container.
    pub fn from_container(container: Container) -> Self {
        Self {
            container,
            parts: HashMap::new(),
        }
    }

    /// Open a document from a file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a ZIP package (`.odt`, `.ods`, …) or a flat XML
    ///   document (`.fodt`, `.fods`, …)
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not an ODF package.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_container(Container::open(path)?))
    }

    /// Load a document from bytes in either packaging.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_container(Container::from_bytes(bytes)?))
    }

    /// Create an empty document of the given class.
    pub fn new_from_class(class: DocumentClass) -> Self {
        Self::from_container(Container::new_from_class(class))
    }

    /// Create a document from a template package.
    ///
    /// The template MIME type is turned into the matching document type.
    pub fn from_template(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_container(Container::from_template(path)?))
    }

    /// The underlying package.
    ///
    /// Edits made to loaded parts reach it only on [`save`](Self::save) or
    /// [`to_bytes`](Self::to_bytes).
    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn mimetype(&self) -> &str {
        self.container.mimetype()
    }

    fn part(&mut self, name: PartName) -> Result<&mut Part> {
        match self.parts.entry(name) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let bytes = self.container.get_part(name.path())?;
                tracing::debug!("loading part {} ({} bytes)", name, bytes.len());
                let tree = XmlTree::parse(bytes)?;
                Ok(entry.insert(Part { name, tree }))
            },
        }
    }

    fn tree(&mut self, name: PartName) -> Result<&mut XmlTree> {
        Ok(&mut self.part(name)?.tree)
    }

    /// Tree of the handle's part, checked to hold the handle's element.
    fn resolve(&mut self, element: ElementRef) -> Result<&mut XmlTree> {
        let tree = self.tree(element.part())?;
        if !tree.is_element(element.node()) {
            return Err(Error::InvalidArgument(format!(
                "{element:?} is not an element of this document"
            )));
        }
        Ok(tree)
    }

    // ------------------------------------------------------------------
    // Generic queries
    // ------------------------------------------------------------------

    /// Every element matching `filter`, in document order.
    ///
    /// Without a context the whole `part` is searched. With a context only
    /// the context's children are, and the context's own part is used.
    pub fn get_element_list(
        &mut self,
        filter: &QueryFilter,
        part: PartName,
    ) -> Result<Vec<ElementRef>> {
        if filter.get_position() == Some(0) {
            return Err(Error::InvalidArgument("positions begin at 1".to_string()));
        }
        let context = filter.get_context();
        let part = context.map_or(part, |c| c.part());
        let path = filter.to_path();
        let tree = self.tree(part)?;
        let nodes = tree.select(&path, context.map(|c| c.node()))?;
        tracing::trace!("{} matched {} elements", path, nodes.len());
        Ok(nodes
            .into_iter()
            .map(|node| ElementRef::new(part, node))
            .collect())
    }

    /// First element matching `filter`, or `None`.
    ///
    /// Set a position on the filter to pick the n-th match instead.
    pub fn get_element(
        &mut self,
        filter: &QueryFilter,
        part: PartName,
    ) -> Result<Option<ElementRef>> {
        Ok(self.get_element_list(filter, part)?.into_iter().next())
    }

    /// Shorthand for the category getters: `kind` under `context`, or
    /// anywhere in the content part.
    fn filter(kind: &str, context: Option<ElementRef>) -> QueryFilter {
        let filter = QueryFilter::new(kind);
        match context {
            Some(context) => filter.context(context),
            None => filter,
        }
    }

    fn content_list(&mut self, filter: QueryFilter) -> Result<Vec<ElementRef>> {
        self.get_element_list(&filter, PartName::Content)
    }

    fn content_element(&mut self, filter: QueryFilter) -> Result<Option<ElementRef>> {
        self.get_element(&filter, PartName::Content)
    }

    // ------------------------------------------------------------------
    // Node access
    // ------------------------------------------------------------------

    /// Read-only view of an element.
    pub fn view(&mut self, element: ElementRef) -> Result<ElementView<'_>> {
        let tree = self.resolve(element)?;
        Ok(ElementView::new(tree, element.node()))
    }

    /// Leading text of an element, before its first child element.
    pub fn get_text(&mut self, element: ElementRef) -> Result<String> {
        Ok(self.resolve(element)?.text(element.node()).to_string())
    }

    /// Replace the leading text of an element.
    pub fn set_text(&mut self, element: ElementRef, text: &str) -> Result<()> {
        self.resolve(element)?.set_text(element.node(), text)
    }

    /// All text below an element, in document order.
    pub fn get_text_content(&mut self, element: ElementRef) -> Result<String> {
        Ok(self.resolve(element)?.text_content(element.node()))
    }

    pub fn get_attribute(&mut self, element: ElementRef, name: &str) -> Result<Option<String>> {
        Ok(self
            .resolve(element)?
            .attribute(element.node(), name)
            .map(str::to_string))
    }

    pub fn set_attribute(&mut self, element: ElementRef, name: &str, value: &str) -> Result<()> {
        self.resolve(element)?.set_attribute(element.node(), name, value)
    }

    /// Serialize one element and its subtree.
    pub fn element_to_xml(&mut self, element: ElementRef) -> Result<String> {
        Ok(self.resolve(element)?.node_to_string(element.node()))
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Place a copy of `element` in the document and return its handle.
    ///
    /// Placement follows the insertion policy of the element's tag:
    ///
    /// * images, columns, rows, cells, list items and text properties need
    ///   a `context` and land at `position` relative to it;
    /// * notes and annotations need a `context` and are spliced into its
    ///   text at character `offset`; `position` is ignored;
    /// * styles always go to the end of `office:styles` in the styles part;
    /// * anything else lands at `position` relative to `context`, or at the
    ///   end of the last `office:text` of the content part.
    ///
    /// # Errors
    ///
    /// [`Error::MissingContext`] when the policy needs a context and none
    /// was given, [`Error::ComponentNotFound`] when the landing container
    /// does not exist in the part.
    pub fn insert_element(
        &mut self,
        element: &Element,
        context: Option<ElementRef>,
        position: InsertPosition,
        offset: usize,
    ) -> Result<ElementRef> {
        let tag = element.tag_name();
        let policy = InsertionPolicy::for_tag(tag);
        tracing::debug!("inserting {} ({:?})", tag, policy);

        if policy.requires_context() && context.is_none() {
            return Err(Error::MissingContext(tag.to_string()));
        }

        match (policy, context) {
            (InsertionPolicy::StyleRegistry, _) => {
                let tree = self.tree(PartName::Styles)?;
                let styles = last_match(tree, "//office:styles")?;
                let node = attach(tree, element, styles, InsertPosition::LastChild)?;
                Ok(ElementRef::new(PartName::Styles, node))
            },
            (InsertionPolicy::TextSplice, Some(context)) => {
                let tree = self.resolve(context)?;
                let node = splice(tree, element, context.node(), offset)?;
                Ok(ElementRef::new(context.part(), node))
            },
            (_, Some(context)) => {
                let tree = self.resolve(context)?;
                let node = attach(tree, element, context.node(), position)?;
                Ok(ElementRef::new(context.part(), node))
            },
            (_, None) => {
                // TODO: land in the class-specific body (office:spreadsheet, ...)
                // once non-text documents need context-free insertion.
                let tree = self.tree(PartName::Content)?;
                let body = last_match(tree, "//office:text")?;
                let node = attach(tree, element, body, InsertPosition::LastChild)?;
                Ok(ElementRef::new(PartName::Content, node))
            },
        }
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Write every loaded part back into the container.
    fn sync(&mut self, pretty: bool) {
        for part in self.parts.values() {
            tracing::debug!("storing part {}", part.name);
            self.container
                .set_part(part.name.path(), part.tree.serialize(pretty).into_bytes());
        }
    }

    /// Save the document to `path`, or where it was opened from.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when no path is given and the document
    /// was not opened from a file.
    pub fn save(&mut self, path: Option<&Path>, options: &SaveOptions) -> Result<()> {
        self.sync(options.pretty);
        self.container.save(path, options)
    }

    /// Serialize the document into package bytes.
    pub fn to_bytes(&mut self, options: &SaveOptions) -> Result<Vec<u8>> {
        self.sync(options.pretty);
        self.container.to_bytes(options)
    }
}

/// The clone has its own copy of the package and parses its parts again.
/// Unsaved edits of the original are not carried over.
impl Clone for Document {
    fn clone(&self) -> Self {
        Self::from_container(self.container.clone())
    }
}

fn last_match(tree: &XmlTree, path: &str) -> Result<NodeId> {
    tree.select(path, None)?
        .pop()
        .ok_or_else(|| Error::ComponentNotFound(path.trim_start_matches('/').to_string()))
}

fn attach(
    tree: &mut XmlTree,
    element: &Element,
    target: NodeId,
    position: InsertPosition,
) -> Result<NodeId> {
    let node = tree.graft(element.tree(), element.root());
    tree.insert(node, target, position)?;
    Ok(node)
}

/// Insert `element` into the text of `target` at character `offset`.
fn splice(tree: &mut XmlTree, element: &Element, target: NodeId, offset: usize) -> Result<NodeId> {
    let text = tree.text(target).to_string();
    let split = text
        .char_indices()
        .nth(offset)
        .map_or(text.len(), |(index, _)| index);
    let (before, after) = text.split_at(split);

    tree.set_text(target, before)?;
    let node = attach(tree, element, target, InsertPosition::LastChild)?;
    tree.set_tail(node, after)?;
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::factory;
    use crate::odf::types::{NoteClass, StyleFamily};
    use tempfile::tempdir;

    fn text_document() -> Document {
        Document::new_from_class(DocumentClass::Text)
    }

    #[test]
    fn test_note_is_spliced_at_offset() {
        let mut doc = text_document();
        let paragraph = factory::create_paragraph("Standard", "Hello world").unwrap();
        let paragraph = doc
            .insert_element(&paragraph, None, InsertPosition::LastChild, 0)
            .unwrap();

        let note = factory::create_note("1", NoteClass::Footnote, None).unwrap();
        let note = doc
            .insert_element(&note, Some(paragraph), InsertPosition::FirstChild, 5)
            .unwrap();

        assert_eq!(doc.get_text(paragraph).unwrap(), "Hello");
        assert_eq!(doc.view(note).unwrap().tail(), " world");
        let xml = doc.element_to_xml(paragraph).unwrap();
        assert!(xml.starts_with(r#"<text:p text:style-name="Standard">Hello<text:note"#));
        assert!(xml.ends_with("</text:note> world</text:p>"));
    }

    #[test]
    fn test_splice_offset_counts_characters_and_clamps() {
        let mut doc = text_document();
        let paragraph = factory::create_paragraph("Standard", "héllo").unwrap();
        let paragraph = doc
            .insert_element(&paragraph, None, InsertPosition::LastChild, 0)
            .unwrap();
        let annotation = factory::create_annotation("me", "note", None).unwrap();
        let first = doc
            .insert_element(&annotation, Some(paragraph), InsertPosition::LastChild, 2)
            .unwrap();
        assert_eq!(doc.get_text(paragraph).unwrap(), "hé");
        assert_eq!(doc.view(first).unwrap().tail(), "llo");

        let other = factory::create_paragraph("Standard", "abc").unwrap();
        let other = doc.insert_element(&other, None, InsertPosition::LastChild, 0).unwrap();
        let note = factory::create_note("2", NoteClass::Endnote, None).unwrap();
        let note = doc
            .insert_element(&note, Some(other), InsertPosition::LastChild, 99)
            .unwrap();
        assert_eq!(doc.get_text(other).unwrap(), "abc");
        assert_eq!(doc.view(note).unwrap().tail(), "");
    }

    #[test]
    fn test_context_is_required() {
        let mut doc = text_document();
        for element in [
            factory::create_row(None).unwrap(),
            factory::create_image("Pictures/a.png").unwrap(),
            factory::create_note("1", NoteClass::Footnote, None).unwrap(),
            factory::create_list_item(Some("x")).unwrap(),
        ] {
            let tag = element.tag_name().to_string();
            match doc.insert_element(&element, None, InsertPosition::LastChild, 0) {
                Err(Error::MissingContext(t)) => assert_eq!(t, tag),
                other => panic!("expected MissingContext for {tag}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_table_insert_and_positions() {
        let mut doc = text_document();
        let table = factory::create_table("T", "Default", Some(2), Some(2)).unwrap();
        let table = doc.insert_element(&table, None, InsertPosition::LastChild, 0).unwrap();
        assert_eq!(doc.get_row_list(None, Some(table)).unwrap().len(), 2);

        let column = factory::create_column("co1").unwrap();
        doc.insert_element(&column, Some(table), InsertPosition::FirstChild, 0)
            .unwrap();
        let first = doc.view(table).unwrap().children()[0].tag_name().to_string();
        assert_eq!(first, "table:table-column");

        let rows = doc.get_row_list(None, Some(table)).unwrap();
        let row = factory::create_row(Some(2)).unwrap();
        let inserted = doc
            .insert_element(&row, Some(rows[0]), InsertPosition::NextSibling, 0)
            .unwrap();
        let rows = doc.get_row_list(None, Some(table)).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], inserted);
    }

    #[test]
    fn test_style_goes_to_styles_part() {
        let mut doc = text_document();
        let paragraph = factory::create_paragraph("Standard", "x").unwrap();
        let paragraph = doc.insert_element(&paragraph, None, InsertPosition::LastChild, 0).unwrap();

        let style = factory::create_style("Fancy", StyleFamily::Paragraph).unwrap();
        let style = doc
            .insert_element(&style, Some(paragraph), InsertPosition::FirstChild, 0)
            .unwrap();
        assert_eq!(style.part(), PartName::Styles);
        assert_eq!(doc.get_style("Fancy", Some(StyleFamily::Paragraph)).unwrap(), Some(style));
        assert_eq!(doc.view(paragraph).unwrap().children().len(), 0);

        let properties = factory::create_style_text_properties();
        let properties = doc
            .insert_element(&properties, Some(style), InsertPosition::LastChild, 0)
            .unwrap();
        assert_eq!(properties.part(), PartName::Styles);
    }

    #[test]
    fn test_generic_insert_needs_office_text() {
        let mut doc = Document::new_from_class(DocumentClass::Spreadsheet);
        let paragraph = factory::create_paragraph("Standard", "x").unwrap();
        assert!(matches!(
            doc.insert_element(&paragraph, None, InsertPosition::LastChild, 0),
            Err(Error::ComponentNotFound(_))
        ));
    }

    #[test]
    fn test_get_element_generic() {
        let mut doc = text_document();
        for text in ["a", "b", "c"] {
            let p = factory::create_paragraph("Standard", text).unwrap();
            doc.insert_element(&p, None, InsertPosition::LastChild, 0).unwrap();
        }
        let filter = QueryFilter::new("text:p").style("Standard").position(2);
        let second = doc.get_element(&filter, PartName::Content).unwrap().unwrap();
        assert_eq!(doc.get_text(second).unwrap(), "b");

        let none = QueryFilter::new("text:p").style("Other");
        assert!(doc.get_element(&none, PartName::Content).unwrap().is_none());

        let zero = QueryFilter::new("text:p").position(0);
        assert!(matches!(
            doc.get_element(&zero, PartName::Content),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_node_access() {
        let mut doc = text_document();
        let p = factory::create_paragraph("Standard", "a").unwrap();
        let p = doc.insert_element(&p, None, InsertPosition::LastChild, 0).unwrap();
        doc.set_text(p, "b & c").unwrap();
        doc.set_attribute(p, "text:style-name", "Body").unwrap();
        assert_eq!(doc.get_attribute(p, "text:style-name").unwrap().as_deref(), Some("Body"));
        assert_eq!(
            doc.element_to_xml(p).unwrap(),
            r#"<text:p text:style-name="Body">b &amp; c</text:p>"#
        );
        assert_eq!(doc.get_text_content(p).unwrap(), "b & c");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut doc = text_document();
        let p = factory::create_paragraph("Standard", "saved").unwrap();
        doc.insert_element(&p, None, InsertPosition::LastChild, 0).unwrap();
        doc.to_bytes(&SaveOptions::default()).unwrap();

        let mut copy = doc.clone();
        let extra = factory::create_paragraph("Standard", "only in copy").unwrap();
        copy.insert_element(&extra, None, InsertPosition::LastChild, 0).unwrap();

        assert_eq!(doc.get_paragraph_list(None, None).unwrap().len(), 1);
        assert_eq!(copy.get_paragraph_list(None, None).unwrap().len(), 2);
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.odt");

        let mut doc = text_document();
        let p = factory::create_paragraph("Standard", "persisted").unwrap();
        doc.insert_element(&p, None, InsertPosition::LastChild, 0).unwrap();
        doc.set_title("Report").unwrap();
        doc.save(Some(path.as_path()), &SaveOptions::default().pretty(true)).unwrap();

        let mut reopened = Document::open(&path).unwrap();
        assert_eq!(reopened.mimetype(), crate::odf::constants::ODF_TEXT);
        let p = reopened.get_paragraph(1, None).unwrap().unwrap();
        assert_eq!(reopened.get_text(p).unwrap(), "persisted");
        assert_eq!(reopened.get_title().unwrap().as_deref(), Some("Report"));

        reopened.set_title("Again").unwrap();
        reopened.save(None, &SaveOptions::default()).unwrap();
        let mut again = Document::open(&path).unwrap();
        assert_eq!(again.get_title().unwrap().as_deref(), Some("Again"));
    }

    #[test]
    fn test_flat_round_trip() {
        let mut doc = text_document();
        let p = factory::create_paragraph("Standard", "flat").unwrap();
        doc.insert_element(&p, None, InsertPosition::LastChild, 0).unwrap();
        let bytes = doc.to_bytes(&SaveOptions::flat()).unwrap();
        assert!(bytes.starts_with(b"<?xml"));

        let mut back = Document::from_bytes(&bytes).unwrap();
        let p = back.get_paragraph(1, None).unwrap().unwrap();
        assert_eq!(back.get_text(p).unwrap(), "flat");
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut doc = text_document();
        assert!(matches!(
            doc.save(None, &SaveOptions::default()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
