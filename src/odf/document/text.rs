//! Sections, paragraphs, headings, lists and notes.

use super::{Document, ElementRef, attach};
use crate::common::{Error, Result};
use crate::odf::elements::{Element, InsertPosition};
use crate::odf::types::NoteClass;

impl Document {
    fn styled(
        &mut self,
        kind: &str,
        style: Option<&str>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        let mut filter = Self::filter(kind, context);
        if let Some(style) = style {
            filter = filter.style(style);
        }
        self.content_list(filter)
    }

    fn nth(
        &mut self,
        kind: &str,
        position: usize,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        self.content_element(Self::filter(kind, context).position(position))
    }

    pub fn get_section_list(
        &mut self,
        style: Option<&str>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        self.styled("text:section", style, context)
    }

    /// The n-th section (1-based).
    pub fn get_section(
        &mut self,
        position: usize,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        self.nth("text:section", position, context)
    }

    pub fn get_paragraph_list(
        &mut self,
        style: Option<&str>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        self.styled("text:p", style, context)
    }

    /// The n-th paragraph (1-based).
    pub fn get_paragraph(
        &mut self,
        position: usize,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        self.nth("text:p", position, context)
    }

    /// Headings, optionally of one style and outline level.
    pub fn get_heading_list(
        &mut self,
        style: Option<&str>,
        level: Option<u32>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        let mut filter = Self::filter("text:h", context);
        if let Some(style) = style {
            filter = filter.style(style);
        }
        if let Some(level) = level {
            filter = filter.level(check_level(level)?);
        }
        self.content_list(filter)
    }

    /// The n-th heading (1-based), counting only headings of `level` if
    /// given.
    pub fn get_heading(
        &mut self,
        position: usize,
        level: Option<u32>,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        let mut filter = Self::filter("text:h", context).position(position);
        if let Some(level) = level {
            filter = filter.level(check_level(level)?);
        }
        self.content_element(filter)
    }

    pub fn get_list_list(
        &mut self,
        style: Option<&str>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        self.styled("text:list", style, context)
    }

    /// The n-th list (1-based).
    pub fn get_list(
        &mut self,
        position: usize,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        self.nth("text:list", position, context)
    }

    /// Footnotes and endnotes, optionally of one class.
    pub fn get_note_list(
        &mut self,
        note_class: Option<NoteClass>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        let mut filter = Self::filter("text:note", context);
        if let Some(note_class) = note_class {
            filter = filter.note_class(note_class);
        }
        self.content_list(filter)
    }

    /// The note whose `text:id` is `id`.
    pub fn get_note(
        &mut self,
        id: &str,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        self.content_element(Self::filter("text:note", context).text_id(id))
    }

    /// Append `element` to the body of `note`.
    ///
    /// # Errors
    ///
    /// [`Error::ComponentNotFound`] if the note has no `text:note-body`.
    pub fn insert_note_body(&mut self, element: &Element, note: ElementRef) -> Result<ElementRef> {
        let tree = self.resolve(note)?;
        let body = tree
            .select(".//text:note-body", Some(note.node()))?
            .pop()
            .ok_or_else(|| Error::ComponentNotFound("text:note-body".to_string()))?;
        let node = attach(tree, element, body, InsertPosition::LastChild)?;
        Ok(ElementRef::new(note.part(), node))
    }
}

fn check_level(level: u32) -> Result<u32> {
    if level < 1 {
        return Err(Error::InvalidArgument("level count begins at 1".to_string()));
    }
    Ok(level)
}
