//! Typed element factory.
//!
//! One constructor per element kind. Each validates its arguments, then
//! fills a fixed markup template; free text is escaped before it is
//! substituted. The returned [`Element`] is detached until it is passed to
//! [`Document::insert_element`](super::document::Document::insert_element).
//!
//! ```
//! use loquat::odf::factory::{create_cell, create_table};
//!
//! let table = create_table("Sheet1", "ta1", Some(2), Some(2)).unwrap();
//! assert_eq!(table.view().children().len(), 2);
//!
//! let cell = create_cell(true, None, None, None).unwrap();
//! assert_eq!(cell.get_attribute("office:value-type"), Some("boolean"));
//! ```

use super::datatype::DateTimeOdf;
use super::elements::Element;
use super::types::{CellType, CellValue, FrameAnchor, NoteClass, StyleFamily};
use crate::common::xml::escape_xml;
use crate::common::{Error, Result};
use chrono::{Local, NaiveDateTime, Timelike};

fn check_style(style: &str) -> Result<()> {
    if style.is_empty() {
        return Err(Error::InvalidArgument("a style name is expected".to_string()));
    }
    Ok(())
}

fn check_currency(currency: Option<&str>) -> Result<&str> {
    let code = currency.ok_or_else(|| {
        Error::InvalidArgument("currency is mandatory in monetary cells".to_string())
    })?;
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(Error::InvalidArgument(format!(
            "currency \"{code}\" must be a three-letter code"
        )));
    }
    Ok(code)
}

/// Create a section of the given style.
pub fn create_section(style: &str) -> Result<Element> {
    check_style(style)?;
    Element::from_xml(&format!(
        r#"<text:section text:style-name="{}"></text:section>"#,
        escape_xml(style)
    ))
}

/// Create a paragraph of the given style holding `text`.
pub fn create_paragraph(style: &str, text: &str) -> Result<Element> {
    check_style(style)?;
    Element::from_xml(&format!(
        r#"<text:p text:style-name="{}">{}</text:p>"#,
        escape_xml(style),
        escape_xml(text)
    ))
}

/// Create a heading of the given style and outline level (from 1).
pub fn create_heading(style: &str, level: u32, text: &str) -> Result<Element> {
    check_style(style)?;
    if level < 1 {
        return Err(Error::InvalidArgument("level count begins at 1".to_string()));
    }
    Element::from_xml(&format!(
        r#"<text:h text:style-name="{}" text:outline-level="{}">{}</text:h>"#,
        escape_xml(style),
        level,
        escape_xml(text)
    ))
}

/// Create a frame of the given style and size.
///
/// Width, height and the page offsets are strings including their unit,
/// e.g. `"10cm"`.
pub fn create_frame(
    name: &str,
    style: &str,
    width: &str,
    height: &str,
    anchor: &FrameAnchor,
) -> Result<Element> {
    check_style(style)?;
    let anchor = match anchor {
        FrameAnchor::Paragraph => r#"text:anchor-type="paragraph""#.to_string(),
        FrameAnchor::Page { number, x, y } => {
            if *number < 1 {
                return Err(Error::InvalidArgument("page count begins at 1".to_string()));
            }
            let mut anchor =
                format!(r#"text:anchor-type="page" text:anchor-page-number="{number}""#);
            if let Some(x) = x {
                anchor.push_str(&format!(r#" svg:x="{}""#, escape_xml(x)));
            }
            if let Some(y) = y {
                anchor.push_str(&format!(r#" svg:y="{}""#, escape_xml(y)));
            }
            anchor
        },
    };
    Element::from_xml(&format!(
        r#"<draw:frame draw:name="{}" draw:style-name="{}" svg:width="{}" svg:height="{}" {}/>"#,
        escape_xml(name),
        escape_xml(style),
        escape_xml(width),
        escape_xml(height),
        anchor
    ))
}

/// Create an image showing the picture at `uri`.
pub fn create_image(uri: &str) -> Result<Element> {
    Element::from_xml(&format!(r#"<draw:image xlink:href="{}"/>"#, escape_xml(uri)))
}

/// Create a cell holding `value`.
///
/// Without an explicit `cell_type` the type is inferred from the value
/// kind; percentage and currency are never inferred. A currency cell needs
/// a three-letter `currency` code. The displayed text defaults to the
/// value's own encoding and is stored as a `text:p` child when non-empty.
pub fn create_cell(
    value: impl Into<CellValue>,
    representation: Option<&str>,
    cell_type: Option<CellType>,
    currency: Option<&str>,
) -> Result<Element> {
    let value = value.into();
    let cell_type = match cell_type {
        Some(explicit) if !explicit.accepts(&value) => {
            return Err(Error::TypeMismatch(format!(
                "a {} value cannot be stored in a {} cell",
                value.kind_name(),
                explicit
            )));
        },
        Some(explicit) => explicit,
        None => value.inferred_type(),
    };

    let encoded = value.encode()?;
    let representation = match representation {
        Some(text) => text.to_string(),
        None => value.representation()?,
    };

    let mut cell = Element::from_xml(&format!(
        r#"<table:table-cell office:value-type="{}"/>"#,
        cell_type
    ))?;
    cell.set_attribute(cell_type.value_attribute(), &encoded)?;
    if cell_type == CellType::Currency {
        cell.set_attribute("office:currency", check_currency(currency)?)?;
    }
    if !representation.is_empty() {
        let mut paragraph = Element::new("text:p");
        paragraph.set_text(&representation)?;
        cell.append_element(&paragraph)?;
    }
    Ok(cell)
}

/// Create a row, optionally filled with `width` empty string cells.
pub fn create_row(width: Option<usize>) -> Result<Element> {
    let mut row = Element::new("table:table-row");
    if let Some(width) = width {
        let cell = create_cell("", None, None, None)?;
        for _ in 0..width {
            row.append_element(&cell)?;
        }
    }
    Ok(row)
}

/// Create a column of the given style.
pub fn create_column(style: &str) -> Result<Element> {
    check_style(style)?;
    Element::from_xml(&format!(
        r#"<table:table-column table:style-name="{}"/>"#,
        escape_xml(style)
    ))
}

/// Create a table of the given style.
///
/// When either dimension is given, the table is filled with `height` rows
/// of `width` empty cells, a missing dimension counting as 1.
pub fn create_table(
    name: &str,
    style: &str,
    width: Option<usize>,
    height: Option<usize>,
) -> Result<Element> {
    check_style(style)?;
    let mut table = Element::from_xml(&format!(
        r#"<table:table table:name="{}" table:style-name="{}"/>"#,
        escape_xml(name),
        escape_xml(style)
    ))?;
    if width.is_some() || height.is_some() {
        let row = create_row(Some(width.unwrap_or(1)))?;
        for _ in 0..height.unwrap_or(1) {
            table.append_element(&row)?;
        }
    }
    Ok(table)
}

/// Create a list of the given style.
pub fn create_list(style: &str) -> Result<Element> {
    check_style(style)?;
    Element::from_xml(&format!(
        r#"<text:list text:style-name="{}"/>"#,
        escape_xml(style)
    ))
}

/// Create a list item, with `text` as its first paragraph.
///
/// For richer items, insert an empty item first and use it as the context
/// of further insertions.
pub fn create_list_item(text: Option<&str>) -> Result<Element> {
    let mut item = Element::new("text:list-item");
    if let Some(text) = text {
        let mut paragraph = Element::new("text:p");
        paragraph.set_text(text)?;
        item.append_element(&paragraph)?;
    }
    Ok(item)
}

/// Create a named style of the given family.
pub fn create_style(name: &str, family: StyleFamily) -> Result<Element> {
    check_style(name)?;
    Element::from_xml(&format!(
        r#"<style:style style:name="{}" style:family="{}"/>"#,
        escape_xml(name),
        family
    ))
}

/// Create an empty text-properties element.
pub fn create_style_text_properties() -> Element {
    Element::new("style:text-properties")
}

/// Create a footnote or endnote whose citation is `text`.
pub fn create_note(text: &str, note_class: NoteClass, id: Option<&str>) -> Result<Element> {
    let mut note = Element::from_xml(&format!(
        concat!(
            r#"<text:note text:note-class="{}">"#,
            "<text:note-citation>{}</text:note-citation>",
            "<text:note-body/>",
            "</text:note>"
        ),
        note_class,
        escape_xml(text)
    ))?;
    if let Some(id) = id {
        note.set_attribute("text:id", id)?;
    }
    Ok(note)
}

/// Create an annotation by `creator`, dated now unless `date` is given.
pub fn create_annotation(
    creator: &str,
    text: &str,
    date: Option<NaiveDateTime>,
) -> Result<Element> {
    let date = match date {
        Some(date) => date,
        None => {
            let now = Local::now().naive_local();
            now.with_nanosecond(0).unwrap_or(now)
        },
    };
    Element::from_xml(&format!(
        concat!(
            "<office:annotation>",
            "<dc:creator>{}</dc:creator>",
            "<dc:date>{}</dc:date>",
            "<text:p>{}</text:p>",
            "</office:annotation>"
        ),
        escape_xml(creator),
        DateTimeOdf::encode(&date),
        escape_xml(text)
    ))
}
