//! OpenDocument object model.
//!
//! Build elements with [`factory`], place them with
//! [`Document::insert_element`], find them again with the `get_*` methods
//! of [`Document`], and read or write metadata through the same document.

/// MIME types, part paths and namespaces
pub mod constants;
/// Spreadsheet cell names and repeat-compressed lookup
pub mod coordinates;
/// Package container, ZIP and flat packaging
pub mod core;
/// Text codecs for ODF value types
pub mod datatype;
/// Document facade
pub mod document;
/// XML tree, detached elements, path evaluation
pub mod elements;
/// Typed element constructors
pub mod factory;
/// Where each element kind may be inserted
pub mod policy;
/// Query path builder
pub mod query;
/// Closed vocabularies and cell values
pub mod types;

pub use self::core::{Container, DocumentClass, Packaging, SaveOptions};
pub use document::{Document, ElementRef};
pub use elements::{Element, ElementView, InsertPosition};
pub use query::QueryFilter;
pub use types::{
    CellType, CellValue, FrameAnchor, Lookup, NoteClass, PartName, Statistic, Statistics,
    StyleFamily,
};
