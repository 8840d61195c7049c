//! Loquat - A typed object model for OpenDocument files
//!
//! This library reads, builds and edits OpenDocument text, spreadsheet,
//! presentation and drawing documents, in ZIP or flat XML packaging.
//!
//! # Features
//!
//! - **Typed element factory**: paragraphs, headings, tables, cells, frames,
//!   notes, annotations and styles built from domain values
//! - **Structural insertion**: each element kind lands where the format
//!   allows it
//! - **Queries**: find elements by kind, style, name or position
//! - **Spreadsheet cells**: `"B12"`-style lookup over repeated rows and cells
//! - **Metadata**: title, dates, editing cycles, statistics and more
//!
//! # Example - Building a text document
//!
//! ```no_run
//! use loquat::odf::{Document, DocumentClass, InsertPosition, SaveOptions, factory};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::new_from_class(DocumentClass::Text);
//!
//! let heading = factory::create_heading("Heading_20_1", 1, "Results")?;
//! doc.insert_element(&heading, None, InsertPosition::LastChild, 0)?;
//!
//! let table = factory::create_table("Scores", "Table1", Some(2), Some(3))?;
//! doc.insert_element(&table, None, InsertPosition::LastChild, 0)?;
//!
//! doc.set_title("Results")?;
//! doc.save(Some("results.odt".as_ref()), &SaveOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading a spreadsheet cell
//!
//! ```no_run
//! use loquat::odf::{Document, Lookup};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::open("budget.ods")?;
//! if let Some(sheet) = doc.get_table(&Lookup::from("2024"), None)? {
//!     let cell = doc.get_cell("B12", sheet)?;
//!     println!("B12 = {:?}", doc.get_cell_value(cell)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod odf;

pub use common::{Error, Result};
pub use odf::Document;
