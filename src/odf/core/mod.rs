//! ODF package handling.
//!
//! - `package`: reading ZIP packages
//! - `writer`: writing ZIP packages and skeleton parts for new documents
//! - `flat`: single-file XML packaging
//! - `container`: the in-memory package the document layer works on

/// In-memory package
mod container;
/// Flat XML packaging
mod flat;
/// ODF package reading
mod package;
/// ODF package writing
mod writer;

pub use container::{Container, DocumentClass, Packaging, SaveOptions};
pub use package::Package;
pub use writer::{OdfStructure, PackageWriter};
