//! Error type for Loquat operations.
//!
//! The domain variants (`Format` through `Unimplemented`) are local,
//! synchronous conditions: the caller supplied invalid input or violated a
//! structural precondition. None of them is transient.
use thiserror::Error;

/// Main error type for Loquat operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Invalid package or part layout
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Part or structural element not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// Malformed textual value handed to a codec
    #[error("Format error: {0}")]
    Format(String),

    /// Value kind does not match the declared or inferred type
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Value type outside the closed set of cell value types
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// Out-of-range or unknown scalar argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation needs a context element and none was given
    #[error("Missing context: inserting \"{0}\" requires a context element")]
    MissingContext(String),

    /// Cell name is not of the form `<letters><positive row>`
    #[error("Malformed cell name: {0}")]
    MalformedCellName(String),

    /// Cell name lies outside the declared rows/columns
    #[error("Cell \"{0}\" not found")]
    CellNotFound(String),

    /// The target metadata element does not exist
    #[error("Not implemented: {0}")]
    Unimplemented(String),
}

/// Result type for Loquat operations.
pub type Result<T> = std::result::Result<T, Error>;
