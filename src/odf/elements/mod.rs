//! ODF XML element storage.
//!
//! Parts are held as arena trees ([`tree::XmlTree`]); factory output is a
//! detached [`element::Element`]; [`path`] evaluates query paths over a tree.

/// Detached element fragments
pub mod element;
/// Path expression evaluation
pub mod path;
/// Arena-backed XML tree
pub mod tree;

pub use element::Element;
pub use tree::{ElementView, InsertPosition, NodeId, XmlTree};
