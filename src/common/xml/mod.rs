//! XML text helpers shared by the tree, the factory and the package writer.

mod escape;

pub use escape::{escape_xml, unescape_xml};
