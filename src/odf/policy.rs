//! Structural insertion policy.
//!
//! Where an element may be placed depends only on its tag. The table below
//! maps each tag with a special rule to its policy; every other tag falls
//! back to [`InsertionPolicy::Generic`]. Supporting a new element kind is a
//! single entry.

use phf::{Map, phf_map};

/// How [`Document::insert_element`](super::document::Document::insert_element)
/// places an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPolicy {
    /// Needs a frame as context and lands under it
    FrameContent,
    /// Needs a context and lands at the requested position under it
    ContextRequired,
    /// Needs a context and is spliced into its text at a character offset
    TextSplice,
    /// Always appended to `office:styles` of the styles part
    StyleRegistry,
    /// Under the context if any, else at the end of the last `office:text`
    Generic,
}

static POLICIES: Map<&'static str, InsertionPolicy> = phf_map! {
    "draw:image" => InsertionPolicy::FrameContent,
    "table:table-column" => InsertionPolicy::ContextRequired,
    "table:table-row" => InsertionPolicy::ContextRequired,
    "table:table-cell" => InsertionPolicy::ContextRequired,
    "text:list-item" => InsertionPolicy::ContextRequired,
    "style:text-properties" => InsertionPolicy::ContextRequired,
    "text:note" => InsertionPolicy::TextSplice,
    "office:annotation" => InsertionPolicy::TextSplice,
    "style:style" => InsertionPolicy::StyleRegistry,
};

impl InsertionPolicy {
    /// Policy for a qualified tag name.
    #[inline]
    pub fn for_tag(tag: &str) -> Self {
        POLICIES.get(tag).copied().unwrap_or(InsertionPolicy::Generic)
    }

    /// Whether insertion fails without a context element.
    pub const fn requires_context(&self) -> bool {
        matches!(
            self,
            InsertionPolicy::FrameContent
                | InsertionPolicy::ContextRequired
                | InsertionPolicy::TextSplice
        )
    }
}
