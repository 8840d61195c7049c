//! Frames and the images they hold.

use super::{Document, ElementRef};
use crate::common::Result;
use crate::odf::types::Lookup;

impl Document {
    pub fn get_frame_list(
        &mut self,
        style: Option<&str>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        let mut filter = Self::filter("draw:frame", context);
        if let Some(style) = style {
            filter = filter.frame_style(style);
        }
        self.content_list(filter)
    }

    /// A frame by position (1-based) or by `draw:name`.
    pub fn get_frame(
        &mut self,
        lookup: &Lookup,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        let filter = Self::filter("draw:frame", context);
        let filter = match lookup {
            Lookup::Position(position) => filter.position(*position),
            Lookup::Name(name) => filter.frame_name(name),
        };
        self.content_element(filter)
    }

    /// The image inside the frame found by `lookup`.
    pub fn get_image(
        &mut self,
        lookup: &Lookup,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        match self.get_frame(lookup, context)? {
            Some(frame) => self.content_element(Self::filter("draw:image", Some(frame))),
            None => Ok(None),
        }
    }
}
