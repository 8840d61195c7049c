//! Annotations (comments) filtered by author and date.

use super::{Document, ElementRef};
use crate::common::Result;
use crate::odf::datatype::DateTimeOdf;
use chrono::NaiveDateTime;

impl Document {
    /// Annotations by `creator`, dated within `[start, end)`.
    ///
    /// Every bound is optional. The date of an annotation is its `dc:date`
    /// child; an annotation without one only passes when no date bound is
    /// given.
    pub fn get_annotation_list(
        &mut self,
        creator: Option<&str>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        let candidates = self.content_list(Self::filter("office:annotation", context))?;
        let mut annotations = Vec::with_capacity(candidates.len());
        for annotation in candidates {
            let view = self.view(annotation)?;
            if let Some(creator) = creator
                && view.child("dc:creator").map(|c| c.text_content()).as_deref() != Some(creator)
            {
                continue;
            }
            if start.is_some() || end.is_some() {
                let Some(date) = view.child("dc:date") else {
                    continue;
                };
                let date = DateTimeOdf::decode(&date.text_content())?;
                if start.is_some_and(|start| date < start) || end.is_some_and(|end| date >= end) {
                    continue;
                }
            }
            annotations.push(annotation);
        }
        Ok(annotations)
    }

    /// First annotation matching the same filters as
    /// [`get_annotation_list`](Self::get_annotation_list).
    pub fn get_annotation(
        &mut self,
        creator: Option<&str>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        Ok(self
            .get_annotation_list(creator, start, end, context)?
            .into_iter()
            .next())
    }
}
