//! Styles, looked up in the content part first and the styles part second.

use super::{Document, ElementRef};
use crate::common::Result;
use crate::odf::query::QueryFilter;
use crate::odf::types::{PartName, StyleFamily};

const STYLE_PARTS: [PartName; 2] = [PartName::Content, PartName::Styles];

impl Document {
    /// Every `style:style` of `family`, automatic styles of the content
    /// part first.
    pub fn get_style_list(&mut self, family: Option<StyleFamily>) -> Result<Vec<ElementRef>> {
        let mut filter = QueryFilter::new("style:style");
        if let Some(family) = family {
            filter = filter.family(family);
        }
        let mut styles = Vec::new();
        for part in STYLE_PARTS {
            styles.extend(self.get_element_list(&filter, part)?);
        }
        Ok(styles)
    }

    /// The style named `name`; a match in the content part shadows one in
    /// the styles part.
    pub fn get_style(
        &mut self,
        name: &str,
        family: Option<StyleFamily>,
    ) -> Result<Option<ElementRef>> {
        let mut filter = QueryFilter::new("style:style").style_name(name);
        if let Some(family) = family {
            filter = filter.family(family);
        }
        for part in STYLE_PARTS {
            if let Some(style) = self.get_element(&filter, part)? {
                return Ok(Some(style));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::core::{Container, DocumentClass, SaveOptions};
    use crate::odf::elements::InsertPosition;
    use crate::odf::factory;

    fn with_automatic_style() -> Document {
        let mut container = Container::new_from_class(DocumentClass::Text);
        container.set_part(
            PartName::Content.path(),
            concat!(
                "<office:document-content><office:automatic-styles>",
                r#"<style:style style:name="P1" style:family="paragraph"/>"#,
                r#"<style:style style:name="Shared" style:family="paragraph"/>"#,
                "</office:automatic-styles><office:body><office:text/></office:body>",
                "</office:document-content>"
            )
            .as_bytes()
            .to_vec(),
        );
        Document::from_container(container)
    }

    #[test]
    fn test_content_part_comes_first() {
        let mut doc = with_automatic_style();
        for (name, family) in [("Shared", StyleFamily::Paragraph), ("T1", StyleFamily::Text)] {
            let style = factory::create_style(name, family).unwrap();
            doc.insert_element(&style, None, InsertPosition::LastChild, 0)
                .unwrap();
        }

        let all = doc.get_style_list(None).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].part(), PartName::Content);
        assert_eq!(all[3].part(), PartName::Styles);

        let paragraph = doc.get_style_list(Some(StyleFamily::Paragraph)).unwrap();
        assert_eq!(paragraph.len(), 3);

        let shared = doc.get_style("Shared", None).unwrap().unwrap();
        assert_eq!(shared.part(), PartName::Content);
        let text = doc.get_style("T1", Some(StyleFamily::Text)).unwrap().unwrap();
        assert_eq!(text.part(), PartName::Styles);
        assert!(doc.get_style("T1", Some(StyleFamily::Paragraph)).unwrap().is_none());
    }

    #[test]
    fn test_flat_reopen_keeps_style_parts() {
        let mut doc = with_automatic_style();
        let style = factory::create_style("T1", StyleFamily::Text).unwrap();
        doc.insert_element(&style, None, InsertPosition::LastChild, 0)
            .unwrap();
        let parts = |doc: &mut Document| -> Vec<PartName> {
            doc.get_style_list(None)
                .unwrap()
                .iter()
                .map(ElementRef::part)
                .collect()
        };
        let before = parts(&mut doc);
        assert_eq!(before, [PartName::Content, PartName::Content, PartName::Styles]);

        let mut bytes = doc.to_bytes(&SaveOptions::flat()).unwrap();
        for _ in 0..2 {
            let mut reopened = Document::from_bytes(&bytes).unwrap();
            assert_eq!(parts(&mut reopened), before);
            assert_eq!(
                reopened.get_style_list(Some(StyleFamily::Paragraph)).unwrap().len(),
                2
            );
            bytes = reopened.to_bytes(&SaveOptions::flat()).unwrap();
        }
    }

    #[test]
    fn test_style_properties() {
        let mut doc = Document::new_from_class(DocumentClass::Text);
        let style = factory::create_style("Bold", StyleFamily::Text).unwrap();
        let style = doc
            .insert_element(&style, None, InsertPosition::LastChild, 0)
            .unwrap();
        let mut properties = factory::create_style_text_properties();
        properties.set_attribute("fo:font-weight", "bold").unwrap();
        doc.insert_element(&properties, Some(style), InsertPosition::LastChild, 0)
            .unwrap();

        let style = doc.get_style("Bold", None).unwrap().unwrap();
        let weight = doc
            .view(style)
            .unwrap()
            .child("style:text-properties")
            .and_then(|p| p.attribute("fo:font-weight"))
            .map(str::to_string);
        assert_eq!(weight.as_deref(), Some("bold"));
    }
}
