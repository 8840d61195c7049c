//! Document metadata from `meta.xml`.
//!
//! Getters return `Ok(None)` when the metadata element is absent. Setters
//! only rewrite existing elements and fail with
//! [`Error::Unimplemented`] otherwise.

use super::{Document, ElementRef};
use crate::common::{Error, Result};
use crate::odf::datatype::{DateTimeOdf, DurationOdf};
use crate::odf::query::QueryFilter;
use crate::odf::types::{PartName, Statistic, Statistics};
use chrono::{NaiveDateTime, TimeDelta};

const TITLE: &str = "dc:title";
const DESCRIPTION: &str = "dc:description";
const SUBJECT: &str = "dc:subject";
const LANGUAGE: &str = "dc:language";
const MODIFICATION_DATE: &str = "dc:date";
const CREATION_DATE: &str = "meta:creation-date";
const INITIAL_CREATOR: &str = "meta:initial-creator";
const KEYWORD: &str = "meta:keyword";
const EDITING_DURATION: &str = "meta:editing-duration";
const EDITING_CYCLES: &str = "meta:editing-cycles";
const GENERATOR: &str = "meta:generator";
const DOCUMENT_STATISTIC: &str = "meta:document-statistic";

impl Document {
    fn meta_element(&mut self, tag: &str) -> Result<Option<ElementRef>> {
        self.get_element(&QueryFilter::new(tag), PartName::Meta)
    }

    fn existing_meta_element(&mut self, tag: &str) -> Result<ElementRef> {
        self.meta_element(tag)?
            .ok_or_else(|| Error::Unimplemented(format!("creating a missing {tag} element")))
    }

    // Leading text only, the part `set_text` rewrites.
    fn meta_text(&mut self, tag: &str) -> Result<Option<String>> {
        match self.meta_element(tag)? {
            Some(element) => self.get_text(element).map(Some),
            None => Ok(None),
        }
    }

    fn set_meta_text(&mut self, tag: &str, text: &str) -> Result<()> {
        let element = self.existing_meta_element(tag)?;
        self.set_text(element, text)
    }

    pub fn get_title(&mut self) -> Result<Option<String>> {
        self.meta_text(TITLE)
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.set_meta_text(TITLE, title)
    }

    pub fn get_description(&mut self) -> Result<Option<String>> {
        self.meta_text(DESCRIPTION)
    }

    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.set_meta_text(DESCRIPTION, description)
    }

    pub fn get_subject(&mut self) -> Result<Option<String>> {
        self.meta_text(SUBJECT)
    }

    pub fn set_subject(&mut self, subject: &str) -> Result<()> {
        self.set_meta_text(SUBJECT, subject)
    }

    /// Language code, conventionally `xx-YY`.
    pub fn get_language(&mut self) -> Result<Option<String>> {
        self.meta_text(LANGUAGE)
    }

    /// Set the language code. The value is stored as given.
    pub fn set_language(&mut self, language: &str) -> Result<()> {
        self.set_meta_text(LANGUAGE, language)
    }

    /// Date of the last modification (`dc:date`).
    pub fn get_modification_date(&mut self) -> Result<Option<NaiveDateTime>> {
        self.meta_text(MODIFICATION_DATE)?
            .map(|text| DateTimeOdf::decode(&text))
            .transpose()
    }

    pub fn set_modification_date(&mut self, date: &NaiveDateTime) -> Result<()> {
        self.set_meta_text(MODIFICATION_DATE, &DateTimeOdf::encode(date))
    }

    pub fn get_creation_date(&mut self) -> Result<Option<NaiveDateTime>> {
        self.meta_text(CREATION_DATE)?
            .map(|text| DateTimeOdf::decode(&text))
            .transpose()
    }

    pub fn set_creation_date(&mut self, date: &NaiveDateTime) -> Result<()> {
        self.set_meta_text(CREATION_DATE, &DateTimeOdf::encode(date))
    }

    pub fn get_initial_creator(&mut self) -> Result<Option<String>> {
        self.meta_text(INITIAL_CREATOR)
    }

    pub fn set_initial_creator(&mut self, creator: &str) -> Result<()> {
        self.set_meta_text(INITIAL_CREATOR, creator)
    }

    pub fn get_keyword(&mut self) -> Result<Option<String>> {
        self.meta_text(KEYWORD)
    }

    pub fn set_keyword(&mut self, keyword: &str) -> Result<()> {
        self.set_meta_text(KEYWORD, keyword)
    }

    /// Total time spent editing the document.
    pub fn get_editing_duration(&mut self) -> Result<Option<TimeDelta>> {
        self.meta_text(EDITING_DURATION)?
            .map(|text| DurationOdf::decode(&text))
            .transpose()
    }

    pub fn set_editing_duration(&mut self, duration: &TimeDelta) -> Result<()> {
        self.set_meta_text(EDITING_DURATION, &DurationOdf::encode(duration)?)
    }

    /// Number of times the document was edited and saved.
    pub fn get_editing_cycles(&mut self) -> Result<Option<i64>> {
        self.meta_text(EDITING_CYCLES)?
            .map(|text| {
                text.trim().parse().map_err(|_| {
                    Error::Format(format!("editing cycles \"{text}\" is not an integer"))
                })
            })
            .transpose()
    }

    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `cycles` is below 1.
    pub fn set_editing_cycles(&mut self, cycles: i64) -> Result<()> {
        if cycles < 1 {
            return Err(Error::InvalidArgument(
                "editing cycles must be at least 1".to_string(),
            ));
        }
        self.set_meta_text(EDITING_CYCLES, &cycles.to_string())
    }

    /// Application that wrote the document.
    pub fn get_generator(&mut self) -> Result<Option<String>> {
        self.meta_text(GENERATOR)
    }

    pub fn set_generator(&mut self, generator: &str) -> Result<()> {
        self.set_meta_text(GENERATOR, generator)
    }

    /// Counts from `meta:document-statistic`.
    ///
    /// Only the statistics present as attributes are returned.
    pub fn get_statistic(&mut self) -> Result<Option<Statistics>> {
        let Some(element) = self.meta_element(DOCUMENT_STATISTIC)? else {
            return Ok(None);
        };
        let mut statistics = Statistics::new();
        for key in Statistic::ALL {
            if let Some(value) = self.get_attribute(element, key.as_str())? {
                let count = value.trim().parse().map_err(|_| {
                    Error::Format(format!("{key} \"{value}\" is not a count"))
                })?;
                statistics.insert(key, count);
            }
        }
        Ok(Some(statistics))
    }

    /// Overwrite the given statistics; the others are left unchanged.
    pub fn set_statistic(&mut self, statistics: &Statistics) -> Result<()> {
        let element = self.existing_meta_element(DOCUMENT_STATISTIC)?;
        for (key, count) in statistics {
            self.set_attribute(element, key.as_str(), &count.to_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::core::{Container, DocumentClass};
    use chrono::NaiveDate;

    fn document() -> Document {
        Document::new_from_class(DocumentClass::Text)
    }

    #[test]
    fn test_text_fields() {
        let mut doc = document();
        assert_eq!(doc.get_language().unwrap().as_deref(), Some("en-US"));
        assert!(doc.get_generator().unwrap().is_some_and(|g| g.starts_with("Loquat/")));

        doc.set_title("Quarterly report").unwrap();
        doc.set_description("Numbers & words").unwrap();
        doc.set_subject("Finance").unwrap();
        doc.set_language("fr-FR").unwrap();
        doc.set_initial_creator("Dana").unwrap();
        doc.set_generator("tests").unwrap();

        assert_eq!(doc.get_title().unwrap().as_deref(), Some("Quarterly report"));
        assert_eq!(doc.get_description().unwrap().as_deref(), Some("Numbers & words"));
        assert_eq!(doc.get_subject().unwrap().as_deref(), Some("Finance"));
        assert_eq!(doc.get_language().unwrap().as_deref(), Some("fr-FR"));
        assert_eq!(doc.get_initial_creator().unwrap().as_deref(), Some("Dana"));
        assert_eq!(doc.get_generator().unwrap().as_deref(), Some("tests"));
    }

    #[test]
    fn test_getters_read_leading_text() {
        let mut container = Container::new_from_class(DocumentClass::Text);
        container.set_part(
            PartName::Meta.path(),
            concat!(
                "<office:document-meta><office:meta>",
                "<dc:title>Lead<text:span>ing</text:span> tail</dc:title>",
                "</office:meta></office:document-meta>"
            )
            .as_bytes()
            .to_vec(),
        );
        let mut doc = Document::from_container(container);
        assert_eq!(doc.get_title().unwrap().as_deref(), Some("Lead"));
        doc.set_title("New").unwrap();
        assert_eq!(doc.get_title().unwrap().as_deref(), Some("New"));
    }

    #[test]
    fn test_missing_element() {
        let mut doc = document();
        assert!(doc.get_keyword().unwrap().is_none());
        assert!(matches!(doc.set_keyword("odf"), Err(Error::Unimplemented(_))));
    }

    #[test]
    fn test_dates_and_duration() {
        let mut doc = document();
        assert!(doc.get_creation_date().unwrap().is_some());

        let date = NaiveDate::from_ymd_opt(2009, 7, 1)
            .unwrap()
            .and_hms_opt(12, 30, 5)
            .unwrap();
        doc.set_modification_date(&date).unwrap();
        doc.set_creation_date(&date).unwrap();
        assert_eq!(doc.get_modification_date().unwrap(), Some(date));
        assert_eq!(doc.get_creation_date().unwrap(), Some(date));

        assert_eq!(doc.get_editing_duration().unwrap(), Some(TimeDelta::zero()));
        let duration = TimeDelta::try_hours(26).unwrap() + TimeDelta::try_seconds(7).unwrap();
        doc.set_editing_duration(&duration).unwrap();
        assert_eq!(doc.get_editing_duration().unwrap(), Some(duration));
        assert!(doc.set_editing_duration(&-duration).is_err());
    }

    #[test]
    fn test_editing_cycles() {
        let mut doc = document();
        assert_eq!(doc.get_editing_cycles().unwrap(), Some(1));
        doc.set_editing_cycles(4).unwrap();
        assert_eq!(doc.get_editing_cycles().unwrap(), Some(4));
        assert!(matches!(doc.set_editing_cycles(0), Err(Error::InvalidArgument(_))));
        assert_eq!(doc.get_editing_cycles().unwrap(), Some(4));
    }

    #[test]
    fn test_statistics() {
        let mut doc = document();
        let statistics = doc.get_statistic().unwrap().unwrap();
        assert_eq!(statistics.len(), 7);
        assert!(statistics.values().all(|count| *count == 0));

        let update = Statistics::from([(Statistic::WordCount, 42), (Statistic::PageCount, 3)]);
        doc.set_statistic(&update).unwrap();
        let statistics = doc.get_statistic().unwrap().unwrap();
        assert_eq!(statistics[&Statistic::WordCount], 42);
        assert_eq!(statistics[&Statistic::PageCount], 3);
        assert_eq!(statistics[&Statistic::TableCount], 0);
    }
}
