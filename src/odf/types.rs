//! Typed vocabularies shared by the element factory and the document facade.
//!
//! Every closed set of the ODF markup that callers pick from (cell types,
//! style families, note classes, statistic keys) is an enum here, parsed
//! from text with [`FromStr`] and rendered back with `as_str`.

use super::datatype::{Boolean, Date, DateTimeOdf, DurationOdf};
use super::elements::ElementView;
use crate::common::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CELL VALUES
// ============================================================================

/// A typed value accepted by spreadsheet cells.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    /// Fixed-point decimal, kept exact
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// UTF-8 encoded text
    Bytes(Vec<u8>),
    String(String),
    Duration(TimeDelta),
}

impl CellValue {
    /// Short name of the value kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CellValue::Boolean(_) => "boolean",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Decimal(_) => "decimal",
            CellValue::Date(_) => "date",
            CellValue::DateTime(_) => "date-time",
            CellValue::Bytes(_) => "bytes",
            CellValue::String(_) => "string",
            CellValue::Duration(_) => "duration",
        }
    }

    /// Cell type inferred from the value kind.
    ///
    /// Precedence is boolean, numeric, date, date-time, bytes, string,
    /// duration. Each variant maps to exactly one type.
    pub fn inferred_type(&self) -> CellType {
        match self {
            CellValue::Boolean(_) => CellType::Boolean,
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Decimal(_) => CellType::Float,
            CellValue::Date(_) | CellValue::DateTime(_) => CellType::Date,
            CellValue::Bytes(_) | CellValue::String(_) => CellType::String,
            CellValue::Duration(_) => CellType::Time,
        }
    }

    /// Whether the value is one of the numeric kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Decimal(_)
        )
    }

    /// Machine encoding stored in the cell's value attribute.
    pub fn encode(&self) -> Result<String> {
        Ok(match self {
            CellValue::Boolean(b) => Boolean::encode(*b).to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Decimal(d) => d.to_string(),
            CellValue::Date(d) => Date::encode(d),
            CellValue::DateTime(dt) => DateTimeOdf::encode(dt),
            CellValue::Bytes(bytes) => String::from_utf8(bytes.clone()).map_err(|_| {
                Error::InvalidArgument("cell bytes are not valid UTF-8".to_string())
            })?,
            CellValue::String(s) => s.clone(),
            CellValue::Duration(d) => DurationOdf::encode(d)?,
        })
    }

    /// Text displayed in the cell when no representation is supplied.
    pub fn representation(&self) -> Result<String> {
        match self {
            CellValue::Boolean(true) => Ok("true".to_string()),
            CellValue::Boolean(false) => Ok("false".to_string()),
            other => other.encode(),
        }
    }

    /// Read the typed value back out of a `table:table-cell`.
    ///
    /// Numbers come back as [`CellValue::Integer`] when they have no
    /// fractional part and as [`CellValue::Float`] otherwise. A string cell
    /// without `office:string-value` yields its displayed text.
    pub fn from_cell(cell: ElementView<'_>) -> Result<Self> {
        let value_type = cell
            .attribute("office:value-type")
            .ok_or_else(|| Error::Format("cell has no office:value-type".to_string()))?;
        let cell_type: CellType = value_type.parse().map_err(|_| {
            Error::UnsupportedValueType(format!("cell value type \"{value_type}\" is unknown"))
        })?;

        let value = cell.attribute(cell_type.value_attribute());
        if cell_type == CellType::String {
            return Ok(CellValue::String(match value {
                Some(v) => v.to_string(),
                None => cell.text_content(),
            }));
        }

        let value = value.ok_or_else(|| {
            Error::Format(format!(
                "{} cell has no {}",
                cell_type,
                cell_type.value_attribute()
            ))
        })?;

        match cell_type {
            CellType::Boolean => Boolean::decode(value).map(CellValue::Boolean),
            CellType::Currency | CellType::Float | CellType::Percentage => {
                if let Ok(i) = value.parse::<i64>() {
                    Ok(CellValue::Integer(i))
                } else {
                    value.parse::<f64>().map(CellValue::Float).map_err(|_| {
                        Error::Format(format!("cell value \"{value}\" is not a number"))
                    })
                }
            },
            CellType::Date if value.contains('T') => {
                DateTimeOdf::decode(value).map(CellValue::DateTime)
            },
            CellType::Date => Date::decode(value).map(CellValue::Date),
            CellType::Time => DurationOdf::decode(value).map(CellValue::Duration),
            CellType::String => Ok(CellValue::String(value.to_string())),
        }
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl From<Vec<u8>> for CellValue {
    fn from(value: Vec<u8>) -> Self {
        CellValue::Bytes(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<TimeDelta> for CellValue {
    fn from(value: TimeDelta) -> Self {
        CellValue::Duration(value)
    }
}

// ============================================================================
// CELL TYPES
// ============================================================================

/// Value type of a spreadsheet cell (`office:value-type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Boolean,
    Currency,
    Date,
    Float,
    Percentage,
    String,
    Time,
}

impl CellType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CellType::Boolean => "boolean",
            CellType::Currency => "currency",
            CellType::Date => "date",
            CellType::Float => "float",
            CellType::Percentage => "percentage",
            CellType::String => "string",
            CellType::Time => "time",
        }
    }

    /// Attribute holding the machine value for this type.
    pub const fn value_attribute(&self) -> &'static str {
        match self {
            CellType::Boolean => "office:boolean-value",
            CellType::Currency | CellType::Float | CellType::Percentage => "office:value",
            CellType::Date => "office:date-value",
            CellType::String => "office:string-value",
            CellType::Time => "office:time-value",
        }
    }

    /// Whether a value of this kind may be stored under this type.
    pub fn accepts(&self, value: &CellValue) -> bool {
        match self {
            CellType::Boolean => matches!(value, CellValue::Boolean(_)),
            CellType::Currency | CellType::Float | CellType::Percentage => value.is_numeric(),
            CellType::Date => matches!(value, CellValue::Date(_) | CellValue::DateTime(_)),
            CellType::String => true,
            CellType::Time => matches!(value, CellValue::Duration(_)),
        }
    }
}

impl FromStr for CellType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "boolean" => Ok(CellType::Boolean),
            "currency" => Ok(CellType::Currency),
            "date" => Ok(CellType::Date),
            "float" => Ok(CellType::Float),
            "percentage" => Ok(CellType::Percentage),
            "string" => Ok(CellType::String),
            "time" => Ok(CellType::Time),
            _ => Err(Error::InvalidArgument(format!("\"{s}\" is not a valid cell type"))),
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// STYLE FAMILIES
// ============================================================================

/// Family of a `style:style` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleFamily {
    #[default]
    Paragraph,
    Text,
    Section,
    Table,
    TableColumn,
    TableRow,
    TableCell,
    TablePage,
    Chart,
    Default,
    DrawingPage,
    Graphic,
    Presentation,
    Control,
    Ruby,
    PageLayout,
}

impl StyleFamily {
    pub const ALL: [StyleFamily; 16] = [
        StyleFamily::Paragraph,
        StyleFamily::Text,
        StyleFamily::Section,
        StyleFamily::Table,
        StyleFamily::TableColumn,
        StyleFamily::TableRow,
        StyleFamily::TableCell,
        StyleFamily::TablePage,
        StyleFamily::Chart,
        StyleFamily::Default,
        StyleFamily::DrawingPage,
        StyleFamily::Graphic,
        StyleFamily::Presentation,
        StyleFamily::Control,
        StyleFamily::Ruby,
        StyleFamily::PageLayout,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StyleFamily::Paragraph => "paragraph",
            StyleFamily::Text => "text",
            StyleFamily::Section => "section",
            StyleFamily::Table => "table",
            StyleFamily::TableColumn => "table-column",
            StyleFamily::TableRow => "table-row",
            StyleFamily::TableCell => "table-cell",
            StyleFamily::TablePage => "table-page",
            StyleFamily::Chart => "chart",
            StyleFamily::Default => "default",
            StyleFamily::DrawingPage => "drawing-page",
            StyleFamily::Graphic => "graphic",
            StyleFamily::Presentation => "presentation",
            StyleFamily::Control => "control",
            StyleFamily::Ruby => "ruby",
            StyleFamily::PageLayout => "page-layout",
        }
    }
}

impl FromStr for StyleFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("\"{s}\" is not a valid style family")))
    }
}

impl fmt::Display for StyleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// NOTES, FRAMES, LOOKUPS
// ============================================================================

/// Class of a `text:note`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteClass {
    #[default]
    Footnote,
    Endnote,
}

impl NoteClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NoteClass::Footnote => "footnote",
            NoteClass::Endnote => "endnote",
        }
    }
}

impl FromStr for NoteClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "footnote" => Ok(NoteClass::Footnote),
            "endnote" => Ok(NoteClass::Endnote),
            _ => Err(Error::InvalidArgument(format!("\"{s}\" is not a valid note class"))),
        }
    }
}

impl fmt::Display for NoteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anchoring of a `draw:frame`.
///
/// Offsets are carried verbatim with their unit (`"10cm"`, `"2in"`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FrameAnchor {
    #[default]
    Paragraph,
    Page {
        number: u32,
        x: Option<String>,
        y: Option<String>,
    },
}

/// Selects one element either by 1-based position or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Position(usize),
    Name(String),
}

impl From<usize> for Lookup {
    fn from(position: usize) -> Self {
        Lookup::Position(position)
    }
}

impl From<&str> for Lookup {
    fn from(name: &str) -> Self {
        Lookup::Name(name.to_string())
    }
}

// ============================================================================
// DOCUMENT STATISTICS
// ============================================================================

/// Attribute of `meta:document-statistic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Statistic {
    TableCount,
    ImageCount,
    ObjectCount,
    PageCount,
    ParagraphCount,
    WordCount,
    CharacterCount,
}

impl Statistic {
    pub const ALL: [Statistic; 7] = [
        Statistic::TableCount,
        Statistic::ImageCount,
        Statistic::ObjectCount,
        Statistic::PageCount,
        Statistic::ParagraphCount,
        Statistic::WordCount,
        Statistic::CharacterCount,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Statistic::TableCount => "meta:table-count",
            Statistic::ImageCount => "meta:image-count",
            Statistic::ObjectCount => "meta:object-count",
            Statistic::PageCount => "meta:page-count",
            Statistic::ParagraphCount => "meta:paragraph-count",
            Statistic::WordCount => "meta:word-count",
            Statistic::CharacterCount => "meta:character-count",
        }
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("\"{s}\" is not a statistic key")))
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document statistics keyed by statistic.
pub type Statistics = BTreeMap<Statistic, u64>;

// ============================================================================
// PARTS
// ============================================================================

/// XML part of a package the document layer works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PartName {
    #[default]
    Content,
    Styles,
    Meta,
}

impl PartName {
    /// Member path inside the package.
    pub const fn path(&self) -> &'static str {
        match self {
            PartName::Content => super::constants::ODF_CONTENT,
            PartName::Styles => super::constants::ODF_STYLES,
            PartName::Meta => super::constants::ODF_META,
        }
    }
}

impl fmt::Display for PartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
