//! Cell coordinate conversion utilities (A1 notation).
//!
//! Columns and rows are both 1-based here: `A1` is `(1, 1)`, `B12` is
//! `(2, 12)`. Column letters use the spreadsheet scheme `A=1 … Z=26,
//! AA=27`, case-insensitive.
//!
//! Spreadsheet rows and cells may be repeat-compressed (a single entry
//! standing in for N identical siblings). [`locate_repeated`] resolves a
//! logical index against such a sequence without expanding it.

use crate::common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert alphabetic column to its 1-based number
///
/// # Examples
///
/// ```
/// use loquat::odf::coordinates::column_number;
///
/// assert_eq!(column_number("A").unwrap(), 1);
/// assert_eq!(column_number("z").unwrap(), 26);
/// assert_eq!(column_number("AA").unwrap(), 27);
/// ```
pub fn column_number(alpha: &str) -> Result<usize> {
    if alpha.is_empty() || !alpha.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::MalformedCellName(format!(
            "column \"{alpha}\" must contain only letters"
        )));
    }

    alpha.bytes().try_fold(0usize, |column, b| {
        let value = (b.to_ascii_uppercase() - b'A' + 1) as usize;
        column
            .checked_mul(26)
            .and_then(|c| c.checked_add(value))
            .ok_or_else(|| Error::MalformedCellName(format!("column \"{alpha}\" is too large")))
    })
}

/// Convert a 1-based column number to its letters
///
/// Inverse of [`column_number`]. Column 0 has no name and yields an
/// empty string.
///
/// # Examples
///
/// ```
/// use loquat::odf::coordinates::column_name;
///
/// assert_eq!(column_name(1), "A");
/// assert_eq!(column_name(26), "Z");
/// assert_eq!(column_name(27), "AA");
/// assert_eq!(column_name(702), "ZZ");
/// ```
pub fn column_name(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        letters.push(b'A' + ((column - 1) % 26) as u8);
        column = (column - 1) / 26;
    }
    letters.iter().rev().map(|b| *b as char).collect()
}

/// Parse a cell name into 1-based `(column, row)`
///
/// Fails with [`Error::MalformedCellName`] when the letters or the digits
/// are missing, something follows the digits, or the row is not positive.
///
/// # Examples
///
/// ```
/// use loquat::odf::coordinates::parse_cell_name;
///
/// assert_eq!(parse_cell_name("B12").unwrap(), (2, 12));
/// assert!(parse_cell_name("A0").is_err());
/// assert!(parse_cell_name("1A").is_err());
/// ```
pub fn parse_cell_name(name: &str) -> Result<(usize, usize)> {
    let split = name
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(name.len());
    let (alpha, digits) = name.split_at(split);

    if alpha.is_empty() {
        return Err(Error::MalformedCellName(format!(
            "no column letter found in \"{name}\""
        )));
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedCellName(format!(
            "no row number found in \"{name}\""
        )));
    }

    let column = column_number(alpha)?;
    let row: usize = digits
        .parse()
        .map_err(|_| Error::MalformedCellName(format!("row \"{digits}\" is out of range")))?;
    if row == 0 {
        return Err(Error::MalformedCellName(format!(
            "row number in \"{name}\" must be >= 1"
        )));
    }

    Ok((column, row))
}

/// Read a repeat attribute (`table:number-rows-repeated`,
/// `table:number-columns-repeated`). Missing or invalid counts mean 1.
pub fn repeat_count(attribute: Option<&str>) -> usize {
    attribute
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// Find the entry covering a 1-based logical `target` index in a
/// repeat-compressed sequence of `(entry, repeat)` pairs.
///
/// Each entry covers `[count + 1, count + repeat]` where `count` is the
/// sum of the previous repeats. Runs in time linear in the number of
/// stored entries, never in the logical length.
///
/// # Examples
///
/// ```
/// use loquat::odf::coordinates::locate_repeated;
///
/// let rows = [("r1", 1), ("r2", 1000), ("r3", 1)];
/// assert_eq!(locate_repeated(rows, 1), Some("r1"));
/// assert_eq!(locate_repeated(rows, 500), Some("r2"));
/// assert_eq!(locate_repeated(rows, 1002), Some("r3"));
/// assert_eq!(locate_repeated(rows, 1003), None);
/// ```
pub fn locate_repeated<T, I>(entries: I, target: usize) -> Option<T>
where
    I: IntoIterator<Item = (T, usize)>,
{
    let mut count = 0usize;
    for (entry, repeat) in entries {
        let end = count.saturating_add(repeat.max(1));
        if target > count && target <= end {
            return Some(entry);
        }
        count = end;
    }
    None
}

/// Cell coordinates (column, row), both 1-based
///
/// # Examples
///
/// ```
/// use loquat::odf::coordinates::CellCoord;
///
/// let coord = CellCoord::new(2, 3);
/// assert_eq!(coord.to_string(), "B3");
///
/// let coord: CellCoord = "AA10".parse().unwrap();
/// assert_eq!(coord.column(), 27);
/// assert_eq!(coord.row(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    column: usize,
    row: usize,
}

impl CellCoord {
    /// Create a new cell coordinate
    #[inline]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Column number (1-based)
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Row number (1-based)
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }
}

impl FromStr for CellCoord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (column, row) = parse_cell_name(s)?;
        Ok(Self::new(column, row))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}
