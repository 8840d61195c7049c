//! Tables, rows and cells.
//!
//! Rows and cells may be stored once for several consecutive positions
//! (`table:number-rows-repeated`, `table:number-columns-repeated`), so a
//! cell name is resolved by walking the stored entries and their repeat
//! counts rather than by indexing.

use super::{Document, ElementRef};
use crate::common::{Error, Result};
use crate::odf::coordinates::{locate_repeated, parse_cell_name, repeat_count};
use crate::odf::types::{CellValue, Lookup};

const ROWS_REPEATED: &str = "table:number-rows-repeated";
const COLUMNS_REPEATED: &str = "table:number-columns-repeated";

impl Document {
    pub fn get_table_list(
        &mut self,
        style: Option<&str>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        let mut filter = Self::filter("table:table", context);
        if let Some(style) = style {
            filter = filter.table_style(style);
        }
        self.content_list(filter)
    }

    /// A table by position (1-based) or by `table:name`.
    pub fn get_table(
        &mut self,
        lookup: &Lookup,
        context: Option<ElementRef>,
    ) -> Result<Option<ElementRef>> {
        let filter = Self::filter("table:table", context);
        let filter = match lookup {
            Lookup::Position(position) => filter.position(*position),
            Lookup::Name(name) => filter.table_name(name),
        };
        self.content_element(filter)
    }

    /// Stored rows; pass the table as context to get only its own rows.
    pub fn get_row_list(
        &mut self,
        style: Option<&str>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        let mut filter = Self::filter("table:table-row", context);
        if let Some(style) = style {
            filter = filter.table_style(style);
        }
        self.content_list(filter)
    }

    /// Stored cells; pass the row as context to get only its own cells.
    pub fn get_cell_list(
        &mut self,
        style: Option<&str>,
        context: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>> {
        let mut filter = Self::filter("table:table-cell", context);
        if let Some(style) = style {
            filter = filter.table_style(style);
        }
        self.content_list(filter)
    }

    /// The cell named `name` (e.g. `"B12"`) in `table`.
    ///
    /// A repeated entry covers every position it stands for, so `"A3"`
    /// resolves to the first row when that row repeats three times.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedCellName`] for a bad name, [`Error::CellNotFound`]
    /// when the table is smaller than the name requires.
    pub fn get_cell(&mut self, name: &str, table: ElementRef) -> Result<ElementRef> {
        let (column, row) = parse_cell_name(name)?;
        let not_found = || Error::CellNotFound(name.to_string());

        let rows = self.get_row_list(None, Some(table))?;
        let rows = self.with_repeats(rows, ROWS_REPEATED)?;
        let row = locate_repeated(rows, row).ok_or_else(not_found)?;

        let cells = self.get_cell_list(None, Some(row))?;
        let cells = self.with_repeats(cells, COLUMNS_REPEATED)?;
        locate_repeated(cells, column).ok_or_else(not_found)
    }

    /// Typed value of a cell.
    pub fn get_cell_value(&mut self, cell: ElementRef) -> Result<CellValue> {
        CellValue::from_cell(self.view(cell)?)
    }

    fn with_repeats(
        &mut self,
        entries: Vec<ElementRef>,
        attribute: &str,
    ) -> Result<Vec<(ElementRef, usize)>> {
        entries
            .into_iter()
            .map(|entry| {
                let repeat = self.get_attribute(entry, attribute)?;
                Ok((entry, repeat_count(repeat.as_deref())))
            })
            .collect()
    }
}
