//! Column schema
//!
//! Both workbooks carry a header row naming the columns. Only three matter,
//! matched by exact name; anything else in the sheet is ignored.

use super::Record;

/// A required spreadsheet column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    City,
    State,
    PostalCode,
}

impl Column {
    /// Header text as it appears in the workbook
    pub const fn header(self) -> &'static str {
        match self {
            Column::City => "Cidade",
            Column::State => "Estado",
            Column::PostalCode => "CEP",
        }
    }
}

/// Columns every dataset must provide, in the order the overlay is written
pub const REQUIRED_COLUMNS: [Column; 3] = [Column::City, Column::State, Column::PostalCode];

/// Positions of the required columns within one sheet's header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMap {
    city: Option<usize>,
    state: Option<usize>,
    postal_code: Option<usize>,
}

impl HeaderMap {
    /// Locate the required columns in a header row (first occurrence wins)
    pub fn resolve(header: &[String]) -> Self {
        let find = |column: Column| header.iter().position(|cell| cell == column.header());
        Self {
            city: find(Column::City),
            state: find(Column::State),
            postal_code: find(Column::PostalCode),
        }
    }

    /// Layout of a workbook written by this service
    pub fn canonical() -> Self {
        Self {
            city: Some(0),
            state: Some(1),
            postal_code: Some(2),
        }
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        match column {
            Column::City => self.city,
            Column::State => self.state,
            Column::PostalCode => self.postal_code,
        }
    }

    /// Required columns absent from this header
    pub fn missing(&self) -> Vec<Column> {
        missing_from_all(&[*self])
    }

    /// Build a record from a data row; absent columns and short rows give empty text
    pub fn record(&self, row: &[String]) -> Record {
        let cell = |column: Column| {
            self.position(column)
                .and_then(|index| row.get(index))
                .cloned()
                .unwrap_or_default()
        };
        Record {
            city: cell(Column::City),
            state: cell(Column::State),
            postal_code: cell(Column::PostalCode),
        }
    }
}

/// Required columns provided by none of the headers
///
/// Concatenated sheets share one column set, so a column only has to appear
/// in one of them.
pub fn missing_from_all(maps: &[HeaderMap]) -> Vec<Column> {
    REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| maps.iter().all(|map| map.position(*column).is_none()))
        .collect()
}
