//! XLSX reading and writing
//!
//! Reading goes through calamine. Writing emits the smallest workbook that
//! spreadsheet applications (and calamine) accept: one worksheet whose cells
//! are all shared strings.
//!
//! ## Written Package
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! xl/workbook.xml
//! xl/_rels/workbook.xml.rels
//! xl/worksheets/sheet1.xml
//! xl/sharedStrings.xml
//! ```

use std::io::{Cursor, Write};
use std::path::Path;

use atomic_write_file::AtomicWriteFile;
use calamine::{open_workbook, DataType, Reader, Xlsx};
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{CepError, Result};

use super::{Record, REQUIRED_COLUMNS};

/// First worksheet of a workbook, as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    /// First used row
    pub header: Vec<String>,

    /// Remaining rows, fully empty rows skipped
    pub rows: Vec<Vec<String>>,
}

// =============================================================================
// Reading
// =============================================================================

/// Read the first worksheet of an `.xlsx` file
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|err| CepError::Spreadsheet {
        path: path.to_path_buf(),
        reason: format!("failed to read xlsx workbook: {err}"),
    })?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(CepError::Spreadsheet {
            path: path.to_path_buf(),
            reason: "workbook has no worksheets".to_string(),
        });
    };

    let range = match workbook.worksheet_range(&sheet_name) {
        Some(Ok(range)) => range,
        Some(Err(err)) => {
            return Err(CepError::Spreadsheet {
                path: path.to_path_buf(),
                reason: format!("failed to read sheet '{sheet_name}': {err}"),
            })
        }
        None => {
            return Err(CepError::Spreadsheet {
                path: path.to_path_buf(),
                reason: format!("sheet '{sheet_name}' not found"),
            })
        }
    };

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());

    let header = rows.next().unwrap_or_default();
    let rows = rows
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Ok(Sheet { header, rows })
}

/// Text form of a cell value
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(v) => v.to_string(),
        DataType::Float(v) | DataType::DateTime(v) | DataType::Duration(v) => float_text(*v),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTimeIso(s) | DataType::DurationIso(s) => s.clone(),
        DataType::Error(_) | DataType::Empty => String::new(),
    }
}

/// Whole floats print without a fractional part: a numeric CEP stays `1000000`
fn float_text(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

// =============================================================================
// Writing
// =============================================================================

/// Write records under the `Cidade, Estado, CEP` header
pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    let header: Vec<&str> = REQUIRED_COLUMNS.iter().map(|c| c.header()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| vec![r.city.clone(), r.state.clone(), r.postal_code.clone()])
        .collect();
    write_sheet(path, &header, &rows)
}

/// Write a single-sheet workbook.
///
/// The file is replaced atomically: the package is written to a temporary
/// file next to `path` and renamed over it on commit.
pub fn write_sheet(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let bytes = build_workbook(header, rows).map_err(|err| CepError::Spreadsheet {
        path: path.to_path_buf(),
        reason: format!("failed to build xlsx package: {err}"),
    })?;

    let mut file = AtomicWriteFile::open(path)?;
    file.write_all(&bytes)?;
    file.commit()?;

    tracing::trace!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn build_workbook(header: &[&str], rows: &[Vec<String>]) -> zip::result::ZipResult<Vec<u8>> {
    let mut strings = SharedStrings::default();
    let mut sheet_rows = String::new();

    let header_row: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    for (index, row) in std::iter::once(&header_row).chain(rows).enumerate() {
        let row_number = index + 1;
        sheet_rows.push_str(&format!("<row r=\"{row_number}\">"));
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let string_id = strings.add(value);
            sheet_rows.push_str(&format!(
                "<c r=\"{}{row_number}\" t=\"s\"><v>{string_id}</v></c>",
                column_letters(col)
            ));
        }
        sheet_rows.push_str("</row>");
    }

    let worksheet = format!(
        "{XML_DECL}<worksheet xmlns=\"{SPREADSHEET_NS}\"><sheetData>{sheet_rows}</sheetData></worksheet>"
    );

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", worksheet),
        ("xl/sharedStrings.xml", strings.into_xml()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in &parts {
        zip.start_file(*name, part_options())?;
        zip.write_all(body.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

fn part_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Spreadsheet column name for a zero-based index: 0 → A, 25 → Z, 26 → AA
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

#[derive(Default)]
struct SharedStrings {
    items: Vec<String>,
}

impl SharedStrings {
    fn add(&mut self, value: &str) -> usize {
        self.items.push(value.to_string());
        self.items.len() - 1
    }

    fn into_xml(self) -> String {
        let count = self.items.len();
        let mut xml = format!(
            "{XML_DECL}<sst xmlns=\"{SPREADSHEET_NS}\" count=\"{count}\" uniqueCount=\"{count}\">"
        );
        for item in &self.items {
            xml.push_str("<si><t xml:space=\"preserve\">");
            xml.push_str(&escape(item.as_str()));
            xml.push_str("</t></si>");
        }
        xml.push_str("</sst>");
        xml
    }
}

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CONTENT_TYPES: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
    "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
    "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
    "<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>",
    "<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
    "<Override PartName=\"/xl/sharedStrings.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml\"/>",
    "</Types>"
);

const ROOT_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>",
    "</Relationships>"
);

const WORKBOOK: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" ",
    "xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">",
    "<sheets><sheet name=\"Sheet1\" sheetId=\"1\" r:id=\"rId1\"/></sheets>",
    "</workbook>"
);

const WORKBOOK_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>",
    "<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings\" Target=\"sharedStrings.xml\"/>",
    "</Relationships>"
);
