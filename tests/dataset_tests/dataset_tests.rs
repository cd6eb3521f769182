//! Tests for the Dataset Loader
//!
//! These tests verify:
//! - Base + overlay concatenation order
//! - Optional overlay handling
//! - Missing base file and missing column errors (checked across both sheets)
//! - Header resolution (column order, extra columns)
//! - Overlay read/rewrite helpers

use std::path::Path;

use cep_lookup::dataset::xlsx::{read_sheet, write_records, write_sheet};
use cep_lookup::dataset::{load_tables, read_overlay, DatasetPaths, Record, Source};
use cep_lookup::CepError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn rows(data: &[[&str; 3]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn paths(dir: &Path) -> DatasetPaths {
    DatasetPaths::new(dir.join("cep.xlsx"), dir.join("user_ceps.xlsx"))
}

fn write_base(dir: &Path, records: &[Record]) {
    write_records(&dir.join("cep.xlsx"), records).unwrap();
}

fn write_overlay(dir: &Path, records: &[Record]) {
    write_records(&dir.join("user_ceps.xlsx"), records).unwrap();
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_load_base_only() {
    let temp = TempDir::new().unwrap();
    write_base(
        temp.path(),
        &[
            Record::new("São Paulo", "SP", "01000-000"),
            Record::new("Rio de Janeiro", "RJ", "20000-000"),
        ],
    );

    let table = load_tables(&paths(temp.path())).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.count_from(Source::Base), 2);
    assert_eq!(table.count_from(Source::Overlay), 0);

    let hit = table.find("SAO PAULO", "SP").unwrap();
    assert_eq!(hit.record().city, "São Paulo");
    assert_eq!(hit.record().postal_code, "01000-000");
}

#[test]
fn test_load_appends_overlay_after_base() {
    let temp = TempDir::new().unwrap();
    write_base(temp.path(), &[Record::new("Recife", "PE", "50000-000")]);
    write_overlay(
        temp.path(),
        &[
            Record::new("RECIFE", "PE", "50999-999"),
            Record::new("OLINDA", "PE", "53000-000"),
        ],
    );

    let table = load_tables(&paths(temp.path())).unwrap();
    let sources: Vec<Source> = table.iter().map(|row| row.source()).collect();

    assert_eq!(sources, vec![Source::Base, Source::Overlay, Source::Overlay]);
    // Base wins for identical keys
    assert_eq!(table.find("RECIFE", "PE").unwrap().record().postal_code, "50000-000");
    assert_eq!(table.find("OLINDA", "PE").unwrap().record().postal_code, "53000-000");
}

#[test]
fn test_every_row_found_by_its_own_keys() {
    let temp = TempDir::new().unwrap();
    write_base(
        temp.path(),
        &[
            Record::new("Maceió", "al", "57000-000"),
            Record::new("MACEIO", "AL", "57999-999"),
            Record::new(" Natal ", "RN", "59000-000"),
        ],
    );
    write_overlay(temp.path(), &[Record::new("Cuiabá", "MT", "78000-000")]);

    let table = load_tables(&paths(temp.path())).unwrap();

    for (index, row) in table.iter().enumerate() {
        let hit = table.find(row.city_key(), row.state_key()).unwrap();
        let first = table
            .iter()
            .position(|r| r.city_key() == row.city_key() && r.state_key() == row.state_key())
            .unwrap();
        assert!(first <= index);
        assert_eq!(hit, table.iter().nth(first).unwrap());
    }
}

#[test]
fn test_missing_base_file() {
    let temp = TempDir::new().unwrap();
    write_overlay(temp.path(), &[Record::new("Natal", "RN", "59000-000")]);

    let err = load_tables(&paths(temp.path())).unwrap_err();

    match err {
        CepError::MissingBaseFile { path } => assert!(path.ends_with("cep.xlsx")),
        other => panic!("expected MissingBaseFile, got {:?}", other),
    }
}

#[test]
fn test_missing_columns_are_named() {
    let temp = TempDir::new().unwrap();
    write_sheet(
        &temp.path().join("cep.xlsx"),
        &["Cidade", "UF", "Codigo"],
        &rows(&[["Natal", "RN", "59000-000"]]),
    )
    .unwrap();
    write_sheet(
        &temp.path().join("user_ceps.xlsx"),
        &["Cidade", "Observação"],
        &[vec!["Recife".to_string(), "nova".to_string()]],
    )
    .unwrap();

    let err = load_tables(&paths(temp.path())).unwrap_err();

    match &err {
        CepError::MissingColumns { missing } => {
            assert_eq!(missing, &vec!["Estado".to_string(), "CEP".to_string()]);
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
    assert!(err.to_string().contains("Estado, CEP"));
}

#[test]
fn test_overlay_with_wrong_columns_keeps_base_searchable() {
    let temp = TempDir::new().unwrap();
    write_base(temp.path(), &[Record::new("São Paulo", "SP", "01000-000")]);
    write_sheet(
        &temp.path().join("user_ceps.xlsx"),
        &["City", "Estado", "CEP"],
        &rows(&[["Recife", "PE", "50000-000"]]),
    )
    .unwrap();

    let table = load_tables(&paths(temp.path())).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.find("SAO PAULO", "SP").unwrap().record().postal_code, "01000-000");
    // "City" is not a known column, so the overlay row has no city
    let overlay_row = table.iter().nth(1).unwrap();
    assert_eq!(overlay_row.source(), Source::Overlay);
    assert_eq!(overlay_row.record(), &Record::new("", "PE", "50000-000"));
}

#[test]
fn test_column_may_come_from_either_sheet() {
    let temp = TempDir::new().unwrap();
    write_sheet(
        &temp.path().join("cep.xlsx"),
        &["Cidade", "Estado"],
        &[vec!["Natal".to_string(), "RN".to_string()]],
    )
    .unwrap();
    write_overlay(temp.path(), &[Record::new("RECIFE", "PE", "50000-000")]);

    let table = load_tables(&paths(temp.path())).unwrap();

    assert_eq!(table.find("NATAL", "RN").unwrap().record().postal_code, "");
    assert_eq!(table.find("RECIFE", "PE").unwrap().record().postal_code, "50000-000");
}

#[test]
fn test_columns_in_any_order_with_extras() {
    let temp = TempDir::new().unwrap();
    write_sheet(
        &temp.path().join("cep.xlsx"),
        &["CEP", "Observação", "Estado", "Cidade"],
        &[vec![
            "69000-000".to_string(),
            "capital".to_string(),
            "AM".to_string(),
            "Manaus".to_string(),
        ]],
    )
    .unwrap();

    let table = load_tables(&paths(temp.path())).unwrap();
    let hit = table.find("MANAUS", "AM").unwrap();
    assert_eq!(hit.record(), &Record::new("Manaus", "AM", "69000-000"));
}

#[test]
fn test_empty_sheets_report_all_columns() {
    let temp = TempDir::new().unwrap();
    write_sheet(&temp.path().join("cep.xlsx"), &[], &[]).unwrap();
    write_sheet(&temp.path().join("user_ceps.xlsx"), &["Observação"], &[]).unwrap();

    let err = load_tables(&paths(temp.path())).unwrap_err();
    match err {
        CepError::MissingColumns { missing } => assert_eq!(missing.len(), 3),
        other => panic!("expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn test_header_only_base_gives_empty_table() {
    let temp = TempDir::new().unwrap();
    write_base(temp.path(), &[]);

    let table = load_tables(&paths(temp.path())).unwrap();
    assert!(table.is_empty());
}

// =============================================================================
// Overlay Helpers
// =============================================================================

#[test]
fn test_read_overlay_absent_is_empty() {
    let temp = TempDir::new().unwrap();
    let records = read_overlay(&temp.path().join("user_ceps.xlsx")).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_read_overlay_returns_records_in_order() {
    let temp = TempDir::new().unwrap();
    let written = vec![
        Record::new("RECIFE", "PE", "50000-000"),
        Record::new("OLINDA", "PE", "53000-000"),
    ];
    write_overlay(temp.path(), &written);

    let records = read_overlay(&temp.path().join("user_ceps.xlsx")).unwrap();
    assert_eq!(records, written);
}

#[test]
fn test_read_overlay_tolerates_unknown_header() {
    let temp = TempDir::new().unwrap();
    write_sheet(
        &temp.path().join("user_ceps.xlsx"),
        &["City", "Estado", "CEP"],
        &rows(&[["Recife", "PE", "50000-000"]]),
    )
    .unwrap();

    let records = read_overlay(&temp.path().join("user_ceps.xlsx")).unwrap();
    assert_eq!(records, vec![Record::new("", "PE", "50000-000")]);
}

#[test]
fn test_overlay_header_is_canonical() {
    let temp = TempDir::new().unwrap();
    write_overlay(temp.path(), &[Record::new("RECIFE", "PE", "50000-000")]);

    let sheet = read_sheet(&temp.path().join("user_ceps.xlsx")).unwrap();
    assert_eq!(sheet.header, vec!["Cidade", "Estado", "CEP"]);
    assert_eq!(sheet.rows, vec![vec!["RECIFE", "PE", "50000-000"]]);
}
