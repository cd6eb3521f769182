//! Tests for the Protocol Codec
//!
//! These tests verify:
//! - Request body decoding for each route
//! - Lenient field coercion
//! - Malformed body rejection
//! - Reply JSON shapes

use cep_lookup::protocol::{
    decode_command, encode_reply, Command, CommandType, ReloadReply, Reply, SaveReply, SearchReply,
};
use cep_lookup::CepError;
use serde_json::{json, Value};

fn encoded(reply: &Reply) -> Value {
    serde_json::from_slice(&encode_reply(reply)).unwrap()
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_search() {
    let command = decode_command(
        CommandType::Search,
        br#"{"cidade": "Sao Paulo", "estado": "sp"}"#,
    )
    .unwrap();

    assert_eq!(
        command,
        Command::Search {
            city: "Sao Paulo".to_string(),
            state: "sp".to_string(),
        }
    );
    assert_eq!(command.command_type(), CommandType::Search);
}

#[test]
fn test_decode_save() {
    let command = decode_command(
        CommandType::Save,
        br#"{"cidade": "Recife", "estado": "PE", "cep": "50000-000"}"#,
    )
    .unwrap();

    assert_eq!(
        command,
        Command::Save {
            city: "Recife".to_string(),
            state: "PE".to_string(),
            postal_code: "50000-000".to_string(),
        }
    );
}

#[test]
fn test_missing_fields_decode_as_empty() {
    let command = decode_command(CommandType::Save, br#"{"cidade": "Recife"}"#).unwrap();

    assert_eq!(
        command,
        Command::Save {
            city: "Recife".to_string(),
            state: String::new(),
            postal_code: String::new(),
        }
    );
}

#[test]
fn test_scalar_fields_are_coerced_to_text() {
    let command = decode_command(
        CommandType::Save,
        br#"{"cidade": null, "estado": true, "cep": 50000000}"#,
    )
    .unwrap();

    assert_eq!(
        command,
        Command::Save {
            city: String::new(),
            state: "true".to_string(),
            postal_code: "50000000".to_string(),
        }
    );
}

#[test]
fn test_unknown_fields_are_ignored() {
    let command = decode_command(
        CommandType::Search,
        br#"{"cidade": "Natal", "estado": "RN", "pais": "BR"}"#,
    )
    .unwrap();

    assert!(matches!(command, Command::Search { .. }));
}

#[test]
fn test_invalid_json_is_protocol_error() {
    let err = decode_command(CommandType::Search, b"cidade=Natal&estado=RN").unwrap_err();
    assert!(matches!(err, CepError::Protocol(ref msg) if msg.starts_with("invalid JSON body")));

    // Valid JSON, wrong shape
    let err = decode_command(CommandType::Search, b"[1, 2, 3]").unwrap_err();
    assert!(matches!(err, CepError::Protocol(_)));
}

#[test]
fn test_empty_body_is_protocol_error() {
    for body in [&b""[..], &b"  \r\n"[..]] {
        let err = decode_command(CommandType::Save, body).unwrap_err();
        assert!(matches!(err, CepError::Protocol(ref msg) if msg == "empty request body"));
    }
}

#[test]
fn test_reload_ignores_body() {
    assert_eq!(decode_command(CommandType::Reload, b"").unwrap(), Command::Reload);
    assert_eq!(
        decode_command(CommandType::Reload, b"not json").unwrap(),
        Command::Reload
    );
}

#[test]
fn test_command_type_paths() {
    assert_eq!(CommandType::from_path("/buscar"), Some(CommandType::Search));
    assert_eq!(CommandType::from_path("/salvar"), Some(CommandType::Save));
    assert_eq!(CommandType::from_path("/recarregar"), Some(CommandType::Reload));
    assert_eq!(CommandType::from_path("/buscar/"), None);
    assert_eq!(CommandType::Save.path(), "/salvar");
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_search_found() {
    let value = encoded(&Reply::Search(SearchReply::found("01000-000")));
    assert_eq!(value, json!({"found": true, "cep": "01000-000"}));
}

#[test]
fn test_encode_search_not_found_has_no_cep() {
    let value = encoded(&Reply::Search(SearchReply::not_found()));
    assert_eq!(value, json!({"found": false}));
}

#[test]
fn test_encode_search_error() {
    let value = encoded(&Reply::Search(SearchReply::error("Dataset unavailable")));
    assert_eq!(value, json!({"found": false, "error": "Dataset unavailable"}));
}

#[test]
fn test_encode_save_failure() {
    let value = encoded(&Reply::Save(SaveReply::failure(
        "Cidade, estado e CEP são obrigatórios.",
    )));
    assert_eq!(
        value,
        json!({"success": false, "message": "Cidade, estado e CEP são obrigatórios."})
    );
}

#[test]
fn test_encode_reload() {
    let value = encoded(&Reply::Reload(ReloadReply::reloaded(42)));
    assert_eq!(
        value,
        json!({"success": true, "message": "Bases recarregadas.", "rows": 42})
    );
}

#[test]
fn test_search_reply_round_trips_through_client_shape() {
    let reply: SearchReply = serde_json::from_str(r#"{"found": false}"#).unwrap();
    assert_eq!(reply, SearchReply::not_found());
}
