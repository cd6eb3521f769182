//! Protocol codec
//!
//! Decoding request bodies into commands and encoding replies as JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{CepError, Result};

use super::{Command, CommandType, Reply};

/// Fields accepted in request bodies (Portuguese names, as the page sends them)
#[derive(Debug, Default, Deserialize)]
struct RequestBody {
    #[serde(default, deserialize_with = "lenient_text")]
    cidade: String,

    #[serde(default, deserialize_with = "lenient_text")]
    estado: String,

    #[serde(default, deserialize_with = "lenient_text")]
    cep: String,
}

/// Decode the body posted to a command's route
///
/// The body is parsed as JSON regardless of the declared content type.
pub fn decode_command(kind: CommandType, body: &[u8]) -> Result<Command> {
    if kind == CommandType::Reload {
        return Ok(Command::Reload);
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(CepError::Protocol("empty request body".to_string()));
    }

    let fields: RequestBody = serde_json::from_slice(body)
        .map_err(|e| CepError::Protocol(format!("invalid JSON body: {}", e)))?;

    Ok(match kind {
        CommandType::Search => Command::Search {
            city: fields.cidade,
            state: fields.estado,
        },
        CommandType::Save => Command::Save {
            city: fields.cidade,
            state: fields.estado,
            postal_code: fields.cep,
        },
        CommandType::Reload => Command::Reload,
    })
}

/// Encode a reply as a JSON body
pub fn encode_reply(reply: &Reply) -> Vec<u8> {
    // Reply types hold only strings, bools and integers
    serde_json::to_vec(reply).unwrap_or_else(|_| b"{}".to_vec())
}

/// Accept any JSON scalar as text; `null` becomes empty
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}
