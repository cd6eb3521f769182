//! Request handler
//!
//! Maps a method, path and body to a reply. Kept free of socket types so
//! routing can be exercised directly.

use tiny_http::Method;

use crate::engine::Engine;
use crate::error::CepError;
use crate::protocol::{
    decode_command, encode_reply, CommandType, ReloadReply, Reply, SaveReply, SearchReply,
};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");

const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";
const JAVASCRIPT: &str = "application/javascript; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// A response ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpReply {
    fn json(status: u16, reply: &Reply) -> Self {
        Self {
            status,
            content_type: JSON,
            body: encode_reply(reply),
        }
    }

    fn static_asset(content_type: &'static str, body: &str) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn text(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: TEXT,
            body: message.as_bytes().to_vec(),
        }
    }
}

/// Dispatch one request
pub fn route(engine: &Engine, method: &Method, url: &str, body: &[u8]) -> HttpReply {
    let path = url.split_once('?').map_or(url, |(path, _)| path);

    match (method, path) {
        (Method::Get, "/") | (Method::Get, "/index.html") => HttpReply::static_asset(HTML, INDEX_HTML),
        (Method::Get, "/static/script.js") => HttpReply::static_asset(JAVASCRIPT, SCRIPT_JS),
        (_, "/") | (_, "/index.html") | (_, "/static/script.js") => {
            HttpReply::text(405, "Method Not Allowed")
        }
        (_, _) => match CommandType::from_path(path) {
            Some(kind) if *method == Method::Post => execute(engine, kind, body),
            Some(_) => HttpReply::text(405, "Method Not Allowed"),
            None => HttpReply::text(404, "Not Found"),
        },
    }
}

/// Decode, execute and shape the reply for one JSON command
fn execute(engine: &Engine, kind: CommandType, body: &[u8]) -> HttpReply {
    let result = decode_command(kind, body).and_then(|command| engine.execute(command));

    match result {
        Ok(reply) => HttpReply::json(200, &reply),
        Err(e) => {
            let status = status_for(&e);
            if status >= 500 {
                tracing::warn!("{} failed: {}", kind.path(), e);
            } else {
                tracing::debug!("{} rejected: {}", kind.path(), e);
            }
            HttpReply::json(status, &error_reply(kind, &e))
        }
    }
}

/// HTTP status for a failed command
fn status_for(err: &CepError) -> u16 {
    match err {
        CepError::Validation(_) | CepError::Protocol(_) => 400,
        CepError::DatasetUnavailable(_) => 503,
        e if e.is_load_failure() => 503,
        _ => 500,
    }
}

fn error_reply(kind: CommandType, err: &CepError) -> Reply {
    match kind {
        CommandType::Search => Reply::Search(SearchReply::error(err.to_string())),
        CommandType::Save => {
            let message = match err {
                CepError::Validation(msg) => msg.clone(),
                other => format!("Falha ao salvar: {}", other),
            };
            Reply::Save(SaveReply::failure(message))
        }
        CommandType::Reload => Reply::Reload(ReloadReply::failure(err.to_string())),
    }
}
