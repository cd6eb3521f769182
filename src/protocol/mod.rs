//! Protocol Module
//!
//! JSON bodies exchanged over HTTP.
//!
//! ## Requests
//! | Path          | Body                                   |
//! |---------------|----------------------------------------|
//! | `/buscar`     | `{"cidade": "...", "estado": "..."}`   |
//! | `/salvar`     | `{"cidade": "...", "estado": "...", "cep": "..."}` |
//! | `/recarregar` | ignored                                |
//!
//! Missing fields read as empty text; numbers and booleans are coerced to
//! text; `null` is empty.
//!
//! ## Replies
//! - search: `{"found": true, "cep": "..."}` / `{"found": false}` /
//!   `{"found": false, "error": "..."}`
//! - save: `{"success": true, "message": "...", "cep": "...", "persisted": bool}` /
//!   `{"success": false, "message": "..."}`
//! - reload: `{"success": bool, "message": "...", "rows": n}`

mod codec;
mod command;
mod response;

pub use codec::{decode_command, encode_reply};
pub use command::{Command, CommandType};
pub use response::{ReloadReply, Reply, SaveReply, SearchReply};
