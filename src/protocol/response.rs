//! Response definitions
//!
//! Represents replies to clients.

use serde::{Deserialize, Serialize};

use crate::store::SaveOutcome;

/// Reply to a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReply {
    pub found: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchReply {
    pub fn found(cep: impl Into<String>) -> Self {
        Self {
            found: true,
            cep: Some(cep.into()),
            error: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            cep: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            found: false,
            cep: None,
            error: Some(message.into()),
        }
    }
}

/// Reply to a save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReply {
    pub success: bool,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,

    /// Whether the overlay workbook was written (success only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persisted: Option<bool>,
}

impl SaveReply {
    pub fn saved(outcome: &SaveOutcome) -> Self {
        Self {
            success: true,
            message: outcome.message().to_string(),
            cep: Some(outcome.record.postal_code.clone()),
            persisted: Some(outcome.persisted()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            cep: None,
            persisted: None,
        }
    }
}

/// Reply to a reload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadReply {
    pub success: bool,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
}

impl ReloadReply {
    pub fn reloaded(rows: usize) -> Self {
        Self {
            success: true,
            message: "Bases recarregadas.".to_string(),
            rows: Some(rows),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            rows: None,
        }
    }
}

/// Any reply body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Search(SearchReply),
    Save(SaveReply),
    Reload(ReloadReply),
}
