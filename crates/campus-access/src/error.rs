// Campus Access
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Error handling for access control

use thiserror::Error;

/// Access control error types
///
/// "No assignment found" is deliberately absent: an empty lookup is a normal
/// outcome that falls through to the synthesized permissions table.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Query failed: {message}")]
    QueryFailed { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid action: {value}")]
    InvalidAction { value: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl AccessError {
    /// Get the HTTP status code a transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::Forbidden { .. } => 403,
            AccessError::InvalidAction { .. } => 400,
            AccessError::StoreUnavailable { .. } => 503,
            _ => 500,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            AccessError::StoreUnavailable { .. } => "store_unavailable",
            AccessError::QueryFailed { .. } => "query_failed",
            AccessError::Forbidden { .. } => "forbidden",
            AccessError::InvalidAction { .. } => "invalid_action",
            AccessError::Config { .. } => "config_error",
            AccessError::IoError(_) => "io_error",
            AccessError::SerdeJsonError(_) => "json_error",
            AccessError::TomlError(_) => "toml_error",
        }
    }

    /// Whether this error comes from the assignment store rather than from a decision
    pub fn is_store_failure(&self) -> bool {
        matches!(self, AccessError::StoreUnavailable { .. } | AccessError::QueryFailed { .. })
    }
}

/// Result type for access control operations
pub type AccessResult<T> = Result<T, AccessError>;
