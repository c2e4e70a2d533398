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

//! Configuration management for access control

use crate::error::AccessResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Configuration for the access control layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Record access decisions in the audit trail
    pub audit_enabled: bool,

    /// Maximum number of audit events kept in memory
    pub audit_max_events: usize,

    /// Checks slower than this are logged as warnings
    pub slow_check_threshold_ms: u64,

    /// Role name reported by the synthesized table when no assignment exists
    pub fallback_role_name: String,

    /// Role name shown to global admins when listing resources
    pub admin_listing_role_name: String,

    /// Role description shown to global admins when listing resources
    pub admin_listing_role_description: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            audit_enabled: true,
            audit_max_events: 10_000,
            slow_check_threshold_ms: 5,
            fallback_role_name: "admin".to_string(),
            admin_listing_role_name: "Admin".to_string(),
            admin_listing_role_description: "Admin of a module / course.".to_string(),
        }
    }
}

impl AccessConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            audit_enabled: lookup("CAMPUS_AUDIT_ENABLED").and_then(|v| v.parse().ok()).unwrap_or(defaults.audit_enabled),

            audit_max_events: lookup("CAMPUS_AUDIT_MAX_EVENTS").and_then(|v| v.parse().ok()).unwrap_or(defaults.audit_max_events),

            slow_check_threshold_ms: lookup("CAMPUS_SLOW_CHECK_MS").and_then(|v| v.parse().ok()).unwrap_or(defaults.slow_check_threshold_ms),

            fallback_role_name: lookup("CAMPUS_FALLBACK_ROLE_NAME").filter(|v| !v.is_empty()).unwrap_or(defaults.fallback_role_name),

            admin_listing_role_name: defaults.admin_listing_role_name,

            admin_listing_role_description: defaults.admin_listing_role_description,
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> AccessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
