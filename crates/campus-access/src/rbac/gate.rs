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

//! Access gate: maps a resolved table and an action onto a decision

use crate::error::{AccessError, AccessResult};
use crate::rbac::permissions::{Action, PermissionsTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed { Decision::Allow } else { Decision::Deny }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("ALLOW"),
            Decision::Deny => f.write_str("DENY"),
        }
    }
}

/// Allow iff the table is admin or carries the bit for `action`
///
/// Pure function: no store access, no side effects.
pub fn check_access(table: &PermissionsTable, action: Action) -> Decision {
    Decision::from(table.allows(action))
}

/// Like [`check_access`] but turns a denial into [`AccessError::Forbidden`]
///
/// The message is identical whether or not an assignment exists.
pub fn require_access(table: &PermissionsTable, action: Action) -> AccessResult<()> {
    match check_access(table, action) {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(AccessError::Forbidden {
            message: "You don't have enough access rights".to_string(),
        }),
    }
}
