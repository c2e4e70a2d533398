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

//! Capability bits, actions and the resolved permissions table

use crate::error::AccessError;
use crate::models::{CourseId, ModuleId, RoleId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// The four capability bits carried by a role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    pub read: bool,
    pub write: bool,
    pub delete: bool,
    pub update: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities::new(false, false, false, false);
    pub const ALL: Capabilities = Capabilities::new(true, true, true, true);
    pub const READ_ONLY: Capabilities = Capabilities::new(true, false, false, false);

    pub const fn new(read: bool, write: bool, delete: bool, update: bool) -> Self {
        Self { read, write, delete, update }
    }

    /// Bitwise OR of two capability sets; a second role can only add bits
    pub const fn union(self, other: Capabilities) -> Self {
        Self {
            read: self.read || other.read,
            write: self.write || other.write,
            delete: self.delete || other.delete,
            update: self.update || other.update,
        }
    }

    /// Whether the bit for `action` is set
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => self.read,
            Action::Write => self.write,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        self.union(rhs)
    }
}

/// Action requested on a protected resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Read,
    Write,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Read, Action::Write, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "READ",
            Action::Write => "WRITE",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "READ" => Ok(Action::Read),
            "WRITE" => Ok(Action::Write),
            "UPDATE" => Ok(Action::Update),
            "DELETE" => Ok(Action::Delete),
            _ => Err(AccessError::InvalidAction { value: s.to_string() }),
        }
    }
}

/// A module is addressed either by numeric id or by its code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleIdentifier {
    ById(ModuleId),
    ByCode(String),
}

impl ModuleIdentifier {
    pub fn id(&self) -> Option<ModuleId> {
        match self {
            ModuleIdentifier::ById(id) => Some(*id),
            ModuleIdentifier::ByCode(_) => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ModuleIdentifier::ById(_) => None,
            ModuleIdentifier::ByCode(code) => Some(code),
        }
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleIdentifier::ById(id) => write!(f, "module:{}", id),
            ModuleIdentifier::ByCode(code) => write!(f, "module:{}", code),
        }
    }
}

impl From<ModuleId> for ModuleIdentifier {
    fn from(id: ModuleId) -> Self {
        ModuleIdentifier::ById(id)
    }
}

impl From<&str> for ModuleIdentifier {
    fn from(code: &str) -> Self {
        ModuleIdentifier::ByCode(code.to_string())
    }
}

impl From<String> for ModuleIdentifier {
    fn from(code: String) -> Self {
        ModuleIdentifier::ByCode(code)
    }
}

/// Effective permissions of a user on one module or course
///
/// Built fresh for every resolution and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsTable {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub module_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub module_id: Option<ModuleId>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub course_id: Option<CourseId>,

    /// Role the table was derived from; `None` when synthesized
    #[serde(rename = "id")]
    pub role_id: Option<RoleId>,

    #[serde(rename = "name")]
    pub role_name: String,

    #[serde(rename = "description")]
    pub role_description: String,

    /// Copied from the user's global record, never from a role
    pub admin: bool,

    #[serde(flatten)]
    pub capabilities: Capabilities,
}

impl PermissionsTable {
    /// Table used when the user holds no assignment on the resource
    pub fn synthesized(admin: bool, role_name: impl Into<String>) -> Self {
        Self {
            module_code: None,
            module_id: None,
            course_id: None,
            role_id: None,
            role_name: role_name.into(),
            role_description: String::new(),
            admin,
            capabilities: Capabilities::NONE,
        }
    }

    /// Whether the table carries an actual role rather than the fallback
    pub fn is_synthesized(&self) -> bool {
        self.role_id.is_none()
    }

    /// Admin overrides every bit
    pub fn allows(&self, action: Action) -> bool {
        self.admin || self.capabilities.allows(action)
    }
}
