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

//! Role definitions and the role catalog

use crate::error::AccessResult;
use crate::models::RoleId;
use crate::rbac::permissions::Capabilities;
use crate::rbac::store::AssignmentStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Named capability bundle shared by many assignments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Unique role identifier
    pub id: RoleId,

    /// Human-readable role name
    pub name: String,

    /// Role description
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub can_read: bool,

    #[serde(default)]
    pub can_write: bool,

    #[serde(default)]
    pub can_delete: bool,

    #[serde(default)]
    pub can_update: bool,
}

impl Role {
    /// Create a new role
    pub fn new(id: RoleId, name: impl Into<String>, description: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            can_read: capabilities.read,
            can_write: capabilities.write,
            can_delete: capabilities.delete,
            can_update: capabilities.update,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::new(self.can_read, self.can_write, self.can_delete, self.can_update)
    }
}

/// Read-only lookup of roles by name
#[derive(Clone)]
pub struct RoleCatalog {
    store: Arc<dyn AssignmentStore>,
}

impl RoleCatalog {
    pub fn new(store: Arc<dyn AssignmentStore>) -> Self {
        Self { store }
    }

    /// Find a role by its exact name
    ///
    /// A missing role is `Ok(None)`; only store failures are errors.
    pub async fn find_role_by_name(&self, name: &str) -> AccessResult<Option<Role>> {
        let role = self.store.find_role_by_name(name).await?;
        debug!(role = %name, found = role.is_some(), "Role catalog lookup");
        Ok(role)
    }
}

/// Roles every academy starts with
pub fn create_default_roles() -> Vec<Role> {
    vec![
        Role::new(1, "Teacher", "Teaches a module and manages its content", Capabilities::ALL),
        Role::new(2, "Student", "Attends a module", Capabilities::READ_ONLY),
        Role::new(3, "Assistant", "Helps running a module", Capabilities::new(true, true, false, true)),
        Role::new(4, "Course Coordinator", "Manages a whole course", Capabilities::new(true, true, false, true)),
        Role::new(5, "Observer", "Registered without access rights", Capabilities::NONE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessError;
    use crate::rbac::store::MockAssignmentStore;

    #[test]
    fn test_role_capabilities() {
        let role = Role::new(10, "Marker", "Grades coursework", Capabilities::new(true, false, false, true));

        assert_eq!(role.capabilities(), Capabilities::new(true, false, false, true));
        assert!(role.can_update);
        assert!(!role.can_delete);
    }

    #[test]
    fn test_default_roles_are_unique() {
        let roles = create_default_roles();
        let mut names: Vec<_> = roles.iter().map(|r| r.name.clone()).collect();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), roles.len());
        assert!(roles.iter().any(|r| r.name == "Student" && r.capabilities() == Capabilities::READ_ONLY));
    }

    #[tokio::test]
    async fn test_missing_role_is_not_an_error() {
        let mut store = MockAssignmentStore::new();
        store.expect_find_role_by_name().returning(|_| Ok(None));

        let catalog = RoleCatalog::new(Arc::new(store));
        assert!(catalog.find_role_by_name("-missing-").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_catalog_propagates_store_errors() {
        let mut store = MockAssignmentStore::new();
        store
            .expect_find_role_by_name()
            .returning(|_| Err(AccessError::StoreUnavailable { message: "connection refused".to_string() }));

        let catalog = RoleCatalog::new(Arc::new(store));
        let err = catalog.find_role_by_name("Student").await.unwrap_err();
        assert!(err.is_store_failure());
    }
}
