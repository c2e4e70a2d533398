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

//! Permission resolution
//!
//! A user's effective permissions on a module are the OR of the bits of
//! their module role and of their course role on the module's owning
//! course. Either role may be absent. With neither present the resolver
//! hands back a synthesized table carrying only the global admin flag, and
//! the gate denies unless that flag is set.

use crate::config::AccessConfig;
use crate::error::AccessResult;
use crate::models::{AssignmentId, AssignmentStatus, CourseId, UserId};
use crate::rbac::permissions::{Capabilities, ModuleIdentifier, PermissionsTable};
use crate::rbac::store::{AssignmentStore, ModuleLocation, RoleGrant};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves effective permission tables from the assignment store
#[derive(Clone)]
pub struct PermissionResolver {
    store: Arc<dyn AssignmentStore>,
    fallback_role_name: String,
    pub(crate) admin_listing_role_name: String,
    pub(crate) admin_listing_role_description: String,
}

impl PermissionResolver {
    /// Create a resolver over `store`
    pub fn new(store: Arc<dyn AssignmentStore>, config: &AccessConfig) -> Self {
        Self {
            store,
            fallback_role_name: config.fallback_role_name.clone(),
            admin_listing_role_name: config.admin_listing_role_name.clone(),
            admin_listing_role_description: config.admin_listing_role_description.clone(),
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn AssignmentStore> {
        &self.store
    }

    /// Resolve the permissions of `user_id` on a module addressed by id or code
    pub async fn resolve_for_module(&self, user_id: UserId, module: &ModuleIdentifier) -> AccessResult<PermissionsTable> {
        let module_rows = self.store.find_module_permission_rows(user_id, module).await?;
        let module_row = first_row(module_rows, user_id, &module.to_string());

        let location = match &module_row {
            Some(row) => Some(row.location.clone()),
            None => self.store.locate_module(module).await?,
        };

        let course_grant = match &location {
            Some(location) => {
                let course_rows = self.store.find_course_permission_rows(user_id, location.course_id).await?;
                first_row(course_rows, user_id, &format!("course:{}", location.course_id)).map(|row| row.grant)
            }
            None => None,
        };

        let admin = self.is_global_admin(user_id).await?;

        let mut table = match (module_row.map(|row| row.grant), course_grant) {
            (Some(module_grant), course_grant) => {
                let course_bits = course_grant.map(|grant| grant.capabilities).unwrap_or(Capabilities::NONE);
                table_from_grant(&module_grant, module_grant.capabilities | course_bits, admin)
            }
            (None, Some(course_grant)) => table_from_grant(&course_grant, course_grant.capabilities, admin),
            (None, None) => PermissionsTable::synthesized(admin, self.fallback_role_name.clone()),
        };

        apply_module_location(&mut table, module, location.as_ref());

        debug!(
            user_id = %user_id,
            module = %module,
            role = %table.role_name,
            admin = table.admin,
            synthesized = table.is_synthesized(),
            "Resolved module permissions"
        );

        Ok(table)
    }

    /// Resolve the permissions of `user_id` on a course
    pub async fn resolve_for_course(&self, user_id: UserId, course_id: CourseId) -> AccessResult<PermissionsTable> {
        let rows = self.store.find_course_permission_rows(user_id, course_id).await?;
        let course_row = first_row(rows, user_id, &format!("course:{}", course_id));
        let admin = self.is_global_admin(user_id).await?;

        let mut table = match course_row {
            Some(row) => table_from_grant(&row.grant, row.grant.capabilities, admin),
            None => PermissionsTable::synthesized(admin, self.fallback_role_name.clone()),
        };
        table.course_id = Some(course_id);

        debug!(
            user_id = %user_id,
            course_id = %course_id,
            role = %table.role_name,
            admin = table.admin,
            synthesized = table.is_synthesized(),
            "Resolved course permissions"
        );

        Ok(table)
    }

    /// Global admin flag of `user_id`; an unknown user is not an admin
    pub async fn is_global_admin(&self, user_id: UserId) -> AccessResult<bool> {
        Ok(self.store.get_user_admin_flag(user_id).await?.unwrap_or(false))
    }

    /// Global admin flag looked up by username; an unknown user is not an admin
    pub async fn is_username_admin(&self, username: &str) -> AccessResult<bool> {
        Ok(self.store.get_username_admin_flag(username).await?.unwrap_or(false))
    }

    /// Whether `username` may hand in coursework for `assignment_id`
    ///
    /// True only when the user holds a module role on the assignment's
    /// module, the assignment is available, and no earlier non-canceled
    /// submission exists. Unknown users or assignments yield `false`.
    pub async fn can_user_submit_assignment(&self, username: &str, assignment_id: AssignmentId) -> AccessResult<bool> {
        let Some(user_id) = self.store.find_user_id_by_username(username).await? else {
            debug!(username = %username, assignment_id = %assignment_id, "Submission check for unknown user");
            return Ok(false);
        };

        let Some(assignment) = self.store.find_assignment_status_and_module(assignment_id).await? else {
            debug!(username = %username, assignment_id = %assignment_id, "Submission check for unknown assignment");
            return Ok(false);
        };

        let enrolled = self.store.has_module_role_assignment(user_id, &assignment.module_code).await?;
        let available = assignment.status == AssignmentStatus::Available;
        let already_submitted = self.store.has_non_canceled_submission(user_id, assignment_id).await?;

        debug!(
            username = %username,
            assignment_id = %assignment_id,
            enrolled,
            status = %assignment.status,
            already_submitted,
            "Evaluated submission eligibility"
        );

        Ok(enrolled && available && !already_submitted)
    }
}

/// Keep the first row in store order
///
/// At most one row per key is expected. Should the store hand back more,
/// the first one wins and the duplicate is reported.
fn first_row<T>(rows: Vec<T>, user_id: UserId, resource: &str) -> Option<T> {
    if rows.len() > 1 {
        warn!(user_id = %user_id, resource = %resource, rows = rows.len(), "Multiple role assignments found, using the first");
    }
    rows.into_iter().next()
}

fn table_from_grant(grant: &RoleGrant, capabilities: Capabilities, admin: bool) -> PermissionsTable {
    PermissionsTable {
        module_code: None,
        module_id: None,
        course_id: None,
        role_id: Some(grant.role_id),
        role_name: grant.role_name.clone(),
        role_description: grant.role_description.clone(),
        admin,
        capabilities,
    }
}

fn apply_module_location(table: &mut PermissionsTable, module: &ModuleIdentifier, location: Option<&ModuleLocation>) {
    match location {
        Some(location) => {
            table.module_code = Some(location.module_code.clone());
            table.module_id = Some(location.module_id);
            table.course_id = Some(location.course_id);
        }
        None => {
            table.module_code = module.code().map(str::to_string);
            table.module_id = module.id();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessError;
    use crate::models::AssignmentStatus;
    use crate::rbac::store::{AssignmentInfo, CoursePermissionRow, MockAssignmentStore, ModulePermissionRow};

    fn location() -> ModuleLocation {
        ModuleLocation {
            module_code: "AC31007".to_string(),
            module_id: 1,
            course_id: 1,
        }
    }

    fn grant(role_id: u32, name: &str, capabilities: Capabilities) -> RoleGrant {
        RoleGrant {
            role_id,
            role_name: name.to_string(),
            role_description: String::new(),
            capabilities,
        }
    }

    fn resolver(store: MockAssignmentStore) -> PermissionResolver {
        PermissionResolver::new(Arc::new(store), &AccessConfig::default())
    }

    fn outage() -> AccessError {
        AccessError::StoreUnavailable { message: "connection refused".to_string() }
    }

    #[tokio::test]
    async fn test_module_and_course_bits_are_ored() {
        let mut store = MockAssignmentStore::new();
        store.expect_find_module_permission_rows().returning(|_, _| {
            Ok(vec![ModulePermissionRow {
                location: location(),
                grant: grant(2, "Student", Capabilities::new(false, false, false, true)),
            }])
        });
        store.expect_locate_module().never();
        store.expect_find_course_permission_rows().returning(|_, course_id| {
            Ok(vec![CoursePermissionRow {
                course_id,
                grant: grant(4, "Course Coordinator", Capabilities::READ_ONLY),
            }])
        });
        store.expect_get_user_admin_flag().returning(|_| Ok(Some(false)));

        let table = resolver(store).resolve_for_module(3, &ModuleIdentifier::ById(1)).await.unwrap();

        assert_eq!(table.role_name, "Student");
        assert_eq!(table.capabilities, Capabilities::new(true, false, false, true));
        assert_eq!(table.module_code.as_deref(), Some("AC31007"));
        assert_eq!(table.course_id, Some(1));
    }

    #[tokio::test]
    async fn test_first_of_duplicate_rows_wins() {
        let mut store = MockAssignmentStore::new();
        store.expect_find_module_permission_rows().returning(|_, _| {
            Ok(vec![
                ModulePermissionRow { location: location(), grant: grant(2, "Student", Capabilities::READ_ONLY) },
                ModulePermissionRow { location: location(), grant: grant(1, "Teacher", Capabilities::ALL) },
            ])
        });
        store.expect_find_course_permission_rows().returning(|_, _| Ok(vec![]));
        store.expect_get_user_admin_flag().returning(|_| Ok(Some(false)));

        let table = resolver(store).resolve_for_module(3, &"AC31007".into()).await.unwrap();

        assert_eq!(table.role_id, Some(2));
        assert_eq!(table.capabilities, Capabilities::READ_ONLY);
    }

    #[tokio::test]
    async fn test_unknown_module_falls_back_to_synthesized_table() {
        let mut store = MockAssignmentStore::new();
        store.expect_find_module_permission_rows().returning(|_, _| Ok(vec![]));
        store.expect_locate_module().returning(|_| Ok(None));
        store.expect_find_course_permission_rows().never();
        store.expect_get_user_admin_flag().returning(|_| Ok(None));

        let table = resolver(store).resolve_for_module(99, &"ZZ000".into()).await.unwrap();

        assert!(table.is_synthesized());
        assert!(!table.admin);
        assert_eq!(table.role_name, "admin");
        assert_eq!(table.module_code.as_deref(), Some("ZZ000"));
        assert_eq!(table.module_id, None);
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let mut store = MockAssignmentStore::new();
        store.expect_find_module_permission_rows().returning(|_, _| Err(outage()));

        let err = resolver(store).resolve_for_module(3, &ModuleIdentifier::ById(1)).await.unwrap_err();
        assert!(matches!(err, AccessError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_admin_lookup_failure_is_propagated() {
        let mut store = MockAssignmentStore::new();
        store.expect_find_course_permission_rows().returning(|_, _| Ok(vec![]));
        store
            .expect_get_user_admin_flag()
            .returning(|_| Err(AccessError::QueryFailed { message: "users table missing".to_string() }));

        let err = resolver(store).resolve_for_course(3, 1).await.unwrap_err();
        assert!(err.is_store_failure());
    }

    #[tokio::test]
    async fn test_missing_user_is_not_admin() {
        let mut store = MockAssignmentStore::new();
        store.expect_get_user_admin_flag().returning(|_| Ok(None));
        store.expect_get_username_admin_flag().returning(|_| Ok(None));

        let resolver = resolver(store);
        assert!(!resolver.is_global_admin(404).await.unwrap());
        assert!(!resolver.is_username_admin("nobody").await.unwrap());
    }

    #[tokio::test]
    async fn test_submission_requires_all_conditions() {
        let mut store = MockAssignmentStore::new();
        store.expect_find_user_id_by_username().returning(|_| Ok(Some(3)));
        store.expect_find_assignment_status_and_module().returning(|id| {
            Ok(Some(AssignmentInfo {
                assignment_id: id,
                status: AssignmentStatus::Available,
                module_code: "AC31007".to_string(),
            }))
        });
        store.expect_has_module_role_assignment().returning(|_, _| Ok(true));
        store.expect_has_non_canceled_submission().returning(|_, _| Ok(true));

        assert!(!resolver(store).can_user_submit_assignment("student", 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_submission_for_unknown_user_is_false() {
        let mut store = MockAssignmentStore::new();
        store.expect_find_user_id_by_username().returning(|_| Ok(None));
        store.expect_find_assignment_status_and_module().never();

        assert!(!resolver(store).can_user_submit_assignment("ghost", 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_submission_check_propagates_store_errors() {
        let mut store = MockAssignmentStore::new();
        store.expect_find_user_id_by_username().returning(|_| Ok(Some(3)));
        store.expect_find_assignment_status_and_module().returning(|_| Err(outage()));

        assert!(resolver(store).can_user_submit_assignment("student", 1).await.is_err());
    }
}
