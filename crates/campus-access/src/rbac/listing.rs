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

//! Listing the modules and courses a user can see, with their role labels

use crate::error::AccessResult;
use crate::models::{CourseId, UserId};
use crate::rbac::permissions::{Capabilities, ModuleIdentifier, PermissionsTable};
use crate::rbac::resolver::PermissionResolver;
use crate::rbac::store::ModuleLocation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// A course together with the user's resolved permissions on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAccess {
    pub course_id: CourseId,
    pub title: String,
    pub permissions: PermissionsTable,
}

impl PermissionResolver {
    /// Modules the user can see, sorted by module code
    ///
    /// Global admins see every module under the admin listing role. Other
    /// users see the modules they hold a module role on, each resolved with
    /// its course role OR-ed in.
    pub async fn accessible_modules(&self, user_id: UserId) -> AccessResult<Vec<PermissionsTable>> {
        let mut tables = if self.is_global_admin(user_id).await? {
            let locations = self.store().list_module_locations().await?;
            locations.iter().map(|location| self.admin_listing_table(location)).collect::<Vec<_>>()
        } else {
            let codes = self.store().list_user_module_codes(user_id).await?;
            let mut tables = Vec::with_capacity(codes.len());
            for code in codes {
                let table = self.resolve_for_module(user_id, &ModuleIdentifier::ByCode(code)).await?;
                if !table.is_synthesized() {
                    tables.push(table);
                }
            }
            tables
        };

        tables.sort_by(|a, b| a.module_code.cmp(&b.module_code));
        tables.dedup_by(|a, b| a.module_code == b.module_code);

        debug!(user_id = %user_id, modules = tables.len(), "Listed accessible modules");
        Ok(tables)
    }

    /// Courses the user can see, sorted by course id
    pub async fn accessible_courses(&self, user_id: UserId) -> AccessResult<Vec<CourseAccess>> {
        let courses = self.store().list_courses().await?;

        let visible: Option<BTreeSet<CourseId>> = if self.is_global_admin(user_id).await? {
            None
        } else {
            Some(self.store().list_user_course_ids(user_id).await?.into_iter().collect())
        };

        let mut result = Vec::new();
        for course in courses {
            if visible.as_ref().is_some_and(|ids| !ids.contains(&course.id)) {
                continue;
            }

            let permissions = self.resolve_for_course(user_id, course.id).await?;
            result.push(CourseAccess {
                course_id: course.id,
                title: course.title,
                permissions,
            });
        }

        result.sort_by_key(|course| course.course_id);

        debug!(user_id = %user_id, courses = result.len(), "Listed accessible courses");
        Ok(result)
    }

    fn admin_listing_table(&self, location: &ModuleLocation) -> PermissionsTable {
        PermissionsTable {
            module_code: Some(location.module_code.clone()),
            module_id: Some(location.module_id),
            course_id: Some(location.course_id),
            role_id: None,
            role_name: self.admin_listing_role_name.clone(),
            role_description: self.admin_listing_role_description.clone(),
            admin: true,
            capabilities: Capabilities::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessConfig;
    use crate::error::AccessError;
    use crate::rbac::store::{CourseSummary, MockAssignmentStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_admin_sees_every_module() {
        let mut store = MockAssignmentStore::new();
        store.expect_get_user_admin_flag().returning(|_| Ok(Some(true)));
        store.expect_list_module_locations().returning(|| {
            Ok(vec![
                ModuleLocation { module_code: "AC32006".to_string(), module_id: 2, course_id: 1 },
                ModuleLocation { module_code: "AC31007".to_string(), module_id: 1, course_id: 1 },
            ])
        });
        store.expect_list_user_module_codes().never();

        let resolver = PermissionResolver::new(Arc::new(store), &AccessConfig::default());
        let modules = resolver.accessible_modules(1).await.unwrap();

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].module_code.as_deref(), Some("AC31007"));
        assert!(modules.iter().all(|m| m.admin && m.role_name == "Admin"));
    }

    #[tokio::test]
    async fn test_course_listing_propagates_store_errors() {
        let mut store = MockAssignmentStore::new();
        store.expect_list_courses().returning(|| Ok(vec![CourseSummary { id: 1, title: "Applied Computing".to_string() }]));
        store.expect_get_user_admin_flag().returning(|_| Ok(Some(false)));
        store
            .expect_list_user_course_ids()
            .returning(|_| Err(AccessError::QueryFailed { message: "timeout".to_string() }));

        let resolver = PermissionResolver::new(Arc::new(store), &AccessConfig::default());
        assert!(resolver.accessible_courses(3).await.is_err());
    }

    #[tokio::test]
    async fn test_unresolvable_module_codes_are_skipped() {
        let mut store = MockAssignmentStore::new();
        store.expect_get_user_admin_flag().returning(|_| Ok(Some(false)));
        store.expect_list_user_module_codes().returning(|_| Ok(vec!["GONE01".to_string()]));
        store.expect_find_module_permission_rows().returning(|_, _| Ok(vec![]));
        store.expect_locate_module().returning(|_| Ok(None));

        let resolver = PermissionResolver::new(Arc::new(store), &AccessConfig::default());

        assert!(resolver.accessible_modules(4).await.unwrap().is_empty());
    }
}
