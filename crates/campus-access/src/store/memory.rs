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

//! In-memory assignment store

use super::dataset::Dataset;
use crate::error::{AccessError, AccessResult};
use crate::models::{AssignmentId, Class, CourseId, CourseRoleAssignment, LevelModule, ModuleRoleAssignment, Submission, UserId};
use crate::rbac::permissions::ModuleIdentifier;
use crate::rbac::roles::Role;
use crate::rbac::store::{AssignmentInfo, AssignmentStore, CoursePermissionRow, CourseSummary, ModuleLocation, ModulePermissionRow, RoleGrant};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// [`AssignmentStore`] over a [`Dataset`] held behind a lock
///
/// Rows are returned in dataset order. Datasets loaded from disk are kept
/// as given, duplicates included; the `assign_*` methods replace any
/// existing row for the same key.
pub struct InMemoryAssignmentStore {
    data: RwLock<Dataset>,
    available: AtomicBool,
}

impl InMemoryAssignmentStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            data: RwLock::new(dataset),
            available: AtomicBool::new(true),
        }
    }

    /// Store seeded with [`Dataset::sample`]
    pub fn sample() -> Self {
        Self::new(Dataset::sample())
    }

    pub fn from_file(path: impl AsRef<Path>) -> AccessResult<Self> {
        let path = path.as_ref();
        let dataset = Dataset::load_from_file(path)?;
        info!(path = %path.display(), users = dataset.users.len(), level_modules = dataset.level_modules.len(), "Loaded academy dataset");
        Ok(Self::new(dataset))
    }

    /// Toggle availability; while unavailable every lookup fails with `StoreUnavailable`
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Copy of the current data
    pub fn snapshot(&self) -> Dataset {
        self.data.read().clone()
    }

    pub fn add_role(&self, role: Role) {
        let mut data = self.data.write();
        data.roles.retain(|existing| existing.id != role.id);
        data.roles.push(role);
    }

    /// Give `user_id` a role on a level module, replacing any role they held on it
    pub fn assign_module_role(&self, assignment: ModuleRoleAssignment) {
        let mut data = self.data.write();
        data.module_roles.retain(|existing| !(existing.user_id == assignment.user_id && existing.module_code == assignment.module_code));
        debug!(user_id = assignment.user_id, module_code = %assignment.module_code, role_id = assignment.role_id, "Module role assigned");
        data.module_roles.push(assignment);
    }

    /// Give `user_id` a role on a course, replacing any role they held on it
    pub fn assign_course_role(&self, assignment: CourseRoleAssignment) {
        let mut data = self.data.write();
        data.course_roles.retain(|existing| !(existing.user_id == assignment.user_id && existing.course_id == assignment.course_id));
        debug!(user_id = assignment.user_id, course_id = assignment.course_id, role_id = assignment.role_id, "Course role assigned");
        data.course_roles.push(assignment);
    }

    /// Returns whether an assignment was removed
    pub fn revoke_module_role(&self, user_id: UserId, module_code: &str) -> bool {
        let mut data = self.data.write();
        let before = data.module_roles.len();
        data.module_roles.retain(|existing| !(existing.user_id == user_id && existing.module_code == module_code));
        before != data.module_roles.len()
    }

    pub fn add_submission(&self, submission: Submission) {
        self.data.write().submissions.push(submission);
    }

    fn ensure_available(&self) -> AccessResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(AccessError::StoreUnavailable {
                message: "assignment store is offline".to_string(),
            })
        }
    }
}

impl Default for InMemoryAssignmentStore {
    fn default() -> Self {
        Self::new(Dataset::default())
    }
}

fn identifier_matches(level_module: &LevelModule, module: &ModuleIdentifier) -> bool {
    match module {
        ModuleIdentifier::ById(id) => level_module.module_id == *id,
        ModuleIdentifier::ByCode(code) => level_module.code == *code,
    }
}

fn find_class(data: &Dataset, class_id: u32) -> Option<&Class> {
    data.classes.iter().find(|class| class.id == class_id)
}

/// Follow level module → class → course; `None` when any link is missing
fn location_of(data: &Dataset, level_module: &LevelModule) -> Option<ModuleLocation> {
    let class = find_class(data, level_module.class_id)?;
    let course = data.courses.iter().find(|course| course.id == class.course_id)?;
    Some(ModuleLocation {
        module_code: level_module.code.clone(),
        module_id: level_module.module_id,
        course_id: course.id,
    })
}

fn grant_for(data: &Dataset, role_id: u32) -> Option<RoleGrant> {
    data.roles.iter().find(|role| role.id == role_id).map(RoleGrant::from)
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn find_role_by_name(&self, name: &str) -> AccessResult<Option<Role>> {
        self.ensure_available()?;
        Ok(self.data.read().role_by_name(name).cloned())
    }

    async fn find_module_permission_rows(&self, user_id: UserId, module: &ModuleIdentifier) -> AccessResult<Vec<ModulePermissionRow>> {
        self.ensure_available()?;
        let data = self.data.read();

        let rows = data
            .module_roles
            .iter()
            .filter(|assignment| assignment.user_id == user_id)
            .filter_map(|assignment| {
                let level_module = data.level_modules.iter().find(|lm| lm.code == assignment.module_code)?;
                if !identifier_matches(level_module, module) {
                    return None;
                }
                let location = location_of(&data, level_module)?;
                let grant = grant_for(&data, assignment.role_id)?;
                Some(ModulePermissionRow { location, grant })
            })
            .collect();

        Ok(rows)
    }

    async fn locate_module(&self, module: &ModuleIdentifier) -> AccessResult<Option<ModuleLocation>> {
        self.ensure_available()?;
        let data = self.data.read();
        Ok(data.level_modules.iter().filter(|lm| identifier_matches(lm, module)).find_map(|lm| location_of(&data, lm)))
    }

    async fn find_course_permission_rows(&self, user_id: UserId, course_id: CourseId) -> AccessResult<Vec<CoursePermissionRow>> {
        self.ensure_available()?;
        let data = self.data.read();

        if !data.courses.iter().any(|course| course.id == course_id) {
            return Ok(Vec::new());
        }

        let rows = data
            .course_roles
            .iter()
            .filter(|assignment| assignment.user_id == user_id && assignment.course_id == course_id)
            .filter_map(|assignment| grant_for(&data, assignment.role_id).map(|grant| CoursePermissionRow { course_id, grant }))
            .collect();

        Ok(rows)
    }

    async fn get_user_admin_flag(&self, user_id: UserId) -> AccessResult<Option<bool>> {
        self.ensure_available()?;
        Ok(self.data.read().users.iter().find(|user| user.id == user_id).map(|user| user.admin))
    }

    async fn get_username_admin_flag(&self, username: &str) -> AccessResult<Option<bool>> {
        self.ensure_available()?;
        Ok(self.data.read().users.iter().find(|user| user.username == username).map(|user| user.admin))
    }

    async fn find_user_id_by_username(&self, username: &str) -> AccessResult<Option<UserId>> {
        self.ensure_available()?;
        Ok(self.data.read().users.iter().find(|user| user.username == username).map(|user| user.id))
    }

    async fn find_assignment_status_and_module(&self, assignment_id: AssignmentId) -> AccessResult<Option<AssignmentInfo>> {
        self.ensure_available()?;
        let data = self.data.read();
        Ok(data.assignments.iter().find(|assignment| assignment.id == assignment_id).map(|assignment| AssignmentInfo {
            assignment_id: assignment.id,
            status: assignment.status,
            module_code: assignment.module_code.clone(),
        }))
    }

    async fn has_module_role_assignment(&self, user_id: UserId, module_code: &str) -> AccessResult<bool> {
        self.ensure_available()?;
        Ok(self.data.read().module_roles.iter().any(|assignment| assignment.user_id == user_id && assignment.module_code == module_code))
    }

    async fn has_non_canceled_submission(&self, user_id: UserId, assignment_id: AssignmentId) -> AccessResult<bool> {
        self.ensure_available()?;
        Ok(self
            .data
            .read()
            .submissions
            .iter()
            .any(|submission| submission.user_id == user_id && submission.assignment_id == assignment_id && !submission.status.is_canceled()))
    }

    async fn list_module_locations(&self) -> AccessResult<Vec<ModuleLocation>> {
        self.ensure_available()?;
        let data = self.data.read();
        Ok(data.level_modules.iter().filter_map(|lm| location_of(&data, lm)).collect())
    }

    async fn list_user_module_codes(&self, user_id: UserId) -> AccessResult<Vec<String>> {
        self.ensure_available()?;
        let data = self.data.read();

        // Same joins as the permission rows: dangling modules or roles are not listed
        let codes: BTreeSet<String> = data
            .module_roles
            .iter()
            .filter(|assignment| assignment.user_id == user_id)
            .filter(|assignment| grant_for(&data, assignment.role_id).is_some())
            .filter(|assignment| {
                data.level_modules
                    .iter()
                    .find(|lm| lm.code == assignment.module_code)
                    .and_then(|lm| location_of(&data, lm))
                    .is_some()
            })
            .map(|assignment| assignment.module_code.clone())
            .collect();
        Ok(codes.into_iter().collect())
    }

    async fn list_courses(&self) -> AccessResult<Vec<CourseSummary>> {
        self.ensure_available()?;
        Ok(self
            .data
            .read()
            .courses
            .iter()
            .map(|course| CourseSummary {
                id: course.id,
                title: course.title.clone(),
            })
            .collect())
    }

    async fn list_user_course_ids(&self, user_id: UserId) -> AccessResult<Vec<CourseId>> {
        self.ensure_available()?;
        let data = self.data.read();

        let through_modules = data
            .module_roles
            .iter()
            .filter(|assignment| assignment.user_id == user_id)
            .filter_map(|assignment| data.level_modules.iter().find(|lm| lm.code == assignment.module_code))
            .filter_map(|lm| location_of(&data, lm))
            .map(|location| location.course_id);

        let direct = data.course_roles.iter().filter(|assignment| assignment.user_id == user_id).map(|assignment| assignment.course_id);

        let ids: BTreeSet<CourseId> = through_modules.chain(direct).collect();
        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::permissions::Capabilities;

    #[tokio::test]
    async fn test_module_rows_by_code_and_id() {
        let store = InMemoryAssignmentStore::sample();

        let by_code = store.find_module_permission_rows(3, &ModuleIdentifier::from("AC31007")).await.unwrap();
        let by_id = store.find_module_permission_rows(3, &ModuleIdentifier::ById(1)).await.unwrap();

        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code, by_id);
        assert_eq!(by_code[0].location.course_id, 1);
        assert_eq!(by_code[0].grant.role_name, "Student");
    }

    #[tokio::test]
    async fn test_locate_unknown_module() {
        let store = InMemoryAssignmentStore::sample();

        assert!(store.locate_module(&ModuleIdentifier::from("ZZ000")).await.unwrap().is_none());
        assert_eq!(store.locate_module(&ModuleIdentifier::from("CS21004")).await.unwrap().map(|l| l.course_id), Some(2));
    }

    #[tokio::test]
    async fn test_assign_module_role_replaces_existing() {
        let store = InMemoryAssignmentStore::sample();
        let teacher_role = store.snapshot().role_by_name("Teacher").map(|role| role.id).unwrap();

        store.assign_module_role(ModuleRoleAssignment {
            user_id: 3,
            module_code: "AC31007".to_string(),
            role_id: teacher_role,
            class_id: 1,
        });

        let rows = store.find_module_permission_rows(3, &ModuleIdentifier::from("AC31007")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].grant.capabilities, Capabilities::ALL);
    }

    #[tokio::test]
    async fn test_duplicate_rows_are_kept_in_order() {
        let mut dataset = Dataset::sample();
        let observer = dataset.role_by_name("Observer").map(|role| role.id).unwrap();
        dataset.module_roles.push(ModuleRoleAssignment {
            user_id: 3,
            module_code: "AC31007".to_string(),
            role_id: observer,
            class_id: 1,
        });
        let store = InMemoryAssignmentStore::new(dataset);

        let rows = store.find_module_permission_rows(3, &ModuleIdentifier::from("AC31007")).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].grant.role_name, "Student");
        assert_eq!(rows[1].grant.role_name, "Observer");
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_lookup() {
        let store = InMemoryAssignmentStore::sample();
        store.set_available(false);

        let err = store.get_user_admin_flag(1).await.unwrap_err();
        assert!(err.is_store_failure());
        assert!(store.list_courses().await.is_err());

        store.set_available(true);
        assert_eq!(store.get_user_admin_flag(1).await.unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_canceled_submissions_are_ignored() {
        let store = InMemoryAssignmentStore::sample();

        assert!(!store.has_non_canceled_submission(3, 1).await.unwrap());
        assert!(store.has_non_canceled_submission(3, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_course_ids_cover_both_paths() {
        let store = InMemoryAssignmentStore::sample();

        assert_eq!(store.list_user_course_ids(2).await.unwrap(), vec![1, 2]);
        assert_eq!(store.list_user_course_ids(5).await.unwrap(), vec![1]);
        assert!(store.list_user_course_ids(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_revoke_module_role() {
        let store = InMemoryAssignmentStore::sample();

        assert!(store.revoke_module_role(3, "AC31007"));
        assert!(!store.revoke_module_role(3, "AC31007"));
        assert!(!store.has_module_role_assignment(3, "AC31007").await.unwrap());
    }

    #[tokio::test]
    async fn test_dangling_module_assignments_are_not_listed() {
        let mut dataset = Dataset::sample();
        dataset.module_roles.push(ModuleRoleAssignment {
            user_id: 4,
            module_code: "GONE01".to_string(),
            role_id: 2,
            class_id: 1,
        });
        dataset.module_roles.push(ModuleRoleAssignment {
            user_id: 4,
            module_code: "AC32006".to_string(),
            role_id: 999,
            class_id: 1,
        });
        let store = InMemoryAssignmentStore::new(dataset);

        assert!(store.list_user_module_codes(4).await.unwrap().is_empty());
        assert_eq!(store.list_user_module_codes(3).await.unwrap(), vec!["AC31007", "AC32006"]);
    }

    #[tokio::test]
    async fn test_assign_course_role_keeps_one_role_per_course() {
        let store = InMemoryAssignmentStore::sample();
        store.add_role(Role::new(20, "Moderator", "Moderates course coursework", Capabilities::new(true, false, true, false)));

        store.assign_course_role(CourseRoleAssignment { user_id: 4, course_id: 1, role_id: 5 });
        store.assign_course_role(CourseRoleAssignment { user_id: 4, course_id: 1, role_id: 20 });

        let rows = store.find_course_permission_rows(4, 1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].grant.role_name, "Moderator");
        assert_eq!(rows[0].grant.capabilities, Capabilities::new(true, false, true, false));
        assert_eq!(store.list_user_course_ids(4).await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_add_role_replaces_same_id() {
        let store = InMemoryAssignmentStore::sample();
        store.add_role(Role::new(2, "Student", "Attends a module", Capabilities::new(true, true, false, false)));

        let student = store.find_role_by_name("Student").await.unwrap().unwrap();
        assert!(student.can_write);
        assert_eq!(store.snapshot().roles.iter().filter(|role| role.id == 2).count(), 1);

        let rows = store.find_module_permission_rows(3, &ModuleIdentifier::from("AC31007")).await.unwrap();
        assert!(rows[0].grant.capabilities.write);
    }
}
