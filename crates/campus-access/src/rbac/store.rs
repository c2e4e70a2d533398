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

//! Assignment store contract consumed by the resolver

use crate::error::AccessResult;
use crate::models::{AssignmentId, AssignmentStatus, CourseId, ModuleId, RoleId, UserId};
use crate::rbac::permissions::{Capabilities, ModuleIdentifier};
use crate::rbac::roles::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role identity and bits as seen through an assignment row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role_id: RoleId,
    pub role_name: String,
    pub role_description: String,
    pub capabilities: Capabilities,
}

impl From<&Role> for RoleGrant {
    fn from(role: &Role) -> Self {
        Self {
            role_id: role.id,
            role_name: role.name.clone(),
            role_description: role.description.clone(),
            capabilities: role.capabilities(),
        }
    }
}

/// Where a module sits: its code, numeric id and owning course
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleLocation {
    pub module_code: String,
    pub module_id: ModuleId,
    pub course_id: CourseId,
}

/// A user's module-role assignment joined with the module's location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePermissionRow {
    pub location: ModuleLocation,
    pub grant: RoleGrant,
}

/// A user's course-role assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoursePermissionRow {
    pub course_id: CourseId,
    pub grant: RoleGrant,
}

/// Fields of a coursework assignment relevant to submission checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentInfo {
    pub assignment_id: AssignmentId,
    pub status: AssignmentStatus,
    pub module_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: CourseId,
    pub title: String,
}

/// Data access consumed by the access control core
///
/// Empty results and `None` are normal outcomes. Implementations return
/// `StoreUnavailable` or `QueryFailed` only when the lookup itself failed.
/// Timeouts and retries belong to the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Look a role up by exact name
    async fn find_role_by_name(&self, name: &str) -> AccessResult<Option<Role>>;

    /// Module-role rows of `user_id` on the addressed module
    async fn find_module_permission_rows(&self, user_id: UserId, module: &ModuleIdentifier) -> AccessResult<Vec<ModulePermissionRow>>;

    /// Resolve a module identifier through the module → class → course chain
    async fn locate_module(&self, module: &ModuleIdentifier) -> AccessResult<Option<ModuleLocation>>;

    /// Course-role rows of `user_id` on `course_id`
    async fn find_course_permission_rows(&self, user_id: UserId, course_id: CourseId) -> AccessResult<Vec<CoursePermissionRow>>;

    /// Global admin flag; `None` when the user does not exist
    async fn get_user_admin_flag(&self, user_id: UserId) -> AccessResult<Option<bool>>;

    /// Global admin flag keyed by username; `None` when the user does not exist
    async fn get_username_admin_flag(&self, username: &str) -> AccessResult<Option<bool>>;

    async fn find_user_id_by_username(&self, username: &str) -> AccessResult<Option<UserId>>;

    async fn find_assignment_status_and_module(&self, assignment_id: AssignmentId) -> AccessResult<Option<AssignmentInfo>>;

    /// Whether the user holds any module-role assignment on `module_code`
    async fn has_module_role_assignment(&self, user_id: UserId, module_code: &str) -> AccessResult<bool>;

    async fn has_non_canceled_submission(&self, user_id: UserId, assignment_id: AssignmentId) -> AccessResult<bool>;

    /// Every level module in the academy
    async fn list_module_locations(&self) -> AccessResult<Vec<ModuleLocation>>;

    /// Codes of modules the user holds a module-role assignment on
    async fn list_user_module_codes(&self, user_id: UserId) -> AccessResult<Vec<String>>;

    async fn list_courses(&self) -> AccessResult<Vec<CourseSummary>>;

    /// Courses reachable through module assignments or held directly through a course role
    async fn list_user_course_ids(&self, user_id: UserId) -> AccessResult<Vec<CourseId>>;
}
