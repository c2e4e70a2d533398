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

//! Serializable snapshot of everything the access layer reads

use crate::error::AccessResult;
use crate::models::{Assignment, AssignmentStatus, Class, Course, CourseRoleAssignment, LevelModule, Module, ModuleRoleAssignment, ModuleStatus, Submission, SubmissionStatus, User};
use crate::rbac::roles::{Role, create_default_roles};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Academy data backing [`super::InMemoryAssignmentStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub courses: Vec<Course>,
    pub classes: Vec<Class>,
    pub modules: Vec<Module>,
    pub level_modules: Vec<LevelModule>,
    pub module_roles: Vec<ModuleRoleAssignment>,
    pub course_roles: Vec<CourseRoleAssignment>,
    pub assignments: Vec<Assignment>,
    pub submissions: Vec<Submission>,
}

impl Dataset {
    /// Load a dataset from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> AccessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let dataset: Self = serde_json::from_str(&content)?;
        Ok(dataset)
    }

    /// Write the dataset as pretty JSON
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> AccessResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.name == name)
    }

    /// Demo academy: an admin, a teacher, a student, a guest and a course coordinator
    pub fn sample() -> Self {
        let roles = create_default_roles();
        let role_id = |name: &str| roles.iter().find(|role| role.name == name).map(|role| role.id).unwrap_or_default();

        let module_roles = vec![
            ModuleRoleAssignment {
                user_id: 2,
                module_code: "AC31007".to_string(),
                role_id: role_id("Teacher"),
                class_id: 1,
            },
            ModuleRoleAssignment {
                user_id: 3,
                module_code: "AC31007".to_string(),
                role_id: role_id("Student"),
                class_id: 1,
            },
            ModuleRoleAssignment {
                user_id: 3,
                module_code: "AC32006".to_string(),
                role_id: role_id("Student"),
                class_id: 1,
            },
        ];

        let course_roles = vec![
            CourseRoleAssignment {
                user_id: 2,
                course_id: 2,
                role_id: role_id("Teacher"),
            },
            CourseRoleAssignment {
                user_id: 5,
                course_id: 1,
                role_id: role_id("Course Coordinator"),
            },
        ];

        Self {
            users: vec![
                User::admin(1, "admin"),
                User::new(2, "teacher"),
                User::new(3, "student"),
                User::new(4, "guest"),
                User::new(5, "coordinator"),
            ],
            courses: vec![
                Course {
                    id: 1,
                    title: "Applied Computing".to_string(),
                    description: "BSc (Hons) Applied Computing".to_string(),
                },
                Course {
                    id: 2,
                    title: "Computing Science".to_string(),
                    description: "BSc (Hons) Computing Science".to_string(),
                },
            ],
            classes: vec![
                Class { id: 1, course_id: 1, title: "Applied Computing 2015".to_string() },
                Class { id: 2, course_id: 2, title: "Computing Science 2015".to_string() },
            ],
            modules: vec![
                Module { id: 1, title: "Agile Software Engineering".to_string(), description: String::new() },
                Module { id: 2, title: "Databases".to_string(), description: String::new() },
                Module { id: 3, title: "Networks".to_string(), description: String::new() },
            ],
            level_modules: vec![
                LevelModule { code: "AC31007".to_string(), class_id: 1, module_id: 1, level: 3, status: ModuleStatus::Ongoing },
                LevelModule { code: "AC32006".to_string(), class_id: 1, module_id: 2, level: 3, status: ModuleStatus::Ongoing },
                LevelModule { code: "CS21004".to_string(), class_id: 2, module_id: 3, level: 2, status: ModuleStatus::Future },
            ],
            module_roles,
            course_roles,
            assignments: vec![
                Assignment { id: 1, title: "Sprint 1 report".to_string(), status: AssignmentStatus::Available, module_code: "AC31007".to_string() },
                Assignment { id: 2, title: "Retrospective".to_string(), status: AssignmentStatus::Draft, module_code: "AC31007".to_string() },
                Assignment { id: 3, title: "Schema design".to_string(), status: AssignmentStatus::Available, module_code: "AC32006".to_string() },
            ],
            submissions: vec![
                Submission { id: 1, assignment_id: 3, user_id: 3, status: SubmissionStatus::Sent },
                Submission { id: 2, assignment_id: 1, user_id: 3, status: SubmissionStatus::Canceled },
            ],
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_references_resolve() {
        let dataset = Dataset::sample();

        for assignment in &dataset.module_roles {
            assert!(dataset.level_modules.iter().any(|m| m.code == assignment.module_code));
            assert!(dataset.roles.iter().any(|r| r.id == assignment.role_id));
        }
        assert_eq!(dataset.role_by_name("Student").map(|r| r.can_write), Some(false));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("academy.json");

        Dataset::sample().save_to_file(&path).unwrap();
        let loaded = Dataset::load_from_file(&path).unwrap();

        assert_eq!(loaded, Dataset::sample());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let dataset: Dataset = serde_json::from_str(r#"{"users": [{"id": 1, "username": "root", "admin": true}]}"#).unwrap();

        assert_eq!(dataset.users.len(), 1);
        assert!(dataset.module_roles.is_empty());
    }
}
