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

//! Academic entities referenced by access decisions

use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = u32;
pub type RoleId = u32;
pub type CourseId = u32;
pub type ClassId = u32;
pub type ModuleId = u32;
pub type AssignmentId = u32;
pub type SubmissionId = u32;

/// User account with its global admin flag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Global admin: unconditional access regardless of role assignments
    #[serde(default)]
    pub admin: bool,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            active: true,
            admin: false,
        }
    }

    pub fn admin(id: UserId, username: impl Into<String>) -> Self {
        Self { admin: true, ..Self::new(id, username) }
    }
}

fn default_true() -> bool {
    true
}

/// Degree program grouping classes across years
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Year instance of a course
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Class {
    pub id: ClassId,
    pub course_id: CourseId,
    pub title: String,
}

/// Taught unit, independent of when and where it runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Module as delivered to a class, identified by its code (e.g. "AC31007")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelModule {
    pub code: String,
    pub class_id: ClassId,
    pub module_id: ModuleId,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub status: ModuleStatus,
}

/// Role held by a user on a module code. Unique per (user, module code).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleRoleAssignment {
    pub user_id: UserId,
    pub module_code: String,
    pub role_id: RoleId,
    /// Denormalized class reference
    pub class_id: ClassId,
}

/// Role held by a user on a course. Unique per (user, course).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseRoleAssignment {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub role_id: RoleId,
}

/// Coursework set on a module
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub status: AssignmentStatus,
    pub module_code: String,
}

/// A student's hand-in for an assignment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub user_id: UserId,
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    #[default]
    Draft,
    Ongoing,
    Future,
    Ended,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Draft,
    Created,
    Available,
    Sent,
    Graded,
    Returned,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssignmentStatus::Draft => "draft",
            AssignmentStatus::Created => "created",
            AssignmentStatus::Available => "available",
            AssignmentStatus::Sent => "sent",
            AssignmentStatus::Graded => "graded",
            AssignmentStatus::Returned => "returned",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Sent,
    Review,
    Graded,
    Canceled,
    Complete,
}

impl SubmissionStatus {
    /// A canceled submission does not count as a prior hand-in
    pub fn is_canceled(&self) -> bool {
        matches!(self, SubmissionStatus::Canceled)
    }
}
