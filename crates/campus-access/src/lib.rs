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

//! Campus access control
//!
//! This crate decides who may read, write, update or delete academic
//! resources (courses, modules and everything hanging off them). It provides:
//! - A role catalog of named capability bundles
//! - A permission resolver combining module-level and course-level roles
//! - An access gate mapping a resolved table and an action onto Allow/Deny
//! - An audit trail of access decisions
//! - An in-memory assignment store for tooling and tests

pub mod config;
pub mod error;
pub mod models;
pub mod rbac;
pub mod store;

pub use config::AccessConfig;
pub use error::{AccessError, AccessResult};
pub use rbac::{AccessControl, Action, Capabilities, Decision, ModuleIdentifier, PermissionResolver, PermissionsTable};
pub use store::{Dataset, InMemoryAssignmentStore};
