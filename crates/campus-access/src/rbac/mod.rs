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

//! Role-Based Access Control (RBAC) system
//!
//! Two-tier role model for academic resources:
//! - Module roles, held per (user, module code)
//! - Course roles, held per (user, course), augmenting module roles
//! - A global admin flag overriding both
//!
//! Resolution and gating are separate steps: the resolver produces a
//! [`PermissionsTable`] which callers may display, and the gate turns that
//! table and an [`Action`] into a [`Decision`].

pub mod audit;
pub mod gate;
pub mod listing;
pub mod permissions;
pub mod resolver;
pub mod roles;
pub mod store;
pub mod system;

pub use audit::*;
pub use gate::*;
pub use listing::*;
pub use permissions::*;
pub use resolver::*;
pub use roles::*;
pub use store::*;
pub use system::*;
