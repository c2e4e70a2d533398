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

//! Access control entry point for endpoint handlers

use crate::config::AccessConfig;
use crate::error::AccessResult;
use crate::models::{AssignmentId, CourseId, UserId};
use crate::rbac::audit::{AuditEventType, AuditLogger};
use crate::rbac::gate::{Decision, check_access};
use crate::rbac::permissions::{Action, ModuleIdentifier, PermissionsTable};
use crate::rbac::resolver::PermissionResolver;
use crate::rbac::roles::RoleCatalog;
use crate::rbac::store::AssignmentStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Resolved table together with the gate's decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub permissions: PermissionsTable,
    pub decision: Decision,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }
}

/// Wires resolver, gate and audit trail together
///
/// Resolution and gating stay two steps: `verify_*` resolve first, gate
/// second, and hand both results back.
#[derive(Clone)]
pub struct AccessControl {
    resolver: Arc<PermissionResolver>,
    catalog: RoleCatalog,
    audit_logger: Arc<AuditLogger>,
    slow_check_threshold: Duration,
}

impl AccessControl {
    /// Create the access control system over `store`
    pub fn new(store: Arc<dyn AssignmentStore>, config: &AccessConfig) -> Self {
        let audit_logger = if config.audit_enabled { AuditLogger::with_max_events(config.audit_max_events) } else { AuditLogger::disabled() };

        info!(audit_enabled = config.audit_enabled, "Access control initialized");

        Self {
            resolver: Arc::new(PermissionResolver::new(store.clone(), config)),
            catalog: RoleCatalog::new(store),
            audit_logger: Arc::new(audit_logger),
            slow_check_threshold: Duration::from_millis(config.slow_check_threshold_ms),
        }
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    pub fn roles(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn audit_logger(&self) -> &Arc<AuditLogger> {
        &self.audit_logger
    }

    /// Resolve `user_id` on a module, then gate `action`
    pub async fn verify_module_access(&self, user_id: UserId, module: &ModuleIdentifier, action: Action) -> AccessResult<Verdict> {
        let start_time = Instant::now();
        let resource = module.to_string();

        let permissions = match self.resolver.resolve_for_module(user_id, module).await {
            Ok(permissions) => permissions,
            Err(err) => {
                self.audit_logger.log_resolution_failure(&user_id.to_string(), &resource, action.as_str(), &err.to_string()).await;
                return Err(err);
            }
        };

        let decision = check_access(&permissions, action);
        self.audit_logger
            .log_access_check(AuditEventType::ModuleAccessCheck, user_id, &resource, action.as_str(), decision.is_allowed(), &permissions.role_name)
            .await;

        self.trace_check(user_id, &resource, action, decision, start_time.elapsed());
        Ok(Verdict { permissions, decision })
    }

    /// Resolve `user_id` on a course, then gate `action`
    pub async fn verify_course_access(&self, user_id: UserId, course_id: CourseId, action: Action) -> AccessResult<Verdict> {
        let start_time = Instant::now();
        let resource = format!("course:{}", course_id);

        let permissions = match self.resolver.resolve_for_course(user_id, course_id).await {
            Ok(permissions) => permissions,
            Err(err) => {
                self.audit_logger.log_resolution_failure(&user_id.to_string(), &resource, action.as_str(), &err.to_string()).await;
                return Err(err);
            }
        };

        let decision = check_access(&permissions, action);
        self.audit_logger
            .log_access_check(AuditEventType::CourseAccessCheck, user_id, &resource, action.as_str(), decision.is_allowed(), &permissions.role_name)
            .await;

        self.trace_check(user_id, &resource, action, decision, start_time.elapsed());
        Ok(Verdict { permissions, decision })
    }

    /// Whether `username` may submit coursework for `assignment_id`
    pub async fn verify_submission(&self, username: &str, assignment_id: AssignmentId) -> AccessResult<bool> {
        let resource = format!("assignment:{}", assignment_id);

        match self.resolver.can_user_submit_assignment(username, assignment_id).await {
            Ok(allowed) => {
                self.audit_logger.log_submission_check(username, assignment_id, allowed).await;
                Ok(allowed)
            }
            Err(err) => {
                self.audit_logger.log_resolution_failure(username, &resource, "SUBMIT", &err.to_string()).await;
                Err(err)
            }
        }
    }

    /// Global admin flag keyed by username
    pub async fn is_username_admin(&self, username: &str) -> AccessResult<bool> {
        self.resolver.is_username_admin(username).await
    }

    fn trace_check(&self, user_id: UserId, resource: &str, action: Action, decision: Decision, duration: Duration) {
        if duration > self.slow_check_threshold {
            warn!(
                user_id = %user_id,
                resource = %resource,
                action = %action,
                duration_ms = %duration.as_millis(),
                "Slow permission check detected"
            );
        }

        debug!(
            user_id = %user_id,
            resource = %resource,
            action = %action,
            decision = %decision,
            duration_ms = %duration.as_millis(),
            "Permission check completed"
        );
    }
}
