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

//! Audit logging for access decisions

use crate::models::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Audit event types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AuditEventType {
    /// Access check on a module
    ModuleAccessCheck,
    /// Access check on a course
    CourseAccessCheck,
    /// Coursework submission eligibility check
    SubmissionCheck,
    /// Resolution aborted by a store failure
    ResolutionFailure,
}

/// Audit event result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditResult {
    /// Access granted
    Success,
    /// Access denied
    Denied,
    /// Decision could not be made
    Failure,
}

/// Audit event entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID
    pub id: String,

    /// Event type
    pub event_type: AuditEventType,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,

    /// User the decision was made for
    pub actor: String,

    /// Resource being accessed
    pub resource: Option<String>,

    /// Action being performed
    pub action: Option<String>,

    /// Event result
    pub result: AuditResult,

    /// Additional event details
    pub details: HashMap<String, String>,
}

impl AuditEvent {
    /// Create a new audit event
    pub fn new(event_type: AuditEventType, actor: String, result: AuditResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            timestamp: Utc::now(),
            actor,
            resource: None,
            action: None,
            result,
            details: HashMap::new(),
        }
    }

    /// Set resource and action
    pub fn with_resource_action(mut self, resource: String, action: String) -> Self {
        self.resource = Some(resource);
        self.action = Some(action);
        self
    }

    /// Add detail
    pub fn with_detail(mut self, key: String, value: String) -> Self {
        self.details.insert(key, value);
        self
    }
}

/// Audit logger for access decisions
#[derive(Debug)]
pub struct AuditLogger {
    /// Most recent events, oldest first
    events: Arc<RwLock<VecDeque<AuditEvent>>>,

    /// Maximum number of events to keep in memory
    max_events: usize,

    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new() -> Self {
        Self::with_max_events(10_000)
    }

    /// Create audit logger with custom max events
    pub fn with_max_events(max_events: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(VecDeque::new())),
            max_events,
            enabled: true,
        }
    }

    /// Create an audit logger that records nothing
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::with_max_events(0)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log an audit event
    pub async fn log_event(&self, event: AuditEvent) {
        if !self.enabled {
            return;
        }

        match event.result {
            AuditResult::Success => {
                info!(
                    event_type = ?event.event_type,
                    actor = %event.actor,
                    resource = ?event.resource,
                    action = ?event.action,
                    "Audit event: {:?}", event.event_type
                );
            }
            AuditResult::Denied | AuditResult::Failure => {
                warn!(
                    event_type = ?event.event_type,
                    actor = %event.actor,
                    resource = ?event.resource,
                    action = ?event.action,
                    result = ?event.result,
                    "Audit event: {:?} - {:?}", event.event_type, event.result
                );
            }
        }

        let mut events = self.events.write().await;
        events.push_back(event);

        while events.len() > self.max_events {
            events.pop_front();
        }
    }

    /// Log an access check on a module or course
    pub async fn log_access_check(&self, event_type: AuditEventType, user_id: UserId, resource: &str, action: &str, granted: bool, role_name: &str) {
        let result = if granted { AuditResult::Success } else { AuditResult::Denied };

        let event = AuditEvent::new(event_type, user_id.to_string(), result)
            .with_resource_action(resource.to_string(), action.to_string())
            .with_detail("role".to_string(), role_name.to_string());

        self.log_event(event).await;
    }

    /// Log a submission eligibility check
    pub async fn log_submission_check(&self, username: &str, assignment_id: u32, allowed: bool) {
        let result = if allowed { AuditResult::Success } else { AuditResult::Denied };

        let event = AuditEvent::new(AuditEventType::SubmissionCheck, username.to_string(), result).with_resource_action(format!("assignment:{}", assignment_id), "SUBMIT".to_string());

        self.log_event(event).await;
    }

    /// Log a resolution that failed because the store did
    pub async fn log_resolution_failure(&self, actor: &str, resource: &str, action: &str, error: &str) {
        let event = AuditEvent::new(AuditEventType::ResolutionFailure, actor.to_string(), AuditResult::Failure)
            .with_resource_action(resource.to_string(), action.to_string())
            .with_detail("error".to_string(), error.to_string());

        self.log_event(event).await;
    }

    /// Most recent events, newest first
    pub async fn recent_events(&self, limit: usize) -> Vec<AuditEvent> {
        let events = self.events.read().await;
        events.iter().rev().take(limit).cloned().collect()
    }

    /// All retained events for one actor, oldest first
    pub async fn events_for_actor(&self, actor: &str) -> Vec<AuditEvent> {
        let events = self.events.read().await;
        events.iter().filter(|event| event.actor == actor).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_access_check_events() {
        let logger = AuditLogger::new();

        logger.log_access_check(AuditEventType::ModuleAccessCheck, 3, "module:AC31007", "READ", true, "Student").await;
        logger.log_access_check(AuditEventType::ModuleAccessCheck, 3, "module:AC31007", "WRITE", false, "Student").await;

        let events = logger.recent_events(10).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].result, AuditResult::Denied);
        assert_eq!(events[1].result, AuditResult::Success);
        assert_eq!(events[1].details.get("role").map(String::as_str), Some("Student"));
    }

    #[tokio::test]
    async fn test_retention_limit() {
        let logger = AuditLogger::with_max_events(2);

        for assignment_id in 0..5 {
            logger.log_submission_check("student", assignment_id, false).await;
        }

        assert_eq!(logger.len().await, 2);
        let newest = logger.recent_events(1).await;
        assert_eq!(newest[0].resource.as_deref(), Some("assignment:4"));
    }

    #[tokio::test]
    async fn test_disabled_logger_records_nothing() {
        let logger = AuditLogger::disabled();

        logger.log_resolution_failure("3", "course:1", "READ", "store down").await;

        assert!(!logger.is_enabled());
        assert_eq!(logger.len().await, 0);
    }

    #[tokio::test]
    async fn test_events_for_actor() {
        let logger = AuditLogger::new();

        logger.log_access_check(AuditEventType::CourseAccessCheck, 2, "course:1", "READ", true, "Teacher").await;
        logger.log_access_check(AuditEventType::CourseAccessCheck, 4, "course:1", "READ", false, "admin").await;

        let events = logger.events_for_actor("4").await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AuditEventType::CourseAccessCheck);

        logger.clear().await;
        assert_eq!(logger.len().await, 0);
    }
}
