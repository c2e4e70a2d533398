use super::CommandContext;
use crate::CheckTarget;
use anyhow::{Result, anyhow};
use campus_access::models::{AssignmentId, UserId};
use campus_access::rbac::Verdict;
use campus_access::{Action, ModuleIdentifier};

pub async fn check_access(ctx: &CommandContext, user: UserId, target: &CheckTarget, action: Action) -> Result<()> {
    let verdict = run_check(ctx, user, target, action).await?;

    println!("{}", verdict.decision);
    println!("  Role: {}", verdict.permissions.role_name);
    println!("  Admin: {}", verdict.permissions.admin);

    Ok(())
}

async fn run_check(ctx: &CommandContext, user: UserId, target: &CheckTarget, action: Action) -> Result<Verdict> {
    let verdict = match (target.module_id, &target.code, target.course) {
        (Some(id), _, _) => ctx.access.verify_module_access(user, &ModuleIdentifier::ById(id), action).await?,
        (None, Some(code), _) => ctx.access.verify_module_access(user, &ModuleIdentifier::ByCode(code.clone()), action).await?,
        (None, None, Some(course)) => ctx.access.verify_course_access(user, course, action).await?,
        (None, None, None) => return Err(anyhow!("One of --module-id, --code or --course is required")),
    };
    Ok(verdict)
}

pub async fn can_submit(ctx: &CommandContext, username: &str, assignment: AssignmentId) -> Result<()> {
    let allowed = ctx.access.verify_submission(username, assignment).await?;

    if allowed {
        println!("{} can submit assignment {}", username, assignment);
    } else {
        println!("{} cannot submit assignment {}", username, assignment);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use campus_access::{Decision, InMemoryAssignmentStore};
    use std::sync::Arc;

    fn context() -> CommandContext {
        CommandContext::with_store(&CliConfig::default(), Arc::new(InMemoryAssignmentStore::sample()))
    }

    fn module(code: &str) -> CheckTarget {
        CheckTarget {
            module_id: None,
            code: Some(code.to_string()),
            course: None,
        }
    }

    #[tokio::test]
    async fn test_check_against_module_code() {
        let ctx = context();

        let read = run_check(&ctx, 3, &module("AC31007"), Action::Read).await.unwrap();
        let write = run_check(&ctx, 3, &module("AC31007"), Action::Write).await.unwrap();

        assert_eq!(read.decision, Decision::Allow);
        assert_eq!(write.decision, Decision::Deny);
    }

    #[tokio::test]
    async fn test_check_against_course() {
        let ctx = context();
        let target = CheckTarget {
            module_id: None,
            code: None,
            course: Some(2),
        };

        assert!(run_check(&ctx, 2, &target, Action::Delete).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn test_store_outage_fails_the_command() {
        let ctx = context();
        ctx.store.set_available(false);

        assert!(check_access(&ctx, 3, &module("AC31007"), Action::Read).await.is_err());
        assert!(can_submit(&ctx, "student", 1).await.is_err());
    }
}
